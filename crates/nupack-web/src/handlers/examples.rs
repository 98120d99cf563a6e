//! Fixed sample runs: target E2F1 against hsa-miR-205 and hsa-miR-342-3p.

use axum::{extract::State, Json};
use nupack_common::{ApiError, ComplexesParams, ConcentrationsParams, Envelope, MfeParams, Scalar};

use crate::handlers::{complexes, concentrations, mfe};
use crate::state::SharedState;

pub const E2F1: &str = "ccgggggugaaugugugugagcaugugugugugcauguaccggggaaugaaggu";
pub const MIR_205: &str = "uccuucauuccaccggagucug";
pub const MIR_342_3P: &str = "ucucacacagaaaucgcacccgu";

/// ocx rows for the complexes produced by the sample complexes run, at 37 C.
const SAMPLE_OCX: [&str; 6] = [
    "1,1,1,0,0,-7.92078773e+00",
    "2,1,0,1,0,-9.79502400e+00",
    "3,1,0,0,1,-9.79502400e+00",
    "4,1,1,1,0,-4.84277745e+01",
    "5,1,1,0,1,-4.84277745e+01",
    "6,1,1,1,1,-6.36285141e+01",
];

pub fn mfe_sample() -> MfeParams {
    MfeParams::from_sequences(E2F1, MIR_205, MIR_342_3P)
}

pub fn complexes_sample() -> ComplexesParams {
    ComplexesParams {
        sequence_count: Scalar::new("3"),
        target: E2F1.to_string(),
        probe1: MIR_205.to_string(),
        probe2: MIR_342_3P.to_string(),
        max_complex_size: Scalar::new("1"),
        permutations: vec!["1 2 3".to_string(), "1 2".to_string(), "1 3".to_string()],
    }
}

pub fn concentrations_sample() -> ConcentrationsParams {
    ConcentrationsParams {
        complex_count: Scalar::new(SAMPLE_OCX.len().to_string()),
        concentrations: vec![Scalar::new("1e-7"); 3],
        temperature: Scalar::new("37.0"),
        ocx: SAMPLE_OCX.iter().map(|row| row.to_string()).collect(),
    }
}

/// GET /example/mfe
pub async fn mfe_example(State(state): State<SharedState>) -> Result<Json<Envelope>, ApiError> {
    mfe::run(&state, &mfe_sample()).await
}

/// GET /example/complexes
pub async fn complexes_example(State(state): State<SharedState>) -> Result<Json<Envelope>, ApiError> {
    complexes::run(&state, &complexes_sample()).await
}

/// GET /example/concentrations
pub async fn concentrations_example(State(state): State<SharedState>) -> Result<Json<Envelope>, ApiError> {
    concentrations::run(&state, &concentrations_sample()).await
}
