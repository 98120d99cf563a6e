//! Minimum free energy of the complex formed by a target and two probes.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Json,
};
use nupack_common::{ApiError, Envelope, MfeParams};

use crate::handlers::{bad_body, bad_path};
use crate::state::SharedState;

/// GET|POST /mfe - Parameters in the JSON body.
pub async fn mfe(
    State(state): State<SharedState>,
    payload: Result<Json<MfeParams>, JsonRejection>,
) -> Result<Json<Envelope>, ApiError> {
    let Json(params) = payload.map_err(bad_body)?;
    run(&state, &params).await
}

/// GET /mfe/{target}/{probe1}/{probe2} - Three strands, identity permutation.
pub async fn mfe_path(
    State(state): State<SharedState>,
    segments: Result<Path<(String, String, String)>, PathRejection>,
) -> Result<Json<Envelope>, ApiError> {
    let Path((target, probe1, probe2)) = segments.map_err(bad_path)?;
    let params = MfeParams::from_sequences(&target, &probe1, &probe2);
    run(&state, &params).await
}

pub(crate) async fn run(state: &SharedState, params: &MfeParams) -> Result<Json<Envelope>, ApiError> {
    let run = state.forwarder.mfe(params).await?;
    Ok(Json(state.envelope(run)))
}
