//! The three NUPACK operations and the prompt sequence each tool asks.
//!
//! Prompt texts are substrings of what the tools print; matching is by
//! substring so `"Enter sequence"` also matches `"Enter sequence 2: "`.

use std::fmt;

use nupack_common::{ComplexesParams, ConcentrationsParams, MfeParams};

use crate::script::PromptScript;

pub mod prompts {
    pub const MFE_STRAND_COUNT: &str = "Enter number of strands";
    pub const MFE_SEQUENCE: &str = "Enter sequence for strand type";
    pub const MFE_PERMUTATION: &str = "Enter strand permutation";

    pub const COMPLEXES_SEQUENCE_COUNT: &str = "Enter number of different sequences";
    pub const COMPLEXES_SEQUENCE: &str = "Enter sequence";
    pub const COMPLEXES_MAX_SIZE: &str = "Enter max complex size to completely enumerate";
    pub const COMPLEXES_PERMUTATION: &str = "Enter permutation";

    pub const CONCENTRATIONS_COMPLEX_COUNT: &str = "Enter number of complex IDs";
    pub const CONCENTRATIONS_COUNT: &str = "Enter number of different concentrations";
    pub const CONCENTRATIONS_VALUE: &str = "Enter concentration";
    pub const CONCENTRATIONS_TEMPERATURE: &str = "Enter temperature";
    pub const CONCENTRATIONS_OCX: &str = "Enter complex ocx";
}

use prompts::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Mfe,
    Complexes,
    Concentrations,
}

impl Operation {
    pub const ALL: [Operation; 3] = [Operation::Mfe, Operation::Complexes, Operation::Concentrations];

    pub fn name(&self) -> &'static str {
        match self {
            Operation::Mfe => "mfe",
            Operation::Complexes => "complexes",
            Operation::Concentrations => "concentrations",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Strand count, three strand sequences, one permutation.
pub fn mfe_script(params: &MfeParams) -> PromptScript {
    PromptScript::new()
        .step(MFE_STRAND_COUNT, params.sequence_count.as_str())
        .step(MFE_SEQUENCE, params.target.as_str())
        .step(MFE_SEQUENCE, params.probe1.as_str())
        .step(MFE_SEQUENCE, params.probe2.as_str())
        .repeat(MFE_PERMUTATION, &params.permutations)
}

/// Sequence count, three sequences, max complex size, then every permutation.
pub fn complexes_script(params: &ComplexesParams) -> PromptScript {
    PromptScript::new()
        .step(COMPLEXES_SEQUENCE_COUNT, params.sequence_count.as_str())
        .step(COMPLEXES_SEQUENCE, params.target.as_str())
        .step(COMPLEXES_SEQUENCE, params.probe1.as_str())
        .step(COMPLEXES_SEQUENCE, params.probe2.as_str())
        .step(COMPLEXES_MAX_SIZE, params.max_complex_size.as_str())
        .repeat(COMPLEXES_PERMUTATION, &params.permutations)
}

/// Complex count, concentration count and values, temperature, then one ocx row per complex.
pub fn concentrations_script(params: &ConcentrationsParams) -> PromptScript {
    PromptScript::new()
        .step(CONCENTRATIONS_COMPLEX_COUNT, params.complex_count.as_str())
        .step(CONCENTRATIONS_COUNT, params.concentrations.len().to_string())
        .repeat(CONCENTRATIONS_VALUE, params.concentrations.iter().map(|c| c.as_str()))
        .step(CONCENTRATIONS_TEMPERATURE, params.temperature.as_str())
        .repeat(CONCENTRATIONS_OCX, &params.ocx)
}
