//! Request parameters for the three NUPACK operations.
//!
//! JSON keys keep the names clients of the service already send
//! (`"number of sequences"`, `"mir1 sequence"`, ...). Numeric fields accept
//! either JSON strings or numbers; both are forwarded to the tool as text.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::error::{NupackError, Result};

/// Number of sequences the mfe and complexes forwarders send (target plus two probes).
pub const SEQUENCES_PER_REQUEST: usize = 3;

/// A scalar field forwarded verbatim as one line of tool input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Scalar(String);

impl Scalar {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl<'de> Deserialize<'de> for Scalar {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => Scalar(s),
            Raw::Number(n) => Scalar(n.to_string()),
        })
    }
}

/// Minimum free energy of the complex formed by a target and two probes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MfeParams {
    #[serde(rename = "number of sequences")]
    pub sequence_count: Scalar,
    #[serde(rename = "target sequence")]
    pub target: String,
    #[serde(rename = "mir1 sequence")]
    pub probe1: String,
    #[serde(rename = "mir2 sequence")]
    pub probe2: String,
    pub permutations: Vec<String>,
}

impl MfeParams {
    /// Path-segment form: three sequences, fixed count and the identity permutation.
    pub fn from_sequences(target: &str, probe1: &str, probe2: &str) -> Self {
        Self {
            sequence_count: Scalar::new(SEQUENCES_PER_REQUEST.to_string()),
            target: target.to_string(),
            probe1: probe1.to_string(),
            probe2: probe2.to_string(),
            permutations: vec!["1 2 3".to_string()],
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_sequences(&self.sequence_count, &self.target, &self.probe1, &self.probe2)?;
        // mfe -multi reads exactly one permutation line
        if self.permutations.len() != 1 {
            return Err(NupackError::input(format!(
                "mfe expects exactly one permutation, got {}",
                self.permutations.len()
            )));
        }
        require_lines("permutations", &self.permutations)
    }
}

/// Complex enumeration over all complexes up to a maximum size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexesParams {
    #[serde(rename = "number of sequences")]
    pub sequence_count: Scalar,
    #[serde(rename = "target sequence")]
    pub target: String,
    #[serde(rename = "mir1 sequence")]
    pub probe1: String,
    #[serde(rename = "mir2 sequence")]
    pub probe2: String,
    #[serde(rename = "max complex size")]
    pub max_complex_size: Scalar,
    pub permutations: Vec<String>,
}

impl ComplexesParams {
    pub fn validate(&self) -> Result<()> {
        validate_sequences(&self.sequence_count, &self.target, &self.probe1, &self.probe2)?;
        parse_count("max complex size", &self.max_complex_size)?;
        // complexes reads one permutation line per strand
        if self.permutations.len() != SEQUENCES_PER_REQUEST {
            return Err(NupackError::input(format!(
                "complexes expects {} permutations, one per strand, got {}",
                SEQUENCES_PER_REQUEST,
                self.permutations.len()
            )));
        }
        require_lines("permutations", &self.permutations)
    }
}

/// Equilibrium concentrations for a set of complexes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcentrationsParams {
    #[serde(rename = "num complexes")]
    pub complex_count: Scalar,
    #[serde(rename = "list concentrations")]
    pub concentrations: Vec<Scalar>,
    pub temperature: Scalar,
    /// One row per complex, passed through verbatim.
    pub ocx: Vec<String>,
}

impl ConcentrationsParams {
    pub fn validate(&self) -> Result<()> {
        let complexes = parse_count("num complexes", &self.complex_count)?;
        if complexes != self.ocx.len() {
            return Err(NupackError::input(format!(
                "num complexes is {} but {} ocx rows were given",
                complexes,
                self.ocx.len()
            )));
        }
        if self.concentrations.is_empty() {
            return Err(NupackError::input("list concentrations must not be empty"));
        }
        for c in &self.concentrations {
            require_line("list concentrations", c.as_str())?;
        }
        require_line("temperature", self.temperature.as_str())?;
        if self.temperature.as_str().trim().parse::<f64>().is_err() {
            return Err(NupackError::input(format!(
                "temperature must be a number, got {:?}",
                self.temperature.as_str()
            )));
        }
        require_lines("ocx", &self.ocx)
    }
}

fn validate_sequences(count: &Scalar, target: &str, probe1: &str, probe2: &str) -> Result<()> {
    let n = parse_count("number of sequences", count)?;
    if n != SEQUENCES_PER_REQUEST {
        return Err(NupackError::input(format!(
            "number of sequences must be {} (target and two probes), got {}",
            SEQUENCES_PER_REQUEST, n
        )));
    }
    require_line("target sequence", target)?;
    require_line("mir1 sequence", probe1)?;
    require_line("mir2 sequence", probe2)
}

/// Parses a strictly positive integer.
fn parse_count(field: &str, value: &Scalar) -> Result<usize> {
    match value.as_str().trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(NupackError::input(format!(
            "{} must be a positive integer, got {:?}",
            field,
            value.as_str()
        ))),
    }
}

/// Each value becomes exactly one line of tool input.
fn require_line(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(NupackError::input(format!("{} must not be empty", field)));
    }
    if value.contains(|c: char| c == '\n' || c == '\r') {
        return Err(NupackError::input(format!("{} must not contain line breaks", field)));
    }
    Ok(())
}

fn require_lines(field: &str, values: &[String]) -> Result<()> {
    values.iter().try_for_each(|v| require_line(field, v))
}
