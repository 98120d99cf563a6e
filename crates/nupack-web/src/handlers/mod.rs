//! HTTP handlers for all web routes.

pub mod about;
pub mod mfe;
pub mod complexes;
pub mod concentrations;
pub mod examples;

use axum::extract::rejection::{JsonRejection, PathRejection};
use nupack_common::{ApiError, NupackError};

/// Malformed or incomplete JSON bodies are client errors, reported like any other input error.
pub(crate) fn bad_body(rejection: JsonRejection) -> ApiError {
    NupackError::input(rejection.body_text()).into()
}

pub(crate) fn bad_path(rejection: PathRejection) -> ApiError {
    NupackError::input(rejection.body_text()).into()
}
