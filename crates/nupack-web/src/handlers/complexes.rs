//! Partition function and base-pairing properties for every complex up to a size.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use nupack_common::{ApiError, ComplexesParams, Envelope};

use crate::handlers::bad_body;
use crate::state::SharedState;

/// GET|POST /complexes
pub async fn complexes(
    State(state): State<SharedState>,
    payload: Result<Json<ComplexesParams>, JsonRejection>,
) -> Result<Json<Envelope>, ApiError> {
    let Json(params) = payload.map_err(bad_body)?;
    run(&state, &params).await
}

pub(crate) async fn run(state: &SharedState, params: &ComplexesParams) -> Result<Json<Envelope>, ApiError> {
    let run = state.forwarder.complexes(params).await?;
    Ok(Json(state.envelope(run)))
}
