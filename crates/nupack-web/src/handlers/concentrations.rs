//! Equilibrium concentrations of a set of complexes.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use nupack_common::{ApiError, ConcentrationsParams, Envelope};

use crate::handlers::bad_body;
use crate::state::SharedState;

/// POST /concentrations
pub async fn concentrations(
    State(state): State<SharedState>,
    payload: Result<Json<ConcentrationsParams>, JsonRejection>,
) -> Result<Json<Envelope>, ApiError> {
    let Json(params) = payload.map_err(bad_body)?;
    run(&state, &params).await
}

pub(crate) async fn run(state: &SharedState, params: &ConcentrationsParams) -> Result<Json<Envelope>, ApiError> {
    let run = state.forwarder.concentrations(params).await?;
    Ok(Json(state.envelope(run)))
}
