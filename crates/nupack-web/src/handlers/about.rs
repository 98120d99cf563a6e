//! About page: usage, homepage and the NUPACK license.

use axum::{extract::State, Json};
use nupack_common::About;

use crate::state::SharedState;

/// GET / - What this service is and the terms of the wrapped software.
pub async fn about(State(state): State<SharedState>) -> Json<About> {
    Json(state.about())
}
