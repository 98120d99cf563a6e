//! Axum router: maps all URL paths to handlers.

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::CorsLayer,
    trace::TraceLayer,
    compression::CompressionLayer,
};
use std::sync::Arc;
use crate::state::{AppState, SharedState};
use crate::handlers::{
    about::about,
    mfe::{mfe, mfe_path},
    complexes::complexes,
    concentrations::concentrations,
    examples::{mfe_example, complexes_example, concentrations_example},
};

/// Build and return the full Axum router.
pub fn build_router(state: AppState) -> Router {
    let shared: SharedState = Arc::new(state);

    Router::new()
        .route("/",               get(about))

        // Tool forwarders
        .route("/mfe",            get(mfe).post(mfe))
        .route("/mfe/{target}/{probe1}/{probe2}", get(mfe_path))
        .route("/complexes",      get(complexes).post(complexes))
        .route("/concentrations", post(concentrations))

        // Samples
        .route("/example/mfe",            get(mfe_example))
        .route("/example/complexes",      get(complexes_example))
        .route("/example/concentrations", get(concentrations_example))

        // Middleware
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}
