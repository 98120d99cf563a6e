//! nupack-web: HTTP front end for nupack-serve.
//! Routes:
//!   - `/` about document
//!   - `/mfe`, `/complexes`, `/concentrations` tool forwarders
//!   - `/example/*` fixed E2F1 / hsa-miR-205 / hsa-miR-342-3p samples

pub mod router;
pub mod handlers;
pub mod state;
