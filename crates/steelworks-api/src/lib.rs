//! JSON REST API for SteelWorks operations reporting.
//!
//! Exposes an axum [`Router`] backed by any
//! [`steelworks_core::store::OpsStore`]. Auth, TLS, and transport concerns
//! are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", steelworks_api::api_router(store.clone()))
//! ```

pub mod error;
pub mod lots;
pub mod reports;
pub mod shipments;

#[cfg(test)]
mod tests;

use std::{path::PathBuf, sync::Arc};

use axum::{Router, routing::get};
use serde::Deserialize;
use steelworks_core::store::OpsStore;

pub use error::ApiError;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: OpsStore + 'static,
{
  Router::new()
    // Reports
    .route("/reports/defects-by-line", get(reports::defects_by_line::<S>))
    .route("/reports/defect-trend", get(reports::defect_trend::<S>))
    .route("/reports/defects-by-type", get(reports::defects_by_type::<S>))
    .route("/reports/production", get(reports::production_summary::<S>))
    .route("/reports/risk", get(reports::risk::<S>))
    // Shipments
    .route("/shipments", get(shipments::overview::<S>))
    .route("/shipments/{lot_code}", get(shipments::status::<S>))
    // Lots
    .route("/lots/{lot_code}", get(lots::drilldown::<S>))
    .with_state(store)
}
