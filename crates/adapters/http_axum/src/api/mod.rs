//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod devices;

use axum::Router;
use axum::routing::{get, post};

use inventory_app::ports::DeviceRepository;

use crate::state::AppState;

/// Version prefix under which the API is mounted in addition to the root.
pub const PREFIX: &str = "/api/0.1.0";

/// Build the API sub-router.
pub fn routes<DR>() -> Router<AppState<DR>>
where
    DR: DeviceRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/devices", post(devices::create::<DR>))
        .route("/devices/{id}", get(devices::get::<DR>))
}
