//! Transport layer: REST (axum) and RPC (tonic) over the shared use cases.

pub mod errors;
pub mod grpc;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod startup;
pub mod state;

pub use routes::build_router;
pub use startup::{load_config, run, serve, shutdown_signal};
pub use state::ServerState;
