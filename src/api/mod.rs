//! API layer - HTTP endpoints and middleware

pub mod data;
pub mod health;
pub mod middleware;
pub mod model;
pub mod router;
pub mod state;
pub mod types;

pub use router::create_router_with_state;
pub use state::{AppState, ServingSettings};
