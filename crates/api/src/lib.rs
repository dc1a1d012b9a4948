//! Kite API
//!
//! Axum router exposing balances, ENS profiles and routes to the front-end.

pub mod handlers;
pub mod router;
pub mod security;
pub mod state;

pub use router::create_router;
pub use state::AppState;
