//! Centralized mocks and fixtures for testing
//!
//! Mock collaborators for every trait seam of the router plus shared route
//! and request fixtures.

pub mod collaborators;
pub mod fixtures;
pub mod routing;

#[allow(unused_imports)]
pub use collaborators::{MockBalanceProvider, MockEnsResolver, MockPrompt, MockWallet};
#[allow(unused_imports)]
pub use fixtures::*;
#[allow(unused_imports)]
pub use routing::{MockExecutor, MockRoutingClient, ScriptedStep};
