//! Kite Router Server
//!
//! Main entry point for the deposit router HTTP service

use kite_router::KiteBuilder;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	KiteBuilder::new().start_server().await
}
