use std::sync::Arc;

use kite_service::{BalanceService, ProfileService, RouteService};
use kite_types::VaultProbe;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
	pub route_service: Arc<RouteService>,
	pub balance_service: Arc<BalanceService>,
	pub profile_service: Arc<ProfileService>,
	pub vault_probe: Option<Arc<dyn VaultProbe>>,
	/// Destination chain for recipients without a preferred chain
	pub default_chain_id: u64,
}
