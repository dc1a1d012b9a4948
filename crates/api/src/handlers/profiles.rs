use axum::{
	extract::{Path, State},
	http::StatusCode,
	response::Json,
};
use kite_service::{deposit_banner, resolve_destination_chain, DepositBanner};
use kite_types::{EnsProfile, ProfileError};
use serde::Serialize;
use tracing::{debug, warn};

use crate::handlers::common::{api_error, ApiError};
use crate::state::AppState;

/// Recipient profile together with what a deposit to it would do
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
	pub profile: EnsProfile,
	pub destination_chain_id: u64,
	pub deposit: DepositBanner,
	pub message: String,
	/// On-chain ERC-4626 check of the deposit target; informational only
	#[serde(skip_serializing_if = "Option::is_none")]
	pub vault_erc4626: Option<bool>,
}

/// GET /api/profiles/{name}
pub async fn get_profile(
	State(state): State<AppState>,
	Path(name): Path<String>,
) -> Result<Json<ProfileResponse>, ApiError> {
	let profile = state.profile_service.load(&name).await.map_err(|e| match &e {
		ProfileError::InvalidName { .. } | ProfileError::InvalidRecord { .. } => {
			api_error(StatusCode::BAD_REQUEST, "INVALID_NAME", e.to_string())
		},
		ProfileError::NotFound { .. } => api_error(StatusCode::NOT_FOUND, "NOT_FOUND", e.to_string()),
		ProfileError::Resolver(_) => {
			warn!("ENS lookup for {} failed: {}", name, e);
			api_error(StatusCode::BAD_GATEWAY, "ENS_ERROR", e.to_string())
		},
	})?;

	let destination_chain_id = resolve_destination_chain(&profile, state.default_chain_id);
	let deposit = deposit_banner(&profile, destination_chain_id, state.route_service.vaults());

	let vault_erc4626 = match (&state.vault_probe, profile.deposit_target.as_deref()) {
		(Some(probe), Some(target)) => match probe.is_erc4626(destination_chain_id, target).await {
			Ok(compliant) => Some(compliant),
			Err(e) => {
				debug!("ERC-4626 probe of {} failed: {}", target, e);
				None
			},
		},
		_ => None,
	};

	Ok(Json(ProfileResponse {
		message: deposit.message(),
		profile,
		destination_chain_id,
		deposit,
		vault_erc4626,
	}))
}
