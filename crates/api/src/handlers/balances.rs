use axum::{extract::State, http::StatusCode, response::Json};
use kite_types::{BalanceError, BalanceRequest, BalanceResponse};
use tracing::{info, warn};

use crate::handlers::common::{api_error, ApiError};
use crate::state::AppState;

/// POST /api/tokens/balances - Non-zero token balances of an address on one chain
pub async fn post_balances(
	State(state): State<AppState>,
	Json(request): Json<BalanceRequest>,
) -> Result<Json<BalanceResponse>, ApiError> {
	let response = state.balance_service.balances(&request).await.map_err(|e| {
		let (status, code) = match &e {
			BalanceError::MissingField { .. } => (StatusCode::BAD_REQUEST, "MISSING_FIELD"),
			BalanceError::InvalidAddress { .. } => (StatusCode::BAD_REQUEST, "INVALID_ADDRESS"),
			BalanceError::UnsupportedChain { .. } => (StatusCode::BAD_REQUEST, "UNSUPPORTED_CHAIN"),
			BalanceError::NotConfigured => (StatusCode::INTERNAL_SERVER_ERROR, "NOT_CONFIGURED"),
			BalanceError::Provider(_) => (StatusCode::INTERNAL_SERVER_ERROR, "PROVIDER_ERROR"),
		};
		if status.is_server_error() {
			warn!("Balance lookup failed: {}", e);
		}
		api_error(status, code, e.to_string())
	})?;

	info!(
		"Returning {} token balance(s) for chain {:?}",
		response.tokens.len(),
		request.chain_id
	);
	Ok(Json(response))
}
