use axum::{extract::State, http::StatusCode, response::Json};
use kite_types::{RouteAcquisition, RouteError, RouteRequest};
use tracing::{info, warn};

use crate::handlers::common::{api_error, ApiError};
use crate::state::AppState;

/// POST /api/routes - Ranked routes for a deposit
pub async fn post_routes(
	State(state): State<AppState>,
	Json(request): Json<RouteRequest>,
) -> Result<Json<RouteAcquisition>, ApiError> {
	let acquisition = state.route_service.acquire(&request).await.map_err(|e| {
		let status = match &e {
			RouteError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
			RouteError::NoRoutes => StatusCode::NOT_FOUND,
			RouteError::Vendor(_) => {
				warn!("Route acquisition failed: {}", e);
				StatusCode::BAD_GATEWAY
			},
		};
		api_error(status, e.code(), e.to_string())
	})?;

	info!(
		"Returning {} route(s) ({:?})",
		acquisition.routes.len(),
		acquisition.source
	);
	Ok(Json(acquisition))
}
