use axum::{
	routing::{get, post},
	Router,
};
use tower::ServiceBuilder;
use tower_http::{
	compression::CompressionLayer,
	cors::CorsLayer,
	limit::RequestBodyLimitLayer,
	request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
	trace::TraceLayer,
};
use tracing::Level;

use crate::handlers::{get_profile, health, post_balances, post_routes};
use crate::security::add_security_headers;
use crate::state::AppState;

/// Request bodies are small JSON documents
const MAX_BODY_BYTES: usize = 64 * 1024;

pub fn create_router() -> Router<AppState> {
	let trace = TraceLayer::new_for_http()
		.make_span_with(|req: &axum::http::Request<_>| {
			let req_id = req
				.headers()
				.get("x-request-id")
				.and_then(|v| v.to_str().ok())
				.unwrap_or("-");
			tracing::info_span!(
				"http_request",
				method = %req.method(),
				path = %req.uri().path(),
				req_id
			)
		})
		.on_request(tower_http::trace::DefaultOnRequest::new().level(Level::DEBUG))
		.on_response(
			tower_http::trace::DefaultOnResponse::new()
				.level(Level::INFO)
				.latency_unit(tower_http::LatencyUnit::Millis),
		);
	let req_id = ServiceBuilder::new()
		.layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
		.layer(PropagateRequestIdLayer::x_request_id());

	let router = Router::new()
		.route("/health", get(health))
		.route("/api/tokens/balances", post(post_balances))
		.route("/api/profiles/{name}", get(get_profile))
		.route("/api/routes", post(post_routes))
		.layer(CorsLayer::permissive())
		.layer(CompressionLayer::new())
		.layer(trace)
		.layer(req_id)
		.layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES));

	add_security_headers(router)
}
