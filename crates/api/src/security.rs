//! Default security response headers

use axum::{
	http::header::{HeaderName, HeaderValue},
	Router,
};
use tower_http::set_header::SetResponseHeaderLayer;

/// JSON-only API: nothing may be framed, sniffed or cached
const SECURITY_HEADERS: &[(&str, &str)] = &[
	("strict-transport-security", "max-age=31536000; includeSubDomains"),
	("x-content-type-options", "nosniff"),
	("x-frame-options", "DENY"),
	("referrer-policy", "no-referrer"),
	("content-security-policy", "default-src 'none'; frame-ancestors 'none'"),
	("cache-control", "no-store"),
];

/// Add [`SECURITY_HEADERS`] to every response that does not already set them
pub fn add_security_headers<S>(router: Router<S>) -> Router<S>
where
	S: Clone + Send + Sync + 'static,
{
	SECURITY_HEADERS.iter().fold(router, |router, (name, value)| {
		router.layer(SetResponseHeaderLayer::if_not_present(
			HeaderName::from_static(*name),
			HeaderValue::from_static(*value),
		))
	})
}
