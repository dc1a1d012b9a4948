//! Error types for route requests and route acquisition

use crate::adapters::AdapterError;
use thiserror::Error;

/// Reasons a route request is rejected before any vendor call
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RequestValidationError {
	#[error("Missing required field: {field}")]
	MissingRequiredField { field: String },

	#[error("Invalid amount: {reason}")]
	InvalidAmount { reason: String },

	#[error("Amount must be greater than zero")]
	ZeroAmount,

	#[error("Invalid address for {field}: {value}")]
	InvalidAddress { field: String, value: String },

	#[error("Invalid slippage: {value} (must be between 0 and 1)")]
	InvalidSlippage { value: f64 },

	#[error("Invalid chain ID for {field}")]
	InvalidChainId { field: String },
}

pub type RequestValidationResult<T> = Result<T, RequestValidationError>;

/// Route acquisition errors surfaced to the user
#[derive(Error, Debug)]
pub enum RouteError {
	#[error("Invalid route request: {0}")]
	InvalidRequest(#[from] RequestValidationError),

	#[error("No routes available for this transfer")]
	NoRoutes,

	#[error("Route provider error: {0}")]
	Vendor(#[from] AdapterError),
}

impl RouteError {
	/// Short machine-readable code used by the HTTP layer
	pub fn code(&self) -> &'static str {
		match self {
			RouteError::InvalidRequest(_) => "INVALID_REQUEST",
			RouteError::NoRoutes => "NO_ROUTES",
			RouteError::Vendor(_) => "ROUTE_PROVIDER_ERROR",
		}
	}
}

pub type RouteResult<T> = Result<T, RouteError>;
