//! Route request model, validation and request keys

use serde::{Deserialize, Serialize};

use super::{RequestValidationError, RequestValidationResult};
use crate::models::{is_valid_evm_address, TokenAmount, TokenRef};

/// Route request as assembled from the deposit form
///
/// Every field except the amount is optional so that partially filled forms can
/// be represented; [`RouteRequest::validate`] decides whether it may reach the
/// routing vendor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRequest {
	pub from_token: Option<TokenRef>,
	pub to_token: Option<TokenRef>,
	#[serde(default)]
	pub from_amount: TokenAmount,
	pub from_address: Option<String>,
	pub to_address: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub vault_address: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub slippage: Option<f64>,
}

/// A request that passed validation; all fields present
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatedRouteRequest {
	pub from_token: TokenRef,
	pub to_token: TokenRef,
	pub from_amount: TokenAmount,
	pub from_address: String,
	pub to_address: String,
	pub vault_address: Option<String>,
	pub slippage: Option<f64>,
}

/// Normalized identity of a route request
///
/// Two requests are "the same request" for de-duplication purposes iff their
/// keys are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteRequestKey {
	pub from_chain_id: u64,
	pub from_token: String,
	pub to_chain_id: u64,
	pub to_token: String,
	pub from_amount: String,
	pub from_address: String,
	pub to_address: String,
	pub vault_address: Option<String>,
	pub slippage_bps: Option<u32>,
}

impl RouteRequest {
	/// Validate the request
	///
	/// Requires both tokens, a positive digit-only amount and both addresses.
	/// Slippage, when present, must be within (0, 1).
	pub fn validate(&self) -> RequestValidationResult<ValidatedRouteRequest> {
		let from_token = self.from_token.clone().ok_or_else(|| missing("fromToken"))?;
		let to_token = self.to_token.clone().ok_or_else(|| missing("toToken"))?;

		check_token(&from_token, "fromToken")?;
		check_token(&to_token, "toToken")?;

		self.from_amount
			.validate()
			.map_err(|reason| RequestValidationError::InvalidAmount { reason })?;
		if self.from_amount.is_zero() {
			return Err(RequestValidationError::ZeroAmount);
		}

		let from_address = non_empty(&self.from_address).ok_or_else(|| missing("fromAddress"))?;
		let to_address = non_empty(&self.to_address).ok_or_else(|| missing("toAddress"))?;
		check_address(&from_address, "fromAddress")?;
		check_address(&to_address, "toAddress")?;

		let vault_address = non_empty(&self.vault_address);
		if let Some(vault) = &vault_address {
			check_address(vault, "vaultAddress")?;
		}

		if let Some(slippage) = self.slippage {
			if !(slippage > 0.0 && slippage < 1.0) {
				return Err(RequestValidationError::InvalidSlippage { value: slippage });
			}
		}

		Ok(ValidatedRouteRequest {
			from_token,
			to_token,
			from_amount: TokenAmount::new(self.from_amount.normalized()),
			from_address,
			to_address,
			vault_address,
			slippage: self.slippage,
		})
	}

	pub fn is_valid(&self) -> bool {
		self.validate().is_ok()
	}
}

impl ValidatedRouteRequest {
	pub fn key(&self) -> RouteRequestKey {
		RouteRequestKey {
			from_chain_id: self.from_token.chain_id,
			from_token: self.from_token.normalized_address(),
			to_chain_id: self.to_token.chain_id,
			to_token: self.to_token.normalized_address(),
			from_amount: self.from_amount.normalized(),
			from_address: self.from_address.to_lowercase(),
			to_address: self.to_address.to_lowercase(),
			vault_address: self.vault_address.as_ref().map(|v| v.to_lowercase()),
			slippage_bps: self.slippage.map(|s| (s * 10_000.0).round() as u32),
		}
	}

	pub fn is_cross_chain(&self) -> bool {
		self.from_token.chain_id != self.to_token.chain_id
	}
}

fn missing(field: &str) -> RequestValidationError {
	RequestValidationError::MissingRequiredField {
		field: field.to_string(),
	}
}

fn non_empty(value: &Option<String>) -> Option<String> {
	value
		.as_ref()
		.map(|v| v.trim().to_string())
		.filter(|v| !v.is_empty())
}

fn check_address(value: &str, field: &str) -> RequestValidationResult<()> {
	if is_valid_evm_address(value) {
		Ok(())
	} else {
		Err(RequestValidationError::InvalidAddress {
			field: field.to_string(),
			value: value.to_string(),
		})
	}
}

fn check_token(token: &TokenRef, field: &str) -> RequestValidationResult<()> {
	if token.chain_id == 0 {
		return Err(RequestValidationError::InvalidChainId {
			field: field.to_string(),
		});
	}
	check_address(&token.address, field)
}
