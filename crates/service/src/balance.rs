//! Token balances for the balance endpoint

use std::sync::Arc;

use futures::future::join_all;
use kite_types::format::format_token_amount;
use kite_types::{
	is_valid_evm_address, BalanceError, BalanceProvider, BalanceRequest, BalanceResponse,
	TokenBalance, TokenMetadata,
};
use tracing::{debug, warn};

/// Fraction digits shown in `formatted_balance`
const DISPLAY_FRACTION_DIGITS: usize = 4;

#[derive(Debug, Clone, Default)]
pub struct BalanceService {
	provider: Option<Arc<dyn BalanceProvider>>,
}

impl BalanceService {
	pub fn new(provider: Arc<dyn BalanceProvider>) -> Self {
		Self {
			provider: Some(provider),
		}
	}

	/// Service without a provider; every lookup fails with [`BalanceError::NotConfigured`]
	pub fn unconfigured() -> Self {
		Self::default()
	}

	pub fn is_configured(&self) -> bool {
		self.provider.is_some()
	}

	/// Non-zero token balances held by `address` on `chain_id`
	///
	/// Tokens whose metadata cannot be fetched are still listed, with
	/// placeholder metadata.
	pub async fn balances(&self, request: &BalanceRequest) -> Result<BalanceResponse, BalanceError> {
		let address = request
			.address
			.as_deref()
			.map(str::trim)
			.filter(|a| !a.is_empty())
			.ok_or_else(|| BalanceError::MissingField {
				field: "address".to_string(),
			})?;
		let chain_id = request.chain_id.ok_or_else(|| BalanceError::MissingField {
			field: "chainId".to_string(),
		})?;

		if !is_valid_evm_address(address) {
			return Err(BalanceError::InvalidAddress {
				address: address.to_string(),
			});
		}

		let provider = self.provider.as_ref().ok_or(BalanceError::NotConfigured)?;
		if !provider.supports_chain(chain_id) {
			return Err(BalanceError::UnsupportedChain { chain_id });
		}

		let raw = provider.token_balances(address, chain_id).await?;
		let held: Vec<_> = raw.into_iter().filter(|b| !b.balance.is_zero()).collect();
		debug!("{} holds {} token(s) on chain {}", address, held.len(), chain_id);

		let metadata = join_all(held.iter().map(|balance| {
			let provider = Arc::clone(provider);
			let token = balance.contract_address.clone();
			async move {
				match provider.token_metadata(chain_id, &token).await {
					Ok(metadata) => metadata,
					Err(e) => {
						warn!("Metadata lookup for {} on chain {} failed: {}", token, chain_id, e);
						TokenMetadata::unknown()
					},
				}
			}
		}))
		.await;

		let tokens = held
			.into_iter()
			.zip(metadata)
			.map(|(balance, metadata)| TokenBalance {
				formatted_balance: format_token_amount(
					balance.balance.as_str(),
					metadata.decimals,
					DISPLAY_FRACTION_DIGITS,
				),
				address: balance.contract_address,
				symbol: metadata.symbol,
				name: metadata.name,
				decimals: metadata.decimals,
				balance: balance.balance,
				logo: metadata.logo,
			})
			.collect();

		Ok(BalanceResponse { tokens })
	}
}
