//! ERC-4626 compliance probe
//!
//! Informational only: callers use it to warn about a misconfigured deposit
//! target, never to decide whether the vault route is taken.

use alloy_primitives::Address;
use alloy_sol_types::{sol, SolCall};
use async_trait::async_trait;
use kite_types::{AdapterResult, VaultProbe};
use tracing::debug;

use crate::rpc::{parse_address, RpcProviders};

sol! {
	interface IERC4626 {
		function asset() external view returns (address);
		function totalAssets() external view returns (uint256);
	}
}

#[derive(Debug, Clone)]
pub struct Erc4626Probe {
	providers: RpcProviders,
}

impl Erc4626Probe {
	pub fn new(providers: RpcProviders) -> Self {
		Self { providers }
	}
}

#[async_trait]
impl VaultProbe for Erc4626Probe {
	/// True when both `asset()` and `totalAssets()` answer with well-formed values
	async fn is_erc4626(&self, chain_id: u64, vault: &str) -> AdapterResult<bool> {
		let rpc = self.providers.get(chain_id)?;
		let vault = parse_address(vault)?;

		let asset = match rpc
			.eth_call(vault, IERC4626::assetCall {}.abi_encode().into())
			.await
		{
			Ok(raw) => IERC4626::assetCall::abi_decode_returns(&raw, true).ok(),
			Err(e) => {
				debug!("asset() probe failed for {}: {}", vault, e);
				None
			},
		};
		let Some(asset) = asset.map(|r| r._0) else {
			return Ok(false);
		};
		if asset == Address::ZERO {
			return Ok(false);
		}

		let total_assets = match rpc
			.eth_call(vault, IERC4626::totalAssetsCall {}.abi_encode().into())
			.await
		{
			Ok(raw) => IERC4626::totalAssetsCall::abi_decode_returns(&raw, true).is_ok(),
			Err(e) => {
				debug!("totalAssets() probe failed for {}: {}", vault, e);
				false
			},
		};

		Ok(total_assets)
	}
}
