//! Step-by-step route execution against the LI.FI API
//!
//! For every step: make sure the wallet is on the source chain, grant the
//! token allowance, fetch the transaction from `/advanced/stepTransaction`,
//! confirm any change of the guaranteed output with the user, sign and send,
//! then wait for the source receipt and (for bridges) the `/status` verdict.

use alloy_primitives::{Address, U256};
use alloy_sol_types::{sol, SolCall};
use async_trait::async_trait;
use kite_types::{
	is_zero_address, AdapterError, ExecutionError, ExecutionHooks, Route, RouteExecutor,
	RouteStep, StepUpdate, TransactionRequest, VendorStepStatus, WalletClient,
};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::models::{LifiStatusResponse, LifiStep, LifiTransferStatus};
use super::LifiAdapter;
use crate::rpc::{parse_address, RpcProviders};

sol! {
	interface IERC20 {
		function allowance(address owner, address spender) external view returns (uint256);
		function approve(address spender, uint256 amount) external returns (bool);
	}
}

/// REST implementation of the vendor execution primitive
#[derive(Debug, Clone)]
pub struct LifiExecutor {
	adapter: Arc<LifiAdapter>,
	poll_interval: Duration,
	/// Used to skip approvals that are already in place; without it every
	/// ERC-20 step sends an approval first
	rpc: Option<RpcProviders>,
}

impl LifiExecutor {
	pub fn new(adapter: Arc<LifiAdapter>) -> Self {
		let poll_interval = Duration::from_millis(adapter.config().status_poll_interval_ms);
		Self {
			adapter,
			poll_interval,
			rpc: None,
		}
	}

	pub fn with_rpc(mut self, rpc: RpcProviders) -> Self {
		self.rpc = Some(rpc);
		self
	}

	pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
		self.poll_interval = poll_interval;
		self
	}

	async fn ensure_chain(
		&self,
		chain_id: u64,
		wallet: &dyn WalletClient,
		hooks: &dyn ExecutionHooks,
	) -> Result<(), ExecutionError> {
		let current = wallet.chain_id().await?;
		if current == chain_id {
			return Ok(());
		}

		debug!("Wallet on chain {}, step needs {}", current, chain_id);
		hooks.switch_chain(chain_id).await?;

		let after = wallet.chain_id().await?;
		if after != chain_id {
			return Err(ExecutionError::ChainSwitchFailed {
				chain_id,
				reason: format!("wallet is still on chain {}", after),
			});
		}
		Ok(())
	}

	async fn ensure_allowance(
		&self,
		step_index: usize,
		step: &RouteStep,
		spender: &str,
		wallet: &dyn WalletClient,
	) -> Result<(), ExecutionError> {
		let token = parse_address(&step.from_token.address)?;
		let spender = parse_address(spender)?;
		let owner = parse_address(&wallet.address())?;
		let amount = parse_amount(step)?;

		if let Some(current) = self.current_allowance(step.from_chain_id, token, owner, spender).await {
			if current >= amount {
				debug!("Allowance for step {} already sufficient", step_index);
				return Ok(());
			}
		}

		info!(
			"Approving {} of {} for {} on chain {}",
			amount, step.from_token.symbol, spender, step.from_chain_id
		);
		let approve = IERC20::approveCall { spender, amount };
		let tx = TransactionRequest {
			chain_id: step.from_chain_id,
			to: step.from_token.address.clone(),
			from: Some(wallet.address()),
			data: format!("0x{}", hex::encode(approve.abi_encode())),
			value: None,
			gas_limit: None,
			gas_price: None,
		};

		let hash = wallet.send_transaction(&tx).await?;
		if !wallet.wait_for_transaction(step.from_chain_id, &hash).await? {
			return Err(ExecutionError::StepFailed {
				step_index,
				reason: format!("token approval {} reverted", hash),
			});
		}
		Ok(())
	}

	/// Read the allowance when an RPC endpoint is available; `None` means unknown
	async fn current_allowance(
		&self,
		chain_id: u64,
		token: Address,
		owner: Address,
		spender: Address,
	) -> Option<U256> {
		let rpc = self.rpc.as_ref()?.get(chain_id).ok()?;
		let call = IERC20::allowanceCall { owner, spender };
		match rpc.eth_call(token, call.abi_encode().into()).await {
			Ok(raw) => IERC20::allowanceCall::abi_decode_returns(&raw, true)
				.ok()
				.map(|r| r._0),
			Err(e) => {
				warn!("Allowance lookup failed on chain {}: {}", chain_id, e);
				None
			},
		}
	}

	async fn wait_for_bridge(
		&self,
		step_index: usize,
		step: &RouteStep,
		tx_hash: &str,
		hooks: &dyn ExecutionHooks,
	) -> Result<(), ExecutionError> {
		loop {
			tokio::time::sleep(self.poll_interval).await;

			let status: LifiStatusResponse = self
				.adapter
				.get(
					"status",
					"/status",
					&[
						("txHash", tx_hash.to_string()),
						("bridge", step.tool.clone()),
						("fromChain", step.from_chain_id.to_string()),
						("toChain", step.to_chain_id.to_string()),
					],
				)
				.await?;

			match status.status {
				LifiTransferStatus::Done => {
					let receiving = status.receiving.and_then(|leg| leg.tx_hash);
					hooks.update_route(
						StepUpdate::new(step_index, VendorStepStatus::Done)
							.with_tx_hash(tx_hash)
							.with_receiving_tx_hash(receiving),
					);
					return Ok(());
				},
				LifiTransferStatus::Failed | LifiTransferStatus::Invalid => {
					let reason = status
						.substatus_message
						.or(status.substatus)
						.unwrap_or_else(|| "bridge transfer failed".to_string());
					hooks.update_route(
						StepUpdate::new(step_index, VendorStepStatus::Failed)
							.with_tx_hash(tx_hash)
							.with_message(reason.clone()),
					);
					return Err(ExecutionError::StepFailed { step_index, reason });
				},
				LifiTransferStatus::Pending | LifiTransferStatus::NotFound => {
					debug!("Bridge transfer {} still pending", tx_hash);
				},
			}
		}
	}

	async fn execute_step(
		&self,
		step_index: usize,
		step: &RouteStep,
		wallet: &dyn WalletClient,
		hooks: &dyn ExecutionHooks,
	) -> Result<(), ExecutionError> {
		let quoted = LifiStep::from_value(&step.vendor)?;

		self.ensure_chain(step.from_chain_id, wallet, hooks).await?;
		hooks.update_route(StepUpdate::new(step_index, VendorStepStatus::Pending));

		if let Some(spender) = quoted.estimate.approval_address.as_deref() {
			if !step.from_token.token_ref().is_native() && !is_zero_address(spender) {
				self.ensure_allowance(step_index, step, spender, wallet).await?;
			}
		}

		let prepared_raw: Value = self
			.adapter
			.post("step transaction", "/advanced/stepTransaction", &step.vendor)
			.await?;
		let prepared = LifiStep::from_value(&prepared_raw)?;

		let new_min = &prepared.estimate.to_amount_min;
		if rate_changed(&step.to_amount_min, new_min) {
			info!(
				"Guaranteed output of step {} changed {} -> {}",
				step_index, step.to_amount_min, new_min
			);
			if !hooks
				.accept_exchange_rate_update(step_index, &step.to_amount_min, new_min)
				.await
			{
				return Err(ExecutionError::RateRejected);
			}
		}

		let tx = prepared
			.transaction_request
			.ok_or_else(|| {
				AdapterError::invalid_response("stepTransaction returned no transaction request")
			})?
			.into_transaction(step.from_chain_id);

		hooks.update_route(StepUpdate::new(step_index, VendorStepStatus::ActionRequired));
		let tx_hash = wallet.send_transaction(&tx).await?;
		info!("Step {} submitted: {}", step_index, tx_hash);
		hooks.update_route(
			StepUpdate::new(step_index, VendorStepStatus::Pending).with_tx_hash(tx_hash.clone()),
		);

		if !wallet.wait_for_transaction(step.from_chain_id, &tx_hash).await? {
			hooks.update_route(
				StepUpdate::new(step_index, VendorStepStatus::Failed)
					.with_tx_hash(tx_hash.clone())
					.with_message("transaction reverted"),
			);
			return Err(ExecutionError::StepFailed {
				step_index,
				reason: format!("transaction {} reverted", tx_hash),
			});
		}

		if step.is_cross_chain() {
			self.wait_for_bridge(step_index, step, &tx_hash, hooks).await
		} else {
			hooks.update_route(
				StepUpdate::new(step_index, VendorStepStatus::Done).with_tx_hash(tx_hash),
			);
			Ok(())
		}
	}
}

#[async_trait]
impl RouteExecutor for LifiExecutor {
	async fn execute_route(
		&self,
		route: &Route,
		wallet: &dyn WalletClient,
		hooks: &dyn ExecutionHooks,
	) -> Result<(), ExecutionError> {
		if !route.is_executable() {
			return Err(ExecutionError::NotExecutable);
		}

		for (index, step) in route.steps.iter().enumerate() {
			debug!(
				"Executing step {}/{} ({}) of route {}",
				index + 1,
				route.steps.len(),
				step.kind.label(),
				route.id
			);
			self.execute_step(index, step, wallet, hooks).await?;
		}
		Ok(())
	}
}

fn parse_amount(step: &RouteStep) -> Result<U256, ExecutionError> {
	U256::from_str_radix(step.from_amount.as_str(), 10).map_err(|e| {
		ExecutionError::Vendor(AdapterError::invalid_response(format!(
			"invalid step amount '{}': {}",
			step.from_amount, e
		)))
	})
}

/// Any difference in the guaranteed minimum counts, regardless of direction
fn rate_changed(quoted: &kite_types::TokenAmount, refreshed: &kite_types::TokenAmount) -> bool {
	quoted.normalized() != refreshed.normalized()
}
