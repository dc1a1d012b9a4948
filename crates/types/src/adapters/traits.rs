//! Collaborator traits: routing vendor, wallet, ENS, balances

use async_trait::async_trait;
use std::fmt::Debug;

use super::{
	AdapterResult, ComposerQuoteRequest, RawTokenBalance, StepUpdate, TokenMetadata,
	TransactionRequest,
};
use crate::execution::{ExecutionError, WalletError};
use crate::models::{Token, TokenAmount};
use crate::routes::{Route, ValidatedRouteRequest};

/// Routing vendor quoting surface
///
/// Implementations are constructed once at startup and injected wherever routes
/// are needed; there is no global client.
#[async_trait]
pub trait RoutingClient: Send + Sync + Debug {
	/// General multi-route request (plain transfer to the recipient)
	async fn get_routes(&self, request: &ValidatedRouteRequest) -> AdapterResult<Vec<Route>>;

	/// Single composer quote whose destination is a vault deposit
	async fn get_composer_quote(&self, request: &ComposerQuoteRequest) -> AdapterResult<Route>;

	/// Look up token metadata by address or symbol
	async fn get_token(&self, chain_id: u64, token: &str) -> AdapterResult<Token>;
}

/// Callbacks the vendor execution primitive invokes while driving a route
#[async_trait]
pub trait ExecutionHooks: Send + Sync {
	/// Generic per-step progress report
	fn update_route(&self, update: StepUpdate);

	/// Wallet is on the wrong chain; must not return until the switch completed
	async fn switch_chain(&self, chain_id: u64) -> Result<(), ExecutionError>;

	/// Quoted output changed mid-execution; `false` aborts the execution
	async fn accept_exchange_rate_update(
		&self,
		step_index: usize,
		old_to_amount: &TokenAmount,
		new_to_amount: &TokenAmount,
	) -> bool;
}

/// Vendor execution primitive
#[async_trait]
pub trait RouteExecutor: Send + Sync + Debug {
	/// Execute every step of `route` in order, reporting through `hooks`
	async fn execute_route(
		&self,
		route: &Route,
		wallet: &dyn WalletClient,
		hooks: &dyn ExecutionHooks,
	) -> Result<(), ExecutionError>;
}

/// Connected wallet
#[async_trait]
pub trait WalletClient: Send + Sync {
	fn address(&self) -> String;

	async fn chain_id(&self) -> Result<u64, WalletError>;

	async fn switch_chain(&self, chain_id: u64) -> Result<(), WalletError>;

	/// Sign and broadcast; returns the transaction hash
	async fn send_transaction(&self, tx: &TransactionRequest) -> Result<String, WalletError>;

	/// Wait for inclusion; `Ok(false)` means the transaction reverted
	async fn wait_for_transaction(&self, chain_id: u64, tx_hash: &str) -> Result<bool, WalletError>;
}

/// ENS-aware read client
#[async_trait]
pub trait EnsResolver: Send + Sync + Debug {
	async fn resolve_address(&self, name: &str) -> AdapterResult<Option<String>>;

	async fn text(&self, name: &str, key: &str) -> AdapterResult<Option<String>>;
}

/// Third-party token balance provider
#[async_trait]
pub trait BalanceProvider: Send + Sync + Debug {
	fn supports_chain(&self, chain_id: u64) -> bool;

	async fn token_balances(
		&self,
		address: &str,
		chain_id: u64,
	) -> AdapterResult<Vec<RawTokenBalance>>;

	async fn token_metadata(&self, chain_id: u64, token: &str) -> AdapterResult<TokenMetadata>;
}

/// On-chain ERC-4626 compliance probe; informational only
#[async_trait]
pub trait VaultProbe: Send + Sync + Debug {
	async fn is_erc4626(&self, chain_id: u64, vault: &str) -> AdapterResult<bool>;
}
