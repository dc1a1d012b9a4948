//! Kite Service
//!
//! Route acquisition, the vault-deposit decision, deposit calldata, execution
//! progress, balances and ENS profiles.

pub mod balance;
pub mod calldata;
pub mod execution;
pub mod fetcher;
pub mod profile;
pub mod route;
pub mod vault;

pub use balance::BalanceService;
pub use calldata::{build_contract_call, encode_safe_deposit_for, DEPOSIT_GAS_LIMIT};
pub use execution::{ExecutionReport, ExecutionService, Recipient};
pub use fetcher::{FetchOutcome, RouteFetcher, RouteState, DEFAULT_DEBOUNCE};
pub use profile::{ProfileService, ENS_CHAIN_ID};
pub use route::RouteService;
pub use vault::{
	deposit_banner, resolve_destination_chain, should_use_vault_composer, DepositBanner,
	KnownVault, VaultRegistry,
};
