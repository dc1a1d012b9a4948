//! Kite Types
//!
//! Shared models and traits for the Kite deposit router.
//! This crate contains all domain models organized by business entity.

pub mod adapters;
pub mod balances;
pub mod execution;
pub mod format;
pub mod history;
pub mod kv;
pub mod models;
pub mod profiles;
pub mod routes;

// Re-export chrono and serde_json for convenience
pub use chrono;
pub use serde_json;

pub use adapters::{
	AdapterError, AdapterResult, BalanceProvider, ComposerQuoteRequest, ContractCall,
	EnsResolver, ExecutionHooks, RawTokenBalance, RouteExecutor, RoutingClient, StepUpdate,
	TokenMetadata, TransactionRequest, VaultProbe, VendorRuntimeConfig, VendorStepStatus,
	WalletClient,
};

pub use balances::{BalanceError, BalanceRequest, BalanceResponse, TokenBalance};

pub use execution::{
	ExecutionError, ExecutionEvent, ExecutionPhase, ExecutionProgress, HashRole, RateChange,
	StepProgress, StepStatus, TransactionHashes, UserPrompt, WalletError,
};

pub use history::{HistoryEntry, HistoryStatus, HISTORY_STORAGE_KEY, MAX_HISTORY_ENTRIES};

pub use kv::{KeyValueStore, StorageError, StorageResult};

pub use models::{
	addresses_equal, chain_id_from_name, chain_name, is_valid_evm_address, is_zero_address,
	SecretString, Token, TokenAmount, TokenRef, ZERO_ADDRESS,
};

pub use profiles::{
	EnsProfile, ProfileError, ProfileUpdate, KITE_TEXT_KEYS, TEXT_DEPOSIT_TARGET,
	TEXT_PREFERRED_CHAIN, TEXT_PREFERRED_TOKEN,
};

pub use routes::{
	sort_routes_by_best, RequestValidationError, RequestValidationResult, Route,
	RouteAcquisition, RouteError, RouteRequest, RouteRequestKey, RouteResult, RouteSource,
	RouteStep, StepKind, ValidatedRouteRequest,
};
