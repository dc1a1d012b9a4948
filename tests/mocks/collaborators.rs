//! Mock wallet, user prompt, ENS resolver and balance provider

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use kite_router::async_trait::async_trait;
use kite_router::types::{
	AdapterResult, RateChange, RawTokenBalance, TokenMetadata, TransactionRequest, WalletError,
};
use kite_router::{AdapterError, BalanceProvider, EnsResolver, UserPrompt, WalletClient};

use super::fixtures::USER;

/// Wallet on a configurable chain that records switch requests
#[derive(Debug)]
pub struct MockWallet {
	chain_id: Mutex<u64>,
	pub switches: Mutex<Vec<u64>>,
	pub refuse_switch: bool,
}

impl MockWallet {
	pub fn on_chain(chain_id: u64) -> Self {
		Self {
			chain_id: Mutex::new(chain_id),
			switches: Mutex::new(Vec::new()),
			refuse_switch: false,
		}
	}

	pub fn refusing_switch(chain_id: u64) -> Self {
		Self {
			refuse_switch: true,
			..Self::on_chain(chain_id)
		}
	}

	pub fn current_chain(&self) -> u64 {
		*self.chain_id.lock().unwrap()
	}
}

#[async_trait]
impl WalletClient for MockWallet {
	fn address(&self) -> String {
		USER.to_string()
	}

	async fn chain_id(&self) -> Result<u64, WalletError> {
		Ok(self.current_chain())
	}

	async fn switch_chain(&self, chain_id: u64) -> Result<(), WalletError> {
		self.switches.lock().unwrap().push(chain_id);
		if self.refuse_switch {
			return Err(WalletError::Rejected {
				reason: "User rejected the request.".to_string(),
			});
		}
		*self.chain_id.lock().unwrap() = chain_id;
		Ok(())
	}

	async fn send_transaction(&self, _tx: &TransactionRequest) -> Result<String, WalletError> {
		Ok(super::fixtures::tx_hash(99))
	}

	async fn wait_for_transaction(&self, _chain_id: u64, _tx_hash: &str) -> Result<bool, WalletError> {
		Ok(true)
	}
}

/// Prompt answering every rate change the same way
#[derive(Debug)]
pub struct MockPrompt {
	accept: bool,
	pub asked: Mutex<Vec<RateChange>>,
}

impl MockPrompt {
	pub fn accepting() -> Self {
		Self {
			accept: true,
			asked: Mutex::new(Vec::new()),
		}
	}

	pub fn rejecting() -> Self {
		Self {
			accept: false,
			asked: Mutex::new(Vec::new()),
		}
	}

	pub fn times_asked(&self) -> usize {
		self.asked.lock().unwrap().len()
	}
}

#[async_trait]
impl UserPrompt for MockPrompt {
	async fn confirm_rate_change(&self, change: &RateChange) -> bool {
		self.asked.lock().unwrap().push(change.clone());
		self.accept
	}
}

/// ENS resolver backed by in-memory names and text records
#[derive(Debug, Default)]
pub struct MockEnsResolver {
	addresses: HashMap<String, String>,
	records: HashMap<(String, String), String>,
	pub fail: bool,
}

impl MockEnsResolver {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_name(mut self, name: &str, address: &str) -> Self {
		self.addresses.insert(name.to_string(), address.to_string());
		self
	}

	pub fn with_text(mut self, name: &str, key: &str, value: &str) -> Self {
		self.records
			.insert((name.to_string(), key.to_string()), value.to_string());
		self
	}

	fn check(&self) -> AdapterResult<()> {
		if self.fail {
			Err(AdapterError::RpcError {
				code: -32603,
				message: "upstream unavailable".to_string(),
			})
		} else {
			Ok(())
		}
	}
}

#[async_trait]
impl EnsResolver for MockEnsResolver {
	async fn resolve_address(&self, name: &str) -> AdapterResult<Option<String>> {
		self.check()?;
		Ok(self.addresses.get(name).cloned())
	}

	async fn text(&self, name: &str, key: &str) -> AdapterResult<Option<String>> {
		self.check()?;
		Ok(self
			.records
			.get(&(name.to_string(), key.to_string()))
			.cloned())
	}
}

/// Balance provider for a fixed set of chains
#[derive(Debug, Default)]
pub struct MockBalanceProvider {
	chains: Vec<u64>,
	balances: Vec<RawTokenBalance>,
	metadata: HashMap<String, TokenMetadata>,
	pub metadata_calls: AtomicUsize,
}

impl MockBalanceProvider {
	pub fn for_chains(chains: &[u64]) -> Self {
		Self {
			chains: chains.to_vec(),
			..Self::default()
		}
	}

	pub fn with_balance(mut self, token: &str, balance: &str, metadata: Option<TokenMetadata>) -> Self {
		self.balances.push(RawTokenBalance {
			contract_address: token.to_string(),
			balance: balance.into(),
		});
		if let Some(metadata) = metadata {
			self.metadata.insert(token.to_string(), metadata);
		}
		self
	}
}

#[async_trait]
impl BalanceProvider for MockBalanceProvider {
	fn supports_chain(&self, chain_id: u64) -> bool {
		self.chains.contains(&chain_id)
	}

	async fn token_balances(&self, _address: &str, _chain_id: u64) -> AdapterResult<Vec<RawTokenBalance>> {
		Ok(self.balances.clone())
	}

	async fn token_metadata(&self, _chain_id: u64, token: &str) -> AdapterResult<TokenMetadata> {
		self.metadata_calls.fetch_add(1, Ordering::SeqCst);
		self.metadata
			.get(token)
			.cloned()
			.ok_or_else(|| AdapterError::NotFound {
				what: format!("metadata for {}", token),
			})
	}
}
