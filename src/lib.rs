//! Kite Router Library
//!
//! Deposit orchestrator for ENS-addressed cross-chain transfers: resolves the
//! recipient's profile, acquires routes from the routing vendor (composing a
//! vault deposit when the recipient asks for one), drives execution and keeps
//! a local transaction history.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

// Core domain types
pub use kite_types::{
	chrono, serde_json, AdapterError, BalanceProvider, EnsProfile, EnsResolver, ExecutionError,
	ExecutionProgress, HistoryEntry, Route, RouteAcquisition, RouteError, RouteExecutor,
	RouteRequest, RoutingClient, TokenRef, UserPrompt, WalletClient,
};

// Service layer
pub use kite_service::{
	BalanceService, ExecutionReport, ExecutionService, FetchOutcome, KnownVault, ProfileService,
	Recipient, RouteFetcher, RouteService, RouteState, VaultRegistry,
};

// Storage layer
pub use kite_storage::{JsonFileStore, KeyValueStore, MemoryStore, TransactionHistory};

// API layer
pub use kite_api::{create_router, AppState};

// Adapters
pub use kite_adapters::{
	AlchemyBalanceProvider, ClientCache, Erc4626Probe, JsonRpcClient, LifiAdapter, LifiConfig,
	LifiExecutor, RpcEnsResolver, RpcProviders,
};

// Config
pub use kite_config::{
	load_config, log_service_info, log_service_shutdown, log_startup_complete, LogFormat, Settings,
};

pub mod types {
	pub use kite_types::*;
}

pub mod service {
	pub use kite_service::*;
}

pub mod adapters {
	pub use kite_adapters::*;
}

pub mod config {
	pub use kite_config::*;
}

pub use async_trait;

/// How often idle HTTP clients are evicted from the shared cache
const CLIENT_CACHE_SWEEP: Duration = Duration::from_secs(5 * 60);

/// Fully wired components, built once from [`Settings`]
///
/// Every vendor client is constructed here and handed to the services that
/// need it; nothing is created lazily behind a global.
#[derive(Clone)]
pub struct Kite {
	pub settings: Settings,
	pub route_service: Arc<RouteService>,
	pub balance_service: Arc<BalanceService>,
	pub profile_service: Arc<ProfileService>,
	pub history: TransactionHistory,
	pub executor: Arc<dyn RouteExecutor>,
	pub vault_probe: Option<Arc<dyn kite_types::VaultProbe>>,
	pub client_cache: ClientCache,
}

impl Kite {
	/// Debounced route fetcher for one interactive session
	pub fn route_fetcher(&self) -> RouteFetcher {
		RouteFetcher::with_debounce(
			Arc::clone(&self.route_service),
			Duration::from_millis(self.settings.routing.debounce_ms),
		)
	}

	/// Execution service bound to the user's wallet
	pub fn execution_service(&self, wallet: Arc<dyn WalletClient>) -> ExecutionService {
		ExecutionService::new(Arc::clone(&self.executor), wallet).with_history(self.history.clone())
	}

	pub fn app_state(&self) -> AppState {
		AppState {
			route_service: Arc::clone(&self.route_service),
			balance_service: Arc::clone(&self.balance_service),
			profile_service: Arc::clone(&self.profile_service),
			vault_probe: self.vault_probe.clone(),
			default_chain_id: self.settings.routing.default_chain_id,
		}
	}
}

/// Builder wiring settings and collaborators into a [`Kite`] instance
///
/// Collaborators not supplied explicitly are built from the settings.
#[derive(Default)]
pub struct KiteBuilder {
	settings: Option<Settings>,
	routing_client: Option<Arc<dyn RoutingClient>>,
	executor: Option<Arc<dyn RouteExecutor>>,
	ens_resolver: Option<Arc<dyn EnsResolver>>,
	balance_provider: Option<Arc<dyn BalanceProvider>>,
	store: Option<Arc<dyn KeyValueStore>>,
	vault_probe: Option<Arc<dyn kite_types::VaultProbe>>,
}

impl KiteBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_settings(mut self, settings: Settings) -> Self {
		self.settings = Some(settings);
		self
	}

	pub fn settings(&self) -> Option<&Settings> {
		self.settings.as_ref()
	}

	pub fn with_routing_client(mut self, client: Arc<dyn RoutingClient>) -> Self {
		self.routing_client = Some(client);
		self
	}

	pub fn with_executor(mut self, executor: Arc<dyn RouteExecutor>) -> Self {
		self.executor = Some(executor);
		self
	}

	pub fn with_ens_resolver(mut self, resolver: Arc<dyn EnsResolver>) -> Self {
		self.ens_resolver = Some(resolver);
		self
	}

	pub fn with_balance_provider(mut self, provider: Arc<dyn BalanceProvider>) -> Self {
		self.balance_provider = Some(provider);
		self
	}

	pub fn with_vault_probe(mut self, probe: Arc<dyn kite_types::VaultProbe>) -> Self {
		self.vault_probe = Some(probe);
		self
	}

	/// Key-value store backing the transaction history
	pub fn with_store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
		self.store = Some(store);
		self
	}

	/// Initialize tracing with configuration-based settings
	fn init_tracing_from_settings(settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
		let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
			.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&settings.logging.level));
		let structured = settings.logging.structured;

		let result = match settings.logging.format {
			LogFormat::Json => tracing_subscriber::fmt()
				.json()
				.with_env_filter(env_filter)
				.with_target(structured)
				.with_thread_ids(structured)
				.try_init(),
			LogFormat::Pretty => tracing_subscriber::fmt()
				.pretty()
				.with_env_filter(env_filter)
				.with_target(structured)
				.with_thread_ids(structured)
				.try_init(),
			LogFormat::Compact => tracing_subscriber::fmt()
				.compact()
				.with_env_filter(env_filter)
				.with_target(structured)
				.with_thread_ids(structured)
				.try_init(),
		};
		result.map_err(|e| format!("Failed to initialize tracing: {}", e))?;

		info!(
			"Logging configuration applied: level={}, format={:?}, structured={}",
			settings.logging.level, settings.logging.format, settings.logging.structured
		);
		Ok(())
	}

	/// Build every component from the settings and injected collaborators
	pub fn build(self) -> Result<Kite, Box<dyn std::error::Error>> {
		let settings = self.settings.unwrap_or_default();
		settings
			.validate()
			.map_err(|e| format!("Invalid configuration: {}", e))?;

		let client_cache = ClientCache::new();
		let rpc_urls = settings.rpc_urls()?;
		let rpc = RpcProviders::new(&rpc_urls, &client_cache)?;

		let lifi = Arc::new(LifiAdapter::new(
			LifiConfig {
				endpoint: settings.lifi.endpoint.clone(),
				api_key: settings
					.get_lifi_api_key()
					.map_err(|e| format!("Failed to resolve LI.FI API key: {}", e))?,
				integrator: settings.lifi.integrator.clone(),
				order: settings.routing.order.clone(),
				default_slippage: settings.lifi.default_slippage,
				request_timeout_ms: settings.lifi.request_timeout_ms,
				status_poll_interval_ms: settings.lifi.status_poll_interval_ms,
			},
			client_cache.clone(),
		));

		let routing_client = self
			.routing_client
			.unwrap_or_else(|| Arc::clone(&lifi) as Arc<dyn RoutingClient>);
		let executor = self.executor.unwrap_or_else(|| {
			Arc::new(LifiExecutor::new(Arc::clone(&lifi)).with_rpc(rpc.clone()))
				as Arc<dyn RouteExecutor>
		});

		let ens_resolver = match self.ens_resolver {
			Some(resolver) => resolver,
			None => {
				let url = settings
					.get_ens_rpc_url()
					.map_err(|e| format!("Failed to resolve ENS RPC URL: {}", e))?;
				Arc::new(RpcEnsResolver::new(JsonRpcClient::new(url, &client_cache)?)?)
					as Arc<dyn EnsResolver>
			},
		};

		let balance_service = match self.balance_provider {
			Some(provider) => BalanceService::new(provider),
			None => match settings.get_balance_api_key() {
				Some(key) => BalanceService::new(Arc::new(AlchemyBalanceProvider::new(
					key,
					settings.balance_networks()?,
					client_cache.clone(),
				))),
				None => {
					warn!("No balance API key configured, balance lookups are disabled");
					BalanceService::unconfigured()
				},
			},
		};

		let vault_probe = self.vault_probe.or_else(|| {
			(!rpc_urls.is_empty())
				.then(|| Arc::new(Erc4626Probe::new(rpc)) as Arc<dyn kite_types::VaultProbe>)
		});

		let vaults = VaultRegistry::new(
			settings
				.vaults
				.iter()
				.map(|v| KnownVault {
					chain_id: v.chain_id,
					address: v.address.clone(),
					name: v.name.clone(),
					asset_symbol: v.asset_symbol.clone(),
				})
				.collect(),
		);
		let kite_safes: HashMap<u64, String> = settings
			.kite_safe
			.iter()
			.map(|s| (s.chain_id, s.address.clone()))
			.collect();

		let store = match self.store {
			Some(store) => store,
			None => match &settings.history.path {
				Some(path) => Arc::new(JsonFileStore::new(path)) as Arc<dyn KeyValueStore>,
				None => Arc::new(MemoryStore::new()) as Arc<dyn KeyValueStore>,
			},
		};

		info!(
			"Initialized with {} known vault(s) and {} KiteSafe deployment(s)",
			vaults.len(),
			kite_safes.len()
		);

		Ok(Kite {
			route_service: Arc::new(RouteService::new(routing_client, vaults, kite_safes)),
			balance_service: Arc::new(balance_service),
			profile_service: Arc::new(ProfileService::new(ens_resolver)),
			history: TransactionHistory::new(store),
			executor,
			vault_probe,
			client_cache,
			settings,
		})
	}

	/// Build and return the router with its state
	pub fn start(self) -> Result<(axum::Router, Kite), Box<dyn std::error::Error>> {
		let kite = self.build()?;
		let router = create_router().with_state(kite.app_state());
		Ok((router, kite))
	}

	/// Start the complete server: .env, configuration, tracing, HTTP listener
	pub async fn start_server(mut self) -> Result<(), Box<dyn std::error::Error>> {
		dotenvy::dotenv().ok();

		let using_provided_settings = self.settings.is_some();
		let settings = match self.settings.take() {
			Some(settings) => settings,
			None => load_config().map_err(|e| format!("Failed to load configuration: {}", e))?,
		};

		Self::init_tracing_from_settings(&settings)?;
		log_service_info(&settings);
		info!(
			"Using configuration: loaded from {}",
			if using_provided_settings {
				"provided settings"
			} else {
				"config file, environment or defaults"
			}
		);

		let bind_addr = settings.bind_address();
		let addr: SocketAddr = bind_addr
			.parse()
			.map_err(|e| format!("Invalid bind address '{}': {}", bind_addr, e))?;

		let (app, kite) = self.with_settings(settings).start()?;

		let cache = kite.client_cache.clone();
		tokio::spawn(async move {
			let mut interval = tokio::time::interval(CLIENT_CACHE_SWEEP);
			loop {
				interval.tick().await;
				let removed = cache.cleanup_expired();
				if removed > 0 {
					info!("Evicted {} idle HTTP client(s)", removed);
				}
			}
		});

		let listener = tokio::net::TcpListener::bind(addr).await?;
		log_startup_complete(&bind_addr);
		info!("API endpoints available:");
		info!("  GET  /health");
		info!("  POST /api/tokens/balances");
		info!("  GET  /api/profiles/{{name}}");
		info!("  POST /api/routes");

		axum::serve(listener, app)
			.with_graceful_shutdown(async {
				if let Err(e) = tokio::signal::ctrl_c().await {
					warn!("Failed to listen for shutdown signal: {}", e);
				}
				log_service_shutdown();
			})
			.await?;

		Ok(())
	}
}
