//! Kite Adapters
//!
//! Vendor adapters for the Kite deposit router: the LI.FI routing and
//! execution client, JSON-RPC based ENS resolution and vault probing, and the
//! Alchemy balance provider.

pub mod alchemy;
pub mod client_cache;
pub mod ens;
pub mod lifi;
pub mod rpc;
pub mod vault_probe;

pub use alchemy::AlchemyBalanceProvider;
pub use client_cache::{AuthConfig, ClientCache, ClientConfig};
pub use ens::{encode_set_text, namehash, RpcEnsResolver, ENS_REGISTRY};
pub use lifi::{LifiAdapter, LifiConfig, LifiExecutor};
pub use rpc::{JsonRpcClient, RpcProviders};
pub use vault_probe::Erc4626Probe;
pub use kite_types::{AdapterError, AdapterResult};
