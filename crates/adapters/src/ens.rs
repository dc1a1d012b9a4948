//! ENS resolution over JSON-RPC `eth_call`

use alloy_primitives::{keccak256, Address, B256};
use alloy_sol_types::{sol, SolCall};
use async_trait::async_trait;
use kite_types::{AdapterError, AdapterResult, EnsResolver};
use tracing::debug;

use crate::rpc::{parse_address, JsonRpcClient};

/// ENS registry, same address on mainnet and testnets
pub const ENS_REGISTRY: &str = "0x00000000000C2E074eC69A0dFb2997BA6C7d2e1e";

sol! {
	interface IEnsRegistry {
		function resolver(bytes32 node) external view returns (address);
	}

	interface IEnsResolver {
		function addr(bytes32 node) external view returns (address);
		function text(bytes32 node, string key) external view returns (string);
		function setText(bytes32 node, string key, string value) external;
	}
}

/// EIP-137 namehash; labels are lower-cased, no further normalization
pub fn namehash(name: &str) -> B256 {
	let mut node = B256::ZERO;
	let name = name.trim().to_lowercase();
	if name.is_empty() {
		return node;
	}
	for label in name.rsplit('.') {
		let label_hash = keccak256(label.as_bytes());
		let mut buf = [0u8; 64];
		buf[..32].copy_from_slice(node.as_slice());
		buf[32..].copy_from_slice(label_hash.as_slice());
		node = keccak256(buf);
	}
	node
}

/// Calldata for `setText(node, key, value)` on a public resolver
pub fn encode_set_text(name: &str, key: &str, value: &str) -> Vec<u8> {
	IEnsResolver::setTextCall {
		node: namehash(name),
		key: key.to_string(),
		value: value.to_string(),
	}
	.abi_encode()
}

/// Mainnet ENS resolver backed by a JSON-RPC endpoint
#[derive(Debug, Clone)]
pub struct RpcEnsResolver {
	rpc: JsonRpcClient,
	registry: Address,
}

impl RpcEnsResolver {
	pub fn new(rpc: JsonRpcClient) -> AdapterResult<Self> {
		Ok(Self {
			rpc,
			registry: parse_address(ENS_REGISTRY)?,
		})
	}

	/// Resolver contract for `name`, or `None` when unset
	pub async fn resolver_address(&self, name: &str) -> AdapterResult<Option<Address>> {
		let call = IEnsRegistry::resolverCall { node: namehash(name) };
		let raw = self.rpc.eth_call(self.registry, call.abi_encode().into()).await?;
		let resolver = IEnsRegistry::resolverCall::abi_decode_returns(&raw, true)
			.map_err(|e| AdapterError::Abi(e.to_string()))?
			._0;
		Ok((resolver != Address::ZERO).then_some(resolver))
	}
}

#[async_trait]
impl EnsResolver for RpcEnsResolver {
	async fn resolve_address(&self, name: &str) -> AdapterResult<Option<String>> {
		let Some(resolver) = self.resolver_address(name).await? else {
			debug!("No resolver set for {}", name);
			return Ok(None);
		};

		let call = IEnsResolver::addrCall { node: namehash(name) };
		let raw = self.rpc.eth_call(resolver, call.abi_encode().into()).await?;
		let address = IEnsResolver::addrCall::abi_decode_returns(&raw, true)
			.map_err(|e| AdapterError::Abi(e.to_string()))?
			._0;

		Ok((address != Address::ZERO).then(|| address.to_checksum(None)))
	}

	async fn text(&self, name: &str, key: &str) -> AdapterResult<Option<String>> {
		let Some(resolver) = self.resolver_address(name).await? else {
			return Ok(None);
		};

		let call = IEnsResolver::textCall {
			node: namehash(name),
			key: key.to_string(),
		};
		let raw = self.rpc.eth_call(resolver, call.abi_encode().into()).await?;
		let value = IEnsResolver::textCall::abi_decode_returns(&raw, true)
			.map_err(|e| AdapterError::Abi(e.to_string()))?
			._0;

		let value = value.trim().to_string();
		Ok((!value.is_empty()).then_some(value))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_namehash_vectors() {
		assert_eq!(namehash(""), B256::ZERO);
		let eth: B256 = "0x93cdeb708b7545dc668eb9280176169d1c33cfd8ed6f04690a0bcc88a93fc4ae"
			.parse()
			.unwrap();
		let foo_eth: B256 = "0xde9b09fd7c5f901e23a3f19fecc54828e9c848539801e86591bd9801b019f84f"
			.parse()
			.unwrap();
		assert_eq!(namehash("eth"), eth);
		assert_eq!(namehash("foo.eth"), foo_eth);
	}

	#[test]
	fn test_namehash_is_case_insensitive() {
		assert_eq!(namehash("Foo.ETH"), namehash("foo.eth"));
	}

	#[test]
	fn test_set_text_selector() {
		let data = encode_set_text("alice.eth", "kite.preferred_chain", "8453");
		// setText(bytes32,string,string)
		assert_eq!(&data[..4], &[0x10, 0xf1, 0x3a, 0x8c]);
	}
}
