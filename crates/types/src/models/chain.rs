//! Chain identifiers the deposit flow knows by name

/// (chain id, canonical name, aliases)
const CHAINS: &[(u64, &str, &[&str])] = &[
	(1, "Ethereum", &["ethereum", "mainnet", "eth"]),
	(10, "Optimism", &["optimism", "op"]),
	(56, "BNB Chain", &["bsc", "bnb"]),
	(100, "Gnosis", &["gnosis", "xdai"]),
	(137, "Polygon", &["polygon", "matic"]),
	(324, "zkSync Era", &["zksync", "zksync-era"]),
	(8453, "Base", &["base"]),
	(42161, "Arbitrum", &["arbitrum", "arb", "arbitrum-one"]),
	(43114, "Avalanche", &["avalanche", "avax"]),
	(59144, "Linea", &["linea"]),
	(534352, "Scroll", &["scroll"]),
];

/// Display name for a chain id, falling back to `Chain <id>`
pub fn chain_name(chain_id: u64) -> String {
	CHAINS
		.iter()
		.find(|(id, _, _)| *id == chain_id)
		.map(|(_, name, _)| name.to_string())
		.unwrap_or_else(|| format!("Chain {}", chain_id))
}

/// Resolve a chain reference from an ENS text record: either a numeric id or a known name
pub fn chain_id_from_name(value: &str) -> Option<u64> {
	let value = value.trim();
	if value.is_empty() {
		return None;
	}
	if let Ok(id) = value.parse::<u64>() {
		return (id != 0).then_some(id);
	}

	let lower = value.to_lowercase();
	CHAINS
		.iter()
		.find(|(_, name, aliases)| name.to_lowercase() == lower || aliases.contains(&lower.as_str()))
		.map(|(id, _, _)| *id)
}
