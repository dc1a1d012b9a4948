//! KiteSafe deposit calldata

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::{sol, SolCall};
use kite_types::{AdapterError, AdapterResult, ContractCall, TokenAmount, ValidatedRouteRequest};

/// Gas reserved for the destination-chain deposit call
pub const DEPOSIT_GAS_LIMIT: u64 = 300_000;

sol! {
	interface IKiteSafe {
		function safeDepositFor(
			address token,
			address vault,
			address recipient,
			uint256 amount,
			bytes data
		) external;
	}
}

fn address(field: &str, value: &str) -> AdapterResult<Address> {
	value
		.trim()
		.parse::<Address>()
		.map_err(|e| AdapterError::Abi(format!("invalid {} '{}': {}", field, value, e)))
}

/// ABI-encode `safeDepositFor(token, vault, recipient, amount, data)`
pub fn encode_safe_deposit_for(
	token: &str,
	vault: &str,
	recipient: &str,
	amount: &str,
	data: &[u8],
) -> AdapterResult<Bytes> {
	let amount = U256::from_str_radix(amount.trim(), 10)
		.map_err(|e| AdapterError::Abi(format!("invalid amount '{}': {}", amount, e)))?;

	let call = IKiteSafe::safeDepositForCall {
		token: address("token", token)?,
		vault: address("vault", vault)?,
		recipient: address("recipient", recipient)?,
		amount,
		data: Bytes::copy_from_slice(data),
	};
	Ok(call.abi_encode().into())
}

/// Contract-call payload depositing the bridged token into `vault` on behalf of the recipient
///
/// `deposit_amount` is in base units of the destination token and must not
/// exceed what is guaranteed to arrive. The KiteSafe contract on the
/// destination chain receives the tokens, so it is both the call target and
/// the approval spender.
pub fn build_contract_call(
	request: &ValidatedRouteRequest,
	vault: &str,
	kite_safe: &str,
	deposit_amount: &TokenAmount,
) -> AdapterResult<ContractCall> {
	if !deposit_amount.is_valid() || deposit_amount.is_zero() {
		return Err(AdapterError::Abi(format!(
			"invalid deposit amount '{}'",
			deposit_amount
		)));
	}
	let calldata = encode_safe_deposit_for(
		&request.to_token.address,
		vault,
		&request.to_address,
		deposit_amount.as_str(),
		&[],
	)?;

	Ok(ContractCall {
		from_amount: deposit_amount.clone(),
		from_token_address: request.to_token.address.clone(),
		to_contract_address: kite_safe.to_string(),
		to_contract_call_data: format!("0x{}", hex::encode(&calldata)),
		to_contract_gas_limit: DEPOSIT_GAS_LIMIT.to_string(),
		to_approval_address: Some(kite_safe.to_string()),
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use kite_types::{RouteRequest, TokenRef};

	const TOKEN: &str = "0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913";
	const VAULT: &str = "0x7BfA7C4f149E7415b73bdeDfe609237e29CBF34A";
	const RECIPIENT: &str = "0x1111111111111111111111111111111111111111";
	const SAFE: &str = "0x3333333333333333333333333333333333333333";

	#[test]
	fn test_safe_deposit_for_layout() {
		let data = encode_safe_deposit_for(TOKEN, VAULT, RECIPIENT, "1000000", &[]).unwrap();

		assert_eq!(&data[..4], IKiteSafe::safeDepositForCall::SELECTOR.as_slice());
		// selector + 5 head words + empty bytes length word
		assert_eq!(data.len(), 4 + 32 * 6);
		// amount is the fourth argument
		let amount_word = &data[4 + 32 * 3..4 + 32 * 4];
		assert_eq!(U256::from_be_slice(amount_word), U256::from(1_000_000u64));
		// recipient is right-aligned in the third word
		assert_eq!(&data[4 + 32 * 2 + 12..4 + 32 * 3], &[0x11u8; 20]);
	}

	#[test]
	fn test_decodes_back() {
		let data = encode_safe_deposit_for(TOKEN, VAULT, RECIPIENT, "42", &[0xab, 0xcd]).unwrap();
		let decoded = IKiteSafe::safeDepositForCall::abi_decode(&data, true).unwrap();
		assert_eq!(decoded.amount, U256::from(42u64));
		assert_eq!(decoded.data.as_ref(), &[0xab, 0xcd]);
		assert_eq!(decoded.vault, VAULT.parse::<Address>().unwrap());
	}

	#[test]
	fn test_rejects_bad_inputs() {
		assert!(encode_safe_deposit_for("0x12", VAULT, RECIPIENT, "1", &[]).is_err());
		assert!(encode_safe_deposit_for(TOKEN, VAULT, RECIPIENT, "1.5", &[]).is_err());
	}

	#[test]
	fn test_contract_call_payload() {
		let request = RouteRequest {
			from_token: Some(TokenRef::new(1, "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48")),
			to_token: Some(TokenRef::new(8453, TOKEN)),
			from_amount: "2500000".into(),
			from_address: Some(RECIPIENT.to_string()),
			to_address: Some(RECIPIENT.to_string()),
			vault_address: Some(VAULT.to_string()),
			slippage: None,
		}
		.validate()
		.unwrap();

		let call = build_contract_call(&request, VAULT, SAFE, &"2490000".into()).unwrap();
		assert_eq!(call.to_contract_address, SAFE);
		assert_eq!(call.from_token_address, TOKEN);
		assert_eq!(call.to_approval_address.as_deref(), Some(SAFE));
		assert!(call.to_contract_call_data.starts_with("0x"));
		assert_eq!(call.to_contract_gas_limit, "300000");
	}

	#[test]
	fn test_deposit_amount_is_in_destination_units() {
		const WETH: &str = "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2";
		let request = RouteRequest {
			from_token: Some(TokenRef::new(1, WETH)),
			to_token: Some(TokenRef::new(8453, TOKEN)),
			from_amount: "1000000000000000000".into(),
			from_address: Some(RECIPIENT.to_string()),
			to_address: Some(RECIPIENT.to_string()),
			vault_address: Some(VAULT.to_string()),
			slippage: None,
		}
		.validate()
		.unwrap();

		// 1 WETH arrives as at least 2,450 USDC (6 decimals)
		let call = build_contract_call(&request, VAULT, SAFE, &"2450000000".into()).unwrap();
		let data = hex::decode(call.to_contract_call_data.trim_start_matches("0x")).unwrap();
		let decoded = IKiteSafe::safeDepositForCall::abi_decode(&data, true).unwrap();

		assert_eq!(decoded.amount, U256::from(2_450_000_000u64));
		assert_eq!(call.from_amount.as_str(), "2450000000");
		assert_eq!(decoded.token, TOKEN.parse::<Address>().unwrap());
	}

	#[test]
	fn test_zero_deposit_amount_rejected() {
		let request = RouteRequest {
			from_token: Some(TokenRef::new(42161, "0xaf88d065e77c8cC2239327C5EDb3A432268e5831")),
			to_token: Some(TokenRef::new(8453, TOKEN)),
			from_amount: "1000000".into(),
			from_address: Some(RECIPIENT.to_string()),
			to_address: Some(RECIPIENT.to_string()),
			vault_address: Some(VAULT.to_string()),
			slippage: None,
		}
		.validate()
		.unwrap();

		assert!(build_contract_call(&request, VAULT, SAFE, &"0".into()).is_err());
	}
}
