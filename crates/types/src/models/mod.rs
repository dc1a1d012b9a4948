//! Shared domain models used across adapters, services and the API

pub mod amount;
pub mod chain;
pub mod secret_string;
pub mod token;

pub use amount::TokenAmount;
pub use chain::{chain_id_from_name, chain_name};
pub use secret_string::SecretString;
pub use token::{
	addresses_equal, is_valid_evm_address, is_zero_address, Token, TokenRef, ZERO_ADDRESS,
};
