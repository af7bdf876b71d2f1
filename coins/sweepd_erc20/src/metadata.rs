//! Token metadata and classification

use crate::adapter::Erc20Adapter;
use alloy::primitives::{Address, U256};
use sweepd_error::Result;

/// Descriptive data read from a token contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMetadata {
    /// Token name (e.g., "USD Coin")
    pub name: String,
    /// Token symbol (e.g., "USDC")
    pub symbol: String,
    /// Decimal places
    pub decimals: u8,
    /// Total supply in base units
    pub total_supply: U256,
    /// Contract address
    pub contract_address: Address,
    /// Whether the contract looks like a fungible ERC-20 token
    pub is_valid_token: bool,
}

impl TokenMetadata {
    /// Builds metadata from already-decoded contract values.
    ///
    /// ABI decoding guarantees that name and symbol are strings and that
    /// decimals is numeric, leaving a positive total supply as the only
    /// remaining requirement.
    pub fn classify(
        contract_address: Address,
        name: String,
        symbol: String,
        decimals: u8,
        total_supply: U256,
    ) -> Self {
        Self {
            is_valid_token: total_supply > U256::ZERO,
            name,
            symbol,
            decimals,
            total_supply,
            contract_address,
        }
    }

    /// Reads `name`, `symbol`, `decimals` and `totalSupply` in that order and classifies the contract.
    ///
    /// Any call that reverts or returns malformed data is returned as an error.
    pub async fn fetch<A: Erc20Adapter + ?Sized>(token: &A) -> Result<Self> {
        let name = token.name().await?;
        let symbol = token.symbol().await?;
        let decimals = token.decimals().await?;
        let total_supply = token.total_supply().await?;
        Ok(Self::classify(
            token.contract_address(),
            name,
            symbol,
            decimals,
            total_supply,
        ))
    }
}
