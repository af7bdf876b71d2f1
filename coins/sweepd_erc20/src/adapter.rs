//! Generic ERC-20 adapter trait

use alloy::primitives::{Address, U256};
use async_trait::async_trait;
use sweepd_error::Result;

/// Read access to one ERC-20 contract.
#[async_trait]
pub trait Erc20Adapter: Send + Sync {
    /// Returns the contract address for this token
    fn contract_address(&self) -> Address;

    /// Returns the token name
    async fn name(&self) -> Result<String>;

    /// Returns the token symbol
    async fn symbol(&self) -> Result<String>;

    /// Returns the number of decimals
    async fn decimals(&self) -> Result<u8>;

    /// Returns the total supply
    async fn total_supply(&self) -> Result<U256>;

    /// Returns the balance of the given address
    async fn balance_of(&self, owner: Address) -> Result<U256>;
}
