//! ERC-20 adapter for any contract address

use crate::abi::IERC20;
use crate::adapter::Erc20Adapter;
use alloy::primitives::{Address, U256};
use alloy::rpc::types::TransactionRequest;
use alloy::sol_types::SolCall;
use async_trait::async_trait;
use sweepd_error::{Result, SweepError};
use sweepd_ethereum::EthClient;
use tracing::trace;

/// Adapter for interacting with an arbitrary ERC-20 contract through a node.
#[derive(Debug, Clone)]
pub struct Erc20Token {
    client: EthClient,
    /// The contract address
    address: Address,
}

impl Erc20Token {
    /// Create a new adapter for the contract at `address`
    pub fn new(client: EthClient, address: Address) -> Self {
        Self { client, address }
    }

    async fn call_contract<C: SolCall>(&self, method: &'static str, call: C) -> Result<C::Return> {
        trace!(contract = %self.address, method, "eth_call");
        let call_data = call.abi_encode();
        let tx = TransactionRequest::default()
            .to(self.address)
            .input(call_data.into());

        let result = self.client.call(tx).await.map_err(|e| match e {
            SweepError::RpcRequestError { reason, .. } => self.contract_error(method, reason),
            other => other,
        })?;

        C::abi_decode_returns(&result)
            .map_err(|e| self.contract_error(method, format!("Decode error: {e}")))
    }

    fn contract_error(&self, method: &'static str, reason: String) -> SweepError {
        SweepError::ContractCall {
            contract: self.address.to_string(),
            method,
            reason,
        }
    }
}

#[async_trait]
impl Erc20Adapter for Erc20Token {
    fn contract_address(&self) -> Address {
        self.address
    }

    async fn name(&self) -> Result<String> {
        self.call_contract("name", IERC20::nameCall {}).await
    }

    async fn symbol(&self) -> Result<String> {
        self.call_contract("symbol", IERC20::symbolCall {}).await
    }

    async fn decimals(&self) -> Result<u8> {
        self.call_contract("decimals", IERC20::decimalsCall {}).await
    }

    async fn total_supply(&self) -> Result<U256> {
        self.call_contract("totalSupply", IERC20::totalSupplyCall {})
            .await
    }

    async fn balance_of(&self, owner: Address) -> Result<U256> {
        self.call_contract("balanceOf", IERC20::balanceOfCall { account: owner })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;
    use std::time::Duration;

    const USDC_MAINNET: Address = address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48");

    #[test]
    fn test_token_contract_address() {
        let client = EthClient::connect("http://localhost:8545").unwrap();
        let token = Erc20Token::new(client, USDC_MAINNET);
        assert_eq!(token.contract_address(), USDC_MAINNET);
    }

    #[test]
    fn test_token_is_send_sync() {
        // adapters are held across awaits
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Erc20Token>();
    }

    #[tokio::test]
    async fn test_unreachable_node_is_error() {
        // port 9 (discard) is not an RPC node
        let client =
            EthClient::connect_with_timeout("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let token = Erc20Token::new(client, USDC_MAINNET);
        assert!(token.name().await.is_err());
    }
}
