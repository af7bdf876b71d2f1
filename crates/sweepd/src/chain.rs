//! The node operations the pipeline depends on.

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, Log, B256};
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;
use sweepd_erc20::{Erc20Adapter, Erc20Token};
use sweepd_error::Result;
use sweepd_ethereum::EthClient;

/// Everything the scanner and the sweeper ask of a blockchain node.
#[async_trait]
pub trait Chain: Send + Sync {
    /// Adapter type for token contracts on this chain
    type Token: Erc20Adapter;

    /// Returns an adapter for the token contract at `contract`.
    fn token(&self, contract: Address) -> Self::Token;

    /// Returns the receipt logs of a transaction, or `None` if it has no receipt yet.
    async fn receipt_logs(&self, tx_hash: B256) -> Result<Option<Vec<Log>>>;

    /// Returns the EIP-155 chain id.
    async fn chain_id(&self) -> Result<u64>;

    /// Returns the current gas price in wei.
    async fn gas_price(&self) -> Result<u128>;

    /// Estimates the gas needed for `from` to call `to` with `data`.
    async fn estimate_gas(&self, from: Address, to: Address, data: Bytes) -> Result<u64>;

    /// Returns the next nonce for `address`, including pending transactions.
    async fn pending_nonce(&self, address: Address) -> Result<u64>;

    /// Broadcasts a signed transaction and returns its hash.
    async fn send_raw_transaction(&self, raw: Bytes) -> Result<B256>;
}

/// [`Chain`] backed by a JSON-RPC node.
#[derive(Debug, Clone)]
pub struct RpcChain {
    client: EthClient,
}

impl RpcChain {
    /// Wraps a connected client.
    pub fn new(client: EthClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Chain for RpcChain {
    type Token = Erc20Token;

    fn token(&self, contract: Address) -> Erc20Token {
        Erc20Token::new(self.client.clone(), contract)
    }

    async fn receipt_logs(&self, tx_hash: B256) -> Result<Option<Vec<Log>>> {
        self.client.receipt_logs(tx_hash).await
    }

    async fn chain_id(&self) -> Result<u64> {
        self.client.chain_id().await
    }

    async fn gas_price(&self) -> Result<u128> {
        self.client.gas_price().await
    }

    async fn estimate_gas(&self, from: Address, to: Address, data: Bytes) -> Result<u64> {
        let tx = TransactionRequest::default()
            .with_from(from)
            .with_to(to)
            .with_input(data);
        self.client.estimate_gas(tx).await
    }

    async fn pending_nonce(&self, address: Address) -> Result<u64> {
        self.client.pending_nonce(address).await
    }

    async fn send_raw_transaction(&self, raw: Bytes) -> Result<B256> {
        self.client.send_raw_transaction(&raw).await
    }
}
