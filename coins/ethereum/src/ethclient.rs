use std::fmt::Display;
use std::future::IntoFuture;
use std::time::Duration;

use alloy::primitives::{Address, Bytes, Log, B256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::{Block, BlockNumberOrTag, Filter, Log as RpcLog, TransactionRequest};
use alloy::transports::http::reqwest::Url;
use sweepd_error::{Result, SweepError};

/// Default bound on a single node request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A blockchain connector for Ethereum using Alloy.
///
/// Every request is bounded by the client's timeout, so an unresponsive
/// node surfaces as [`SweepError::Timeout`] instead of hanging the run.
#[derive(Clone)]
pub struct EthClient {
    provider: DynProvider,
    rpc_url: String,
    timeout: Duration,
}

impl std::fmt::Debug for EthClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EthClient")
            .field("rpc_url", &self.rpc_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl EthClient {
    /// Creates a client for the node at `rpc_url` with the default timeout.
    pub fn connect(rpc_url: &str) -> Result<Self> {
        Self::connect_with_timeout(rpc_url, DEFAULT_TIMEOUT)
    }

    /// Creates a client for the node at `rpc_url`.
    pub fn connect_with_timeout(rpc_url: &str, timeout: Duration) -> Result<Self> {
        let url = rpc_url.parse::<Url>().map_err(|e| SweepError::RpcConnectionError {
            url: rpc_url.to_string(),
            reason: format!("Invalid URL: {e}"),
        })?;
        let provider = ProviderBuilder::new().connect_http(url).erased();
        Ok(Self {
            provider,
            rpc_url: rpc_url.to_string(),
            timeout,
        })
    }

    /// Returns the RPC URL this client talks to.
    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    /// Returns the per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Awaits a node request, mapping transport errors and enforcing the timeout.
    pub async fn timed<F, T, E>(&self, method: &'static str, request: F) -> Result<T>
    where
        F: IntoFuture<Output = std::result::Result<T, E>>,
        E: Display,
    {
        match tokio::time::timeout(self.timeout, request).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(SweepError::rpc(method, e)),
            Err(_) => Err(SweepError::Timeout {
                operation: method.to_string(),
                seconds: self.timeout.as_secs(),
            }),
        }
    }

    /// Returns the chain id of the current network.
    pub async fn chain_id(&self) -> Result<u64> {
        self.timed("eth_chainId", self.provider.get_chain_id()).await
    }

    /// Get the current legacy gas price in wei.
    pub async fn gas_price(&self) -> Result<u128> {
        self.timed("eth_gasPrice", self.provider.get_gas_price()).await
    }

    /// Estimates the gas limit needed to execute `tx`.
    pub async fn estimate_gas(&self, tx: TransactionRequest) -> Result<u64> {
        self.timed("eth_estimateGas", self.provider.estimate_gas(tx))
            .await
    }

    /// Returns the nonce to use for the next transaction from `address`,
    /// counting transactions still in the mempool.
    pub async fn pending_nonce(&self, address: Address) -> Result<u64> {
        self.timed(
            "eth_getTransactionCount",
            self.provider.get_transaction_count(address).pending(),
        )
        .await
    }

    /// Executes a read-only call and returns the raw return data.
    pub async fn call(&self, tx: TransactionRequest) -> Result<Bytes> {
        self.timed("eth_call", self.provider.call(tx)).await
    }

    /// Get the latest block number for the current network chain.
    pub async fn current_block_number(&self) -> Result<u64> {
        self.timed("eth_blockNumber", self.provider.get_block_number())
            .await
    }

    /// Gets a block with full transaction bodies.
    ///
    /// Returns `None` if the node does not know the block.
    pub async fn block_with_transactions(&self, number: u64) -> Result<Option<Block>> {
        self.timed(
            "eth_getBlockByNumber",
            self.provider
                .get_block_by_number(BlockNumberOrTag::Number(number))
                .full(),
        )
        .await
    }

    /// Returns the logs matching `filter`, with their block and transaction positions.
    pub async fn logs(&self, filter: &Filter) -> Result<Vec<RpcLog>> {
        self.timed("eth_getLogs", self.provider.get_logs(filter)).await
    }

    /// Returns the logs of a transaction's receipt.
    ///
    /// Returns `None` if the transaction is unknown or still pending.
    pub async fn receipt_logs(&self, tx_hash: B256) -> Result<Option<Vec<Log>>> {
        let receipt = self
            .timed(
                "eth_getTransactionReceipt",
                self.provider.get_transaction_receipt(tx_hash),
            )
            .await?;
        Ok(receipt.map(|receipt| {
            receipt
                .inner
                .logs()
                .iter()
                .map(|log| log.inner.clone())
                .collect()
        }))
    }

    /// Submits a signed, EIP-2718 encoded transaction and returns its hash.
    pub async fn send_raw_transaction(&self, raw: &[u8]) -> Result<B256> {
        match tokio::time::timeout(self.timeout, self.provider.send_raw_transaction(raw)).await {
            Ok(Ok(pending)) => Ok(*pending.tx_hash()),
            Ok(Err(e)) => Err(SweepError::BroadcastError(e.to_string())),
            Err(_) => Err(SweepError::Timeout {
                operation: "eth_sendRawTransaction".to_string(),
                seconds: self.timeout.as_secs(),
            }),
        }
    }
}

#[cfg(test)]
fn anvil_available() -> bool {
    std::process::Command::new("anvil")
        .arg("--version")
        .output()
        .is_ok()
}
