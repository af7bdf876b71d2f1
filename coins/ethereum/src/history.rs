//! Transaction history lookup.
//!
//! A JSON-RPC node cannot list the transactions of an account, so history
//! comes either from an Etherscan-compatible explorer API or from walking a
//! block range over RPC.

use std::collections::HashSet;
use std::error::Error as _;
use std::time::Duration;

use alloy::consensus::Transaction as _;
use alloy::network::TransactionResponse as _;
use alloy::primitives::{b256, Address, B256};
use alloy::rpc::types::Filter;
use async_trait::async_trait;
use serde::Deserialize;
use sweepd_error::{Result, SweepError};
use tracing::debug;

use crate::EthClient;

/// Etherscan v2 multichain endpoint
pub const ETHERSCAN_V2_URL: &str = "https://api.etherscan.io/v2/api";

const PAGE_SIZE: usize = 1000;
// Etherscan rejects queries where page * offset exceeds this
const RESULT_WINDOW: usize = 10_000;
const NO_TRANSACTIONS: &str = "No transactions found";

// keccak256("Transfer(address,address,uint256)")
const TRANSFER_TOPIC: B256 =
    b256!("ddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef");
// Block span of a single eth_getLogs request
const LOG_CHUNK: u64 = 10_000;

/// Source of the transaction hashes that touched a wallet.
#[async_trait]
pub trait TransactionSource: Send + Sync {
    /// Returns the hashes in first-seen order, without duplicates.
    async fn transaction_hashes(&self, wallet: Address) -> Result<Vec<B256>>;
}

/// A fixed list of hashes.
#[async_trait]
impl TransactionSource for Vec<B256> {
    async fn transaction_hashes(&self, _wallet: Address) -> Result<Vec<B256>> {
        Ok(dedup(self.iter().copied()))
    }
}

fn dedup(hashes: impl IntoIterator<Item = B256>) -> Vec<B256> {
    let mut seen = HashSet::new();
    hashes.into_iter().filter(|hash| seen.insert(*hash)).collect()
}

#[derive(Debug, Deserialize)]
struct EtherscanResponse {
    status: String,
    message: String,
    result: EtherscanResult,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EtherscanResult {
    Rows(Vec<EtherscanTx>),
    Message(String),
}

#[derive(Debug, Deserialize)]
struct EtherscanTx {
    hash: String,
    #[serde(rename = "blockNumber")]
    block_number: String,
}

impl EtherscanTx {
    fn parse(&self) -> Result<(u64, B256)> {
        let block = self.block_number.parse::<u64>().map_err(|e| {
            SweepError::HistoryError(format!("bad block number '{}': {e}", self.block_number))
        })?;
        let hash = self
            .hash
            .parse::<B256>()
            .map_err(|e| SweepError::HistoryError(format!("bad hash '{}': {e}", self.hash)))?;
        Ok((block, hash))
    }
}

/// History from an Etherscan-compatible account API.
///
/// Normal transactions (`txlist`) are merged with ERC-20 transfer events
/// (`tokentx`), so tokens received through transactions the wallet neither
/// sent nor was the direct recipient of are still found.
///
/// The API serves at most 10000 rows per query. When that window fills up
/// the query starts over from the last block seen, so long histories are
/// read in full.
pub struct EtherscanHistory {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    chain_id: u64,
    timeout: Duration,
    page_size: usize,
    result_window: usize,
}

impl std::fmt::Debug for EtherscanHistory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EtherscanHistory")
            .field("base_url", &self.base_url)
            .field("chain_id", &self.chain_id)
            .finish_non_exhaustive()
    }
}

impl EtherscanHistory {
    /// Creates a history source against `base_url` for `chain_id`.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        chain_id: u64,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SweepError::HistoryError(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
            chain_id,
            timeout,
            page_size: PAGE_SIZE,
            result_window: RESULT_WINDOW,
        })
    }

    async fn fetch_page(
        &self,
        action: &str,
        wallet: Address,
        start_block: u64,
        page: usize,
    ) -> Result<Vec<(u64, B256)>> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("chainid", self.chain_id.to_string()),
                ("module", "account".to_string()),
                ("action", action.to_string()),
                ("address", wallet.to_string()),
                ("startblock", start_block.to_string()),
                ("endblock", "99999999".to_string()),
                ("page", page.to_string()),
                ("offset", self.page_size.to_string()),
                ("sort", "asc".to_string()),
                ("apikey", self.api_key.clone()),
            ])
            .send()
            .await
            .map_err(|e| self.map_http_error(e))?
            .error_for_status()
            .map_err(|e| self.map_http_error(e))?
            .json::<EtherscanResponse>()
            .await
            .map_err(|e| self.map_http_error(e))?;

        match response.result {
            EtherscanResult::Rows(rows) => rows.iter().map(EtherscanTx::parse).collect(),
            EtherscanResult::Message(_) if response.message == NO_TRANSACTIONS => Ok(Vec::new()),
            EtherscanResult::Message(message) => Err(SweepError::HistoryError(format!(
                "{action}: status {} {}: {message}",
                response.status, response.message
            ))),
        }
    }

    async fn fetch_all(&self, action: &str, wallet: Address) -> Result<Vec<B256>> {
        let pages_per_window = (self.result_window / self.page_size).max(1);
        let mut hashes = Vec::new();
        let mut start_block = 0;
        'window: loop {
            let mut last_block = start_block;
            for page in 1..=pages_per_window {
                let rows = self.fetch_page(action, wallet, start_block, page).await?;
                let full = rows.len() >= self.page_size;
                if let Some((block, _)) = rows.last() {
                    last_block = *block;
                }
                hashes.extend(rows.into_iter().map(|(_, hash)| hash));
                if !full {
                    break 'window;
                }
            }
            // Rows of the last block are fetched again and removed by dedup
            if last_block == start_block {
                return Err(SweepError::HistoryError(format!(
                    "{action}: block {start_block} alone holds more than {} results",
                    self.result_window
                )));
            }
            debug!(action, start_block = last_block, "result window full, continuing");
            start_block = last_block;
        }
        debug!(action, count = hashes.len(), "fetched account history");
        Ok(hashes)
    }

    fn map_http_error(&self, e: reqwest::Error) -> SweepError {
        // The request URL carries the API key
        let e = e.without_url();
        let mut reason = e.to_string();
        let mut source = e.source();
        while let Some(cause) = source {
            reason.push_str(": ");
            reason.push_str(&cause.to_string());
            source = cause.source();
        }
        if e.is_timeout() {
            SweepError::Timeout {
                operation: "history request".to_string(),
                seconds: self.timeout.as_secs(),
            }
        } else if e.is_connect() {
            SweepError::RpcConnectionError {
                url: self.base_url.clone(),
                reason,
            }
        } else {
            SweepError::HistoryError(reason)
        }
    }
}

#[async_trait]
impl TransactionSource for EtherscanHistory {
    async fn transaction_hashes(&self, wallet: Address) -> Result<Vec<B256>> {
        let mut hashes = self.fetch_all("txlist", wallet).await?;
        hashes.extend(self.fetch_all("tokentx", wallet).await?);
        Ok(dedup(hashes))
    }
}

/// History built from a block range over RPC.
///
/// Combines the transactions the wallet sent or directly received with
/// those that emitted a `Transfer` log naming the wallet, which covers
/// tokens sent to it by other accounts. Slow on long ranges but needs
/// nothing beyond the node.
#[derive(Debug, Clone)]
pub struct BlockRangeHistory {
    client: EthClient,
    from_block: u64,
    to_block: Option<u64>,
}

/// A transaction hash with its position in the chain.
type Located = (u64, u64, B256);

impl BlockRangeHistory {
    /// Scans `from_block..=to_block`, or up to the latest block when `to_block` is `None`.
    pub fn new(client: EthClient, from_block: u64, to_block: Option<u64>) -> Self {
        Self {
            client,
            from_block,
            to_block,
        }
    }

    async fn direct_transactions(&self, wallet: Address, to_block: u64) -> Result<Vec<Located>> {
        let mut found = Vec::new();
        for number in self.from_block..=to_block {
            let Some(block) = self.client.block_with_transactions(number).await? else {
                debug!(number, "block not found");
                continue;
            };
            for tx in block.transactions.txns() {
                if tx.from() == wallet || tx.to() == Some(wallet) {
                    found.push((number, tx.transaction_index().unwrap_or_default(), tx.tx_hash()));
                }
            }
        }
        Ok(found)
    }

    async fn transfer_transactions(&self, wallet: Address, to_block: u64) -> Result<Vec<Located>> {
        let mut found = Vec::new();
        let mut start = self.from_block;
        while start <= to_block {
            let end = start.saturating_add(LOG_CHUNK - 1).min(to_block);
            let range = Filter::new()
                .from_block(start)
                .to_block(end)
                .event_signature(TRANSFER_TOPIC);
            let sent = range.clone().topic1(wallet.into_word());
            let received = range.topic2(wallet.into_word());
            for filter in [sent, received] {
                for log in self.client.logs(&filter).await? {
                    if let Some(hash) = log.transaction_hash {
                        found.push((
                            log.block_number.unwrap_or(start),
                            log.transaction_index.unwrap_or_default(),
                            hash,
                        ));
                    }
                }
            }
            if end == u64::MAX {
                break;
            }
            start = end + 1;
        }
        Ok(found)
    }
}

#[async_trait]
impl TransactionSource for BlockRangeHistory {
    async fn transaction_hashes(&self, wallet: Address) -> Result<Vec<B256>> {
        let to_block = match self.to_block {
            Some(number) => number,
            None => self.client.current_block_number().await?,
        };
        let mut found = self.direct_transactions(wallet, to_block).await?;
        let direct = found.len();
        found.extend(self.transfer_transactions(wallet, to_block).await?);
        debug!(
            from_block = self.from_block,
            to_block,
            direct,
            transfers = found.len() - direct,
            "scanned block range"
        );
        found.sort_by_key(|(block, index, _)| (*block, *index));
        Ok(dedup(found.into_iter().map(|(_, _, hash)| hash)))
    }
}
