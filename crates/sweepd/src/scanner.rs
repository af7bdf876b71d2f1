//! History scan: finds the ERC-20 tokens a wallet has interacted with.
//!
//! Every per-transaction and per-log failure is recorded in
//! [`ScanResult::failures`] and the scan moves on; only failing to obtain
//! the history itself aborts.

use std::collections::{HashMap, HashSet};

use alloy::primitives::{Address, Log, B256, U256};
use sweepd_erc20::{TokenMetadata, TransferEvent};
use sweepd_error::{Result, SweepError};
use sweepd_ethereum::TransactionSource;
use tracing::{debug, info, warn};

use crate::balance::resolve_balance;
use crate::chain::Chain;

/// One ERC-20 transfer found in the wallet's history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRecord {
    pub from: Address,
    pub to: Address,
    pub value: U256,
    pub token_contract: Address,
    pub token_metadata: TokenMetadata,
    pub transaction_hash: B256,
}

/// A token the wallet has interacted with and its balance at scan time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenHolding {
    pub token_metadata: TokenMetadata,
    pub balance: U256,
}

impl TokenHolding {
    /// Contract address of the token
    pub fn contract(&self) -> Address {
        self.token_metadata.contract_address
    }
}

/// A transaction or log the scan had to skip.
#[derive(Debug)]
pub struct ScanFailure {
    pub transaction_hash: B256,
    /// Emitting contract, when the failure concerns a single log
    pub contract: Option<Address>,
    pub error: SweepError,
}

/// Everything a scan found.
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Transfers in the order they were found
    pub transfers: Vec<TransferRecord>,
    /// One holding per contract, in first-seen order
    pub holdings: Vec<TokenHolding>,
    pub failures: Vec<ScanFailure>,
}

enum Classified {
    Token(TokenMetadata),
    NotToken,
    Failed,
}

struct Scan<'a, C: ?Sized> {
    chain: &'a C,
    wallet: Address,
    classified: HashMap<Address, Classified>,
    held: HashSet<Address>,
    result: ScanResult,
}

/// Scans every transaction `history` reports for `wallet`.
pub async fn scan<C, H>(chain: &C, history: &H, wallet: Address) -> Result<ScanResult>
where
    C: Chain + ?Sized,
    H: TransactionSource + ?Sized,
{
    let hashes = history.transaction_hashes(wallet).await?;
    info!(%wallet, transactions = hashes.len(), "scanning history");

    let mut scan = Scan {
        chain,
        wallet,
        classified: HashMap::new(),
        held: HashSet::new(),
        result: ScanResult::default(),
    };
    for hash in hashes {
        scan.transaction(hash).await;
    }

    let result = scan.result;
    info!(
        transfers = result.transfers.len(),
        holdings = result.holdings.len(),
        failures = result.failures.len(),
        "scan complete"
    );
    Ok(result)
}

impl<C: Chain + ?Sized> Scan<'_, C> {
    async fn transaction(&mut self, hash: B256) {
        let logs = match self.chain.receipt_logs(hash).await {
            Ok(Some(logs)) => logs,
            Ok(None) => {
                debug!(%hash, "no receipt, skipping");
                return;
            }
            Err(error) => {
                self.fail(hash, None, error);
                return;
            }
        };
        debug!(%hash, logs = logs.len(), "inspecting receipt");

        for log in &logs {
            if let Err(error) = self.log(hash, log).await {
                self.fail(hash, Some(log.address), error);
            }
        }
    }

    async fn log(&mut self, hash: B256, log: &Log) -> Result<()> {
        let Some(event) = TransferEvent::from_log(log)? else {
            return Ok(());
        };
        let contract = log.address;
        let Some(token_metadata) = self.classify(contract).await? else {
            return Ok(());
        };

        self.result.transfers.push(TransferRecord {
            from: event.from,
            to: event.to,
            value: event.value,
            token_contract: contract,
            token_metadata: token_metadata.clone(),
            transaction_hash: hash,
        });

        if !self.held.contains(&contract) {
            let balance = resolve_balance(&self.chain.token(contract), self.wallet).await?;
            info!(
                %contract,
                symbol = %token_metadata.symbol,
                %balance,
                "found token"
            );
            self.held.insert(contract);
            self.result.holdings.push(TokenHolding {
                token_metadata,
                balance,
            });
        }
        Ok(())
    }

    /// Classifies `contract` once per scan. A contract whose classification
    /// failed is reported on its first log and ignored afterwards.
    async fn classify(&mut self, contract: Address) -> Result<Option<TokenMetadata>> {
        match self.classified.get(&contract) {
            Some(Classified::Token(metadata)) => return Ok(Some(metadata.clone())),
            Some(Classified::NotToken | Classified::Failed) => return Ok(None),
            None => {}
        }

        match TokenMetadata::fetch(&self.chain.token(contract)).await {
            Ok(metadata) if metadata.is_valid_token => {
                self.classified
                    .insert(contract, Classified::Token(metadata.clone()));
                Ok(Some(metadata))
            }
            Ok(metadata) => {
                debug!(%contract, symbol = %metadata.symbol, "not a valid token");
                self.classified.insert(contract, Classified::NotToken);
                Ok(None)
            }
            Err(error) => {
                self.classified.insert(contract, Classified::Failed);
                Err(error)
            }
        }
    }

    fn fail(&mut self, hash: B256, contract: Option<Address>, error: SweepError) {
        warn!(
            %hash,
            contract = ?contract,
            transient = error.is_transient(),
            %error,
            "skipping"
        );
        self.result.failures.push(ScanFailure {
            transaction_hash: hash,
            contract,
            error,
        });
    }
}
