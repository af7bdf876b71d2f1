//! Scan once, then sweep every holding in order.

use std::collections::HashSet;

use alloy::primitives::{Address, U256};
use sweepd_erc20::TokenMetadata;
use sweepd_error::{Result, SweepError};
use sweepd_ethereum::{SweepSigner, TransactionSource};
use tracing::{error, info};

use crate::chain::Chain;
use crate::scanner::{self, ScanResult};
use crate::sweeper::{sweep_token, SkipReason, SweepOutcome};

/// Allow and deny lists of token contracts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenFilter {
    /// When non-empty, only these contracts are swept
    pub only: HashSet<Address>,
    /// Contracts never swept
    pub skip: HashSet<Address>,
}

impl TokenFilter {
    /// Returns true if `contract` may be swept.
    pub fn allows(&self, contract: &Address) -> bool {
        !self.skip.contains(contract) && (self.only.is_empty() || self.only.contains(contract))
    }
}

/// Settings for a sweep run.
#[derive(Debug, Clone)]
pub struct SweepOptions {
    /// Address receiving every swept balance
    pub destination: Address,
    /// Prepare transfers without signing or sending them
    pub dry_run: bool,
    pub filter: TokenFilter,
}

/// The sweep attempt for one holding.
#[derive(Debug)]
pub struct SweepEntry {
    /// Metadata read during the sweep, or during the scan if the sweep failed before reading it
    pub token: TokenMetadata,
    /// Balance recorded by the scan
    pub scanned_balance: U256,
    pub outcome: SweepOutcome,
}

/// Outcome of a whole run.
#[derive(Debug, Default)]
pub struct SweepReport {
    pub scan: ScanResult,
    /// One entry per holding, in scan order
    pub entries: Vec<SweepEntry>,
}

impl SweepReport {
    /// Number of transfers broadcast
    pub fn sent(&self) -> usize {
        self.count(|outcome| matches!(outcome, SweepOutcome::Sent { .. }))
    }

    /// Number of transfers prepared in dry-run mode
    pub fn dry_runs(&self) -> usize {
        self.count(|outcome| matches!(outcome, SweepOutcome::DryRun { .. }))
    }

    /// Number of holdings whose sweep failed
    pub fn failed(&self) -> usize {
        self.count(|outcome| matches!(outcome, SweepOutcome::Failed(_)))
    }

    fn count(&self, predicate: impl Fn(&SweepOutcome) -> bool) -> usize {
        self.entries
            .iter()
            .filter(|entry| predicate(&entry.outcome))
            .count()
    }
}

/// Runs the scan-and-sweep pipeline for one wallet.
pub struct Sweeper<C, H> {
    chain: C,
    history: H,
    signer: SweepSigner,
    options: SweepOptions,
}

impl<C: Chain, H: TransactionSource> Sweeper<C, H> {
    /// Creates a sweeper for the wallet controlled by `signer`.
    pub fn new(chain: C, history: H, signer: SweepSigner, options: SweepOptions) -> Result<Self> {
        if options.destination == signer.address() {
            return Err(SweepError::ConfigError(
                "destination is the wallet being swept".to_string(),
            ));
        }
        if options.destination == Address::ZERO {
            return Err(SweepError::ConfigError(
                "destination is the zero address".to_string(),
            ));
        }
        Ok(Self {
            chain,
            history,
            signer,
            options,
        })
    }

    /// Address whose tokens are swept
    pub fn wallet(&self) -> Address {
        self.signer.address()
    }

    /// Node the sweeper talks to
    pub fn chain(&self) -> &C {
        &self.chain
    }

    /// Scans the wallet's history.
    pub async fn scan(&self) -> Result<ScanResult> {
        scanner::scan(&self.chain, &self.history, self.wallet()).await
    }

    /// Sweeps every holding of `scan` in order.
    ///
    /// A failing holding is recorded and the remaining holdings are still attempted.
    pub async fn sweep(&self, scan: ScanResult) -> SweepReport {
        let mut entries = Vec::with_capacity(scan.holdings.len());
        for holding in &scan.holdings {
            let contract = holding.contract();
            let (token, outcome) = if holding.balance.is_zero() {
                (
                    holding.token_metadata.clone(),
                    SweepOutcome::Skipped(SkipReason::EmptyBalance),
                )
            } else if !self.options.filter.allows(&contract) {
                info!(%contract, symbol = %holding.token_metadata.symbol, "filtered out");
                (
                    holding.token_metadata.clone(),
                    SweepOutcome::Skipped(SkipReason::Filtered),
                )
            } else {
                match sweep_token(
                    &self.chain,
                    &self.signer,
                    self.options.destination,
                    contract,
                    self.options.dry_run,
                )
                .await
                {
                    Ok(swept) => swept,
                    Err(e) => {
                        error!(
                            %contract,
                            symbol = %holding.token_metadata.symbol,
                            transient = e.is_transient(),
                            error = %e,
                            "sweep failed"
                        );
                        (holding.token_metadata.clone(), SweepOutcome::Failed(e))
                    }
                }
            };
            entries.push(SweepEntry {
                token,
                scanned_balance: holding.balance,
                outcome,
            });
        }
        SweepReport { scan, entries }
    }

    /// Scans, then sweeps.
    pub async fn run(&self) -> Result<SweepReport> {
        let scan = self.scan().await?;
        Ok(self.sweep(scan).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    const A: Address = address!("1111111111111111111111111111111111111111");
    const B: Address = address!("2222222222222222222222222222222222222222");

    #[test]
    fn test_empty_filter_allows_all() {
        assert!(TokenFilter::default().allows(&A));
    }

    #[test]
    fn test_only_list() {
        let filter = TokenFilter {
            only: HashSet::from([A]),
            ..Default::default()
        };
        assert!(filter.allows(&A));
        assert!(!filter.allows(&B));
    }

    #[test]
    fn test_skip_wins_over_only() {
        let filter = TokenFilter {
            only: HashSet::from([A]),
            skip: HashSet::from([A]),
        };
        assert!(!filter.allows(&A));
    }

    #[test]
    fn test_empty_report_counts() {
        let report = SweepReport::default();
        assert_eq!(report.sent(), 0);
        assert_eq!(report.failed(), 0);
        assert_eq!(report.dry_runs(), 0);
    }
}
