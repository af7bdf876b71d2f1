//! Human-readable output of a sweep run.

use sweepd::ethereum::alloy::primitives::Address;
use sweepd::{SkipReason, SweepEntry, SweepOutcome, SweepReport};

/// Stdout line for one entry, or `None` when nothing was sent or prepared.
pub fn entry_line(entry: &SweepEntry, destination: Address) -> Option<String> {
    let token = &entry.token;
    match &entry.outcome {
        SweepOutcome::Sent { tx_hash, amount } => Some(format!(
            "sent {amount} {} ({}) to {destination} in {tx_hash}",
            token.symbol, token.contract_address
        )),
        SweepOutcome::DryRun {
            amount,
            gas_limit,
            gas_price,
        } => Some(format!(
            "would send {amount} {} ({}) to {destination}, gas {gas_limit} at {gas_price} wei",
            token.symbol, token.contract_address
        )),
        SweepOutcome::Skipped(_) | SweepOutcome::Failed(_) => None,
    }
}

/// One-line totals of a run.
pub fn summary(report: &SweepReport) -> String {
    let skipped = report
        .entries
        .iter()
        .filter(|entry| matches!(entry.outcome, SweepOutcome::Skipped(SkipReason::EmptyBalance)))
        .count();
    let filtered = report
        .entries
        .iter()
        .filter(|entry| matches!(entry.outcome, SweepOutcome::Skipped(SkipReason::Filtered)))
        .count();
    let mut line = format!(
        "{} transfers, {} tokens: ",
        report.scan.transfers.len(),
        report.scan.holdings.len()
    );
    if report.dry_runs() > 0 {
        line.push_str(&format!("{} prepared", report.dry_runs()));
    } else {
        line.push_str(&format!("{} swept", report.sent()));
    }
    line.push_str(&format!(
        ", {skipped} empty, {filtered} filtered, {} failed",
        report.failed()
    ));
    if !report.scan.failures.is_empty() {
        line.push_str(&format!(", {} scan errors", report.scan.failures.len()));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use sweepd::erc20::{TokenAmount, TokenMetadata};
    use sweepd::error::SweepError;
    use sweepd::ethereum::alloy::primitives::{address, B256, U256};

    const DEST: Address = address!("70997970C51812dc3A010C7d01b50e0d17dc79C8");
    const TOKEN: Address = address!("1111111111111111111111111111111111111111");

    fn entry(outcome: SweepOutcome) -> SweepEntry {
        SweepEntry {
            token: TokenMetadata::classify(
                TOKEN,
                "Test".to_string(),
                "TST".to_string(),
                6,
                U256::from(1_000_000u64),
            ),
            scanned_balance: U256::from(1_500_000u64),
            outcome,
        }
    }

    #[test]
    fn test_sent_line() {
        let sent = entry(SweepOutcome::Sent {
            tx_hash: B256::ZERO,
            amount: TokenAmount::new(U256::from(1_500_000u64), 6),
        });
        let line = entry_line(&sent, DEST).unwrap();
        assert!(line.starts_with("sent 1.5 TST (0x1111111111111111111111111111111111111111) to 0x70997970C51812dc3A010C7d01b50e0d17dc79C8"));
        assert!(line.ends_with(&B256::ZERO.to_string()));
    }

    #[test]
    fn test_dry_run_line() {
        let prepared = entry(SweepOutcome::DryRun {
            amount: TokenAmount::new(U256::from(2_000_000u64), 6),
            gas_limit: 52_000,
            gas_price: 7,
        });
        let line = entry_line(&prepared, DEST).unwrap();
        assert!(line.starts_with("would send 2 TST"));
        assert!(line.ends_with("gas 52000 at 7 wei"));
    }

    #[test]
    fn test_no_line_for_skips_and_failures() {
        assert!(entry_line(&entry(SweepOutcome::Skipped(SkipReason::EmptyBalance)), DEST).is_none());
        let failed = entry(SweepOutcome::Failed(SweepError::Other("boom".into())));
        assert!(entry_line(&failed, DEST).is_none());
    }

    #[test]
    fn test_summary() {
        let report = SweepReport {
            scan: Default::default(),
            entries: vec![
                entry(SweepOutcome::Sent {
                    tx_hash: B256::ZERO,
                    amount: TokenAmount::new(U256::from(1u64), 6),
                }),
                entry(SweepOutcome::Skipped(SkipReason::Filtered)),
                entry(SweepOutcome::Failed(SweepError::Other("boom".into()))),
            ],
        };
        assert_eq!(
            summary(&report),
            "0 transfers, 0 tokens: 1 swept, 0 empty, 1 filtered, 1 failed"
        );
    }
}
