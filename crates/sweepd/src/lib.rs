//! # sweepd
//!
//! Scans a wallet's transaction history for ERC-20 tokens and sweeps every
//! non-zero balance to a destination address.
//!
//! The pipeline runs strictly sequentially:
//!
//! 1. [`scanner::scan`] reads every receipt of the wallet's history, decodes
//!    `Transfer` logs, classifies each emitting contract once and records
//!    the wallet's balance of every valid token.
//! 2. [`Sweeper::sweep`] walks the resulting holdings in first-seen order
//!    and, for every positive balance, re-reads the balance and broadcasts a
//!    signed `transfer` of all of it.
//!
//! Failures are isolated: a bad log or receipt is recorded in
//! [`ScanResult::failures`], a failed sweep in its [`SweepEntry`], and the
//! run continues with the next item.
//!
//! ## Example
//!
//! ```no_run
//! use sweepd::prelude::*;
//!
//! # async fn run() -> Result<(), sweepd::error::SweepError> {
//! let client = EthClient::connect("http://localhost:8545")?;
//! let history = BlockRangeHistory::new(client.clone(), 0, None);
//! let signer = SweepSigner::from_private_key(&std::env::var("SWEEP_PRIVATE_KEY").unwrap())?;
//! let options = SweepOptions {
//!     destination: "0x70997970C51812dc3A010C7d01b50e0d17dc79C8".parse().unwrap(),
//!     dry_run: true,
//!     filter: TokenFilter::default(),
//! };
//! let sweeper = Sweeper::new(RpcChain::new(client), history, signer, options)?;
//! let report = sweeper.run().await?;
//! println!("{} sent, {} failed", report.sent(), report.failed());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod balance;
pub mod chain;
pub mod orchestrator;
pub mod scanner;
pub mod sweeper;

pub use chain::{Chain, RpcChain};
pub use orchestrator::{SweepEntry, SweepOptions, SweepReport, Sweeper, TokenFilter};
pub use scanner::{ScanFailure, ScanResult, TokenHolding, TransferRecord};
pub use sweeper::{SkipReason, SweepOutcome};

pub use sweepd_erc20 as erc20;
pub use sweepd_error as error;
pub use sweepd_ethereum as ethereum;

/// Commonly used types.
pub mod prelude {
    pub use crate::{
        Chain, RpcChain, ScanResult, SkipReason, SweepOptions, SweepOutcome, SweepReport, Sweeper,
        TokenFilter, TokenHolding, TransferRecord,
    };
    pub use sweepd_erc20::prelude::*;
    pub use sweepd_ethereum::prelude::*;
}
