//! # sweepd Ethereum Library
//!
//! Node access, local transaction signing and account history lookup for
//! the sweepd token sweeper.
//!
//! This library uses the [alloy](https://github.com/alloy-rs/alloy) framework for Ethereum interactions.
//!
//! ## Quickstart Guide
//!
//! ### Using EthClient to Access Blockchain Data
//! The [EthClient] wraps one HTTP provider and bounds every request with a timeout.
//! ```no_run
//! # use sweepd_ethereum::prelude::*;
//! # async fn ethereum() -> Result<(), sweepd_error::SweepError> {
//! let client = EthClient::connect("https://eth.llamarpc.com")?;
//! let chain_id = client.chain_id().await?;
//! let gas_price = client.gas_price().await?;
//! println!("chain {chain_id}, gas price {gas_price} wei");
//! # Ok(())
//! # }
//! ```
//!
//! ### Signing
//! A [SweepSigner] is imported from a hex private key and signs legacy
//! transactions locally; the node only ever sees the raw signed bytes.
//! ```
//! # use sweepd_ethereum::prelude::*;
//! let signer = SweepSigner::from_private_key(
//!     "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
//! ).unwrap();
//! println!("sweeping from {}", signer.address());
//! ```
//!
//! ### History
//! Implementations of [TransactionSource] list the transactions that touched a wallet.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod ethclient;
pub use ethclient::{EthClient, DEFAULT_TIMEOUT};
pub mod history;
pub use history::{BlockRangeHistory, EtherscanHistory, TransactionSource};
mod signer;
pub use signer::{ContractCall, SignedTransaction, SweepSigner};
pub use alloy;
pub mod prelude;
