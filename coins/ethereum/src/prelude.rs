//! This prelude module simplifies importing many useful items from the sweepd_ethereum crate using a glob import.
//!
//! To use this prelude, add the following to your code:
//! ```
//! use sweepd_ethereum::prelude::*;
//! ```

pub use crate::{
    BlockRangeHistory, ContractCall, EthClient, EtherscanHistory, SignedTransaction, SweepSigner,
    TransactionSource,
};

pub use alloy::primitives::{Address, Bytes, B256, U256};
