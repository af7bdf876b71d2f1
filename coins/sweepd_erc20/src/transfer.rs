//! Decoding of ERC-20 `Transfer` logs

use crate::abi::IERC20;
use alloy::primitives::{Address, Log, U256};
use alloy::sol_types::SolEvent;
use sweepd_error::{Result, SweepError};

/// The decoded body of a `Transfer(address,address,uint256)` log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferEvent {
    pub from: Address,
    pub to: Address,
    pub value: U256,
}

impl TransferEvent {
    /// Decodes `log` if it is an ERC-20 transfer.
    ///
    /// Returns `Ok(None)` for any other log: a different topic 0, fewer than
    /// three topics, or an ERC-721 transfer whose token id is a fourth topic.
    /// A log carrying the transfer signature and layout but not exactly one
    /// data word is malformed and returned as an error.
    pub fn from_log(log: &Log) -> Result<Option<Self>> {
        let topics = log.data.topics();
        if topics.len() != 3 || topics[0] != IERC20::Transfer::SIGNATURE_HASH {
            return Ok(None);
        }
        let data = &log.data.data;
        if data.len() != 32 {
            return Err(SweepError::AbiError(format!(
                "Transfer log from {} has {} data bytes, expected 32",
                log.address,
                data.len()
            )));
        }
        Ok(Some(Self {
            from: Address::from_word(topics[1]),
            to: Address::from_word(topics[2]),
            value: U256::from_be_slice(data),
        }))
    }
}
