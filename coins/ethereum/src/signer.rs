use std::fmt;

use alloy::consensus::{SignableTransaction, TxEnvelope, TxLegacy};
use alloy::eips::eip2718::Encodable2718;
use alloy::network::TxSignerSync;
use alloy::primitives::{Address, Bytes, TxKind, B256, U256};
use alloy::signers::local::PrivateKeySigner;
use sweepd_error::{Result, SweepError};
use zeroize::Zeroizing;

/// A transaction signed and encoded for `eth_sendRawTransaction`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    /// Hash the network will know the transaction by
    pub hash: B256,
    /// EIP-2718 encoding of the signed transaction
    pub raw: Bytes,
}

/// Holds the sweeping wallet's private key and signs transactions locally.
///
/// The key never leaves this type: `Debug` prints the address only and
/// intermediate key buffers are zeroized on drop.
#[derive(Clone)]
pub struct SweepSigner {
    signer: PrivateKeySigner,
}

impl fmt::Debug for SweepSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SweepSigner")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}

impl SweepSigner {
    /// Import a signer from a hex private key, with or without `0x`.
    pub fn from_private_key(private_key: &str) -> Result<Self> {
        let trimmed = private_key.trim();
        let key = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        let bytes = Zeroizing::new(hex::decode(key)?);
        if bytes.len() != 32 {
            return Err(SweepError::InvalidPrivateKey(format!(
                "expected 32 bytes, got {}",
                bytes.len()
            )));
        }
        let signer = PrivateKeySigner::from_slice(&bytes)
            .map_err(|e| SweepError::InvalidPrivateKey(e.to_string()))?;
        Ok(Self { signer })
    }

    /// Returns the address controlled by the key.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Signs a legacy (EIP-155) transaction and encodes it for broadcast.
    pub fn sign_legacy(&self, mut tx: TxLegacy) -> Result<SignedTransaction> {
        let signature = self
            .signer
            .sign_transaction_sync(&mut tx)
            .map_err(|e| SweepError::SigningError(e.to_string()))?;
        let envelope = TxEnvelope::Legacy(tx.into_signed(signature));
        Ok(SignedTransaction {
            hash: *envelope.tx_hash(),
            raw: envelope.encoded_2718().into(),
        })
    }
}

/// Fields of a zero-value contract call sent as a legacy transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractCall {
    /// EIP-155 chain id
    pub chain_id: u64,
    /// Sender nonce
    pub nonce: u64,
    /// Gas price in wei
    pub gas_price: u128,
    /// Gas limit
    pub gas_limit: u64,
    /// Contract being called
    pub to: Address,
    /// ABI-encoded call data
    pub input: Bytes,
}

impl From<ContractCall> for TxLegacy {
    fn from(call: ContractCall) -> Self {
        TxLegacy {
            chain_id: Some(call.chain_id),
            nonce: call.nonce,
            gas_price: call.gas_price,
            gas_limit: call.gas_limit,
            to: TxKind::Call(call.to),
            value: U256::ZERO,
            input: call.input,
        }
    }
}
