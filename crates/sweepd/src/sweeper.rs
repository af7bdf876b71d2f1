//! Sweep of a single token balance.

use alloy::primitives::{Address, B256};
use sweepd_erc20::abi::encode_transfer;
use sweepd_erc20::{TokenAmount, TokenMetadata};
use sweepd_error::{Result, SweepError};
use sweepd_ethereum::{ContractCall, SweepSigner};
use tracing::{debug, info};

use crate::balance::resolve_balance;
use crate::chain::Chain;

/// Why a holding produced no transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The balance was zero
    EmptyBalance,
    /// Excluded by the token filter
    Filtered,
}

/// The result of attempting to sweep one token.
#[derive(Debug)]
pub enum SweepOutcome {
    /// A transfer was broadcast
    Sent {
        tx_hash: B256,
        amount: TokenAmount,
    },
    /// The transfer was prepared but not signed or sent
    DryRun {
        amount: TokenAmount,
        gas_limit: u64,
        gas_price: u128,
    },
    Skipped(SkipReason),
    Failed(SweepError),
}

/// Moves the signer's whole balance of `contract` to `destination`.
///
/// Metadata and balance are read again right before signing, so the amount
/// sent is the live balance rather than the one seen during the scan.
/// Returns the freshly read metadata alongside the outcome.
pub async fn sweep_token<C: Chain + ?Sized>(
    chain: &C,
    signer: &SweepSigner,
    destination: Address,
    contract: Address,
    dry_run: bool,
) -> Result<(TokenMetadata, SweepOutcome)> {
    let wallet = signer.address();
    let token = chain.token(contract);
    let metadata = TokenMetadata::fetch(&token).await?;
    let balance = resolve_balance(&token, wallet).await?;
    let amount = TokenAmount::new(balance, metadata.decimals);
    if amount.is_zero() {
        debug!(%contract, "live balance is zero");
        return Ok((metadata, SweepOutcome::Skipped(SkipReason::EmptyBalance)));
    }

    let input = encode_transfer(destination, balance);
    let gas_price = chain.gas_price().await?;
    let gas_limit = chain.estimate_gas(wallet, contract, input.clone()).await?;
    let nonce = chain.pending_nonce(wallet).await?;

    if dry_run {
        info!(%contract, symbol = %metadata.symbol, %amount, gas_limit, "dry run");
        return Ok((
            metadata,
            SweepOutcome::DryRun {
                amount,
                gas_limit,
                gas_price,
            },
        ));
    }

    let chain_id = chain.chain_id().await?;
    let signed = signer.sign_legacy(
        ContractCall {
            chain_id,
            nonce,
            gas_price,
            gas_limit,
            to: contract,
            input,
        }
        .into(),
    )?;
    debug!(hash = %signed.hash, nonce, "signed transfer");
    let tx_hash = chain.send_raw_transaction(signed.raw).await?;

    info!(
        %contract,
        symbol = %metadata.symbol,
        %amount,
        %destination,
        %tx_hash,
        nonce,
        "transfer broadcast"
    );
    Ok((metadata, SweepOutcome::Sent { tx_hash, amount }))
}
