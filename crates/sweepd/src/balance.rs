use alloy::primitives::{Address, U256};
use sweepd_erc20::Erc20Adapter;
use sweepd_error::Result;

/// Returns `wallet`'s raw balance of `token`.
///
/// Always a fresh read at the latest block; nothing is cached here.
pub async fn resolve_balance<A: Erc20Adapter + ?Sized>(token: &A, wallet: Address) -> Result<U256> {
    token.balance_of(wallet).await
}
