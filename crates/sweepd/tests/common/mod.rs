//! In-memory chain used by the pipeline tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use alloy::consensus::{TxEnvelope, TxLegacy};
use alloy::eips::eip2718::Decodable2718;
use alloy::primitives::{address, keccak256, Address, Bytes, Log, B256, U256};
use alloy::sol_types::SolEvent;
use async_trait::async_trait;
use sweepd::erc20::abi::IERC20;
use sweepd::erc20::Erc20Adapter;
use sweepd::error::{Result, SweepError};
use sweepd::ethereum::SweepSigner;
use sweepd::Chain;

// First anvil/hardhat development account
pub const WALLET_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const WALLET: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
pub const DESTINATION: Address = address!("70997970C51812dc3A010C7d01b50e0d17dc79C8");
pub const COUNTERPARTY: Address = address!("3C44CdDdB6a900fa2b585dd299e03d12FA4293BC");

pub fn signer() -> SweepSigner {
    SweepSigner::from_private_key(WALLET_KEY).unwrap()
}

pub fn tx_hash(n: u8) -> B256 {
    B256::repeat_byte(n)
}

pub fn contract(n: u8) -> Address {
    Address::repeat_byte(n)
}

/// A `Transfer(from, to, value)` log emitted by `token`.
pub fn transfer_log(token: Address, from: Address, to: Address, value: u64) -> Log {
    Log::new_unchecked(
        token,
        vec![IERC20::Transfer::SIGNATURE_HASH, from.into_word(), to.into_word()],
        Bytes::from(U256::from(value).to_be_bytes::<32>().to_vec()),
    )
}

pub fn raw_log(emitter: Address, topics: Vec<B256>, data: Vec<u8>) -> Log {
    Log::new_unchecked(emitter, topics, Bytes::from(data))
}

pub struct MockTokenState {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub total_supply: U256,
    pub reverts: bool,
    /// Successive `balanceOf` results; the last one repeats
    balances: Mutex<VecDeque<U256>>,
    pub balance_calls: AtomicUsize,
}

impl MockTokenState {
    pub fn new(symbol: &str, total_supply: u64, balances: &[u64]) -> Self {
        Self {
            name: format!("{symbol} Token"),
            symbol: symbol.to_string(),
            decimals: 18,
            total_supply: U256::from(total_supply),
            reverts: false,
            balances: Mutex::new(balances.iter().map(|b| U256::from(*b)).collect()),
            balance_calls: AtomicUsize::new(0),
        }
    }

    pub fn reverting(symbol: &str) -> Self {
        Self {
            reverts: true,
            ..Self::new(symbol, 0, &[0])
        }
    }

    fn next_balance(&self) -> U256 {
        self.balance_calls.fetch_add(1, Ordering::SeqCst);
        let mut balances = self.balances.lock().unwrap();
        if balances.len() > 1 {
            balances.pop_front().unwrap()
        } else {
            balances.front().copied().unwrap_or_default()
        }
    }
}

#[derive(Clone)]
pub struct MockToken {
    address: Address,
    state: Option<Arc<MockTokenState>>,
}

impl MockToken {
    fn state(&self, method: &'static str) -> Result<&MockTokenState> {
        match &self.state {
            Some(state) if !state.reverts => Ok(state),
            _ => Err(SweepError::ContractCall {
                contract: self.address.to_string(),
                method,
                reason: "execution reverted".to_string(),
            }),
        }
    }
}

#[async_trait]
impl Erc20Adapter for MockToken {
    fn contract_address(&self) -> Address {
        self.address
    }

    async fn name(&self) -> Result<String> {
        Ok(self.state("name")?.name.clone())
    }

    async fn symbol(&self) -> Result<String> {
        Ok(self.state("symbol")?.symbol.clone())
    }

    async fn decimals(&self) -> Result<u8> {
        Ok(self.state("decimals")?.decimals)
    }

    async fn total_supply(&self) -> Result<U256> {
        Ok(self.state("totalSupply")?.total_supply)
    }

    async fn balance_of(&self, _owner: Address) -> Result<U256> {
        Ok(self.state("balanceOf")?.next_balance())
    }
}

#[derive(Default)]
pub struct MockChain {
    receipts: HashMap<B256, Option<Vec<Log>>>,
    receipt_errors: HashSet<B256>,
    tokens: HashMap<Address, Arc<MockTokenState>>,
    failing_gas: HashSet<Address>,
    nonce: Mutex<u64>,
    broadcasts: Mutex<Vec<TxLegacy>>,
    pub gas_estimates: AtomicUsize,
}

impl MockChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_receipt(mut self, hash: B256, logs: Vec<Log>) -> Self {
        self.receipts.insert(hash, Some(logs));
        self
    }

    pub fn with_pending(mut self, hash: B256) -> Self {
        self.receipts.insert(hash, None);
        self
    }

    pub fn with_receipt_error(mut self, hash: B256) -> Self {
        self.receipt_errors.insert(hash);
        self
    }

    pub fn with_token(mut self, address: Address, state: MockTokenState) -> Self {
        self.tokens.insert(address, Arc::new(state));
        self
    }

    pub fn with_failing_gas(mut self, address: Address) -> Self {
        self.failing_gas.insert(address);
        self
    }

    pub fn token_state(&self, address: Address) -> Arc<MockTokenState> {
        self.tokens[&address].clone()
    }

    /// Transactions broadcast so far, decoded.
    pub fn broadcasts(&self) -> Vec<TxLegacy> {
        self.broadcasts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Chain for MockChain {
    type Token = MockToken;

    fn token(&self, contract: Address) -> MockToken {
        MockToken {
            address: contract,
            state: self.tokens.get(&contract).cloned(),
        }
    }

    async fn receipt_logs(&self, tx_hash: B256) -> Result<Option<Vec<Log>>> {
        if self.receipt_errors.contains(&tx_hash) {
            return Err(SweepError::rpc("eth_getTransactionReceipt", "connection reset"));
        }
        Ok(self.receipts.get(&tx_hash).cloned().flatten())
    }

    async fn chain_id(&self) -> Result<u64> {
        Ok(1)
    }

    async fn gas_price(&self) -> Result<u128> {
        Ok(20_000_000_000)
    }

    async fn estimate_gas(&self, _from: Address, to: Address, _data: Bytes) -> Result<u64> {
        self.gas_estimates.fetch_add(1, Ordering::SeqCst);
        if self.failing_gas.contains(&to) {
            return Err(SweepError::rpc("eth_estimateGas", "execution reverted"));
        }
        Ok(52_000)
    }

    async fn pending_nonce(&self, _address: Address) -> Result<u64> {
        Ok(*self.nonce.lock().unwrap())
    }

    async fn send_raw_transaction(&self, raw: Bytes) -> Result<B256> {
        let envelope = TxEnvelope::decode_2718(&mut raw.as_ref())
            .map_err(|e| SweepError::BroadcastError(e.to_string()))?;
        let TxEnvelope::Legacy(signed) = envelope else {
            return Err(SweepError::BroadcastError("expected a legacy transaction".into()));
        };
        self.broadcasts.lock().unwrap().push(signed.tx().clone());
        *self.nonce.lock().unwrap() += 1;
        Ok(keccak256(&raw))
    }
}
