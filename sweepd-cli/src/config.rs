//! Configuration

use std::collections::HashSet;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::Parser;
use sweepd::ethereum::alloy::primitives::Address;
use sweepd::ethereum::history::ETHERSCAN_V2_URL;
use sweepd::ethereum::SweepSigner;
use sweepd::{SweepOptions, TokenFilter};

/// Environment variable holding the wallet's private key
pub const PRIVATE_KEY_VAR: &str = "SWEEP_PRIVATE_KEY";

/// Sweep every ERC-20 balance of a wallet to another address.
///
/// The wallet's private key is read from the SWEEP_PRIVATE_KEY environment
/// variable (a `.env` file in the working directory is loaded first).
#[derive(Debug, Parser)]
#[command(name = "sweepd", version, about)]
pub struct Cli {
    /// JSON-RPC endpoint of the node
    #[arg(long, env = "SWEEP_RPC_URL")]
    pub rpc_url: String,

    /// Address receiving the swept tokens
    #[arg(long, env = "SWEEP_DESTINATION")]
    pub destination: Address,

    /// Expected wallet address; must match the private key
    #[arg(long, env = "SWEEP_WALLET_ADDRESS")]
    pub wallet: Option<Address>,

    /// Etherscan API key; without one, history is read by scanning blocks
    #[arg(long, env = "ETHERSCAN_API_KEY", hide_env_values = true)]
    pub etherscan_api_key: Option<String>,

    /// Etherscan-compatible API endpoint
    #[arg(long, env = "ETHERSCAN_API_URL", default_value = ETHERSCAN_V2_URL)]
    pub etherscan_url: String,

    /// First block of a block-range scan
    #[arg(long, env = "SWEEP_FROM_BLOCK", default_value_t = 0)]
    pub from_block: u64,

    /// Last block of a block-range scan [default: latest]
    #[arg(long, env = "SWEEP_TO_BLOCK")]
    pub to_block: Option<u64>,

    /// Timeout for every RPC and HTTP request, in seconds
    #[arg(long, env = "SWEEP_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,

    /// Only sweep these token contracts
    #[arg(long = "only", env = "SWEEP_ONLY_TOKENS", value_delimiter = ',')]
    pub only: Vec<Address>,

    /// Never sweep these token contracts
    #[arg(long = "skip", env = "SWEEP_SKIP_TOKENS", value_delimiter = ',')]
    pub skip: Vec<Address>,

    /// Report what would be sent without signing anything
    #[arg(long, env = "SWEEP_DRY_RUN")]
    pub dry_run: bool,
}

/// Where the wallet's transaction history comes from.
#[derive(Clone, PartialEq, Eq)]
pub enum HistorySettings {
    Etherscan { url: String, api_key: String },
    BlockRange { from_block: u64, to_block: Option<u64> },
}

impl std::fmt::Debug for HistorySettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Etherscan { url, .. } => f
                .debug_struct("Etherscan")
                .field("url", url)
                .finish_non_exhaustive(),
            Self::BlockRange {
                from_block,
                to_block,
            } => f
                .debug_struct("BlockRange")
                .field("from_block", from_block)
                .field("to_block", to_block)
                .finish(),
        }
    }
}

/// Validated settings of a run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub rpc_url: String,
    pub destination: Address,
    pub expected_wallet: Option<Address>,
    pub history: HistorySettings,
    pub timeout: Duration,
    pub filter: TokenFilter,
    pub dry_run: bool,
}

impl Settings {
    /// Options handed to the sweeper.
    pub fn sweep_options(&self) -> SweepOptions {
        SweepOptions {
            destination: self.destination,
            dry_run: self.dry_run,
            filter: self.filter.clone(),
        }
    }
}

impl TryFrom<Cli> for Settings {
    type Error = anyhow::Error;

    fn try_from(cli: Cli) -> anyhow::Result<Self> {
        if cli.timeout_secs == 0 {
            bail!("--timeout-secs must be at least 1");
        }
        if cli.destination == Address::ZERO {
            bail!("destination is the zero address");
        }
        if let Some(to_block) = cli.to_block {
            if to_block < cli.from_block {
                bail!("--to-block {to_block} is before --from-block {}", cli.from_block);
            }
        }

        let history = match cli.etherscan_api_key.filter(|key| !key.trim().is_empty()) {
            Some(api_key) => HistorySettings::Etherscan {
                url: cli.etherscan_url,
                api_key: api_key.trim().to_string(),
            },
            None => HistorySettings::BlockRange {
                from_block: cli.from_block,
                to_block: cli.to_block,
            },
        };

        Ok(Self {
            rpc_url: cli.rpc_url,
            destination: cli.destination,
            expected_wallet: cli.wallet,
            history,
            timeout: Duration::from_secs(cli.timeout_secs),
            filter: TokenFilter {
                only: cli.only.into_iter().collect::<HashSet<_>>(),
                skip: cli.skip.into_iter().collect::<HashSet<_>>(),
            },
            dry_run: cli.dry_run,
        })
    }
}

/// Loads the signer from the environment and checks it against the
/// configured wallet address.
pub fn load_signer(expected_wallet: Option<Address>) -> anyhow::Result<SweepSigner> {
    let key = std::env::var(PRIVATE_KEY_VAR)
        .with_context(|| format!("{PRIVATE_KEY_VAR} must be set"))?;
    let signer = SweepSigner::from_private_key(&key)?;
    check_wallet(signer.address(), expected_wallet)?;
    Ok(signer)
}

fn check_wallet(derived: Address, expected: Option<Address>) -> anyhow::Result<()> {
    match expected {
        Some(expected) if expected != derived => bail!(
            "wallet address {expected} does not match the private key (derives {derived})"
        ),
        _ => Ok(()),
    }
}
