//! sweepd command-line sweeper
//!
//! Scans a wallet's history for ERC-20 tokens and moves every balance to a
//! destination address. Diagnostics go to stderr through `tracing`
//! (`RUST_LOG` overrides the default `info` level); stdout carries one line
//! per transfer and a final summary.

mod config;
mod report;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use config::{Cli, HistorySettings, Settings};
use sweepd::ethereum::{BlockRangeHistory, EthClient, EtherscanHistory, SweepSigner, TransactionSource};
use sweepd::{RpcChain, SweepOptions, SweepReport, Sweeper};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::try_from(Cli::parse())?;
    let signer = config::load_signer(settings.expected_wallet)?;

    let client = EthClient::connect_with_timeout(&settings.rpc_url, settings.timeout)?;
    let chain_id = client
        .chain_id()
        .await
        .with_context(|| format!("cannot reach node at {}", settings.rpc_url))?;
    info!(
        chain_id,
        wallet = %signer.address(),
        destination = %settings.destination,
        dry_run = settings.dry_run,
        history = ?settings.history,
        "starting sweep"
    );

    let options = settings.sweep_options();
    let report = match &settings.history {
        HistorySettings::Etherscan { url, api_key } => {
            let history = EtherscanHistory::new(url, api_key, chain_id, settings.timeout)?;
            run(client, history, signer, options).await?
        }
        HistorySettings::BlockRange {
            from_block,
            to_block,
        } => {
            let history = BlockRangeHistory::new(client.clone(), *from_block, *to_block);
            run(client, history, signer, options).await?
        }
    };

    for entry in &report.entries {
        if let Some(line) = report::entry_line(entry, settings.destination) {
            println!("{line}");
        }
    }
    println!("{}", report::summary(&report));

    if report.failed() > 0 {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

async fn run<H: TransactionSource>(
    client: EthClient,
    history: H,
    signer: SweepSigner,
    options: SweepOptions,
) -> anyhow::Result<SweepReport> {
    let sweeper = Sweeper::new(RpcChain::new(client), history, signer, options)?;
    let report = sweeper.run().await.context("history scan failed")?;
    Ok(report)
}
