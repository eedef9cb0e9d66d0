//! `wbft-indexer`: CLI entry point wiring components A–F together
//! (spec §6).
//!
//! Exit codes: `0` normal shutdown via signal, `1` fatal init failure,
//! `2` invalid configuration.

mod cli;
mod config;

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use indexer_db::MdbxDatabase;
use indexer_fetcher::Fetcher;
use indexer_metrics::{Optimizer, OptimizerConfig, RpcMetrics};
use indexer_provider::{BlockReader, Provider};
use indexer_rpc_client::HttpRpcClient;
use tokio_util::sync::CancellationToken;

use cli::{Cli, Command};
use config::IndexerConfig;

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let config = match config::load(cli.config.as_ref()) {
        Ok(cfg) => cfg,
        Err(err) => {
            tracing::error!(error = %err, "invalid configuration");
            return ExitCode::from(2);
        }
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(err) => {
            tracing::error!(error = %err, "failed to start async runtime");
            return ExitCode::from(1);
        }
    };

    match runtime.block_on(run(cli.command, config)) {
        Ok(()) => ExitCode::from(0),
        Err(err) => {
            tracing::error!(error = %err, "fatal error");
            ExitCode::from(1)
        }
    }
}

async fn run(command: Command, config: IndexerConfig) -> eyre::Result<()> {
    match command {
        Command::Run { data_dir, rpc, start_height } => {
            let mut config = config;
            if let Some(data_dir) = data_dir {
                config.data_dir = data_dir;
            }
            if let Some(rpc) = rpc {
                config.rpc_endpoint = rpc;
            }
            if let Some(start_height) = start_height {
                config.start_height = start_height;
            }
            run_ingestion(config).await
        }
        Command::Repair { start, end } => repair(config, start, end).await,
        Command::DumpDiagnostics => dump_diagnostics(config),
    }
}

fn build_fetcher(
    config: &IndexerConfig,
) -> eyre::Result<(Fetcher<MdbxDatabase, HttpRpcClient>, Arc<Optimizer>)> {
    std::fs::create_dir_all(&config.data_dir)?;
    let db = Arc::new(MdbxDatabase::open(&config.data_dir)?);
    let rpc = Arc::new(HttpRpcClient::new(config.rpc_endpoint.clone(), config.chain_params()));
    let metrics = Arc::new(RpcMetrics::new(100, Duration::from_secs(60)));
    let optimizer = Arc::new(Optimizer::new(OptimizerConfig::default(), config.num_workers, config.batch_size));

    let fetcher = Fetcher::new(db, config.chain_params(), rpc, config.fetcher_config(), metrics)
        .with_optimizer(optimizer.clone());

    Ok((fetcher, optimizer))
}

async fn run_ingestion(config: IndexerConfig) -> eyre::Result<()> {
    let (fetcher, _optimizer) = build_fetcher(&config)?;
    let cancel = CancellationToken::new();

    let shutdown = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutdown signal received");
            cancel.cancel();
        })
    };

    let result = fetcher.run_with_gap_recovery(&cancel).await;
    shutdown.abort();

    match result {
        Ok(()) => Ok(()),
        Err(indexer_fetcher::FetchError::Cancelled) => Ok(()),
        Err(err) => Err(eyre::eyre!(err)),
    }
}

async fn repair(config: IndexerConfig, start: u64, end: u64) -> eyre::Result<()> {
    let (fetcher, _optimizer) = build_fetcher(&config)?;
    let cancel = CancellationToken::new();
    fetcher.fetch_range_concurrent(start, end, &cancel).await.map_err(|e| eyre::eyre!(e))?;
    tracing::info!(start, end, "repair complete");
    Ok(())
}

fn dump_diagnostics(config: IndexerConfig) -> eyre::Result<()> {
    std::fs::create_dir_all(&config.data_dir)?;
    let db = Arc::new(MdbxDatabase::open(&config.data_dir)?);
    let provider = Provider::new(db);

    let latest_height = provider.get_latest_height().ok();
    let report = serde_json::json!({
        "data_dir": config.data_dir,
        "rpc_endpoint": config.rpc_endpoint,
        "latest_height": latest_height,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
