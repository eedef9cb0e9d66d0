//! On-disk configuration (spec §6 CLI surface), loaded via `confy`/TOML
//! and overridable from the command line.

use std::path::PathBuf;

use indexer_primitives::ChainParams;
use serde::{Deserialize, Serialize};

/// Top-level persisted configuration. `Default` gives a workable
/// localhost/devnet setup so `confy` can materialize a config file on
/// first run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexerConfig {
    pub data_dir: PathBuf,
    pub rpc_endpoint: String,
    pub start_height: u64,
    pub num_workers: usize,
    pub batch_size: usize,
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub retry_delay_ms: u64,
    pub epoch_length: u64,
    pub fee_delegated_dynamic_fee_type: u8,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        let chain = ChainParams::default();
        Self {
            data_dir: PathBuf::from("./data"),
            rpc_endpoint: "http://127.0.0.1:8545".to_string(),
            start_height: 0,
            num_workers: 100,
            batch_size: 20,
            max_retries: 3,
            base_delay_ms: 100,
            retry_delay_ms: 500,
            epoch_length: chain.epoch_length,
            fee_delegated_dynamic_fee_type: chain.fee_delegated_dynamic_fee_type,
        }
    }
}

impl IndexerConfig {
    pub fn chain_params(&self) -> ChainParams {
        ChainParams {
            epoch_length: self.epoch_length,
            fee_delegated_dynamic_fee_type: self.fee_delegated_dynamic_fee_type,
        }
    }

    pub fn fetcher_config(&self) -> indexer_fetcher::FetcherConfig {
        indexer_fetcher::FetcherConfig {
            start_height: self.start_height,
            batch_size: self.batch_size,
            num_workers: self.num_workers,
            max_retries: self.max_retries,
            base_delay: std::time::Duration::from_millis(self.base_delay_ms),
            retry_delay: std::time::Duration::from_millis(self.retry_delay_ms),
            ..Default::default()
        }
    }
}

const APP_NAME: &str = "wbft-indexer";

/// Loads configuration from an explicit path if given, else from the
/// platform-conventional `confy` location, creating a default file on
/// first run.
pub fn load(explicit_path: Option<&PathBuf>) -> eyre::Result<IndexerConfig> {
    match explicit_path {
        Some(path) => Ok(confy::load_path(path)?),
        None => Ok(confy::load(APP_NAME, None)?),
    }
}
