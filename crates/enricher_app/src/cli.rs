use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use enricher_engine::{EngineConfig, FetchSettings, DEFAULT_WEBSITE_COLUMN};
use log::LevelFilter;

/// Enrich a CSV of business records with contact emails and social profiles.
#[derive(Debug, Parser)]
#[command(name = "enrich", version)]
pub struct Cli {
    /// Input CSV with a header row.
    pub input: PathBuf,

    /// Output CSV; rewritten after every batch. Defaults to `<input>_enriched.csv`.
    #[arg(short, long, env = "ENRICH_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Header of the column holding each record's website.
    #[arg(long, env = "ENRICH_WEBSITE_COLUMN", default_value = DEFAULT_WEBSITE_COLUMN)]
    pub website_column: String,

    /// Sites scraped between two checkpoints.
    #[arg(long, env = "ENRICH_BATCH_SIZE", default_value_t = 10)]
    pub batch_size: usize,

    /// Maximum simultaneous HTTP requests for the whole run.
    #[arg(long, env = "ENRICH_CONCURRENCY", default_value_t = 5)]
    pub concurrency: usize,

    /// Per-request timeout in seconds.
    #[arg(long, env = "ENRICH_TIMEOUT_SECS", default_value_t = 15)]
    pub timeout_secs: u64,

    /// Attempts per URL, including the first.
    #[arg(long, env = "ENRICH_RETRIES", default_value_t = 3)]
    pub retries: u32,

    #[arg(long, env = "ENRICH_LOG_LEVEL", default_value_t = LevelFilter::Info)]
    pub log_level: LevelFilter,

    /// Also write logs to this file.
    #[arg(long, env = "ENRICH_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| default_output_path(&self.input))
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            fetch: FetchSettings {
                request_timeout: Duration::from_secs(self.timeout_secs),
                max_attempts: self.retries,
                ..FetchSettings::default()
            },
            max_concurrent_fetches: self.concurrency,
            batch_size: self.batch_size,
        }
    }
}

fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    input.with_file_name(format!("{stem}_enriched.csv"))
}
