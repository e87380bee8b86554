mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use engine_logging::{engine_info, LogDestination};
use enricher_core::ScrapeStatus;
use enricher_engine::{CsvCheckpointSink, Engine, EngineEvent, ProgressSink, SiteTable};

use cli::Cli;

/// Logs progress at the granularity users care about.
struct LogProgress;

impl ProgressSink for LogProgress {
    fn emit(&self, event: EngineEvent) {
        if let EngineEvent::BatchCheckpointed {
            completed, total, ..
        } = event
        {
            engine_info!("Progress {}/{} sites saved", completed, total);
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let destination = match &cli.log_file {
        Some(path) => LogDestination::Both(path.clone()),
        None => LogDestination::Terminal,
    };
    engine_logging::initialize(destination, cli.log_level);

    let table = SiteTable::from_csv_path(&cli.input, &cli.website_column)
        .with_context(|| format!("failed to read input table {:?}", cli.input))?;
    let sites = table.sites();
    let output = cli.output_path();
    engine_info!(
        "Loaded {} records from {:?}; writing to {:?}",
        sites.len(),
        cli.input,
        output
    );

    let engine = Engine::new(cli.engine_config()).context("failed to build HTTP client")?;
    let mut sink = CsvCheckpointSink::new(table, output.clone());
    let outcomes = engine
        .run_blocking(&sites, &mut sink, &LogProgress)
        .with_context(|| format!("enrichment aborted; last checkpoint is in {output:?}"))?;

    let count = |status: ScrapeStatus| outcomes.iter().filter(|o| o.status() == status).count();
    engine_info!(
        "Done: success={} no_contact={} invalid_url={} output={:?}",
        count(ScrapeStatus::Success),
        count(ScrapeStatus::NoContact),
        count(ScrapeStatus::InvalidUrl),
        output
    );
    Ok(())
}
