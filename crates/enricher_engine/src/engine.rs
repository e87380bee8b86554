use std::sync::Arc;

use engine_logging::engine_info;
use enricher_core::SiteOutcome;

use crate::batch::{
    BatchOrchestrator, CheckpointError, CheckpointSink, ProgressSink, DEFAULT_BATCH_SIZE,
};
use crate::fetch::{FetchSettings, Fetcher, ReqwestTransport, Transport};
use crate::limiter::FetchLimiter;
use crate::scrape::SiteScraper;
use crate::FetchError;

pub const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 5;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub fetch: FetchSettings,
    /// Shared by every fetch of a run, across all sites and pages.
    pub max_concurrent_fetches: usize,
    pub batch_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fetch: FetchSettings::default(),
            max_concurrent_fetches: DEFAULT_MAX_CONCURRENT_FETCHES,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

/// One enrichment run: a single limiter, fetcher and orchestrator wired
/// together from an [`EngineConfig`].
pub struct Engine {
    orchestrator: BatchOrchestrator,
    limiter: FetchLimiter,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Result<Self, FetchError> {
        let transport = ReqwestTransport::new(&config.fetch)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    pub fn with_transport(config: EngineConfig, transport: Arc<dyn Transport>) -> Self {
        let limiter = FetchLimiter::new(config.max_concurrent_fetches);
        let fetcher = Fetcher::new(transport, limiter.clone(), config.fetch);
        let orchestrator = BatchOrchestrator::new(SiteScraper::new(fetcher), config.batch_size);
        Self {
            orchestrator,
            limiter,
        }
    }

    pub fn limiter(&self) -> &FetchLimiter {
        &self.limiter
    }

    pub async fn run<S: AsRef<str>>(
        &self,
        sites: &[S],
        sink: &mut dyn CheckpointSink,
        progress: &dyn ProgressSink,
    ) -> Result<Vec<SiteOutcome>, CheckpointError> {
        engine_info!(
            "Run starting sites={} batch_size={} max_concurrent_fetches={}",
            sites.len(),
            self.orchestrator.batch_size(),
            self.limiter.capacity()
        );
        let outcomes = self.orchestrator.scrape_batch(sites, sink, progress).await?;
        engine_info!(
            "Run finished sites={} peak_in_flight={}",
            outcomes.len(),
            self.limiter.peak_in_flight()
        );
        Ok(outcomes)
    }

    /// Run on a fresh multi-threaded tokio runtime, blocking the caller.
    pub fn run_blocking<S: AsRef<str>>(
        &self,
        sites: &[S],
        sink: &mut dyn CheckpointSink,
        progress: &dyn ProgressSink,
    ) -> Result<Vec<SiteOutcome>, EngineError> {
        let runtime = tokio::runtime::Runtime::new().map_err(EngineError::Runtime)?;
        Ok(runtime.block_on(self.run(sites, sink, progress))?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to start async runtime: {0}")]
    Runtime(std::io::Error),
    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),
}
