use engine_logging::{engine_debug, engine_info};
use enricher_core::{BatchState, SiteOutcome};
use futures_util::future::join_all;

use crate::persist::PersistError;
use crate::scrape::SiteScraper;
use crate::EngineEvent;

pub const DEFAULT_BATCH_SIZE: usize = 100;

#[derive(Debug, thiserror::Error)]
pub enum CheckpointError {
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("checkpoint rejected: {0}")]
    Rejected(String),
}

/// Durable destination for accumulated results.
///
/// Called with the full state after every batch, so each call must overwrite
/// whatever the previous one stored.
pub trait CheckpointSink {
    fn checkpoint(&mut self, state: &BatchState) -> Result<(), CheckpointError>;
}

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgressSink;

impl ProgressSink for NoopProgressSink {
    fn emit(&self, _event: EngineEvent) {}
}

/// Drives the site scraper over the input one batch at a time.
#[derive(Clone)]
pub struct BatchOrchestrator {
    scraper: SiteScraper,
    batch_size: usize,
}

impl BatchOrchestrator {
    /// A batch size of zero is raised to one.
    pub fn new(scraper: SiteScraper, batch_size: usize) -> Self {
        Self {
            scraper,
            batch_size: batch_size.max(1),
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Scrape `sites` in consecutive batches. Sites inside a batch run
    /// concurrently; the sink sees batch N before batch N+1 starts.
    ///
    /// Returns one outcome per site, in input order. Only a failing sink
    /// aborts the run.
    pub async fn scrape_batch<S: AsRef<str>>(
        &self,
        sites: &[S],
        sink: &mut dyn CheckpointSink,
        progress: &dyn ProgressSink,
    ) -> Result<Vec<SiteOutcome>, CheckpointError> {
        let total = sites.len();
        let mut state = BatchState::new(total);

        if sites.is_empty() {
            sink.checkpoint(&state)?;
            return Ok(Vec::new());
        }

        for (batch_index, batch) in sites.chunks(self.batch_size).enumerate() {
            let offset = state.completed();
            engine_info!(
                "Batch {} starting sites={}..{} of {}",
                batch_index + 1,
                offset + 1,
                offset + batch.len(),
                total
            );

            let outcomes = join_all(
                batch
                    .iter()
                    .map(|site| self.scraper.scrape_site(site.as_ref())),
            )
            .await;

            for (i, outcome) in outcomes.iter().enumerate() {
                engine_debug!(
                    "Site {} status={} site={}",
                    offset + i,
                    outcome.status(),
                    batch[i].as_ref()
                );
                progress.emit(EngineEvent::SiteCompleted {
                    index: offset + i,
                    status: outcome.status(),
                });
            }

            state.record_batch(outcomes);
            sink.checkpoint(&state)?;
            engine_info!(
                "Batch {} checkpointed completed={} total={}",
                batch_index + 1,
                state.completed(),
                total
            );
            progress.emit(EngineEvent::BatchCheckpointed {
                batch: batch_index,
                completed: state.completed(),
                total,
            });
        }

        Ok(state.into_outcomes())
    }
}
