//! Enricher engine: concurrent fetching, signal extraction and checkpointed
//! batch orchestration.
mod batch;
mod decode;
mod engine;
mod extract;
mod fetch;
mod limiter;
mod links;
mod persist;
mod scrape;
mod table;
mod types;

pub use batch::{
    BatchOrchestrator, CheckpointError, CheckpointSink, NoopProgressSink, ProgressSink,
    DEFAULT_BATCH_SIZE,
};
pub use decode::{decode_body, DecodedBody};
pub use engine::{Engine, EngineConfig, EngineError, DEFAULT_MAX_CONCURRENT_FETCHES};
pub use extract::{clean_email, extract_and_clean};
pub use fetch::{FetchSettings, Fetcher, ReqwestTransport, Transport, DEFAULT_USER_AGENT};
pub use limiter::{FetchLimiter, LimiterPermit};
pub use links::{anchor_targets, extract_profile_links, visible_text};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use scrape::{mobile_facebook_url, SiteScraper};
pub use table::{CsvCheckpointSink, SiteTable, TableError, DEFAULT_WEBSITE_COLUMN};
pub use types::{EngineEvent, FailureKind, FetchError, TransportResponse};
