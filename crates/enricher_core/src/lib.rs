//! Enricher core: pure domain model for contact enrichment, free of IO.
mod merge;
mod result;
mod site;
mod state;

pub use merge::{merge_page_results, MergedPages};
pub use result::{PageResult, ScrapeStatus, SiteOutcome, SiteResult, SocialLinks};
pub use site::{candidate_urls, parse_site, CONTACT_PATH_SUFFIXES};
pub use state::BatchState;
