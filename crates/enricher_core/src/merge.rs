use crate::{PageResult, SocialLinks};

/// Outcome of merging the page results of one site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergedPages {
    /// The first page (in candidate order) that yielded at least one email.
    Email(PageResult),
    /// No page yielded an email; first-seen social links across all pages.
    NoEmail(SocialLinks),
}

/// Merge page results in their given order.
///
/// The first page with a non-empty email set wins outright, including its own
/// social links. Otherwise the first Facebook and first Instagram link seen
/// across all pages are kept, each independently.
pub fn merge_page_results(pages: &[PageResult]) -> MergedPages {
    if let Some(page) = pages.iter().find(|page| !page.emails.is_empty()) {
        return MergedPages::Email(page.clone());
    }

    MergedPages::NoEmail(SocialLinks {
        facebook: pages.iter().find_map(|page| page.facebook.clone()),
        instagram: pages.iter().find_map(|page| page.instagram.clone()),
    })
}
