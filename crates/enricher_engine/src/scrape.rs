use engine_logging::{engine_debug, engine_info};
use enricher_core::{
    candidate_urls, merge_page_results, parse_site, MergedPages, PageResult, SiteOutcome,
    SiteResult,
};
use futures_util::future::join_all;
use scraper::Html;
use url::Url;

use crate::extract::extract_and_clean;
use crate::fetch::Fetcher;
use crate::links::{extract_profile_links, visible_text};

const MOBILE_FACEBOOK_HOST: &str = "m.facebook.com";

/// Scrapes one site: its candidate pages concurrently, then the Facebook
/// fallback when no page carried an email.
#[derive(Clone)]
pub struct SiteScraper {
    fetcher: Fetcher,
}

impl SiteScraper {
    pub fn new(fetcher: Fetcher) -> Self {
        Self { fetcher }
    }

    /// Fetch one page and extract its signals. A failed fetch yields the
    /// empty result.
    pub async fn scrape_page(&self, url: &str) -> PageResult {
        match self.fetcher.fetch(url).await {
            Ok(body) => page_result_from_html(&body),
            Err(err) => {
                engine_debug!("Page yielded nothing url={} error={}", url, err);
                PageResult::default()
            }
        }
    }

    /// Look for an email on the mobile rendering of a Facebook page. The raw
    /// body is scanned, since addresses often sit in scripts or metadata.
    pub async fn scrape_facebook_email(&self, facebook_url: &str) -> Option<String> {
        let mobile_url = mobile_facebook_url(facebook_url);
        match self.fetcher.fetch(&mobile_url).await {
            Ok(body) => extract_and_clean(&body).into_iter().next(),
            Err(err) => {
                engine_debug!("Facebook fallback failed url={} error={}", mobile_url, err);
                None
            }
        }
    }

    pub async fn scrape_site(&self, site: &str) -> SiteOutcome {
        if parse_site(site).is_none() {
            engine_info!("Skipping invalid site {:?}", site);
            return SiteOutcome::Invalid;
        }

        let candidates = candidate_urls(site);
        // join_all keeps candidate order, so the merge below does not depend
        // on which fetch finished first.
        let pages = join_all(candidates.iter().map(|url| self.scrape_page(url))).await;

        let links = match merge_page_results(&pages) {
            MergedPages::Email(page) => return SiteOutcome::Scraped(SiteResult::from(page)),
            MergedPages::NoEmail(links) => links,
        };

        let fallback_email = match links.facebook.as_deref() {
            Some(facebook) => self.scrape_facebook_email(facebook).await,
            None => None,
        };

        let result = SiteResult::from_social(links);
        SiteOutcome::Scraped(match fallback_email {
            Some(email) => result.with_email(email),
            None => result,
        })
    }
}

fn page_result_from_html(body: &str) -> PageResult {
    let document = Html::parse_document(body);
    let emails = extract_and_clean(&visible_text(&document));
    PageResult::new(emails, extract_profile_links(&document))
}

/// Rewrite a Facebook link to the `m.facebook.com` host. Links on other hosts
/// and unparsable links are returned unchanged.
pub fn mobile_facebook_url(facebook_url: &str) -> String {
    let trimmed = facebook_url.trim();
    let absolute = if trimmed.starts_with("//") {
        format!("https:{trimmed}")
    } else {
        trimmed.to_string()
    };

    let Ok(mut url) = Url::parse(&absolute) else {
        return absolute;
    };
    let is_desktop_host = url.host_str().is_some_and(|host| {
        host.eq_ignore_ascii_case("facebook.com") || host.eq_ignore_ascii_case("www.facebook.com")
    });
    if is_desktop_host && url.set_host(Some(MOBILE_FACEBOOK_HOST)).is_ok() {
        return url.to_string();
    }
    absolute
}
