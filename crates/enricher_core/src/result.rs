use std::fmt;

/// First-seen social profile links.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SocialLinks {
    pub facebook: Option<String>,
    pub instagram: Option<String>,
}

/// Signals extracted from a single fetched page.
///
/// `emails` holds unique, validated addresses in the order they were found.
/// A failed fetch and a page without signals both produce the empty value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageResult {
    pub emails: Vec<String>,
    pub facebook: Option<String>,
    pub instagram: Option<String>,
}

impl PageResult {
    pub fn new(emails: Vec<String>, links: SocialLinks) -> Self {
        Self {
            emails,
            facebook: links.facebook,
            instagram: links.instagram,
        }
    }
}

/// Merged outcome for one valid site.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SiteResult {
    pub emails: Vec<String>,
    pub facebook: Option<String>,
    pub instagram: Option<String>,
}

impl SiteResult {
    pub fn from_social(links: SocialLinks) -> Self {
        Self {
            emails: Vec::new(),
            facebook: links.facebook,
            instagram: links.instagram,
        }
    }

    pub fn with_email(self, email: String) -> Self {
        Self {
            emails: vec![email],
            ..self
        }
    }

    pub fn first_email(&self) -> Option<&str> {
        self.emails.first().map(String::as_str)
    }

    pub fn has_contact(&self) -> bool {
        !self.emails.is_empty() || self.facebook.is_some() || self.instagram.is_some()
    }
}

impl From<PageResult> for SiteResult {
    fn from(page: PageResult) -> Self {
        Self {
            emails: page.emails,
            facebook: page.facebook,
            instagram: page.instagram,
        }
    }
}

/// Final, immutable result for one input site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteOutcome {
    /// The input was not an absolute HTTP(S) URL; nothing was fetched.
    Invalid,
    Scraped(SiteResult),
}

impl SiteOutcome {
    pub fn status(&self) -> ScrapeStatus {
        match self {
            SiteOutcome::Invalid => ScrapeStatus::InvalidUrl,
            SiteOutcome::Scraped(result) if result.has_contact() => ScrapeStatus::Success,
            SiteOutcome::Scraped(_) => ScrapeStatus::NoContact,
        }
    }

    pub fn result(&self) -> Option<&SiteResult> {
        match self {
            SiteOutcome::Invalid => None,
            SiteOutcome::Scraped(result) => Some(result),
        }
    }
}

/// Per-record status written next to the enriched row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrapeStatus {
    InvalidUrl,
    Success,
    NoContact,
}

impl ScrapeStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ScrapeStatus::InvalidUrl => "invalid_url",
            ScrapeStatus::Success => "success",
            ScrapeStatus::NoContact => "no_contact",
        }
    }
}

impl fmt::Display for ScrapeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
