use url::Url;

/// Sub-pages probed on every site, in probe order after the base URL.
pub const CONTACT_PATH_SUFFIXES: [&str; 3] = ["/contact", "/about", "/contact-us"];

/// Parse a raw site string as an absolute HTTP(S) URL.
///
/// The string must start with a lowercase `http://` or `https://` exactly as
/// given; surrounding whitespace is the caller's business. Returns `None` for
/// everything else and for URLs without a host.
pub fn parse_site(raw: &str) -> Option<Url> {
    if !raw.starts_with("http://") && !raw.starts_with("https://") {
        return None;
    }
    let url = Url::parse(raw).ok()?;
    match url.scheme() {
        "http" | "https" if url.host_str().is_some_and(|h| !h.is_empty()) => Some(url),
        _ => None,
    }
}

/// Candidate URLs for a site: the base (trailing slashes stripped) followed by
/// the base with each contact suffix appended. Order is stable and duplicates
/// are dropped. Invalid sites yield no candidates.
pub fn candidate_urls(raw: &str) -> Vec<String> {
    if parse_site(raw).is_none() {
        return Vec::new();
    }
    let base = raw.trim_end_matches('/');

    let mut urls = Vec::with_capacity(1 + CONTACT_PATH_SUFFIXES.len());
    urls.push(base.to_string());
    for suffix in CONTACT_PATH_SUFFIXES {
        let candidate = format!("{base}{suffix}");
        if !urls.contains(&candidate) {
            urls.push(candidate);
        }
    }
    urls
}
