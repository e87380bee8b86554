use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

static LOOSE_EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("loose email pattern")
});

static STRICT_EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("strict email pattern")
});

/// Find email-shaped substrings in `text`, clean and validate each one.
///
/// Returns unique addresses in order of first appearance. A match directly
/// touching another `@` belongs to a malformed multi-`@` token and is skipped.
pub fn extract_and_clean(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    LOOSE_EMAIL
        .find_iter(text)
        .filter(|m| !text[..m.start()].ends_with('@') && !text[m.end()..].starts_with('@'))
        .filter_map(|m| clean_email(m.as_str()))
        .filter(|email| seen.insert(email.clone()))
        .collect()
}

/// Normalize a raw candidate and accept it only if it fully matches the
/// strict `local@domain.tld` shape.
pub fn clean_email(raw: &str) -> Option<String> {
    let lowered = raw.trim().to_lowercase();
    let trimmed = lowered
        .trim_start_matches(|c: char| !c.is_ascii_alphabetic())
        .trim_end_matches(|c: char| !c.is_ascii_alphabetic());
    let email: String = trimmed.chars().filter(|c| !c.is_whitespace()).collect();

    STRICT_EMAIL.is_match(&email).then_some(email)
}

#[cfg(test)]
mod tests {
    use super::clean_email;

    #[test]
    fn leading_digits_and_trailing_punctuation_are_stripped() {
        assert_eq!(clean_email("  123.Info@Camp.org.. "), Some("info@camp.org".to_string()));
    }

    #[test]
    fn internal_whitespace_is_removed() {
        assert_eq!(clean_email("info @ camp.org"), Some("info@camp.org".to_string()));
    }

    #[test]
    fn nothing_left_after_cleaning_is_rejected() {
        assert_eq!(clean_email("1234"), None);
        assert_eq!(clean_email(""), None);
    }
}
