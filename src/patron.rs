use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

/// Longest identifier accepted by the form.
pub const MAX_LEN: usize = 20;

static PATRON_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new("^p[a-zA-Z0-9]*a$").expect("patron pattern is a valid regex"));

// must start with lowercase 'p', end with lowercase 'a', and be ascii alphanumeric in between
pub fn is_valid_patron_number(patron_record_number: &str) -> bool {
    PATRON_PATTERN.is_match(patron_record_number) && patron_record_number.chars().count() <= MAX_LEN
}

/// A patron record number that passed validation, e.g. `p1234567a`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatronRecordNumber(String);

impl PatronRecordNumber {
    /// Trims surrounding whitespace and validates the rest.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        is_valid_patron_number(trimmed).then(|| Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn export_filename(&self) -> String {
        format!("{}_Reading-History.csv", self.0)
    }
}

impl fmt::Display for PatronRecordNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
