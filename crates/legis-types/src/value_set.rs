//! Semicolon-encoded multi-value fields
//!
//! Source spreadsheets store multi-valued columns as `"Fisheries; Pollution"`.
//! [`ValueSet`] is the decoded form: ordered, deduplicated case-insensitively,
//! with the first-seen casing kept as canonical.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Separator used when re-encoding a set for export
pub const VALUE_SEPARATOR: &str = "; ";

lazy_static! {
    static ref SEMICOLON_SPLIT: Regex = Regex::new(r"\s*;\s*").unwrap();
}

/// Ordered set of strings with case-insensitive identity
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValueSet(Vec<String>);

impl ValueSet {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Decode a semicolon-joined field. Blank segments are dropped.
    pub fn parse(encoded: &str) -> Self {
        let mut set = Self::new();
        set.insert(encoded);
        set
    }

    /// Insert a value, returning false when nothing new was added.
    ///
    /// A value containing `;` is split into its segments first, so no
    /// member ever holds the separator and `parse(encode())` is lossless.
    pub fn insert(&mut self, value: &str) -> bool {
        let mut added = false;
        for part in SEMICOLON_SPLIT.split(value) {
            let part = part.trim();
            if part.is_empty() || self.contains_ci(part) {
                continue;
            }
            self.0.push(part.to_string());
            added = true;
        }
        added
    }

    /// Union `other` into this set, keeping this set's casing on collisions
    pub fn extend_from(&mut self, other: &ValueSet) {
        for value in other.iter() {
            self.insert(value);
        }
    }

    /// Case-insensitive membership test
    pub fn contains_ci(&self, value: &str) -> bool {
        let needle = value.trim().to_lowercase();
        self.0.iter().any(|v| v.to_lowercase() == needle)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Re-encode for the export boundary
    pub fn encode(&self) -> String {
        self.0.join(VALUE_SEPARATOR)
    }
}

impl<S: AsRef<str>> FromIterator<S> for ValueSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for value in iter {
            set.insert(value.as_ref());
        }
        set
    }
}

impl std::fmt::Display for ValueSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.encode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_trims_and_drops_blanks() {
        let set = ValueSet::parse(" Fisheries ;; Pollution;  ");
        assert_eq!(set.as_slice(), &["Fisheries", "Pollution"]);
    }

    #[test]
    fn test_first_seen_casing_wins() {
        let set = ValueSet::parse("Mandatory; mandatory; MANDATORY");
        assert_eq!(set.len(), 1);
        assert_eq!(set.first(), Some("Mandatory"));
    }

    #[test]
    fn test_contains_is_case_insensitive() {
        let set = ValueSet::parse("Species at Risk");
        assert!(set.contains_ci("species at risk"));
        assert!(set.contains_ci("  SPECIES AT RISK "));
        assert!(!set.contains_ci("species"));
    }

    #[test]
    fn test_encode_uses_semicolon_space() {
        let set: ValueSet = ["Regulatory", "Enabling"].into_iter().collect();
        assert_eq!(set.encode(), "Regulatory; Enabling");
    }

    #[test]
    fn test_insert_splits_embedded_separator() {
        let mut set = ValueSet::new();
        assert!(set.insert("Dams; water management"));
        assert!(!set.insert("dams;Water Management"));
        assert_eq!(set.as_slice(), &["Dams", "water management"]);
        assert_eq!(ValueSet::parse(&set.encode()), set);
    }

    #[test]
    fn test_empty_string_is_empty_set() {
        assert!(ValueSet::parse("").is_empty());
        assert_eq!(ValueSet::new().encode(), "");
    }
}
