//! Keyword dictionaries with precompiled matchers
//!
//! Two dictionaries drive classification:
//! - IUCN threats: keyword -> threat category (many-to-one), matched as a
//!   case-insensitive substring anywhere in the text
//! - Governance: management domain -> keywords, matched as whole words
//!
//! Every keyword is escaped and compiled once, when the dictionary is built.

use std::collections::HashMap;
use std::ops::Range;

use legis_types::{GovernanceKeywordRow, ThreatKeywordRow, ValueSet};
use regex::Regex;
use tracing::warn;

/// How a keyword is located in text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Anywhere, including inside longer words
    Substring,
    /// Only when not flanked by letters, digits or underscores
    WholeWord,
}

/// A single dictionary keyword compiled into a case-insensitive regex.
///
/// A keyword whose pattern fails to compile keeps `regex: None` and never
/// matches.
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    mode: MatchMode,
    regex: Option<Regex>,
}

impl KeywordMatcher {
    pub fn compile(keyword: &str, mode: MatchMode) -> Self {
        let keyword = keyword.trim();
        let regex = if keyword.is_empty() {
            None
        } else {
            match Regex::new(&format!("(?i){}", regex::escape(keyword))) {
                Ok(regex) => Some(regex),
                Err(err) => {
                    warn!(keyword = %keyword, error = %err, "keyword pattern failed to compile, treating as non-matching");
                    None
                }
            }
        };

        Self { mode, regex }
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.next_match(text, 0).is_some()
    }

    /// Byte ranges of every match, in text order
    pub fn find_ranges(&self, text: &str) -> Vec<Range<usize>> {
        let mut ranges = Vec::new();
        let mut pos = 0;
        while let Some(range) = self.next_match(text, pos) {
            pos = range.end;
            ranges.push(range);
        }
        ranges
    }

    fn next_match(&self, text: &str, from: usize) -> Option<Range<usize>> {
        let regex = self.regex.as_ref()?;
        let mut pos = from;
        while pos <= text.len() {
            let found = regex.find_at(text, pos)?;
            let range = found.start()..found.end();
            if self.mode == MatchMode::Substring || is_word_bounded(text, &range) {
                return Some(range);
            }
            // Step one char past the rejected start; a later overlapping
            // occurrence may still be bounded.
            pos = range.start
                + text[range.start..]
                    .chars()
                    .next()
                    .map_or(1, char::len_utf8);
        }
        None
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_word_bounded(text: &str, range: &Range<usize>) -> bool {
    let before = text[..range.start].chars().next_back();
    let after = text[range.end..].chars().next();
    !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
}

#[derive(Debug, Clone)]
struct ThreatEntry {
    matcher: KeywordMatcher,
    category: String,
}

/// IUCN keyword -> threat category
#[derive(Debug, Clone, Default)]
pub struct ThreatDictionary {
    entries: Vec<ThreatEntry>,
    by_keyword: HashMap<String, usize>,
}

impl ThreatDictionary {
    /// Build from dictionary rows. A keyword listed twice keeps its first
    /// category; rows with a blank keyword or category are ignored.
    pub fn from_rows(rows: &[ThreatKeywordRow]) -> Self {
        let mut dictionary = Self::default();
        for row in rows {
            let keyword = row.keyword.trim();
            let category = row.category.trim();
            if keyword.is_empty() || category.is_empty() {
                continue;
            }
            let key = keyword.to_lowercase();
            if dictionary.by_keyword.contains_key(&key) {
                continue;
            }
            dictionary.by_keyword.insert(key, dictionary.entries.len());
            dictionary.entries.push(ThreatEntry {
                matcher: KeywordMatcher::compile(keyword, MatchMode::Substring),
                category: category.to_string(),
            });
        }
        dictionary
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Threat category registered for a keyword (case-insensitive)
    pub fn category(&self, keyword: &str) -> Option<&str> {
        self.by_keyword
            .get(&keyword.trim().to_lowercase())
            .map(|&idx| self.entries[idx].category.as_str())
    }

    /// Union of the categories of every keyword found in `text`, in
    /// dictionary order of the first keyword that hit each category
    pub fn classify(&self, text: &str) -> ValueSet {
        let mut threats = ValueSet::new();
        for entry in &self.entries {
            if entry.matcher.is_match(text) {
                threats.insert(&entry.category);
            }
        }
        threats
    }
}

/// One keyword registered under a governance domain
#[derive(Debug, Clone)]
pub struct GovernanceKeyword {
    pub keyword: String,
    /// Where the keyword applies, as given by the dictionary row
    pub scope: String,
    matcher: KeywordMatcher,
}

impl GovernanceKeyword {
    pub fn occurs_in(&self, text: &str) -> bool {
        self.matcher.is_match(text)
    }
}

/// Management domain -> keywords. Domains missing here are non-governance
/// domains and are never keyword-filtered.
#[derive(Debug, Clone, Default)]
pub struct GovernanceDictionary {
    domains: HashMap<String, Vec<GovernanceKeyword>>,
    domain_names: Vec<String>,
}

impl GovernanceDictionary {
    pub fn from_rows(rows: &[GovernanceKeywordRow]) -> Self {
        let mut dictionary = Self::default();
        for row in rows {
            let domain = row.domain.trim();
            let keyword = row.keyword.trim();
            if domain.is_empty() || keyword.is_empty() {
                continue;
            }
            let key = domain.to_lowercase();
            if !dictionary.domains.contains_key(&key) {
                dictionary.domain_names.push(domain.to_string());
            }
            let keywords = dictionary.domains.entry(key).or_default();
            if keywords
                .iter()
                .any(|k| k.keyword.to_lowercase() == keyword.to_lowercase())
            {
                continue;
            }
            keywords.push(GovernanceKeyword {
                keyword: keyword.to_string(),
                scope: row.scope.trim().to_string(),
                matcher: KeywordMatcher::compile(keyword, MatchMode::WholeWord),
            });
        }
        dictionary
    }

    pub fn contains_domain(&self, domain: &str) -> bool {
        self.domains.contains_key(&domain.trim().to_lowercase())
    }

    pub fn keywords_for(&self, domain: &str) -> Option<&[GovernanceKeyword]> {
        self.domains
            .get(&domain.trim().to_lowercase())
            .map(Vec::as_slice)
    }

    /// Scope recorded for `keyword` under `domain`, if both are known
    pub fn scope_of(&self, domain: &str, keyword: &str) -> Option<&str> {
        let keyword = keyword.trim().to_lowercase();
        self.keywords_for(domain)?
            .iter()
            .find(|entry| entry.keyword.to_lowercase() == keyword)
            .map(|entry| entry.scope.as_str())
    }

    /// Domain names in first-seen order and casing
    pub fn domain_names(&self) -> &[String] {
        &self.domain_names
    }

    /// Keywords of the given domains that occur as whole words in `text`
    pub fn extract(&self, domains: &ValueSet, text: &str) -> ValueSet {
        let mut hits = ValueSet::new();
        for domain in domains.iter() {
            let Some(keywords) = self.keywords_for(domain) else {
                continue;
            };
            for keyword in keywords {
                if keyword.occurs_in(text) {
                    hits.insert(&keyword.keyword);
                }
            }
        }
        hits
    }
}
