//! Keyword scope resolution and highlighting
//!
//! A paragraph carrying several domains holds the merged keywords of all of
//! them. When the UI shows the paragraph under one domain, only that
//! domain's keywords should be highlighted.

use std::ops::Range;

use legis_types::ValueSet;

use crate::dictionary::{GovernanceDictionary, KeywordMatcher, MatchMode};

/// Narrow `keywords` to those belonging to `domain`.
///
/// With no domain, or a domain the governance dictionary does not know,
/// every keyword of the semicolon-encoded string is returned as-is.
/// Otherwise the result is the domain's dictionary keywords that occur as
/// whole words in `text`.
pub fn resolve_domain_keywords(
    dictionary: &GovernanceDictionary,
    keywords: &str,
    text: &str,
    domain: Option<&str>,
) -> Vec<String> {
    let scoped = domain
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .and_then(|d| dictionary.keywords_for(d));

    match scoped {
        None => ValueSet::parse(keywords).as_slice().to_vec(),
        Some(entries) => entries
            .iter()
            .filter(|entry| entry.occurs_in(text))
            .map(|entry| entry.keyword.clone())
            .collect::<ValueSet>()
            .as_slice()
            .to_vec(),
    }
}

/// Byte ranges in `text` to highlight for `keywords` (whole-word,
/// case-insensitive), sorted and with overlaps merged
pub fn highlight_ranges<S: AsRef<str>>(text: &str, keywords: &[S]) -> Vec<Range<usize>> {
    let mut ranges: Vec<Range<usize>> = keywords
        .iter()
        .flat_map(|keyword| {
            KeywordMatcher::compile(keyword.as_ref(), MatchMode::WholeWord).find_ranges(text)
        })
        .collect();
    ranges.sort_by_key(|range| (range.start, range.end));

    let mut merged: Vec<Range<usize>> = Vec::with_capacity(ranges.len());
    for range in ranges {
        match merged.last_mut() {
            Some(last) if range.start <= last.end => last.end = last.end.max(range.end),
            _ => merged.push(range),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use legis_types::GovernanceKeywordRow;
    use pretty_assertions::assert_eq;

    fn dictionary() -> GovernanceDictionary {
        GovernanceDictionary::from_rows(&[
            GovernanceKeywordRow {
                domain: "Fisheries".to_string(),
                keyword: "spawning".to_string(),
                scope: String::new(),
            },
            GovernanceKeywordRow {
                domain: "Pollution".to_string(),
                keyword: "effluent".to_string(),
                scope: String::new(),
            },
        ])
    }

    const TEXT: &str = "spawning habitat near effluent discharge";

    #[test]
    fn test_resolves_to_active_domain_only() {
        let resolved =
            resolve_domain_keywords(&dictionary(), "spawning; effluent", TEXT, Some("Fisheries"));
        assert_eq!(resolved, vec!["spawning"]);

        let resolved =
            resolve_domain_keywords(&dictionary(), "spawning; effluent", TEXT, Some("pollution"));
        assert_eq!(resolved, vec!["effluent"]);
    }

    #[test]
    fn test_unset_or_unknown_domain_returns_all() {
        let all = vec!["spawning".to_string(), "effluent".to_string()];
        assert_eq!(
            resolve_domain_keywords(&dictionary(), " spawning ;; effluent ", TEXT, None),
            all
        );
        assert_eq!(
            resolve_domain_keywords(&dictionary(), "spawning; effluent", TEXT, Some("Wildlife")),
            all
        );
        assert_eq!(
            resolve_domain_keywords(&dictionary(), "spawning; effluent", TEXT, Some("  ")),
            all
        );
    }

    #[test]
    fn test_domain_keyword_absent_from_text() {
        let resolved =
            resolve_domain_keywords(&dictionary(), "spawning", "no match here", Some("Fisheries"));
        assert!(resolved.is_empty());
    }

    #[test]
    fn test_highlight_ranges_merge_overlaps() {
        let text = "Spawning grounds and spawning habitat";
        let ranges = highlight_ranges(text, &["spawning", "spawning grounds", "habitat"]);
        assert_eq!(ranges, vec![0..16, 21..29, 30..37]);
    }

    #[test]
    fn test_highlight_ignores_partial_words() {
        assert!(highlight_ranges("fishery", &["fish"]).is_empty());
        assert!(highlight_ranges::<&str>("anything", &[]).is_empty());
    }
}
