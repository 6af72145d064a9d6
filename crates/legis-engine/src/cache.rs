//! Caller-owned memo of the built corpus
//!
//! Keyed by a SHA-256 fingerprint of the four source tables. Loading a
//! different table set, or calling [`CorpusCache::invalidate`], forces the
//! next [`CorpusCache::get_or_build`] to rebuild.

use legis_types::SourceTables;
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::Corpus;

const FIELD_SEP: &[u8] = &[0x1f];
const ROW_SEP: &[u8] = &[0x1e];

/// Content hash of the source tables, hex encoded
pub fn fingerprint(tables: &SourceTables) -> String {
    let mut hasher = Sha256::new();

    let mut table = |name: &str, rows: Vec<Vec<&str>>| {
        hasher.update(name.as_bytes());
        hasher.update(ROW_SEP);
        for fields in rows {
            for field in fields {
                hasher.update(field.as_bytes());
                hasher.update(FIELD_SEP);
            }
            hasher.update(ROW_SEP);
        }
    };

    table(
        "paragraphs",
        tables
            .paragraphs
            .iter()
            .map(|r| {
                vec![
                    r.paragraph_id.as_str(),
                    r.legislation_id.as_str(),
                    r.section.as_str(),
                    r.heading.as_str(),
                    r.text.as_str(),
                    r.management_domain.as_str(),
                    r.domain_keywords.as_str(),
                    r.clause_type.as_str(),
                    r.clause_keywords.as_str(),
                    r.actionable_type.as_str(),
                    r.responsible_official.as_str(),
                    r.discretion_type.as_str(),
                ]
            })
            .collect(),
    );
    table(
        "legislation",
        tables
            .legislation
            .iter()
            .map(|r| {
                vec![
                    r.legislation_id.as_str(),
                    r.jurisdiction.as_str(),
                    r.legislation_type.as_str(),
                    r.act_name.as_str(),
                    r.legislation_name.as_str(),
                    r.source_url.as_str(),
                    r.agencies.as_str(),
                ]
            })
            .collect(),
    );
    table(
        "iucn",
        tables
            .iucn_keywords
            .iter()
            .map(|r| vec![r.keyword.as_str(), r.category.as_str()])
            .collect(),
    );
    table(
        "governance",
        tables
            .governance_keywords
            .iter()
            .map(|r| vec![r.domain.as_str(), r.keyword.as_str(), r.scope.as_str()])
            .collect(),
    );

    hex::encode(hasher.finalize())
}

struct CacheEntry {
    fingerprint: String,
    corpus: Corpus,
}

/// Holds at most one built corpus
#[derive(Default)]
pub struct CorpusCache {
    entry: Option<CacheEntry>,
    builds: usize,
}

impl CorpusCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached corpus when the tables are unchanged, otherwise
    /// rebuild it
    pub fn get_or_build(&mut self, tables: &SourceTables) -> &Corpus {
        let fingerprint = fingerprint(tables);
        let stale = self
            .entry
            .as_ref()
            .map_or(true, |entry| entry.fingerprint != fingerprint);

        if stale {
            self.entry = None;
        } else {
            debug!(fingerprint = %fingerprint, "corpus cache hit");
        }

        let builds = &mut self.builds;
        let entry = self.entry.get_or_insert_with(|| {
            info!(fingerprint = %fingerprint, "building corpus");
            *builds += 1;
            CacheEntry {
                corpus: Corpus::build(tables),
                fingerprint: fingerprint.clone(),
            }
        });
        &entry.corpus
    }

    /// Drop the cached corpus
    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    /// Fingerprint of the cached tables, if any
    pub fn fingerprint(&self) -> Option<&str> {
        self.entry.as_ref().map(|entry| entry.fingerprint.as_str())
    }

    /// Number of times a corpus has been built
    pub fn builds(&self) -> usize {
        self.builds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use legis_types::{LegislationRow, ParagraphRow};

    fn tables() -> SourceTables {
        SourceTables {
            paragraphs: vec![ParagraphRow {
                paragraph_id: "1".to_string(),
                legislation_id: "FA".to_string(),
                text: "Fish habitat".to_string(),
                ..ParagraphRow::default()
            }],
            legislation: vec![LegislationRow {
                legislation_id: "FA".to_string(),
                jurisdiction: "Federal".to_string(),
                legislation_type: "Act".to_string(),
                act_name: "Fisheries Act".to_string(),
                legislation_name: "Fisheries Act".to_string(),
                ..LegislationRow::default()
            }],
            ..SourceTables::default()
        }
    }

    #[test]
    fn test_fingerprint_is_stable_and_content_sensitive() {
        let a = tables();
        let mut b = tables();
        assert_eq!(fingerprint(&a), fingerprint(&b));
        assert_eq!(fingerprint(&a).len(), 64);

        b.paragraphs[0].text.push('s');
        assert_ne!(fingerprint(&a), fingerprint(&b));
    }

    #[test]
    fn test_fingerprint_separates_fields() {
        let mut a = tables();
        let mut b = tables();
        a.paragraphs[0].section = "ab".to_string();
        b.paragraphs[0].section = "a".to_string();
        b.paragraphs[0].heading = "b".to_string();
        assert_ne!(fingerprint(&a), fingerprint(&b));
    }

    #[test]
    fn test_cache_reuses_until_tables_change() {
        let mut cache = CorpusCache::new();
        let mut source = tables();

        assert_eq!(cache.get_or_build(&source).items().len(), 1);
        cache.get_or_build(&source);
        assert_eq!(cache.builds(), 1);

        source.paragraphs.push(ParagraphRow {
            paragraph_id: "2".to_string(),
            legislation_id: "FA".to_string(),
            ..ParagraphRow::default()
        });
        assert_eq!(cache.get_or_build(&source).items().len(), 2);
        assert_eq!(cache.builds(), 2);
    }

    #[test]
    fn test_invalidate_forces_rebuild() {
        let mut cache = CorpusCache::new();
        let source = tables();
        cache.get_or_build(&source);
        assert!(cache.fingerprint().is_some());

        cache.invalidate();
        assert!(cache.fingerprint().is_none());
        cache.get_or_build(&source);
        assert_eq!(cache.builds(), 2);
    }
}
