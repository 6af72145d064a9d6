//! Query engine for browsing legislative text.
//!
//! [`Corpus::build`] joins the four source tables once. Everything after
//! that (filtering, dropdown options, section aggregation, keyword
//! scoping, export) is a pure function of the built items plus a
//! [`FilterState`].

pub mod cache;
pub mod dictionary;
pub mod error;
pub mod export;
pub mod filters;
pub mod join;
pub mod keywords;
pub mod options;
pub mod sections;

use std::ops::Range;

use chrono::{DateTime, Utc};
use legis_types::{FlatItem, SourceTables};
use tracing::info;

pub use cache::{fingerprint, CorpusCache};
pub use dictionary::{GovernanceDictionary, KeywordMatcher, MatchMode, ThreatDictionary};
pub use error::{EngineError, JoinDiagnostic, SourceTable};
pub use export::{parse_export, write_export, ExportDocument, ExportRow};
pub use filters::{apply_filters, filter_sections, FilterDimension, FilterState, ALL};
pub use join::{join, JoinOutput, JoinStats};
pub use keywords::{highlight_ranges, resolve_domain_keywords};
pub use options::{compute_all_options, compute_options, FilterOption};
pub use sections::{aggregate_sections, SectionGroup, SectionKey, SectionLabel};

/// The joined, queryable view of one set of source tables
#[derive(Debug, Clone)]
pub struct Corpus {
    items: Vec<FlatItem>,
    diagnostics: Vec<JoinDiagnostic>,
    stats: JoinStats,
    threats: ThreatDictionary,
    governance: GovernanceDictionary,
    built_at: DateTime<Utc>,
}

impl Corpus {
    /// Compile the dictionaries and join the tables
    pub fn build(tables: &SourceTables) -> Self {
        let threats = ThreatDictionary::from_rows(&tables.iucn_keywords);
        let governance = GovernanceDictionary::from_rows(&tables.governance_keywords);
        let output = join::join_with(tables, &threats, &governance);

        info!(
            items = output.stats.items,
            diagnostics = output.diagnostics.len(),
            threat_keywords = threats.len(),
            governance_domains = governance.domain_names().len(),
            "built corpus"
        );

        Self {
            items: output.items,
            diagnostics: output.diagnostics,
            stats: output.stats,
            threats,
            governance,
            built_at: Utc::now(),
        }
    }

    pub fn items(&self) -> &[FlatItem] {
        &self.items
    }

    /// Rows skipped or shadowed during the join
    pub fn diagnostics(&self) -> &[JoinDiagnostic] {
        &self.diagnostics
    }

    pub fn stats(&self) -> JoinStats {
        self.stats
    }

    pub fn threats(&self) -> &ThreatDictionary {
        &self.threats
    }

    pub fn governance(&self) -> &GovernanceDictionary {
        &self.governance
    }

    pub fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }

    pub fn filter(&self, state: &FilterState) -> Vec<FlatItem> {
        apply_filters(&self.items, state)
    }

    /// Filtered items merged into sections
    pub fn sections(&self, state: &FilterState) -> Vec<SectionGroup> {
        filter_sections(&self.items, state)
    }

    pub fn options(&self, state: &FilterState, dimension: FilterDimension) -> Vec<FilterOption> {
        compute_options(&self.items, state, dimension)
    }

    /// Options for a dimension given by its UI name
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownDimension`] if `dimension` names no
    /// filter dimension.
    pub fn options_by_name(
        &self,
        state: &FilterState,
        dimension: &str,
    ) -> Result<Vec<FilterOption>, EngineError> {
        Ok(self.options(state, dimension.parse()?))
    }

    pub fn resolve_keywords(&self, keywords: &str, text: &str, domain: Option<&str>) -> Vec<String> {
        resolve_domain_keywords(&self.governance, keywords, text, domain)
    }

    /// Highlight ranges in an item's text for the keywords of `domain`
    pub fn highlight(&self, item: &FlatItem, domain: Option<&str>) -> Vec<Range<usize>> {
        let keywords = self.resolve_keywords(&item.domain_keywords.encode(), &item.text, domain);
        highlight_ranges(&item.text, &keywords)
    }

    /// Export the filtered items as a JSON document
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Export`] if serialization fails.
    pub fn export(&self, state: &FilterState) -> Result<String, EngineError> {
        write_export(&self.filter(state), state)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use legis_types::{FlatItem, Jurisdiction, LegislationType, ValueSet};

    /// A federal Act row with no attributes beyond its keys and domain
    pub fn item(id: &str, legislation_id: &str, section: &str, heading: &str, domain: &str) -> FlatItem {
        FlatItem {
            paragraph_id: id.to_string(),
            legislation_id: legislation_id.to_string(),
            jurisdiction: Jurisdiction::Federal,
            legislation_type: LegislationType::Act,
            act_name: format!("Act {}", legislation_id),
            legislation_name: format!("Legislation {}", legislation_id),
            source_url: None,
            agencies: ValueSet::new(),
            section: section.to_string(),
            heading: heading.to_string(),
            text: format!("Text of {}", id),
            management_domain: domain.to_string(),
            domain_keywords: ValueSet::new(),
            iucn_threats: ValueSet::new(),
            clause_types: ValueSet::new(),
            clause_keywords: ValueSet::new(),
            actionable_types: ValueSet::new(),
            responsible_officials: ValueSet::new(),
            discretion_types: ValueSet::new(),
        }
    }

    pub fn legislation_item(
        id: &str,
        legislation_id: &str,
        act_name: &str,
        legislation_name: &str,
        legislation_type: LegislationType,
    ) -> FlatItem {
        let mut row = item(id, legislation_id, "1", "", "");
        row.act_name = act_name.to_string();
        row.legislation_name = legislation_name.to_string();
        row.legislation_type = legislation_type;
        row
    }
}
