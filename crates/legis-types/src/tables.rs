//! Raw source row shapes, as handed over by the file readers

use serde::{Deserialize, Serialize};

/// One paragraph row. Multi-valued columns are semicolon-encoded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParagraphRow {
    pub paragraph_id: String,
    pub legislation_id: String,
    pub section: String,
    pub heading: String,
    pub text: String,
    pub management_domain: String,
    pub domain_keywords: String,
    pub clause_type: String,
    pub clause_keywords: String,
    pub actionable_type: String,
    pub responsible_official: String,
    pub discretion_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegislationRow {
    pub legislation_id: String,
    pub jurisdiction: String,
    pub legislation_type: String,
    pub act_name: String,
    pub legislation_name: String,
    pub source_url: String,
    pub agencies: String,
}

/// IUCN threat dictionary entry: keyword -> threat category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreatKeywordRow {
    pub keyword: String,
    pub category: String,
}

/// Governance dictionary entry: management domain -> (keyword, scope)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GovernanceKeywordRow {
    pub domain: String,
    pub keyword: String,
    pub scope: String,
}

/// The four source tables, fully materialized
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceTables {
    pub paragraphs: Vec<ParagraphRow>,
    pub legislation: Vec<LegislationRow>,
    pub iucn_keywords: Vec<ThreatKeywordRow>,
    pub governance_keywords: Vec<GovernanceKeywordRow>,
}

impl SourceTables {
    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
            && self.legislation.is_empty()
            && self.iucn_keywords.is_empty()
            && self.governance_keywords.is_empty()
    }
}
