use serde::{Deserialize, Serialize};

use crate::records::{Jurisdiction, Legislation, LegislationType, Paragraph};
use crate::value_set::ValueSet;

/// One denormalized (paragraph x management domain) row.
///
/// A paragraph tagged with k domains fans out into k items that share the
/// paragraph id and text; an untagged paragraph yields one item with an
/// empty `management_domain`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatItem {
    pub paragraph_id: String,
    pub legislation_id: String,
    pub jurisdiction: Jurisdiction,
    pub legislation_type: LegislationType,
    pub act_name: String,
    pub legislation_name: String,
    pub source_url: Option<String>,
    pub agencies: ValueSet,
    pub section: String,
    pub heading: String,
    pub text: String,
    pub management_domain: String,
    pub domain_keywords: ValueSet,
    pub iucn_threats: ValueSet,
    pub clause_types: ValueSet,
    pub clause_keywords: ValueSet,
    pub actionable_types: ValueSet,
    pub responsible_officials: ValueSet,
    pub discretion_types: ValueSet,
}

impl FlatItem {
    /// Build the item for one assigned domain (`""` when the paragraph has none)
    pub fn new(
        paragraph: &Paragraph,
        legislation: &Legislation,
        domain: &str,
        domain_keywords: ValueSet,
        iucn_threats: ValueSet,
    ) -> Self {
        Self {
            paragraph_id: paragraph.paragraph_id.clone(),
            legislation_id: paragraph.legislation_id.clone(),
            jurisdiction: legislation.jurisdiction,
            legislation_type: legislation.legislation_type,
            act_name: legislation.act_name.clone(),
            legislation_name: legislation.legislation_name.clone(),
            source_url: legislation.source_url.clone(),
            agencies: legislation.agencies.clone(),
            section: paragraph.section.clone(),
            heading: paragraph.heading.clone(),
            text: paragraph.text.clone(),
            management_domain: domain.to_string(),
            domain_keywords,
            iucn_threats,
            clause_types: paragraph.clause_types.clone(),
            clause_keywords: paragraph.clause_keywords.clone(),
            actionable_types: paragraph.actionable_types.clone(),
            responsible_officials: paragraph.responsible_officials.clone(),
            discretion_types: paragraph.discretion_types.clone(),
        }
    }

    /// The domain field decoded as a set (tolerates semicolon-joined values)
    pub fn domains(&self) -> ValueSet {
        ValueSet::parse(&self.management_domain)
    }
}
