//! Section aggregation
//!
//! Flat items sharing a legislation id and section key form one legislative
//! section. The key is the trimmed section label, else the trimmed heading,
//! else a synthetic per-paragraph key, so every item lands in exactly one
//! group.

use std::cmp::Ordering;
use std::collections::HashMap;

use legis_types::{FlatItem, Jurisdiction, LegislationType, ValueSet};
use serde::Serialize;

/// Separator between distinct headings of one section
pub const HEADING_SEPARATOR: &str = " | ";

/// Separator between fragment bodies of one section
pub const BODY_SEPARATOR: &str = "\n\n";

/// Grouping label inside one piece of legislation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum SectionLabel {
    Section(String),
    Heading(String),
    /// Fallback for fragments with neither label nor heading
    Synthetic(String),
}

impl SectionLabel {
    pub fn for_item(item: &FlatItem) -> Self {
        let section = item.section.trim();
        if !section.is_empty() {
            return SectionLabel::Section(section.to_string());
        }
        let heading = item.heading.trim();
        if !heading.is_empty() {
            return SectionLabel::Heading(heading.to_string());
        }
        SectionLabel::Synthetic(format!("paragraph-{}", item.paragraph_id))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SectionKey {
    pub legislation_id: String,
    pub label: SectionLabel,
}

impl SectionKey {
    pub fn of(item: &FlatItem) -> Self {
        Self {
            legislation_id: item.legislation_id.clone(),
            label: SectionLabel::for_item(item),
        }
    }
}

/// Group `(index, item)` pairs by section key, groups in order of first
/// appearance. The filter engine uses this on a pre-filtered subset, where it
/// needs membership but no merging.
pub fn group_by_section<'a, I>(items: I) -> Vec<(SectionKey, Vec<usize>)>
where
    I: IntoIterator<Item = (usize, &'a FlatItem)>,
{
    let mut positions: HashMap<SectionKey, usize> = HashMap::new();
    let mut groups: Vec<(SectionKey, Vec<usize>)> = Vec::new();
    for (idx, item) in items {
        let key = SectionKey::of(item);
        match positions.get(&key) {
            Some(&pos) => groups[pos].1.push(idx),
            None => {
                positions.insert(key.clone(), groups.len());
                groups.push((key, vec![idx]));
            }
        }
    }
    groups
}

/// One merged legislative section
#[derive(Debug, Clone, Serialize)]
pub struct SectionGroup {
    pub key: SectionKey,
    pub jurisdiction: Jurisdiction,
    pub legislation_type: LegislationType,
    pub act_name: String,
    pub legislation_name: String,
    pub source_url: Option<String>,
    /// Distinct non-empty headings in reading order
    pub headings: Vec<String>,
    pub domains: ValueSet,
    pub keywords: ValueSet,
    pub threats: ValueSet,
    pub clause_types: ValueSet,
    pub actionable_types: ValueSet,
    pub responsible_officials: ValueSet,
    pub discretion_types: ValueSet,
    /// Non-empty fragment bodies joined by a blank line
    pub text: String,
    /// Every member item, stable-sorted by paragraph id
    pub members: Vec<FlatItem>,
}

impl SectionGroup {
    fn from_members(key: SectionKey, mut members: Vec<FlatItem>) -> Option<Self> {
        members.sort_by(|a, b| compare_paragraph_ids(&a.paragraph_id, &b.paragraph_id));
        let first = members.first()?;

        let mut group = Self {
            key,
            jurisdiction: first.jurisdiction,
            legislation_type: first.legislation_type,
            act_name: first.act_name.clone(),
            legislation_name: first.legislation_name.clone(),
            source_url: first.source_url.clone(),
            headings: Vec::new(),
            domains: ValueSet::new(),
            keywords: ValueSet::new(),
            threats: ValueSet::new(),
            clause_types: ValueSet::new(),
            actionable_types: ValueSet::new(),
            responsible_officials: ValueSet::new(),
            discretion_types: ValueSet::new(),
            text: String::new(),
            members: Vec::new(),
        };

        let mut bodies = Vec::new();
        for item in &members {
            group.domains.extend_from(&item.domains());
            group.keywords.extend_from(&item.domain_keywords);
            group.threats.extend_from(&item.iucn_threats);
            group.clause_types.extend_from(&item.clause_types);
            group.actionable_types.extend_from(&item.actionable_types);
            group.responsible_officials.extend_from(&item.responsible_officials);
            group.discretion_types.extend_from(&item.discretion_types);
        }
        for fragment in distinct_paragraphs(&members) {
            let heading = fragment.heading.trim();
            if !heading.is_empty()
                && !group
                    .headings
                    .iter()
                    .any(|seen| seen.to_lowercase() == heading.to_lowercase())
            {
                group.headings.push(heading.to_string());
            }
            if !fragment.text.trim().is_empty() {
                bodies.push(fragment.text.as_str());
            }
        }
        group.text = bodies.join(BODY_SEPARATOR);
        group.members = members;
        Some(group)
    }

    /// Headings for display
    pub fn heading(&self) -> String {
        self.headings.join(HEADING_SEPARATOR)
    }

    /// One entry per paragraph, in reading order, for inline sub-headings
    pub fn fragments(&self) -> Vec<&FlatItem> {
        distinct_paragraphs(&self.members)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Group and merge items into sections, in order of first appearance
pub fn aggregate_sections(items: &[FlatItem]) -> Vec<SectionGroup> {
    group_by_section(items.iter().enumerate())
        .into_iter()
        .filter_map(|(key, indices)| {
            let members = indices.into_iter().map(|idx| items[idx].clone()).collect();
            SectionGroup::from_members(key, members)
        })
        .collect()
}

/// Paragraph ids compare numerically when both are integers; integers sort
/// before free-form ids.
pub fn compare_paragraph_ids(a: &str, b: &str) -> Ordering {
    match (a.trim().parse::<u64>(), b.trim().parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

fn distinct_paragraphs(members: &[FlatItem]) -> Vec<&FlatItem> {
    let mut seen = std::collections::HashSet::new();
    members
        .iter()
        .filter(|item| seen.insert(item.paragraph_id.as_str()))
        .collect()
}
