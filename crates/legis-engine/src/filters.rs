//! Filter engine with section-level inclusion
//!
//! Evaluation runs in two phases:
//! 1. Scope predicates (jurisdiction, act, legislation, legislation type)
//!    are applied row by row.
//! 2. Surviving rows are grouped into sections. If any row of a section
//!    satisfies every content predicate (domain, search text, clause
//!    attributes), the whole section is kept.
//!
//! A section is therefore never shown with some of its paragraphs hidden.

use std::str::FromStr;

use legis_types::{FlatItem, Jurisdiction};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::EngineError;
use crate::sections::{aggregate_sections, group_by_section, SectionGroup};

/// Sentinel used by the UI for "no restriction"
pub const ALL: &str = "All";

/// A filterable dimension of the dropdown UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterDimension {
    Jurisdiction,
    ManagementDomain,
    ActName,
    LegislationName,
    ClauseType,
    ActionableType,
    ResponsibleOfficial,
    DiscretionType,
}

impl FilterDimension {
    pub fn all() -> [Self; 8] {
        [
            FilterDimension::Jurisdiction,
            FilterDimension::ManagementDomain,
            FilterDimension::ActName,
            FilterDimension::LegislationName,
            FilterDimension::ClauseType,
            FilterDimension::ActionableType,
            FilterDimension::ResponsibleOfficial,
            FilterDimension::DiscretionType,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            FilterDimension::Jurisdiction => "jurisdiction",
            FilterDimension::ManagementDomain => "managementDomain",
            FilterDimension::ActName => "actName",
            FilterDimension::LegislationName => "legislationName",
            FilterDimension::ClauseType => "clauseType",
            FilterDimension::ActionableType => "actionableType",
            FilterDimension::ResponsibleOfficial => "responsibleOfficial",
            FilterDimension::DiscretionType => "discretionType",
        }
    }

    /// Dimensions reset when this one changes
    pub fn downstream(&self) -> &'static [FilterDimension] {
        match self {
            FilterDimension::Jurisdiction | FilterDimension::ManagementDomain => {
                &[FilterDimension::ActName, FilterDimension::LegislationName]
            }
            FilterDimension::ActName => &[FilterDimension::LegislationName],
            _ => &[],
        }
    }

    /// This dimension plus everything downstream of it
    pub fn with_downstream(&self) -> Vec<FilterDimension> {
        let mut dims = vec![*self];
        dims.extend_from_slice(self.downstream());
        dims
    }
}

impl FromStr for FilterDimension {
    type Err = EngineError;

    /// Accepts the camelCase UI names, snake_case or kebab-case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();
        FilterDimension::all()
            .into_iter()
            .find(|dim| dim.name().to_lowercase() == normalized)
            .ok_or_else(|| EngineError::UnknownDimension(s.to_string()))
    }
}

impl std::fmt::Display for FilterDimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Map a UI selection to a filter value; "All" and blank mean unset
pub fn selection(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case(ALL) {
        None
    } else {
        Some(value.to_string())
    }
}

/// Current filter selections. `None` is "All".
///
/// Setters enforce the cascade: changing jurisdiction or management domain
/// clears act and legislation; changing act clears legislation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterState {
    jurisdiction: Option<Jurisdiction>,
    management_domain: Option<String>,
    act_name: Option<String>,
    legislation_name: Option<String>,
    search_term: Option<String>,
    clause_type: Option<String>,
    actionable_type: Option<String>,
    responsible_official: Option<String>,
    discretion_type: Option<String>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn jurisdiction(&self) -> Option<Jurisdiction> {
        self.jurisdiction
    }

    pub fn management_domain(&self) -> Option<&str> {
        self.management_domain.as_deref()
    }

    pub fn act_name(&self) -> Option<&str> {
        self.act_name.as_deref()
    }

    pub fn legislation_name(&self) -> Option<&str> {
        self.legislation_name.as_deref()
    }

    pub fn search_term(&self) -> Option<&str> {
        self.search_term.as_deref()
    }

    /// Selected value of a dropdown dimension
    pub fn get(&self, dimension: FilterDimension) -> Option<String> {
        match dimension {
            FilterDimension::Jurisdiction => self.jurisdiction.map(|j| j.name().to_string()),
            FilterDimension::ManagementDomain => self.management_domain.clone(),
            FilterDimension::ActName => self.act_name.clone(),
            FilterDimension::LegislationName => self.legislation_name.clone(),
            FilterDimension::ClauseType => self.clause_type.clone(),
            FilterDimension::ActionableType => self.actionable_type.clone(),
            FilterDimension::ResponsibleOfficial => self.responsible_official.clone(),
            FilterDimension::DiscretionType => self.discretion_type.clone(),
        }
    }

    pub fn set_jurisdiction(&mut self, jurisdiction: Option<Jurisdiction>) {
        self.jurisdiction = jurisdiction;
        self.clear_downstream(FilterDimension::Jurisdiction);
    }

    pub fn set_management_domain(&mut self, domain: &str) {
        self.management_domain = selection(domain);
        self.clear_downstream(FilterDimension::ManagementDomain);
    }

    pub fn set_act_name(&mut self, act_name: &str) {
        self.act_name = selection(act_name);
        self.clear_downstream(FilterDimension::ActName);
    }

    pub fn set_legislation_name(&mut self, legislation_name: &str) {
        self.legislation_name = selection(legislation_name);
    }

    pub fn set_search_term(&mut self, term: &str) {
        let term = term.trim();
        self.search_term = (!term.is_empty()).then(|| term.to_string());
    }

    pub fn set_clause_type(&mut self, value: &str) {
        self.clause_type = selection(value);
    }

    pub fn set_actionable_type(&mut self, value: &str) {
        self.actionable_type = selection(value);
    }

    pub fn set_responsible_official(&mut self, value: &str) {
        self.responsible_official = selection(value);
    }

    pub fn set_discretion_type(&mut self, value: &str) {
        self.discretion_type = selection(value);
    }

    /// Set any dropdown dimension from its UI string, cascading as usual.
    /// An unrecognized jurisdiction name selects nothing.
    pub fn set(&mut self, dimension: FilterDimension, value: &str) {
        match dimension {
            FilterDimension::Jurisdiction => {
                self.set_jurisdiction(selection(value).and_then(|v| Jurisdiction::parse(&v)))
            }
            FilterDimension::ManagementDomain => self.set_management_domain(value),
            FilterDimension::ActName => self.set_act_name(value),
            FilterDimension::LegislationName => self.set_legislation_name(value),
            FilterDimension::ClauseType => self.set_clause_type(value),
            FilterDimension::ActionableType => self.set_actionable_type(value),
            FilterDimension::ResponsibleOfficial => self.set_responsible_official(value),
            FilterDimension::DiscretionType => self.set_discretion_type(value),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn clear_downstream(&mut self, dimension: FilterDimension) {
        for dim in dimension.downstream() {
            match dim {
                FilterDimension::ActName => self.act_name = None,
                FilterDimension::LegislationName => self.legislation_name = None,
                _ => {}
            }
        }
    }

    /// True when every row this state admits is also admitted by `wider`.
    ///
    /// The act-only view (act set, legislation unset) hides regulations of
    /// that act, so picking a specific legislation from it is a different
    /// view rather than a narrower one.
    pub fn is_narrower_or_equal(&self, wider: &FilterState) -> bool {
        fn covers(narrow: &Option<String>, wide: &Option<String>) -> bool {
            match (narrow, wide) {
                (_, None) => true,
                (Some(n), Some(w)) => n.eq_ignore_ascii_case(w),
                (None, Some(_)) => false,
            }
        }

        let jurisdiction = wider.jurisdiction.is_none() || wider.jurisdiction == self.jurisdiction;
        let legislation = match (&self.legislation_name, &wider.legislation_name) {
            (_, Some(_)) => covers(&self.legislation_name, &wider.legislation_name),
            (Some(_), None) => wider.act_name.is_none(),
            (None, None) => true,
        };
        let search = match (&self.search_term, &wider.search_term) {
            (_, None) => true,
            (Some(n), Some(w)) => n.to_lowercase().contains(&w.to_lowercase()),
            (None, Some(_)) => false,
        };

        jurisdiction
            && legislation
            && search
            && covers(&self.act_name, &wider.act_name)
            && covers(&self.management_domain, &wider.management_domain)
            && covers(&self.clause_type, &wider.clause_type)
            && covers(&self.actionable_type, &wider.actionable_type)
            && covers(&self.responsible_official, &wider.responsible_official)
            && covers(&self.discretion_type, &wider.discretion_type)
    }

    /// Row-level scope predicates, ignoring the `excluded` dimensions.
    ///
    /// The "Act rows only" constraint applies when an act is selected
    /// without a specific legislation; it belongs to the legislation
    /// dimension and is dropped with it.
    pub(crate) fn scope_matches(&self, item: &FlatItem, excluded: &[FilterDimension]) -> bool {
        let active = |dim: FilterDimension| !excluded.contains(&dim);

        if active(FilterDimension::Jurisdiction) {
            if let Some(jurisdiction) = self.jurisdiction {
                if item.jurisdiction != jurisdiction {
                    return false;
                }
            }
        }

        let act = self
            .act_name
            .as_deref()
            .filter(|_| active(FilterDimension::ActName));
        if let Some(act) = act {
            if !same_name(&item.act_name, act) {
                return false;
            }
        }

        if active(FilterDimension::LegislationName) {
            match (self.legislation_name.as_deref(), act) {
                (Some(name), _) => {
                    if !same_name(&item.legislation_name, name) {
                        return false;
                    }
                }
                (None, Some(_)) => {
                    if !item.legislation_type.is_act() {
                        return false;
                    }
                }
                (None, None) => {}
            }
        }

        true
    }

    /// Content predicates a single row must satisfy, ignoring `excluded`
    pub(crate) fn content_matches(&self, item: &FlatItem, excluded: &[FilterDimension]) -> bool {
        let active = |dim: FilterDimension| !excluded.contains(&dim);

        if active(FilterDimension::ManagementDomain) {
            if let Some(domain) = &self.management_domain {
                if !item.domains().contains_ci(domain) {
                    return false;
                }
            }
        }

        if let Some(term) = &self.search_term {
            if !matches_search(item, term) {
                return false;
            }
        }

        let attributes = [
            (FilterDimension::ClauseType, &self.clause_type, &item.clause_types),
            (
                FilterDimension::ActionableType,
                &self.actionable_type,
                &item.actionable_types,
            ),
            (
                FilterDimension::ResponsibleOfficial,
                &self.responsible_official,
                &item.responsible_officials,
            ),
            (
                FilterDimension::DiscretionType,
                &self.discretion_type,
                &item.discretion_types,
            ),
        ];
        attributes.into_iter().all(|(dim, wanted, values)| {
            !active(dim) || wanted.as_ref().map_or(true, |w| values.contains_ci(w))
        })
    }

    /// Every predicate on one row, ignoring `excluded`
    pub(crate) fn row_matches(&self, item: &FlatItem, excluded: &[FilterDimension]) -> bool {
        self.scope_matches(item, excluded) && self.content_matches(item, excluded)
    }
}

/// Name equality as the dropdowns see it: trimmed and case-insensitive
fn same_name(value: &str, selected: &str) -> bool {
    value.trim().to_lowercase() == selected.trim().to_lowercase()
}

/// Case-insensitive substring over act name, legislation name, heading and body
pub fn matches_search(item: &FlatItem, term: &str) -> bool {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return true;
    }
    [
        &item.act_name,
        &item.legislation_name,
        &item.heading,
        &item.text,
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(&term))
}

/// Apply `state` with section-level inclusion. Output keeps input order.
pub fn apply_filters(items: &[FlatItem], state: &FilterState) -> Vec<FlatItem> {
    let scoped = items
        .iter()
        .enumerate()
        .filter(|(_, item)| state.scope_matches(item, &[]));

    let mut included: Vec<usize> = group_by_section(scoped)
        .into_iter()
        .filter(|(_, members)| {
            members
                .iter()
                .any(|&idx| state.content_matches(&items[idx], &[]))
        })
        .flat_map(|(_, members)| members)
        .collect();
    included.sort_unstable();

    debug!(
        input = items.len(),
        output = included.len(),
        "applied filters"
    );
    included.into_iter().map(|idx| items[idx].clone()).collect()
}

/// Filter, then aggregate the surviving rows into sections
pub fn filter_sections(items: &[FlatItem], state: &FilterState) -> Vec<SectionGroup> {
    aggregate_sections(&apply_filters(items, state))
}
