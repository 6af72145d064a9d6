//! Contextual dropdown options
//!
//! Options for a dimension are counted over the rows that pass every other
//! active filter, excluding the dimension itself and whatever it resets
//! downstream. Context is row-level: a value is only offered if some row
//! carries it while satisfying all remaining predicates, so no option ever
//! leads to an empty result.

use std::cmp::Ordering;
use std::collections::HashMap;

use legis_types::FlatItem;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::filters::{FilterDimension, FilterState, ALL};

/// One dropdown entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
    pub name: String,
    pub count: usize,
}

impl FilterOption {
    pub fn new(name: &str, count: usize) -> Self {
        Self {
            name: name.to_string(),
            count,
        }
    }

    pub fn is_all(&self) -> bool {
        self.name == ALL
    }
}

/// Values a row contributes to a dimension
fn values_of(item: &FlatItem, dimension: FilterDimension) -> Vec<String> {
    let single = |value: &str| {
        let value = value.trim();
        if value.is_empty() {
            Vec::new()
        } else {
            vec![value.to_string()]
        }
    };
    match dimension {
        FilterDimension::Jurisdiction => vec![item.jurisdiction.name().to_string()],
        FilterDimension::ManagementDomain => item.domains().as_slice().to_vec(),
        FilterDimension::ActName => single(&item.act_name),
        FilterDimension::LegislationName => single(&item.legislation_name),
        FilterDimension::ClauseType => item.clause_types.as_slice().to_vec(),
        FilterDimension::ActionableType => item.actionable_types.as_slice().to_vec(),
        FilterDimension::ResponsibleOfficial => item.responsible_officials.as_slice().to_vec(),
        FilterDimension::DiscretionType => item.discretion_types.as_slice().to_vec(),
    }
}

/// Count occurrences per distinct value (case-insensitive, first-seen casing)
fn count_values<'a, I>(rows: I, dimension: FilterDimension) -> Vec<FilterOption>
where
    I: IntoIterator<Item = &'a FlatItem>,
{
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<FilterOption> = Vec::new();
    for item in rows {
        for value in values_of(item, dimension) {
            let key = value.to_lowercase();
            match positions.get(&key) {
                Some(&pos) => counts[pos].count += 1,
                None => {
                    positions.insert(key, counts.len());
                    counts.push(FilterOption {
                        name: value,
                        count: 1,
                    });
                }
            }
        }
    }
    counts
}

fn alphabetical(a: &FilterOption, b: &FilterOption) -> Ordering {
    a.name
        .to_lowercase()
        .cmp(&b.name.to_lowercase())
        .then_with(|| a.name.cmp(&b.name))
}

/// Dropdown contents for `dimension` given the rest of `state`.
///
/// The first entry is always "All", whose count is the number of distinct
/// values that follow. Management domains are ordered by descending count
/// (alphabetical tiebreak); every other dimension alphabetically.
pub fn compute_options(
    items: &[FlatItem],
    state: &FilterState,
    dimension: FilterDimension,
) -> Vec<FilterOption> {
    let excluded = dimension.with_downstream();
    // Picking an act clears the legislation, which leaves Act rows only
    let act_rows_only = dimension == FilterDimension::ActName;
    let context = items.iter().filter(|item| {
        state.row_matches(item, &excluded) && (!act_rows_only || item.legislation_type.is_act())
    });

    let mut values = count_values(context, dimension);
    match dimension {
        FilterDimension::ManagementDomain => {
            values.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| alphabetical(a, b)))
        }
        _ => values.sort_by(alphabetical),
    }

    debug!(dimension = %dimension, values = values.len(), "computed filter options");

    let mut options = Vec::with_capacity(values.len() + 1);
    options.push(FilterOption::new(ALL, values.len()));
    options.extend(values);
    options
}

/// Options for every dimension at once
pub fn compute_all_options(
    items: &[FlatItem],
    state: &FilterState,
) -> Vec<(FilterDimension, Vec<FilterOption>)> {
    FilterDimension::all()
        .into_iter()
        .map(|dim| (dim, compute_options(items, state, dim)))
        .collect()
}
