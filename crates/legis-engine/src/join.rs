//! Join & normalize: four source tables -> one flat, queryable view

use std::collections::HashMap;

use legis_types::{FlatItem, Legislation, Paragraph, SourceTables};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::dictionary::{GovernanceDictionary, ThreatDictionary};
use crate::error::{JoinDiagnostic, SourceTable};

/// Counters reported alongside a join
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct JoinStats {
    pub paragraphs_read: usize,
    pub paragraphs_skipped: usize,
    pub legislation_records: usize,
    pub items: usize,
}

/// Result of joining the source tables
#[derive(Debug, Clone, Default)]
pub struct JoinOutput {
    pub items: Vec<FlatItem>,
    pub diagnostics: Vec<JoinDiagnostic>,
    pub stats: JoinStats,
}

/// Join the source tables, compiling both keyword dictionaries first
pub fn join(tables: &SourceTables) -> JoinOutput {
    let threats = ThreatDictionary::from_rows(&tables.iucn_keywords);
    let governance = GovernanceDictionary::from_rows(&tables.governance_keywords);
    join_with(tables, &threats, &governance)
}

/// Join using dictionaries the caller already compiled.
///
/// Each valid paragraph with a resolvable legislation id fans out into one
/// [`FlatItem`] per assigned management domain (or a single item with an
/// empty domain). Bad rows are skipped with a diagnostic.
pub fn join_with(
    tables: &SourceTables,
    threats: &ThreatDictionary,
    governance: &GovernanceDictionary,
) -> JoinOutput {
    let mut output = JoinOutput::default();
    let legislation = index_legislation(tables, &mut output.diagnostics);
    output.stats.legislation_records = legislation.len();

    for (row_idx, row) in tables.paragraphs.iter().enumerate() {
        output.stats.paragraphs_read += 1;

        let paragraph = match Paragraph::from_row(row.clone()) {
            Ok(paragraph) => paragraph,
            Err(err) => {
                report(
                    &mut output.diagnostics,
                    JoinDiagnostic::InvalidRow {
                        table: SourceTable::Paragraphs,
                        row: row_idx,
                        reason: err.to_string(),
                    },
                );
                output.stats.paragraphs_skipped += 1;
                continue;
            }
        };

        let Some(record) = legislation.get(&paragraph.legislation_id) else {
            report(
                &mut output.diagnostics,
                JoinDiagnostic::UnresolvedLegislation {
                    paragraph_id: paragraph.paragraph_id.clone(),
                    legislation_id: paragraph.legislation_id.clone(),
                },
            );
            output.stats.paragraphs_skipped += 1;
            continue;
        };

        output
            .items
            .extend(flatten_paragraph(&paragraph, record, threats, governance));
    }

    output.stats.items = output.items.len();
    info!(
        paragraphs = output.stats.paragraphs_read,
        skipped = output.stats.paragraphs_skipped,
        items = output.stats.items,
        "joined source tables"
    );
    output
}

/// Fan one paragraph out into its flat items
pub fn flatten_paragraph(
    paragraph: &Paragraph,
    legislation: &Legislation,
    threats: &ThreatDictionary,
    governance: &GovernanceDictionary,
) -> Vec<FlatItem> {
    let iucn_threats = threats.classify(&paragraph.text);

    let mut keywords = governance.extract(&paragraph.management_domains, &paragraph.text);
    keywords.extend_from(&paragraph.domain_keywords);

    if paragraph.management_domains.is_empty() {
        return vec![FlatItem::new(
            paragraph,
            legislation,
            "",
            keywords,
            iucn_threats,
        )];
    }

    paragraph
        .management_domains
        .iter()
        .map(|domain| {
            FlatItem::new(
                paragraph,
                legislation,
                domain,
                keywords.clone(),
                iucn_threats.clone(),
            )
        })
        .collect()
}

fn index_legislation(
    tables: &SourceTables,
    diagnostics: &mut Vec<JoinDiagnostic>,
) -> HashMap<String, Legislation> {
    let mut index = HashMap::with_capacity(tables.legislation.len());
    for (row_idx, row) in tables.legislation.iter().enumerate() {
        match Legislation::from_row(row.clone()) {
            Ok(record) => {
                if index.contains_key(&record.legislation_id) {
                    report(
                        diagnostics,
                        JoinDiagnostic::DuplicateLegislation {
                            legislation_id: record.legislation_id,
                        },
                    );
                } else {
                    index.insert(record.legislation_id.clone(), record);
                }
            }
            Err(err) => report(
                diagnostics,
                JoinDiagnostic::InvalidRow {
                    table: SourceTable::Legislation,
                    row: row_idx,
                    reason: err.to_string(),
                },
            ),
        }
    }
    debug!(records = index.len(), "indexed legislation metadata");
    index
}

fn report(diagnostics: &mut Vec<JoinDiagnostic>, diagnostic: JoinDiagnostic) {
    warn!("{}", diagnostic);
    diagnostics.push(diagnostic);
}

#[cfg(test)]
mod tests {
    use super::*;
    use legis_types::{GovernanceKeywordRow, LegislationRow, ParagraphRow, ThreatKeywordRow};
    use pretty_assertions::assert_eq;

    fn tables() -> SourceTables {
        SourceTables {
            paragraphs: vec![
                ParagraphRow {
                    paragraph_id: "1".to_string(),
                    legislation_id: "FA".to_string(),
                    section: "35".to_string(),
                    text: "No person shall damage spawning grounds or release effluent."
                        .to_string(),
                    management_domain: "Fisheries; Pollution".to_string(),
                    domain_keywords: "habitat".to_string(),
                    ..ParagraphRow::default()
                },
                ParagraphRow {
                    paragraph_id: "2".to_string(),
                    legislation_id: "FA".to_string(),
                    section: "36".to_string(),
                    text: "Definitions.".to_string(),
                    ..ParagraphRow::default()
                },
                ParagraphRow {
                    paragraph_id: "3".to_string(),
                    legislation_id: "MISSING".to_string(),
                    text: "Orphaned paragraph".to_string(),
                    ..ParagraphRow::default()
                },
                ParagraphRow {
                    paragraph_id: String::new(),
                    legislation_id: "FA".to_string(),
                    ..ParagraphRow::default()
                },
            ],
            legislation: vec![
                LegislationRow {
                    legislation_id: "FA".to_string(),
                    jurisdiction: "Federal".to_string(),
                    legislation_type: "Act".to_string(),
                    act_name: "Fisheries Act".to_string(),
                    legislation_name: "Fisheries Act".to_string(),
                    ..LegislationRow::default()
                },
                LegislationRow {
                    legislation_id: "FA".to_string(),
                    jurisdiction: "Provincial".to_string(),
                    legislation_type: "Act".to_string(),
                    act_name: "Shadow".to_string(),
                    legislation_name: "Shadow".to_string(),
                    ..LegislationRow::default()
                },
            ],
            iucn_keywords: vec![ThreatKeywordRow {
                keyword: "effluent".to_string(),
                category: "Pollution".to_string(),
            }],
            governance_keywords: vec![
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
            ],
        }
    }

    #[test]
    fn test_fan_out_per_domain() {
        let output = join(&tables());
        let first: Vec<_> = output
            .items
            .iter()
            .filter(|item| item.paragraph_id == "1")
            .collect();
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].management_domain, "Fisheries");
        assert_eq!(first[1].management_domain, "Pollution");
        assert_eq!(first[0].text, first[1].text);
    }

    #[test]
    fn test_no_domain_yields_single_item() {
        let output = join(&tables());
        let second: Vec<_> = output
            .items
            .iter()
            .filter(|item| item.paragraph_id == "2")
            .collect();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].management_domain, "");
    }

    #[test]
    fn test_attaches_threats_and_keywords() {
        let output = join(&tables());
        let item = &output.items[0];
        assert_eq!(item.iucn_threats.as_slice(), &["Pollution"]);
        assert_eq!(item.domain_keywords.as_slice(), &["spawning", "effluent", "habitat"]);
        assert_eq!(item.act_name, "Fisheries Act");
    }

    #[test]
    fn test_bad_rows_are_skipped_with_diagnostics() {
        let output = join(&tables());
        assert_eq!(output.stats.paragraphs_read, 4);
        assert_eq!(output.stats.paragraphs_skipped, 2);
        assert_eq!(output.stats.items, 3);
        assert!(output
            .diagnostics
            .contains(&JoinDiagnostic::UnresolvedLegislation {
                paragraph_id: "3".to_string(),
                legislation_id: "MISSING".to_string(),
            }));
        assert!(output
            .diagnostics
            .contains(&JoinDiagnostic::DuplicateLegislation {
                legislation_id: "FA".to_string(),
            }));
        assert!(output.diagnostics.iter().any(|d| matches!(
            d,
            JoinDiagnostic::InvalidRow {
                table: SourceTable::Paragraphs,
                row: 3,
                ..
            }
        )));
    }

    #[test]
    fn test_duplicate_legislation_keeps_first() {
        let output = join(&tables());
        assert!(output
            .items
            .iter()
            .all(|item| item.act_name == "Fisheries Act"));
    }
}
