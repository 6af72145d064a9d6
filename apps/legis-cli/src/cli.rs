//! Command-line surface and command dispatch

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use legis_engine::{Corpus, FilterDimension, FilterState};
use serde_json::json;
use tracing::info;

use crate::config::CliConfig;

#[derive(Parser, Debug)]
#[command(name = "legis")]
#[command(version, about = "Browse and filter legislative text by management domain")]
pub struct Cli {
    /// Path to the TOML config naming the source tables
    #[arg(short, long, default_value = "legis.toml")]
    pub config: PathBuf,

    /// Log filter, overrides the config (RUST_LOG still wins)
    #[arg(long)]
    pub log_filter: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the filtered items, or merged sections with --sections
    Filter {
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long)]
        sections: bool,
    },
    /// Print dropdown options for one dimension, e.g. managementDomain
    Options {
        dimension: String,
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Write the filtered items as an export document
    Export {
        #[command(flatten)]
        filters: FilterArgs,
        /// Output file; defaults to the config's export_path, else stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print keyword highlight ranges for one paragraph
    Highlight {
        paragraph_id: String,
        /// Scope keywords to this management domain
        #[arg(long)]
        domain: Option<String>,
    },
    /// Print join diagnostics and counters
    Diagnostics,
}

/// Filter selections; omitted flags mean "All"
#[derive(Args, Debug, Default, Clone)]
pub struct FilterArgs {
    #[arg(long)]
    pub jurisdiction: Option<String>,
    #[arg(long)]
    pub domain: Option<String>,
    #[arg(long)]
    pub act: Option<String>,
    #[arg(long)]
    pub legislation: Option<String>,
    #[arg(long)]
    pub search: Option<String>,
    #[arg(long)]
    pub clause_type: Option<String>,
    #[arg(long)]
    pub actionable_type: Option<String>,
    #[arg(long)]
    pub responsible_official: Option<String>,
    #[arg(long)]
    pub discretion_type: Option<String>,
}

impl FilterArgs {
    /// Build the state upstream-first so the cascade keeps every flag
    pub fn to_state(&self) -> FilterState {
        let mut state = FilterState::new();
        let selections = [
            (FilterDimension::Jurisdiction, &self.jurisdiction),
            (FilterDimension::ManagementDomain, &self.domain),
            (FilterDimension::ActName, &self.act),
            (FilterDimension::LegislationName, &self.legislation),
            (FilterDimension::ClauseType, &self.clause_type),
            (FilterDimension::ActionableType, &self.actionable_type),
            (FilterDimension::ResponsibleOfficial, &self.responsible_official),
            (FilterDimension::DiscretionType, &self.discretion_type),
        ];
        for (dimension, value) in selections {
            if let Some(value) = value {
                state.set(dimension, value);
            }
        }
        if let Some(term) = &self.search {
            state.set_search_term(term);
        }
        state
    }
}

/// Run one command against a built corpus; returns what goes to stdout
///
/// # Errors
///
/// Returns an error for an unknown option dimension, an unknown paragraph
/// id in `highlight`, or a failed export write.
pub fn execute(command: &Command, corpus: &Corpus, config: &CliConfig) -> anyhow::Result<String> {
    match command {
        Command::Filter { filters, sections } => {
            let state = filters.to_state();
            if *sections {
                Ok(serde_json::to_string_pretty(&corpus.sections(&state))?)
            } else {
                Ok(serde_json::to_string_pretty(&corpus.filter(&state))?)
            }
        }
        Command::Options { dimension, filters } => {
            let options = corpus.options_by_name(&filters.to_state(), dimension)?;
            Ok(serde_json::to_string_pretty(&options)?)
        }
        Command::Export { filters, output } => {
            let document = corpus.export(&filters.to_state())?;
            match output.as_ref().or(config.export_path.as_ref()) {
                Some(path) => {
                    fs::write(path, &document)
                        .with_context(|| format!("Failed to write export: {}", path.display()))?;
                    info!(path = %path.display(), "wrote export");
                    Ok(String::new())
                }
                None => Ok(document),
            }
        }
        Command::Highlight {
            paragraph_id,
            domain,
        } => {
            let domain = domain.as_deref();
            let candidates: Vec<_> = corpus
                .items()
                .iter()
                .filter(|item| item.paragraph_id == *paragraph_id)
                .collect();
            let Some(item) = domain
                .and_then(|d| {
                    candidates
                        .iter()
                        .find(|item| item.management_domain.eq_ignore_ascii_case(d))
                })
                .or_else(|| candidates.first())
            else {
                bail!("no paragraph with id {}", paragraph_id);
            };

            let keywords: Vec<_> = corpus
                .resolve_keywords(&item.domain_keywords.encode(), &item.text, domain)
                .into_iter()
                .map(|keyword| {
                    let scope = domain.and_then(|d| corpus.governance().scope_of(d, &keyword));
                    json!({ "keyword": keyword, "scope": scope })
                })
                .collect();
            let ranges: Vec<_> = corpus
                .highlight(item, domain)
                .into_iter()
                .map(|range| {
                    json!({
                        "start": range.start,
                        "end": range.end,
                        "text": &item.text[range],
                    })
                })
                .collect();
            Ok(serde_json::to_string_pretty(&json!({
                "paragraph_id": item.paragraph_id,
                "domain": domain,
                "keywords": keywords,
                "ranges": ranges,
            }))?)
        }
        Command::Diagnostics => Ok(serde_json::to_string_pretty(&json!({
            "built_at": corpus.built_at(),
            "stats": corpus.stats(),
            "diagnostics": corpus.diagnostics(),
        }))?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SourcePaths;
    use legis_types::{GovernanceKeywordRow, LegislationRow, ParagraphRow, SourceTables};
    use pretty_assertions::assert_eq;

    fn corpus() -> Corpus {
        Corpus::build(&SourceTables {
            paragraphs: vec![
                ParagraphRow {
                    paragraph_id: "1".to_string(),
                    legislation_id: "FA".to_string(),
                    section: "35".to_string(),
                    text: "Protect spawning habitat from effluent.".to_string(),
                    management_domain: "Fisheries; Pollution".to_string(),
                    ..ParagraphRow::default()
                },
                ParagraphRow {
                    paragraph_id: "2".to_string(),
                    legislation_id: "FA".to_string(),
                    section: "36".to_string(),
                    text: "Definitions.".to_string(),
                    ..ParagraphRow::default()
                },
            ],
            legislation: vec![LegislationRow {
                legislation_id: "FA".to_string(),
                jurisdiction: "Federal".to_string(),
                legislation_type: "Act".to_string(),
                act_name: "Fisheries Act".to_string(),
                legislation_name: "Fisheries Act".to_string(),
                ..LegislationRow::default()
            }],
            iucn_keywords: Vec::new(),
            governance_keywords: vec![
                GovernanceKeywordRow {
                    domain: "Fisheries".to_string(),
                    keyword: "spawning".to_string(),
                    scope: String::new(),
                },
                GovernanceKeywordRow {
                    domain: "Pollution".to_string(),
                    keyword: "effluent".to_string(),
                    scope: "section".to_string(),
                },
            ],
        })
    }

    fn config() -> CliConfig {
        CliConfig {
            sources: SourcePaths {
                paragraphs: PathBuf::from("p.json"),
                legislation: PathBuf::from("l.json"),
                iucn_keywords: None,
                governance_keywords: None,
            },
            log_filter: "info".to_string(),
            export_path: None,
        }
    }

    fn run(args: &[&str]) -> anyhow::Result<String> {
        let cli = Cli::try_parse_from(std::iter::once("legis").chain(args.iter().copied()))?;
        execute(&cli.command, &corpus(), &config())
    }

    #[test]
    fn test_filter_args_keep_cascaded_values() {
        let cli = Cli::try_parse_from([
            "legis",
            "filter",
            "--act",
            "Fisheries Act",
            "--domain",
            "Fisheries",
            "--legislation",
            "Fisheries Act",
        ])
        .unwrap();
        let Command::Filter { filters, .. } = cli.command else {
            panic!("expected filter command");
        };
        let state = filters.to_state();
        assert_eq!(state.management_domain(), Some("Fisheries"));
        assert_eq!(state.act_name(), Some("Fisheries Act"));
        assert_eq!(state.legislation_name(), Some("Fisheries Act"));
    }

    #[test]
    fn test_filter_command_outputs_items() {
        let output = run(&["filter", "--domain", "Pollution"]).unwrap();
        let items: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(items.as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_options_command() {
        let output = run(&["options", "managementDomain"]).unwrap();
        let options: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(options[0]["name"], "All");
        assert_eq!(options[0]["count"], 2);

        assert!(run(&["options", "colour"]).is_err());
    }

    #[test]
    fn test_highlight_command_scopes_to_domain() {
        let output = run(&["highlight", "1", "--domain", "Pollution"]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(
            value["keywords"],
            json!([{ "keyword": "effluent", "scope": "section" }])
        );
        assert_eq!(value["ranges"][0]["text"], "effluent");

        assert!(run(&["highlight", "99"]).is_err());
    }

    #[test]
    fn test_export_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.json");
        let output = run(&["export", "--output", path.to_str().unwrap()]).unwrap();
        assert!(output.is_empty());

        let document = legis_engine::parse_export(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(document.rows.len(), 3);
    }

    #[test]
    fn test_diagnostics_command() {
        let output = run(&["diagnostics"]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["stats"]["items"], 3);
        assert!(value["built_at"].is_string());
        assert_eq!(value["diagnostics"], json!([]));
    }
}
