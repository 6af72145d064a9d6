//! Flattened export, one scalar row per flat item
//!
//! Column names match the spreadsheet export. Multi-valued fields are
//! semicolon-joined here and nowhere else.

use chrono::{DateTime, Utc};
use legis_types::{FlatItem, Jurisdiction, LegislationType, RecordError, ValueSet};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::filters::FilterState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRow {
    #[serde(rename = "Paragraph ID")]
    pub paragraph_id: String,
    #[serde(rename = "Legislation ID")]
    pub legislation_id: String,
    #[serde(rename = "Jurisdiction")]
    pub jurisdiction: String,
    #[serde(rename = "Legislation Type")]
    pub legislation_type: String,
    #[serde(rename = "Act Name")]
    pub act_name: String,
    #[serde(rename = "Legislation Name")]
    pub legislation_name: String,
    #[serde(rename = "Section")]
    pub section: String,
    #[serde(rename = "Heading")]
    pub heading: String,
    #[serde(rename = "Text")]
    pub text: String,
    #[serde(rename = "Management Domain")]
    pub management_domain: String,
    #[serde(rename = "Domain Keywords")]
    pub domain_keywords: String,
    #[serde(rename = "IUCN Threats")]
    pub iucn_threats: String,
    #[serde(rename = "Clause Types")]
    pub clause_types: String,
    #[serde(rename = "Clause Keywords")]
    pub clause_keywords: String,
    #[serde(rename = "Actionable Type")]
    pub actionable_type: String,
    #[serde(rename = "Responsible Official")]
    pub responsible_official: String,
    #[serde(rename = "Discretion Type")]
    pub discretion_type: String,
    #[serde(rename = "Source URL")]
    pub source_url: String,
    #[serde(rename = "Agencies")]
    pub agencies: String,
}

impl From<&FlatItem> for ExportRow {
    fn from(item: &FlatItem) -> Self {
        Self {
            paragraph_id: item.paragraph_id.clone(),
            legislation_id: item.legislation_id.clone(),
            jurisdiction: item.jurisdiction.name().to_string(),
            legislation_type: item.legislation_type.name().to_string(),
            act_name: item.act_name.clone(),
            legislation_name: item.legislation_name.clone(),
            section: item.section.clone(),
            heading: item.heading.clone(),
            text: item.text.clone(),
            management_domain: item.management_domain.clone(),
            domain_keywords: item.domain_keywords.encode(),
            iucn_threats: item.iucn_threats.encode(),
            clause_types: item.clause_types.encode(),
            clause_keywords: item.clause_keywords.encode(),
            actionable_type: item.actionable_types.encode(),
            responsible_official: item.responsible_officials.encode(),
            discretion_type: item.discretion_types.encode(),
            source_url: item.source_url.clone().unwrap_or_default(),
            agencies: item.agencies.encode(),
        }
    }
}

impl ExportRow {
    /// Rebuild the flat item this row was exported from
    pub fn into_flat_item(self) -> Result<FlatItem, RecordError> {
        let jurisdiction =
            Jurisdiction::parse(&self.jurisdiction).ok_or_else(|| RecordError::InvalidValue {
                field: "Jurisdiction",
                value: self.jurisdiction.clone(),
            })?;
        let legislation_type = LegislationType::parse(&self.legislation_type).ok_or_else(|| {
            RecordError::InvalidValue {
                field: "Legislation Type",
                value: self.legislation_type.clone(),
            }
        })?;

        Ok(FlatItem {
            paragraph_id: self.paragraph_id,
            legislation_id: self.legislation_id,
            jurisdiction,
            legislation_type,
            act_name: self.act_name,
            legislation_name: self.legislation_name,
            source_url: Some(self.source_url).filter(|url| !url.is_empty()),
            agencies: ValueSet::parse(&self.agencies),
            section: self.section,
            heading: self.heading,
            text: self.text,
            management_domain: self.management_domain,
            domain_keywords: ValueSet::parse(&self.domain_keywords),
            iucn_threats: ValueSet::parse(&self.iucn_threats),
            clause_types: ValueSet::parse(&self.clause_types),
            clause_keywords: ValueSet::parse(&self.clause_keywords),
            actionable_types: ValueSet::parse(&self.actionable_type),
            responsible_officials: ValueSet::parse(&self.responsible_official),
            discretion_types: ValueSet::parse(&self.discretion_type),
        })
    }
}

/// An export file: the rows plus the filters that produced them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub exported_at: DateTime<Utc>,
    pub filters: FilterState,
    pub rows: Vec<ExportRow>,
}

impl ExportDocument {
    pub fn new(items: &[FlatItem], filters: &FilterState) -> Self {
        Self {
            exported_at: Utc::now(),
            filters: filters.clone(),
            rows: items.iter().map(ExportRow::from).collect(),
        }
    }

    /// Decode every row back into a flat item
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidExportRow`] with the index of the first
    /// row whose jurisdiction or legislation type does not parse.
    pub fn into_items(self) -> Result<Vec<FlatItem>, EngineError> {
        self.rows
            .into_iter()
            .enumerate()
            .map(|(row, export_row)| {
                export_row
                    .into_flat_item()
                    .map_err(|source| EngineError::InvalidExportRow { row, source })
            })
            .collect()
    }
}

/// Serialize items (and the filters that selected them) as pretty JSON
///
/// # Errors
///
/// Returns [`EngineError::Export`] if serialization fails.
pub fn write_export(items: &[FlatItem], filters: &FilterState) -> Result<String, EngineError> {
    Ok(serde_json::to_string_pretty(&ExportDocument::new(
        items, filters,
    ))?)
}

/// Parse a document written by [`write_export`]
///
/// # Errors
///
/// Returns [`EngineError::Export`] if `json` is not an export document.
/// Rows are decoded separately by [`ExportDocument::into_items`].
pub fn parse_export(json: &str) -> Result<ExportDocument, EngineError> {
    Ok(serde_json::from_str(json)?)
}
