//! Validated source records
//!
//! Implements the typed boundary: every downstream component works on
//! [`Paragraph`] and [`Legislation`], never on the raw rows.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tables::{LegislationRow, ParagraphRow};
use crate::value_set::ValueSet;

/// Why a source row could not be turned into a record
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("invalid value for `{field}`: {value:?}")]
    InvalidValue { field: &'static str, value: String },
}

/// Level of government a statute belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Jurisdiction {
    Federal,
    Provincial,
}

impl Jurisdiction {
    pub fn name(&self) -> &'static str {
        match self {
            Jurisdiction::Federal => "Federal",
            Jurisdiction::Provincial => "Provincial",
        }
    }

    /// Parse from display name (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "federal" => Some(Jurisdiction::Federal),
            "provincial" => Some(Jurisdiction::Provincial),
            _ => None,
        }
    }
}

impl std::fmt::Display for Jurisdiction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Kind of legal instrument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LegislationType {
    Act,
    Regulation,
    Code,
    Order,
}

impl LegislationType {
    pub fn name(&self) -> &'static str {
        match self {
            LegislationType::Act => "Act",
            LegislationType::Regulation => "Regulation",
            LegislationType::Code => "Code",
            LegislationType::Order => "Order",
        }
    }

    /// Parse from display name (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "act" => Some(LegislationType::Act),
            "regulation" => Some(LegislationType::Regulation),
            "code" => Some(LegislationType::Code),
            "order" => Some(LegislationType::Order),
            _ => None,
        }
    }

    pub fn is_act(&self) -> bool {
        matches!(self, LegislationType::Act)
    }
}

impl std::fmt::Display for LegislationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One fragment of statutory text. Immutable after load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    pub paragraph_id: String,
    pub legislation_id: String,
    /// Section label, may be empty
    pub section: String,
    /// Heading, may be empty
    pub heading: String,
    pub text: String,
    pub management_domains: ValueSet,
    pub domain_keywords: ValueSet,
    pub clause_types: ValueSet,
    pub clause_keywords: ValueSet,
    pub actionable_types: ValueSet,
    pub responsible_officials: ValueSet,
    /// "Mandatory", "Discretionary", or empty
    pub discretion_types: ValueSet,
}

impl Paragraph {
    pub fn from_row(row: ParagraphRow) -> Result<Self, RecordError> {
        let paragraph_id = required("paragraph_id", row.paragraph_id)?;
        let legislation_id = required("legislation_id", row.legislation_id)?;

        Ok(Self {
            paragraph_id,
            legislation_id,
            section: row.section,
            heading: row.heading,
            text: row.text,
            management_domains: ValueSet::parse(&row.management_domain),
            domain_keywords: ValueSet::parse(&row.domain_keywords),
            clause_types: ValueSet::parse(&row.clause_type),
            clause_keywords: ValueSet::parse(&row.clause_keywords),
            actionable_types: ValueSet::parse(&row.actionable_type),
            responsible_officials: ValueSet::parse(&row.responsible_official),
            discretion_types: ValueSet::parse(&row.discretion_type),
        })
    }
}

/// Metadata for one statute, regulation, code or order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Legislation {
    pub legislation_id: String,
    pub jurisdiction: Jurisdiction,
    pub legislation_type: LegislationType,
    pub act_name: String,
    pub legislation_name: String,
    pub source_url: Option<String>,
    pub agencies: ValueSet,
}

impl Legislation {
    pub fn from_row(row: LegislationRow) -> Result<Self, RecordError> {
        let legislation_id = required("legislation_id", row.legislation_id)?;
        let jurisdiction =
            Jurisdiction::parse(&row.jurisdiction).ok_or_else(|| RecordError::InvalidValue {
                field: "jurisdiction",
                value: row.jurisdiction.clone(),
            })?;
        let legislation_type = LegislationType::parse(&row.legislation_type).ok_or_else(|| {
            RecordError::InvalidValue {
                field: "legislation_type",
                value: row.legislation_type.clone(),
            }
        })?;

        let source_url = Some(row.source_url.trim().to_string()).filter(|url| !url.is_empty());

        Ok(Self {
            legislation_id,
            jurisdiction,
            legislation_type,
            act_name: row.act_name.trim().to_string(),
            legislation_name: row.legislation_name.trim().to_string(),
            source_url,
            agencies: ValueSet::parse(&row.agencies),
        })
    }
}

fn required(field: &'static str, value: String) -> Result<String, RecordError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(RecordError::MissingField(field))
    } else {
        Ok(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn legislation_row() -> LegislationRow {
        LegislationRow {
            legislation_id: "L1".to_string(),
            jurisdiction: "federal".to_string(),
            legislation_type: "Regulation".to_string(),
            act_name: "Fisheries Act".to_string(),
            legislation_name: "Fisheries General Regulations".to_string(),
            source_url: "  ".to_string(),
            agencies: "DFO; Transport Canada".to_string(),
        }
    }

    #[test]
    fn test_enum_parsing() {
        assert_eq!(Jurisdiction::parse("Federal"), Some(Jurisdiction::Federal));
        assert_eq!(Jurisdiction::parse(" PROVINCIAL "), Some(Jurisdiction::Provincial));
        assert_eq!(Jurisdiction::parse("Municipal"), None);
        assert_eq!(LegislationType::parse("order"), Some(LegislationType::Order));
        assert_eq!(LegislationType::parse("Bylaw"), None);
    }

    #[test]
    fn test_legislation_from_row() {
        let legislation = Legislation::from_row(legislation_row()).unwrap();
        assert_eq!(legislation.jurisdiction, Jurisdiction::Federal);
        assert_eq!(legislation.legislation_type, LegislationType::Regulation);
        assert_eq!(legislation.source_url, None);
        assert_eq!(legislation.agencies.len(), 2);
    }

    #[test]
    fn test_legislation_rejects_unknown_jurisdiction() {
        let mut row = legislation_row();
        row.jurisdiction = "Municipal".to_string();
        let err = Legislation::from_row(row).unwrap_err();
        assert_eq!(
            err,
            RecordError::InvalidValue {
                field: "jurisdiction",
                value: "Municipal".to_string()
            }
        );
    }

    #[test]
    fn test_paragraph_requires_ids() {
        let row = ParagraphRow {
            paragraph_id: " ".to_string(),
            legislation_id: "L1".to_string(),
            ..ParagraphRow::default()
        };
        assert_eq!(
            Paragraph::from_row(row).unwrap_err(),
            RecordError::MissingField("paragraph_id")
        );
    }

    #[test]
    fn test_paragraph_decodes_multi_value_columns() {
        let row = ParagraphRow {
            paragraph_id: "12".to_string(),
            legislation_id: "L1".to_string(),
            management_domain: "Fisheries; Pollution".to_string(),
            clause_type: "Regulatory".to_string(),
            ..ParagraphRow::default()
        };
        let paragraph = Paragraph::from_row(row).unwrap();
        assert_eq!(paragraph.management_domains.as_slice(), &["Fisheries", "Pollution"]);
        assert!(paragraph.discretion_types.is_empty());
    }
}
