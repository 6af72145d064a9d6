//! Shared record types for the legislation browser.
//!
//! Source rows arrive loosely typed (every column a string). They are
//! validated once into [`Paragraph`] and [`Legislation`] records here, and
//! nothing past this crate sees the raw rows again.

pub mod flat_item;
pub mod records;
pub mod tables;
pub mod value_set;

pub use flat_item::FlatItem;
pub use records::{Jurisdiction, Legislation, LegislationType, Paragraph, RecordError};
pub use tables::{
    GovernanceKeywordRow, LegislationRow, ParagraphRow, SourceTables, ThreatKeywordRow,
};
pub use value_set::ValueSet;
