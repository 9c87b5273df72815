//! AI collaborator contracts.
//!
//! The engine never talks to a model. Implementations live with the host
//! application (network client, local model, test stub); the engine only
//! defines the seams and applies the results through the normal workspace
//! transitions (`apply_generated_rows`, `apply_schema_command`).

use serde::{Deserialize, Serialize};

use crate::column::{Column, ColumnType};
use crate::sheet::{ColumnId, Row};
use crate::value::Value;

/// Cells for one generated row, keyed by column id. Values are expected
/// pre-coerced to each column's type; the engine coerces again on apply,
/// so a sloppy generator degrades to blanks rather than corrupt data.
pub type GeneratedRow = Vec<(ColumnId, Value)>;

/// Generates plausible rows for a sheet. Row ids are assigned by the
/// engine when the result is applied.
pub trait RowGenerator {
    fn generate(
        &self,
        columns: &[Column],
        existing: &[Row],
        count: usize,
        hint: Option<&str>,
    ) -> Result<Vec<GeneratedRow>, String>;
}

/// Chart family suggested by sheet analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Bar,
    Line,
    Pie,
}

/// Result of analyzing a sheet's data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetAnalysis {
    pub summary: String,
    pub key_trends: Vec<String>,
    pub suggested_chart: ChartType,
}

/// A schema change parsed from a natural-language prompt. Applied via
/// `Workspace::apply_schema_command`; columns are addressed by display
/// label, which is how a prompt refers to them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SchemaCommand {
    AddColumn {
        label: String,
        #[serde(rename = "type")]
        ty: ColumnType,
    },
    DeleteColumn { label: String },
    RenameColumn { from: String, to: String },
    /// No schema change; the assistant answered in prose.
    Reply { text: String },
}

/// Schema/analysis assistant contract.
pub trait SchemaAssistant {
    fn analyze(&self, columns: &[Column], rows: &[Row]) -> Result<SheetAnalysis, String>;

    fn modify_schema(
        &self,
        prompt: &str,
        columns: &[Column],
        sheet_name: &str,
    ) -> Result<SchemaCommand, String>;
}
