//! Output formatting for CLI display.
//!
//! Provides [`render`] for the `read` formats and the [`PrettyPrint`] trait
//! for human-readable summaries.

use tabled::{Table, Tabled};

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::models::{PublishReport, PublishStatus, Variable, VariableSet, SENSITIVE_PLACEHOLDER};

/// Trait for human-readable output.
pub trait PrettyPrint {
    /// Returns a formatted string for terminal display.
    fn pretty_print(&self) -> String;
}

/// Render a variable set in the requested format.
///
/// `pretty` applies to the JSON formats; tables are always laid out.
pub fn render(variables: &VariableSet, format: OutputFormat, pretty: bool) -> Result<String> {
    match format {
        OutputFormat::Json => variables.render_document(pretty),
        OutputFormat::Tfvars => variables.render_flat(pretty),
        OutputFormat::Table => Ok(variables.pretty_print()),
    }
}

#[derive(Tabled)]
struct VariableRow {
    key: String,
    value: String,
    category: String,
    hcl: bool,
    sensitive: bool,
    created: String,
}

impl From<&Variable> for VariableRow {
    fn from(v: &Variable) -> Self {
        Self {
            key: v.key.clone(),
            value: if v.sensitive {
                SENSITIVE_PLACEHOLDER.to_string()
            } else {
                v.value.clone()
            },
            category: v.category.to_string(),
            hcl: v.hcl,
            sensitive: v.sensitive,
            created: v
                .created()
                .map(|t| t.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        }
    }
}

impl PrettyPrint for VariableSet {
    fn pretty_print(&self) -> String {
        let rows: Vec<VariableRow> = self.iter().map(VariableRow::from).collect();
        format!("{}\n\n{} variable(s)", Table::new(rows), self.len())
    }
}

impl PrettyPrint for PublishReport {
    fn pretty_print(&self) -> String {
        let mut lines: Vec<String> = self
            .outcomes
            .iter()
            .map(|o| match o.status {
                PublishStatus::Created => format!("{} created.", o.key),
                PublishStatus::Failed => format!("{} {}", o.key, o.message),
            })
            .collect();

        lines.push(format!(
            "{} created, {} failed",
            self.created().count(),
            self.failures().count()
        ));
        lines.join("\n")
    }
}
