//! Pivot specification models, report and error types.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use polars::prelude::{DataFrame, PolarsError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::conf::derive_default_pivot_options;

////////////////////////////////////////////////////////////////////////////////
// #region OptionsSpecification

/// One named bucket of size labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecSizeGroup {
    /// Display name of the group (`Grp A`, ...).
    pub name: String,
    /// Size labels in column order.
    pub sizes: Vec<String>,
}

/// Pivot layout: taxonomy, key/value columns and carried attribute columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecPivotOptions {
    /// Size groups in output-row order.
    pub size_groups: Vec<SpecSizeGroup>,
    /// Attribute columns emitted before the size columns.
    pub cols_fixed: Vec<String>,
    /// Attribute columns emitted after the total column.
    pub cols_trailing: Vec<String>,
    /// Purchase-order key column.
    pub col_po: String,
    /// Color key column.
    pub col_color: String,
    /// Size label column.
    pub col_size: String,
    /// Quantity column.
    pub col_quantity: String,
    /// Name of the per-row total column.
    pub col_total: String,
    /// Fail when rows of one output row disagree on an attribute value.
    pub if_check_consistent_attributes: bool,
}

impl Default for SpecPivotOptions {
    fn default() -> Self {
        derive_default_pivot_options()
    }
}

impl SpecPivotOptions {
    /// Size labels of all groups in canonical column order.
    pub fn sizes_canonical(&self) -> Vec<&str> {
        self.size_groups
            .iter()
            .flat_map(|group| group.sizes.iter().map(String::as_str))
            .collect()
    }

    /// Check taxonomy shape and output-column name collisions.
    pub fn validate(&self) -> Result<(), PivotError> {
        if self.size_groups.is_empty() {
            return Err(PivotError::InvalidOptions(
                "size_groups must contain at least one group.".to_string(),
            ));
        }

        let mut dict_group_by_label: BTreeMap<&str, &str> = BTreeMap::new();
        for group in &self.size_groups {
            if group.sizes.is_empty() {
                return Err(PivotError::InvalidOptions(format!(
                    "Size group {:?} has no size labels.",
                    group.name
                )));
            }
            for label in &group.sizes {
                if let Some(name_other) = dict_group_by_label.insert(label, &group.name) {
                    return Err(PivotError::InvalidOptions(format!(
                        "Size label {label:?} appears in both {name_other:?} and {:?}.",
                        group.name
                    )));
                }
            }
        }

        let set_cols_attribute: BTreeSet<&str> = self
            .cols_fixed
            .iter()
            .chain(self.cols_trailing.iter())
            .map(String::as_str)
            .collect();
        for label in dict_group_by_label.keys() {
            if set_cols_attribute.contains(label) || *label == self.col_total {
                return Err(PivotError::InvalidOptions(format!(
                    "Size label {label:?} collides with an attribute or total column name."
                )));
            }
        }
        if set_cols_attribute.contains(self.col_total.as_str()) {
            return Err(PivotError::InvalidOptions(format!(
                "Total column {:?} collides with an attribute column name.",
                self.col_total
            )));
        }

        Ok(())
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region GroupKey

/// One component of the `(PO, Color)` grouping key.
///
/// Ordered numbers first (by value), then text (lexicographic).
#[derive(Debug, Clone)]
pub enum EnumKeyValue {
    /// Numeric cell value.
    Number(f64),
    /// Text cell value, kept verbatim.
    Text(String),
}

impl Ord for EnumKeyValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Number(_), Self::Text(_)) => Ordering::Less,
            (Self::Text(_), Self::Number(_)) => Ordering::Greater,
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for EnumKeyValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for EnumKeyValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for EnumKeyValue {}

impl fmt::Display for EnumKeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ReportSpecification

/// Counters and diagnostics for one pivot call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReportPivot {
    /// Rows in the input table.
    pub cnt_rows_input: u64,
    /// Rows whose size matched the taxonomy and were summed.
    pub cnt_rows_counted: u64,
    /// Rows whose size matched no group.
    pub cnt_rows_unmatched_size: u64,
    /// Rows skipped because PO or color was missing.
    pub cnt_rows_null_key: u64,
    /// Distinct `(PO, Color)` pairs with at least one counted row.
    pub cnt_groups: u64,
    /// Rows in the pivoted table.
    pub cnt_rows_output: u64,
    /// Non-fatal warnings.
    pub warnings: Vec<String>,
}

impl ReportPivot {
    /// Add a warning message.
    pub fn warn(&mut self, msg: impl AsRef<str>) {
        self.warnings.push(msg.as_ref().to_string());
    }

    /// Human-readable one-line summary.
    pub fn format(&self, prefix: &str) -> String {
        format!(
            "{prefix} input={} counted={} unmatched_size={} null_key={} groups={} output={} warnings={}",
            self.cnt_rows_input,
            self.cnt_rows_counted,
            self.cnt_rows_unmatched_size,
            self.cnt_rows_null_key,
            self.cnt_groups,
            self.cnt_rows_output,
            self.warnings.len()
        )
    }
}

impl fmt::Display for ReportPivot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("[PIVOT]"))
    }
}

/// Pivoted table plus its report.
#[derive(Debug, Clone)]
pub struct ResultPivot {
    /// Pivoted table; has no columns when nothing was produced.
    pub df: DataFrame,
    /// Run counters.
    pub report: ReportPivot,
}

impl ResultPivot {
    /// `true` when no output row was produced ("nothing to process").
    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Failures that abort a pivot call; no partial result is returned.
#[derive(Debug, Error)]
pub enum PivotError {
    /// Grouping, size or quantity column absent from the input header.
    #[error("Missing required input column(s): {}", .columns.join(", "))]
    MissingRequiredInput {
        /// Names of the absent columns.
        columns: Vec<String>,
    },

    /// A counted row holds a value of the wrong type.
    #[error("Malformed value at data row {row_idx}, column {column:?}: {value:?} is not numeric")]
    MalformedInput {
        /// Zero-based data row index.
        row_idx: usize,
        /// Offending column.
        column: String,
        /// Offending cell text.
        value: String,
    },

    /// Headers the pivot reads collide after whitespace trimming.
    #[error("Duplicate column names after trimming: {}", .columns.join(", "))]
    DuplicateColumns {
        /// Colliding names.
        columns: Vec<String>,
    },

    /// Two rows of the same output row disagree on an attribute.
    #[error(
        "Inconsistent attribute {column:?} for PO {po} / color {color}: data row {row_idx} differs from data row {row_idx_first}"
    )]
    InconsistentAttributes {
        /// Attribute column.
        column: String,
        /// PO key of the output row.
        po: String,
        /// Color key of the output row.
        color: String,
        /// Row supplying the kept value.
        row_idx_first: usize,
        /// Row carrying the diverging value.
        row_idx: usize,
    },

    /// Invalid taxonomy or column layout.
    #[error("Invalid pivot options: {0}")]
    InvalidOptions(String),

    /// Dataframe operation failure.
    #[error("polars error: {0}")]
    Polars(#[from] PolarsError),
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
