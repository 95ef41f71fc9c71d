//! Stateless helpers used by the pivot kernel.

use std::collections::{BTreeMap, HashMap, HashSet};

use polars::prelude::{AnyValue, DataFrame};

use crate::spec::{EnumKeyValue, PivotError, ReportPivot, SpecPivotOptions};

////////////////////////////////////////////////////////////////////////////////
// #region HeaderUtils

/// Names the pivot looks up in the input header (keys, size, quantity, attributes).
fn derive_cols_resolved(options: &SpecPivotOptions) -> Vec<&str> {
    [
        &options.col_po,
        &options.col_color,
        &options.col_size,
        &options.col_quantity,
    ]
    .into_iter()
    .chain(options.cols_fixed.iter())
    .chain(options.cols_trailing.iter())
    .map(|c_name| c_name.trim())
    .collect()
}

/// Return a copy of `df` with surrounding whitespace trimmed from every header.
///
/// Headers that collide after trimming are an error only when the pivot reads
/// that name. Other collisions keep the first header as is and suffix the
/// rest (`Notes.1`, `Notes.2`, ...), with a warning in `report`.
pub fn normalize_header_names(
    df: &DataFrame,
    options: &SpecPivotOptions,
    report: &mut ReportPivot,
) -> Result<DataFrame, PivotError> {
    let l_colnames_trimmed: Vec<String> = df
        .get_column_names_str()
        .into_iter()
        .map(|c_name| c_name.trim().to_string())
        .collect();

    let mut dict_count: BTreeMap<&str, usize> = BTreeMap::new();
    for c_name in &l_colnames_trimmed {
        *dict_count.entry(c_name.as_str()).or_default() += 1;
    }
    let l_duplicates: Vec<String> = dict_count
        .into_iter()
        .filter(|(_, n_count)| *n_count > 1)
        .map(|(c_name, _)| c_name.to_string())
        .collect();
    if l_duplicates.is_empty() {
        let mut df_normalized = df.clone();
        df_normalized.set_column_names(l_colnames_trimmed)?;
        return Ok(df_normalized);
    }

    let l_cols_resolved = derive_cols_resolved(options);
    let l_duplicates_resolved: Vec<String> = l_duplicates
        .iter()
        .filter(|c_dup| {
            l_cols_resolved
                .iter()
                .any(|c_name| c_name.eq_ignore_ascii_case(c_dup))
        })
        .cloned()
        .collect();
    if !l_duplicates_resolved.is_empty() {
        return Err(PivotError::DuplicateColumns {
            columns: l_duplicates_resolved,
        });
    }

    let mut set_seen: HashSet<String> = HashSet::new();
    let mut l_colnames: Vec<String> = Vec::with_capacity(l_colnames_trimmed.len());
    for c_name in &l_colnames_trimmed {
        let mut c_candidate = c_name.clone();
        let mut n_suffix = 1usize;
        while !set_seen.insert(c_candidate.clone()) {
            c_candidate = format!("{c_name}.{n_suffix}");
            n_suffix += 1;
        }
        l_colnames.push(c_candidate);
    }
    report.warn(format!(
        "Header(s) repeated after trimming were suffixed: {}",
        l_duplicates.join(", ")
    ));

    let mut df_normalized = df.clone();
    df_normalized.set_column_names(l_colnames)?;
    Ok(df_normalized)
}

/// Find `wanted` among `columns`: exact match first, then ASCII case-insensitive.
///
/// Several case-insensitive matches resolve to the first one; see
/// [`derive_ambiguous_column_warnings`].
pub fn resolve_column_name<'a>(columns: &'a [String], wanted: &str) -> Option<&'a str> {
    let wanted = wanted.trim();
    columns
        .iter()
        .find(|c_name| c_name.as_str() == wanted)
        .or_else(|| {
            columns
                .iter()
                .find(|c_name| c_name.eq_ignore_ascii_case(wanted))
        })
        .map(String::as_str)
}

/// Warn for every looked-up name that lacks an exact match and matches
/// several headers ignoring case.
pub fn derive_ambiguous_column_warnings(
    columns: &[String],
    options: &SpecPivotOptions,
) -> Vec<String> {
    let mut set_seen: HashSet<&str> = HashSet::new();
    let mut l_warnings = Vec::new();
    for wanted in derive_cols_resolved(options) {
        if !set_seen.insert(wanted) || columns.iter().any(|c_name| c_name == wanted) {
            continue;
        }
        let l_candidates: Vec<&str> = columns
            .iter()
            .filter(|c_name| c_name.eq_ignore_ascii_case(wanted))
            .map(String::as_str)
            .collect();
        if l_candidates.len() > 1 {
            l_warnings.push(format!(
                "Column {wanted:?} matches {l_candidates:?} ignoring case; using {:?}.",
                l_candidates[0]
            ));
        }
    }
    l_warnings
}

/// Resolved names of the grouping, size and quantity columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecRequiredColumns {
    /// Purchase-order column.
    pub col_po: String,
    /// Color column.
    pub col_color: String,
    /// Size column.
    pub col_size: String,
    /// Quantity column.
    pub col_quantity: String,
}

/// Resolve PO, color, size and quantity columns against the input header.
pub fn resolve_required_columns(
    columns: &[String],
    options: &SpecPivotOptions,
) -> Result<SpecRequiredColumns, PivotError> {
    let mut l_missing = Vec::new();
    let mut resolve = |wanted: &String| match resolve_column_name(columns, wanted) {
        Some(c_name) => c_name.to_string(),
        None => {
            l_missing.push(wanted.clone());
            String::new()
        }
    };

    let required = SpecRequiredColumns {
        col_po: resolve(&options.col_po),
        col_color: resolve(&options.col_color),
        col_size: resolve(&options.col_size),
        col_quantity: resolve(&options.col_quantity),
    };
    if !l_missing.is_empty() {
        return Err(PivotError::MissingRequiredInput { columns: l_missing });
    }
    Ok(required)
}

/// Output header in canonical order: fixed, sizes, total, trailing.
///
/// Names repeated across the fixed/trailing lists are emitted once.
pub fn plan_output_columns(options: &SpecPivotOptions) -> Vec<String> {
    let mut set_seen = HashSet::new();
    options
        .cols_fixed
        .iter()
        .map(String::as_str)
        .chain(options.sizes_canonical())
        .chain(std::iter::once(options.col_total.as_str()))
        .chain(options.cols_trailing.iter().map(String::as_str))
        .filter(|c_name| set_seen.insert(*c_name))
        .map(ToString::to_string)
        .collect()
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region TaxonomyLookup

/// Size label lookup precomputed once per pivot call.
#[derive(Debug, Clone)]
pub struct SpecSizeLookup {
    /// Label -> canonical size column index.
    pub dict_idx_size_by_label: HashMap<String, usize>,
    /// Canonical size column index -> owning group index.
    pub l_idx_group_by_size: Vec<usize>,
}

impl SpecSizeLookup {
    /// Build from the option taxonomy.
    pub fn new(options: &SpecPivotOptions) -> Self {
        let mut dict_idx_size_by_label = HashMap::new();
        let mut l_idx_group_by_size = Vec::new();
        for (n_idx_group, group) in options.size_groups.iter().enumerate() {
            for label in &group.sizes {
                dict_idx_size_by_label.insert(label.clone(), l_idx_group_by_size.len());
                l_idx_group_by_size.push(n_idx_group);
            }
        }
        Self {
            dict_idx_size_by_label,
            l_idx_group_by_size,
        }
    }

    /// `(size column index, group index)` for a label.
    pub fn locate(&self, label: &str) -> Option<(usize, usize)> {
        self.dict_idx_size_by_label
            .get(label)
            .map(|n_idx_size| (*n_idx_size, self.l_idx_group_by_size[*n_idx_size]))
    }

    /// Number of size columns.
    pub fn len(&self) -> usize {
        self.l_idx_group_by_size.len()
    }

    /// `true` for an empty taxonomy.
    pub fn is_empty(&self) -> bool {
        self.l_idx_group_by_size.is_empty()
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region CellValueConversion

/// Convert a key cell to a group key component; `None` for null/empty cells.
pub fn derive_key_value(value: AnyValue<'_>) -> Option<EnumKeyValue> {
    if let Some(n_value) = derive_f64_from_numeric(&value) {
        return if n_value.is_nan() {
            None
        } else {
            Some(EnumKeyValue::Number(n_value))
        };
    }
    match value {
        AnyValue::Null => None,
        AnyValue::String(val) if val.is_empty() => None,
        AnyValue::String(val) => Some(EnumKeyValue::Text(val.to_string())),
        AnyValue::StringOwned(val) if val.is_empty() => None,
        AnyValue::StringOwned(val) => Some(EnumKeyValue::Text(val.to_string())),
        AnyValue::Boolean(val) => Some(EnumKeyValue::Text(
            if val { "True" } else { "False" }.to_string(),
        )),
        _ => Some(EnumKeyValue::Text(value.to_string())),
    }
}

/// Render a size cell as a trimmed label; `None` for null/blank cells.
pub fn derive_size_label(value: AnyValue<'_>) -> Option<String> {
    if let Some(n_value) = derive_f64_from_numeric(&value) {
        return Some(EnumKeyValue::Number(n_value).to_string());
    }
    let c_label = match value {
        AnyValue::Null => return None,
        AnyValue::String(val) => val.trim().to_string(),
        AnyValue::StringOwned(val) => val.trim().to_string(),
        _ => value.to_string().trim().to_string(),
    };
    if c_label.is_empty() {
        None
    } else {
        Some(c_label)
    }
}

/// Parse a quantity cell; null, NaN and blank text count as zero.
///
/// Returns the offending cell text when the value is not numeric.
pub fn parse_quantity(value: AnyValue<'_>) -> Result<f64, String> {
    if let Some(n_value) = derive_f64_from_numeric(&value) {
        return Ok(if n_value.is_nan() { 0.0 } else { n_value });
    }
    let c_text = match value {
        AnyValue::Null => return Ok(0.0),
        AnyValue::String(val) => val.to_string(),
        AnyValue::StringOwned(val) => val.to_string(),
        _ => return Err(value.to_string()),
    };
    let c_trimmed = c_text.trim();
    if c_trimmed.is_empty() {
        return Ok(0.0);
    }
    match c_trimmed.parse::<f64>() {
        Ok(n_value) if n_value.is_finite() => Ok(n_value),
        _ => Err(c_text),
    }
}

fn derive_f64_from_numeric(value: &AnyValue<'_>) -> Option<f64> {
    match value {
        AnyValue::UInt8(val) => Some(*val as f64),
        AnyValue::UInt16(val) => Some(*val as f64),
        AnyValue::UInt32(val) => Some(*val as f64),
        AnyValue::UInt64(val) => Some(*val as f64),
        AnyValue::Int8(val) => Some(*val as f64),
        AnyValue::Int16(val) => Some(*val as f64),
        AnyValue::Int32(val) => Some(*val as f64),
        AnyValue::Int64(val) => Some(*val as f64),
        AnyValue::Float32(val) => Some(*val as f64),
        AnyValue::Float64(val) => Some(*val),
        _ => None,
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
