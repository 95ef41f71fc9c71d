//! Size-group pivot of BD BNN order lines.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use log::{debug, info};
use polars::prelude::{Column, DataFrame, IdxCa, IdxSize, PlSmallStr};

use crate::spec::{EnumKeyValue, PivotError, ReportPivot, ResultPivot, SpecPivotOptions};
use crate::util::{
    SpecSizeLookup, derive_ambiguous_column_warnings, derive_key_value, derive_size_label,
    normalize_header_names, parse_quantity, resolve_column_name, resolve_required_columns,
};

/// One input row that landed in a size group.
#[derive(Debug, Clone, Copy)]
struct SpecCountedRow {
    row_idx: usize,
    idx_size: usize,
    idx_group: usize,
    quantity: f64,
}

/// Column-major accumulator for output rows.
#[derive(Debug, Default)]
struct SpecPivotColumns {
    l_rows_source: Vec<IdxSize>,
    l_values_by_size: Vec<Vec<Option<f64>>>,
    l_totals: Vec<Option<f64>>,
}

/// Pivot `df` and return only the table.
///
/// See [`pivot_table_with_report`].
pub fn pivot_table(df: &DataFrame, options: &SpecPivotOptions) -> Result<DataFrame, PivotError> {
    Ok(pivot_table_with_report(df, options)?.df)
}

/// Pivot order lines into one row per `(PO, Color)` per non-empty size group.
///
/// Output columns are, in order: `options.cols_fixed`, every size label of
/// every group, `options.col_total`, `options.cols_trailing`. Attribute values
/// come from the first row of each `(PO, Color, group)` subset; attribute
/// columns absent from the input are filled with empty strings.
///
/// A size cell holds the summed quantity for that label when the sum is
/// positive and is null otherwise; labels of other groups are always null.
/// A row is emitted whenever its subset is non-empty, even if every sum is
/// zero.
///
/// An input without rows yields an empty table (no columns) and no error.
pub fn pivot_table_with_report(
    df: &DataFrame,
    options: &SpecPivotOptions,
) -> Result<ResultPivot, PivotError> {
    options.validate()?;

    let mut report = ReportPivot {
        cnt_rows_input: df.height() as u64,
        ..Default::default()
    };
    if df.height() == 0 {
        debug!("Input table has no rows; nothing to pivot.");
        return Ok(ResultPivot {
            df: DataFrame::empty(),
            report,
        });
    }

    let df_input = normalize_header_names(df, options, &mut report)?;
    let l_colnames: Vec<String> = df_input
        .get_column_names_str()
        .into_iter()
        .map(ToString::to_string)
        .collect();
    let required = resolve_required_columns(&l_colnames, options)?;
    for c_warning in derive_ambiguous_column_warnings(&l_colnames, options) {
        report.warn(c_warning);
    }

    let col_po = df_input.column(&required.col_po)?;
    let col_color = df_input.column(&required.col_color)?;
    let col_size = df_input.column(&required.col_size)?;
    let col_quantity = df_input.column(&required.col_quantity)?;

    let lookup = SpecSizeLookup::new(options);
    let mut dict_groups: BTreeMap<(EnumKeyValue, EnumKeyValue), Vec<SpecCountedRow>> =
        BTreeMap::new();
    let mut set_sizes_unmatched: BTreeSet<String> = BTreeSet::new();
    let mut if_quantities_integral = true;

    for row_idx in 0..df_input.height() {
        let (Some(key_po), Some(key_color)) = (
            derive_key_value(col_po.get(row_idx)?),
            derive_key_value(col_color.get(row_idx)?),
        ) else {
            report.cnt_rows_null_key += 1;
            continue;
        };

        let label = derive_size_label(col_size.get(row_idx)?);
        let Some((idx_size, idx_group)) = label.as_deref().and_then(|c| lookup.locate(c)) else {
            report.cnt_rows_unmatched_size += 1;
            if let Some(label) = label {
                set_sizes_unmatched.insert(label);
            }
            continue;
        };

        let quantity = parse_quantity(col_quantity.get(row_idx)?).map_err(|value| {
            PivotError::MalformedInput {
                row_idx,
                column: required.col_quantity.clone(),
                value,
            }
        })?;
        if_quantities_integral &= quantity.fract() == 0.0;

        report.cnt_rows_counted += 1;
        dict_groups
            .entry((key_po, key_color))
            .or_default()
            .push(SpecCountedRow {
                row_idx,
                idx_size,
                idx_group,
                quantity,
            });
    }
    report.cnt_groups = dict_groups.len() as u64;

    if report.cnt_rows_null_key > 0 {
        report.warn(format!(
            "{} row(s) skipped: missing {:?} or {:?}.",
            report.cnt_rows_null_key, required.col_po, required.col_color
        ));
    }
    if !set_sizes_unmatched.is_empty() {
        report.warn(format!(
            "Size label(s) outside every size group ignored: {}",
            set_sizes_unmatched
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        ));
    }

    let l_cols_attribute: Vec<(&str, Option<&Column>)> = options
        .cols_fixed
        .iter()
        .chain(options.cols_trailing.iter())
        .map(|c_name| {
            let col = resolve_column_name(&l_colnames, c_name).and_then(|c| df_input.column(c).ok());
            (c_name.as_str(), col)
        })
        .collect();

    let mut accum = SpecPivotColumns {
        l_values_by_size: vec![Vec::new(); lookup.len()],
        ..Default::default()
    };
    let mut l_sums = vec![0.0f64; lookup.len()];

    for ((key_po, key_color), l_rows) in &dict_groups {
        for (idx_group, group) in options.size_groups.iter().enumerate() {
            let l_subset: Vec<&SpecCountedRow> =
                l_rows.iter().filter(|row| row.idx_group == idx_group).collect();
            let Some(row_first) = l_subset.first() else {
                continue;
            };

            if options.if_check_consistent_attributes {
                validate_consistent_attributes(&l_subset, &l_cols_attribute, key_po, key_color)?;
            }

            l_sums.fill(0.0);
            for row in &l_subset {
                l_sums[row.idx_size] += row.quantity;
            }

            let mut n_total = 0.0;
            for (idx_size, l_values) in accum.l_values_by_size.iter_mut().enumerate() {
                let n_sum = l_sums[idx_size];
                if lookup.l_idx_group_by_size[idx_size] == idx_group && n_sum > 0.0 {
                    n_total += n_sum;
                    l_values.push(Some(n_sum));
                } else {
                    l_values.push(None);
                }
            }
            accum.l_totals.push((n_total > 0.0).then_some(n_total));
            accum.l_rows_source.push(row_first.row_idx as IdxSize);

            debug!(
                "PO {key_po} / color {key_color} / {}: {} line(s), total {n_total}",
                group.name,
                l_subset.len()
            );
        }
    }

    report.cnt_rows_output = accum.l_rows_source.len() as u64;
    if accum.l_rows_source.is_empty() {
        info!("No processed data generated.");
        return Ok(ResultPivot {
            df: DataFrame::empty(),
            report,
        });
    }

    let df_output = build_output_frame(accum, options, &l_cols_attribute, if_quantities_integral)?;
    info!("Processing completed: {} rows generated", df_output.height());
    Ok(ResultPivot {
        df: df_output,
        report,
    })
}

fn build_output_frame(
    accum: SpecPivotColumns,
    options: &SpecPivotOptions,
    l_cols_attribute: &[(&str, Option<&Column>)],
    if_quantities_integral: bool,
) -> Result<DataFrame, PivotError> {
    let n_rows = accum.l_rows_source.len();
    let idx_rows_source = IdxCa::from_vec(PlSmallStr::EMPTY, accum.l_rows_source);

    let build_attribute = |c_name: &str| -> Result<Column, PivotError> {
        let col_source = l_cols_attribute
            .iter()
            .find(|(c_attr, _)| *c_attr == c_name)
            .and_then(|(_, col)| *col);
        match col_source {
            Some(col) => {
                let mut col_out = col.take(&idx_rows_source)?;
                col_out.rename(PlSmallStr::from(c_name));
                Ok(col_out)
            }
            None => Ok(Column::new(PlSmallStr::from(c_name), vec![""; n_rows])),
        }
    };
    let build_quantity = |c_name: &str, l_values: Vec<Option<f64>>| -> Column {
        if if_quantities_integral {
            let l_values: Vec<Option<i64>> =
                l_values.into_iter().map(|v| v.map(|n| n as i64)).collect();
            Column::new(PlSmallStr::from(c_name), l_values)
        } else {
            Column::new(PlSmallStr::from(c_name), l_values)
        }
    };

    let mut set_seen: HashSet<&str> = HashSet::new();
    let mut l_columns: Vec<Column> = Vec::new();

    for c_name in &options.cols_fixed {
        if set_seen.insert(c_name.as_str()) {
            l_columns.push(build_attribute(c_name)?);
        }
    }
    for (c_name, l_values) in options.sizes_canonical().into_iter().zip(accum.l_values_by_size) {
        set_seen.insert(c_name);
        l_columns.push(build_quantity(c_name, l_values));
    }
    set_seen.insert(options.col_total.as_str());
    l_columns.push(build_quantity(&options.col_total, accum.l_totals));
    for c_name in &options.cols_trailing {
        if set_seen.insert(c_name.as_str()) {
            l_columns.push(build_attribute(c_name)?);
        }
    }

    Ok(DataFrame::new(l_columns)?)
}

fn validate_consistent_attributes(
    l_subset: &[&SpecCountedRow],
    l_cols_attribute: &[(&str, Option<&Column>)],
    key_po: &EnumKeyValue,
    key_color: &EnumKeyValue,
) -> Result<(), PivotError> {
    let Some((row_first, l_rest)) = l_subset.split_first() else {
        return Ok(());
    };
    for (c_name, col) in l_cols_attribute {
        let Some(col) = col else {
            continue;
        };
        let value_first = col.get(row_first.row_idx)?;
        for row in l_rest {
            if col.get(row.row_idx)? != value_first {
                return Err(PivotError::InconsistentAttributes {
                    column: (*c_name).to_string(),
                    po: key_po.to_string(),
                    color: key_color.to_string(),
                    row_idx_first: row_first.row_idx,
                    row_idx: row.row_idx,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use polars::prelude::AnyValue;

    use super::*;
    use crate::util::plan_output_columns;

    struct SpecLine<'a> {
        po: i64,
        color: &'a str,
        size: &'a str,
        qty: i64,
    }

    fn line<'a>(po: i64, color: &'a str, size: &'a str, qty: i64) -> SpecLine<'a> {
        SpecLine {
            po,
            color,
            size,
            qty,
        }
    }

    fn create_frame(lines: &[SpecLine<'_>]) -> DataFrame {
        DataFrame::new(vec![
            Column::new(
                "Vendor".into(),
                lines.iter().map(|_| "ACME").collect::<Vec<_>>(),
            ),
            Column::new("PO #".into(), lines.iter().map(|l| l.po).collect::<Vec<_>>()),
            Column::new(
                "Color Code".into(),
                lines.iter().map(|l| l.color).collect::<Vec<_>>(),
            ),
            Column::new("Size".into(), lines.iter().map(|l| l.size).collect::<Vec<_>>()),
            Column::new(
                "Ordered Item Quantity".into(),
                lines.iter().map(|l| l.qty).collect::<Vec<_>>(),
            ),
            Column::new(
                "Gap Sku".into(),
                (0..lines.len())
                    .map(|i| format!("SKU{i}"))
                    .collect::<Vec<_>>(),
            ),
        ])
        .unwrap()
    }

    fn cell_i64(df: &DataFrame, column: &str, row_idx: usize) -> Option<i64> {
        match df.column(column).unwrap().get(row_idx).unwrap() {
            AnyValue::Null => None,
            AnyValue::Int64(val) => Some(val),
            other => panic!("unexpected value in {column}: {other:?}"),
        }
    }

    fn cell_text(df: &DataFrame, column: &str, row_idx: usize) -> String {
        match df.column(column).unwrap().get(row_idx).unwrap() {
            AnyValue::String(val) => val.to_string(),
            AnyValue::StringOwned(val) => val.to_string(),
            AnyValue::Int64(val) => val.to_string(),
            other => panic!("unexpected value in {column}: {other:?}"),
        }
    }

    #[test]
    fn two_sizes_of_one_group_share_a_row() {
        let df = create_frame(&[line(100, "BLK", "M", 5), line(100, "BLK", "S", 3)]);
        let options = SpecPivotOptions::default();

        let df_out = pivot_table(&df, &options).unwrap();
        assert_eq!(df_out.height(), 1);
        assert_eq!(cell_i64(&df_out, "M", 0), Some(5));
        assert_eq!(cell_i64(&df_out, "S", 0), Some(3));
        assert_eq!(cell_i64(&df_out, "TT", 0), Some(8));
        for label in options.sizes_canonical() {
            if label != "M" && label != "S" {
                assert_eq!(cell_i64(&df_out, label, 0), None, "size {label}");
            }
        }
        assert_eq!(cell_text(&df_out, "PO #", 0), "100");
        assert_eq!(cell_text(&df_out, "Vendor", 0), "ACME");
    }

    #[test]
    fn zero_quantity_subset_still_emits_row() {
        let df = create_frame(&[line(200, "RED", "LT", 0)]);

        let result = pivot_table_with_report(&df, &SpecPivotOptions::default()).unwrap();
        assert_eq!(result.df.height(), 1);
        assert_eq!(cell_i64(&result.df, "LT", 0), None);
        assert_eq!(cell_i64(&result.df, "TT", 0), None);
        assert_eq!(cell_text(&result.df, "Color Code", 0), "RED");
        assert_eq!(result.report.cnt_rows_output, 1);
    }

    #[test]
    fn unknown_size_emits_nothing() {
        let df = create_frame(&[line(300, "BLU", "ZZZ", 9)]);

        let result = pivot_table_with_report(&df, &SpecPivotOptions::default()).unwrap();
        assert!(result.is_empty());
        assert_eq!(result.df.width(), 0);
        assert_eq!(result.report.cnt_rows_unmatched_size, 1);
        assert_eq!(result.report.cnt_groups, 0);
        assert!(result.report.warnings[0].contains("ZZZ"));
    }

    #[test]
    fn empty_input_is_not_an_error() {
        let df = DataFrame::empty();
        let result = pivot_table_with_report(&df, &SpecPivotOptions::default()).unwrap();
        assert!(result.is_empty());
        assert_eq!(result.df.width(), 0);

        let df = create_frame(&[]);
        assert_eq!(pivot_table(&df, &SpecPivotOptions::default()).unwrap().height(), 0);
    }

    #[test]
    fn one_row_per_non_empty_size_group_in_declaration_order() {
        let df = create_frame(&[
            line(100, "BLK", "XL/T", 4),
            line(100, "BLK", "SP", 2),
            line(100, "BLK", "M", 1),
            line(100, "BLK", "MP", 6),
        ]);
        let options = SpecPivotOptions::default();

        let df_out = pivot_table(&df, &options).unwrap();
        assert_eq!(df_out.height(), 3);

        // Grp A, Grp B, Grp D
        assert_eq!(cell_i64(&df_out, "M", 0), Some(1));
        assert_eq!(cell_i64(&df_out, "TT", 0), Some(1));
        assert_eq!(cell_i64(&df_out, "SP", 1), Some(2));
        assert_eq!(cell_i64(&df_out, "MP", 1), Some(6));
        assert_eq!(cell_i64(&df_out, "TT", 1), Some(8));
        assert_eq!(cell_i64(&df_out, "XL/T", 2), Some(4));
        assert_eq!(cell_i64(&df_out, "TT", 2), Some(4));

        // Attributes come from the first row of each subset.
        assert_eq!(cell_text(&df_out, "Gap Sku", 0), "SKU2");
        assert_eq!(cell_text(&df_out, "Gap Sku", 1), "SKU1");
        assert_eq!(cell_text(&df_out, "Gap Sku", 2), "SKU0");

        // Group exclusivity.
        let lookup = SpecSizeLookup::new(&options);
        for (row_idx, idx_group) in [(0usize, 0usize), (1, 1), (2, 3)] {
            for label in options.sizes_canonical() {
                let (_, idx_group_label) = lookup.locate(label).unwrap();
                if idx_group_label != idx_group {
                    assert_eq!(cell_i64(&df_out, label, row_idx), None);
                }
            }
        }
    }

    #[test]
    fn duplicate_sizes_are_summed_and_negative_sums_render_empty() {
        let df = create_frame(&[
            line(100, "BLK", "M", 5),
            line(100, "BLK", "M", 7),
            line(100, "BLK", "L", -3),
            line(100, "BLK", "XL", 3),
            line(100, "BLK", "XL", -3),
        ]);

        let df_out = pivot_table(&df, &SpecPivotOptions::default()).unwrap();
        assert_eq!(df_out.height(), 1);
        assert_eq!(cell_i64(&df_out, "M", 0), Some(12));
        assert_eq!(cell_i64(&df_out, "L", 0), None);
        assert_eq!(cell_i64(&df_out, "XL", 0), None);
        assert_eq!(cell_i64(&df_out, "TT", 0), Some(12));
    }

    #[test]
    fn groups_are_sorted_by_key_and_every_pair_is_present() {
        let df = create_frame(&[
            line(300, "RED", "S", 1),
            line(100, "WHT", "S", 1),
            line(100, "BLK", "S", 1),
            line(200, "BLK", "ZZZ", 1),
        ]);

        let result = pivot_table_with_report(&df, &SpecPivotOptions::default()).unwrap();
        let df_out = result.df;
        assert_eq!(df_out.height(), 3);
        let l_keys: Vec<(String, String)> = (0..df_out.height())
            .map(|i| (cell_text(&df_out, "PO #", i), cell_text(&df_out, "Color Code", i)))
            .collect();
        assert_eq!(
            l_keys,
            vec![
                ("100".to_string(), "BLK".to_string()),
                ("100".to_string(), "WHT".to_string()),
                ("300".to_string(), "RED".to_string()),
            ]
        );
        assert_eq!(result.report.cnt_groups, 3);
        assert!(df_out.height() as u64 <= 4 * result.report.cnt_groups);
    }

    #[test]
    fn output_columns_follow_canonical_order_and_missing_attributes_are_blank() {
        let df = create_frame(&[line(100, "BLK", "M", 5)]);
        let options = SpecPivotOptions::default();

        let df_out = pivot_table(&df, &options).unwrap();
        let l_names: Vec<String> = df_out
            .get_column_names_str()
            .into_iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(l_names, plan_output_columns(&options));
        assert_eq!(cell_text(&df_out, "Order Class", 0), "");
        assert_eq!(cell_text(&df_out, "Final Destination", 0), "");
    }

    #[test]
    fn headers_are_trimmed_before_lookup() {
        let df = DataFrame::new(vec![
            Column::new(" PO # ".into(), vec![1i64]),
            Column::new("Color Code ".into(), vec!["BLK"]),
            Column::new(" Size".into(), vec!["XS"]),
            Column::new("Ordered Item Quantity\t".into(), vec![2i64]),
        ])
        .unwrap();

        let df_out = pivot_table(&df, &SpecPivotOptions::default()).unwrap();
        assert_eq!(cell_i64(&df_out, "XS", 0), Some(2));
    }

    #[test]
    fn missing_required_column_aborts() {
        let df = DataFrame::new(vec![
            Column::new("PO #".into(), vec![1i64]),
            Column::new("Size".into(), vec!["XS"]),
        ])
        .unwrap();

        let err = pivot_table(&df, &SpecPivotOptions::default()).unwrap_err();
        match err {
            PivotError::MissingRequiredInput { columns } => {
                assert_eq!(
                    columns,
                    vec!["Color Code".to_string(), "Ordered Item Quantity".to_string()]
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_numeric_quantity_aborts_with_row_context() {
        let df = DataFrame::new(vec![
            Column::new("PO #".into(), vec![1i64, 1, 2]),
            Column::new("Color Code".into(), vec!["BLK", "BLK", "RED"]),
            Column::new("Size".into(), vec!["XS", "ZZZ", "S"]),
            Column::new("Ordered Item Quantity".into(), vec!["2", "n/a", "lots"]),
        ])
        .unwrap();

        let err = pivot_table(&df, &SpecPivotOptions::default()).unwrap_err();
        match err {
            PivotError::MalformedInput {
                row_idx,
                column,
                value,
            } => {
                assert_eq!(row_idx, 2);
                assert_eq!(column, "Ordered Item Quantity");
                assert_eq!(value, "lots");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn fractional_quantities_produce_float_columns() {
        let df = DataFrame::new(vec![
            Column::new("PO #".into(), vec![1i64, 1]),
            Column::new("Color Code".into(), vec!["BLK", "BLK"]),
            Column::new("Size".into(), vec!["XS", "S"]),
            Column::new("Ordered Item Quantity".into(), vec![1.5f64, 2.0]),
        ])
        .unwrap();

        let df_out = pivot_table(&df, &SpecPivotOptions::default()).unwrap();
        assert_eq!(
            df_out.column("TT").unwrap().get(0).unwrap(),
            AnyValue::Float64(3.5)
        );
    }

    #[test]
    fn null_keys_are_skipped_and_reported() {
        let df = DataFrame::new(vec![
            Column::new("PO #".into(), vec![Some(1i64), None]),
            Column::new("Color Code".into(), vec!["BLK", "BLK"]),
            Column::new("Size".into(), vec!["XS", "S"]),
            Column::new("Ordered Item Quantity".into(), vec![1i64, 2]),
        ])
        .unwrap();

        let result = pivot_table_with_report(&df, &SpecPivotOptions::default()).unwrap();
        assert_eq!(result.df.height(), 1);
        assert_eq!(cell_i64(&result.df, "S", 0), None);
        assert_eq!(result.report.cnt_rows_null_key, 1);
    }

    #[test]
    fn consistency_check_flags_diverging_attributes() {
        let df = DataFrame::new(vec![
            Column::new("PO #".into(), vec![1i64, 1]),
            Column::new("Color Code".into(), vec!["BLK", "BLK"]),
            Column::new("Size".into(), vec!["XS", "S"]),
            Column::new("Ordered Item Quantity".into(), vec![1i64, 2]),
            Column::new("Vendor".into(), vec!["ACME", "OTHER"]),
        ])
        .unwrap();

        let mut options = SpecPivotOptions::default();
        let df_out = pivot_table(&df, &options).unwrap();
        assert_eq!(cell_text(&df_out, "Vendor", 0), "ACME");

        options.if_check_consistent_attributes = true;
        let err = pivot_table(&df, &options).unwrap_err();
        match err {
            PivotError::InconsistentAttributes {
                column,
                row_idx_first,
                row_idx,
                ..
            } => {
                assert_eq!(column, "Vendor");
                assert_eq!((row_idx_first, row_idx), (0, 1));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn custom_taxonomy_is_honored() {
        let df = create_frame(&[line(1, "BLK", "A1", 2), line(1, "BLK", "B1", 3)]);
        let mut options = SpecPivotOptions::default();
        options.size_groups = vec![
            crate::spec::SpecSizeGroup {
                name: "Alpha".to_string(),
                sizes: vec!["A1".to_string(), "A2".to_string()],
            },
            crate::spec::SpecSizeGroup {
                name: "Beta".to_string(),
                sizes: vec!["B1".to_string()],
            },
        ];
        options.col_total = "TOTAL".to_string();

        let df_out = pivot_table(&df, &options).unwrap();
        assert_eq!(df_out.height(), 2);
        assert_eq!(cell_i64(&df_out, "A1", 0), Some(2));
        assert_eq!(cell_i64(&df_out, "B1", 0), None);
        assert_eq!(cell_i64(&df_out, "B1", 1), Some(3));
        assert_eq!(cell_i64(&df_out, "TOTAL", 1), Some(3));
    }

    #[test]
    fn unread_columns_colliding_after_trim_do_not_abort() {
        let df = DataFrame::new(vec![
            Column::new("PO #".into(), vec![1i64]),
            Column::new("Color Code".into(), vec!["BLK"]),
            Column::new("Size".into(), vec!["M"]),
            Column::new("Ordered Item Quantity".into(), vec![5i64]),
            Column::new("Notes".into(), vec!["first"]),
            Column::new("Notes ".into(), vec!["second"]),
        ])
        .unwrap();

        let result = pivot_table_with_report(&df, &SpecPivotOptions::default()).unwrap();
        assert_eq!(result.df.height(), 1);
        assert_eq!(cell_i64(&result.df, "TT", 0), Some(5));
        assert_eq!(result.report.warnings.len(), 1);
        assert!(result.report.warnings[0].contains("Notes"));
    }

    #[test]
    fn read_columns_colliding_after_trim_are_rejected() {
        let df = DataFrame::new(vec![
            Column::new("PO #".into(), vec![1i64]),
            Column::new("Color Code".into(), vec!["BLK"]),
            Column::new("Size".into(), vec!["M"]),
            Column::new("Size ".into(), vec!["L"]),
            Column::new("Ordered Item Quantity".into(), vec![5i64]),
        ])
        .unwrap();

        let err = pivot_table(&df, &SpecPivotOptions::default()).unwrap_err();
        assert!(matches!(err, PivotError::DuplicateColumns { .. }));
    }

    #[test]
    fn case_only_header_variants_warn_and_use_first() {
        let df = DataFrame::new(vec![
            Column::new("PO #".into(), vec![1i64]),
            Column::new("Color Code".into(), vec!["BLK"]),
            Column::new("size".into(), vec!["M"]),
            Column::new("SIZE".into(), vec!["LT"]),
            Column::new("Ordered Item Quantity".into(), vec![5i64]),
        ])
        .unwrap();

        let result = pivot_table_with_report(&df, &SpecPivotOptions::default()).unwrap();
        assert_eq!(result.df.height(), 1);
        assert_eq!(cell_i64(&result.df, "M", 0), Some(5));
        assert_eq!(result.report.warnings.len(), 1);
        assert!(result.report.warnings[0].contains("ignoring case"));
    }
}
