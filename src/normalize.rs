//! Numeric coercion, unit inference, and rescaling to per-row proportions.
//!
//! The input table may carry proportions (~1.0 row sum), percentages (~100
//! row sum), or raw counts. One classification is made per dataset from the
//! mean row sum, then every MBTI cell is rescaled to a share in [0,1].
//! Unparseable cells become missing values, never errors.

use serde::Serialize;

use crate::{loader::Dataset, schema::TableSchema};

/// Inferred unit of the MBTI columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Proportion,
    Percent,
    Count,
}

impl ValueKind {
    pub fn label(self) -> &'static str {
        match self {
            ValueKind::Proportion => "proportion",
            ValueKind::Percent => "percent",
            ValueKind::Count => "count",
        }
    }
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Dataset rescaled to proportions. `shares` is row-major and aligned with
/// the schema's MBTI columns; a `None` cell is missing (unparseable input or
/// an undefined zero-sum row in the count branch).
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTable {
    pub countries: Vec<String>,
    pub shares: Vec<Vec<Option<f64>>>,
}

/// Observability snapshot taken during normalization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostics {
    pub country_column: String,
    /// Detected MBTI column names, in fixed vocabulary order.
    pub mbti_columns: Vec<String>,
    /// Mean per-row sum before rescaling; `None` when every row is missing.
    pub mean_row_sum: Option<f64>,
    pub value_kind: ValueKind,
}

/// Classifies the input's unit from the mean row sum. Priority order is
/// fixed: proportion, then percent, then count. The nominal boundaries
/// (1 ± 0.05, 100 ± 5) are not exactly representable in f64, so the
/// comparison carries a one-ulp slack to keep them inclusive.
pub fn classify(mean_row_sum: Option<f64>) -> ValueKind {
    match mean_row_sum {
        Some(mean) if (mean - 1.0).abs() <= 0.05 + f64::EPSILON => ValueKind::Proportion,
        Some(mean) if (mean - 100.0).abs() <= 5.0 + f64::EPSILON => ValueKind::Percent,
        _ => ValueKind::Count,
    }
}

/// Coerces MBTI cells to numbers, infers the unit, and rescales every cell
/// to a per-row proportion. Infallible: bad cells turn into missing values.
pub fn normalize(dataset: &Dataset, schema: &TableSchema) -> (NormalizedTable, Diagnostics) {
    let countries = dataset
        .rows
        .iter()
        .map(|row| {
            row.get(schema.country.index)
                .cloned()
                .unwrap_or_default()
        })
        .collect::<Vec<_>>();

    let numeric = dataset
        .rows
        .iter()
        .map(|row| {
            schema
                .mbti
                .iter()
                .map(|col| row.get(col.index).and_then(|cell| parse_numeric(cell)))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    let row_sums = numeric.iter().map(|cells| row_sum(cells)).collect::<Vec<_>>();
    let mean_row_sum = mean(&row_sums);
    let value_kind = classify(mean_row_sum);

    let shares = numeric
        .iter()
        .zip(&row_sums)
        .map(|(cells, sum)| rescale_row(cells, *sum, value_kind))
        .collect::<Vec<_>>();

    let diagnostics = Diagnostics {
        country_column: schema.country.name.clone(),
        mbti_columns: schema.mbti.iter().map(|col| col.name.clone()).collect(),
        mean_row_sum,
        value_kind,
    };
    (NormalizedTable { countries, shares }, diagnostics)
}

fn parse_numeric(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Sum over present cells; a row with no parseable cell has no sum at all.
fn row_sum(cells: &[Option<f64>]) -> Option<f64> {
    if cells.iter().all(Option::is_none) {
        None
    } else {
        Some(cells.iter().flatten().sum())
    }
}

fn mean(sums: &[Option<f64>]) -> Option<f64> {
    let present = sums.iter().flatten().copied().collect::<Vec<_>>();
    if present.is_empty() {
        None
    } else {
        Some(present.iter().sum::<f64>() / present.len() as f64)
    }
}

fn rescale_row(cells: &[Option<f64>], sum: Option<f64>, kind: ValueKind) -> Vec<Option<f64>> {
    match kind {
        ValueKind::Proportion => cells.to_vec(),
        ValueKind::Percent => cells.iter().map(|c| c.map(|v| v / 100.0)).collect(),
        ValueKind::Count => match sum {
            // A zero row sum leaves the shares undefined rather than
            // dividing by zero.
            Some(total) if total != 0.0 => {
                cells.iter().map(|c| c.map(|v| v / total)).collect()
            }
            _ => vec![None; cells.len()],
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema;

    fn build(headers: &[&str], rows: &[&[&str]]) -> (Dataset, TableSchema) {
        let dataset = Dataset {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: rows
                .iter()
                .map(|row| row.iter().map(|c| c.to_string()).collect())
                .collect(),
        };
        let table_schema = schema::detect(&dataset).expect("schema");
        (dataset, table_schema)
    }

    #[test]
    fn classify_honors_thresholds_and_priority() {
        assert_eq!(classify(Some(1.0)), ValueKind::Proportion);
        assert_eq!(classify(Some(0.96)), ValueKind::Proportion);
        // Both boundary literals parse to values a hair outside the nominal
        // band; the inclusive comparison must still accept them.
        assert_eq!(classify(Some(1.05)), ValueKind::Proportion);
        assert_eq!(classify(Some(0.95)), ValueKind::Proportion);
        assert_eq!(classify(Some(1.06)), ValueKind::Count);
        assert_eq!(classify(Some(0.94)), ValueKind::Count);
        assert_eq!(classify(Some(100.0)), ValueKind::Percent);
        assert_eq!(classify(Some(95.0)), ValueKind::Percent);
        assert_eq!(classify(Some(105.0)), ValueKind::Percent);
        assert_eq!(classify(Some(106.0)), ValueKind::Count);
        assert_eq!(classify(Some(42.0)), ValueKind::Count);
        assert_eq!(classify(None), ValueKind::Count);
    }

    #[test]
    fn proportion_rows_pass_through_unscaled() {
        let (dataset, table_schema) = build(
            &["Country", "INFP", "INTJ"],
            &[&["Japan", "0.60", "0.41"], &["Korea", "0.55", "0.44"]],
        );
        let (table, diagnostics) = normalize(&dataset, &table_schema);
        assert_eq!(diagnostics.value_kind, ValueKind::Proportion);
        let mean = diagnostics.mean_row_sum.expect("mean");
        assert!((mean - 1.0).abs() < 1e-9);
        assert_eq!(table.shares[0], vec![Some(0.41), Some(0.60)]);
    }

    #[test]
    fn percent_rows_divide_by_one_hundred() {
        let (dataset, table_schema) = build(
            &["Country", "INFP", "INTJ"],
            &[&["Japan", "60", "40"], &["Korea", "55", "45"]],
        );
        let (table, diagnostics) = normalize(&dataset, &table_schema);
        assert_eq!(diagnostics.value_kind, ValueKind::Percent);
        assert_eq!(table.shares[0], vec![Some(0.40), Some(0.60)]);
    }

    #[test]
    fn count_rows_divide_by_their_own_sum_not_the_mean() {
        let (dataset, table_schema) = build(
            &["Country", "INFP", "INTJ"],
            &[&["Japan", "0.22", "0.05"], &["Korea", "0.30", "0.10"]],
        );
        let (table, diagnostics) = normalize(&dataset, &table_schema);
        assert_eq!(diagnostics.value_kind, ValueKind::Count);
        let infp = table_schema.mbti_position("INFP").expect("infp");
        let japan = table.shares[0][infp].expect("share");
        let korea = table.shares[1][infp].expect("share");
        assert!((japan - 0.22 / 0.27).abs() < 1e-12);
        assert!((korea - 0.75).abs() < 1e-12);
    }

    #[test]
    fn zero_sum_row_becomes_missing_in_count_branch() {
        let (dataset, table_schema) = build(
            &["Country", "INFP", "INTJ"],
            &[&["Japan", "3", "7"], &["Nowhere", "0", "0"]],
        );
        let (table, diagnostics) = normalize(&dataset, &table_schema);
        assert_eq!(diagnostics.value_kind, ValueKind::Count);
        assert_eq!(table.shares[1], vec![None, None]);
    }

    #[test]
    fn unparseable_cells_become_missing_without_erroring() {
        let (dataset, table_schema) = build(
            &["Country", "INFP", "INTJ"],
            &[&["Japan", "n/a", "0.95"], &["Korea", "0.52", "0.49"]],
        );
        let (table, _) = normalize(&dataset, &table_schema);
        let infp = table_schema.mbti_position("INFP").expect("infp");
        assert_eq!(table.shares[0][infp], None);
        assert!(table.shares[0][table_schema.mbti_position("INTJ").unwrap()].is_some());
    }

    #[test]
    fn all_missing_rows_are_excluded_from_the_mean() {
        let (dataset, table_schema) = build(
            &["Country", "INFP", "INTJ"],
            &[&["Japan", "0.6", "0.4"], &["Mystery", "?", "?"]],
        );
        let (_, diagnostics) = normalize(&dataset, &table_schema);
        // Mean is taken over the single usable row, so this stays proportion.
        let mean = diagnostics.mean_row_sum.expect("mean");
        assert!((mean - 1.0).abs() < 1e-9);
        assert_eq!(diagnostics.value_kind, ValueKind::Proportion);
    }

    #[test]
    fn fully_missing_dataset_reports_no_mean() {
        let (dataset, table_schema) = build(
            &["Country", "INFP"],
            &[&["Japan", "x"], &["Korea", ""]],
        );
        let (table, diagnostics) = normalize(&dataset, &table_schema);
        assert_eq!(diagnostics.mean_row_sum, None);
        assert_eq!(diagnostics.value_kind, ValueKind::Count);
        assert!(table.shares.iter().flatten().all(Option::is_none));
    }

    #[test]
    fn diagnostics_snapshot_serializes_with_lowercase_kind() {
        let (dataset, table_schema) = build(
            &["Country", "INFP", "INTJ"],
            &[&["Japan", "0.6", "0.4"]],
        );
        let (_, diagnostics) = normalize(&dataset, &table_schema);
        let json = serde_json::to_value(&diagnostics).expect("serialize");
        assert_eq!(json["value_kind"], "proportion");
        assert_eq!(json["country_column"], "Country");
        assert_eq!(json["mbti_columns"][0], "INTJ");
    }
}
