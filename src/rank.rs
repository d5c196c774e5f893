//! Top-N ranking of countries by normalized share of one MBTI type.

use anyhow::Result;

use crate::{error::PipelineError, normalize::NormalizedTable, schema::TableSchema};

pub const DEFAULT_TOP: usize = 10;

/// One ranked entry. `percent` is `share * 100` rounded to two decimals,
/// half away from zero.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedRow {
    pub country: String,
    pub share: f64,
    pub percent: f64,
}

/// Projects (country, share) pairs for `code`, drops missing shares, sorts
/// descending with ties keeping original row order, and truncates to `top`.
/// Pure function of its inputs; the selected code must be among the detected
/// MBTI columns.
pub fn rank(
    table: &NormalizedTable,
    schema: &TableSchema,
    code: &str,
    top: usize,
) -> Result<Vec<RankedRow>> {
    let position = schema
        .mbti_position(code)
        .ok_or_else(|| PipelineError::MissingType(code.to_string()))?;

    let mut pairs = table
        .countries
        .iter()
        .zip(&table.shares)
        .filter_map(|(country, shares)| {
            shares
                .get(position)
                .copied()
                .flatten()
                .map(|share| (country.clone(), share))
        })
        .collect::<Vec<_>>();

    // Stable sort keeps source row order for equal shares.
    pairs.sort_by(|a, b| b.1.total_cmp(&a.1));
    pairs.truncate(top);

    Ok(pairs
        .into_iter()
        .map(|(country, share)| RankedRow {
            country,
            share,
            percent: round_percent(share),
        })
        .collect())
}

fn round_percent(share: f64) -> f64 {
    (share * 10_000.0).round() / 100.0
}
