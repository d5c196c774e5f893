//! Column-role detection: which column names the country, which columns hold
//! the sixteen MBTI type shares.

use anyhow::Result;

use crate::{error::PipelineError, loader::Dataset};

/// The fixed MBTI vocabulary. Detection order follows this list, not the
/// dataset's column order.
pub const MBTI_TYPES: [&str; 16] = [
    "INTJ", "INTP", "ENTJ", "ENTP", "INFJ", "INFP", "ENFJ", "ENFP", "ISTJ", "ISFJ", "ESTJ",
    "ESFJ", "ISTP", "ISFP", "ESTP", "ESFP",
];

/// Exact (trimmed, lowercased) country-column names, English plus Korean.
const COUNTRY_NAMES: [&str; 7] = [
    "country", "nation", "location", "region", "국가", "나라", "지역",
];

/// Substrings that also qualify a header as the country column.
const COUNTRY_SUBSTRINGS: [&str; 3] = ["country", "국가", "나라"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRef {
    pub index: usize,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MbtiColumn {
    pub index: usize,
    pub name: String,
    /// The canonical 4-letter code from [`MBTI_TYPES`].
    pub code: &'static str,
}

/// Detected column roles for one dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    pub country: ColumnRef,
    /// MBTI columns in fixed vocabulary order; non-empty by construction.
    pub mbti: Vec<MbtiColumn>,
}

impl TableSchema {
    /// Position of `code` within the detected MBTI columns, if present.
    pub fn mbti_position(&self, code: &str) -> Option<usize> {
        self.mbti.iter().position(|col| col.code == code)
    }

    pub fn mbti_codes(&self) -> Vec<&'static str> {
        self.mbti.iter().map(|col| col.code).collect()
    }
}

/// Identifies the country column and the MBTI columns. The country column
/// falls back to the first column when nothing matches; zero MBTI columns is
/// a hard stop since there is nothing to rank.
pub fn detect(dataset: &Dataset) -> Result<TableSchema> {
    let country = detect_country_column(&dataset.headers);
    let mbti = detect_mbti_columns(&dataset.headers);
    if mbti.is_empty() {
        return Err(PipelineError::Schema.into());
    }
    Ok(TableSchema { country, mbti })
}

fn detect_country_column(headers: &[String]) -> ColumnRef {
    for (index, name) in headers.iter().enumerate() {
        let lowered = name.trim().to_lowercase();
        let named = COUNTRY_NAMES.contains(&lowered.as_str());
        let substring = COUNTRY_SUBSTRINGS
            .iter()
            .any(|needle| lowered.contains(needle));
        if named || substring {
            return ColumnRef {
                index,
                name: name.clone(),
            };
        }
    }
    ColumnRef {
        index: 0,
        name: headers.first().cloned().unwrap_or_default(),
    }
}

fn detect_mbti_columns(headers: &[String]) -> Vec<MbtiColumn> {
    MBTI_TYPES
        .iter()
        .copied()
        .filter_map(|code| {
            headers
                .iter()
                .position(|name| name.trim().to_uppercase() == code)
                .map(|index| MbtiColumn {
                    index,
                    name: headers[index].clone(),
                    code,
                })
        })
        .collect()
}
