//! CSV export of a ranking, UTF-8 with BOM for spreadsheet compatibility.

use std::path::Path;

use anyhow::{Context, Result};

use crate::{io_utils, rank::RankedRow};

/// Default export filename for a selected type, e.g. `mbti_top10_INFP.csv`.
pub fn default_export_name(code: &str) -> String {
    format!("mbti_top10_{code}.csv")
}

/// Writes the ranking to `path`. The first header cell carries the detected
/// country column's name; `percent` keeps its two-decimal presentation.
pub fn write_ranking(path: &Path, country_column: &str, ranking: &[RankedRow]) -> Result<()> {
    let mut writer = io_utils::open_bom_csv_writer(path)?;
    writer
        .write_record([country_column, "share", "percent"])
        .with_context(|| format!("Writing header to {path:?}"))?;
    for row in ranking {
        let share = row.share.to_string();
        let percent = format!("{:.2}", row.percent);
        writer
            .write_record([row.country.as_str(), share.as_str(), percent.as_str()])
            .with_context(|| format!("Writing row for '{}' to {path:?}", row.country))?;
    }
    writer
        .flush()
        .with_context(|| format!("Flushing output file {path:?}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn default_name_follows_the_type_pattern() {
        assert_eq!(default_export_name("INFP"), "mbti_top10_INFP.csv");
    }

    #[test]
    fn export_starts_with_bom_and_country_header() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join(default_export_name("ENTP"));
        let ranking = vec![
            RankedRow {
                country: "Japan".to_string(),
                share: 0.8148148148148149,
                percent: 81.48,
            },
            RankedRow {
                country: "Korea".to_string(),
                share: 0.75,
                percent: 75.0,
            },
        ];
        write_ranking(&path, "Nation", &ranking).expect("export");

        let bytes = fs::read(&path).expect("read export");
        assert_eq!(&bytes[..3], &[0xEF, 0xBB, 0xBF]);
        let text = String::from_utf8(bytes[3..].to_vec()).expect("utf8 body");
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("Nation,share,percent"));
        assert_eq!(lines.next(), Some("Japan,0.8148148148148149,81.48"));
        assert_eq!(lines.next(), Some("Korea,0.75,75.00"));
    }
}
