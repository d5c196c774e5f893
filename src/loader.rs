//! Dataset loading: a well-known default file first, then an uploaded byte
//! buffer decoded through a fixed encoding fallback chain.

use std::{fs, path::Path};

use anyhow::Result;
use encoding_rs::{EUC_KR, Encoding, SHIFT_JIS, UTF_8, WINDOWS_1252};
use log::debug;

use crate::{error::PipelineError, io_utils};

/// Well-known dataset filename checked in the working directory before any
/// upload is considered.
pub const DEFAULT_DATA_FILE: &str = "countriesMBTI_16types.csv";

/// Encodings tried for uploaded bytes, in priority order. windows-1252 sits
/// last because it accepts any byte sequence.
static FALLBACK_ENCODINGS: [&Encoding; 4] = [UTF_8, SHIFT_JIS, EUC_KR, WINDOWS_1252];

/// An in-memory table: header row plus data rows, all cells as raw strings.
/// Immutable once loaded; downstream stages work on derived copies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Dataset {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Loads the dataset. The default path wins when it exists (and any failure
/// reading it is terminal, no fallback); otherwise the upload buffer is
/// decoded through the encoding chain; otherwise the caller is still waiting
/// for input.
pub fn load(default_path: &Path, upload: Option<&[u8]>) -> Result<Dataset> {
    if default_path.exists() {
        return from_path(default_path);
    }
    match upload {
        Some(bytes) => from_bytes(bytes),
        None => Err(PipelineError::NoInput.into()),
    }
}

/// Parses the default on-disk file as UTF-8 CSV. Errors are terminal for the
/// invocation.
pub fn from_path(path: &Path) -> Result<Dataset> {
    let bytes = fs::read(path)
        .map_err(|err| PipelineError::DataLoad(format!("reading {path:?}: {err}")))?;
    let text = io_utils::decode_bytes(&bytes, UTF_8)
        .map_err(|err| PipelineError::DataLoad(format!("decoding {path:?}: {err}")))?;
    parse_csv(&text).map_err(|err| PipelineError::DataLoad(format!("parsing {path:?}: {err}")).into())
}

/// Decodes and parses an uploaded byte buffer, trying each encoding in
/// priority order. A parse failure under one encoding abandons that attempt
/// entirely and moves on; the first full decode+parse success wins.
pub fn from_bytes(bytes: &[u8]) -> Result<Dataset> {
    for encoding in FALLBACK_ENCODINGS {
        let text = match io_utils::decode_bytes(bytes, encoding) {
            Ok(text) => text,
            Err(_) => {
                debug!("Upload does not decode as {}", encoding.name());
                continue;
            }
        };
        match parse_csv(&text) {
            Ok(dataset) => {
                debug!(
                    "Upload decoded as {} ({} row(s))",
                    encoding.name(),
                    dataset.row_count()
                );
                return Ok(dataset);
            }
            Err(err) => {
                debug!("Upload decoded as {} but failed to parse: {err}", encoding.name());
            }
        }
    }
    Err(PipelineError::DataLoad("no encoding in the fallback chain produced valid CSV".to_string()).into())
}

fn parse_csv(text: &str) -> Result<Dataset> {
    let mut reader =
        io_utils::open_csv_reader(text.as_bytes(), io_utils::DEFAULT_CSV_DELIMITER, true);
    let headers = reader
        .headers()?
        .iter()
        .map(|h| h.to_string())
        .collect::<Vec<_>>();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(|field| field.to_string()).collect());
    }
    Ok(Dataset { headers, rows })
}
