//! CSV reader/writer construction and text decoding.
//!
//! All file and buffer I/O flows through this module: strict CSV readers
//! (non-flexible, so a ragged row fails the whole parse), whole-buffer
//! decoding via `encoding_rs`, and a BOM-prefixed UTF-8 writer for exports
//! aimed at spreadsheet software.

use std::{
    fs::File,
    io::{BufWriter, Read, Write},
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use csv::QuoteStyle;
use encoding_rs::Encoding;

pub const DEFAULT_CSV_DELIMITER: u8 = b',';

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

pub fn open_csv_reader<R>(reader: R, delimiter: u8, has_headers: bool) -> csv::Reader<R>
where
    R: Read,
{
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(has_headers)
        .delimiter(delimiter)
        .double_quote(true)
        .flexible(false);
    builder.from_reader(reader)
}

/// Decodes an entire byte buffer, failing if the encoding reports any
/// malformed sequence. A leading BOM is honored and stripped.
pub fn decode_bytes(bytes: &[u8], encoding: &'static Encoding) -> Result<String> {
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        Err(anyhow!(
            "Failed to decode text with encoding {}",
            encoding.name()
        ))
    } else {
        Ok(text.into_owned())
    }
}

/// Creates a CSV writer that emits UTF-8 with a byte-order mark, for
/// downstream spreadsheet compatibility.
pub fn open_bom_csv_writer(path: &Path) -> Result<csv::Writer<Box<dyn Write>>> {
    let mut file = BufWriter::new(
        File::create(path).with_context(|| format!("Creating output file {path:?}"))?,
    );
    file.write_all(UTF8_BOM)
        .with_context(|| format!("Writing BOM to {path:?}"))?;

    let mut builder = csv::WriterBuilder::new();
    builder
        .delimiter(DEFAULT_CSV_DELIMITER)
        .quote_style(QuoteStyle::Necessary)
        .double_quote(true);
    Ok(builder.from_writer(Box::new(file)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::{EUC_KR, UTF_8};

    #[test]
    fn decode_bytes_rejects_malformed_input() {
        assert!(decode_bytes(&[0x63, 0xC3, 0x28], UTF_8).is_err());
    }

    #[test]
    fn decode_bytes_strips_utf8_bom() {
        let decoded = decode_bytes(b"\xEF\xBB\xBFcountry", UTF_8).expect("decode");
        assert_eq!(decoded, "country");
    }

    #[test]
    fn decode_bytes_round_trips_euc_kr() {
        let (encoded, _, _) = EUC_KR.encode("국가");
        let decoded = decode_bytes(&encoded, EUC_KR).expect("decode");
        assert_eq!(decoded, "국가");
    }
}
