use thiserror::Error;

/// Terminal conditions of the load → detect → normalize → rank pipeline.
///
/// Per-cell numeric coercion failures are intentionally *not* represented
/// here; they become missing values instead of errors.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// No default dataset on disk and no uploaded bytes. Recoverable by user
    /// action (supply an input), not a defect.
    #[error("no input available: place countriesMBTI_16types.csv in the working directory or pass --input")]
    NoInput,
    /// An input was present but no encoding produced valid CSV.
    #[error("failed to load CSV data: {0}")]
    DataLoad(String),
    /// None of the 16 MBTI type codes matched a column header.
    #[error("no MBTI columns detected; expected headers named after the 16 type codes (INTJ, INFP, ...)")]
    Schema,
    /// The selected type is not among the detected MBTI columns.
    #[error("MBTI type '{0}' is not present in the dataset")]
    MissingType(String),
}
