use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about = "Rank countries by MBTI type share", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Rank the top countries for a selected MBTI type
    Rank(RankArgs),
    /// Preview the first few rows of the input dataset
    Preview(PreviewArgs),
    /// Print schema detection and normalization diagnostics as JSON
    Diagnose(DiagnoseArgs),
}

#[derive(Debug, Args)]
pub struct RankArgs {
    /// MBTI type code to rank by (e.g. INFP, case-insensitive)
    #[arg(short = 't', long = "type")]
    pub mbti_type: String,
    /// Input CSV file; decoded with encoding fallback. Defaults to
    /// countriesMBTI_16types.csv in the working directory
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,
    /// Number of countries to keep
    #[arg(long, default_value_t = crate::rank::DEFAULT_TOP)]
    pub top: usize,
    /// Write the ranking to this CSV file (UTF-8 with BOM)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Write the ranking to mbti_top10_{TYPE}.csv in the working directory
    #[arg(long, conflicts_with = "output")]
    pub export: bool,
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// Input CSV file; decoded with encoding fallback. Defaults to
    /// countriesMBTI_16types.csv in the working directory
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,
    /// Number of rows to display
    #[arg(long, default_value_t = 10)]
    pub rows: usize,
}

#[derive(Debug, Args)]
pub struct DiagnoseArgs {
    /// Input CSV file; decoded with encoding fallback. Defaults to
    /// countriesMBTI_16types.csv in the working directory
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,
}
