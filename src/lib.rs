pub mod cli;
pub mod error;
pub mod export;
pub mod io_utils;
pub mod loader;
pub mod normalize;
pub mod rank;
pub mod schema;
pub mod table;

use std::{
    env, fs,
    path::{Path, PathBuf},
    sync::OnceLock,
};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, info};

use crate::{
    cli::{Cli, Commands},
    loader::Dataset,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("mbti_top10", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Rank(args) => handle_rank(&args),
        Commands::Preview(args) => handle_preview(&args),
        Commands::Diagnose(args) => handle_diagnose(&args),
    }
}

fn handle_rank(args: &cli::RankArgs) -> Result<()> {
    let dataset = load_input(args.input.as_deref())?;
    let table_schema = schema::detect(&dataset)?;
    let (normalized, diagnostics) = normalize::normalize(&dataset, &table_schema);
    info!(
        "Country column '{}', {} MBTI column(s), value kind '{}'",
        diagnostics.country_column,
        diagnostics.mbti_columns.len(),
        diagnostics.value_kind
    );

    let code = args.mbti_type.trim().to_uppercase();
    let ranking = rank::rank(&normalized, &table_schema, &code, args.top)?;

    let output = if args.export {
        Some(PathBuf::from(export::default_export_name(&code)))
    } else {
        args.output.clone()
    };
    match output {
        Some(path) => {
            export::write_ranking(&path, &table_schema.country.name, &ranking)
                .with_context(|| format!("Exporting ranking to {path:?}"))?;
            info!("Wrote {} row(s) to {:?}", ranking.len(), path);
        }
        None => {
            let headers = vec![
                table_schema.country.name.clone(),
                "share".to_string(),
                "percent".to_string(),
            ];
            let rows = ranking
                .iter()
                .map(|row| {
                    vec![
                        row.country.clone(),
                        format!("{:.6}", row.share),
                        format!("{:.2}", row.percent),
                    ]
                })
                .collect::<Vec<_>>();
            table::print_table(&headers, &rows);
            info!("Ranked {} row(s) by {}", rows.len(), code);
        }
    }
    Ok(())
}

fn handle_preview(args: &cli::PreviewArgs) -> Result<()> {
    let dataset = load_input(args.input.as_deref())?;
    let rows = dataset
        .rows
        .iter()
        .take(args.rows)
        .cloned()
        .collect::<Vec<_>>();
    table::print_table(&dataset.headers, &rows);
    info!(
        "Displayed {} of {} row(s)",
        rows.len(),
        dataset.row_count()
    );
    Ok(())
}

fn handle_diagnose(args: &cli::DiagnoseArgs) -> Result<()> {
    let dataset = load_input(args.input.as_deref())?;
    let table_schema = schema::detect(&dataset)?;
    let (_, diagnostics) = normalize::normalize(&dataset, &table_schema);
    let rendered =
        serde_json::to_string_pretty(&diagnostics).context("Serializing diagnostics")?;
    println!("{rendered}");
    Ok(())
}

/// Resolves the dataset for a command: an explicit `--input` file is treated
/// as an upload (raw bytes through the encoding fallback chain), otherwise
/// the well-known default file in the working directory.
fn load_input(input: Option<&Path>) -> Result<Dataset> {
    match input {
        Some(path) => {
            let bytes =
                fs::read(path).with_context(|| format!("Reading input file {path:?}"))?;
            loader::from_bytes(&bytes)
                .with_context(|| format!("Loading uploaded CSV from {path:?}"))
        }
        None => loader::load(Path::new(loader::DEFAULT_DATA_FILE), None),
    }
}
