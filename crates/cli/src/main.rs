use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use semchunk_code_chunker::{Chunker, ChunkerConfig, ChunkingStats, LanguageRegistry};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

mod chunk;
mod scanner;

use scanner::FileScanner;

#[derive(Parser)]
#[command(name = "semchunk")]
#[command(about = "Split source files into declaration-sized chunks", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for JSON)
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Chunk files and directories, printing JSON to stdout
    Chunk(ChunkArgs),

    /// List registered languages and their chunk boundary kinds
    Languages(LanguagesArgs),
}

#[derive(Args)]
struct ChunkArgs {
    /// Files or directories to chunk
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Treat every input as this language instead of detecting by extension
    #[arg(short, long)]
    language: Option<String>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Include per-file statistics and log a summary
    #[arg(long)]
    stats: bool,

    /// Chunker configuration file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Args)]
struct LanguagesArgs {
    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Serialize)]
struct LanguageInfo<'a> {
    id: &'a str,
    splittable: Vec<&'static str>,
    bundled_parser: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match cli.command {
        Commands::Chunk(args) => run_chunk(args).await?,
        Commands::Languages(args) => run_languages(&args)?,
    }

    Ok(())
}

async fn run_chunk(args: ChunkArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => ChunkerConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ChunkerConfig::default(),
    };
    let chunker = Arc::new(Chunker::new(config).context("Invalid chunker configuration")?);
    if let Some(language) = &args.language {
        anyhow::ensure!(
            chunker.registry().contains(language),
            "Unknown language `{language}` (known: {})",
            chunker.registry().languages().join(", ")
        );
    }

    let files = FileScanner::new(args.language.clone()).scan(&args.paths);
    let reports = chunk::chunk_files(chunker, files, args.language, args.stats).await;

    if args.stats {
        let mut summary = ChunkingStats::default();
        for stats in reports.iter().filter_map(|report| report.stats.as_ref()) {
            summary.merge(stats);
        }
        log::info!("{} files | {summary}", reports.len());
    }

    print_json(&reports, args.pretty)?;

    let failed = reports.iter().filter(|report| report.is_error()).count();
    if failed > 0 {
        log::error!("{failed} of {} files failed", reports.len());
        std::process::exit(1);
    }
    Ok(())
}

fn run_languages(args: &LanguagesArgs) -> Result<()> {
    let registry = LanguageRegistry::global();
    let mut languages = Vec::new();
    for id in registry.languages() {
        let plugin = registry.plugin(id)?;
        languages.push(LanguageInfo {
            id,
            splittable: plugin.classifier.splittable_kinds().iter().collect(),
            bundled_parser: plugin.provider.is_some(),
        });
    }
    print_json(&languages, args.pretty)
}

fn print_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{out}");
    Ok(())
}
