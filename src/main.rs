//! CLI entry point for the corral retrieval pipeline.
//!
//! Provides one-shot commands that load a corpus, build a deterministic
//! index in memory, and answer against it. Nothing is persisted between
//! invocations; identical inputs produce identical output on every run.

use clap::{
    Parser, Subcommand,
    builder::styling::{AnsiColor, Effects, Styles},
};
use corral::io::{ExitCode, OutputFormat, OutputManager};
use corral::{Corpus, Index, IndexOptions, Settings};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// One community summary row for the `summaries` command.
#[derive(Debug, Serialize)]
struct SummaryRow {
    cluster: u32,
    members: usize,
    document: String,
    similarity: f32,
    text: String,
}

impl std::fmt::Display for SummaryRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[cluster {} | {} members] {} ({:.3}): {}",
            self.cluster, self.members, self.document, self.similarity, self.text
        )
    }
}

fn clap_cargo_style() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Green.on_default())
}

/// Deterministic clustered retrieval
#[derive(Parser)]
#[command(
    name = "corral",
    version = env!("CARGO_PKG_VERSION"),
    about = "Deterministic clustered retrieval",
    long_about = "Build a reproducible community index over a text corpus and \
                  route queries to one community before ranking.",
    styles = clap_cargo_style()
)]
struct Cli {
    /// Path to custom settings.toml file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
enum Commands {
    /// Initialize project
    #[command(about = "Set up .corral directory with default configuration")]
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Display active settings
    #[command(about = "Show the merged configuration as TOML")]
    Config,

    /// List frozen community summaries
    #[command(about = "Build the index and print one summary per cluster")]
    Summaries {
        /// Corpus directory
        path: PathBuf,

        /// Number of clusters (overrides config)
        #[arg(short = 'k', long)]
        clusters: Option<usize>,

        /// Centroid seeding offset (overrides config)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Answer a query against a corpus
    #[command(about = "Build the index, route the query, rank one community")]
    Query {
        /// Corpus directory
        path: PathBuf,

        /// Query text
        query: String,

        /// Number of clusters (overrides config)
        #[arg(short = 'k', long)]
        clusters: Option<usize>,

        /// Centroid seeding offset (overrides config)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Result cap; 0 returns the routed cluster in full (overrides config)
        #[arg(short, long)]
        top_k: Option<usize>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if !matches!(cli.command, Commands::Init { .. }) {
        if let Err(warning) = Settings::check_init() {
            eprintln!("Warning: {warning}");
            eprintln!("Using default configuration for now.");
        }
    }

    // Load configuration
    let settings = if let Some(config_path) = &cli.config {
        Settings::load_from(config_path).unwrap_or_else(|e| {
            eprintln!(
                "Configuration error loading from {}: {}",
                config_path.display(),
                e
            );
            std::process::exit(ExitCode::ConfigError.into());
        })
    } else {
        Settings::load().unwrap_or_else(|e| {
            eprintln!("Configuration error: {e}");
            std::process::exit(ExitCode::ConfigError.into());
        })
    };

    let code = run(cli.command, &settings);
    std::process::exit(code.into());
}

fn run(command: Commands, settings: &Settings) -> ExitCode {
    match command {
        Commands::Init { force } => match Settings::init_config_file(force) {
            Ok(_) => ExitCode::Success,
            Err(e) => {
                eprintln!("Failed to initialize configuration: {e}");
                ExitCode::ConfigError
            }
        },

        Commands::Config => match toml::to_string_pretty(settings) {
            Ok(rendered) => {
                println!("{rendered}");
                ExitCode::Success
            }
            Err(e) => {
                eprintln!("Failed to render configuration: {e}");
                ExitCode::ConfigError
            }
        },

        Commands::Summaries {
            path,
            clusters,
            seed,
            json,
        } => {
            let mut output = OutputManager::new(OutputFormat::from_json_flag(json));
            let index = match build_index(&path, clusters, seed, settings, &mut output) {
                Ok(index) => index,
                Err(code) => return code,
            };

            let rows: Vec<SummaryRow> = index
                .summaries()
                .iter()
                .map(|summary| SummaryRow {
                    cluster: summary.cluster.get(),
                    members: index.clusters()[summary.cluster.to_index()].members.len(),
                    document: index.corpus().name(summary.document).to_string(),
                    similarity: summary.similarity.get(),
                    text: index.corpus().get(summary.document).text.clone(),
                })
                .collect();

            output
                .collection(rows, "community summaries")
                .unwrap_or(ExitCode::GeneralError)
        }

        Commands::Query {
            path,
            query,
            clusters,
            seed,
            top_k,
            json,
        } => {
            let mut output = OutputManager::new(OutputFormat::from_json_flag(json));
            let index = match build_index(&path, clusters, seed, settings, &mut output) {
                Ok(index) => index,
                Err(code) => return code,
            };

            let limit = match top_k.unwrap_or(settings.query.top_k) {
                0 => None,
                cap => Some(cap),
            };
            let answer = index.answer(&query, limit);

            output.success(answer).unwrap_or(ExitCode::GeneralError)
        }
    }
}

/// Load the corpus and build the index, reporting failures through the
/// output manager.
fn build_index(
    path: &Path,
    clusters: Option<usize>,
    seed: Option<u64>,
    settings: &Settings,
    output: &mut OutputManager,
) -> Result<Index, ExitCode> {
    let corpus = match Corpus::from_dir(path, &settings.corpus.extensions) {
        Ok(corpus) => corpus,
        Err(e) => return Err(output.error(&e).unwrap_or(ExitCode::GeneralError)),
    };

    let options = IndexOptions {
        clusters: clusters.unwrap_or(settings.index.clusters),
        seed: seed.unwrap_or(settings.index.seed),
        max_iterations: settings.index.max_iterations,
    };

    let _ = output.progress(&format!(
        "Indexing {} documents into {} clusters (seed {})",
        corpus.len(),
        options.clusters,
        options.seed
    ));

    match Index::build(corpus, &options) {
        Ok(index) => Ok(index),
        Err(e) => Err(output.error(&e).unwrap_or(ExitCode::GeneralError)),
    }
}
