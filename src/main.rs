//! CLI entry point for the movie analytics tool.
//!
//! Provides subcommands for cleaning the raw dataset, running a single
//! analytics query from the shell, and serving the queries over HTTP.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use movie_analytics::analyzers::MovieAnalytics;
use movie_analytics::config::Settings;
use movie_analytics::error::StoreError;
use movie_analytics::output::write_json;
use movie_analytics::preprocess;
use movie_analytics::server::{AppState, build_router, serve};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "movie_analytics")]
#[command(about = "Clean a raw movie dataset and compute analytics over it", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean the raw dataset and replace the canonical store
    Preprocess {
        /// Raw CSV path or URL (defaults to RAW_DATA_PATH)
        #[arg(short, long, value_name = "FILE_OR_URL")]
        source: Option<String>,

        /// Canonical CSV to write (defaults to CLEANED_DATA_PATH)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Run one analytics query and print the rows as JSON
    Query {
        #[arg(value_enum)]
        kind: QueryKind,

        /// Number of rows for ranking queries
        #[arg(short, long, default_value_t = 10)]
        limit: usize,

        /// Override the minimum-votes prior used by top-rated
        #[arg(long)]
        min_votes: Option<u64>,

        /// Canonical CSV to read (defaults to CLEANED_DATA_PATH)
        #[arg(short, long)]
        data: Option<PathBuf>,
    },
    /// Serve the analytics queries over HTTP
    Serve {
        /// Address to bind (defaults to BIND_ADDR)
        #[arg(short, long)]
        bind: Option<String>,

        /// Canonical CSV to read (defaults to CLEANED_DATA_PATH)
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Run preprocessing before loading the dataset
        #[arg(long, default_value_t = false)]
        preprocess: bool,

        /// Raw CSV path or URL used with --preprocess (defaults to RAW_DATA_PATH)
        #[arg(long, value_name = "FILE_OR_URL")]
        source: Option<String>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum QueryKind {
    MostPopular,
    TopRated,
    ByGenre,
    YearlyTrends,
    LanguageStats,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file
    let settings = Settings::from_env();

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = Path::new(&settings.log_file_path);
    let log_dir = log_file_path.parent().unwrap_or(Path::new("logs"));
    let log_file_name = log_file_path
        .file_name()
        .unwrap_or(OsStr::new("movie_analytics.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive(tracing::Level::INFO.into()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(
            EnvFilter::from_env("RUST_LOG_JSON").add_directive(tracing::Level::DEBUG.into()),
        );

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Preprocess { source, output } => {
            let source = source.unwrap_or(settings.raw_data_path);
            let output = output.unwrap_or(settings.cleaned_data_path);
            preprocess::run(&source, &output).await?;
        }
        Commands::Query {
            kind,
            limit,
            min_votes,
            data,
        } => {
            let data = data.unwrap_or(settings.cleaned_data_path);
            let analytics = MovieAnalytics::load(&data)?;
            run_query(&analytics, kind, limit, min_votes)?;
        }
        Commands::Serve {
            bind,
            data,
            preprocess: run_preprocess,
            source,
        } => {
            let bind = bind.unwrap_or(settings.bind_addr);
            let data = data.unwrap_or(settings.cleaned_data_path);

            if run_preprocess {
                let source = source.unwrap_or(settings.raw_data_path);
                preprocess::run(&source, &data).await?;
            }

            let state = match MovieAnalytics::load(&data) {
                Ok(analytics) => {
                    info!(movies = analytics.len(), "Data layer initialized");
                    AppState::new(analytics)
                }
                Err(StoreError::NotFound(path)) => {
                    warn!(
                        path = %path.display(),
                        "Canonical dataset missing; serving 503 until preprocessing writes it"
                    );
                    AppState::lazy(path)
                }
                Err(e) => return Err(e.into()),
            };

            serve(&bind, build_router(state, &settings.api_prefix)).await?;
        }
    }

    Ok(())
}

/// Evaluates one query against the snapshot and prints its rows to stdout.
fn run_query(
    analytics: &MovieAnalytics,
    kind: QueryKind,
    limit: usize,
    min_votes: Option<u64>,
) -> Result<()> {
    let stdout = std::io::stdout().lock();
    match kind {
        QueryKind::MostPopular => write_json(stdout, &analytics.most_popular(limit)?),
        QueryKind::TopRated => write_json(stdout, &analytics.top_rated(limit, min_votes)?),
        QueryKind::ByGenre => write_json(stdout, &analytics.by_genre()),
        QueryKind::YearlyTrends => write_json(stdout, &analytics.yearly_trends()),
        QueryKind::LanguageStats => write_json(stdout, &analytics.language_stats()),
    }
}
