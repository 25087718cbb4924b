//! querydiff CLI
//!
//! Compares the results of two SQL queries row by row.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;
use sqlx::sqlite::SqlitePoolOptions;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use querydiff_cli::commands::{self, parse_mapping, read_query, PingStatus};
use querydiff_cli::source::DEFAULT_MAX_ROWS;
use querydiff_cli::{extract_columns, CliError, SqliteSource};
use querydiff_core::prelude::*;
use querydiff_core::report::DEFAULT_PREVIEW_LIMIT;
use querydiff_render::prelude::*;

/// Compare the results of two SQL queries.
#[derive(Parser)]
#[command(name = "querydiff")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Database URL (SQLite path or connection string).
    #[arg(short, long, env = "DATABASE_URL", default_value = "sqlite:db.sqlite3")]
    database: String,

    /// Maximum number of rows a compared query may return.
    #[arg(long, env = "QUERYDIFF_MAX_ROWS", default_value_t = DEFAULT_MAX_ROWS)]
    max_rows: usize,

    /// Timeout for the whole command, in seconds.
    #[arg(long, env = "QUERYDIFF_TIMEOUT", default_value_t = 30)]
    timeout: u64,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare the results of two queries.
    Compare {
        /// First query, inline or `@path`.
        #[arg(long)]
        query1: String,

        /// Second query, inline or `@path`.
        #[arg(long)]
        query2: String,

        /// Column mapping `LEFT=RIGHT` (repeatable).
        #[arg(short, long = "map")]
        map: Vec<String>,

        /// Join key column (repeatable). Defaults to the first common column.
        #[arg(short, long = "key")]
        key: Vec<String>,

        /// Rows kept per report category.
        #[arg(long, default_value_t = DEFAULT_PREVIEW_LIMIT)]
        preview_limit: usize,

        /// Report format to save (repeatable).
        #[arg(short, long = "format", value_enum, requires = "output_dir")]
        format: Vec<FormatArg>,

        /// Directory to save reports into. Prints JSON to stdout if omitted.
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Run one query and print its first rows.
    Execute {
        /// Query, inline or `@path`.
        query: String,
    },

    /// List the select-list columns of a query without running it.
    Columns {
        /// Query, inline or `@path`.
        query: String,
    },

    /// Test the database connection.
    Ping,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Json,
    Csv,
    Html,
    Markdown,
}

impl From<FormatArg> for ReportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Json => Self::Json,
            FormatArg::Csv => Self::Csv,
            FormatArg::Html => Self::Html,
            FormatArg::Markdown => Self::Markdown,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let seconds = cli.timeout;
    tokio::time::timeout(Duration::from_secs(seconds), run(cli))
        .await
        .map_err(|_| CliError::Timeout(seconds))??;

    Ok(())
}

async fn connect(database: &str, max_rows: usize) -> anyhow::Result<SqliteSource> {
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(database)
        .await?;
    Ok(SqliteSource::new(pool).with_max_rows(max_rows))
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let Cli {
        database,
        max_rows,
        command,
        ..
    } = cli;

    match command {
        Commands::Compare {
            query1,
            query2,
            map,
            key,
            preview_limit,
            format,
            output_dir,
        } => {
            let source = connect(&database, max_rows).await?;
            let query1 = read_query(&query1)?;
            let query2 = read_query(&query2)?;
            let mapping = parse_mapping(&map)?;
            let keys = JoinKeySet::new(key);
            let options = CompareOptions::default().preview_limit(preview_limit);

            info!("Comparing query results...");
            let report = compare_queries(&source, &query1, &query2, &mapping, &keys, &options).await?;

            let writer = ReportWriter::new(&report).mapping(&mapping);
            match output_dir {
                Some(dir) => {
                    let formats: Vec<ReportFormat> = if format.is_empty() {
                        vec![ReportFormat::Json]
                    } else {
                        format.into_iter().map(ReportFormat::from).collect()
                    };
                    for saved in writer.save(&dir, &formats)? {
                        println!("{}: {}", saved.format, saved.path.display());
                    }
                }
                None => println!("{}", writer.render(ReportFormat::Json)?),
            }

            if report.is_identical() {
                info!("Results are identical.");
            } else {
                info!(
                    mismatches = report.summary.mismatches,
                    only_in_query1 = report.summary.only_in_query1,
                    only_in_query2 = report.summary.only_in_query2,
                    "Results differ."
                );
            }
        }

        Commands::Execute { query } => {
            let source = connect(&database, max_rows).await?;
            let sql = read_query(&query)?;
            let output = commands::execute(&source, &sql).await?;
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Commands::Ping => {
            let status = match connect(&database, max_rows).await {
                Ok(source) => commands::ping(&source).await,
                Err(err) => PingStatus {
                    status: "error",
                    message: err.to_string(),
                },
            };
            println!("{}", serde_json::to_string(&status)?);
        }

        Commands::Columns { query } => {
            let sql = read_query(&query)?;
            println!("{}", json!({ "columns": extract_columns(&sql) }));
        }
    }

    Ok(())
}
