use anyhow::{Context, Result};
use bibwrangle::config;
use bibwrangle::db;
use bibwrangle::report::{self, pipe_table};
use bibwrangle::wrangle::{run_wrangle, WrangleConfig};
use clap::{Args, Parser, Subcommand};
use rusqlite::{Connection, OpenFlags};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "bibwrangle")]
#[command(about = "Convert bibliographic CSV exports into a SQLite database")]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load document metadata and category CSVs into the database
    Wrangle(WrangleArgs),
    /// Print table row counts and the error tally of a previous run
    Summarize(SummarizeArgs),
}

#[derive(Args)]
struct WrangleArgs {
    /// Document metadata CSV file(s)
    #[arg(
        short,
        long,
        value_name = "PATH",
        num_args = 1..,
        default_value = config::DEFAULT_DOCS_PATH
    )]
    docs: Vec<PathBuf>,

    /// Taxonomic categories CSV file(s)
    #[arg(
        short,
        long,
        value_name = "PATH",
        num_args = 1..,
        default_value = config::DEFAULT_CATS_PATH
    )]
    cats: Vec<PathBuf>,

    /// Location to save the SQLite database to
    #[arg(short, long, value_name = "PATH", default_value = config::DEFAULT_DB_PATH)]
    out: PathBuf,

    /// Write the JSON error report here instead of stdout
    #[arg(short, long, value_name = "PATH")]
    report: Option<PathBuf>,

    /// Delete an existing database and rebuild
    #[arg(short, long)]
    force: bool,
}

#[derive(Args)]
struct SummarizeArgs {
    /// Location of the error report written by wrangle
    #[arg(short, long, value_name = "PATH", default_value = config::DEFAULT_REPORT_PATH)]
    report: PathBuf,

    /// Location of the SQLite database
    #[arg(short, long, value_name = "PATH", default_value = config::DEFAULT_DB_PATH)]
    db: PathBuf,
}

fn run_wrangle_command(args: WrangleArgs) -> Result<()> {
    let start = Instant::now();
    let config = WrangleConfig {
        docs: args.docs,
        cats: args.cats,
        db_path: args.out,
        force: args.force,
    };

    let outcome = run_wrangle(&config)?;
    let elapsed = start.elapsed();
    info!(duration_secs = elapsed.as_secs_f64(), "Wrangling complete");

    outcome.report.write_json(args.report.as_deref())?;

    let stats = &outcome.stats;
    let summary = [
        String::new(),
        "=== Summary ===".to_string(),
        format!("Total time:         {:.2}s", elapsed.as_secs_f64()),
        format!("Database:           {}", config.db_path.display()),
        format!("Document rows:      {}", stats.doc_rows),
        format!("Category rows:      {}", stats.category_rows),
        format!("Articles inserted:  {}", stats.articles_inserted),
        format!("Author links:       {}", stats.author_links),
        format!("Affiliation links:  {}", stats.affiliation_links),
        format!("Keyword links:      {}", stats.keyword_links),
        format!("Label links:        {}", stats.label_links),
        String::new(),
        outcome.report.summary_table(),
    ]
    .join("\n");

    // The JSON owns stdout when no report path is given.
    if args.report.is_some() {
        println!("{}", summary);
    } else {
        eprintln!("{}", summary);
    }

    Ok(())
}

fn run_summarize(args: SummarizeArgs) -> Result<()> {
    let conn = Connection::open_with_flags(&args.db, OpenFlags::SQLITE_OPEN_READ_ONLY)
        .with_context(|| format!("Failed to open database: {}", args.db.display()))?;
    let rows: Vec<(String, String)> = db::table_counts(&conn)?
        .into_iter()
        .map(|(table, count)| (table, count.to_string()))
        .collect();
    println!("{}", pipe_table(("Table", "Rows"), &rows));

    let report = report::load_report(&args.report)?;
    println!("{}", report.summary_table());

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    let result = match cli.command {
        Commands::Wrangle(args) => run_wrangle_command(args),
        Commands::Summarize(args) => run_summarize(args),
    };

    match result {
        Ok(()) => {
            info!("Completed successfully");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Error: {:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
