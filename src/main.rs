// ██████╗ █████╗ ███████╗███████╗
// ██╔════╝██╔══██╗██╔════╝██╔════╝
// ██║     ███████║███████╗█████╗
// ██║     ██╔══██║╚════██║██╔══╝
// ╚██████╗██║  ██║███████║███████╗
//  ╚═════╝╚═╝  ╚═╝╚══════╝╚══════╝
//
// S T A T U S   E N G I N E
//
// One query in, one outcome out: the case, a captcha, or a network shrug.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};
use uuid::Uuid;

use case_status_engine::config::Config;
use case_status_engine::documents::DocumentRetriever;
use case_status_engine::fetcher::CaseRecordFetcher;
use case_status_engine::history::QueryHistory;
use case_status_engine::models::{CaseQuery, FetchOutcome};

fn print_banner() {
    let banner = r#"
    ╔══════════════════════════════════════════════════════╗
    ║            ⚖  CASE STATUS ENGINE  ⚖                  ║
    ║                                                      ║
    ║   Fetch:    one GET, one timeout, no retries         ║
    ║   Classify: captcha vocabulary, single pass          ║
    ║   Extract:  label regexes + order/judgment links     ║
    ╚══════════════════════════════════════════════════════╝
    "#;
    eprintln!("{}", banner);
}

#[derive(Debug, Parser)]
#[command(name = "case-status", version, about = "Fetch and parse public court case status pages")]
struct Cli {
    /// Skip the banner
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Look up one case
    Fetch {
        #[arg(long, value_parser = non_empty)]
        case_type: String,
        #[arg(long, value_parser = non_empty)]
        case_number: String,
        #[arg(long = "year", value_parser = non_empty)]
        filing_year: String,
        /// Print the outcome as JSON instead of a summary
        #[arg(long)]
        json: bool,
        /// Do not append this query to the history file
        #[arg(long)]
        no_history: bool,
    },
    /// Download an order or judgment document
    Download {
        #[arg(long)]
        url: String,
        /// Output path (defaults to the document's own file name)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// List past queries
    History,
    /// Print the raw body stored for a past query
    Raw { id: Uuid },
}

/// The pipeline does not re-validate queries, so the caller does it here.
fn non_empty(value: &str) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err("must not be empty".to_string())
    } else {
        Ok(trimmed.to_string())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if !cli.quiet {
        print_banner();
    }

    let config = Config::from_env();
    info!(
        endpoint = %config.service_url,
        history = %config.history_path.display(),
        "Configuration loaded"
    );

    match cli.command {
        Command::Fetch {
            case_type,
            case_number,
            filing_year,
            json,
            no_history,
        } => {
            let query = CaseQuery::new(case_type, case_number, filing_year);
            run_fetch(&config, &query, json, no_history).await
        }
        Command::Download { url, out } => run_download(&config, &url, out).await,
        Command::History => run_history(&config),
        Command::Raw { id } => run_raw(&config, id),
    }
}

async fn run_fetch(config: &Config, query: &CaseQuery, json: bool, no_history: bool) -> Result<()> {
    let fetcher = CaseRecordFetcher::new(config).context("building case record fetcher")?;
    let outcome = fetcher.fetch(query).await;

    let history_id = if no_history {
        None
    } else {
        // A history write failure should not hide the answer we already have.
        match QueryHistory::new(&config.history_path).record(query, &outcome) {
            Ok(entry) => Some(entry.id),
            Err(e) => {
                warn!(error = %e, "Could not record query history");
                None
            }
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    println!("Query: {}", query);
    match &outcome {
        FetchOutcome::NetworkFailure { message } => {
            println!("Network failure: {}", message);
            println!("The court site could not be reached. Try again in a while.");
        }
        FetchOutcome::ChallengePresent { .. } => {
            println!("The court site is asking for a CAPTCHA or similar challenge.");
            println!("Manual action required: open the court site and search there.");
            println!("This tool does not solve or bypass challenges.");
        }
        FetchOutcome::Success { record, .. } => {
            let show = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());
            println!("Petitioner:        {}", show(&record.petitioner));
            println!("Respondent:        {}", show(&record.respondent));
            println!("Filing date:       {}", show(&record.filing_date));
            println!("Next hearing date: {}", show(&record.next_hearing_date));
            if record.document_links.is_empty() {
                println!("Documents:         none found");
            } else {
                println!("Documents:");
                for link in &record.document_links {
                    println!("  - {} <{}>", link.label, link.url);
                }
            }
        }
    }

    if let Some(excerpt) = outcome.raw_excerpt(config.excerpt_chars) {
        println!();
        println!("--- raw response (first {} chars) ---", config.excerpt_chars);
        println!("{}", excerpt);
    }
    if let Some(id) = history_id {
        println!();
        println!("Logged as {}", id);
    }

    Ok(())
}

async fn run_download(config: &Config, url: &str, out: Option<PathBuf>) -> Result<()> {
    let retriever = DocumentRetriever::new(config).context("building document retriever")?;
    let document = retriever.download(url).await?;

    let path = out.unwrap_or_else(|| PathBuf::from(&document.file_name));
    tokio::fs::write(&path, &document.bytes)
        .await
        .with_context(|| format!("writing {}", path.display()))?;

    println!(
        "Saved {} ({} bytes, {}) to {}",
        document.url,
        document.bytes.len(),
        document.content_type.as_deref().unwrap_or("unknown type"),
        path.display()
    );
    Ok(())
}

fn run_history(config: &Config) -> Result<()> {
    let entries = QueryHistory::new(&config.history_path).entries()?;
    if entries.is_empty() {
        println!("No queries recorded yet.");
        return Ok(());
    }

    for entry in entries {
        println!(
            "{}  {}  {:<24} {}",
            entry.id,
            entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
            entry.query.to_string(),
            entry.outcome
        );
    }
    Ok(())
}

fn run_raw(config: &Config, id: Uuid) -> Result<()> {
    let entry = QueryHistory::new(&config.history_path).find(id)?;
    match entry.raw_body {
        Some(body) => println!("{}", body),
        None => println!(
            "No body stored for {} ({}).",
            id,
            entry.message.as_deref().unwrap_or("no response")
        ),
    }
    Ok(())
}
