//! CLI administration tool for url-redirector.
//!
//! Inspects stored redirects and converts between ids and short codes
//! without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # List redirects, newest first
//! cargo run --bin admin -- list --page 2 --page-size 50
//!
//! # Show the record behind a short code
//! cargo run --bin admin -- show 5kD2
//!
//! # Convert between ids and codes (no database needed)
//! cargo run --bin admin -- encode 123456
//! cargo run --bin admin -- decode 5kD2
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required for database commands): PostgreSQL connection string
//! - `SHORT_CODE_ALPHABET` (optional): must match the server's alphabet
//! - `BASE_URL` (optional): prefix used when printing short links

use url_redirector::application::services::RedirectService;
use url_redirector::domain::entities::RedirectRecord;
use url_redirector::infrastructure::persistence::PgRedirectRepository;
use url_redirector::utils::base_n::{Alphabet, DEFAULT_ALPHABET};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing url-redirector.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
enum Commands {
    /// List stored redirects
    List {
        /// Page number, starting at 1
        #[arg(long, default_value_t = 1)]
        page: i64,

        /// Records per page
        #[arg(long, default_value_t = 20)]
        page_size: i64,
    },

    /// Show the redirect behind a short code
    Show {
        /// Short code
        code: String,
    },

    /// Encode a record id as a short code
    Encode {
        /// Record id
        id: i32,
    },

    /// Decode a short code into a record id
    Decode {
        /// Short code
        code: String,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let alphabet = load_alphabet()?;

    match cli.command {
        Commands::Encode { id } => encode(&alphabet, id)?,
        Commands::Decode { code } => decode(&alphabet, &code)?,
        Commands::List { page, page_size } => {
            let service = redirect_service(connect().await?);
            list(&service, &alphabet, page, page_size).await?
        }
        Commands::Show { code } => {
            let service = redirect_service(connect().await?);
            show(&service, &alphabet, &code).await?
        }
        Commands::Stats => stats(&redirect_service(connect().await?)).await?,
        Commands::Db { action } => handle_db_action(action, &connect().await?).await?,
    }

    Ok(())
}

type Service = RedirectService<PgRedirectRepository>;

fn redirect_service(pool: PgPool) -> Service {
    RedirectService::new(Arc::new(PgRedirectRepository::new(Arc::new(pool))))
}

async fn connect() -> Result<PgPool> {
    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")
}

fn load_alphabet() -> Result<Alphabet> {
    let symbols =
        std::env::var("SHORT_CODE_ALPHABET").unwrap_or_else(|_| DEFAULT_ALPHABET.to_string());

    Alphabet::new(&symbols).context("SHORT_CODE_ALPHABET is invalid")
}

fn short_link(code: &str) -> String {
    let base = std::env::var("BASE_URL").unwrap_or_else(|_| "http://localhost:3000/".to_string());
    format!("{}/{}", base.trim_end_matches('/'), code)
}

/// Prints the code for an id.
fn encode(alphabet: &Alphabet, id: i32) -> Result<()> {
    let code = alphabet.encode_id(id)?;

    println!("  Id:   {}", id.to_string().bright_black());
    println!("  Code: {}", code.bright_yellow().bold());
    println!("  Link: {}", short_link(&code).cyan());

    Ok(())
}

/// Prints the id behind a code.
fn decode(alphabet: &Alphabet, code: &str) -> Result<()> {
    println!("  Code: {}", code.bright_yellow());

    match alphabet.decode_id(code)? {
        Some(id) => println!("  Id:   {}", id.to_string().bright_green().bold()),
        None => println!("  {}", "Decodes beyond the id range, no record can match".yellow()),
    }

    Ok(())
}

/// Lists redirects with their codes.
///
/// # Output Format
///
/// ```text
/// Redirects (page 1)
///
///   Code        Used     Created           URL
///   ─────────────────────────────────────────────────────────────
///   5kD2        12       2025-01-15 10:30  https://www.example.com/
/// ```
async fn list(service: &Service, alphabet: &Alphabet, page: i64, page_size: i64) -> Result<()> {
    println!(
        "{}",
        format!("Redirects (page {})", page).bright_blue().bold()
    );
    println!();

    let records = service
        .list(page, page_size)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list redirects: {}", e))?;

    if records.is_empty() {
        println!("{}", "  No redirects found".yellow());
        return Ok(());
    }

    println!(
        "  {:<11} {:<8} {:<17} {}",
        "Code".bright_white().bold(),
        "Used".bright_white().bold(),
        "Created".bright_white().bold(),
        "URL".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for record in &records {
        println!(
            "  {:<11} {:<8} {:<17} {}",
            alphabet.encode_id(record.id)?.bright_yellow(),
            record.times_used.to_string().bright_green(),
            record
                .created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            record.original_url.cyan()
        );
    }

    println!();
    println!(
        "  Shown: {}",
        records.len().to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Shows one redirect looked up by its code.
async fn show(service: &Service, alphabet: &Alphabet, code: &str) -> Result<()> {
    let id = alphabet
        .decode_id(code)?
        .context("Code decodes beyond the id range")?;

    let record = service
        .get(id)
        .await
        .map_err(|e| anyhow::anyhow!("{}: {}", e, code))?;

    print_record(&record, code);

    Ok(())
}

fn print_record(record: &RedirectRecord, code: &str) {
    println!("{}", "Redirect".bright_blue().bold());
    println!();
    println!("  Id:         {}", record.id.to_string().bright_black());
    println!("  Code:       {}", code.bright_yellow().bold());
    println!("  Short link: {}", short_link(code).cyan());
    println!("  URL:        {}", record.original_url.cyan());
    println!(
        "  Used:       {}",
        record.times_used.to_string().bright_green()
    );
    println!(
        "  Created:    {}",
        record
            .created_at
            .format("%Y-%m-%d %H:%M:%S UTC")
            .to_string()
            .bright_black()
    );
    println!();
}

/// Displays system statistics.
///
/// Shows:
/// - Total number of redirects
/// - Total number of resolved uses
async fn stats(service: &Service) -> Result<()> {
    println!("{}", "Statistics".bright_blue().bold());
    println!();

    let redirects = service
        .count()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to count redirects: {}", e))?;
    let uses = service
        .total_uses()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to sum uses: {}", e))?;

    println!(
        "  Redirects: {}",
        redirects.to_string().bright_green().bold()
    );
    println!("  Uses:      {}", uses.to_string().bright_green().bold());
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!();
        }
    }

    Ok(())
}
