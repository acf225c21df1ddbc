//! CLI administration tool for shortlink.
//!
//! Provides commands for creating and inspecting links, viewing statistics,
//! purging expired records and checking the database without going through
//! the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Create a link valid for two hours
//! cargo run --bin admin -- shorten https://example.com/docs --validity 120
//!
//! # Create a link with a chosen code
//! cargo run --bin admin -- shorten https://example.com --code spring-sale
//!
//! # Look up a code
//! cargo run --bin admin -- resolve spring-sale
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Delete expired links
//! cargo run --bin admin -- purge --yes
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Reads the same configuration as the server. `DATABASE_URL` (or the
//! `DB_*` components) is required.

use shortlink::config::{self, Config};
use shortlink::domain::clock::{Clock, SystemClock};
use shortlink::domain::repositories::LinkRepository;
use shortlink::infrastructure::persistence::PgLinkRepository;
use shortlink::server;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing shortlink.
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
    /// Create a short link
    Shorten {
        /// Target URL (http or https)
        url: String,

        /// Validity in minutes (server default if omitted)
        #[arg(short, long)]
        validity: Option<i64>,

        /// Custom short code
        #[arg(short, long)]
        code: Option<String>,
    },

    /// Show where a code points
    Resolve {
        /// Short code to look up
        code: String,
    },

    /// Show statistics
    Stats,

    /// Delete expired links
    Purge {
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

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
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env()?;
    let database_url = config
        .database_url
        .clone()
        .context("DATABASE_URL (or DB_HOST, DB_USER, DB_PASSWORD, DB_NAME) must be set")?;

    let pool = server::connect_database(&database_url, &config).await?;

    match cli.command {
        Commands::Shorten {
            url,
            validity,
            code,
        } => shorten(&config, link_store(pool).await?, url, validity, code).await?,
        Commands::Resolve { code } => resolve(&config, link_store(pool).await?, code).await?,
        Commands::Stats => handle_stats(link_store(pool).await?).await?,
        Commands::Purge { yes } => purge(link_store(pool).await?, yes).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Applies pending migrations and wraps the pool in a link repository.
async fn link_store(pool: PgPool) -> Result<Arc<dyn LinkRepository>> {
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    Ok(Arc::new(PgLinkRepository::new(Arc::new(pool))))
}

/// Creates a link through the same resolver the HTTP API uses.
async fn shorten(
    config: &Config,
    store: Arc<dyn LinkRepository>,
    url: String,
    validity: Option<i64>,
    code: Option<String>,
) -> Result<()> {
    println!("{}", "🔗 Create Short Link".bright_blue().bold());
    println!();

    let resolver = server::build_resolver(config, store)?;

    match resolver.shorten(&url, validity, code).await {
        Ok(info) => {
            println!("{}", "✅ Link created".green().bold());
            println!();
            println!("  Code:    {}", info.code.cyan());
            println!("  Short:   {}", info.short_url.bright_yellow().bold());
            println!("  Target:  {}", info.target_url.bright_white());
            println!(
                "  Expires: {}",
                info.expires_at
                    .format("%Y-%m-%d %H:%M:%S UTC")
                    .to_string()
                    .bright_black()
            );
            println!();
        }
        Err(e) => {
            let info = e.to_error_info();
            println!("{} {}", "❌".red(), info.code.red().bold());
            println!("  {}", info.message);
            anyhow::bail!("Failed to create link");
        }
    }

    Ok(())
}

/// Shows the target of `code`, or why it does not resolve.
async fn resolve(config: &Config, store: Arc<dyn LinkRepository>, code: String) -> Result<()> {
    let resolver = server::build_resolver(config, store)?;

    match resolver.resolve(&code).await {
        Ok(target) => {
            println!("  {} → {}", code.cyan(), target.bright_white());
        }
        Err(e) => {
            let info = e.to_error_info();
            println!("  {} → {}", code.cyan(), info.code.red().bold());
            println!("  {}", info.message.bright_black());
        }
    }

    Ok(())
}

/// Displays link statistics.
///
/// Shows:
/// - Total number of stored links
/// - How many of them have expired
async fn handle_stats(store: Arc<dyn LinkRepository>) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let now = SystemClock.now();

    let total = store
        .count()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to count links: {}", e))?;
    let expired = store
        .count_expired(now)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to count expired links: {}", e))?;

    println!("  Links:   {}", total.to_string().bright_green().bold());
    println!(
        "  Active:  {}",
        total.saturating_sub(expired).to_string().bright_green().bold()
    );
    println!("  Expired: {}", expired.to_string().yellow().bold());
    println!();

    Ok(())
}

/// Deletes expired links after confirmation.
///
/// # Safety
///
/// - Requires confirmation (default: No) unless `--yes` is given
/// - Only records whose expiry has passed are removed
async fn purge(store: Arc<dyn LinkRepository>, skip_confirm: bool) -> Result<()> {
    println!("{}", "🧹 Purge Expired Links".bright_blue().bold());
    println!();

    let now = SystemClock.now();

    let expired = store
        .count_expired(now)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

    if expired == 0 {
        println!("{}", "  Nothing to purge".yellow());
        return Ok(());
    }

    println!(
        "  Expired links: {}",
        expired.to_string().bright_white().bold()
    );
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete these links?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let removed = store
        .purge_expired(now)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to purge links: {}", e))?;

    println!();
    println!(
        "{} {}",
        "✅ Removed".green().bold(),
        format!("{} links", removed).bright_white()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("{}", "✅ Database connection OK".green().bold());
            println!("  PostgreSQL: {}", version.bright_white());
        }
    }

    Ok(())
}
