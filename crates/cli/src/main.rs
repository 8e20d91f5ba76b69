//! Bazaar CLI - operator console for the store admin API.
//!
//! # Usage
//!
//! ```bash
//! # Save a bearer token
//! bz auth login <TOKEN>
//!
//! # Brands
//! bz brands list
//! bz brands create --name Apple --logo ./apple.png
//!
//! # Bulk product upload
//! bz products template
//! bz products preview ./products.xlsx
//! bz products upload ./products.xlsx
//!
//! # Reports
//! bz reports revenue --from 2024-01-01 --to 2024-01-31 --export
//!
//! # Presentation deck
//! bz deck generate ./deck.json
//! ```
//!
//! # Commands
//!
//! - `auth` - Manage the bearer token
//! - `brands` - List, show, create, update and delete brands
//! - `products` - List products and upload them from Excel
//! - `reports` - Sales, revenue, invoice and order status reports
//! - `deck` - Generate a product presentation

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::print_stdout)] // stdout is the command output

use bazaar_admin::AdminConfig;
use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::{CliError, Session};

#[derive(Parser)]
#[command(name = "bz")]
#[command(author, version, about = "Bazaar admin console")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the bearer token
    Auth {
        #[command(subcommand)]
        action: commands::auth::AuthAction,
    },
    /// Manage brands
    Brands {
        #[command(subcommand)]
        action: commands::brands::BrandAction,
    },
    /// List and bulk-upload products
    Products {
        #[command(subcommand)]
        action: commands::products::ProductAction,
    },
    /// Sales, revenue, invoice and order status reports
    Reports {
        #[command(subcommand)]
        action: commands::reports::ReportAction,
    },
    /// Product presentation decks
    Deck {
        #[command(subcommand)]
        action: commands::deck::DeckAction,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &AdminConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            sample_rate: config.sentry_sample_rate,
            traces_sample_rate: config.sentry_traces_sample_rate,
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "bazaar_admin=info,bazaar_cli=info".into());

    // Logs go to stderr so command output on stdout stays clean
    let json = std::env::var_os("BAZAAR_LOG_JSON").is_some();
    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer = (!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Configuration comes first so Sentry is up before the subscriber
    let config = AdminConfig::from_env();
    let sentry_guard = config.as_ref().ok().and_then(init_sentry);
    init_tracing();

    let result = match config {
        Ok(config) => run(cli, config).await,
        Err(e) => Err(CliError::from(e)),
    };

    if let Err(e) = result {
        e.report();
        // Flush pending Sentry events before exiting
        drop(sentry_guard);
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: AdminConfig) -> Result<(), CliError> {
    tracing::debug!(?config, "Loaded configuration");
    let session = Session::new(config)?;

    match cli.command {
        Commands::Auth { action } => commands::auth::run(&session, action)?,
        Commands::Brands { action } => commands::brands::run(&session, action).await?,
        Commands::Products { action } => commands::products::run(&session, action).await?,
        Commands::Reports { action } => commands::reports::run(&session, action).await?,
        Commands::Deck { action } => commands::deck::run(&session, action).await?,
    }
    Ok(())
}
