use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::info;

use event_discovery::config::{DiscoveryConfig, DEFAULT_CONFIG_PATH};
use event_discovery::logging;
use event_discovery::pipeline::processing::{EventKindFilter, FilterSelection};
use event_discovery::pipeline::storage::InMemoryRecordStore;
use event_discovery::DiscoveryUseCase;

#[derive(Parser)]
#[command(name = "event-discovery")]
#[command(about = "Browse, filter and relate events from a directory export")]
#[command(version)]
struct Cli {
    /// Path to the TOML config file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Log level for this crate when RUST_LOG is unset
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the filter options offered for the current events
    Facets(Source),
    /// Filter, sort and bucket the current events
    List {
        #[command(flatten)]
        source: Source,
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Rank events related to one event
    Related {
        /// Id of the focal event
        id: String,
        #[command(flatten)]
        source: Source,
    },
    /// Print adapted venues
    Venues {
        /// JSON file with raw venue documents
        #[arg(long)]
        venues: PathBuf,
    },
}

#[derive(Args)]
struct Source {
    /// JSON file with raw event documents (array or `{docs: [...]}` page)
    #[arg(long)]
    events: PathBuf,

    /// Reference day (YYYY-MM-DD), defaults to the current UTC date
    #[arg(long)]
    today: Option<NaiveDate>,
}

impl Source {
    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Utc::now().date_naive())
    }
}

#[derive(Args)]
struct FilterArgs {
    /// Free-text search
    #[arg(long, short)]
    query: Option<String>,
    #[arg(long = "age-group")]
    age_groups: Vec<String>,
    #[arg(long = "theme")]
    themes: Vec<String>,
    #[arg(long = "place")]
    places: Vec<String>,
    #[arg(long = "date")]
    dates: Vec<NaiveDate>,
    #[arg(long)]
    accessible: bool,
    #[arg(long)]
    free: bool,
    #[arg(long, value_enum, default_value_t = KindArg::All)]
    kind: KindArg,
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    All,
    OneTime,
    Recurring,
}

impl FilterArgs {
    fn selection(&self) -> FilterSelection {
        FilterSelection {
            age_groups: self.age_groups.iter().cloned().collect(),
            accessible_only: self.accessible,
            free_only: self.free,
            event_kind: match self.kind {
                KindArg::All => EventKindFilter::All,
                KindArg::OneTime => EventKindFilter::OneTime,
                KindArg::Recurring => EventKindFilter::Recurring,
            },
            themes: self.themes.iter().cloned().collect(),
            places: self.places.iter().cloned().collect(),
            dates: self.dates.iter().copied().collect(),
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn use_case(events: &PathBuf, config: DiscoveryConfig) -> Result<DiscoveryUseCase> {
    let store = InMemoryRecordStore::from_json_file(events)
        .await
        .with_context(|| format!("Failed to load events from {}", events.display()))?;
    Ok(DiscoveryUseCase::new(Arc::new(store), config))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    let _guard = logging::init_logging(&cli.log_level);

    let config = DiscoveryConfig::load_from(&cli.config)
        .with_context(|| format!("Failed to load config from {}", cli.config.display()))?;
    info!(locale = ?config.locale, api_base_url = %config.api_base_url, "Loaded configuration");

    match cli.command {
        Commands::Facets(source) => {
            let snapshot = use_case(&source.events, config).await?.snapshot(source.today()).await?;
            print_json(snapshot.facets())?;
        }
        Commands::List { source, filters } => {
            let snapshot = use_case(&source.events, config).await?.snapshot(source.today()).await?;
            let listing = snapshot.listing(&filters.selection(), filters.query.as_deref());
            info!(matched = listing.matched, today = listing.buckets.today.len(), "Listing ready");
            print_json(&listing)?;
        }
        Commands::Related { id, source } => {
            let related = use_case(&source.events, config).await?.related(&id, source.today()).await?;
            print_json(&related)?;
        }
        Commands::Venues { venues } => {
            let store = InMemoryRecordStore::default()
                .with_venues_file(&venues)
                .await
                .with_context(|| format!("Failed to load venues from {}", venues.display()))?;
            let venues = DiscoveryUseCase::new(Arc::new(store), config).venues().await?;
            print_json(&venues)?;
        }
    }
    Ok(())
}
