//! adlens - ad account performance explorer
//!
//! Lists an account's video or static ads with filters and metric columns, analyzes
//! selections of them, and runs the templated chat assistant.
//!
//! Uses XDG Base Directory specification for file locations:
//! - Config: $XDG_CONFIG_HOME/adlens/config.toml (~/.config/adlens/config.toml)
//! - Logs: $XDG_STATE_HOME/adlens/adlens.log (~/.local/state/adlens/adlens.log)

mod render;

use adlens_core::config::ChatConfig;
use adlens_core::format::parse_formatted_number;
use adlens_core::metrics_registry::{available_metrics, default_metrics, find_metric};
use adlens_core::provider::provider_for;
use adlens_core::{
    analyze, AdListing, AdProvider, AdType, ChatSession, Config, FilterCondition, Selection,
    SpendRange,
};
use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "adlens")]
#[command(about = "Explore and analyze ad account performance")]
#[command(version)]
struct Cli {
    /// Directory of `<account>/<video|static>.json` files (overrides config)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List account ids
    Accounts,

    /// Show default, selected and available metrics for an ad type
    Metrics {
        /// Ad type: video or static
        #[arg(long = "type", default_value = "video")]
        ad_type: String,

        /// Metric ids to add on top of the defaults
        #[arg(long = "select")]
        select: Vec<String>,
    },

    /// List the ads passing the filters
    Ads {
        #[command(flatten)]
        filter: FilterArgs,

        /// Extra metric columns to show
        #[arg(long = "metric")]
        metrics: Vec<String>,

        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Analyze a selection of the visible ads
    Analyze {
        /// What to analyze
        #[arg(value_enum)]
        kind: AnalyzeKind,

        #[command(flatten)]
        filter: FilterArgs,

        /// Metric ids for a column analysis (defaults to the table's columns)
        #[arg(long = "metric")]
        metrics: Vec<String>,

        /// Cells for a cell analysis, as AD_ID:METRIC_ID
        #[arg(long = "cell")]
        cells: Vec<String>,

        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Chat with the assistant about the visible ads
    Chat {
        #[command(flatten)]
        filter: FilterArgs,

        /// Messages to send, in order
        #[arg(short, long = "message")]
        messages: Vec<String>,

        /// Reply delay in milliseconds (overrides config)
        #[arg(long)]
        delay_ms: Option<u64>,
    },
}

/// Listing filters shared by the data commands.
#[derive(Args)]
struct FilterArgs {
    /// Account id
    #[arg(short, long, default_value = "1")]
    account: String,

    /// Ad type: video or static
    #[arg(long = "type", default_value = "video")]
    ad_type: String,

    /// Case-insensitive substring of the ad name
    #[arg(short, long)]
    search: Option<String>,

    /// Status: all, active, paused or completed
    #[arg(long, default_value = "all")]
    status: String,

    /// Lower spend bound, e.g. 1,300
    #[arg(long)]
    min_spend: Option<String>,

    /// Upper spend bound, e.g. 8,300
    #[arg(long)]
    max_spend: Option<String>,

    /// Condition as "field operator value", e.g. "ctr greater_than 2.5"
    #[arg(short = 'w', long = "where")]
    conditions: Vec<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum AnalyzeKind {
    Rows,
    Columns,
    Cells,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Ensure XDG environment variables are set before using core library
    Config::ensure_xdg_env();

    // Load configuration
    let mut config = Config::load().context("failed to load configuration")?;
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }

    // Initialize logging
    let _log_guard =
        adlens_core::logging::init(&config.logging).context("failed to initialize logging")?;

    let data_dir = cli.data_dir.clone().or_else(|| config.data.dir.clone());
    tracing::info!(data_dir = ?data_dir, "adlens starting");
    let provider = provider_for(data_dir.as_deref());

    match cli.command {
        Command::Accounts => {
            let accounts = provider.accounts().context("failed to list accounts")?;
            if accounts.is_empty() {
                println!("No accounts found.");
            }
            for account in accounts {
                println!("{}", account);
            }
        }
        Command::Metrics { ad_type, select } => run_metrics(&ad_type, &select)?,
        Command::Ads {
            filter,
            metrics,
            format,
        } => {
            let mut listing = build_listing(provider.as_ref(), &filter, &config)?;
            for id in &metrics {
                listing
                    .add_metric_id(id)
                    .with_context(|| format!("invalid --metric {}", id))?;
            }
            match format {
                OutputFormat::Text => print!("{}", render::ads_table(&listing)),
                OutputFormat::Json => {
                    let json = serde_json::to_string_pretty(&listing.visible_ads())
                        .context("failed to serialize ads")?;
                    println!("{}", json);
                }
            }
        }
        Command::Analyze {
            kind,
            filter,
            metrics,
            cells,
            format,
        } => {
            let listing = build_listing(provider.as_ref(), &filter, &config)?;
            let selection = build_selection(&listing, kind, &metrics, &cells)?;
            let result = analyze(&selection, &config.analysis);
            match format {
                OutputFormat::Text => print!("{}", render::analysis(&selection, &result)),
                OutputFormat::Json => {
                    let json = serde_json::to_string_pretty(&result)
                        .context("failed to serialize analysis")?;
                    println!("{}", json);
                }
            }
        }
        Command::Chat {
            filter,
            messages,
            delay_ms,
        } => {
            let listing = build_listing(provider.as_ref(), &filter, &config)?;
            let chat_config = ChatConfig {
                reply_delay_ms: delay_ms.unwrap_or(config.chat.reply_delay_ms),
            };
            run_chat(listing.analyze_selected(), &chat_config, &messages)?;
        }
    }

    Ok(())
}

fn parse_ad_type(ad_type: &str) -> Result<AdType> {
    ad_type
        .parse()
        .with_context(|| format!("invalid --type {}", ad_type))
}

/// Build the listing page state from the command-line filters.
fn build_listing(
    provider: &dyn AdProvider,
    args: &FilterArgs,
    config: &Config,
) -> Result<AdListing> {
    let ad_type = parse_ad_type(&args.ad_type)?;
    let mut listing = AdListing::load(provider, &args.account, ad_type, &config.filter)
        .with_context(|| format!("failed to load {} ads for account {}", ad_type, args.account))?;

    if let Some(search) = &args.search {
        listing.set_search_term(search.as_str());
    }
    listing
        .set_status_filter(&args.status)
        .with_context(|| format!("invalid --status {}", args.status))?;

    let conditions = args
        .conditions
        .iter()
        .map(|c| c.parse::<FilterCondition>())
        .collect::<adlens_core::Result<Vec<_>>>()
        .context("invalid --where condition")?;

    let current = listing.spend_range();
    let min = args
        .min_spend
        .as_deref()
        .map(parse_formatted_number)
        .unwrap_or(current.min);
    let max = args
        .max_spend
        .as_deref()
        .map(parse_formatted_number)
        .unwrap_or(current.max);
    let spend_range = SpendRange::new(min, max).context("invalid spend range")?;

    listing
        .apply_advanced_filter(conditions, spend_range)
        .context("invalid --where condition")?;
    Ok(listing)
}

fn build_selection(
    listing: &AdListing,
    kind: AnalyzeKind,
    metrics: &[String],
    cells: &[String],
) -> Result<Selection> {
    match kind {
        AnalyzeKind::Rows => Ok(listing.analyze_selected()),
        AnalyzeKind::Columns => {
            let ids: Vec<String> = if metrics.is_empty() {
                listing
                    .selected_metrics()
                    .iter()
                    .map(|m| m.id.to_string())
                    .collect()
            } else {
                metrics.to_vec()
            };
            listing
                .select_columns(&ids)
                .context("invalid --metric for column analysis")
        }
        AnalyzeKind::Cells => {
            let mut pairs = Vec::with_capacity(cells.len());
            for cell in cells {
                match cell.split_once(':') {
                    Some((ad_id, metric_id)) if !ad_id.is_empty() && !metric_id.is_empty() => {
                        pairs.push((ad_id, metric_id))
                    }
                    _ => bail!("invalid --cell {:?}, expected AD_ID:METRIC_ID", cell),
                }
            }
            listing
                .select_cells(&pairs)
                .context("invalid --cell for cell analysis")
        }
    }
}

fn run_metrics(ad_type: &str, select: &[String]) -> Result<()> {
    let ad_type = parse_ad_type(ad_type)?;
    let mut selected = default_metrics(ad_type);
    for id in select {
        let metric = find_metric(ad_type, id).with_context(|| format!("invalid --select {}", id))?;
        if !selected.iter().any(|m| m.id == metric.id) {
            selected.push(metric);
        }
    }

    println!("{}", ad_type.display_name());
    println!("\nDefault:");
    print!("{}", render::metric_list(&default_metrics(ad_type)));
    println!("\nSelected:");
    print!("{}", render::metric_list(&selected));
    println!("\nAvailable:");
    print!("{}", render::metric_list(&available_metrics(ad_type, &selected)));
    Ok(())
}

fn run_chat(selection: Selection, config: &ChatConfig, messages: &[String]) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("failed to start async runtime")?;

    runtime.block_on(async {
        let mut session = ChatSession::new(Some(selection), config);
        if let Some(opening) = session.last_message() {
            println!("{}", render::chat_message(&opening));
        }

        for message in messages {
            if !session.send(message) {
                tracing::debug!("Skipped blank message");
                continue;
            }
            if let Some(sent) = session.last_message() {
                println!("{}", render::chat_message(&sent));
            }
            session.wait_for_reply().await;
            if let Some(reply) = session.last_message() {
                println!("{}", render::chat_message(&reply));
            }
        }
    });
    Ok(())
}
