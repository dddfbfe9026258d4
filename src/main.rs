//! vidshelf - clean and browse a video catalog from the terminal
//!
//! Loads a JSON catalog once, runs it through the normalization pipeline and
//! prints videos, tag counts or catalog statistics.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use vidshelf::core::categories::top;
use vidshelf::core::thumbnail;
use vidshelf::storage::config;
use vidshelf::types::{Config, DedupeMode, NormalizedVideo, ThumbnailPolicy, UrlStrategy, ViewFilter};
use vidshelf::utils::paths::config_path;
use vidshelf::{Session, VidshelfError};

/// Clean, deduplicate and tag-count a video catalog.
#[derive(Parser, Debug)]
#[command(name = "vidshelf")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Catalog file path or http(s) URL
    #[arg(short, long, global = true)]
    source: Option<String>,

    /// Config file (defaults to $XDG_CONFIG_HOME/vidshelf/config.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Link resolution strategy
    #[arg(long, global = true)]
    strategy: Option<UrlStrategy>,

    /// Duplicate detection mode
    #[arg(long, global = true)]
    dedupe: Option<DedupeMode>,

    /// Thumbnail validation policy
    #[arg(long, global = true)]
    thumbnails: Option<ThumbnailPolicy>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List cleaned videos
    List {
        /// Only videos tagged with this category
        #[arg(long)]
        category: Option<String>,

        /// Title or tag substring
        #[arg(short, long)]
        query: Option<String>,

        /// Limit results
        #[arg(short, long)]
        limit: Option<usize>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Show the most used categories
    Categories {
        /// Number of categories to show (defaults to config top_categories)
        #[arg(short, long)]
        top: Option<usize>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Show link and field coverage of the raw catalog
    Stats,
    /// Check a single thumbnail URL
    CheckThumbnail {
        url: String,
    },
    /// Write the effective configuration to the config file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Apply CLI overrides on top of the loaded config
fn apply_overrides(mut cfg: Config, cli: &Cli) -> Config {
    if let Some(ref source) = cli.source {
        cfg.source = source.clone();
    }
    if let Some(strategy) = cli.strategy {
        cfg.url_strategy = strategy;
    }
    if let Some(mode) = cli.dedupe {
        cfg.dedupe_mode = mode;
    }
    if let Some(policy) = cli.thumbnails {
        cfg.thumbnail_policy = policy;
    }
    cfg
}

fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Format video for display
fn format_video_label(video: &NormalizedVideo) -> String {
    let tags = video
        .categories
        .as_ref()
        .filter(|c| !c.is_empty())
        .map(|c| format!(" [{}]", c.join(", ")))
        .unwrap_or_default();
    format!("{}{}\n    {}", video.title, tags.dimmed(), video.resolved_url.cyan())
}

/// Load the catalog behind a spinner
async fn load_with_spinner(session: &Session) -> anyhow::Result<()> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    spinner.set_message(format!("Loading {}...", session.source()));
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));

    let result = session.catalog().await;
    spinner.finish_and_clear();
    result?;
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let cfg = config::load_config(cli.config.as_deref()).await?;
    let cfg = apply_overrides(cfg, &cli);
    cfg.validate()?;
    init_tracing(&cfg.log_level);

    let mut session = Session::new(&cfg);

    match cli.command {
        Command::List {
            category,
            query,
            limit,
            json,
        } => {
            load_with_spinner(&session).await?;
            session.set_filter(ViewFilter {
                category,
                query,
                limit,
            });
            let view = session.view().await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&view.videos)?);
            } else if view.videos.is_empty() {
                println!("{}", "No videos found.".yellow());
            } else {
                for video in &view.videos {
                    println!("{}", format_video_label(video));
                }
                println!(
                    "{}",
                    format!("{} of {} videos", view.videos.len(), view.matched).dimmed()
                );
            }
        }
        Command::Categories { top: n, json } => {
            load_with_spinner(&session).await?;
            let counts = session.categories().await?;
            let shown = top(&counts, n.unwrap_or(cfg.top_categories));

            if json {
                println!("{}", serde_json::to_string_pretty(shown)?);
            } else if shown.is_empty() {
                println!("{}", "No categories found.".yellow());
            } else {
                for category in shown {
                    println!("{:>6}  {}", category.count.to_string().cyan(), category.name);
                }
            }
        }
        Command::Stats => {
            load_with_spinner(&session).await?;
            let stats = session.stats().await?;
            println!("{} {}", "Total records:".bold(), stats.total);
            println!("  with external_url: {}", stats.with_external_url);
            println!("  with detail_url:   {}", stats.with_detail_url);
            println!("  with both:         {}", stats.with_both_urls);
            println!("  without links:     {}", stats.without_urls);
            println!("  missing fields:    {}", stats.missing_fields);
            println!("{} {}", "Valid records:".green(), stats.valid);
            println!("{} {}", "After cleaning:".green(), session.videos().await?.len());
        }
        Command::CheckThumbnail { url } => {
            // No catalog needed
            if !thumbnail::is_valid(Some(url.as_str()), cfg.thumbnail_policy) {
                println!("{} {}", "✗ invalid:".red(), url);
                return Ok(ExitCode::FAILURE);
            }
            println!("{} {}", "✓ valid:".green(), url);
        }
        Command::InitConfig { force } => {
            let path = cli.config.unwrap_or_else(config_path);
            config::init_config(&cfg, &path, force).await?;
            println!("{} {}", "✓ Wrote".green(), path.display());
        }
    }

    Ok(ExitCode::SUCCESS)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            match e.downcast_ref::<VidshelfError>() {
                Some(err) => eprintln!("{} [{:?}] {}", "Error:".red(), err.code(), err),
                None => eprintln!("{} {}", "Error:".red(), e),
            }
            ExitCode::FAILURE
        }
    }
}
