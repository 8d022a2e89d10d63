//! TeamLens - team number detection and directory enrichment
//!
//! Command-line front end: scan a recorded OCR result, look up teams and
//! their quick stats, and manage the lookup cache.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::info;
use tracing_subscriber::EnvFilter;

use team_lens::config::{self, AppConfig};
use team_lens::directory::{team_page_url, HttpDirectoryClient, TeamDirectory};
use team_lens::enrichment::EnrichmentCoordinator;
use team_lens::overlay;
use team_lens::shared::frame_mailbox;
use team_lens::storage::{self, FileStore};
use team_lens::vision::{FrameSize, NumberExtractor, RecognitionResult};

/// TeamLens - find team numbers in camera frames and look them up
#[derive(Parser, Debug)]
#[command(name = "team-lens")]
#[command(about = "Team number detection and directory enrichment")]
struct Args {
    /// Config file (defaults to config.toml in the platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract, resolve and lay out team numbers from a recognition result
    Scan {
        /// Recognition result JSON for one frame
        #[arg(long)]
        frame: PathBuf,
        /// Landscape frame width
        #[arg(long)]
        width: f64,
        /// Landscape frame height
        #[arg(long)]
        height: f64,
        /// Preview width (defaults to the rotated frame width)
        #[arg(long)]
        preview_width: Option<f64>,
        /// Preview height (defaults to the rotated frame height)
        #[arg(long)]
        preview_height: Option<f64>,
    },
    /// Show directory info for a team
    Team { number: String },
    /// Show quick stats for a team
    Stats {
        number: String,
        /// Season year (current season when omitted)
        #[arg(long)]
        season: Option<u32>,
    },
    /// Forget every cached lookup
    ClearCache,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let config = load_or_create_config(args.config.as_ref())?;
    let directory = build_directory(&config)?;

    match args.command {
        Command::Scan {
            frame,
            width,
            height,
            preview_width,
            preview_height,
        } => {
            let frame_size = FrameSize::new(width, height);
            let portrait = frame_size.rotated();
            let preview = FrameSize::new(
                preview_width.unwrap_or(portrait.width),
                preview_height.unwrap_or(portrait.height),
            );
            run_scan(&config, directory, &frame, frame_size, preview).await?;
        }
        Command::Team { number } => match directory.get_team_info(&number).await {
            Some(team) => {
                println!("{} {}", team.number, team.name);
                if let Some(location) = team.location() {
                    println!("  {}", location);
                }
                println!(
                    "  {}",
                    team_page_url(&config.overlay.team_page_template, &team.number)
                );
            }
            None => println!("Team {} not found", number),
        },
        Command::Stats { number, season } => match directory.get_quick_stats(&number, season).await {
            Some(stats) => {
                for (label, line) in stats.rows() {
                    println!("{:<24}{:>10}  {}", label, line.value_label(), line.rank_label());
                }
            }
            None => println!("No stats available for team {}", number),
        },
        Command::ClearCache => {
            let before = directory.cache_summary().await;
            directory.clear_cache().await;
            println!(
                "Cleared {} teams, {} not-found entries, {} stats entries",
                before.teams, before.not_found, before.stats
            );
        }
    }

    Ok(())
}

/// Load configuration from file or fall back to defaults
fn load_or_create_config(explicit: Option<&PathBuf>) -> Result<AppConfig> {
    if let Some(path) = explicit {
        let config = config::load_config(path)?;
        info!("Loaded configuration from {:?}", path);
        return Ok(config);
    }

    if let Ok(config_dir) = storage::get_config_dir() {
        let config_path = config_dir.join("config.toml");
        if config_path.exists() {
            let config = config::load_config(&config_path)?;
            info!("Loaded configuration from {:?}", config_path);
            return Ok(config);
        }
    }
    info!("Using default configuration");
    Ok(AppConfig::default())
}

fn build_directory(config: &AppConfig) -> Result<TeamDirectory> {
    let client = Arc::new(HttpDirectoryClient::new(&config.directory)?);

    if !config.cache.persist {
        return Ok(TeamDirectory::in_memory(client));
    }

    let cache_dir = storage::get_cache_dir(config.cache.dir.as_ref())?;
    let store = Arc::new(FileStore::new(&cache_dir)?);
    info!("Using lookup cache at {:?}", cache_dir);
    Ok(TeamDirectory::new(client, store))
}

/// Run one frame through the same path the live pipeline uses
async fn run_scan(
    config: &AppConfig,
    directory: TeamDirectory,
    frame: &Path,
    frame_size: FrameSize,
    preview: FrameSize,
) -> Result<()> {
    let recognition = RecognitionResult::load(frame)?;
    let extractor = NumberExtractor::from_settings(&config.detection)?;
    let detections = extractor.extract(&recognition);
    info!("Found {} candidate numbers", detections.len());

    let coordinator = EnrichmentCoordinator::new(Arc::new(directory));
    let mut published = coordinator.subscribe();
    let (sender, receiver) = frame_mailbox();
    let drain = coordinator.spawn_drain(receiver, Handle::current());

    sender.submit(frame_size, detections)?;
    drop(sender);

    published
        .changed()
        .await
        .context("Enrichment stopped before publishing")?;
    let current = published.borrow().clone();

    tokio::task::spawn_blocking(move || drain.join())
        .await?
        .map_err(|_| anyhow::anyhow!("Enrichment drain thread panicked"))?;

    let items = overlay::layout(&current, preview, &config.overlay);
    if items.is_empty() {
        println!("No teams recognised");
    }
    for item in items {
        println!(
            "{:<6} {:<32} at ({:.1}, {:.1}) {:.1}x{:.1} {:+.1}° font {} {}",
            item.number,
            item.label.lines().nth(1).unwrap_or_default(),
            item.rect.origin.x,
            item.rect.origin.y,
            item.rect.width,
            item.rect.height,
            item.rect.angle_degrees(),
            item.font_size,
            item.team_page,
        );
    }

    let stats = coordinator.stats();
    info!("Lookups: {}, unresolved: {}", stats.lookups, stats.unresolved);
    Ok(())
}
