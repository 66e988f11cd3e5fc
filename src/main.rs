use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use daily_song::search::normalize_paging;
use daily_song::server::{self, AppState};
use daily_song::{Alerter, Config, DailySelector, PlaylistSearch, ResultCache, catalog};

#[derive(Parser)]
#[command(name = "daily-song")]
#[command(about = "Daily guess-the-song backend")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// Address to listen on (or set BIND_ADDR env var)
        #[arg(long)]
        bind: Option<String>,
    },

    /// Show the answer for a playlist on a given day
    Song {
        /// Catalog playlist id
        playlist_id: String,

        /// Date to resolve (ISO-8601); defaults to today
        #[arg(long)]
        date: Option<String>,
    },

    /// Search the catalog for playlists
    Search {
        /// Free text, playlist id or playlist URL
        query: String,

        #[arg(long)]
        offset: Option<String>,

        #[arg(long)]
        limit: Option<String>,
    },

    /// Show setup guide
    Setup,
}

fn setup_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_tracing(cli.verbose);

    match cli.command {
        Commands::Serve { bind } => {
            serve(bind).await?;
        }
        Commands::Song { playlist_id, date } => {
            show_song(&playlist_id, date.as_deref()).await?;
        }
        Commands::Search {
            query,
            offset,
            limit,
        } => {
            search(&query, offset.as_deref(), limit.as_deref()).await?;
        }
        Commands::Setup => {
            show_setup_guide();
        }
    }

    Ok(())
}

fn load_config() -> Result<Config> {
    let config = Config::from_env().context("Failed to load configuration")?;

    let missing = config.get_missing_config();
    if !missing.is_empty() {
        println!("{}", "Missing configuration:".red());
        for item in &missing {
            println!("   - {}", item);
        }
        println!(
            "\n{}",
            "Run `daily-song setup` to see the required settings.".yellow()
        );
        std::process::exit(1);
    }

    Ok(config)
}

async fn serve(bind: Option<String>) -> Result<()> {
    let config = load_config()?;
    let provider = catalog::connect(&config)
        .await
        .context("Failed to connect to the catalog")?;

    let alerter = Alerter::from_config(&config);
    if !alerter.is_enabled() {
        println!("{}", "Pushover not configured - alerts disabled".yellow());
    }

    let bind_addr = bind.unwrap_or_else(|| config.bind_addr.clone());
    println!(
        "{} {} ({} catalog)",
        "Serving on".cyan().bold(),
        bind_addr,
        config.provider
    );

    server::serve(AppState::new(provider, alerter), &bind_addr)
        .await
        .context("Server failed")?;

    Ok(())
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

async fn show_song(playlist_id: &str, date: Option<&str>) -> Result<()> {
    let config = load_config()?;
    let provider = catalog::connect(&config)
        .await
        .context("Failed to connect to the catalog")?;
    let selector = DailySelector::new(provider, Arc::new(ResultCache::new()));

    let pb = spinner(&format!("Fetching playlist {}", playlist_id));
    let result = selector.resolve(playlist_id, date).await;
    pb.finish_and_clear();
    let result = result.context("Failed to resolve the daily song")?;

    println!("{}", result.playlist.name.cyan().bold());
    println!("{}", "=".repeat(50));
    println!(
        "Answer: {} ({})",
        result.answer.formatted.green(),
        result.answer.year
    );
    println!("Preview: {}", result.answer.preview_url);
    println!(
        "\n{}",
        format!("Options: {} tracks", result.options.len()).cyan()
    );

    Ok(())
}

async fn search(query: &str, offset: Option<&str>, limit: Option<&str>) -> Result<()> {
    let config = load_config()?;
    let provider = catalog::connect(&config)
        .await
        .context("Failed to connect to the catalog")?;
    let (offset, limit) = normalize_paging(offset, limit);

    let response = PlaylistSearch::new(provider)
        .search(Some(query), offset, limit)
        .await
        .context("Search failed")?;

    if response.playlists.items.is_empty() {
        println!("{}", "No playlists found".yellow());
        return Ok(());
    }

    for (i, playlist) in response.playlists.items.iter().enumerate() {
        println!(
            "{:2}. {} [{}] by {}",
            response.playlists.offset as usize + i + 1,
            playlist.name.green(),
            playlist.id,
            playlist.owner.display_name
        );
        if !playlist.description.is_empty() {
            println!("     {}", playlist.description.cyan());
        }
    }

    println!(
        "\n{}",
        format!("Total: {} playlists", response.playlists.total).cyan()
    );

    Ok(())
}

fn show_setup_guide() {
    println!("{}", "Daily Song Setup Guide".cyan().bold());
    println!("{}", "=".repeat(50));

    println!("\n{}", "1. Choose a catalog".yellow());
    println!("   - CATALOG_PROVIDER=deezer (default) or spotify");

    println!("\n{}", "2. Deezer via RapidAPI".yellow());
    println!("   - Subscribe to deezerdevs-deezer on https://rapidapi.com/");
    println!("   - X_RAPIDAPI_KEY_DEEZER=your_rapidapi_key");

    println!("\n{}", "3. Spotify".yellow());
    println!("   - Go to https://developer.spotify.com/dashboard/ and create an app");
    println!("   - SPOTIFY_CLIENT_ID=your_spotify_client_id");
    println!("   - SPOTIFY_CLIENT_SECRET=your_spotify_client_secret");

    println!("\n{}", "4. Optional".yellow());
    println!("   - PUSHOVER_TOKEN / PUSHOVER_USER   (error alerts)");
    println!("   - BIND_ADDR=127.0.0.1:8080");
    println!("   - HTTP_TIMEOUT_SECS=10");

    println!("\n{}", "5. Usage".yellow());
    println!("   - daily-song serve                       (run the API)");
    println!("   - daily-song song 908622995              (today's answer)");
    println!("   - daily-song song 908622995 --date 2024-03-05");
    println!("   - daily-song search \"https://www.deezer.com/fr/playlist/908622995\"");

    println!("\n{}", "Ready to play!".green());
}
