use std::fs;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use album_rater::rating::parse_rating_list;
use album_rater::session::{self, prompt_ratings};
use album_rater::{AlbumSummary, AppError, Config, Fonts, RatingSession, Renderer, SpotifyClient};

#[derive(Parser)]
#[command(name = "album-rater")]
#[command(about = "Rate an album's tracks and render a summary graphic")]
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
    /// Fetch an album, rate every song and render the graphic
    Rate {
        /// Artist name
        #[arg(long)]
        artist: String,

        /// Album name, Spotify album link or spotify:album: URI
        #[arg(long)]
        album: String,

        /// Comma-separated ratings in track order, e.g. "9,7.5!best,skit,3"
        #[arg(long)]
        ratings: Option<String>,

        /// Where to write the PNG (defaults to album_rating_<artist>_<album>_<time>.png)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show an album's cleaned tracklist
    Tracks {
        /// Artist name
        #[arg(long)]
        artist: String,

        /// Album name, Spotify album link or spotify:album: URI
        #[arg(long)]
        album: String,
    },

    /// List an artist's albums
    Albums {
        /// Artist name
        #[arg(long)]
        artist: String,
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
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_tracing(cli.verbose);

    match cli.command {
        Commands::Rate {
            artist,
            album,
            ratings,
            output,
        } => {
            rate_album(&artist, &album, ratings.as_deref(), output).await?;
        }
        Commands::Tracks { artist, album } => {
            show_tracks(&artist, &album).await?;
        }
        Commands::Albums { artist } => {
            list_albums(&artist).await?;
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
            "Set them in your environment or a .env file (see `album-rater setup`).".yellow()
        );
        std::process::exit(1);
    }

    Ok(config)
}

async fn connect(config: &Config) -> Result<RatingSession<SpotifyClient>> {
    println!("Authenticating with Spotify...");

    match SpotifyClient::new(config).await {
        Ok(client) => Ok(RatingSession::new(client)),
        Err(AppError::Auth(message)) => {
            println!("{}", format!("Authentication failed: {}", message).red());
            std::process::exit(1);
        }
        Err(e) => Err(e).context("Failed to connect to Spotify"),
    }
}

async fn fetch_or_exit(
    rater: &RatingSession<SpotifyClient>,
    artist: &str,
    album: &str,
) -> Result<AlbumSummary> {
    match rater.fetch_summary(artist, album).await {
        Ok(summary) => Ok(summary),
        Err(AppError::NotFound(what)) => {
            println!(
                "{}",
                format!(
                    "Could not fetch songs ({} not found). Please check the artist and album names.",
                    what
                )
                .red()
            );
            std::process::exit(1);
        }
        Err(e) => Err(e).context("Failed to fetch songs"),
    }
}

async fn rate_album(
    artist: &str,
    album: &str,
    ratings: Option<&str>,
    output: Option<PathBuf>,
) -> Result<()> {
    println!("{}", "Album Rating App".cyan().bold());
    println!("{}", "=".repeat(50));

    let config = load_config()?;
    let rater = connect(&config).await?;
    let mut summary = fetch_or_exit(&rater, artist, album).await?;

    println!(
        "{}",
        format!("Fetched {} songs successfully!", summary.tracks.len()).green()
    );

    let ratings = match ratings {
        Some(list) => parse_rating_list(list, summary.tracks.len())?,
        None => prompt_ratings(&summary.tracks, io::stdin().lock(), io::stdout())?,
    };
    summary.apply_ratings(&ratings)?;

    session::print_summary(&summary);

    let renderer = Renderer::new(Fonts::load(
        config.font_regular.as_deref(),
        config.font_bold.as_deref(),
    ));

    let png = match rater.generate(&summary, &renderer).await {
        Ok(png) => png,
        Err(e) => {
            println!(
                "{}",
                format!("An error occurred while generating the graphic: {}", e).red()
            );
            std::process::exit(1);
        }
    };

    let path =
        output.unwrap_or_else(|| session::default_output_path(&summary, chrono::Local::now()));
    fs::write(&path, &png).with_context(|| format!("Failed to write {}", path.display()))?;

    println!(
        "\n{} {}",
        "Graphic saved to".green(),
        path.display().to_string().bold()
    );

    Ok(())
}

async fn show_tracks(artist: &str, album: &str) -> Result<()> {
    let config = load_config()?;
    let rater = connect(&config).await?;
    let summary = fetch_or_exit(&rater, artist, album).await?;

    session::print_tracklist(&summary);

    Ok(())
}

async fn list_albums(artist: &str) -> Result<()> {
    println!("{}", format!("Albums by {}", artist).cyan().bold());
    println!("{}", "=".repeat(50));

    let config = load_config()?;
    let rater = connect(&config).await?;

    let albums = match rater.list_albums(artist).await {
        Ok(albums) => albums,
        Err(AppError::NotFound(what)) => {
            println!("{}", format!("Could not find {}", what).red());
            std::process::exit(1);
        }
        Err(e) => return Err(e).context("Failed to list albums"),
    };

    if albums.is_empty() {
        println!("{}", "No albums found".yellow());
        return Ok(());
    }

    session::print_album_list(&albums);

    Ok(())
}

fn show_setup_guide() {
    println!("{}", "Album Rater Setup Guide".cyan().bold());
    println!("{}", "=".repeat(50));

    println!("\n{}", "1. Spotify API Setup".yellow());
    println!("   - Go to https://developer.spotify.com/dashboard/");
    println!("   - Create a new app");
    println!("   - Copy your Client ID and Client Secret");

    println!("\n{}", "2. Configuration".yellow());
    println!("   - Create a .env file with:");
    println!("     SPOTIFY_CLIENT_ID=your_spotify_client_id");
    println!("     SPOTIFY_CLIENT_SECRET=your_spotify_client_secret");
    println!("   - Optionally point at TrueType fonts for the graphic:");
    println!("     ALBUM_RATER_FONT=/path/to/regular.ttf");
    println!("     ALBUM_RATER_FONT_BOLD=/path/to/bold.ttf");

    println!("\n{}", "3. Usage".yellow());
    println!("   - album-rater albums --artist \"Artist\"                  (list albums)");
    println!("   - album-rater tracks --artist \"Artist\" --album \"Album\"  (show tracklist)");
    println!("   - album-rater rate --artist \"Artist\" --album \"Album\"    (rate interactively)");
    println!("   - album-rater rate ... --ratings \"9,7.5!best,skit\"       (rate in one go)");

    println!("\n{}", "Ready to start rating!".green());
}
