use std::path::PathBuf;

use chrono::{DateTime, Local};
use colored::Colorize;

use crate::rating::AlbumSummary;
use crate::spotify::SpotifyAlbum;

fn sanitize(component: &str) -> String {
    let cleaned: String = component
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect();

    let collapsed = cleaned
        .split('_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_");

    if collapsed.is_empty() {
        "untitled".to_string()
    } else {
        collapsed
    }
}

/// `album_rating_{artist}_{album}_{timestamp}.png` in the working directory.
pub fn default_output_path(summary: &AlbumSummary, now: DateTime<Local>) -> PathBuf {
    PathBuf::from(format!(
        "album_rating_{}_{}_{}.png",
        sanitize(&summary.artist),
        sanitize(&summary.album),
        now.format("%Y%m%d_%H%M%S")
    ))
}

pub fn print_tracklist(summary: &AlbumSummary) {
    println!(
        "{} - {}",
        summary.artist.cyan().bold(),
        summary.album.cyan()
    );
    for (i, track) in summary.tracks.iter().enumerate() {
        println!("{:2}. {}", i + 1, track.name);
    }
}

pub fn print_album_list(albums: &[SpotifyAlbum]) {
    for (i, album) in albums.iter().enumerate() {
        let year = album
            .release_date
            .as_deref()
            .and_then(|date| date.get(..4))
            .unwrap_or("----");
        println!(
            "{:2}. {} ({}, {} tracks)",
            i + 1,
            album.name.green(),
            year,
            album.total_tracks
        );
    }

    println!("\n{}", format!("Total: {} albums", albums.len()).cyan());
}

pub fn print_summary(summary: &AlbumSummary) {
    println!();
    println!("{}", "=".repeat(60));
    println!(
        "{}",
        format!("{} - {}", summary.artist, summary.album).bold()
    );
    println!("{}", "=".repeat(60));

    for (i, track) in summary.tracks.iter().enumerate() {
        let category = track.category();
        let [r, g, b] = category.rgb();
        let score = if track.rating.skit {
            "-".to_string()
        } else {
            format!("{:.1}", track.rating.score)
        };
        let badge = if track.rating.best {
            " (best)"
        } else if track.rating.worst {
            " (worst)"
        } else {
            ""
        };

        println!(
            "{:2}. {:<40} {:>4}  {}{}",
            i + 1,
            track.name,
            score,
            category.label().truecolor(r, g, b),
            badge
        );
    }

    println!("{}", "=".repeat(60));
    println!("Average rating: {}/10", summary.rounded_average().to_string().bold());
}
