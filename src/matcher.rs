use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use strsim::jaro_winkler;

use crate::spotify::SpotifyAlbum;

/// Credit suffixes stripped from track names, applied in order.
static CREDIT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\s*\((?:feat(?:uring)?|ft)\b\.?[^)]*\)",
        r"(?i)\s*\(with\s[^)]*\)",
        r"(?i)\s*\[(?:feat(?:uring)?|ft)\b\.?[^\]]*\]",
        r"(?i)\s*\[with\s[^\]]*\]",
        r"(?i)\s+-?\s*(?:feat(?:uring)?\.?|ft\.)\s.*$",
        r"(?i)\s+-\s+with\s.*$",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("credit pattern is valid"))
    .collect()
});

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchMethod {
    Exact,
    Substring,
}

impl fmt::Display for MatchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchMethod::Exact => write!(f, "Exact"),
            MatchMethod::Substring => write!(f, "Substring"),
        }
    }
}

/// Remove featured/with-artist credits from a track name.
pub fn clean_track_name(track_name: &str) -> String {
    let mut cleaned = track_name.to_string();
    for pattern in CREDIT_PATTERNS.iter() {
        cleaned = pattern.replace_all(&cleaned, "").into_owned();
    }
    let cleaned = cleaned.trim();

    // A name that is nothing but a credit keeps its original text
    if cleaned.is_empty() {
        track_name.trim().to_string()
    } else {
        cleaned.to_string()
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Resolve an album by name: exact case-insensitive match first, then the
/// closest substring match by Jaro-Winkler similarity.
pub fn match_album<'a>(
    albums: &'a [SpotifyAlbum],
    wanted: &str,
) -> Option<(&'a SpotifyAlbum, MatchMethod)> {
    let wanted = normalize(wanted);
    if wanted.is_empty() {
        return None;
    }

    if let Some(album) = albums.iter().find(|a| normalize(&a.name) == wanted) {
        return Some((album, MatchMethod::Exact));
    }

    let mut best_match: Option<&SpotifyAlbum> = None;
    let mut best_score: f64 = -1.0;

    for album in albums {
        let name = normalize(&album.name);
        if name.is_empty() || !(name.contains(&wanted) || wanted.contains(&name)) {
            continue;
        }

        let score = jaro_winkler(&name, &wanted);
        if score > best_score {
            best_score = score;
            best_match = Some(album);
        }
    }

    best_match.map(|album| (album, MatchMethod::Substring))
}
