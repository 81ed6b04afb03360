use std::str::FromStr;

use crate::error::{AppError, Result};
use crate::rating::category::RatingCategory;

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 10.0;
pub const DEFAULT_SCORE: f64 = 10.0;

const STEP_TOLERANCE: f64 = 1e-9;

/// A user's verdict on one track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackRating {
    pub score: f64,
    pub skit: bool,
    pub best: bool,
    pub worst: bool,
}

impl Default for TrackRating {
    fn default() -> Self {
        Self {
            score: DEFAULT_SCORE,
            skit: false,
            best: false,
            worst: false,
        }
    }
}

impl TrackRating {
    pub fn scored(score: f64) -> Result<Self> {
        if !score.is_finite() || !(MIN_SCORE..=MAX_SCORE).contains(&score) {
            return Err(AppError::InvalidRating(format!(
                "{} is outside {}-{}",
                score, MIN_SCORE, MAX_SCORE
            )));
        }

        // 0.1 steps only; the legend bands (e.g. 7-8.9) assume it
        let tenths = score * 10.0;
        if (tenths - tenths.round()).abs() > STEP_TOLERANCE {
            return Err(AppError::InvalidRating(format!(
                "{} has more than one decimal place",
                score
            )));
        }

        Ok(Self {
            score,
            ..Self::default()
        })
    }

    pub fn skit() -> Self {
        Self {
            score: MIN_SCORE,
            skit: true,
            ..Self::default()
        }
    }

    pub fn category(&self) -> RatingCategory {
        RatingCategory::for_rating(self)
    }
}

/// Accepts `7.5`, `9!best`, `2!worst`, `skit` or `s`.
impl FromStr for TrackRating {
    type Err = AppError;

    fn from_str(input: &str) -> Result<Self> {
        let input = input.trim().to_lowercase();

        if input == "s" || input == "skit" {
            return Ok(Self::skit());
        }

        let mut parts = input.split('!').map(str::trim);
        let score_part = parts.next().unwrap_or_default();
        let score: f64 = score_part
            .parse()
            .map_err(|_| AppError::InvalidRating(format!("'{}' is not a number", score_part)))?;

        let mut rating = Self::scored(score)?;
        for flag in parts {
            match flag {
                "best" | "b" => rating.best = true,
                "worst" | "w" => rating.worst = true,
                other => {
                    return Err(AppError::InvalidRating(format!("unknown flag '!{}'", other)));
                }
            }
        }

        if rating.best && rating.worst {
            return Err(AppError::InvalidRating(
                "a track cannot be both best and worst".into(),
            ));
        }

        Ok(rating)
    }
}

/// Parse a comma-separated rating list, one entry per track.
pub fn parse_rating_list(list: &str, expected: usize) -> Result<Vec<TrackRating>> {
    let ratings = list
        .split(',')
        .map(str::parse::<TrackRating>)
        .collect::<Result<Vec<_>>>()?;

    if ratings.len() != expected {
        return Err(AppError::InvalidRating(format!(
            "expected {} ratings, got {}",
            expected,
            ratings.len()
        )));
    }

    Ok(ratings)
}

/// Mean score of every non-skit rating, or 0 when nothing is scored.
pub fn average_rating<'a>(ratings: impl IntoIterator<Item = &'a TrackRating>) -> f64 {
    let (sum, count) = ratings
        .into_iter()
        .filter(|r| !r.skit)
        .fold((0.0, 0usize), |(sum, count), r| (sum + r.score, count + 1));

    if count == 0 { 0.0 } else { sum / count as f64 }
}

#[derive(Debug, Clone)]
pub struct RatedTrack {
    pub name: String,
    pub rating: TrackRating,
}

impl RatedTrack {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rating: TrackRating::default(),
        }
    }

    pub fn category(&self) -> RatingCategory {
        self.rating.category()
    }
}

#[derive(Debug, Clone)]
pub struct AlbumSummary {
    pub artist: String,
    pub album: String,
    pub cover_url: Option<String>,
    pub tracks: Vec<RatedTrack>,
}

impl AlbumSummary {
    pub fn average_rating(&self) -> f64 {
        average_rating(self.tracks.iter().map(|t| &t.rating))
    }

    /// Average rounded to two decimals, as printed on the graphic.
    pub fn rounded_average(&self) -> f64 {
        (self.average_rating() * 100.0).round() / 100.0
    }

    pub fn apply_ratings(&mut self, ratings: &[TrackRating]) -> Result<()> {
        if ratings.len() != self.tracks.len() {
            return Err(AppError::InvalidRating(format!(
                "expected {} ratings, got {}",
                self.tracks.len(),
                ratings.len()
            )));
        }

        for (track, rating) in self.tracks.iter_mut().zip(ratings) {
            track.rating = *rating;
        }
        Ok(())
    }
}
