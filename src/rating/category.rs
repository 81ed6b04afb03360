use std::fmt;

use crate::rating::model::TrackRating;

/// Discrete rating bucket shown on the graphic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RatingCategory {
    Amazing,
    Great,
    Good,
    Meh,
    Bad,
    Skit,
}

impl RatingCategory {
    /// Legend order, best to worst with skits last.
    pub const ALL: [RatingCategory; 6] = [
        RatingCategory::Amazing,
        RatingCategory::Great,
        RatingCategory::Good,
        RatingCategory::Meh,
        RatingCategory::Bad,
        RatingCategory::Skit,
    ];

    /// Map a 0-10 score onto its band. Lower bounds are inclusive.
    pub fn from_score(score: f64) -> Self {
        if score >= 9.0 {
            RatingCategory::Amazing
        } else if score >= 7.0 {
            RatingCategory::Great
        } else if score >= 5.0 {
            RatingCategory::Good
        } else if score >= 3.0 {
            RatingCategory::Meh
        } else {
            RatingCategory::Bad
        }
    }

    pub fn for_rating(rating: &TrackRating) -> Self {
        if rating.skit {
            RatingCategory::Skit
        } else {
            Self::from_score(rating.score)
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RatingCategory::Amazing => "Amazing",
            RatingCategory::Great => "Great",
            RatingCategory::Good => "Good",
            RatingCategory::Meh => "Meh",
            RatingCategory::Bad => "Bad",
            RatingCategory::Skit => "Skit",
        }
    }

    /// Score range as printed in the legend.
    pub fn band(self) -> &'static str {
        match self {
            RatingCategory::Amazing => "9-10",
            RatingCategory::Great => "7-8.9",
            RatingCategory::Good => "5-6.9",
            RatingCategory::Meh => "3-4.9",
            RatingCategory::Bad => "0-2.9",
            RatingCategory::Skit => "unrated",
        }
    }

    pub fn hex(self) -> &'static str {
        match self {
            RatingCategory::Amazing => "#32CD32",
            RatingCategory::Great => "#00BFFF",
            RatingCategory::Good => "#FFD700",
            RatingCategory::Meh => "#FFA500",
            RatingCategory::Bad => "#FF4500",
            RatingCategory::Skit => "#808080",
        }
    }

    pub fn rgb(self) -> [u8; 3] {
        match self {
            RatingCategory::Amazing => [0x32, 0xCD, 0x32],
            RatingCategory::Great => [0x00, 0xBF, 0xFF],
            RatingCategory::Good => [0xFF, 0xD7, 0x00],
            RatingCategory::Meh => [0xFF, 0xA5, 0x00],
            RatingCategory::Bad => [0xFF, 0x45, 0x00],
            RatingCategory::Skit => [0x80, 0x80, 0x80],
        }
    }
}

impl fmt::Display for RatingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
