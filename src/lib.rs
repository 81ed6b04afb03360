pub mod config;
pub mod error;
pub mod matcher;
pub mod rating;
pub mod render;
pub mod session;
pub mod spotify;

pub use config::Config;
pub use error::{AppError, Result};
pub use matcher::{MatchMethod, clean_track_name, match_album};
pub use rating::{AlbumSummary, RatedTrack, RatingCategory, TrackRating};
pub use render::{Fonts, Renderer};
pub use session::RatingSession;
pub use spotify::{Catalog, SpotifyAlbum, SpotifyArtist, SpotifyClient, SpotifyTrack};
