pub mod category;
pub mod model;

pub use category::RatingCategory;
pub use model::{AlbumSummary, RatedTrack, TrackRating, average_rating, parse_rating_list};
