pub mod catalog;
pub mod client;
pub mod models;
pub mod pagination;

pub use catalog::Catalog;
pub use client::SpotifyClient;
pub use models::{Page, SpotifyAlbum, SpotifyArtist, SpotifyTrack};
pub use pagination::collect_pages;
