use crate::error::Result;
use crate::spotify::models::{SpotifyAlbum, SpotifyArtist, SpotifyTrack};

/// Read-only view of the music catalog used by a rating session.
#[allow(async_fn_in_trait)]
pub trait Catalog {
    async fn search_albums(&self, artist: &str, album: &str) -> Result<Vec<SpotifyAlbum>>;

    async fn search_artist(&self, name: &str) -> Result<Option<SpotifyArtist>>;

    async fn artist_albums(&self, artist_id: &str) -> Result<Vec<SpotifyAlbum>>;

    async fn album(&self, album_id: &str) -> Result<Option<SpotifyAlbum>>;

    async fn album_tracks(&self, album_id: &str) -> Result<Vec<SpotifyTrack>>;

    /// Raw bytes of an image, typically album cover art.
    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>>;
}
