use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing::{info, warn};

use crate::error::{AppError, Result};
use crate::matcher::{clean_track_name, match_album};
use crate::rating::{AlbumSummary, RatedTrack};
use crate::render::Renderer;
use crate::spotify::{Catalog, SpotifyAlbum, SpotifyClient};

/// One fetch-rate-render pass against a catalog.
pub struct RatingSession<C: Catalog> {
    catalog: C,
}

impl<C: Catalog> RatingSession<C> {
    pub fn new(catalog: C) -> Self {
        Self { catalog }
    }

    /// Find an album by name (or Spotify link) for the given artist.
    ///
    /// Album search results are tried first; if none of them match, the
    /// artist's full discography is listed and matched instead.
    pub async fn resolve_album(&self, artist: &str, album: &str) -> Result<SpotifyAlbum> {
        if SpotifyClient::is_album_link(album) {
            let album_id = SpotifyClient::parse_album_url(album)?;
            return self
                .catalog
                .album(&album_id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("album {}", album_id)));
        }

        let candidates = self.catalog.search_albums(artist, album).await?;
        if let Some((found, method)) = match_album(&candidates, album) {
            info!("Resolved album '{}' via search ({} match)", found.name, method);
            return Ok(found.clone());
        }

        let artist_record = self
            .catalog
            .search_artist(artist)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("artist '{}'", artist)))?;

        let discography = self.catalog.artist_albums(&artist_record.id).await?;
        match match_album(&discography, album) {
            Some((found, method)) => {
                info!(
                    "Resolved album '{}' from {}'s discography ({} match)",
                    found.name, artist_record.name, method
                );
                Ok(found.clone())
            }
            None => Err(AppError::NotFound(format!(
                "album '{}' by {}",
                album, artist_record.name
            ))),
        }
    }

    /// Resolve the album and build an unrated summary with cleaned track names.
    pub async fn fetch_summary(&self, artist: &str, album: &str) -> Result<AlbumSummary> {
        let pb = spinner("Fetching songs...");
        let result = self.build_summary(artist, album).await;
        pb.finish_and_clear();
        result
    }

    async fn build_summary(&self, artist: &str, album: &str) -> Result<AlbumSummary> {
        let resolved = self.resolve_album(artist, album).await?;
        let tracks = self.catalog.album_tracks(&resolved.id).await?;

        if tracks.is_empty() {
            return Err(AppError::NotFound(format!("tracks for '{}'", resolved.name)));
        }

        let tracks: Vec<RatedTrack> = tracks
            .iter()
            .map(|track| RatedTrack::new(clean_track_name(&track.name)))
            .collect();

        info!("Fetched {} songs from '{}'", tracks.len(), resolved.name);

        Ok(AlbumSummary {
            artist: resolved
                .artists
                .first()
                .cloned()
                .unwrap_or_else(|| artist.trim().to_string()),
            album: resolved.name,
            cover_url: resolved.cover_url,
            tracks,
        })
    }

    /// Every album, single and compilation credited to the artist.
    pub async fn list_albums(&self, artist: &str) -> Result<Vec<SpotifyAlbum>> {
        let artist_record = self
            .catalog
            .search_artist(artist)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("artist '{}'", artist)))?;

        let pb = spinner(&format!("Listing albums by {}...", artist_record.name));
        let albums = self.catalog.artist_albums(&artist_record.id).await;
        pb.finish_and_clear();

        albums
    }

    /// Download the cover and render the graphic as PNG bytes.
    ///
    /// A cover that cannot be downloaded is skipped with a warning; one that
    /// downloads but does not decode fails the render.
    pub async fn generate(&self, summary: &AlbumSummary, renderer: &Renderer) -> Result<Vec<u8>> {
        let cover = match &summary.cover_url {
            Some(url) => match self.catalog.fetch_image(url).await {
                Ok(bytes) => Some(bytes),
                Err(e) => {
                    warn!("Could not download cover art, rendering without it: {}", e);
                    None
                }
            },
            None => None,
        };

        renderer.render_png(summary, cover.as_deref())
    }
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
