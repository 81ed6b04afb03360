use serde::Deserialize;

#[derive(Debug, Clone)]
pub struct SpotifyTrack {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct SpotifyAlbum {
    pub id: String,
    pub name: String,
    pub artists: Vec<String>,
    pub cover_url: Option<String>,
    pub total_tracks: usize,
    pub release_date: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SpotifyArtist {
    pub id: String,
    pub name: String,
}

/// One page of a Spotify paging object.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next: Option<String>,
}

#[cfg(test)]
impl SpotifyTrack {
    pub fn mock(name: &str, track_number: u32) -> Self {
        Self {
            id: format!("track_{}", track_number),
            name: name.to_string(),
        }
    }
}

#[cfg(test)]
impl SpotifyAlbum {
    pub fn mock(id: &str, name: &str, artist: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            artists: vec![artist.to_string()],
            cover_url: Some(format!("https://i.scdn.co/image/{}", id)),
            total_tracks: 10,
            release_date: Some("2020-01-01".to_string()),
        }
    }
}
