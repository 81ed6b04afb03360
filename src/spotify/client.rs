use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::spotify::catalog::Catalog;
use crate::spotify::models::{Page, SpotifyAlbum, SpotifyArtist, SpotifyTrack};
use crate::spotify::pagination::collect_pages;

const ALBUM_PAGE_LIMIT: u32 = 50;
const TRACK_PAGE_LIMIT: u32 = 50;
const SEARCH_LIMIT: &str = "20";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: Option<String>,
    error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AlbumSearchResponse {
    albums: Option<Page<ApiAlbum>>,
}

#[derive(Debug, Deserialize)]
struct ArtistSearchResponse {
    artists: Option<Page<ApiArtist>>,
}

#[derive(Debug, Deserialize)]
struct ApiAlbum {
    id: String,
    name: String,
    #[serde(default)]
    artists: Vec<ApiArtist>,
    #[serde(default)]
    images: Vec<ApiImage>,
    #[serde(default)]
    total_tracks: usize,
    release_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiArtist {
    #[serde(default)]
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct ApiImage {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ApiTrack {
    id: Option<String>,
    name: String,
}

impl From<ApiAlbum> for SpotifyAlbum {
    fn from(album: ApiAlbum) -> Self {
        Self {
            id: album.id,
            name: album.name,
            artists: album.artists.into_iter().map(|a| a.name).collect(),
            // Spotify lists images widest first
            cover_url: album.images.into_iter().next().map(|i| i.url),
            total_tracks: album.total_tracks,
            release_date: album.release_date,
        }
    }
}

impl From<ApiArtist> for SpotifyArtist {
    fn from(artist: ApiArtist) -> Self {
        Self {
            id: artist.id,
            name: artist.name,
        }
    }
}

impl From<ApiTrack> for SpotifyTrack {
    fn from(track: ApiTrack) -> Self {
        Self {
            id: track.id.unwrap_or_default(),
            name: track.name,
        }
    }
}

/// Spotify Web API client authenticated with the client-credentials grant.
pub struct SpotifyClient {
    http_client: Client,
    access_token: String,
    api_base: String,
}

impl SpotifyClient {
    pub async fn new(config: &Config) -> Result<Self> {
        Self::with_http_client(config, Client::new()).await
    }

    /// Authenticate using a caller-built `reqwest` client.
    pub async fn with_http_client(config: &Config, http_client: Client) -> Result<Self> {
        let access_token = Self::request_token(
            &http_client,
            &config.auth_url,
            &config.spotify_client_id,
            &config.spotify_client_secret,
        )
        .await?;

        info!("Authenticated with Spotify using client credentials");

        Ok(Self {
            http_client,
            access_token,
            api_base: config.api_base.trim_end_matches('/').to_string(),
        })
    }

    async fn request_token(
        client: &Client,
        auth_url: &str,
        client_id: &str,
        client_secret: &str,
    ) -> Result<String> {
        let response = client
            .post(auth_url)
            .basic_auth(client_id, Some(client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Auth(describe_token_error(status, &body)));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AppError::Auth(format!("Failed to parse token response: {}", e)))?;

        Ok(token.access_token)
    }

    /// Parse a Spotify album link and extract the album ID.
    /// Supports formats:
    /// - https://open.spotify.com/album/4LH4d3cOWNNsVw41Gqt2kv
    /// - https://open.spotify.com/album/4LH4d3cOWNNsVw41Gqt2kv?si=...
    /// - spotify:album:4LH4d3cOWNNsVw41Gqt2kv
    pub fn parse_album_url(url_str: &str) -> Result<String> {
        if let Some(id) = url_str.strip_prefix("spotify:album:") {
            return Ok(id.to_string());
        }

        let url = Url::parse(url_str).map_err(|e| AppError::Config(format!("Invalid URL: {}", e)))?;

        let path_segments: Vec<&str> = url
            .path_segments()
            .ok_or_else(|| AppError::Config("Invalid Spotify URL".into()))?
            .filter(|segment| !segment.is_empty())
            .collect();

        // Localized links look like /intl-de/album/{id}
        match path_segments.iter().position(|segment| *segment == "album") {
            Some(index) if index + 1 < path_segments.len() => {
                Ok(path_segments[index + 1].to_string())
            }
            _ => Err(AppError::Config(
                "URL does not appear to be a Spotify album URL".into(),
            )),
        }
    }

    pub fn is_album_link(value: &str) -> bool {
        value.starts_with("spotify:album:")
            || value.starts_with("https://")
            || value.starts_with("http://")
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<Option<T>> {
        let response = self
            .http_client
            .get(url)
            .bearer_auth(&self.access_token)
            .query(query)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!("Spotify returned 404 for {}", url);
            return Ok(None);
        }

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::CatalogApi(format!("{} ({})", status, error_text)));
        }

        Ok(Some(response.json().await?))
    }

    async fn get_page<T: DeserializeOwned>(
        &self,
        url: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Page<T>> {
        let limit = limit.to_string();
        let offset = offset.to_string();

        let page = self
            .get_json::<Page<T>>(url, &[("limit", limit.as_str()), ("offset", offset.as_str())])
            .await?;

        Ok(page.unwrap_or(Page {
            items: Vec::new(),
            next: None,
        }))
    }
}

/// Failed searches and listings come back empty; anything else is still an error.
fn empty_on_api_error<T>(result: Result<Vec<T>>, what: &str) -> Result<Vec<T>> {
    match result {
        Err(AppError::CatalogApi(message)) => {
            warn!("Spotify {} failed: {}", what, message);
            Ok(Vec::new())
        }
        other => other,
    }
}

fn describe_token_error(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<TokenErrorResponse>(body) {
        Ok(TokenErrorResponse {
            error_description: Some(description),
            ..
        }) => description,
        Ok(TokenErrorResponse {
            error: Some(error), ..
        }) => error,
        _ => format!("token endpoint returned {}", status),
    }
}

impl Catalog for SpotifyClient {
    async fn search_albums(&self, artist: &str, album: &str) -> Result<Vec<SpotifyAlbum>> {
        let url = format!("{}/search", self.api_base);
        let query = format!("artist:{} album:{}", artist, album);

        let result = self
            .get_json::<AlbumSearchResponse>(
                &url,
                &[("q", query.as_str()), ("type", "album"), ("limit", SEARCH_LIMIT)],
            )
            .await
            .map(|response| {
                response
                    .and_then(|r| r.albums)
                    .map(|page| page.items.into_iter().map(SpotifyAlbum::from).collect::<Vec<_>>())
                    .unwrap_or_default()
            });

        let albums = empty_on_api_error(result, "album search")?;
        debug!("Album search '{}' returned {} results", query, albums.len());
        Ok(albums)
    }

    async fn search_artist(&self, name: &str) -> Result<Option<SpotifyArtist>> {
        let url = format!("{}/search", self.api_base);

        let result = self
            .get_json::<ArtistSearchResponse>(
                &url,
                &[("q", name), ("type", "artist"), ("limit", "1")],
            )
            .await
            .map(|response| {
                response
                    .and_then(|r| r.artists)
                    .map(|page| page.items.into_iter().map(SpotifyArtist::from).collect::<Vec<_>>())
                    .unwrap_or_default()
            });

        Ok(empty_on_api_error(result, "artist search")?.into_iter().next())
    }

    async fn artist_albums(&self, artist_id: &str) -> Result<Vec<SpotifyAlbum>> {
        let url = format!(
            "{}/artists/{}/albums?include_groups=album,single,compilation",
            self.api_base,
            urlencoding::encode(artist_id)
        );
        let url = url.as_str();

        let result = collect_pages(ALBUM_PAGE_LIMIT, move |limit, offset| {
            self.get_page::<ApiAlbum>(url, limit, offset)
        })
        .await
        .map(|albums| albums.into_iter().map(SpotifyAlbum::from).collect::<Vec<_>>());

        let albums = empty_on_api_error(result, "artist album listing")?;
        info!("Found {} albums for artist {}", albums.len(), artist_id);
        Ok(albums)
    }

    async fn album(&self, album_id: &str) -> Result<Option<SpotifyAlbum>> {
        let url = format!("{}/albums/{}", self.api_base, urlencoding::encode(album_id));

        match self.get_json::<ApiAlbum>(&url, &[]).await {
            Ok(album) => Ok(album.map(SpotifyAlbum::from)),
            Err(AppError::CatalogApi(message)) => {
                warn!("Spotify album lookup failed: {}", message);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn album_tracks(&self, album_id: &str) -> Result<Vec<SpotifyTrack>> {
        let url = format!("{}/albums/{}/tracks", self.api_base, urlencoding::encode(album_id));
        let url = url.as_str();

        let result = collect_pages(TRACK_PAGE_LIMIT, move |limit, offset| {
            self.get_page::<ApiTrack>(url, limit, offset)
        })
        .await
        .map(|tracks| tracks.into_iter().map(SpotifyTrack::from).collect::<Vec<_>>());

        let tracks = empty_on_api_error(result, "album track listing")?;
        info!("Fetched {} tracks for album {}", tracks.len(), album_id);
        Ok(tracks)
    }

    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.http_client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(AppError::CatalogApi(format!(
                "Failed to download image ({})",
                response.status()
            )));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    use super::*;

    const TOKEN_OK: &str = r#"{"access_token":"tok","token_type":"Bearer","expires_in":3600}"#;

    type Route = fn(&str) -> (u16, String);
    type RequestLog = Arc<Mutex<Vec<String>>>;

    /// Minimal HTTP/1.1 server answering every request through `route`,
    /// keyed on the request target (path plus query).
    async fn serve(route: Route) -> (String, RequestLog) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let log: RequestLog = Arc::default();
        let requests = Arc::clone(&log);

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let requests = Arc::clone(&requests);
                tokio::spawn(async move {
                    let request = read_request(&mut socket).await;
                    let target = request
                        .split_whitespace()
                        .nth(1)
                        .unwrap_or_default()
                        .to_string();
                    requests.lock().unwrap().push(request);

                    let (status, body) = route(&target);
                    let response = format!(
                        "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        status,
                        body.len(),
                        body
                    );
                    socket.write_all(response.as_bytes()).await.unwrap();
                    socket.shutdown().await.ok();
                });
            }
        });

        (base, log)
    }

    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buffer = Vec::new();
        let mut chunk = [0u8; 1024];

        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buffer.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&buffer);
            if let Some(end) = text.find("\r\n\r\n") {
                let body_len = text[..end]
                    .lines()
                    .filter_map(|line| line.split_once(':'))
                    .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buffer.len() >= end + 4 + body_len {
                    break;
                }
            }
        }

        String::from_utf8_lossy(&buffer).into_owned()
    }

    async fn connect(base: &str) -> Result<SpotifyClient> {
        let mut config = Config::with_credentials("id", "secret");
        config.api_base = format!("{}/v1", base);
        config.auth_url = format!("{}/api/token", base);

        let http_client = Client::builder().no_proxy().build().unwrap();
        SpotifyClient::with_http_client(&config, http_client).await
    }

    fn track_page(first: usize, count: usize, has_next: bool) -> String {
        let items: Vec<_> = (first..first + count)
            .map(|n| {
                json!({
                    "id": format!("t{}", n),
                    "name": format!("Song {}", n)
                })
            })
            .collect();
        let next = has_next.then(|| "https://api.spotify.com/v1/albums/alb1/tracks?offset=50");
        json!({"items": items, "next": next}).to_string()
    }

    #[tokio::test]
    async fn test_rejected_token_reports_error_description() {
        let (base, log) = serve(|_| {
            (
                400,
                r#"{"error":"invalid_client","error_description":"Invalid client secret"}"#.into(),
            )
        })
        .await;

        let result = connect(&base).await;

        assert!(matches!(
            result,
            Err(AppError::Auth(ref message)) if message == "Invalid client secret"
        ));
        let requests = log.lock().unwrap();
        assert!(requests[0].starts_with("POST /api/token"));
        assert!(requests[0].contains("grant_type=client_credentials"));
        assert!(requests[0].to_lowercase().contains("authorization: basic "));
    }

    #[tokio::test]
    async fn test_failed_searches_and_listings_come_back_empty() {
        let (base, _) = serve(|target| match target {
            "/api/token" => (200, TOKEN_OK.into()),
            t if t.starts_with("/v1/search") => (500, r#"{"error":{"status":500}}"#.into()),
            t if t.starts_with("/v1/artists/") => (502, String::new()),
            t if t.starts_with("/v1/albums/alb1/tracks") => (503, String::new()),
            _ => (404, String::new()),
        })
        .await;
        let client = connect(&base).await.unwrap();

        assert!(client.search_albums("X", "Y").await.unwrap().is_empty());
        assert!(client.search_artist("X").await.unwrap().is_none());
        assert!(client.artist_albums("art1").await.unwrap().is_empty());
        assert!(client.album_tracks("alb1").await.unwrap().is_empty());
        assert!(matches!(
            client.fetch_image(&format!("{}/cover.png", base)).await,
            Err(AppError::CatalogApi(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_album_is_none() {
        let (base, _) = serve(|target| match target {
            "/api/token" => (200, TOKEN_OK.into()),
            _ => (404, r#"{"error":{"status":404,"message":"Not found"}}"#.into()),
        })
        .await;
        let client = connect(&base).await.unwrap();

        assert!(client.album("missing").await.unwrap().is_none());
        assert!(client.album_tracks("missing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_album_tracks_follow_offsets() {
        let (base, log) = serve(|target| match target {
            "/api/token" => (200, TOKEN_OK.into()),
            t if t.contains("offset=0") => (200, track_page(1, 50, true)),
            t if t.contains("offset=50") => (200, track_page(51, 3, false)),
            _ => (404, String::new()),
        })
        .await;
        let client = connect(&base).await.unwrap();

        let tracks = client.album_tracks("alb1").await.unwrap();

        assert_eq!(tracks.len(), 53);
        assert_eq!(tracks[0].name, "Song 1");
        assert_eq!(tracks[52].name, "Song 53");

        let requests = log.lock().unwrap();
        let listings: Vec<&String> = requests
            .iter()
            .filter(|r| r.starts_with("GET /v1/albums/alb1/tracks"))
            .collect();
        assert_eq!(listings.len(), 2);
        assert!(listings[0].contains("limit=50&offset=0"));
        assert!(listings[1].contains("limit=50&offset=50"));
        assert!(listings[0].to_lowercase().contains("authorization: bearer tok"));
    }

    #[test]
    fn test_parse_album_url_variants() {
        let id = "4LH4d3cOWNNsVw41Gqt2kv";
        for link in [
            format!("https://open.spotify.com/album/{}", id),
            format!("https://open.spotify.com/album/{}?si=abc", id),
            format!("https://open.spotify.com/intl-de/album/{}", id),
            format!("spotify:album:{}", id),
        ] {
            assert_eq!(SpotifyClient::parse_album_url(&link).unwrap(), id, "{}", link);
        }
    }

    #[test]
    fn test_parse_album_url_rejects_playlist() {
        let result =
            SpotifyClient::parse_album_url("https://open.spotify.com/playlist/37i9dQZF1E8NC99vGqLsaH");
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_is_album_link() {
        assert!(SpotifyClient::is_album_link("spotify:album:abc"));
        assert!(SpotifyClient::is_album_link("https://open.spotify.com/album/abc"));
        assert!(!SpotifyClient::is_album_link("To Pimp a Butterfly"));
    }

    #[test]
    fn test_token_error_prefers_description() {
        let body = r#"{"error":"invalid_client","error_description":"Invalid client secret"}"#;
        assert_eq!(
            describe_token_error(StatusCode::BAD_REQUEST, body),
            "Invalid client secret"
        );

        let body = r#"{"error":"invalid_client"}"#;
        assert_eq!(describe_token_error(StatusCode::BAD_REQUEST, body), "invalid_client");

        assert_eq!(
            describe_token_error(StatusCode::INTERNAL_SERVER_ERROR, "oops"),
            "token endpoint returned 500 Internal Server Error"
        );
    }

    #[test]
    fn test_album_conversion_takes_first_image() {
        let json = r#"{
            "id": "alb1",
            "name": "Y",
            "artists": [{"id": "art1", "name": "X"}],
            "images": [
                {"url": "https://i.scdn.co/image/large", "width": 640, "height": 640},
                {"url": "https://i.scdn.co/image/small", "width": 64, "height": 64}
            ],
            "total_tracks": 2,
            "release_date": "2021-05-01"
        }"#;
        let album: SpotifyAlbum = serde_json::from_str::<ApiAlbum>(json).unwrap().into();

        assert_eq!(album.name, "Y");
        assert_eq!(album.artists, vec!["X"]);
        assert_eq!(album.cover_url.as_deref(), Some("https://i.scdn.co/image/large"));
        assert_eq!(album.total_tracks, 2);
    }

    #[test]
    fn test_track_page_deserializes_null_cursor() {
        let json = r#"{
            "items": [
                {"id": "t1", "name": "A (feat. B)", "track_number": 1, "duration_ms": 200000},
                {"id": null, "name": "C", "track_number": 2, "duration_ms": 100000}
            ],
            "next": null
        }"#;
        let page: Page<ApiTrack> = serde_json::from_str(json).unwrap();

        assert!(page.next.is_none());
        let tracks: Vec<SpotifyTrack> = page.items.into_iter().map(SpotifyTrack::from).collect();
        assert_eq!(tracks[0].name, "A (feat. B)");
        assert_eq!(tracks[1].id, "");
    }
}
