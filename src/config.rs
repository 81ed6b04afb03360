use std::path::PathBuf;

use url::Url;

use crate::error::{AppError, Result};

pub const DEFAULT_API_BASE: &str = "https://api.spotify.com/v1";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/api/token";

#[derive(Debug, Clone)]
pub struct Config {
    pub spotify_client_id: String,
    pub spotify_client_secret: String,
    pub api_base: String,
    pub auth_url: String,
    pub font_regular: Option<PathBuf>,
    pub font_bold: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let spotify_client_id = std::env::var("SPOTIFY_CLIENT_ID")
            .map_err(|_| AppError::Config("SPOTIFY_CLIENT_ID not set".into()))?;

        let spotify_client_secret = std::env::var("SPOTIFY_CLIENT_SECRET")
            .map_err(|_| AppError::Config("SPOTIFY_CLIENT_SECRET not set".into()))?;

        let api_base = std::env::var("SPOTIFY_API_BASE")
            .unwrap_or_else(|_| DEFAULT_API_BASE.to_string());

        let auth_url = std::env::var("SPOTIFY_AUTH_URL")
            .unwrap_or_else(|_| DEFAULT_AUTH_URL.to_string());

        let config = Self {
            spotify_client_id,
            spotify_client_secret,
            api_base,
            auth_url,
            font_regular: std::env::var_os("ALBUM_RATER_FONT").map(PathBuf::from),
            font_bold: std::env::var_os("ALBUM_RATER_FONT_BOLD").map(PathBuf::from),
        };
        config.validate_urls()?;

        Ok(config)
    }

    /// Builds a config with default endpoints and no font overrides.
    pub fn with_credentials(client_id: &str, client_secret: &str) -> Self {
        Self {
            spotify_client_id: client_id.to_string(),
            spotify_client_secret: client_secret.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            auth_url: DEFAULT_AUTH_URL.to_string(),
            font_regular: None,
            font_bold: None,
        }
    }

    fn validate_urls(&self) -> Result<()> {
        for (key, value) in [
            ("SPOTIFY_API_BASE", &self.api_base),
            ("SPOTIFY_AUTH_URL", &self.auth_url),
        ] {
            Url::parse(value)
                .map_err(|e| AppError::Config(format!("{} is not a valid URL: {}", key, e)))?;
        }
        Ok(())
    }

    pub fn get_missing_config(&self) -> Vec<String> {
        let mut missing = Vec::new();

        if self.spotify_client_id.is_empty() {
            missing.push("SPOTIFY_CLIENT_ID".to_string());
        }
        if self.spotify_client_secret.is_empty() {
            missing.push("SPOTIFY_CLIENT_SECRET".to_string());
        }

        missing
    }

    pub fn validate_spotify_config(&self) -> bool {
        self.get_missing_config().is_empty()
    }
}
