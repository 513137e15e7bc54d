use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fs, path::PathBuf};

use crate::{model::Units, provider::ProviderId};

/// Environment variable that overrides the geocoding key stored on disk.
pub const GEOCODING_API_KEY_ENV: &str = "GEOCODING_API_KEY";

/// Credentials for one forecast provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub api_key: String,
}

/// Base URLs of every remote service the pipeline talks to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    /// Answers with the caller's public IP as plain text.
    pub ip_echo: String,
    /// The IP address is appended as a path segment.
    pub ip_geolocation: String,
    pub geocode_search: String,
    pub relay_forecast: String,
    pub onecall_forecast: String,
    /// `<icons>/<code>.txt` holds the glyph for an icon code.
    pub icons: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            ip_echo: "http://icanhazip.com".to_string(),
            ip_geolocation: "http://ip-api.com/json".to_string(),
            geocode_search: "https://geocode.maps.co/search".to_string(),
            relay_forecast: "https://geocode.jessfraz.com/forecast".to_string(),
            onecall_forecast: "https://api.openweathermap.org/data/3.0/onecall".to_string(),
            icons: "https://jesss.s3.amazonaws.com/weather/icons".to_string(),
        }
    }
}

/// Settings persisted as `config.toml` in the platform config directory.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Optional default forecast provider id, "relay" or "onecall".
    pub default_provider: Option<String>,

    /// Key for the geocoding search service.
    #[serde(default)]
    pub geocoding_api_key: Option<String>,

    #[serde(default)]
    pub units: Units,

    /// Keyed by provider id, e.g. `[providers.onecall]`.
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,

    #[serde(default)]
    pub endpoints: Endpoints,
}

impl Config {
    /// Falls back to the relay, which works without credentials.
    pub fn default_provider_id(&self) -> Result<ProviderId> {
        match self.default_provider.as_deref() {
            Some(s) => ProviderId::try_from(s),
            None => Ok(ProviderId::Relay),
        }
    }

    pub fn has_provider(&self, id: ProviderId) -> bool {
        self.providers.contains_key(id.as_str())
    }

    pub fn set_default_provider(&mut self, id: ProviderId) {
        self.default_provider = Some(id.as_str().to_string());
    }

    /// A missing file is not an error; defaults apply until `configure` runs.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(e).with_context(|| format!("Cannot read {}", path.display()));
            }
        };

        Self::from_toml(&contents)
            .with_context(|| format!("Cannot parse {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Malformed locast settings")
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;
        let dir = path.parent().ok_or_else(|| anyhow!("{} has no parent", path.display()))?;
        fs::create_dir_all(dir).with_context(|| format!("Cannot create {}", dir.display()))?;

        let text = toml::to_string_pretty(self).context("Cannot encode settings as TOML")?;
        fs::write(&path, text).with_context(|| format!("Cannot write {}", path.display()))
    }

    pub fn config_file_path() -> Result<PathBuf> {
        ProjectDirs::from("dev", "locast", "locast")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .ok_or_else(|| anyhow!("No home directory to keep locast settings in"))
    }

    /// Stores `api_key` for `id`; the first provider given a key becomes the default.
    pub fn upsert_provider_api_key(&mut self, id: ProviderId, api_key: String) {
        self.providers.insert(id.as_str().to_string(), ProviderConfig { api_key });
        self.default_provider.get_or_insert_with(|| id.as_str().to_string());
    }

    pub fn provider_api_key(&self, id: ProviderId) -> Option<&str> {
        self.providers.get(id.as_str()).map(|p| p.api_key.as_str())
    }

    /// Whether `id` can be used as-is.
    pub fn is_provider_configured(&self, id: ProviderId) -> bool {
        !id.requires_api_key() || self.provider_api_key(id).is_some()
    }

    pub fn set_geocoding_api_key(&mut self, api_key: String) {
        self.geocoding_api_key = Some(api_key);
    }

    /// Geocoding key, with `GEOCODING_API_KEY` taking precedence over the file.
    pub fn geocoding_api_key(&self) -> Option<String> {
        pick_geocoding_key(
            std::env::var(GEOCODING_API_KEY_ENV).ok(),
            self.geocoding_api_key.as_deref(),
        )
    }
}

fn pick_geocoding_key(from_env: Option<String>, from_file: Option<&str>) -> Option<String> {
    from_env
        .filter(|k| !k.trim().is_empty())
        .or_else(|| from_file.filter(|k| !k.trim().is_empty()).map(str::to_string))
}
