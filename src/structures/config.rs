use std::{fs, time::Duration};

use serde::Deserialize;

use crate::{Error, ingestion::cache::SourceLocation};

pub const DEFAULT_OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";

pub const DEFAULT_OVERPASS_QUERY: &str = r#"[out:json];
area["name"="Genté"]->.searchArea;
(way["highway"](area.searchArea););
out geom;"#;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub build: BuildConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct BuildConfig {
    pub inputs: Vec<Ingestor>,
    #[serde(default = "default_cache_dir")]
    pub cache_dir: String,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "ingestor")]
pub enum Ingestor {
    #[serde(rename = "overpass/api")]
    Overpass(OverpassIngestor),
    #[serde(rename = "osm/pbf")]
    OsmPbf(OsmPbfIngestor),
}

#[derive(Debug, Deserialize)]
pub struct OverpassIngestor {
    #[serde(default = "default_overpass_url")]
    pub url: String,
    #[serde(default = "default_overpass_query")]
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct OsmPbfIngestor {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind: default_bind(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl ServerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_cache_dir() -> String {
    "cache".to_string()
}

fn default_overpass_url() -> String {
    DEFAULT_OVERPASS_URL.to_string()
}

fn default_overpass_query() -> String {
    DEFAULT_OVERPASS_QUERY.to_string()
}

fn default_bind() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_timeout_ms() -> u64 {
    5000
}

impl Ingestor {
    pub fn label(&self) -> &str {
        match self {
            Ingestor::Overpass(_) => "overpass/api",
            Ingestor::OsmPbf(_) => "osm/pbf",
        }
    }

    pub fn url(&self) -> &str {
        match self {
            Ingestor::Overpass(c) => &c.url,
            Ingestor::OsmPbf(c) => &c.url,
        }
    }

    pub fn location(&self) -> Result<SourceLocation, Error> {
        let url = self.url();
        if let Some(path) = url.strip_prefix("path:") {
            Ok(SourceLocation::Local(path.to_string()))
        } else if url.starts_with("http://") || url.starts_with("https://") {
            Ok(SourceLocation::Remote(url.to_string()))
        } else {
            Err(Error::Config(format!(
                "Unknown URL scheme for '{}': {url}",
                self.label()
            )))
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self, Error> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config {path}: {e}")))?;
        Config::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, Error> {
        serde_yml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {e}")))
    }

    pub fn log_level(&self) -> tracing::Level {
        self.log_level.parse().unwrap_or(tracing::Level::INFO)
    }
}
