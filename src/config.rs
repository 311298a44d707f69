use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Base URL of the movie catalog backend
    #[serde(default = "default_catalog_api_url")]
    pub catalog_api_url: String,

    /// Base URL of the film-archive keyword search API
    #[serde(default = "default_archive_api_url")]
    pub archive_api_url: String,

    /// Optional API key for the film-archive API
    #[serde(default)]
    pub archive_api_key: Option<String>,

    /// Redis connection URL
    #[serde(default = "default_redis_url")]
    pub redis_url: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_catalog_api_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_archive_api_url() -> String {
    "http://localhost:8081".to_string()
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}
