use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDB API key
    pub tmdb_api_key: String,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Content locale sent with every catalog call
    #[serde(default = "default_tmdb_language")]
    pub tmdb_language: String,

    /// Per-request timeout for catalog calls, in seconds
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    /// Location of the persisted preference record
    #[serde(default = "default_user_data_path")]
    pub user_data_path: String,

    /// Stop duration filtering once this many matches are collected
    #[serde(default = "default_duration_match_cap")]
    pub duration_match_cap: usize,

    /// How many of the most recent watches the stats view resolves
    #[serde(default = "default_recent_watch_window")]
    pub recent_watch_window: usize,

    /// Recommendation list size when the caller does not pass one
    #[serde(default = "default_limit")]
    pub default_limit: usize,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_language() -> String {
    "zh-CN".to_string()
}

fn default_http_timeout_secs() -> u64 {
    10
}

fn default_user_data_path() -> String {
    "data/user_data.json".to_string()
}

fn default_duration_match_cap() -> usize {
    20
}

fn default_recent_watch_window() -> usize {
    10
}

fn default_limit() -> usize {
    10
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

    /// Configuration with every default applied, for embedding and tests
    pub fn with_api_key(tmdb_api_key: impl Into<String>) -> Self {
        Self {
            tmdb_api_key: tmdb_api_key.into(),
            tmdb_api_url: default_tmdb_api_url(),
            tmdb_language: default_tmdb_language(),
            http_timeout_secs: default_http_timeout_secs(),
            user_data_path: default_user_data_path(),
            duration_match_cap: default_duration_match_cap(),
            recent_watch_window: default_recent_watch_window(),
            default_limit: default_limit(),
            host: default_host(),
            port: default_port(),
        }
    }
}
