use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// PostgreSQL database connection URL. Without it the in-memory store is used.
    #[serde(default)]
    pub database_url: Option<String>,

    /// Maximum pooled database connections
    #[serde(default = "default_db_max_connections")]
    pub db_max_connections: u32,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Recommendations returned when the request does not say
    #[serde(default = "default_max_results")]
    pub max_results: i64,

    /// Recent watches used to build the taste profile when the request does not say
    #[serde(default = "default_recency_window")]
    pub recency_window: i64,
}

fn default_db_max_connections() -> u32 {
    5
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_max_results() -> i64 {
    30
}

fn default_recency_window() -> i64 {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            db_max_connections: default_db_max_connections(),
            host: default_host(),
            port: default_port(),
            max_results: default_max_results(),
            recency_window: default_recency_window(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Address the HTTP listener binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
