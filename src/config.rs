use serde::Deserialize;
use std::time::Duration;

/// Value shipped in the sample `.env`; treated the same as an absent key.
pub const PLACEHOLDER_API_KEY: &str = "your_gemini_api_key_here";

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TheMealDB API base URL (without trailing slash)
    #[serde(default = "default_mealdb_base_url")]
    pub mealdb_base_url: String,

    /// Gemini API key; refinement falls back to local ranking when unset
    #[serde(default)]
    pub gemini_api_key: Option<String>,

    /// Full Gemini `generateContent` endpoint URL
    #[serde(default = "default_gemini_base_url")]
    pub gemini_base_url: String,

    /// Per-ingredient catalog lookup timeout, in seconds
    #[serde(default = "default_catalog_timeout_secs")]
    pub catalog_timeout_secs: u64,

    /// Transport timeout for the refinement call, in seconds
    #[serde(default = "default_refinement_timeout_secs")]
    pub refinement_timeout_secs: u64,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_mealdb_base_url() -> String {
    "https://www.themealdb.com/api/json/v1/1".to_string()
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent"
        .to_string()
}

fn default_catalog_timeout_secs() -> u64 {
    10
}

fn default_refinement_timeout_secs() -> u64 {
    30
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mealdb_base_url: default_mealdb_base_url(),
            gemini_api_key: None,
            gemini_base_url: default_gemini_base_url(),
            catalog_timeout_secs: default_catalog_timeout_secs(),
            refinement_timeout_secs: default_refinement_timeout_secs(),
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// True when a key other than the sample placeholder is present.
    ///
    /// Says nothing about whether the key is well-formed; that check lives
    /// with the refinement client.
    pub fn has_gemini_key(&self) -> bool {
        self.gemini_api_key
            .as_deref()
            .map(str::trim)
            .is_some_and(|key| !key.is_empty() && key != PLACEHOLDER_API_KEY)
    }

    pub fn catalog_timeout(&self) -> Duration {
        Duration::from_secs(self.catalog_timeout_secs)
    }

    pub fn refinement_timeout(&self) -> Duration {
        Duration::from_secs(self.refinement_timeout_secs)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
