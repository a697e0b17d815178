use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::services::loader::ArtifactPaths;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Serialized movie table (JSON)
    #[serde(default = "default_movies_path")]
    pub movies_path: PathBuf,

    /// Serialized similarity matrix (bincode, or JSON with a `.json` extension)
    #[serde(default = "default_similarity_path")]
    pub similarity_path: PathBuf,

    /// Seconds a session may sit idle before it is evicted
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,

    /// Seconds between idle-session sweeps
    #[serde(default = "default_session_sweep_secs")]
    pub session_sweep_secs: u64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_movies_path() -> PathBuf {
    PathBuf::from("movies.json")
}

fn default_similarity_path() -> PathBuf {
    PathBuf::from("similarity.bin")
}

fn default_session_ttl_secs() -> u64 {
    30 * 60
}

fn default_session_sweep_secs() -> u64 {
    60
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn artifact_paths(&self) -> ArtifactPaths {
        ArtifactPaths {
            movies: self.movies_path.clone(),
            similarity: self.similarity_path.clone(),
        }
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    pub fn session_sweep_period(&self) -> Duration {
        Duration::from_secs(self.session_sweep_secs.max(1))
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
