use std::path::PathBuf;

use anyhow::{Context, Result, bail};

/// Which `CommentStore` backend to serve from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Sqlite,
    /// Process-lifetime store preloaded with the demo dataset.
    Memory,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub store: StoreKind,
    pub db_path: PathBuf,
    pub allowed_origin: String,
    pub current_user_id: i64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let port = var("MURMUR_PORT", "3000");
        let port: u16 = port
            .parse()
            .with_context(|| format!("MURMUR_PORT must be a port number, got '{}'", port))?;

        let store = match var("MURMUR_STORE", "sqlite").to_ascii_lowercase().as_str() {
            "sqlite" => StoreKind::Sqlite,
            "memory" => StoreKind::Memory,
            other => bail!("MURMUR_STORE must be 'sqlite' or 'memory', got '{}'", other),
        };

        let current_user_id = var("MURMUR_CURRENT_USER_ID", "1");
        let current_user_id: i64 = current_user_id.parse().with_context(|| {
            format!("MURMUR_CURRENT_USER_ID must be an integer, got '{}'", current_user_id)
        })?;

        Ok(Self {
            host: var("MURMUR_HOST", "0.0.0.0"),
            port,
            store,
            db_path: var("MURMUR_DB_PATH", "murmur.db").into(),
            allowed_origin: var("MURMUR_ALLOWED_ORIGIN", "https://canvas.play.rosebud.ai"),
            current_user_id,
        })
    }
}
