//! Configuration management
//!
//! Settings live in `settings.json` inside the data directory:
//! ```json
//! {
//!   "hasher": { "memoryCostKib": 19456, "timeCost": 2, "parallelism": 1 }
//! }
//! ```
//! Keys this crate does not manage are ignored.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::domain::HasherParams;

/// Environment override for the Argon2 time cost
pub const TIME_COST_ENV: &str = "PASSGATE_TIME_COST";

/// Environment override for the Argon2 memory cost (KiB)
pub const MEMORY_COST_ENV: &str = "PASSGATE_MEMORY_COST_KIB";

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    hasher: HasherParams,
}

/// Passgate configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub hasher: HasherParams,
}

impl Config {
    /// Load config from the data directory
    ///
    /// Hasher costs can be overridden with `PASSGATE_TIME_COST` and
    /// `PASSGATE_MEMORY_COST_KIB` (useful for CI, where default costs
    /// make every test slow).
    pub fn load(data_dir: &Path) -> Result<Self> {
        let settings_path = data_dir.join("settings.json");

        let raw: SettingsFile = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str(&content)
                .with_context(|| format!("Invalid settings file: {}", settings_path.display()))?
        } else {
            SettingsFile::default()
        };

        let mut hasher = raw.hasher;
        if let Some(time_cost) = env_u32(TIME_COST_ENV)? {
            hasher.time_cost = time_cost;
        }
        if let Some(memory_cost) = env_u32(MEMORY_COST_ENV)? {
            hasher.memory_cost_kib = memory_cost;
        }

        Ok(Self { hasher })
    }
}

fn env_u32(name: &str) -> Result<Option<u32>> {
    match std::env::var(name) {
        Ok(value) => {
            let parsed = value
                .trim()
                .parse::<u32>()
                .with_context(|| format!("{} must be a positive integer, got {:?}", name, value))?;
            Ok(Some(parsed))
        }
        Err(_) => Ok(None),
    }
}
