//! Dashboard Configuration
//! Optional JSON settings file with built-in defaults for every field.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// File looked up in the working directory at startup.
pub const CONFIG_FILE_NAME: &str = "cricket_dashboard.json";

const SOURCE_BASE_URL: &str = "https://raw.githubusercontent.com/Dilwanthennakoon/icc-world-cup-stats-project/main/WorldCup_Stats";

/// Tournament years with a published match-stats file.
const TOURNAMENT_YEARS: [u16; 13] = [
    1975, 1979, 1983, 1987, 1992, 1996, 1999, 2003, 2007, 2011, 2015, 2019, 2023,
];

/// Top-level settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    pub sources: SourceConfig,
    pub window: WindowConfig,
    pub export: ExportConfig,
}

/// Where the per-tournament match tables come from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SourceConfig {
    /// URLs or local file paths, concatenated in this order.
    pub locations: Vec<String>,
    pub request_timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            locations: TOURNAMENT_YEARS
                .iter()
                .map(|year| format!("{}/{}_Match_Stats.csv", SOURCE_BASE_URL, year))
                .collect(),
            request_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1400.0,
            height: 900.0,
        }
    }
}

/// Pixel size of each chart image in an exported report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExportConfig {
    pub image_width: u32,
    pub image_height: u32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            image_width: 1200,
            image_height: 800,
        }
    }
}

impl DashboardConfig {
    /// Load from `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Self = serde_json::from_str(&raw)
            .with_context(|| format!("invalid config {}", path.display()))?;

        if config.sources.locations.is_empty() {
            anyhow::bail!("config {} lists no data sources", path.display());
        }

        tracing::info!(
            path = %path.display(),
            sources = config.sources.locations.len(),
            "loaded config"
        );
        Ok(config)
    }
}
