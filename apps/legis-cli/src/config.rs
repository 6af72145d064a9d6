//! TOML configuration for the command-line front end
//!
//! ```toml
//! log_filter = "legis_engine=debug,info"
//! export_path = "out/export.json"
//!
//! [sources]
//! paragraphs = "data/paragraphs.json"
//! legislation = "data/legislation.json"
//! iucn_keywords = "data/iucn_keywords.json"
//! governance_keywords = "data/governance_keywords.json"
//! ```
//!
//! Relative paths are resolved against the directory holding the config
//! file.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Log filter used when neither `RUST_LOG` nor the config sets one
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    pub sources: SourcePaths,
    /// `tracing_subscriber::EnvFilter` directive string
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    /// Where `export` writes when no `--output` is given
    #[serde(default)]
    pub export_path: Option<PathBuf>,
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

/// Locations of the four source tables (JSON arrays of rows)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcePaths {
    pub paragraphs: PathBuf,
    pub legislation: PathBuf,
    /// Optional: without it no paragraph is tagged with threats
    #[serde(default)]
    pub iucn_keywords: Option<PathBuf>,
    /// Optional: without it keyword extraction and scoping are disabled
    #[serde(default)]
    pub governance_keywords: Option<PathBuf>,
}

impl CliConfig {
    /// Load a config file, resolving relative paths against its directory
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML is malformed
    /// - The `[sources]` table or one of its required paths is missing
    ///
    /// # Example
    ///
    /// ```no_run
    /// use legis_cli::config::CliConfig;
    ///
    /// # fn example() -> anyhow::Result<()> {
    /// let config = CliConfig::from_file("legis.toml")?;
    /// println!("{}", config.sources.paragraphs.display());
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let mut config = Self::from_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        if let Some(base) = path.parent() {
            config.resolve_relative(base);
        }
        Ok(config)
    }

    /// Parse a config from a TOML string. Paths are left as written.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or required fields are missing
    ///
    /// # Example
    ///
    /// ```
    /// use legis_cli::config::CliConfig;
    ///
    /// # fn example() -> anyhow::Result<()> {
    /// let config = CliConfig::from_str(r#"
    ///     [sources]
    ///     paragraphs = "paragraphs.json"
    ///     legislation = "legislation.json"
    /// "#)?;
    /// assert_eq!(config.log_filter, "info");
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_str(s: &str) -> anyhow::Result<Self> {
        toml::from_str(s).context("Failed to parse TOML configuration")
    }

    /// Anchor every relative path at `base`
    pub fn resolve_relative(&mut self, base: &Path) {
        let anchor = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        };
        anchor(&mut self.sources.paragraphs);
        anchor(&mut self.sources.legislation);
        if let Some(path) = self.sources.iucn_keywords.as_mut() {
            anchor(path);
        }
        if let Some(path) = self.sources.governance_keywords.as_mut() {
            anchor(path);
        }
        if let Some(path) = self.export_path.as_mut() {
            anchor(path);
        }
    }
}
