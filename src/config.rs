use std::path::Path;
use std::{env, fs};

use serde::Deserialize;
use tracing::debug;

use crate::collation::{Locale, LocaleCollator};
use crate::error::{DiscoveryError, Result};
use crate::pipeline::processing::related::RelevanceWeights;

pub const DEFAULT_CONFIG_PATH: &str = "discovery.toml";

/// Settings for the discovery pipeline and its record-store queries
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Base URL of the record store API; media URLs are resolved against it
    pub api_base_url: String,
    pub locale: Locale,
    /// Fold diacritics in free-text and place matching
    pub accent_insensitive_search: bool,
    pub page_limit: usize,
    /// Embed depth requested from the record store
    pub depth: u8,
    pub newest_count: usize,
    pub related: RelevanceWeights,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            api_base_url: String::new(),
            locale: Locale::default(),
            accent_insensitive_search: false,
            page_limit: 500,
            depth: 2,
            newest_count: crate::pipeline::processing::ordering::NEWEST_COUNT,
            related: RelevanceWeights::default(),
        }
    }
}

impl DiscoveryConfig {
    /// Load `discovery.toml` from the working directory, then apply env overrides
    pub fn load() -> Result<Self> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// A missing file yields defaults; an unreadable or invalid one is an error
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config = if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| {
                DiscoveryError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
            })?;
            toml::from_str::<Self>(&content)?
        } else {
            debug!(path = %path.display(), "No config file, using defaults");
            Self::default()
        };
        let config = config.with_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    fn with_env_overrides(mut self) -> Result<Self> {
        if let Ok(url) = env::var("DISCOVERY_API_BASE_URL") {
            self.api_base_url = url;
        }
        if let Ok(locale) = env::var("DISCOVERY_LOCALE") {
            self.locale = Locale::parse(&locale)
                .ok_or_else(|| DiscoveryError::Config(format!("Unsupported locale: {locale}")))?;
        }
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.page_limit == 0 {
            return Err(DiscoveryError::Config("page_limit must be greater than zero".to_string()));
        }
        if self.related.limit == 0 {
            return Err(DiscoveryError::Config("related.limit must be greater than zero".to_string()));
        }
        Ok(())
    }

    pub fn collator(&self) -> LocaleCollator {
        LocaleCollator::new(self.locale).accent_insensitive(self.accent_insensitive_search)
    }
}
