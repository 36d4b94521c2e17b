use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use yomu_api::traits::{CatalogQuery, FeedQuery};

use crate::error::YomuError;
use crate::normalize::Normalizer;

const DEFAULT_CONFIG: &str = include_str!("../../../config/default.toml");

/// Top-level application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub catalog: CatalogConfig,
    pub proxy: ProxyConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub cover_base_url: String,
    pub placeholder_cover_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub page_size: u32,
    pub language: String,
    pub content_ratings: Vec<String>,
    pub feed_limit: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProxyConfig {
    pub bind: String,
    pub port: u16,
}

impl AppConfig {
    /// Load config: user file (if exists) merged over built-in defaults.
    pub fn load() -> Result<Self, YomuError> {
        let user_path = Self::config_path();
        if user_path.exists() {
            Self::load_from(&user_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load a specific file, merged over built-in defaults.
    pub fn load_from(path: &Path) -> Result<Self, YomuError> {
        let user_str = std::fs::read_to_string(path)?;
        Self::from_toml(&user_str)
    }

    /// Parse a (possibly partial) TOML document over the built-in defaults.
    pub fn from_toml(user_str: &str) -> Result<Self, YomuError> {
        let mut merged: toml::Table =
            toml::from_str(DEFAULT_CONFIG).map_err(|e| YomuError::Config(e.to_string()))?;
        let user: toml::Table =
            toml::from_str(user_str).map_err(|e| YomuError::Config(e.to_string()))?;
        merge_tables(&mut merged, user);

        let config: AppConfig = toml::Value::Table(merged)
            .try_into()
            .map_err(|e: toml::de::Error| YomuError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Path to user config file (XDG on Linux, AppData on Windows).
    pub fn config_path() -> PathBuf {
        ProjectDirs::from("", "", "yomu")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    fn validate(&self) -> Result<(), YomuError> {
        for (key, value) in [
            ("api.base_url", &self.api.base_url),
            ("api.cover_base_url", &self.api.cover_base_url),
            ("api.placeholder_cover_url", &self.api.placeholder_cover_url),
        ] {
            url::Url::parse(value)
                .map_err(|e| YomuError::Config(format!("{key}: {e}")))?;
        }
        if self.catalog.page_size == 0 {
            return Err(YomuError::Config("catalog.page_size must be positive".into()));
        }
        Ok(())
    }

    /// Catalog query for a search term, using the configured fixed parameters.
    pub fn catalog_query(&self, term: &str) -> CatalogQuery {
        CatalogQuery {
            limit: self.catalog.page_size,
            translated_language: self.catalog.language.clone(),
            content_ratings: self.catalog.content_ratings.clone(),
            ..CatalogQuery::for_term(term)
        }
    }

    pub fn feed_query(&self) -> FeedQuery {
        FeedQuery {
            translated_language: self.catalog.language.clone(),
            limit: self.catalog.feed_limit,
        }
    }

    pub fn normalizer(&self) -> Normalizer {
        Normalizer::new(&self.api.cover_base_url, &self.api.placeholder_cover_url)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("built-in default config is valid TOML")
    }
}

/// Recursively overlay `overlay` onto `base`; nested tables merge, other values replace.
fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match value {
            toml::Value::Table(overlay_table) => {
                if let Some(toml::Value::Table(base_table)) = base.get_mut(&key) {
                    merge_tables(base_table, overlay_table);
                } else {
                    base.insert(key, toml::Value::Table(overlay_table));
                }
            }
            other => {
                base.insert(key, other);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config = AppConfig::default();
        assert_eq!(config.api.base_url, "https://api.mangadex.org");
        assert_eq!(config.catalog.page_size, 24);
        assert_eq!(config.catalog.content_ratings, vec!["safe", "suggestive"]);
        assert_eq!(config.proxy.port, 3001);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_user_file_keeps_defaults() {
        let config = AppConfig::from_toml("[proxy]\nport = 8080\n").unwrap();
        assert_eq!(config.proxy.port, 8080);
        assert_eq!(config.proxy.bind, "0.0.0.0");
        assert_eq!(config.catalog.language, "en");
    }

    #[test]
    fn test_invalid_url_is_rejected() {
        let err = AppConfig::from_toml("[api]\nbase_url = \"not a url\"\n").unwrap_err();
        assert!(err.to_string().contains("api.base_url"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[catalog]\nlanguage = \"fr\"\n").unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.catalog.language, "fr");
        assert_eq!(config.feed_query().translated_language, "fr");
        assert_eq!(config.catalog_query("x").translated_language, "fr");
    }

    #[test]
    fn test_roundtrip() {
        let config = AppConfig::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized = AppConfig::from_toml(&serialized).unwrap();
        assert_eq!(deserialized, config);
    }

    #[test]
    fn test_catalog_query_uses_term() {
        let config = AppConfig::default();
        assert_eq!(config.catalog_query(" berserk ").title.as_deref(), Some("berserk"));
        assert_eq!(config.catalog_query("").title, None);
        assert_eq!(config.catalog_query("").limit, 24);
    }
}
