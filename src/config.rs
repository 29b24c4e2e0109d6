use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Runtime configuration for the catalog client, the saved-recipe store and
/// list pagination
#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    /// Base URL of the remote recipe catalog
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// Number of items requested per page
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// How close to the end of the loaded list a visible row must be to
    /// trigger the next page
    #[serde(default = "default_prefetch_threshold")]
    pub prefetch_threshold: usize,
    /// JSON file holding saved recipes
    #[serde(default = "default_store_path")]
    pub store_path: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout: default_timeout(),
            page_size: default_page_size(),
            prefetch_threshold: default_prefetch_threshold(),
            store_path: default_store_path(),
        }
    }
}

// Default value functions
fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_page_size() -> u32 {
    10
}

fn default_prefetch_threshold() -> usize {
    crate::pagination::PREFETCH_THRESHOLD
}

fn default_store_path() -> String {
    "saved_recipes.json".to_string()
}

impl CatalogConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with RECIPES__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: RECIPES__BASE_URL
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }
}

/// Load configuration from file and environment variables, see [`CatalogConfig::load`]
pub fn load_config() -> Result<CatalogConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("config").required(false))
        .add_source(
            Environment::with_prefix("RECIPES")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = CatalogConfig::default();
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.timeout, 30);
        assert_eq!(config.page_size, 10);
        assert_eq!(config.prefetch_threshold, 5);
        assert_eq!(config.store_path, "saved_recipes.json");
    }

    #[test]
    fn test_partial_source_falls_back_to_defaults() {
        let config: CatalogConfig = Config::builder()
            .add_source(File::from_str(
                "base_url = \"https://recipes.example\"\npage_size = 20",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.base_url, "https://recipes.example");
        assert_eq!(config.page_size, 20);
        assert_eq!(config.timeout, 30);
        assert_eq!(config.prefetch_threshold, 5);
    }
}
