use config::{Config, ConfigError, Environment, File};
use directories::ProjectDirs;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct BrowserConfig {
    /// Recipe service access
    #[serde(default)]
    pub api: ApiConfig,
    /// Where the saved-recipes document lives
    #[serde(default)]
    pub storage: StorageConfig,
    /// How long a toast stays visible, in milliseconds
    #[serde(default = "default_toast_duration_ms")]
    pub toast_duration_ms: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            storage: StorageConfig::default(),
            toast_duration_ms: default_toast_duration_ms(),
        }
    }
}

/// Configuration for the recipe service backend
#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    /// Backend to use: "spoonacular" (direct) or "proxy" (hosting page AJAX endpoint)
    #[serde(default = "default_backend")]
    pub backend: String,
    /// Base URL of the Spoonacular API
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// API key for authentication (can also be set via SPOONACULAR_API_KEY)
    pub api_key: Option<String>,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// Ask for nutrition data when fetching a single recipe
    #[serde(default = "default_include_nutrition")]
    pub include_nutrition: bool,

    // Proxy backend only
    /// AJAX endpoint of the hosting page (e.g. https://example.com/wp-admin/admin-ajax.php)
    pub ajax_url: Option<String>,
    /// Per-session anti-forgery token handed out by the hosting page
    pub nonce: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            base_url: default_base_url(),
            api_key: None,
            timeout: default_timeout(),
            include_nutrition: default_include_nutrition(),
            ajax_url: None,
            nonce: None,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

/// Configuration for the saved-recipes store
#[derive(Debug, Deserialize, Clone, Default)]
pub struct StorageConfig {
    /// Directory holding the saved-recipes document; defaults to the platform data dir
    pub dir: Option<PathBuf>,
}

impl StorageConfig {
    /// Resolve the storage directory, falling back to the platform data directory
    pub fn resolve_dir(&self) -> Option<PathBuf> {
        self.dir.clone().or_else(|| {
            ProjectDirs::from("com", "RecipeBrowser", "recipe-browser")
                .map(|dirs| dirs.data_dir().to_path_buf())
        })
    }
}

// Default value functions
fn default_backend() -> String {
    "spoonacular".to_string()
}

fn default_base_url() -> String {
    "https://api.spoonacular.com".to_string()
}

fn default_timeout() -> u64 {
    15
}

fn default_include_nutrition() -> bool {
    true
}

fn default_toast_duration_ms() -> u64 {
    2000
}

impl BrowserConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with RECIPE_BROWSER__ prefix
    /// 2. recipe-browser.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: RECIPE_BROWSER__API__API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_duration_ms)
    }
}

/// Load configuration from file and environment variables
///
/// See [`BrowserConfig::load`] for the source priority.
pub fn load_config() -> Result<BrowserConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("recipe-browser").required(false))
        // Use double underscore for nested: RECIPE_BROWSER__API__TIMEOUT
        .add_source(
            Environment::with_prefix("RECIPE_BROWSER")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
