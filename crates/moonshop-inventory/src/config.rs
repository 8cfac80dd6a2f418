//! # Shop Configuration
//!
//! Where the inventory lives, how tokens are minted, and where share links
//! point.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     MOONSHOP_CATALOG_PATH=public/inventory.json                        │
//! │     MOONSHOP_TOKEN_SECRET=...                                          │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/moonshop/shop.toml (Linux)                               │
//! │     ~/Library/Application Support/com.moonshop.moonshop/shop.toml      │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     src/inventory.json, MOONSHOP_SECRET_<year>, 8-char digest          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # shop.toml
//! [catalog]
//! path = "src/inventory.json"
//!
//! [token]
//! secret = "MOONSHOP_SECRET_2026"  # omit to follow the calendar year
//! digest_len = 8
//! stale_after_days = 7
//!
//! [share]
//! base_url = "https://moonshop.example/"
//! query_param = "cart"
//! whatsapp_number = "5491100000000"
//! ```

use std::path::{Path, PathBuf};

use chrono::{Datelike, Utc};
use moonshop_core::codec::digest::year_secret;
use moonshop_core::{CodecConfig, DEFAULT_DIGEST_LEN, STALE_AFTER_DAYS};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{InventoryError, InventoryResult};

/// Longest digest a SHA-256 value can produce in base 62.
pub const MAX_DIGEST_LEN: usize = 43;

// =============================================================================
// Catalog Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSettings {
    /// JSON inventory file.
    #[serde(default = "default_catalog_path")]
    pub path: PathBuf,
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("src/inventory.json")
}

impl Default for CatalogSettings {
    fn default() -> Self {
        CatalogSettings {
            path: default_catalog_path(),
        }
    }
}

// =============================================================================
// Token Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSettings {
    /// Shared digest secret. `None` follows the calendar year.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,

    /// Digest characters kept in minted tokens (1..=43).
    #[serde(default = "default_digest_len")]
    pub digest_len: usize,

    /// Tokens older than this are flagged stale (never rejected).
    #[serde(default = "default_stale_after_days")]
    pub stale_after_days: i64,
}

fn default_digest_len() -> usize {
    DEFAULT_DIGEST_LEN
}

fn default_stale_after_days() -> i64 {
    STALE_AFTER_DAYS
}

impl Default for TokenSettings {
    fn default() -> Self {
        TokenSettings {
            secret: None,
            digest_len: default_digest_len(),
            stale_after_days: default_stale_after_days(),
        }
    }
}

// =============================================================================
// Share Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareSettings {
    /// Storefront page that restores carts.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Query parameter carrying the token.
    #[serde(default = "default_query_param")]
    pub query_param: String,

    /// Shop's WhatsApp number, digits only, country code first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whatsapp_number: Option<String>,
}

fn default_base_url() -> String {
    "http://localhost:8080/".to_string()
}

fn default_query_param() -> String {
    moonshop_core::share::DEFAULT_QUERY_PARAM.to_string()
}

impl Default for ShareSettings {
    fn default() -> Self {
        ShareSettings {
            base_url: default_base_url(),
            query_param: default_query_param(),
            whatsapp_number: None,
        }
    }
}

// =============================================================================
// Main Shop Configuration
// =============================================================================

/// Complete shop configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopConfig {
    #[serde(default)]
    pub catalog: CatalogSettings,

    #[serde(default)]
    pub token: TokenSettings,

    #[serde(default)]
    pub share: ShareSettings,
}

impl ShopConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (shop.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> InventoryResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading shop config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load shop config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> InventoryResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| InventoryError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| InventoryError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| InventoryError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Shop config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> InventoryResult<()> {
        if self.catalog.path.as_os_str().is_empty() {
            return Err(InventoryError::InvalidConfig("catalog.path must not be empty".into()));
        }

        if !(1..=MAX_DIGEST_LEN).contains(&self.token.digest_len) {
            return Err(InventoryError::InvalidConfig(format!(
                "token.digest_len must be between 1 and {MAX_DIGEST_LEN}, got {}",
                self.token.digest_len
            )));
        }

        if self.token.stale_after_days <= 0 {
            return Err(InventoryError::InvalidConfig(
                "token.stale_after_days must be greater than 0".into(),
            ));
        }

        if matches!(self.token.secret.as_deref(), Some("")) {
            return Err(InventoryError::InvalidConfig("token.secret must not be empty".into()));
        }

        let url = url::Url::parse(&self.share.base_url)?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(InventoryError::InvalidUrl(format!(
                "Base URL must start with http:// or https://, got: {}",
                self.share.base_url
            )));
        }

        if self.share.query_param.is_empty() {
            return Err(InventoryError::InvalidConfig("share.query_param must not be empty".into()));
        }

        if let Some(number) = &self.share.whatsapp_number {
            if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
                return Err(InventoryError::InvalidConfig(format!(
                    "share.whatsapp_number must be digits only, got '{number}'"
                )));
            }
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(path) = var("MOONSHOP_CATALOG_PATH") {
            debug!(path = %path, "Overriding catalog path from environment");
            self.catalog.path = PathBuf::from(path);
        }

        if let Some(secret) = var("MOONSHOP_TOKEN_SECRET") {
            debug!("Overriding token secret from environment");
            self.token.secret = Some(secret);
        }

        if let Some(url) = var("MOONSHOP_BASE_URL") {
            debug!(url = %url, "Overriding base URL from environment");
            self.share.base_url = url;
        }

        if let Some(number) = var("MOONSHOP_WHATSAPP_NUMBER") {
            self.share.whatsapp_number = Some(number);
        }

        if let Some(days) = var("MOONSHOP_STALE_AFTER_DAYS") {
            match days.parse::<i64>() {
                Ok(d) => self.token.stale_after_days = d,
                Err(_) => warn!(value = %days, "Ignoring non-numeric MOONSHOP_STALE_AFTER_DAYS"),
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "moonshop", "moonshop")
            .map(|dirs| dirs.config_dir().join("shop.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn catalog_path(&self) -> &Path {
        &self.catalog.path
    }

    /// The secret in force: configured, or seeded by the current year.
    pub fn secret(&self) -> String {
        self.token
            .secret
            .clone()
            .unwrap_or_else(|| year_secret(Utc::now().year()))
    }

    /// The `[token]` section as the codec's settings.
    pub fn codec_config(&self) -> CodecConfig {
        CodecConfig {
            secret: self.secret(),
            digest_len: self.token.digest_len,
            stale_after_minutes: self.token.stale_after_days.saturating_mul(24 * 60),
        }
    }
}
