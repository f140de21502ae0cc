//! Configuration resolution for PrintScout
//!
//! Provides two-tier resolution with ENV → TOML priority. Missing
//! credentials fall back to placeholder values with a startup warning so
//! local development works without any keys configured.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Placeholder credentials used when nothing is configured.
///
/// Requests made with these will be rejected upstream; the UI shows a
/// dev-mode banner while they are active.
pub const PLACEHOLDER_GOOGLE_API_KEY: &str = "dummy_google_api_key";
pub const PLACEHOLDER_SEARCH_ENGINE_ID: &str = "dummy_search_engine_id";
pub const PLACEHOLDER_GEMINI_API_KEY: &str = "dummy_gemini_api_key";

const DEFAULT_PORT: u16 = 5780;
const DEFAULT_DATABASE_PATH: &str = "requests.db";
const DEFAULT_CONFIG_PATH: &str = "scout.toml";

/// TOML configuration file contents
///
/// All fields optional; anything absent falls through to the defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub port: Option<u16>,
    pub database_path: Option<PathBuf>,
    pub google_api_key: Option<String>,
    pub search_engine_id: Option<String>,
    pub gemini_api_key: Option<String>,
}

impl TomlConfig {
    /// Parse a TOML config file; a missing file is an empty config.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
    }
}

/// API credentials for the two upstream services
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Custom Search API key
    pub google_api_key: String,
    /// Custom Search engine id (cx parameter)
    pub search_engine_id: String,
    /// Generative Language API key
    pub gemini_api_key: String,
}

impl Credentials {
    /// True when any credential is still a placeholder value.
    pub fn is_placeholder(&self) -> bool {
        self.google_api_key == PLACEHOLDER_GOOGLE_API_KEY
            || self.search_engine_id == PLACEHOLDER_SEARCH_ENGINE_ID
            || self.gemini_api_key == PLACEHOLDER_GEMINI_API_KEY
    }
}

/// Resolved module configuration
#[derive(Debug, Clone)]
pub struct ModuleConfig {
    /// HTTP listen port
    pub port: u16,
    /// SQLite database file path
    pub database_path: PathBuf,
    /// Upstream service credentials
    pub credentials: Credentials,
}

impl ModuleConfig {
    /// Load configuration with ENV → TOML → default resolution.
    ///
    /// The TOML file path itself comes from `SCOUT_CONFIG`, defaulting to
    /// `scout.toml` in the working directory. Never fails: a broken TOML
    /// file is reported and treated as empty.
    pub fn load() -> Self {
        let config_path = std::env::var("SCOUT_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

        let toml_config = match TomlConfig::load(&config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("{} (ignoring TOML config)", e);
                TomlConfig::default()
            }
        };

        Self::resolve(&toml_config)
    }

    /// Resolve against an already-parsed TOML config.
    pub fn resolve(toml_config: &TomlConfig) -> Self {
        let port = std::env::var("SCOUT_PORT")
            .ok()
            .and_then(|v| match v.parse::<u16>() {
                Ok(p) => Some(p),
                Err(e) => {
                    warn!("Invalid SCOUT_PORT value ({}), ignoring", e);
                    None
                }
            })
            .or(toml_config.port)
            .unwrap_or(DEFAULT_PORT);

        let database_path = std::env::var("SCOUT_DATABASE_PATH")
            .map(PathBuf::from)
            .ok()
            .or_else(|| toml_config.database_path.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH));

        let credentials = Credentials {
            google_api_key: resolve_key(
                "SCOUT_GOOGLE_API_KEY",
                toml_config.google_api_key.as_deref(),
                PLACEHOLDER_GOOGLE_API_KEY,
            ),
            search_engine_id: resolve_key(
                "SCOUT_SEARCH_ENGINE_ID",
                toml_config.search_engine_id.as_deref(),
                PLACEHOLDER_SEARCH_ENGINE_ID,
            ),
            gemini_api_key: resolve_key(
                "SCOUT_GEMINI_API_KEY",
                toml_config.gemini_api_key.as_deref(),
                PLACEHOLDER_GEMINI_API_KEY,
            ),
        };

        Self {
            port,
            database_path,
            credentials,
        }
    }
}

/// Resolve one credential: ENV → TOML → placeholder (with warning).
fn resolve_key(env_var: &str, toml_value: Option<&str>, placeholder: &str) -> String {
    if let Ok(key) = std::env::var(env_var) {
        if is_valid_key(&key) {
            return key;
        }
    }

    if let Some(key) = toml_value {
        if is_valid_key(key) {
            return key.to_string();
        }
    }

    warn!(
        "{} not configured, using placeholder value for local dev",
        env_var
    );
    placeholder.to_string()
}

/// Validate a credential (non-empty, non-whitespace)
fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    fn clear_env() {
        for var in [
            "SCOUT_CONFIG",
            "SCOUT_PORT",
            "SCOUT_DATABASE_PATH",
            "SCOUT_GOOGLE_API_KEY",
            "SCOUT_SEARCH_ENGINE_ID",
            "SCOUT_GEMINI_API_KEY",
        ] {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn placeholder_fallback_when_nothing_configured() {
        clear_env();
        let config = ModuleConfig::resolve(&TomlConfig::default());

        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.database_path, PathBuf::from("requests.db"));
        assert!(config.credentials.is_placeholder());
        assert_eq!(
            config.credentials.google_api_key,
            PLACEHOLDER_GOOGLE_API_KEY
        );
    }

    #[test]
    #[serial]
    fn env_overrides_toml() {
        clear_env();
        std::env::set_var("SCOUT_GOOGLE_API_KEY", "env-key");

        let toml_config = TomlConfig {
            google_api_key: Some("toml-key".to_string()),
            ..Default::default()
        };
        let config = ModuleConfig::resolve(&toml_config);
        assert_eq!(config.credentials.google_api_key, "env-key");

        clear_env();
    }

    #[test]
    #[serial]
    fn toml_values_used_when_env_absent() {
        clear_env();

        let toml_config = TomlConfig {
            port: Some(6000),
            google_api_key: Some("toml-google".to_string()),
            search_engine_id: Some("toml-cx".to_string()),
            gemini_api_key: Some("toml-gemini".to_string()),
            ..Default::default()
        };
        let config = ModuleConfig::resolve(&toml_config);

        assert_eq!(config.port, 6000);
        assert!(!config.credentials.is_placeholder());
        assert_eq!(config.credentials.search_engine_id, "toml-cx");
    }

    #[test]
    #[serial]
    fn whitespace_key_falls_through() {
        clear_env();
        std::env::set_var("SCOUT_GEMINI_API_KEY", "   ");

        let config = ModuleConfig::resolve(&TomlConfig::default());
        assert_eq!(
            config.credentials.gemini_api_key,
            PLACEHOLDER_GEMINI_API_KEY
        );

        clear_env();
    }

    #[test]
    #[serial]
    fn toml_file_round_trip() {
        clear_env();

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "port = 7001\ngoogle_api_key = \"file-key\"\ndatabase_path = \"/tmp/scout-test.db\""
        )
        .unwrap();

        let toml_config = TomlConfig::load(file.path()).unwrap();
        assert_eq!(toml_config.port, Some(7001));
        assert_eq!(toml_config.google_api_key.as_deref(), Some("file-key"));

        let config = ModuleConfig::resolve(&toml_config);
        assert_eq!(config.port, 7001);
        assert_eq!(config.database_path, PathBuf::from("/tmp/scout-test.db"));
    }

    #[test]
    #[serial]
    fn missing_toml_file_is_empty_config() {
        let toml_config = TomlConfig::load(Path::new("/nonexistent/scout.toml")).unwrap();
        assert!(toml_config.port.is_none());
        assert!(toml_config.google_api_key.is_none());
    }
}
