//! Configuration loading for foodbot.
//!
//! Configuration follows a precedence chain:
//! 1. Environment variables (highest priority)
//! 2. Project config (`.foodbot/config.toml`)
//! 3. User config (`~/.foodbot/config.toml`)
//! 4. Defaults (lowest priority)
//!
//! All configuration is optional. Without any config the file backend is
//! used with a table in the foodbot home directory.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{FoodbotError, Result};

/// Main configuration struct for foodbot.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Record store configuration.
    pub storage: StorageConfig,
    /// Display names by person id.
    pub people: BTreeMap<String, String>,
}

/// Which backend the record store uses.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    File,
    Sheet,
}

impl BackendKind {
    /// Parse a backend name as used in config and on the command line.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "file" | "json" => Some(Self::File),
            "sheet" | "gsheet" => Some(Self::Sheet),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Sheet => "sheet",
        }
    }
}

/// Record store configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    /// Active backend.
    pub backend: BackendKind,
    /// File backend settings.
    pub file: FileConfig,
    /// Spreadsheet backend settings.
    pub sheet: SheetConfig,
}

/// File backend settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FileConfig {
    /// Path of the JSON table. Defaults to `<foodbot_home>/table.json`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl FileConfig {
    /// Resolve the table path, falling back to the foodbot home directory.
    pub fn resolved_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.path {
            return Ok(path.clone());
        }
        foodbot_home().map(|h| h.join("table.json")).ok_or_else(|| {
            FoodbotError::config("Could not determine table path (no home directory)")
        })
    }
}

/// Spreadsheet backend settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SheetConfig {
    /// Spreadsheet document id.
    pub spreadsheet_id: String,
    /// Worksheet (tab) title.
    pub worksheet: String,
    /// Environment variable holding the OAuth access token.
    pub token_env: String,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            spreadsheet_id: String::new(),
            worksheet: "Sheet1".to_string(),
            token_env: "FOODBOT_SHEETS_TOKEN".to_string(),
        }
    }
}

impl SheetConfig {
    /// Read the access token from the configured environment variable.
    pub fn token(&self) -> Result<String> {
        match env::var(&self.token_env) {
            Ok(token) if !token.is_empty() => Ok(token),
            _ => Err(FoodbotError::config(format!(
                "no sheets access token in ${}",
                self.token_env
            ))),
        }
    }
}

impl Config {
    /// Load configuration with full precedence chain.
    pub fn load() -> Self {
        match env::current_dir() {
            Ok(cwd) => Self::load_from_cwd(&cwd),
            Err(_) => {
                let mut config = Config::default();
                if let Some(user_config) = Self::load_user_config() {
                    config = config.merge(user_config);
                }
                config.apply_env_overrides();
                config
            }
        }
    }

    /// Load configuration with a specific working directory.
    pub fn load_from_cwd(cwd: &Path) -> Self {
        let mut config = Config::default();

        if let Some(user_config) = Self::load_user_config() {
            config = config.merge(user_config);
        }

        if let Some(project_config) = Self::load_project_config(cwd) {
            config = config.merge(project_config);
        }

        config.apply_env_overrides();

        config
    }

    /// Load user config from `~/.foodbot/config.toml`.
    fn load_user_config() -> Option<Config> {
        let home = foodbot_home()?;
        Self::load_layer(&home.join("config.toml"))
    }

    /// Load project config from `.foodbot/config.toml` in the given directory.
    fn load_project_config(cwd: &Path) -> Option<Config> {
        Self::load_layer(&cwd.join(".foodbot").join("config.toml"))
    }

    /// Load one config layer, warning about files that exist but do not parse.
    fn load_layer(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        match Self::load_from_file(path) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable config");
                None
            }
        }
    }

    /// Load config from a specific file path.
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path).map_err(|e| FoodbotError::storage(path, e))?;
        toml::from_str(&content).map_err(|e| FoodbotError::config(e.to_string()))
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        // FOODBOT_BACKEND
        if let Ok(val) = env::var("FOODBOT_BACKEND") {
            match BackendKind::parse(&val) {
                Some(kind) => self.storage.backend = kind,
                None => tracing::warn!(
                    value = %val,
                    "invalid FOODBOT_BACKEND value, expected 'file' or 'sheet'"
                ),
            }
        }

        // FOODBOT_TABLE_PATH
        if let Ok(val) = env::var("FOODBOT_TABLE_PATH") {
            if val.is_empty() {
                tracing::warn!("FOODBOT_TABLE_PATH is empty, ignoring");
            } else {
                self.storage.file.path = Some(PathBuf::from(val));
            }
        }

        // FOODBOT_SPREADSHEET_ID
        if let Ok(val) = env::var("FOODBOT_SPREADSHEET_ID") {
            if !val.is_empty() {
                self.storage.sheet.spreadsheet_id = val;
            }
        }

        // FOODBOT_WORKSHEET
        if let Ok(val) = env::var("FOODBOT_WORKSHEET") {
            if !val.is_empty() {
                self.storage.sheet.worksheet = val;
            }
        }
    }

    /// Merge another config into this one.
    ///
    /// Values from `other` win when they differ from the defaults, so each
    /// layer only needs to spell out its customizations. People are merged
    /// additively.
    fn merge(mut self, other: Config) -> Self {
        if other.storage.backend != BackendKind::default() {
            self.storage.backend = other.storage.backend;
        }
        if other.storage.file.path.is_some() {
            self.storage.file.path = other.storage.file.path;
        }

        let default_sheet = SheetConfig::default();
        if other.storage.sheet.spreadsheet_id != default_sheet.spreadsheet_id {
            self.storage.sheet.spreadsheet_id = other.storage.sheet.spreadsheet_id;
        }
        if other.storage.sheet.worksheet != default_sheet.worksheet {
            self.storage.sheet.worksheet = other.storage.sheet.worksheet;
        }
        if other.storage.sheet.token_env != default_sheet.token_env {
            self.storage.sheet.token_env = other.storage.sheet.token_env;
        }

        self.people.extend(other.people);

        self
    }
}

/// Get the foodbot home directory.
///
/// Checks `FOODBOT_HOME` first, then falls back to `~/.foodbot`.
pub fn foodbot_home() -> Option<PathBuf> {
    if let Ok(home) = env::var("FOODBOT_HOME") {
        if home.is_empty() {
            tracing::warn!("FOODBOT_HOME is empty, using default");
        } else {
            return Some(PathBuf::from(home));
        }
    }

    dirs::home_dir().map(|h| h.join(".foodbot"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    const ENV_VARS: &[&str] = &[
        "FOODBOT_BACKEND",
        "FOODBOT_TABLE_PATH",
        "FOODBOT_SPREADSHEET_ID",
        "FOODBOT_WORKSHEET",
        "FOODBOT_HOME",
    ];

    fn clear_env() {
        for var in ENV_VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.storage.backend, BackendKind::File);
        assert!(config.storage.file.path.is_none());
        assert!(config.storage.sheet.spreadsheet_id.is_empty());
        assert_eq!(config.storage.sheet.worksheet, "Sheet1");
        assert_eq!(config.storage.sheet.token_env, "FOODBOT_SHEETS_TOKEN");
        assert!(config.people.is_empty());
    }

    #[test]
    fn test_backend_kind_parse() {
        assert_eq!(BackendKind::parse("file"), Some(BackendKind::File));
        assert_eq!(BackendKind::parse("JSON"), Some(BackendKind::File));
        assert_eq!(BackendKind::parse("sheet"), Some(BackendKind::Sheet));
        assert_eq!(BackendKind::parse("gsheet"), Some(BackendKind::Sheet));
        assert_eq!(BackendKind::parse("sqlite"), None);
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.toml");

        let toml_content = r#"
[storage]
backend = "sheet"

[storage.sheet]
spreadsheet_id = "abc123"
worksheet = "Lunch"

[people]
"7" = "Ivan"
"#;

        fs::write(&config_path, toml_content).unwrap();

        let config = Config::load_from_file(&config_path).unwrap();

        assert_eq!(config.storage.backend, BackendKind::Sheet);
        assert_eq!(config.storage.sheet.spreadsheet_id, "abc123");
        assert_eq!(config.storage.sheet.worksheet, "Lunch");
        assert_eq!(config.storage.sheet.token_env, "FOODBOT_SHEETS_TOKEN");
        assert_eq!(config.people["7"], "Ivan");
    }

    #[test]
    fn test_load_from_file_missing() {
        let result = Config::load_from_file(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_file_invalid_toml() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.toml");

        fs::write(&config_path, "this is not valid toml [[[").unwrap();

        let result = Config::load_from_file(&config_path);
        assert!(matches!(result, Err(FoodbotError::Config { .. })));
    }

    #[test]
    fn test_load_from_file_unknown_backend() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.toml");

        fs::write(&config_path, "[storage]\nbackend = \"sqlite\"\n").unwrap();

        assert!(Config::load_from_file(&config_path).is_err());
    }

    #[test]
    #[serial]
    fn test_project_config_precedence() {
        clear_env();
        let home = TempDir::new().unwrap();
        env::set_var("FOODBOT_HOME", home.path());
        fs::write(
            home.path().join("config.toml"),
            "[storage.sheet]\nworksheet = \"FromUser\"\nspreadsheet_id = \"user\"\n",
        )
        .unwrap();

        let dir = TempDir::new().unwrap();
        let project_dir = dir.path().join(".foodbot");
        fs::create_dir_all(&project_dir).unwrap();
        fs::write(
            project_dir.join("config.toml"),
            "[storage.sheet]\nspreadsheet_id = \"project\"\n",
        )
        .unwrap();

        let config = Config::load_from_cwd(dir.path());

        // Project config overrides user config
        assert_eq!(config.storage.sheet.spreadsheet_id, "project");
        // User config survives where the project is silent
        assert_eq!(config.storage.sheet.worksheet, "FromUser");

        clear_env();
    }

    #[test]
    #[serial]
    fn test_env_var_overrides() {
        clear_env();
        let home = TempDir::new().unwrap();
        env::set_var("FOODBOT_HOME", home.path());
        env::set_var("FOODBOT_BACKEND", "sheet");
        env::set_var("FOODBOT_TABLE_PATH", "/tmp/elsewhere.json");
        env::set_var("FOODBOT_SPREADSHEET_ID", "env-id");
        env::set_var("FOODBOT_WORKSHEET", "EnvTab");

        let dir = TempDir::new().unwrap();
        let config = Config::load_from_cwd(dir.path());

        assert_eq!(config.storage.backend, BackendKind::Sheet);
        assert_eq!(
            config.storage.file.path,
            Some(PathBuf::from("/tmp/elsewhere.json"))
        );
        assert_eq!(config.storage.sheet.spreadsheet_id, "env-id");
        assert_eq!(config.storage.sheet.worksheet, "EnvTab");

        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_env_backend_ignored() {
        clear_env();
        let home = TempDir::new().unwrap();
        env::set_var("FOODBOT_HOME", home.path());
        env::set_var("FOODBOT_BACKEND", "sqlite");

        let dir = TempDir::new().unwrap();
        let config = Config::load_from_cwd(dir.path());
        assert_eq!(config.storage.backend, BackendKind::File);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_resolved_path_defaults_to_home() {
        clear_env();
        let home = TempDir::new().unwrap();
        env::set_var("FOODBOT_HOME", home.path());

        let path = FileConfig::default().resolved_path().unwrap();
        assert_eq!(path, home.path().join("table.json"));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_sheet_token() {
        let sheet = SheetConfig {
            token_env: "FOODBOT_TEST_TOKEN".to_string(),
            ..Default::default()
        };

        env::remove_var("FOODBOT_TEST_TOKEN");
        assert!(sheet.token().is_err());

        env::set_var("FOODBOT_TEST_TOKEN", "secret");
        assert_eq!(sheet.token().unwrap(), "secret");
        env::remove_var("FOODBOT_TEST_TOKEN");
    }

    #[test]
    fn test_merge_people_additive() {
        let mut base = Config::default();
        base.people.insert("1".to_string(), "A".to_string());
        let mut other = Config::default();
        other.people.insert("2".to_string(), "B".to_string());

        let merged = base.merge(other);
        assert_eq!(merged.people.len(), 2);
    }
}
