// SPDX-FileCopyrightText: 2025 Hong Minhee <https://hongminhee.org/>
// SPDX-License-Identifier: GPL-3.0-or-later
//! Configuration file support.
//!
//! This module loads `.could-try-harder.toml`, which sets where subjects are
//! saved, the style rule table and the pronoun sets.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::engine::pronouns::{builtin_genders, builtin_sets};
use crate::engine::{
    DEFAULT_PRONOUNS, Engine, PronounSet, PronounTable, PronounTableError,
    RuleCompilationError, StyleRule, StyleRules, default_rules,
};

/// The default configuration file name.
pub const CONFIG_FILE_NAME: &str = ".could-try-harder.toml";

/// The default folder for saved subjects.
pub const DEFAULT_DATA_FOLDER: &str = "./data/";

/// Application configuration.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Folder holding one JSON file per subject (default: `./data/`).
    /// Relative paths in a configuration file are resolved against the
    /// file's own directory.
    pub data_folder: PathBuf,

    /// Style rules in application order (default: the built-in table).
    /// A configured list replaces the built-in table entirely.
    pub style_rules: Vec<StyleRule>,

    /// Pronoun options.
    pub pronouns: PronounConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_folder: PathBuf::from(DEFAULT_DATA_FOLDER),
            style_rules: default_rules(),
            pronouns: PronounConfig::default(),
        }
    }
}

/// Pronoun options.
///
/// Sets and gender mappings are merged over the built-in ones, so adding a
/// `they` set does not lose `male` and `female`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct PronounConfig {
    /// Set used when a gender has no mapping (default: `female`).
    pub default: String,

    /// Additional or replacement pronoun sets, by name.
    pub sets: BTreeMap<String, PronounSet>,

    /// Additional or replacement mappings from recorded gender to set name.
    pub genders: BTreeMap<String, String>,
}

impl Default for PronounConfig {
    fn default() -> Self {
        Self {
            default: DEFAULT_PRONOUNS.to_string(),
            sets: BTreeMap::new(),
            genders: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Parse a configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Load configuration from a file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        let mut config =
            Self::from_toml(&content).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
        if config.data_folder.is_relative()
            && let Some(dir) = path.parent()
        {
            config.data_folder = dir.join(&config.data_folder);
        }
        Ok(config)
    }

    /// Discover and load configuration by searching up the directory tree.
    ///
    /// Starting from `start_dir`, searches for `.could-try-harder.toml` in
    /// each parent directory until the filesystem root is reached. Returns
    /// `None` if no configuration file is found.
    pub fn discover(start_dir: &Path) -> Result<Option<(PathBuf, Self)>, ConfigError> {
        let mut current = start_dir.to_path_buf();
        loop {
            let config_path = current.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                let config = Self::from_file(&config_path)?;
                return Ok(Some((config_path, config)));
            }
            if !current.pop() {
                break;
            }
        }
        Ok(None)
    }

    /// Compile the configured style rules.
    pub fn style_rules(&self) -> Result<StyleRules, ConfigError> {
        StyleRules::compile(&self.style_rules).map_err(ConfigError::Rules)
    }

    /// Build the pronoun table, merging configured sets and mappings over
    /// the built-in ones.
    pub fn pronoun_table(&self) -> Result<PronounTable, ConfigError> {
        let mut sets = builtin_sets();
        sets.extend(self.pronouns.sets.clone());
        let mut genders = builtin_genders();
        genders.extend(self.pronouns.genders.clone());
        PronounTable::new(sets, genders, self.pronouns.default.clone())
            .map_err(ConfigError::Pronouns)
    }

    /// Build the engine, surfacing every configuration problem up front.
    pub fn engine(&self) -> Result<Engine, ConfigError> {
        Ok(Engine::new(self.style_rules()?, self.pronoun_table()?))
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading the configuration file.
    Io(PathBuf, std::io::Error),
    /// Error parsing the TOML configuration.
    Parse(PathBuf, toml::de::Error),
    /// A style rule pattern does not compile.
    Rules(RuleCompilationError),
    /// The pronoun table refers to undefined sets.
    Pronouns(PronounTableError),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(path, err) => {
                write!(f, "failed to read {}: {}", path.display(), err)
            }
            ConfigError::Parse(path, err) => {
                write!(f, "failed to parse {}: {}", path.display(), err)
            }
            ConfigError::Rules(err) => write!(f, "{}", err),
            ConfigError::Pronouns(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(_, err) => Some(err),
            ConfigError::Parse(_, err) => Some(err),
            ConfigError::Rules(err) => Some(err),
            ConfigError::Pronouns(err) => Some(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.data_folder, PathBuf::from("./data/"));
        assert_eq!(config.style_rules, default_rules());
        assert_eq!(config.pronouns.default, "female");
        assert!(config.pronouns.sets.is_empty());
        assert!(config.pronouns.genders.is_empty());
    }

    #[test]
    fn test_parse_empty_toml() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_parse_data_folder() {
        let config = Config::from_toml(r#"data_folder = "/srv/reports""#).unwrap();
        assert_eq!(config.data_folder, PathBuf::from("/srv/reports"));
    }

    #[test]
    fn test_parse_style_rules_replace_defaults() {
        let config = Config::from_toml(
            r#"
[[style_rules]]
pattern = "maths"
replacement = "mathematics"

[[style_rules]]
pattern = "(pe|p\\.e\\.)"
replacement = "Physical Education"
"#,
        )
        .unwrap();
        assert_eq!(
            config.style_rules,
            vec![
                StyleRule::new("maths", "mathematics"),
                StyleRule::new(r"(pe|p\.e\.)", "Physical Education"),
            ]
        );
        let rules = config.style_rules().unwrap();
        assert_eq!(rules.len(), 2);
    }

    #[test]
    fn test_invalid_rule_fails_at_load() {
        let config = Config::from_toml(
            r#"
[[style_rules]]
pattern = "year (nine"
replacement = "Year 9"
"#,
        )
        .unwrap();
        let err = config.engine().unwrap_err();
        assert!(matches!(err, ConfigError::Rules(ref e) if e.pattern == "year (nine"));
    }

    #[test]
    fn test_parse_pronoun_config() {
        let config = Config::from_toml(
            r#"
[pronouns]
default = "they"

[pronouns.sets]
they = ["they", "them", "their", "theirs", "themself"]

[pronouns.genders]
"Non-binary" = "they"
"#,
        )
        .unwrap();
        let table = config.pronoun_table().unwrap();
        assert_eq!(table.default_name(), "they");
        assert_eq!(table.for_gender("Non-binary").subjective(), "they");
        assert_eq!(table.for_gender("Male").subjective(), "he");
        assert_eq!(table.for_gender("Female").subjective(), "she");
        assert_eq!(table.for_gender("").subjective(), "they");
    }

    #[test]
    fn test_short_pronoun_set_is_parse_error() {
        let result = Config::from_toml(
            r#"
[pronouns.sets]
they = ["they", "them", "their", "theirs"]
"#,
        );
        let err = result.unwrap_err().to_string();
        assert!(err.contains("expected 5 forms, found 4"), "{}", err);
    }

    #[test]
    fn test_unknown_default_pronouns() {
        let config = Config::from_toml(
            r#"
[pronouns]
default = "neutral"
"#,
        )
        .unwrap();
        assert!(matches!(
            config.engine(),
            Err(ConfigError::Pronouns(PronounTableError::UnknownDefault(_)))
        ));
    }

    #[test]
    fn test_parse_invalid_toml() {
        let result = Config::from_toml("data_folder = 42");
        assert!(result.is_err());
    }

    #[test]
    fn test_from_file_resolves_relative_data_folder() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&config_path, r#"data_folder = "saved""#).unwrap();
        let config = Config::from_file(&config_path).unwrap();
        assert_eq!(config.data_folder, temp_dir.path().join("saved"));
    }

    #[test]
    fn test_discover_no_config() {
        let temp_dir = tempfile::tempdir().unwrap();
        let result = Config::discover(temp_dir.path()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_discover_config_in_current_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&config_path, r#"data_folder = "/tmp/reports""#).unwrap();

        let result = Config::discover(temp_dir.path()).unwrap();
        assert!(result.is_some());
        let (path, config) = result.unwrap();
        assert_eq!(path, config_path);
        assert_eq!(config.data_folder, PathBuf::from("/tmp/reports"));
    }

    #[test]
    fn test_discover_config_in_parent_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let sub_dir = temp_dir.path().join("subdir").join("nested");
        std::fs::create_dir_all(&sub_dir).unwrap();
        let config_path = temp_dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&config_path, "[pronouns]\ndefault = \"male\"\n").unwrap();

        let result = Config::discover(&sub_dir).unwrap();
        assert!(result.is_some());
        let (path, config) = result.unwrap();
        assert_eq!(path, config_path);
        assert_eq!(config.pronouns.default, "male");
    }

    #[test]
    fn test_discover_reports_broken_config() {
        let temp_dir = tempfile::tempdir().unwrap();
        std::fs::write(temp_dir.path().join(CONFIG_FILE_NAME), "data_folder = [").unwrap();
        assert!(matches!(
            Config::discover(temp_dir.path()),
            Err(ConfigError::Parse(_, _))
        ));
    }
}
