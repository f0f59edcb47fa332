/// Configuration loading.
///
/// Settings are read from TOML.  The first file found wins:
///
///   1. `<project root>/.codeintel.toml`
///   2. `<user config dir>/codeintel-nav/config.toml`
///
/// When neither exists the built-in defaults are used.  Languages listed
/// in a config file replace the built-in language of the same name, or
/// are added when the name is new.
///
/// ```toml
/// [search]
/// max_concurrent_listings = 8
/// skip_dirs = [".git", "node_modules"]
///
/// [[languages]]
/// name = "hack"
/// extensions = ["hh"]
/// call_operators = ["->", "::"]
/// declaration_patterns = ['\bfunction\s+{name}\b']
/// extends_marker = "extends"
/// self_references = ["this", "self"]
/// parent_references = ["parent"]
/// ```
use std::path::{Path, PathBuf};

use etcetera::BaseStrategy;
use serde::Deserialize;

use crate::error::ConfigError;

/// File name looked up in the project root.
pub const PROJECT_CONFIG_FILE: &str = ".codeintel.toml";

/// Placeholder replaced by the (regex-escaped) method name in declaration
/// patterns.
pub const NAME_PLACEHOLDER: &str = "{name}";

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub search: SearchConfig,
    /// Languages declared in the config file.  Use
    /// [`Config::effective_languages`] to get them merged with the
    /// built-in ones.
    pub languages: Vec<LanguageConfig>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct SearchConfig {
    /// Upper bound on directory listings in flight at once.
    pub max_concurrent_listings: usize,
    /// Upper bound on `extends` hops while looking for a method.
    pub max_inheritance_depth: u32,
    /// Directory names never descended into.
    pub skip_dirs: Vec<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_concurrent_listings: 16,
            max_inheritance_depth: 20,
            skip_dirs: vec![".git".to_string()],
        }
    }
}

/// The textual conventions of one editor language.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct LanguageConfig {
    pub name: String,
    /// Extensions without the leading dot.
    pub extensions: Vec<String>,
    /// Call operators, tried in order.
    pub call_operators: Vec<String>,
    /// Regex templates recognising a function declaration; `{name}` is
    /// replaced by the escaped method name.
    pub declaration_patterns: Vec<String>,
    /// Keyword introducing the parent class, e.g. `extends`.
    pub extends_marker: Option<String>,
    /// Keyword used to construct objects, e.g. `new`.
    pub construction_keyword: Option<String>,
    pub self_references: Vec<String>,
    pub parent_references: Vec<String>,
}

impl LanguageConfig {
    pub fn php() -> Self {
        Self {
            name: "php".to_string(),
            extensions: strings(&["php", "phtml", "inc"]),
            call_operators: strings(&["->", "::"]),
            declaration_patterns: strings(&[r"\bfunction\s+&?{name}\b"]),
            extends_marker: Some("extends".to_string()),
            construction_keyword: Some("new".to_string()),
            self_references: strings(&["this", "self", "static"]),
            parent_references: strings(&["parent"]),
        }
    }

    pub fn javascript() -> Self {
        Self {
            name: "javascript".to_string(),
            extensions: strings(&["js", "mjs", "cjs", "jsx"]),
            call_operators: strings(&["."]),
            declaration_patterns: strings(&[
                r"\bfunction\s+{name}\b",
                r"\b{name}\s*[:=]\s*function\b",
                r"^\s*(?:(?:static|async|get|set)\s+)*{name}\s*\([^)]*\)\s*\{",
            ]),
            extends_marker: Some("extends".to_string()),
            construction_keyword: Some("new".to_string()),
            self_references: strings(&["this"]),
            parent_references: strings(&["super"]),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Config {
    /// Load the configuration for a project.
    ///
    /// A missing file is not an error; an unreadable or malformed one is.
    pub fn load(project_root: Option<&Path>) -> Result<Self, ConfigError> {
        let candidates = project_root
            .map(|root| root.join(PROJECT_CONFIG_FILE))
            .into_iter()
            .chain(user_config_path());

        for path in candidates {
            if path.is_file() {
                tracing::debug!("loading config from {}", path.display());
                return Self::from_file(&path);
            }
        }

        Ok(Self::default())
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content, path)
    }

    /// Parse TOML content.  `origin` is only used in error messages.
    pub fn from_toml_str(content: &str, origin: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Built-in languages with the configured ones layered on top.
    pub fn effective_languages(&self) -> Vec<LanguageConfig> {
        let mut languages = vec![LanguageConfig::php(), LanguageConfig::javascript()];
        for configured in &self.languages {
            match languages.iter_mut().find(|l| l.name == configured.name) {
                Some(existing) => *existing = configured.clone(),
                None => languages.push(configured.clone()),
            }
        }
        languages
    }
}

/// `<user config dir>/codeintel-nav/config.toml`, when a home directory
/// can be determined.
pub fn user_config_path() -> Option<PathBuf> {
    let strategy = etcetera::choose_base_strategy().ok()?;
    Some(strategy.config_dir().join("codeintel-nav").join("config.toml"))
}
