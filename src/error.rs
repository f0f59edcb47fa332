use std::path::PathBuf;

use thiserror::Error;

/// Why a navigation request did not move the editor.
#[derive(Debug, Error)]
pub enum NavigationError {
    #[error("no active editor")]
    NoActiveEditor,
    #[error("multi-line selections are not supported")]
    SelectionInvalid,
    #[error("nothing is selected and there is no word under the cursor")]
    EmptySelection,
    #[error("no file named `{file_name}` in the project")]
    FileNotFound { file_name: String },
    #[error("method `{method}` not found in the inheritance chain")]
    MethodNotFound { method: String },
    #[error("{} does not extend another class", document.display())]
    ParentNotDeclared { document: PathBuf },
    #[error("failed to load {}: {source}", path.display())]
    DocumentLoadFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to open {}: {reason}", path.display())]
    OpenFailed { path: PathBuf, reason: String },
    #[error("navigation superseded by a newer request")]
    Cancelled,
}

/// Errors raised while loading configuration or compiling language patterns.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("language `{language}`: invalid pattern `{pattern}`: {source}")]
    Pattern {
        language: String,
        pattern: String,
        source: regex::Error,
    },
}
