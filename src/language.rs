/// Compiled per-language matching rules.
///
/// A [`Language`] is built from a [`LanguageConfig`] once, when the
/// navigator is created.  Patterns that depend on the name being searched
/// for (declarations, construction sites) are assembled per lookup with
/// the name passed through [`regex::escape`].
use std::path::Path;

use regex::Regex;

use crate::config::{Config, LanguageConfig, NAME_PLACEHOLDER};
use crate::error::ConfigError;
use crate::util::{is_identifier_char, short_class_name};

#[derive(Debug, Clone)]
pub struct Language {
    name: String,
    extensions: Vec<String>,
    call_operators: Vec<String>,
    declaration_templates: Vec<String>,
    extends: Option<Regex>,
    construction_keyword: Option<String>,
    self_references: Vec<String>,
    parent_references: Vec<String>,
}

impl Language {
    pub fn from_config(config: &LanguageConfig) -> Result<Self, ConfigError> {
        // Validate each template up front so per-lookup compilation
        // cannot fail later on.
        for template in &config.declaration_patterns {
            let probe = template.replace(NAME_PLACEHOLDER, "probe");
            Regex::new(&probe).map_err(|source| ConfigError::Pattern {
                language: config.name.clone(),
                pattern: template.clone(),
                source,
            })?;
        }

        let extends = match &config.extends_marker {
            Some(marker) if !marker.is_empty() => {
                // `@extends` docblock tags and generic arguments are not part of
                // the parent name.
                let pattern = format!(r"(?:^|[^@\w$]){}\s+([^\s<]+)", regex::escape(marker));
                Some(Regex::new(&pattern).map_err(|source| ConfigError::Pattern {
                    language: config.name.clone(),
                    pattern,
                    source,
                })?)
            }
            _ => None,
        };

        Ok(Self {
            name: config.name.clone(),
            extensions: config.extensions.clone(),
            call_operators: config
                .call_operators
                .iter()
                .filter(|op| !op.is_empty())
                .cloned()
                .collect(),
            declaration_templates: config.declaration_patterns.clone(),
            extends,
            construction_keyword: config
                .construction_keyword
                .clone()
                .filter(|kw| !kw.is_empty()),
            self_references: config.self_references.clone(),
            parent_references: config.parent_references.clone(),
        })
    }

    /// Fallback for files with no configured language: no operators, so
    /// only bare file-name lookups are possible.
    pub fn plain() -> Self {
        Self {
            name: "plain".to_string(),
            extensions: Vec::new(),
            call_operators: Vec::new(),
            declaration_templates: Vec::new(),
            extends: None,
            construction_keyword: None,
            self_references: Vec::new(),
            parent_references: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call_operators(&self) -> &[String] {
        &self.call_operators
    }

    pub fn handles_extension(&self, extension: &str) -> bool {
        self.extensions
            .iter()
            .any(|ext| ext.eq_ignore_ascii_case(extension))
    }

    /// Declaration regexes for `name`, in template order.
    pub fn declaration_patterns(&self, name: &str) -> Vec<Regex> {
        let escaped = regex::escape(name);
        self.declaration_templates
            .iter()
            .filter_map(|template| Regex::new(&template.replace(NAME_PLACEHOLDER, &escaped)).ok())
            .collect()
    }

    /// The parent class named by the first `extends` marker in `text`.
    ///
    /// Only the first whitespace-separated token after the marker counts,
    /// so `extends Foo implements Bar` yields `Foo`.  A brace glued to the
    /// name, generic arguments and namespace qualifiers are stripped.
    /// Comment lines are skipped.
    pub fn parent_name(&self, text: &str) -> Option<String> {
        let extends = self.extends.as_ref()?;
        text.lines().filter(|line| !is_comment_line(line)).find_map(|line| {
            let token = extends.captures(line)?.get(1)?.as_str();
            let token = token.trim_end_matches(['{', ',', ';']);
            let name = short_class_name(token);
            (!name.is_empty()).then(|| name.to_string())
        })
    }

    /// Look for `receiver = new ClassName(...)` and return `ClassName`.
    ///
    /// The first construction site in the document wins.
    pub fn construction_site(&self, receiver: &str, text: &str) -> Option<String> {
        let keyword = self.construction_keyword.as_ref()?;
        let pattern = format!(
            r"(?:^|[^\w$]){}\s*=\s*{}\s+([^\s;()]+)",
            regex::escape(receiver),
            regex::escape(keyword)
        );
        let regex = Regex::new(&pattern).ok()?;
        text.lines().find_map(|line| {
            let token = regex.captures(line)?.get(1)?.as_str();
            let name = short_class_name(token.trim_matches([';', '(', ')']));
            (!name.is_empty()).then(|| name.to_string())
        })
    }

    /// Whether the receiver starts with a self reference (`$this`, `self`).
    pub fn is_self_reference(&self, receiver: &str) -> bool {
        first_identifier(receiver).is_some_and(|id| self.self_references.iter().any(|r| r == id))
    }

    /// Whether the receiver starts with a parent reference (`parent`).
    pub fn is_parent_reference(&self, receiver: &str) -> bool {
        first_identifier(receiver)
            .is_some_and(|id| self.parent_references.iter().any(|r| r == id))
    }
}

/// Lines that are entirely comment: docblock bodies, `//` and `#`.
fn is_comment_line(line: &str) -> bool {
    let trimmed = line.trim_start();
    ["*", "/*", "//", "#"]
        .iter()
        .any(|prefix| trimmed.starts_with(prefix))
}

/// The leading identifier of a receiver expression, ignoring a `$` sigil.
fn first_identifier(receiver: &str) -> Option<&str> {
    receiver
        .split(|c: char| !is_identifier_char(c))
        .find(|part| !part.is_empty())
}

/// All configured languages, looked up by file extension.
#[derive(Debug, Clone)]
pub struct Languages {
    languages: Vec<Language>,
    plain: Language,
}

impl Languages {
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let languages = config
            .effective_languages()
            .iter()
            .map(Language::from_config)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            languages,
            plain: Language::plain(),
        })
    }

    /// The language for a document path, or the plain fallback.
    pub fn for_path(&self, path: &Path) -> &Language {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| self.languages.iter().find(|l| l.handles_extension(ext)))
            .unwrap_or(&self.plain)
    }

    pub fn by_name(&self, name: &str) -> Option<&Language> {
        self.languages.iter().find(|l| l.name == name)
    }
}
