/// Method declaration lookup.
///
/// The lookup scans the document line by line for a declaration of the
/// method.  On a miss it moves to the parent document and tries again,
/// until a declaration is found or the chain ends.  The chain ends when a
/// document has no `extends` marker, when it loops back to a document that
/// was already visited, or after `max_depth` hops.
use std::collections::HashSet;
use std::path::PathBuf;

use tokio_util::sync::CancellationToken;

use crate::error::NavigationError;
use crate::inheritance::InheritanceResolver;
use crate::language::Language;
use crate::types::{MethodMatch, SourceDocument};

/// Finds the line declaring a method inside one document's text.
pub trait DeclarationScanner: Send + Sync {
    /// Zero-based line of the declaration of `name` in `text`.
    fn declaration_line(&self, name: &str, text: &str) -> Option<u32>;
}

impl DeclarationScanner for Language {
    /// When several lines match, the last one wins.
    fn declaration_line(&self, name: &str, text: &str) -> Option<u32> {
        let patterns = self.declaration_patterns(name);
        if patterns.is_empty() {
            return None;
        }
        text.lines()
            .enumerate()
            .filter(|(_, line)| patterns.iter().any(|p| p.is_match(line)))
            .map(|(index, _)| index as u32)
            .last()
    }
}

pub struct MethodLocator<'a> {
    scanner: &'a dyn DeclarationScanner,
    inheritance: &'a InheritanceResolver<'a>,
    max_depth: u32,
    cancel: CancellationToken,
}

impl<'a> MethodLocator<'a> {
    pub fn new(
        scanner: &'a dyn DeclarationScanner,
        inheritance: &'a InheritanceResolver<'a>,
        max_depth: u32,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            scanner,
            inheritance,
            max_depth,
            cancel,
        }
    }

    /// Find `name` in `doc` or, failing that, in its ancestors.
    pub async fn find_method(
        &self,
        name: &str,
        doc: SourceDocument,
    ) -> Result<MethodMatch, NavigationError> {
        let mut current = doc;
        let mut visited: HashSet<PathBuf> = HashSet::new();
        let mut hops = 0u32;

        loop {
            if self.cancel.is_cancelled() {
                return Err(NavigationError::Cancelled);
            }

            if let Some(line) = self.scanner.declaration_line(name, &current.text) {
                tracing::debug!("found `{}` in {}:{}", name, current.path.display(), line + 1);
                return Ok(MethodMatch {
                    line,
                    document: current,
                });
            }

            visited.insert(current.path.clone());
            if hops >= self.max_depth {
                tracing::debug!("giving up on `{}` after {} parents", name, hops);
                return Err(method_not_found(name));
            }

            match self.inheritance.parent(&current).await? {
                Some(parent) if !visited.contains(&parent.path) => {
                    hops += 1;
                    current = parent;
                }
                Some(parent) => {
                    tracing::warn!("inheritance cycle through {}", parent.path.display());
                    return Err(method_not_found(name));
                }
                None => return Err(method_not_found(name)),
            }
        }
    }
}

fn method_not_found(name: &str) -> NavigationError {
    NavigationError::MethodNotFound {
        method: name.to_string(),
    }
}
