/// File-system backed collaborators.
///
/// - [`FsFileTree`] lists directories with `tokio::fs`.
/// - [`DocumentStore`] keeps the documents the editor has open, keyed by
///   canonical path, and loads everything else from disk.
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::NavigationError;
use crate::host::{DocumentProvider, FileTree};
use crate::types::{SourceDocument, TreeEntry};
use crate::util::path_has_file_name;

/// The project directory on disk.
#[derive(Debug, Clone)]
pub struct FsFileTree {
    root: PathBuf,
    skip_dirs: Vec<String>,
}

impl FsFileTree {
    pub fn new(root: impl Into<PathBuf>, skip_dirs: Vec<String>) -> Self {
        Self {
            root: root.into(),
            skip_dirs,
        }
    }

    pub fn root_path(&self) -> &Path {
        &self.root
    }

    fn is_skipped(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| self.skip_dirs.iter().any(|skip| skip == name))
    }
}

#[tower_lsp::async_trait]
impl FileTree for FsFileTree {
    fn root(&self) -> Option<TreeEntry> {
        Some(TreeEntry::Directory(self.root.clone()))
    }

    async fn list(&self, dir: &Path) -> std::io::Result<Vec<TreeEntry>> {
        let mut entries = Vec::new();
        let mut read_dir = tokio::fs::read_dir(dir).await?;

        while let Some(entry) = read_dir.next_entry().await? {
            let path = entry.path();
            let file_type = match entry.file_type().await {
                Ok(file_type) => file_type,
                Err(err) => {
                    tracing::warn!("skipping {}: {}", path.display(), err);
                    continue;
                }
            };

            if file_type.is_dir() {
                if !self.is_skipped(&path) {
                    entries.push(TreeEntry::Directory(path));
                }
            } else if file_type.is_file() {
                entries.push(TreeEntry::File(path));
            } else if file_type.is_symlink() {
                // Symlinked directories are not followed.
                if tokio::fs::metadata(&path).await.is_ok_and(|m| m.is_file()) {
                    entries.push(TreeEntry::File(path));
                }
            }
        }

        Ok(entries)
    }
}

/// Open documents, keyed by canonical path.
#[derive(Debug, Default)]
pub struct DocumentStore {
    open: Mutex<HashMap<PathBuf, SourceDocument>>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `path` as open with `text`, replacing any earlier content.
    pub fn open(&self, path: &Path, text: impl Into<Arc<str>>) -> SourceDocument {
        let document = SourceDocument::new(path, text, true);
        let key = canonical(path);
        self.open.lock().insert(key, document.clone());
        document
    }

    /// Replace the content of an open document.
    pub fn update(&self, path: &Path, text: impl Into<Arc<str>>) -> SourceDocument {
        self.open(path, text)
    }

    pub fn close(&self, path: &Path) -> Option<SourceDocument> {
        let key = canonical(path);
        self.open.lock().remove(&key)
    }

    pub fn get(&self, path: &Path) -> Option<SourceDocument> {
        let key = canonical(path);
        self.open.lock().get(&key).cloned()
    }

    pub fn len(&self) -> usize {
        self.open.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[tower_lsp::async_trait]
impl DocumentProvider for DocumentStore {
    fn find_open(&self, file_name: &str) -> Option<SourceDocument> {
        self.open
            .lock()
            .values()
            .find(|doc| path_has_file_name(&doc.path, file_name))
            .cloned()
    }

    async fn load(&self, path: &Path) -> Result<SourceDocument, NavigationError> {
        let key = tokio::fs::canonicalize(path)
            .await
            .unwrap_or_else(|_| path.to_path_buf());
        let open = self.open.lock().get(&key).cloned();
        if let Some(open) = open {
            return Ok(open);
        }
        let text = tokio::fs::read_to_string(path).await.map_err(|source| {
            NavigationError::DocumentLoadFailed {
                path: path.to_path_buf(),
                source,
            }
        })?;
        Ok(SourceDocument::new(path, text, false))
    }
}

/// The canonical form of `path`, or `path` itself when it does not exist
/// on disk.
fn canonical(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
