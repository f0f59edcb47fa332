#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use codeintel_nav::host::{DocumentProvider, FileTree};
use codeintel_nav::session::{BufferEditor, SessionHost};
use codeintel_nav::util::path_has_file_name;
use codeintel_nav::{Config, NavigationError, Navigator, SourceDocument, TextPosition, TreeEntry};

pub const PROJECT_ROOT: &str = "/project";

/// An in-memory project: a file tree plus the documents in it.
#[derive(Default)]
pub struct MemoryProject {
    files: HashMap<PathBuf, String>,
    open: HashSet<PathBuf>,
    unreadable_dirs: HashSet<PathBuf>,
    unloadable: HashSet<PathBuf>,
}

impl MemoryProject {
    /// Build a project from `(relative path, content)` pairs.
    pub fn new(files: &[(&str, &str)]) -> Self {
        let mut project = Self::default();
        for (rel, content) in files {
            project
                .files
                .insert(Path::new(PROJECT_ROOT).join(rel), content.to_string());
        }
        project
    }

    /// Mark a file as open in the editor.
    pub fn with_open(mut self, rel: &str) -> Self {
        self.open.insert(Self::path(rel));
        self
    }

    /// Make listing this directory fail.
    pub fn with_unreadable_dir(mut self, rel: &str) -> Self {
        self.unreadable_dirs.insert(Self::path(rel));
        self
    }

    /// Keep a file visible in the tree but make loading it fail.
    pub fn with_unloadable(mut self, rel: &str) -> Self {
        self.unloadable.insert(Self::path(rel));
        self
    }

    pub fn path(rel: &str) -> PathBuf {
        Path::new(PROJECT_ROOT).join(rel)
    }

    pub fn document(&self, rel: &str) -> SourceDocument {
        let path = Self::path(rel);
        let text = self.files.get(&path).cloned().unwrap_or_default();
        let is_open = self.open.contains(&path);
        SourceDocument::new(path, text, is_open)
    }
}

#[tower_lsp::async_trait]
impl FileTree for MemoryProject {
    fn root(&self) -> Option<TreeEntry> {
        Some(TreeEntry::Directory(PathBuf::from(PROJECT_ROOT)))
    }

    async fn list(&self, dir: &Path) -> io::Result<Vec<TreeEntry>> {
        if self.unreadable_dirs.contains(dir) {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        }

        let mut files = Vec::new();
        let mut dirs = HashSet::new();
        for path in self.files.keys() {
            let Ok(rest) = path.strip_prefix(dir) else {
                continue;
            };
            let mut components = rest.components();
            let Some(first) = components.next() else {
                continue;
            };
            let child = dir.join(first);
            if components.next().is_some() {
                dirs.insert(child);
            } else {
                files.push(TreeEntry::File(child));
            }
        }

        let mut entries: Vec<TreeEntry> = dirs.into_iter().map(TreeEntry::Directory).collect();
        entries.sort_by(|a, b| a.path().cmp(b.path()));
        files.sort_by(|a, b| a.path().cmp(b.path()));
        entries.extend(files);
        Ok(entries)
    }
}

#[tower_lsp::async_trait]
impl DocumentProvider for MemoryProject {
    fn find_open(&self, file_name: &str) -> Option<SourceDocument> {
        self.open
            .iter()
            .find(|path| path_has_file_name(path, file_name))
            .map(|path| SourceDocument::new(path.clone(), self.files[path].clone(), true))
    }

    async fn load(&self, path: &Path) -> Result<SourceDocument, NavigationError> {
        if self.unloadable.contains(path) {
            return Err(NavigationError::DocumentLoadFailed {
                path: path.to_path_buf(),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
            });
        }
        match self.files.get(path) {
            Some(text) => Ok(SourceDocument::new(
                path,
                text.clone(),
                self.open.contains(path),
            )),
            None => Err(NavigationError::DocumentLoadFailed {
                path: path.to_path_buf(),
                source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
            }),
        }
    }
}

/// A navigator over an in-memory project.
pub fn memory_navigator(project: &Arc<MemoryProject>) -> Navigator {
    let files: Arc<dyn FileTree> = project.clone();
    let documents: Arc<dyn DocumentProvider> = project.clone();
    Navigator::new(&Config::default(), files, documents).expect("default config is valid")
}

/// A session whose active editor shows `rel` with the caret at `line:col`.
pub fn session_at(project: &Arc<MemoryProject>, rel: &str, line: u32, col: u32) -> SessionHost {
    let documents: Arc<dyn DocumentProvider> = project.clone();
    let editor = BufferEditor::with_caret(project.document(rel), TextPosition::new(line, col));
    SessionHost::new(documents, editor)
}

/// Line and column of the first occurrence of `needle` in `text`,
/// offset by `extra` characters.
pub fn locate(text: &str, needle: &str, extra: u32) -> (u32, u32) {
    for (i, line) in text.lines().enumerate() {
        if let Some(byte) = line.find(needle) {
            let col = line[..byte].chars().count() as u32;
            return (i as u32, col + extra);
        }
    }
    panic!("`{}` not found in fixture", needle);
}

/// Create a temp directory populated with `(relative path, content)` files.
pub fn create_workspace(files: &[(&str, &str)]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    for (rel_path, content) in files {
        let full = dir.path().join(rel_path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).expect("failed to create dirs");
        }
        fs::write(&full, content).expect("failed to write file");
    }
    dir
}

/// Wraps a [`SessionHost`] and remembers reported failures.
pub struct ReportingHost {
    pub session: SessionHost,
    failures: parking_lot::Mutex<Vec<String>>,
}

impl ReportingHost {
    pub fn new(session: SessionHost) -> Self {
        Self {
            session,
            failures: parking_lot::Mutex::new(Vec::new()),
        }
    }

    pub fn failures(&self) -> Vec<String> {
        self.failures.lock().clone()
    }
}

#[tower_lsp::async_trait]
impl codeintel_nav::host::EditorHost for ReportingHost {
    fn active_editor(&self) -> Option<Arc<dyn codeintel_nav::host::Editor>> {
        self.session.active_editor()
    }

    async fn open_file(&self, path: &Path) -> Result<(), NavigationError> {
        self.session.open_file(path).await
    }

    fn report_failure(&self, error: &NavigationError) {
        self.failures.lock().push(error.to_string());
    }
}
