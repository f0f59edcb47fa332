/// Collaborator interfaces.
///
/// The navigator never touches an editor widget, a document buffer or the
/// file system directly.  It talks to these traits instead, so the same
/// resolution pipeline drives the LSP server, the `goto` command and the
/// test doubles.
use std::path::Path;
use std::sync::Arc;

use crate::error::NavigationError;
use crate::types::{SourceDocument, TextPosition, TextRange, TreeEntry};
use crate::util::word_bounds;

/// The active editor view.
pub trait Editor: Send + Sync {
    /// The document shown in this editor.
    fn document(&self) -> SourceDocument;

    /// The current selection (a collapsed range for a bare caret).
    fn selection(&self) -> TextRange;

    /// The selected text; empty when nothing is selected.
    fn selected_text(&self) -> String;

    /// Text of a single line, without its terminator.
    fn line_text(&self, line: u32) -> Option<String>;

    /// Select the identifier under `position` and return its range.
    fn select_word_at(&self, position: TextPosition) -> Option<TextRange> {
        let line = self.line_text(position.line)?;
        let (start, end) = word_bounds(&line, position.character as usize)?;
        Some(TextRange::new(
            TextPosition::new(position.line, start as u32),
            TextPosition::new(position.line, end as u32),
        ))
    }

    /// Move the caret.  With `keep_anchor` an existing selection anchor is
    /// preserved.
    fn set_cursor(&self, position: TextPosition, keep_anchor: bool);
}

/// Access to documents, open or on disk.
#[tower_lsp::async_trait]
pub trait DocumentProvider: Send + Sync {
    /// An already-open document whose file name matches `file_name`.
    fn find_open(&self, file_name: &str) -> Option<SourceDocument>;

    /// Load the document backing `path`.
    async fn load(&self, path: &Path) -> Result<SourceDocument, NavigationError>;
}

/// The project file tree.
#[tower_lsp::async_trait]
pub trait FileTree: Send + Sync {
    /// The project root directory, if a project is loaded.
    fn root(&self) -> Option<TreeEntry>;

    /// The direct children of `dir`.
    async fn list(&self, dir: &Path) -> std::io::Result<Vec<TreeEntry>>;
}

/// The editor application.
#[tower_lsp::async_trait]
pub trait EditorHost: Send + Sync {
    fn active_editor(&self) -> Option<Arc<dyn Editor>>;

    /// Open `path` into the active view.  On success the new view becomes
    /// the active editor.
    async fn open_file(&self, path: &Path) -> Result<(), NavigationError>;

    /// Surface a failed navigation to the user.
    fn report_failure(&self, _error: &NavigationError) {}
}
