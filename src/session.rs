/// A headless editor session.
///
/// [`BufferEditor`] is an [`Editor`] over a document snapshot with its own
/// selection and caret.  [`SessionHost`] keeps track of the active buffer
/// and opens files through a [`DocumentProvider`].  The LSP server and the
/// `goto` command use them to drive the navigator without a real editor
/// window.
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::NavigationError;
use crate::host::{DocumentProvider, Editor, EditorHost};
use crate::types::{SourceDocument, TextPosition, TextRange};
use crate::util::{char_slice, word_bounds};

pub struct BufferEditor {
    document: SourceDocument,
    selection: Mutex<TextRange>,
}

impl BufferEditor {
    pub fn new(document: SourceDocument, selection: TextRange) -> Self {
        Self {
            document,
            selection: Mutex::new(selection),
        }
    }

    /// An editor with a bare caret at `position`.
    pub fn with_caret(document: SourceDocument, position: TextPosition) -> Self {
        Self::new(document, TextRange::caret(position))
    }

    pub fn cursor(&self) -> TextPosition {
        self.selection.lock().end
    }
}

impl Editor for BufferEditor {
    fn document(&self) -> SourceDocument {
        self.document.clone()
    }

    fn selection(&self) -> TextRange {
        *self.selection.lock()
    }

    fn selected_text(&self) -> String {
        let range = self.selection();
        if range.is_empty() || !range.is_single_line() {
            return String::new();
        }
        let line = self.line_text(range.start.line).unwrap_or_default();
        let (a, b) = (range.start.character, range.end.character);
        char_slice(&line, a.min(b) as usize, a.max(b) as usize)
    }

    fn line_text(&self, line: u32) -> Option<String> {
        self.document
            .text
            .lines()
            .nth(line as usize)
            .map(str::to_string)
    }

    fn select_word_at(&self, position: TextPosition) -> Option<TextRange> {
        let line = self.line_text(position.line)?;
        let (start, end) = word_bounds(&line, position.character as usize)?;
        let range = TextRange::new(
            TextPosition::new(position.line, start as u32),
            TextPosition::new(position.line, end as u32),
        );
        *self.selection.lock() = range;
        Some(range)
    }

    fn set_cursor(&self, position: TextPosition, keep_anchor: bool) {
        let mut selection = self.selection.lock();
        *selection = if keep_anchor {
            TextRange::new(selection.start, position)
        } else {
            TextRange::caret(position)
        };
    }
}

/// Tracks the active buffer and the files opened during a session.
pub struct SessionHost {
    documents: Arc<dyn DocumentProvider>,
    active: Mutex<Arc<BufferEditor>>,
    opened: Mutex<Vec<PathBuf>>,
}

impl SessionHost {
    pub fn new(documents: Arc<dyn DocumentProvider>, active: BufferEditor) -> Self {
        Self {
            documents,
            active: Mutex::new(Arc::new(active)),
            opened: Mutex::new(Vec::new()),
        }
    }

    /// The active buffer.
    pub fn active(&self) -> Arc<BufferEditor> {
        self.active.lock().clone()
    }

    /// Every file opened so far, in order.
    pub fn opened_files(&self) -> Vec<PathBuf> {
        self.opened.lock().clone()
    }
}

#[tower_lsp::async_trait]
impl EditorHost for SessionHost {
    fn active_editor(&self) -> Option<Arc<dyn Editor>> {
        let editor: Arc<dyn Editor> = self.active();
        Some(editor)
    }

    async fn open_file(&self, path: &Path) -> Result<(), NavigationError> {
        if self.active().document.path == path {
            return Ok(());
        }
        let document = self.documents.load(path).await.map_err(|err| {
            NavigationError::OpenFailed {
                path: path.to_path_buf(),
                reason: err.to_string(),
            }
        })?;
        *self.active.lock() = Arc::new(BufferEditor::with_caret(document, TextPosition::default()));
        self.opened.lock().push(path.to_path_buf());
        Ok(())
    }
}
