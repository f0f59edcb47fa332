/// Data types shared across the resolution pipeline.
///
/// Everything here is transient: a `Selection` lives for one navigation
/// request, a `SourceDocument` is a read-only snapshot handed out by the
/// document provider, and a `TreeEntry` is only held while a directory
/// search is in flight.
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

/// A zero-based line / character position inside a document.
///
/// Characters are counted in `char`s, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct TextPosition {
    pub line: u32,
    pub character: u32,
}

impl TextPosition {
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// A selection range.  `start == end` means a bare caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct TextRange {
    pub start: TextPosition,
    pub end: TextPosition,
}

impl TextRange {
    pub fn new(start: TextPosition, end: TextPosition) -> Self {
        Self { start, end }
    }

    /// A collapsed range at `position`.
    pub fn caret(position: TextPosition) -> Self {
        Self {
            start: position,
            end: position,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn is_single_line(&self) -> bool {
        self.start.line == self.end.line
    }
}

/// The classified editor selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// The selected (or auto-selected) identifier.
    pub text: String,
    /// The receiver the call is made on, or the selection's own receiver
    /// expression when the selection sits in front of a call operator.
    pub object: Option<String>,
    /// `true` when a call operator immediately precedes the selection.
    pub is_method_call: bool,
}

impl Selection {
    /// A bare identifier with no operator context.
    pub fn bare(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            object: None,
            is_method_call: false,
        }
    }
}

/// A read-only snapshot of a document's path and text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    pub path: PathBuf,
    pub text: Arc<str>,
    /// Whether the document is currently open in the editor.
    pub is_open: bool,
}

impl SourceDocument {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<Arc<str>>, is_open: bool) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
            is_open,
        }
    }

    /// The file extension without the leading dot, if any.
    pub fn extension(&self) -> Option<&str> {
        self.path.extension().and_then(OsStr::to_str)
    }

    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(OsStr::to_str)
    }
}

/// A node in the project file tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TreeEntry {
    File(PathBuf),
    Directory(PathBuf),
}

impl TreeEntry {
    pub fn path(&self) -> &Path {
        match self {
            TreeEntry::File(path) | TreeEntry::Directory(path) => path,
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, TreeEntry::Directory(_))
    }
}

/// What a receiver expression resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallTarget {
    /// `$this`, `self`, `static` and friends: search the current document.
    SelfReference,
    /// A class name whose file should be looked up.
    Class(String),
}

/// A method declaration located by the method locator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodMatch {
    /// Zero-based line of the declaration.
    pub line: u32,
    /// The document the declaration lives in (possibly an ancestor).
    pub document: SourceDocument,
}

/// The outcome of a successful navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Navigation {
    /// A file was opened (or was already active).
    Opened { path: PathBuf },
    /// A file was opened and the caret moved to `line`, column 0.
    Positioned { path: PathBuf, line: u32 },
}

impl Navigation {
    pub fn path(&self) -> &Path {
        match self {
            Navigation::Opened { path } | Navigation::Positioned { path, .. } => path,
        }
    }

    /// The target line; file-only navigation lands on the first line.
    pub fn line(&self) -> u32 {
        match self {
            Navigation::Opened { .. } => 0,
            Navigation::Positioned { line, .. } => *line,
        }
    }
}
