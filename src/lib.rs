//! Heuristic go-to-definition.
//!
//! Given the selection in an editor, find the file and line where the
//! selected identifier is declared, without parsing the source.  Method
//! calls (`$obj->save()`, `parent::boot()`, `api.fetch()`) are resolved by
//! line-oriented pattern matching: `$obj = new Foo` tells which class a
//! variable holds, `extends Bar` tells where to look next when a class does
//! not declare the method itself, and class files are found by searching
//! the project tree for `<ClassName>.<extension>`.
//!
//! The pipeline, leaves first:
//!
//! - [`selection`]: classify the editor selection.
//! - [`search`]: find a file by name in the project tree.
//! - [`inheritance`]: read `extends` and locate the parent document.
//! - [`definition`]: locate method declarations and resolve receivers.
//! - [`navigator`]: tie it together and drive the editor.
//!
//! Editor, documents and file tree are reached through the traits in
//! [`host`]; [`workspace`] and [`session`] provide implementations backed
//! by the file system, used by the LSP server in [`server`].
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;
use tower_lsp::Client;
use tower_lsp::lsp_types::{Location, MessageType, Position, Range, Url};

pub mod config;
pub mod definition;
pub mod error;
pub mod host;
pub mod inheritance;
pub mod language;
pub mod navigator;
pub mod search;
pub mod selection;
mod server;
pub mod session;
pub mod types;
pub mod util;
pub mod workspace;

pub use config::Config;
pub use error::{ConfigError, NavigationError};
pub use navigator::Navigator;
pub use types::{Navigation, Selection, SourceDocument, TextPosition, TextRange, TreeEntry};

use crate::host::{DocumentProvider, FileTree};
use crate::session::{BufferEditor, SessionHost};
use crate::util::utf16_to_char_column;
use crate::workspace::{DocumentStore, FsFileTree};

pub struct Backend {
    name: String,
    version: String,
    documents: Arc<DocumentStore>,
    workspace_root: Mutex<Option<PathBuf>>,
    navigator: Mutex<Option<Arc<Navigator>>>,
    client: Option<Client>,
}

impl Backend {
    pub fn new(client: Client) -> Self {
        Self {
            client: Some(client),
            ..Self::new_test()
        }
    }

    pub fn new_test() -> Self {
        Self {
            name: "codeintel-nav".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            documents: Arc::new(DocumentStore::new()),
            workspace_root: Mutex::new(None),
            navigator: Mutex::new(None),
            client: None,
        }
    }

    /// A backend already configured for `root`, as if `initialize` had been
    /// called with it.
    pub fn new_test_with_workspace(root: PathBuf) -> Result<Self, ConfigError> {
        let backend = Self::new_test();
        backend.configure_workspace(root)?;
        Ok(backend)
    }

    /// Load the project's configuration and build the navigator for it.
    pub fn configure_workspace(&self, root: PathBuf) -> Result<(), ConfigError> {
        let config = Config::load(Some(root.as_path()))?;
        let files: Arc<dyn FileTree> =
            Arc::new(FsFileTree::new(root.clone(), config.search.skip_dirs.clone()));
        let documents: Arc<dyn DocumentProvider> = self.documents.clone();
        let navigator = Navigator::new(&config, files, documents)?;

        *self.navigator.lock() = Some(Arc::new(navigator));
        *self.workspace_root.lock() = Some(root);
        Ok(())
    }

    pub fn workspace_root(&self) -> Option<PathBuf> {
        self.workspace_root.lock().clone()
    }

    /// The documents the client currently has open.
    pub fn documents(&self) -> &DocumentStore {
        &self.documents
    }

    /// Resolve the definition of the identifier at `position` in the open
    /// document `uri`.  `position.character` counts UTF-16 code units.
    pub async fn resolve_definition(&self, uri: &Url, position: Position) -> Option<Location> {
        let navigator = self.navigator.lock().clone()?;
        let path = Self::file_path(uri)?;
        let document = self.documents.get(&path)?;

        let character = document
            .text
            .lines()
            .nth(position.line as usize)
            .map_or(position.character, |line| {
                utf16_to_char_column(line, position.character)
            });
        let editor =
            BufferEditor::with_caret(document, TextPosition::new(position.line, character));
        let documents: Arc<dyn DocumentProvider> = self.documents.clone();
        let host = SessionHost::new(documents, editor);

        match navigator.handle_navigate(&host).await {
            Ok(navigation) => {
                let target_uri = Url::from_file_path(navigation.path()).ok()?;
                let target = Position {
                    line: navigation.line(),
                    character: 0,
                };
                Some(Location {
                    uri: target_uri,
                    range: Range {
                        start: target,
                        end: target,
                    },
                })
            }
            Err(err) => {
                self.log(MessageType::INFO, format!("No definition: {}", err))
                    .await;
                None
            }
        }
    }

    pub(crate) async fn log(&self, typ: MessageType, message: String) {
        if let Some(client) = &self.client {
            client.log_message(typ, message).await;
        }
    }

    fn file_path(uri: &Url) -> Option<PathBuf> {
        uri.to_file_path().ok()
    }
}
