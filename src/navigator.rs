/// The navigation entry point.
///
/// [`Navigator::handle_navigate`] reads the active editor, classifies the
/// selection and then takes one of two routes:
///
///   - **file lookup**: no operator context, or the selection is itself a
///     receiver.  The matching file is opened.
///   - **method lookup**: the selection follows a call operator.  The
///     receiver is resolved to a class (or to the current document for
///     `$this` and for an operator with no receiver on its line), the class file is located, and the method declaration is
///     searched there and up its inheritance chain.  The file is opened if
///     it is not the active one and the caret is moved to the declaration.
///
/// Failures are logged, handed to [`EditorHost::report_failure`] and
/// returned.  The editor is only touched once the target is fully
/// resolved, so a failed request leaves it as it was.
///
/// Starting a request cancels the one still in flight, if any.
use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

use crate::config::{Config, SearchConfig};
use crate::definition::{MethodLocator, resolve_call_target};
use crate::error::{ConfigError, NavigationError};
use crate::host::{DocumentProvider, EditorHost, FileTree};
use crate::inheritance::InheritanceResolver;
use crate::language::Languages;
use crate::search::DirectorySearcher;
use crate::selection;
use crate::types::{CallTarget, MethodMatch, Navigation, SourceDocument, TextPosition};
use crate::util::file_name_for;

pub struct Navigator {
    languages: Languages,
    search: SearchConfig,
    files: Arc<dyn FileTree>,
    documents: Arc<dyn DocumentProvider>,
    listings: Semaphore,
    in_flight: Mutex<Option<CancellationToken>>,
}

impl Navigator {
    pub fn new(
        config: &Config,
        files: Arc<dyn FileTree>,
        documents: Arc<dyn DocumentProvider>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            languages: Languages::from_config(config)?,
            search: config.search.clone(),
            files,
            documents,
            listings: Semaphore::new(config.search.max_concurrent_listings.max(1)),
            in_flight: Mutex::new(None),
        })
    }

    pub fn languages(&self) -> &Languages {
        &self.languages
    }

    /// Navigate to the definition of whatever is selected in the host's
    /// active editor.
    pub async fn handle_navigate(
        &self,
        host: &dyn EditorHost,
    ) -> Result<Navigation, NavigationError> {
        let cancel = self.begin_request();
        let result = self.navigate(host, &cancel).await;

        match &result {
            Ok(navigation) => tracing::info!(
                "navigated to {}:{}",
                navigation.path().display(),
                navigation.line() + 1
            ),
            Err(NavigationError::Cancelled) => tracing::debug!("navigation superseded"),
            Err(err) => {
                tracing::warn!("navigation failed: {}", err);
                host.report_failure(err);
            }
        }
        result
    }

    /// Register a new request, cancelling the previous one.
    fn begin_request(&self) -> CancellationToken {
        let token = CancellationToken::new();
        if let Some(previous) = self.in_flight.lock().replace(token.clone()) {
            previous.cancel();
        }
        token
    }

    async fn navigate(
        &self,
        host: &dyn EditorHost,
        cancel: &CancellationToken,
    ) -> Result<Navigation, NavigationError> {
        let editor = host.active_editor().ok_or(NavigationError::NoActiveEditor)?;
        let document = editor.document();
        let language = self.languages.for_path(&document.path);
        let selection = selection::analyze_editor(editor.as_ref(), language.call_operators())?;
        tracing::debug!(
            "navigate: `{}` object={:?} method_call={} ({})",
            selection.text,
            selection.object,
            selection.is_method_call,
            language.name()
        );

        let searcher = DirectorySearcher::new(self.files.as_ref(), &self.listings, cancel.clone());
        let inheritance = InheritanceResolver::new(language, self.documents.as_ref(), &searcher);
        let extension = document.extension().map(str::to_string);

        let target = match selection.object.as_deref() {
            Some(object) => resolve_call_target(language, &document, object)?,
            // `->where()` continuing a chain from the previous line.
            None if selection.is_method_call => CallTarget::SelfReference,
            None => {
                let file_name = file_name_for(&selection.text, extension.as_deref());
                let path = searcher.search(&file_name).await?;
                return self.open(host, cancel, &path).await;
            }
        };

        if !selection.is_method_call {
            return match target {
                CallTarget::SelfReference => Ok(Navigation::Opened {
                    path: document.path.clone(),
                }),
                CallTarget::Class(class) => {
                    let file_name = file_name_for(&class, extension.as_deref());
                    let path = searcher.search(&file_name).await?;
                    self.open(host, cancel, &path).await
                }
            };
        }

        let start = match target {
            CallTarget::SelfReference => document.clone(),
            CallTarget::Class(class) => {
                let file_name = file_name_for(&class, extension.as_deref());
                inheritance.locate(&file_name).await?
            }
        };

        let locator = MethodLocator::new(
            language,
            &inheritance,
            self.search.max_inheritance_depth,
            cancel.clone(),
        );
        let found = locator.find_method(&selection.text, start).await?;
        self.position(host, cancel, &document, found).await
    }

    async fn open(
        &self,
        host: &dyn EditorHost,
        cancel: &CancellationToken,
        path: &Path,
    ) -> Result<Navigation, NavigationError> {
        if cancel.is_cancelled() {
            return Err(NavigationError::Cancelled);
        }
        host.open_file(path).await?;
        Ok(Navigation::Opened {
            path: path.to_path_buf(),
        })
    }

    async fn position(
        &self,
        host: &dyn EditorHost,
        cancel: &CancellationToken,
        active: &SourceDocument,
        found: MethodMatch,
    ) -> Result<Navigation, NavigationError> {
        if cancel.is_cancelled() {
            return Err(NavigationError::Cancelled);
        }
        let path = found.document.path;
        if path != active.path {
            host.open_file(&path).await?;
        }
        let editor = host.active_editor().ok_or(NavigationError::NoActiveEditor)?;
        editor.set_cursor(TextPosition::new(found.line, 0), false);
        Ok(Navigation::Positioned {
            path,
            line: found.line,
        })
    }
}
