/// Parent class resolution.
///
/// A document's parent is whatever follows its first `extends` marker.
/// The parent document is taken from the set of open documents when one
/// with the expected file name (`<Parent>.<current extension>`) is open,
/// otherwise it is searched for in the project tree and loaded.
///
/// A parent that is declared but cannot be located is an error, never a
/// silent end of the chain.
use crate::error::NavigationError;
use crate::host::DocumentProvider;
use crate::language::Language;
use crate::search::DirectorySearcher;
use crate::types::SourceDocument;
use crate::util::file_name_for;

pub struct InheritanceResolver<'a> {
    language: &'a Language,
    documents: &'a dyn DocumentProvider,
    searcher: &'a DirectorySearcher<'a>,
}

impl<'a> InheritanceResolver<'a> {
    pub fn new(
        language: &'a Language,
        documents: &'a dyn DocumentProvider,
        searcher: &'a DirectorySearcher<'a>,
    ) -> Self {
        Self {
            language,
            documents,
            searcher,
        }
    }

    /// The parent class name declared in `doc`, if any.
    pub fn parent_name(&self, doc: &SourceDocument) -> Option<String> {
        self.language.parent_name(&doc.text)
    }

    /// The parent document of `doc`, or `None` when `doc` declares no
    /// parent.
    pub async fn parent(
        &self,
        doc: &SourceDocument,
    ) -> Result<Option<SourceDocument>, NavigationError> {
        let Some(parent_name) = self.parent_name(doc) else {
            return Ok(None);
        };
        tracing::debug!("{} extends {}", doc.path.display(), parent_name);

        let file_name = file_name_for(&parent_name, doc.extension());
        self.locate(&file_name).await.map(Some)
    }

    /// Find the document named `file_name`: an open one first, then the
    /// project tree.
    pub async fn locate(&self, file_name: &str) -> Result<SourceDocument, NavigationError> {
        if let Some(open) = self.documents.find_open(file_name) {
            return Ok(open);
        }
        let path = self.searcher.search(file_name).await?;
        self.documents.load(&path).await
    }
}
