/// Recursive file search over the project tree.
///
/// The search fans out across sibling directories without waiting for
/// each listing to finish, so when a file name occurs more than once the
/// result is *a* match, not necessarily the lexically first one.
///
/// Every search ends in one of three ways:
///   - `Ok(path)` as soon as any branch finds a matching file; the other
///     in-flight branches are dropped,
///   - `FileNotFound` once every listing has completed without a match,
///   - `Cancelled` when the request's cancellation token fires.
///
/// Directory listings are throttled by a semaphore shared between all
/// searches issued by one navigator.
use std::path::{Path, PathBuf};

use futures::future::{BoxFuture, FutureExt};
use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

use crate::error::NavigationError;
use crate::host::FileTree;
use crate::types::TreeEntry;
use crate::util::path_has_file_name;

pub struct DirectorySearcher<'a> {
    tree: &'a dyn FileTree,
    listings: &'a Semaphore,
    cancel: CancellationToken,
}

impl<'a> DirectorySearcher<'a> {
    pub fn new(tree: &'a dyn FileTree, listings: &'a Semaphore, cancel: CancellationToken) -> Self {
        Self {
            tree,
            listings,
            cancel,
        }
    }

    /// Search the whole project for a file named `target_file`.
    pub async fn search(&self, target_file: &str) -> Result<PathBuf, NavigationError> {
        let root = self.tree.root().ok_or_else(|| not_found(target_file))?;
        self.search_from(&root, target_file).await
    }

    /// Search below `root` for a file named `target_file` (extension
    /// included, case-insensitive).
    pub async fn search_from(
        &self,
        root: &TreeEntry,
        target_file: &str,
    ) -> Result<PathBuf, NavigationError> {
        let dir = match root {
            TreeEntry::File(path) if path_has_file_name(path, target_file) => {
                return Ok(path.clone());
            }
            TreeEntry::File(_) => return Err(not_found(target_file)),
            TreeEntry::Directory(dir) => dir.clone(),
        };

        tracing::debug!("searching {} for {}", dir.display(), target_file);

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(NavigationError::Cancelled),
            found = self.search_directory(dir, target_file) => {
                found.ok_or_else(|| not_found(target_file))
            }
        }
    }

    fn search_directory<'s>(
        &'s self,
        dir: PathBuf,
        target_file: &'s str,
    ) -> BoxFuture<'s, Option<PathBuf>> {
        async move {
            let entries = {
                let _permit = self.listings.acquire().await.ok()?;
                match self.tree.list(&dir).await {
                    Ok(entries) => entries,
                    Err(err) => {
                        tracing::warn!("cannot list {}: {}", dir.display(), err);
                        return None;
                    }
                }
            };

            let mut pending = FuturesUnordered::new();
            for entry in entries {
                match entry {
                    TreeEntry::Directory(path) => {
                        pending.push(self.search_directory(path, target_file));
                    }
                    TreeEntry::File(path) => {
                        if path_has_file_name(&path, target_file) {
                            return Some(path);
                        }
                    }
                }
            }

            while let Some(found) = pending.next().await {
                if found.is_some() {
                    return found;
                }
            }
            None
        }
        .boxed()
    }
}

fn not_found(target_file: &str) -> NavigationError {
    NavigationError::FileNotFound {
        file_name: target_file.to_string(),
    }
}

/// Convenience for one-off searches outside a navigator.
pub async fn search_tree(
    tree: &dyn FileTree,
    root: &Path,
    target_file: &str,
) -> Result<PathBuf, NavigationError> {
    let listings = Semaphore::new(crate::config::SearchConfig::default().max_concurrent_listings);
    let searcher = DirectorySearcher::new(tree, &listings, CancellationToken::new());
    searcher
        .search_from(&TreeEntry::Directory(root.to_path_buf()), target_file)
        .await
}
