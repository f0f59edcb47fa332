/// LSP server trait implementation.
///
/// This module contains the `impl LanguageServer for Backend` block.  The
/// server keeps the open documents in sync and answers
/// `textDocument/definition` by running the navigator against a headless
/// session positioned at the request's cursor.
use tower_lsp::LanguageServer;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;

use crate::Backend;

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        #[allow(deprecated)]
        let workspace_root = params
            .workspace_folders
            .as_ref()
            .and_then(|folders| folders.first())
            .and_then(|folder| folder.uri.to_file_path().ok())
            .or_else(|| {
                params
                    .root_uri
                    .as_ref()
                    .and_then(|uri| uri.to_file_path().ok())
            });

        if let Some(root) = workspace_root
            && let Err(err) = self.configure_workspace(root)
        {
            tracing::error!("failed to configure workspace: {}", err);
            self.log(MessageType::ERROR, format!("Invalid configuration: {}", err))
                .await;
        }

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::FULL,
                )),
                definition_provider: Some(OneOf::Left(true)),
                ..ServerCapabilities::default()
            },
            server_info: Some(ServerInfo {
                name: self.name.clone(),
                version: Some(self.version.clone()),
            }),
            offset_encoding: None,
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        let message = match self.workspace_root() {
            Some(root) => format!("codeintel-nav initialized for {}", root.display()),
            None => "codeintel-nav initialized without a workspace".to_string(),
        };
        tracing::info!("{}", message);
        self.log(MessageType::INFO, message).await;
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let doc = params.text_document;
        if let Some(path) = Self::file_path(&doc.uri) {
            self.documents.open(&path, doc.text);
            tracing::debug!("opened {}", path.display());
        }
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        if let Some(path) = Self::file_path(&params.text_document.uri)
            && let Some(change) = params.content_changes.into_iter().last()
        {
            self.documents.update(&path, change.text);
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        if let Some(path) = Self::file_path(&params.text_document.uri) {
            self.documents.close(&path);
            tracing::debug!("closed {}", path.display());
        }
    }

    async fn goto_definition(
        &self,
        params: GotoDefinitionParams,
    ) -> Result<Option<GotoDefinitionResponse>> {
        let uri = params.text_document_position_params.text_document.uri;
        let position = params.text_document_position_params.position;

        Ok(self
            .resolve_definition(&uri, position)
            .await
            .map(GotoDefinitionResponse::Scalar))
    }
}
