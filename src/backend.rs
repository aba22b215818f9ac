use crate::completion;
use crate::config::{InitOptions, ServerConfig};
use crate::formatter;
use crate::snapshot;
use crate::text::DocumentStore;
use crate::token;
use parking_lot::RwLock;
use tower_lsp::jsonrpc::{Error, Result};
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};

/// Fixed hover payload; real symbol lookup is not implemented in this
/// prototype.
const HOVER_TEXT: &str =
    "Policy language server: symbol information is not available yet.";

pub struct Backend {
    client: Client,
    documents: DocumentStore,
    config: RwLock<ServerConfig>,
}

impl Backend {
    pub fn new(client: Client, config: ServerConfig) -> Self {
        Self {
            client,
            documents: DocumentStore::default(),
            config: RwLock::new(config),
        }
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        if let Some(options) = params.initialization_options {
            let options: InitOptions = serde_json::from_value(options).map_err(|err| {
                Error::invalid_params(format!("invalid initializationOptions: {err}"))
            })?;
            self.config.write().apply(options);
        }

        Ok(InitializeResult {
            server_info: Some(ServerInfo {
                name: "policy-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::FULL,
                )),
                completion_provider: Some(CompletionOptions {
                    trigger_characters: Some(vec![".".to_string()]),
                    ..Default::default()
                }),
                hover_provider: Some(HoverProviderCapability::Simple(true)),
                document_formatting_provider: Some(OneOf::Left(true)),
                ..Default::default()
            },
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        self.client
            .log_message(MessageType::INFO, "policy language server initialized")
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let uri = params.text_document.uri;
        self.documents
            .open(uri.to_string(), params.text_document.text);

        self.client
            .log_message(MessageType::INFO, format!("opened document: {uri}"))
            .await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;

        // Full sync: the first change carries the whole document, any
        // further entries and their range metadata are ignored.
        if let Some(change) = params.content_changes.into_iter().next() {
            self.documents.replace(uri.to_string(), change.text);
        }
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        let uri = params.text_document_position.text_document.uri;
        let position = params.text_document_position.position;
        log::debug!("completion: {uri} {}:{}", position.line, position.character);

        let doc = match self.documents.get(uri.as_str()) {
            Some(doc) => doc,
            None => return Ok(None),
        };
        let line = match doc.line(position.line) {
            Some(line) => line,
            None => return Ok(None),
        };

        let token = token::token_at(line, position.character);
        log::debug!("completion token: {token:?}");

        let prefix = match completion::input_field_prefix(&token) {
            Some(prefix) => prefix,
            None => return Ok(Some(CompletionResponse::Array(Vec::new()))),
        };

        let path = self.config.read().input_file.clone();
        let snapshot = match snapshot::load(&path) {
            Ok(map) => map,
            Err(err) => {
                // Degrade to no suggestions, but keep the failure visible.
                log::warn!("{err}");
                self.client
                    .log_message(MessageType::WARNING, err.to_string())
                    .await;
                return Ok(Some(CompletionResponse::Array(Vec::new())));
            }
        };

        let items = completion::candidates(prefix, &snapshot);
        Ok(Some(CompletionResponse::Array(items)))
    }

    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
        let uri = params.text_document_position_params.text_document.uri;
        log::debug!("hover: {uri}");

        Ok(Some(Hover {
            contents: HoverContents::Markup(MarkupContent {
                kind: MarkupKind::PlainText,
                value: HOVER_TEXT.to_string(),
            }),
            range: None,
        }))
    }

    async fn formatting(&self, params: DocumentFormattingParams) -> Result<Option<Vec<TextEdit>>> {
        let uri = params.text_document.uri;
        log::debug!("formatting: {uri}");

        let edits = formatter::format_document(&uri)?;
        Ok(Some(edits))
    }
}
