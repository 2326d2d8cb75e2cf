use std::cell::{Cell, RefCell};
use std::rc::Rc;

use chrono::Local;
use crchat_api::{ChatBackend, ChatRequest, ModelSummary};
use crchat_types::{ChatTurn, ConnectionStatus, Conversation, EndpointConfig, Role, SamplingOptions};

use crate::config::{load_config, save_config, ConfigDraft};
use crate::export::{build_transcript, transcript_filename, FileSink};
use crate::view::{SessionView, Toast};
use crate::{KeyValueStore, SessionError};

/// Assistant turn appended when a send fails
pub const APOLOGY: &str =
    "Sorry, I encountered an error while processing your message. Please check your connection and try again.";

const CLEAR_PROMPT: &str = "Are you sure you want to clear the current conversation?";

/// Mutable state of one chat session
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    pub config: EndpointConfig,
    pub connection: ConnectionStatus,
    pub conversation: Conversation,
}

/// What happened to a send request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Input was blank
    Empty,
    /// Another send was still in flight
    Ignored,
    Delivered,
    /// Request failed; an apology turn was appended
    Failed,
}

/// UI-agnostic command handlers for one chat session.
///
/// All state sits behind `Cell`/`RefCell`, so handlers take `&self` and the
/// futures they return are `!Send`. Drive them from a single thread.
pub struct ChatController {
    context: RefCell<SessionContext>,
    busy: Cell<bool>,
    options: Cell<SamplingOptions>,
    backend: Rc<dyn ChatBackend>,
    store: Rc<dyn KeyValueStore>,
    view: Rc<dyn SessionView>,
    sink: Rc<dyn FileSink>,
}

impl ChatController {
    /// Build a controller and load the stored config.
    ///
    /// A corrupt or unreadable config falls back to the defaults with a
    /// warning toast.
    pub fn new(
        backend: Rc<dyn ChatBackend>,
        store: Rc<dyn KeyValueStore>,
        view: Rc<dyn SessionView>,
        sink: Rc<dyn FileSink>,
    ) -> Self {
        let config = match load_config(&*store) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("{}", e);
                view.toast(Toast::warning("Warning", "Failed to load saved configuration"));
                EndpointConfig::default()
            }
        };
        log::debug!("Session config: {} @ {}", config.model_name, config.base_url);

        Self {
            context: RefCell::new(SessionContext {
                config,
                ..Default::default()
            }),
            busy: Cell::new(false),
            options: Cell::new(SamplingOptions::default()),
            backend,
            store,
            view,
            sink,
        }
    }

    pub fn with_sampling(self, options: SamplingOptions) -> Self {
        self.options.set(options);
        self
    }

    // ---- queries ----

    pub fn config(&self) -> EndpointConfig {
        self.context.borrow().config.clone()
    }

    pub fn connection(&self) -> ConnectionStatus {
        self.context.borrow().connection
    }

    pub fn is_busy(&self) -> bool {
        self.busy.get()
    }

    pub fn sampling(&self) -> SamplingOptions {
        self.options.get()
    }

    pub fn turns(&self) -> Vec<ChatTurn> {
        self.context.borrow().conversation.turns().to_vec()
    }

    pub fn turn(&self, index: usize) -> Option<ChatTurn> {
        self.context.borrow().conversation.get(index).cloned()
    }

    pub fn conversation_len(&self) -> usize {
        self.context.borrow().conversation.len()
    }

    pub fn has_conversation(&self) -> bool {
        !self.context.borrow().conversation.is_empty()
    }

    pub fn can_send(&self, text: &str) -> bool {
        !text.trim().is_empty() && !self.busy.get()
    }

    // ---- handlers ----

    /// Use `config` for this session without persisting it
    pub fn use_config(&self, config: EndpointConfig) {
        self.context.borrow_mut().config = config.clone();
        self.view.config_changed(&config);
    }

    pub async fn on_send(&self, text: &str) -> SendOutcome {
        let text = text.trim();
        if text.is_empty() {
            return SendOutcome::Empty;
        }
        if self.busy.get() {
            log::debug!("Send ignored, a request is already in flight");
            return SendOutcome::Ignored;
        }

        self.append(Role::User, text);
        self.set_busy(true);

        let (base_url, request) = {
            let ctx = self.context.borrow();
            let request = ChatRequest::for_conversation(&ctx.config, ctx.conversation.turns(), self.options.get());
            (ctx.config.base_url.clone(), request)
        };
        log::info!("Sending {} messages to {}", request.messages.len(), request.model);

        let outcome = match self.backend.chat(&base_url, &request).await {
            Ok(content) => {
                self.append(Role::Assistant, content);
                self.set_connection(ConnectionStatus::Connected);
                SendOutcome::Delivered
            }
            Err(e) => {
                log::error!("Chat request failed: {}", e);
                self.view
                    .toast(Toast::error("Error", format!("Failed to send message: {}", e)));
                self.append(Role::Assistant, APOLOGY);
                self.set_connection(ConnectionStatus::Disconnected);
                SendOutcome::Failed
            }
        };

        self.set_busy(false);
        outcome
    }

    /// Validate and persist a new config.
    ///
    /// The config is applied even when persisting it fails; only a
    /// validation error leaves the session untouched.
    pub fn on_save_config(&self, draft: &ConfigDraft) -> Result<(), SessionError> {
        let config = match draft.validate() {
            Ok(config) => config,
            Err(e) => {
                self.view.toast(Toast::error("Error", e.to_string()));
                return Err(e);
            }
        };

        self.use_config(config.clone());

        match save_config(&*self.store, &config) {
            Ok(()) => {
                log::info!("Configuration saved");
                self.view
                    .toast(Toast::success("Success", "Configuration saved successfully"));
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to save configuration: {}", e);
                self.view.toast(Toast::error("Error", "Failed to save configuration"));
                Err(e)
            }
        }
    }

    /// Probe `/api/tags` at `url`, or at the configured URL when `url` is
    /// blank. Returns the model count.
    pub async fn on_test_connection(&self, url: Option<&str>) -> Result<usize, SessionError> {
        let base_url = self.resolve_url(url);
        match self.backend.list_models(&base_url).await {
            Ok(models) => {
                self.set_connection(ConnectionStatus::Connected);
                self.view.toast(Toast::success(
                    "Success",
                    format!("Connected successfully! Found {} models.", models.len()),
                ));
                Ok(models.len())
            }
            Err(e) => {
                log::warn!("Connection test against {} failed: {}", base_url, e);
                self.set_connection(ConnectionStatus::Disconnected);
                self.view.toast(Toast::error(
                    "Connection Failed",
                    format!("Unable to connect to Ollama: {}", e),
                ));
                Err(e.into())
            }
        }
    }

    /// Models available at the configured endpoint. Updates the connection
    /// status but raises no toast.
    pub async fn list_models(&self) -> Result<Vec<ModelSummary>, SessionError> {
        let base_url = self.resolve_url(None);
        let result = self.backend.list_models(&base_url).await;
        self.set_connection(if result.is_ok() {
            ConnectionStatus::Connected
        } else {
            ConnectionStatus::Disconnected
        });
        Ok(result?)
    }

    pub fn on_new_conversation(&self) {
        self.context.borrow_mut().conversation.clear();
        self.view.conversation_cleared();
        self.view.toast(Toast::success("Info", "Started new conversation"));
    }

    /// Returns whether the conversation was cleared
    pub fn on_clear_chat(&self) -> bool {
        if !self.has_conversation() {
            return false;
        }
        if !self.view.confirm(CLEAR_PROMPT) {
            return false;
        }
        self.on_new_conversation();
        true
    }

    /// Save the transcript through the file sink.
    ///
    /// Returns where it was saved, or `None` when there was nothing to save.
    pub fn on_export(&self) -> Result<Option<String>, SessionError> {
        let saved_at = Local::now();
        let transcript = {
            let ctx = self.context.borrow();
            if ctx.conversation.is_empty() {
                None
            } else {
                Some(build_transcript(&ctx.config, ctx.conversation.turns(), saved_at))
            }
        };
        let Some(transcript) = transcript else {
            self.view.toast(Toast::warning("Info", "No conversation to save"));
            return Ok(None);
        };

        let filename = transcript_filename(saved_at);
        match self.sink.save(&filename, &transcript) {
            Ok(location) => {
                log::info!("Conversation saved to {}", location);
                self.view
                    .toast(Toast::success("Success", "Conversation saved successfully"));
                Ok(Some(location))
            }
            Err(e) => {
                log::error!("Failed to save conversation: {}", e);
                self.view.toast(Toast::error("Error", "Failed to save conversation"));
                Err(e.into())
            }
        }
    }

    // ---- internals ----

    fn resolve_url(&self, url: Option<&str>) -> String {
        match url.map(str::trim) {
            Some(url) if !url.is_empty() => url.to_string(),
            _ => self.context.borrow().config.base_url.clone(),
        }
    }

    fn append(&self, role: Role, content: impl Into<String>) {
        let turn = ChatTurn::new(role, content);
        let index = self.context.borrow_mut().conversation.push(turn.clone());
        self.view.turn_appended(index, &turn);
    }

    fn set_busy(&self, busy: bool) {
        self.busy.set(busy);
        self.view.busy_changed(busy);
    }

    fn set_connection(&self, status: ConnectionStatus) {
        self.context.borrow_mut().connection = status;
        self.view.connection_changed(status);
    }
}
