#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use async_trait::async_trait;
use crchat_api::{ApiError, ChatBackend, ChatRequest, ModelSummary};
use crchat_session::{ChatController, FileSink, KeyValueStore, MemoryStore, SessionView, StoreError, Toast};
use crchat_types::{ChatTurn, ConnectionStatus};
use futures::channel::oneshot;

/// Backend that replays scripted replies and records every request
#[derive(Default)]
pub struct ScriptedBackend {
    replies: RefCell<VecDeque<Result<String, ApiError>>>,
    models: RefCell<Option<Result<Vec<ModelSummary>, ApiError>>>,
    gate: RefCell<Option<oneshot::Receiver<Result<String, ApiError>>>>,
    pub requests: RefCell<Vec<ChatRequest>>,
    pub probed: RefCell<Vec<String>>,
    pub calls: Cell<usize>,
}

impl ScriptedBackend {
    pub fn reply(self, reply: Result<String, ApiError>) -> Self {
        self.replies.borrow_mut().push_back(reply);
        self
    }

    pub fn models(self, models: Result<Vec<ModelSummary>, ApiError>) -> Self {
        *self.models.borrow_mut() = Some(models);
        self
    }

    /// The next chat call waits until the sender fires
    pub fn gated() -> (Self, oneshot::Sender<Result<String, ApiError>>) {
        let (tx, rx) = oneshot::channel();
        let backend = Self::default();
        *backend.gate.borrow_mut() = Some(rx);
        (backend, tx)
    }
}

#[async_trait(?Send)]
impl ChatBackend for ScriptedBackend {
    async fn chat(&self, _base_url: &str, request: &ChatRequest) -> Result<String, ApiError> {
        self.calls.set(self.calls.get() + 1);
        self.requests.borrow_mut().push(request.clone());

        let gate = self.gate.borrow_mut().take();
        if let Some(gate) = gate {
            return gate
                .await
                .unwrap_or_else(|_| Err(ApiError::Transport("gate dropped".to_string())));
        }
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Transport("no scripted reply".to_string())))
    }

    async fn list_models(&self, base_url: &str) -> Result<Vec<ModelSummary>, ApiError> {
        self.probed.borrow_mut().push(base_url.to_string());
        self.models
            .borrow_mut()
            .take()
            .unwrap_or_else(|| Err(ApiError::Transport("connection refused".to_string())))
    }
}

/// View that records everything it is told
pub struct RecordingView {
    pub toasts: RefCell<Vec<Toast>>,
    pub appended: RefCell<Vec<(usize, ChatTurn)>>,
    pub busy: RefCell<Vec<bool>>,
    pub connection: RefCell<Vec<ConnectionStatus>>,
    pub cleared: Cell<usize>,
    pub confirm_answer: Cell<bool>,
}

impl Default for RecordingView {
    fn default() -> Self {
        Self {
            toasts: RefCell::default(),
            appended: RefCell::default(),
            busy: RefCell::default(),
            connection: RefCell::default(),
            cleared: Cell::new(0),
            confirm_answer: Cell::new(true),
        }
    }
}

impl RecordingView {
    pub fn messages(&self) -> Vec<String> {
        self.toasts.borrow().iter().map(|t| t.message.clone()).collect()
    }
}

impl SessionView for RecordingView {
    fn toast(&self, toast: Toast) {
        self.toasts.borrow_mut().push(toast);
    }

    fn turn_appended(&self, index: usize, turn: &ChatTurn) {
        self.appended.borrow_mut().push((index, turn.clone()));
    }

    fn conversation_cleared(&self) {
        self.cleared.set(self.cleared.get() + 1);
    }

    fn busy_changed(&self, busy: bool) {
        self.busy.borrow_mut().push(busy);
    }

    fn connection_changed(&self, status: ConnectionStatus) {
        self.connection.borrow_mut().push(status);
    }

    fn confirm(&self, _prompt: &str) -> bool {
        self.confirm_answer.get()
    }
}

#[derive(Default)]
pub struct RecordingSink {
    pub saved: RefCell<Vec<(String, String)>>,
}

impl FileSink for RecordingSink {
    fn save(&self, filename: &str, contents: &str) -> Result<String, StoreError> {
        self.saved
            .borrow_mut()
            .push((filename.to_string(), contents.to_string()));
        Ok(format!("/tmp/{}", filename))
    }
}

/// Store whose writes always fail
#[derive(Default)]
pub struct ReadOnlyStore;

impl KeyValueStore for ReadOnlyStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("read-only".to_string()))
    }
}

pub struct Harness {
    pub backend: Rc<ScriptedBackend>,
    pub store: Rc<dyn KeyValueStore>,
    pub view: Rc<RecordingView>,
    pub sink: Rc<RecordingSink>,
    pub controller: ChatController,
}

pub fn harness(backend: ScriptedBackend) -> Harness {
    harness_with_store(backend, Rc::new(MemoryStore::new()))
}

pub fn harness_with_store(backend: ScriptedBackend, store: Rc<dyn KeyValueStore>) -> Harness {
    let backend = Rc::new(backend);
    let view = Rc::new(RecordingView::default());
    let sink = Rc::new(RecordingSink::default());
    let controller = ChatController::new(backend.clone(), store.clone(), view.clone(), sink.clone());
    Harness {
        backend,
        store,
        view,
        sink,
        controller,
    }
}
