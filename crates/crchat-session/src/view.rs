use crchat_types::{ChatTurn, ConnectionStatus, EndpointConfig};

/// Severity of a transient notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Error,
    Warning,
}

impl ToastLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToastLevel::Success => "success",
            ToastLevel::Error => "error",
            ToastLevel::Warning => "warning",
        }
    }
}

/// Transient user-visible notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub level: ToastLevel,
    pub title: String,
    pub message: String,
}

impl Toast {
    pub fn new(level: ToastLevel, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ToastLevel::Success, title, message)
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ToastLevel::Error, title, message)
    }

    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ToastLevel::Warning, title, message)
    }
}

/// Rendering side of the controller.
///
/// Only `toast` is required; the other hooks let a front-end keep its
/// display in sync. Hooks are called after the controller state changed and
/// while no internal borrow is held, so they may query the controller.
pub trait SessionView {
    fn toast(&self, toast: Toast);

    fn turn_appended(&self, _index: usize, _turn: &ChatTurn) {}

    fn conversation_cleared(&self) {}

    fn busy_changed(&self, _busy: bool) {}

    fn connection_changed(&self, _status: ConnectionStatus) {}

    fn config_changed(&self, _config: &EndpointConfig) {}

    /// Ask the user to confirm a destructive action
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}
