//! # crchat-session
//!
//! Session state and command handlers shared by the terminal and browser
//! front-ends. The controller owns the config, connection status and
//! conversation; collaborators (chat backend, key-value store, view, file
//! sink) are injected as trait objects.

pub mod config;
pub mod controller;
pub mod error;
pub mod export;
pub mod store;
pub mod view;

pub use config::{load_config, save_config, ConfigDraft};
pub use controller::{ChatController, SendOutcome, SessionContext, APOLOGY};
pub use error::{ConfigField, SessionError, StoreError};
pub use export::{build_transcript, transcript_filename, FileSink};
pub use store::{KeyValueStore, MemoryStore};
pub use view::{SessionView, Toast, ToastLevel};
