mod common;

use std::rc::Rc;

use common::{harness, harness_with_store, ReadOnlyStore, ScriptedBackend};
use crchat_api::{ApiError, ModelSummary};
use crchat_session::{ConfigDraft, KeyValueStore, MemoryStore, SendOutcome, ToastLevel, APOLOGY};
use crchat_types::{ConnectionStatus, EndpointConfig, Role, CONFIG_STORAGE_KEY, FALLBACK_SYSTEM_PROMPT};
use pretty_assertions::assert_eq;

fn model(name: &str) -> ModelSummary {
    ModelSummary {
        name: name.to_string(),
        size: None,
        modified_at: None,
    }
}

#[tokio::test]
async fn test_send_appends_both_turns() {
    let h = harness(ScriptedBackend::default().reply(Ok("Hi there".to_string())));

    let outcome = h.controller.on_send("  hello  ").await;

    assert_eq!(outcome, SendOutcome::Delivered);
    let turns = h.controller.turns();
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[0].role(), Role::User);
    assert_eq!(turns[0].content(), "hello");
    assert_eq!(turns[1].role(), Role::Assistant);
    assert_eq!(turns[1].content(), "Hi there");
    assert_eq!(h.controller.connection(), ConnectionStatus::Connected);
    assert!(!h.controller.is_busy());
    assert_eq!(*h.view.busy.borrow(), vec![true, false]);

    let request = &h.backend.requests.borrow()[0];
    assert_eq!(request.messages.len(), 2);
    assert_eq!(request.messages[0].role, Role::System);
    assert_eq!(request.messages[1].content, "hello");
    assert!(!request.stream);
}

#[tokio::test]
async fn test_history_is_resent() {
    let backend = ScriptedBackend::default()
        .reply(Ok("one".to_string()))
        .reply(Ok("two".to_string()));
    let h = harness(backend);

    h.controller.on_send("first").await;
    h.controller.on_send("second").await;

    let requests = h.backend.requests.borrow();
    let contents: Vec<&str> = requests[1].messages.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents[1..], ["first", "one", "second"]);
}

#[tokio::test]
async fn test_blank_send_is_noop() {
    let h = harness(ScriptedBackend::default());
    assert_eq!(h.controller.on_send(" \n\t").await, SendOutcome::Empty);
    assert_eq!(h.controller.conversation_len(), 0);
    assert_eq!(h.backend.calls.get(), 0);
    assert!(!h.controller.can_send("   "));
    assert!(h.controller.can_send("x"));
}

#[tokio::test]
async fn test_send_while_pending_is_ignored() {
    let (backend, release) = ScriptedBackend::gated();
    let h = harness(backend);

    let first = h.controller.on_send("one");
    let second = async {
        assert!(h.controller.is_busy());
        assert!(!h.controller.can_send("two"));
        let outcome = h.controller.on_send("two").await;
        assert_eq!(h.controller.conversation_len(), 1);
        let _ = release.send(Ok("reply".to_string()));
        outcome
    };
    let (first, second) = futures::join!(first, second);

    assert_eq!(first, SendOutcome::Delivered);
    assert_eq!(second, SendOutcome::Ignored);
    assert_eq!(h.backend.calls.get(), 1);
    assert_eq!(h.controller.conversation_len(), 2);
    assert!(!h.controller.is_busy());
}

#[tokio::test]
async fn test_server_error_appends_apology() {
    let backend = ScriptedBackend::default().reply(Err(ApiError::Status {
        status: 500,
        reason: "Internal Server Error".to_string(),
    }));
    let h = harness(backend);

    let outcome = h.controller.on_send("hello").await;

    assert_eq!(outcome, SendOutcome::Failed);
    let turns = h.controller.turns();
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[1].role(), Role::Assistant);
    assert_eq!(turns[1].content(), APOLOGY);
    assert_eq!(h.controller.connection(), ConnectionStatus::Disconnected);
    assert!(!h.controller.is_busy());

    let toasts = h.view.toasts.borrow();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].level, ToastLevel::Error);
    assert_eq!(toasts[0].message, "Failed to send message: HTTP 500: Internal Server Error");
}

#[tokio::test]
async fn test_view_sees_turn_indices() {
    let h = harness(ScriptedBackend::default().reply(Ok("a".to_string())));
    h.controller.on_send("q").await;
    let indices: Vec<usize> = h.view.appended.borrow().iter().map(|(i, _)| *i).collect();
    assert_eq!(indices, vec![0, 1]);
}

#[test]
fn test_corrupt_config_gives_defaults_and_one_warning() {
    let store = Rc::new(MemoryStore::with_entry(CONFIG_STORAGE_KEY, "{\"ollamaUrl\": "));
    let h = harness_with_store(ScriptedBackend::default(), store);

    assert_eq!(h.controller.config(), EndpointConfig::default());
    let toasts = h.view.toasts.borrow();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].level, ToastLevel::Warning);
    assert_eq!(toasts[0].message, "Failed to load saved configuration");
}

#[test]
fn test_stored_config_is_merged_over_defaults() {
    let store = Rc::new(MemoryStore::with_entry(CONFIG_STORAGE_KEY, r#"{"modelName":"mistral"}"#));
    let h = harness_with_store(ScriptedBackend::default(), store);

    let config = h.controller.config();
    assert_eq!(config.model_name, "mistral");
    assert_eq!(config.base_url, EndpointConfig::default().base_url);
    assert!(h.view.toasts.borrow().is_empty());
}

#[test]
fn test_save_config_validates_and_persists() {
    let h = harness(ScriptedBackend::default());

    let err = h
        .controller
        .on_save_config(&ConfigDraft {
            base_url: "  ".to_string(),
            model_name: "llama3.2".to_string(),
            system_prompt: String::new(),
        })
        .unwrap_err();
    assert!(err.is_validation());
    assert_eq!(h.view.messages(), vec!["Ollama URL is required".to_string()]);
    assert_eq!(h.controller.config(), EndpointConfig::default());

    h.controller
        .on_save_config(&ConfigDraft {
            base_url: " http://gpu:11434 ".to_string(),
            model_name: "qwen3".to_string(),
            system_prompt: String::new(),
        })
        .unwrap();
    let config = h.controller.config();
    assert_eq!(config.base_url, "http://gpu:11434");
    assert_eq!(config.system_prompt, FALLBACK_SYSTEM_PROMPT);
    assert_eq!(
        h.view.messages().last().map(String::as_str),
        Some("Configuration saved successfully")
    );

    let stored = h.store.get(CONFIG_STORAGE_KEY).unwrap().unwrap();
    assert!(stored.contains("\"modelName\":\"qwen3\""));
}

#[test]
fn test_save_config_store_failure_still_applies() {
    let h = harness_with_store(ScriptedBackend::default(), Rc::new(ReadOnlyStore));
    let draft = ConfigDraft {
        base_url: "http://x".to_string(),
        model_name: "m".to_string(),
        system_prompt: "p".to_string(),
    };

    let err = h.controller.on_save_config(&draft).unwrap_err();

    assert!(!err.is_validation());
    assert_eq!(h.controller.config().model_name, "m");
    assert_eq!(h.view.messages(), vec!["Failed to save configuration".to_string()]);
}

#[tokio::test]
async fn test_connection_probe_success() {
    let backend = ScriptedBackend::default().models(Ok(vec![model("a"), model("b")]));
    let h = harness(backend);

    let count = h.controller.on_test_connection(Some("  ")).await.unwrap();

    assert_eq!(count, 2);
    assert_eq!(h.controller.connection(), ConnectionStatus::Connected);
    assert_eq!(*h.backend.probed.borrow(), vec!["http://localhost:11434".to_string()]);
    assert_eq!(h.view.messages(), vec!["Connected successfully! Found 2 models.".to_string()]);
}

#[tokio::test]
async fn test_connection_probe_failure() {
    let h = harness(ScriptedBackend::default());

    let result = h.controller.on_test_connection(Some("http://other:1")).await;

    assert!(result.is_err());
    assert_eq!(h.controller.connection(), ConnectionStatus::Disconnected);
    assert_eq!(*h.backend.probed.borrow(), vec!["http://other:1".to_string()]);
    let toasts = h.view.toasts.borrow();
    assert_eq!(toasts[0].title, "Connection Failed");
    assert_eq!(toasts[0].message, "Unable to connect to Ollama: connection refused");
}

#[tokio::test]
async fn test_clear_chat_respects_confirmation() {
    let h = harness(ScriptedBackend::default().reply(Ok("a".to_string())));
    assert!(!h.controller.on_clear_chat());
    assert_eq!(h.view.cleared.get(), 0);

    h.controller.on_send("q").await;
    h.view.confirm_answer.set(false);
    assert!(!h.controller.on_clear_chat());
    assert_eq!(h.controller.conversation_len(), 2);

    h.view.confirm_answer.set(true);
    assert!(h.controller.on_clear_chat());
    assert!(!h.controller.has_conversation());
    assert_eq!(h.view.cleared.get(), 1);
    assert_eq!(h.view.messages().last().map(String::as_str), Some("Started new conversation"));
}

#[tokio::test]
async fn test_export() {
    let h = harness(ScriptedBackend::default().reply(Ok("answer".to_string())));

    assert_eq!(h.controller.on_export().unwrap(), None);
    assert_eq!(h.view.messages(), vec!["No conversation to save".to_string()]);
    assert!(h.sink.saved.borrow().is_empty());

    h.controller.on_send("question").await;
    let location = h.controller.on_export().unwrap().unwrap();

    let saved = h.sink.saved.borrow();
    assert_eq!(saved.len(), 1);
    let (filename, contents) = &saved[0];
    assert!(filename.starts_with("crchat-conversation-"));
    assert!(filename.ends_with(".txt"));
    assert_eq!(location, format!("/tmp/{}", filename));
    assert!(contents.contains("] User ("));
    assert!(contents.contains("question\n"));
    assert!(contents.ends_with("End of conversation - 2 messages total\n"));
}

#[tokio::test]
async fn test_list_models_updates_connection() {
    let h = harness(ScriptedBackend::default().models(Ok(vec![model("llama3.2")])));
    let models = h.controller.list_models().await.unwrap();
    assert_eq!(models[0].name, "llama3.2");
    assert_eq!(h.controller.connection(), ConnectionStatus::Connected);
    assert!(h.view.toasts.borrow().is_empty());
}
