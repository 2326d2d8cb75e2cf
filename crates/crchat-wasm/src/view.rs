use crchat_format::{format_message, render_message_html};
use crchat_session::{SessionView, Toast, ToastLevel};
use crchat_types::{ChatTurn, ConnectionStatus, EndpointConfig};
use gloo_timers::callback::Timeout;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlButtonElement, HtmlElement};

use crate::dom;

const TOAST_TIMEOUT_MS: u32 = 5_000;

const WELCOME_HTML: &str = r#"<div class="welcome-message"><div class="welcome-content"><h2>Welcome to CR Chatbot</h2><p>Configure your Ollama endpoint in the settings and start chatting!</p></div></div>"#;

const CLOSE_ICON: &str = "M19 6.41L17.59 5 12 10.59 6.41 5 5 6.41 10.59 12 5 17.59 6.41 19 12 13.41 17.59 19 19 17.59 13.41 12z";

fn toast_icon(level: ToastLevel) -> &'static str {
    match level {
        ToastLevel::Success => "M9 12l2 2 4-4m6 2a9 9 0 11-18 0 9 9 0 0118 0z",
        ToastLevel::Error => "M10 14l2-2m0 0l2-2m-2 2l-2-2m2 2l2 2m7-2a9 9 0 11-18 0 9 9 0 0118 0z",
        ToastLevel::Warning => "M12 9v2m0 4h.01m-6.938 4h13.856c1.54 0 2.502-1.667 1.732-2.5L13.732 4c-.77-.833-1.964-.833-2.732 0L3.732 16.5c-.77.833.192 2.5 1.732 2.5z",
    }
}

/// Flip the reasoning block a toggle button points at, and turn its arrow
pub fn toggle_reasoning(document: &Document, button: &Element) -> Result<(), JsValue> {
    let Some(id) = button.get_attribute("data-thinking-id") else {
        return Ok(());
    };
    let Some(content) = document.get_element_by_id(&id) else {
        return Ok(());
    };
    let content = content.dyn_into::<HtmlElement>()?;

    let visible = content.style().get_property_value("display")? != "none";
    dom::set_display(&content, if visible { "none" } else { "block" });
    if let Some(icon) = button.query_selector(".thinking-icon")? {
        let angle = if visible { "rotate(0deg)" } else { "rotate(90deg)" };
        icon.set_attribute("style", &format!("transform: {}", angle))?;
    }
    Ok(())
}

/// Renders session events into the chat page
pub struct DomView {
    document: Document,
}

impl DomView {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    fn render_turn(&self, turn: &ChatTurn) -> Result<(), JsValue> {
        let chat = dom::get_element_by_id(&self.document, "chatMessages")?;
        if let Some(welcome) = chat.query_selector(".welcome-message")? {
            welcome.remove();
        }

        let message = dom::create_element_with_class(&self.document, "div", &format!("message {}", turn.role().as_str()))?;
        let content = dom::create_element_with_class(&self.document, "div", "message-content")?;
        let text = dom::create_element_with_class(&self.document, "div", "message-text")?;
        text.set_inner_html(&render_message_html(&format_message(turn.content())));
        let timestamp = dom::create_element_with_class(&self.document, "div", "message-timestamp")?;
        timestamp.set_text_content(Some(&turn.created_at().format("%H:%M").to_string()));

        content.append_child(&text)?;
        content.append_child(&timestamp)?;
        message.append_child(&content)?;
        chat.append_child(&message)?;

        let toggles = message.query_selector_all(".thinking-toggle")?;
        for i in 0..toggles.length() {
            let Some(button) = toggles.item(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                continue;
            };
            let document = self.document.clone();
            let target = button.clone();
            dom::add_click_listener(&button, move |_| {
                if let Err(e) = toggle_reasoning(&document, &target) {
                    log::error!("Failed to toggle reasoning: {:?}", e);
                }
            })?;
        }

        dom::scroll_to_bottom(&chat);
        Ok(())
    }

    fn render_welcome(&self) -> Result<(), JsValue> {
        let chat = dom::get_element_by_id(&self.document, "chatMessages")?;
        chat.set_inner_html(WELCOME_HTML);
        Ok(())
    }

    fn show_toast(&self, toast: &Toast) -> Result<(), JsValue> {
        let container = dom::get_element_by_id(&self.document, "toastContainer")?;
        let element = dom::create_element_with_class(&self.document, "div", &format!("toast {}", toast.level.as_str()))?;
        element.set_inner_html(&format!(
            r#"<div class="toast-content"><div class="toast-icon"><svg viewBox="0 0 24 24" width="20" height="20"><path fill="currentColor" d="{}"/></svg></div><div class="toast-text"><div class="toast-title"></div><div class="toast-message"></div></div></div><button class="toast-close"><svg viewBox="0 0 24 24" width="16" height="16"><path fill="currentColor" d="{}"/></svg></button>"#,
            toast_icon(toast.level),
            CLOSE_ICON
        ));
        // Title and message are plain text, never markup
        if let Some(title) = element.query_selector(".toast-title")? {
            title.set_text_content(Some(&toast.title));
        }
        if let Some(message) = element.query_selector(".toast-message")? {
            message.set_text_content(Some(&toast.message));
        }
        if let Some(close) = element.query_selector(".toast-close")? {
            let target = element.clone();
            dom::add_click_listener(&close, move |_| target.remove())?;
        }
        container.append_child(&element)?;

        Timeout::new(TOAST_TIMEOUT_MS, move || element.remove()).forget();
        Ok(())
    }

    fn set_typing(&self, busy: bool) -> Result<(), JsValue> {
        let indicator = dom::get_element_by_id(&self.document, "typingIndicator")?;
        if busy {
            indicator.class_list().add_1("show")?;
        } else {
            indicator.class_list().remove_1("show")?;
        }

        let input = dom::get_textarea_by_id(&self.document, "messageInput")?;
        let send = dom::get_element_by_id(&self.document, "sendBtn")?.dyn_into::<HtmlButtonElement>()?;
        send.set_disabled(busy || input.value().trim().is_empty());
        if !busy {
            let _ = input.focus();
        }
        Ok(())
    }

    fn set_status(&self, status: ConnectionStatus) -> Result<(), JsValue> {
        if let Some(indicator) = self.document.query_selector(".status-indicator")? {
            let state = if status.is_connected() { "online" } else { "offline" };
            indicator.set_class_name(&format!("status-indicator {}", state));
        }
        if let Some(text) = self.document.query_selector(".status-text")? {
            text.set_text_content(Some(status.label()));
        }
        Ok(())
    }
}

fn report(what: &str, result: Result<(), JsValue>) {
    if let Err(e) = result {
        log::error!("Failed to {}: {:?}", what, e);
    }
}

impl SessionView for DomView {
    fn toast(&self, toast: Toast) {
        report("show toast", self.show_toast(&toast));
    }

    fn turn_appended(&self, _index: usize, turn: &ChatTurn) {
        report("render message", self.render_turn(turn));
    }

    fn conversation_cleared(&self) {
        report("clear messages", self.render_welcome());
    }

    fn busy_changed(&self, busy: bool) {
        report("update typing indicator", self.set_typing(busy));
    }

    fn connection_changed(&self, status: ConnectionStatus) {
        report("update status", self.set_status(status));
    }

    fn config_changed(&self, config: &EndpointConfig) {
        log::debug!("Using {} at {}", config.model_name, config.base_url);
    }

    fn confirm(&self, prompt: &str) -> bool {
        web_sys::window()
            .and_then(|w| w.confirm_with_message(prompt).ok())
            .unwrap_or(false)
    }
}
