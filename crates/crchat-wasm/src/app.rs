use std::rc::Rc;

use crchat_session::{ChatController, ConfigDraft, KeyValueStore, MemoryStore, SessionView};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlButtonElement, KeyboardEvent};

use crate::backend::BrowserBackend;
use crate::dom;
use crate::download::BlobDownload;
use crate::storage::LocalStorage;
use crate::view::DomView;

const MAX_INPUT_HEIGHT: i32 = 200;

pub struct ChatApp {
    document: Document,
    controller: Rc<ChatController>,
    view: Rc<DomView>,
}

impl ChatApp {
    pub fn new() -> Result<Self, JsValue> {
        let document = crate::document()?;
        let view = Rc::new(DomView::new(document.clone()));

        let store: Rc<dyn KeyValueStore> = match LocalStorage::open() {
            Ok(store) => Rc::new(store),
            Err(e) => {
                log::warn!("{}; settings will not persist", e);
                Rc::new(MemoryStore::new())
            }
        };
        let controller = Rc::new(ChatController::new(
            Rc::new(BrowserBackend),
            store,
            view.clone(),
            Rc::new(BlobDownload),
        ));

        Ok(Self {
            document,
            controller,
            view,
        })
    }

    pub fn start(self) -> Result<(), JsValue> {
        self.bind_config_panel()?;
        self.bind_chat_controls()?;
        self.bind_input()?;

        self.view.connection_changed(self.controller.connection());
        update_input_state(&self.document, &self.controller)?;
        let _ = dom::get_textarea_by_id(&self.document, "messageInput")?.focus();

        log::info!("Chat page bound");
        Ok(())
    }

    fn bind_config_panel(&self) -> Result<(), JsValue> {
        let document = &self.document;

        let (doc, controller) = (document.clone(), self.controller.clone());
        dom::add_click_listener(&dom::get_element_by_id(document, "configBtn")?, move |_| {
            if let Err(e) = open_config_panel(&doc, &controller) {
                log::error!("Failed to open settings: {:?}", e);
            }
        })?;

        let doc = document.clone();
        dom::add_click_listener(&dom::get_element_by_id(document, "closeConfigBtn")?, move |_| {
            close_config_panel(&doc);
        })?;

        // Clicking the overlay outside the panel closes it
        let doc = document.clone();
        dom::add_click_listener(&dom::get_element_by_id(document, "configPanel")?, move |event| {
            let on_overlay = event
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .map(|el| el.id() == "configPanel")
                .unwrap_or(false);
            if on_overlay {
                close_config_panel(&doc);
            }
        })?;

        let (doc, controller) = (document.clone(), self.controller.clone());
        dom::add_click_listener(&dom::get_element_by_id(document, "saveConfigBtn")?, move |_| {
            let draft = match read_config_form(&doc) {
                Ok(draft) => draft,
                Err(e) => {
                    log::error!("Failed to read settings form: {:?}", e);
                    return;
                }
            };
            match controller.on_save_config(&draft) {
                Err(e) if e.is_validation() => {}
                _ => close_config_panel(&doc),
            }
        })?;

        let (doc, controller) = (document.clone(), self.controller.clone());
        dom::add_click_listener(&dom::get_element_by_id(document, "testConnectionBtn")?, move |_| {
            let (doc, controller) = (doc.clone(), controller.clone());
            wasm_bindgen_futures::spawn_local(async move {
                if let Err(e) = test_connection(&doc, &controller).await {
                    log::error!("Connection test UI failed: {:?}", e);
                }
            });
        })?;

        Ok(())
    }

    fn bind_chat_controls(&self) -> Result<(), JsValue> {
        let document = &self.document;

        let controller = self.controller.clone();
        dom::add_click_listener(&dom::get_element_by_id(document, "newChatBtn")?, move |_| {
            controller.on_new_conversation();
        })?;

        let controller = self.controller.clone();
        dom::add_click_listener(&dom::get_element_by_id(document, "clearChatBtn")?, move |_| {
            controller.on_clear_chat();
        })?;

        let controller = self.controller.clone();
        dom::add_click_listener(&dom::get_element_by_id(document, "saveChatBtn")?, move |_| {
            let _ = controller.on_export();
        })?;

        let (doc, controller) = (document.clone(), self.controller.clone());
        dom::add_click_listener(&dom::get_element_by_id(document, "sendBtn")?, move |_| {
            if let Err(e) = send_from_input(&doc, &controller) {
                log::error!("Failed to send message: {:?}", e);
            }
        })?;

        Ok(())
    }

    fn bind_input(&self) -> Result<(), JsValue> {
        let input = dom::get_textarea_by_id(&self.document, "messageInput")?;

        // Enter sends, Shift+Enter inserts a newline
        let (doc, controller) = (self.document.clone(), self.controller.clone());
        let closure = Closure::wrap(Box::new(move |event: KeyboardEvent| {
            if event.key() == "Enter" && !event.shift_key() {
                event.prevent_default();
                if let Err(e) = send_from_input(&doc, &controller) {
                    log::error!("Failed to send message: {:?}", e);
                }
            }
        }) as Box<dyn FnMut(_)>);
        input.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();

        let (doc, controller) = (self.document.clone(), self.controller.clone());
        let closure = Closure::wrap(Box::new(move |_: web_sys::Event| {
            if let Err(e) = update_input_state(&doc, &controller) {
                log::error!("Failed to update input state: {:?}", e);
            }
        }) as Box<dyn FnMut(_)>);
        input.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref())?;
        closure.forget();

        Ok(())
    }
}

fn send_from_input(document: &Document, controller: &Rc<ChatController>) -> Result<(), JsValue> {
    let input = dom::get_textarea_by_id(document, "messageInput")?;
    let text = input.value();
    if !controller.can_send(&text) {
        return Ok(());
    }

    input.set_value("");
    update_input_state(document, controller)?;

    let controller = controller.clone();
    wasm_bindgen_futures::spawn_local(async move {
        controller.on_send(&text).await;
    });
    Ok(())
}

/// Character count, send button state and textarea height
fn update_input_state(document: &Document, controller: &ChatController) -> Result<(), JsValue> {
    let input = dom::get_textarea_by_id(document, "messageInput")?;
    let value = input.value();

    dom::get_element_by_id(document, "charCount")?.set_text_content(Some(&value.chars().count().to_string()));

    let send = dom::get_element_by_id(document, "sendBtn")?.dyn_into::<HtmlButtonElement>()?;
    send.set_disabled(!controller.can_send(&value));

    let style = input.style();
    style.set_property("height", "auto")?;
    let height = input.scroll_height().min(MAX_INPUT_HEIGHT);
    style.set_property("height", &format!("{}px", height))?;
    Ok(())
}

fn open_config_panel(document: &Document, controller: &ChatController) -> Result<(), JsValue> {
    let config = controller.config();
    let url = dom::get_input_by_id(document, "ollamaUrl")?;
    url.set_value(&config.base_url);
    dom::get_input_by_id(document, "modelName")?.set_value(&config.model_name);
    dom::set_field_value(document, "systemPrompt", &config.system_prompt)?;

    dom::get_element_by_id(document, "configPanel")?.class_list().add_1("open")?;
    let _ = url.focus();
    Ok(())
}

fn close_config_panel(document: &Document) {
    if let Ok(panel) = dom::get_element_by_id(document, "configPanel") {
        let _ = panel.class_list().remove_1("open");
    }
}

fn read_config_form(document: &Document) -> Result<ConfigDraft, JsValue> {
    Ok(ConfigDraft {
        base_url: dom::get_input_by_id(document, "ollamaUrl")?.value(),
        model_name: dom::get_input_by_id(document, "modelName")?.value(),
        system_prompt: dom::field_value(document, "systemPrompt")?,
    })
}

async fn test_connection(document: &Document, controller: &ChatController) -> Result<(), JsValue> {
    let button = dom::get_element_by_id(document, "testConnectionBtn")?.dyn_into::<HtmlButtonElement>()?;
    let label = button.text_content().unwrap_or_default();
    let url = dom::get_input_by_id(document, "ollamaUrl")?.value();

    button.set_disabled(true);
    button.set_text_content(Some("Testing..."));
    let _ = controller.on_test_connection(Some(&url)).await;
    button.set_text_content(Some(&label));
    button.set_disabled(false);
    Ok(())
}
