use wasm_bindgen::prelude::*;
use web_sys::{Document, Window};

mod app;
mod backend;
mod dom;
mod download;
mod storage;
mod view;

pub use backend::BrowserBackend;
pub use storage::LocalStorage;

/// Initialize the WASM module: panic hook and logging
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("crchat WASM initialized");
}

/// Bind the chat page. Call once the DOM is loaded.
#[wasm_bindgen]
pub fn init_chat() -> Result<(), JsValue> {
    app::ChatApp::new()?.start()
}

fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("No window object"))
}

fn document() -> Result<Document, JsValue> {
    window()?
        .document()
        .ok_or_else(|| JsValue::from_str("No document object"))
}
