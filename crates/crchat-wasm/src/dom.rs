use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, HtmlInputElement, HtmlTextAreaElement};

pub fn get_element_by_id(document: &Document, id: &str) -> Result<Element, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("Element not found: {}", id)))
}

pub fn get_input_by_id(document: &Document, id: &str) -> Result<HtmlInputElement, JsValue> {
    get_element_by_id(document, id)?
        .dyn_into::<HtmlInputElement>()
        .map_err(|_| JsValue::from_str(&format!("Element is not HtmlInputElement: {}", id)))
}

pub fn get_textarea_by_id(document: &Document, id: &str) -> Result<HtmlTextAreaElement, JsValue> {
    get_element_by_id(document, id)?
        .dyn_into::<HtmlTextAreaElement>()
        .map_err(|_| JsValue::from_str(&format!("Element is not HtmlTextAreaElement: {}", id)))
}

/// Value of an `<input>` or `<textarea>`
pub fn field_value(document: &Document, id: &str) -> Result<String, JsValue> {
    let element = get_element_by_id(document, id)?;
    match element.dyn_into::<HtmlInputElement>() {
        Ok(input) => Ok(input.value()),
        Err(element) => element
            .dyn_into::<HtmlTextAreaElement>()
            .map(|area| area.value())
            .map_err(|_| JsValue::from_str(&format!("Element is not a form field: {}", id))),
    }
}

pub fn set_field_value(document: &Document, id: &str, value: &str) -> Result<(), JsValue> {
    let element = get_element_by_id(document, id)?;
    match element.dyn_into::<HtmlInputElement>() {
        Ok(input) => input.set_value(value),
        Err(element) => element
            .dyn_into::<HtmlTextAreaElement>()
            .map_err(|_| JsValue::from_str(&format!("Element is not a form field: {}", id)))?
            .set_value(value),
    }
    Ok(())
}

pub fn create_element_with_class(document: &Document, tag: &str, class: &str) -> Result<Element, JsValue> {
    let element = document.create_element(tag)?;
    element.set_class_name(class);
    Ok(element)
}

/// Attach a click handler for the lifetime of the page
pub fn add_click_listener<F>(element: &Element, callback: F) -> Result<(), JsValue>
where
    F: FnMut(web_sys::MouseEvent) + 'static,
{
    let closure = Closure::wrap(Box::new(callback) as Box<dyn FnMut(web_sys::MouseEvent)>);
    element.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

pub fn set_display(element: &HtmlElement, value: &str) {
    let _ = element.style().set_property("display", value);
}

pub fn scroll_to_bottom(element: &Element) {
    if let Ok(html_element) = element.clone().dyn_into::<HtmlElement>() {
        html_element.set_scroll_top(html_element.scroll_height());
    }
}
