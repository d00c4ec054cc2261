use crate::error::WebError;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Event, HtmlElement, Storage, Window};

/// Retrieve the global `window` object.
///
/// # Errors
/// Returns [`WebError::NoWindow`] outside of a browser context.
pub fn window() -> Result<Window, WebError> {
    web_sys::window().ok_or(WebError::NoWindow)
}

/// Retrieve the document of the current window.
///
/// # Errors
/// Returns [`WebError::NoWindow`] when there is no window or it has no document.
pub fn document() -> Result<Document, WebError> {
    window()?.document().ok_or(WebError::NoWindow)
}

/// Look up a required element by id.
///
/// # Errors
/// Returns [`WebError::MissingElement`] when the id is absent or not an HTML element.
pub fn element_by_id(doc: &Document, id: &'static str) -> Result<HtmlElement, WebError> {
    doc.get_element_by_id(id)
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        .ok_or(WebError::MissingElement { id })
}

/// First match for `selector`, if any.
#[must_use]
pub fn query(doc: &Document, selector: &str) -> Option<Element> {
    doc.query_selector(selector).ok().flatten()
}

/// All matches for `selector` in document order.
#[must_use]
pub fn query_all(doc: &Document, selector: &str) -> Vec<Element> {
    let Ok(list) = doc.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

/// Convert a JavaScript value into a readable string for error reporting.
#[must_use]
pub fn js_error_message(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|err| err.message().into())
        })
        .unwrap_or_else(|| format!("{value:?}"))
}

/// Log an error message to the browser console.
pub fn console_error(message: &str) {
    web_sys::console::error_1(&JsValue::from(message));
}

/// Log a failed DOM call and carry on.
pub fn report<T>(result: Result<T, JsValue>, what: &str) {
    if let Err(err) = result {
        console_error(&format!("{what}: {}", js_error_message(&err)));
    }
}

/// Attach a listener that lives as long as the page.
///
/// # Errors
/// Returns an error if the browser rejects the listener.
pub fn listen(
    target: &web_sys::EventTarget,
    event: &str,
    handler: impl FnMut(Event) + 'static,
) -> Result<(), WebError> {
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// Run `callback` once after `delay_ms`.
///
/// # Errors
/// Returns an error if there is no window or the timer cannot be scheduled.
pub fn set_timeout_once(delay_ms: i32, callback: impl FnOnce() + 'static) -> Result<(), WebError> {
    let closure = Closure::once(callback);
    window()?.set_timeout_with_callback_and_timeout_and_arguments_0(
        closure.as_ref().unchecked_ref(),
        delay_ms,
    )?;
    closure.forget();
    Ok(())
}

/// Access the browser `localStorage` handle.
///
/// # Errors
/// Returns an error if the window cannot be accessed or `localStorage` is unavailable.
pub fn local_storage() -> Result<Storage, WebError> {
    window()?
        .local_storage()?
        .ok_or(WebError::StorageUnavailable)
}
