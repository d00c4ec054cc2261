//! Reads the raw platform signals from the live page.
use rps_game::EnvironmentSignals;
use wasm_bindgen::JsValue;
use web_sys::Window;

const STANDALONE_QUERY: &str = "(display-mode: standalone)";

fn truthy_property(target: &JsValue, name: &str) -> bool {
    js_sys::Reflect::get(target, &JsValue::from_str(name)).is_ok_and(|value| value.is_truthy())
}

/// Snapshot of user agent, display mode and referrer. Unreadable signals count as absent.
#[must_use]
pub fn read_signals(window: &Window) -> EnvironmentSignals {
    let navigator = window.navigator();
    let display_mode_standalone = window
        .match_media(STANDALONE_QUERY)
        .ok()
        .flatten()
        .is_some_and(|query| query.matches());
    let referrer = window
        .document()
        .map(|doc| doc.referrer())
        .unwrap_or_default();

    EnvironmentSignals {
        user_agent: navigator.user_agent().unwrap_or_default(),
        display_mode_standalone,
        navigator_standalone: truthy_property(&navigator, "standalone"),
        referrer,
        ms_stream: truthy_property(window, "MSStream"),
    }
}
