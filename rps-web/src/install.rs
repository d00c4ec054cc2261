//! Install banner, iOS overlay and the deferred native prompt.
use crate::dom;
use crate::error::WebError;
use rps_game::{InstallEvent, InstallHost, InstallInstructions, NativeChoice};
use std::time::Duration;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{Document, Element, HtmlElement, Window};

pub const BANNER_ID: &str = "installBanner";
pub const INSTALL_BUTTON_ID: &str = "installBtn";
pub const DISMISS_BUTTON_ID: &str = "dismissBtn";
pub const OVERLAY_ID: &str = "iosInstallOverlay";
pub const OVERLAY_CLOSE_SELECTOR: &str = ".ios-close-btn";
const SHOW_CLASS: &str = "show";

/// Window property the inline shim parks an early `beforeinstallprompt` event on.
pub const EARLY_PROMPT_PROP: &str = "__rpsDeferredPrompt";

/// Inline `<head>` script for the page. Browsers can fire `beforeinstallprompt` before the wasm
/// module loads; this holds the event until [`take_early_prompt`] collects it.
pub const EARLY_PROMPT_SHIM: &str = "window.addEventListener('beforeinstallprompt', function (e) \
{ e.preventDefault(); window.__rpsDeferredPrompt = e; });";

/// Collect a prompt the inline shim captured, clearing it so it is used once.
#[must_use]
pub fn take_early_prompt(window: &Window) -> Option<JsValue> {
    let key = JsValue::from_str(EARLY_PROMPT_PROP);
    let prompt = js_sys::Reflect::get(window, &key).ok()?;
    if prompt.is_undefined() || prompt.is_null() {
        return None;
    }
    dom::report(js_sys::Reflect::delete_property(window, &key), "early prompt");
    Some(prompt)
}

/// Elements the install flow drives. All are required.
pub struct InstallElements {
    pub banner: HtmlElement,
    pub install_button: HtmlElement,
    pub dismiss_button: HtmlElement,
    pub overlay: HtmlElement,
    pub overlay_close: Element,
}

impl InstallElements {
    /// # Errors
    /// Returns [`WebError::MissingElement`] naming the first element not found.
    pub fn find(doc: &Document) -> Result<Self, WebError> {
        Ok(Self {
            banner: dom::element_by_id(doc, BANNER_ID)?,
            install_button: dom::element_by_id(doc, INSTALL_BUTTON_ID)?,
            dismiss_button: dom::element_by_id(doc, DISMISS_BUTTON_ID)?,
            overlay: dom::element_by_id(doc, OVERLAY_ID)?,
            overlay_close: dom::query(doc, OVERLAY_CLOSE_SELECTOR).ok_or(
                WebError::MissingElement {
                    id: OVERLAY_CLOSE_SELECTOR,
                },
            )?,
        })
    }
}

/// Sink for events the host produces asynchronously (timers, prompt answers).
pub type Dispatch = fn(InstallEvent);

pub struct DomInstallHost {
    banner: HtmlElement,
    overlay: HtmlElement,
    deferred_prompt: Option<JsValue>,
    dispatch: Dispatch,
}

impl DomInstallHost {
    #[must_use]
    pub fn new(elements: &InstallElements, dispatch: Dispatch) -> Self {
        Self {
            banner: elements.banner.clone(),
            overlay: elements.overlay.clone(),
            deferred_prompt: None,
            dispatch,
        }
    }

    /// Hold the `beforeinstallprompt` event for a later click.
    pub fn capture_prompt(&mut self, event: JsValue) {
        self.deferred_prompt = Some(event);
    }

    fn set_overlay_display(&self, value: &str) {
        dom::report(
            self.overlay.style().set_property("display", value),
            "overlay display",
        );
    }
}

/// Call `prompt()` on the deferred event and wait for `userChoice.outcome`.
#[allow(clippy::future_not_send)]
async fn run_native_prompt(prompt_event: JsValue) -> Result<NativeChoice, WebError> {
    let prompt = js_sys::Reflect::get(&prompt_event, &JsValue::from_str("prompt"))?
        .dyn_into::<js_sys::Function>()?;
    prompt.call0(&prompt_event)?;

    let choice = js_sys::Reflect::get(&prompt_event, &JsValue::from_str("userChoice"))?
        .dyn_into::<js_sys::Promise>()?;
    let answer = JsFuture::from(choice).await?;
    let outcome = js_sys::Reflect::get(&answer, &JsValue::from_str("outcome"))?
        .as_string()
        .unwrap_or_default();
    Ok(NativeChoice::from_outcome(&outcome))
}

impl InstallHost for DomInstallHost {
    fn show_banner(&mut self) {
        dom::report(self.banner.class_list().add_1(SHOW_CLASS), "show banner");
    }

    fn hide_banner(&mut self) {
        dom::report(self.banner.class_list().remove_1(SHOW_CLASS), "hide banner");
    }

    fn show_overlay(&mut self) {
        self.set_overlay_display("flex");
    }

    fn hide_overlay(&mut self) {
        self.set_overlay_display("none");
    }

    fn show_instructions(&mut self, instructions: InstallInstructions) {
        if let Err(err) = dom::window().and_then(|win| {
            win.alert_with_message(instructions.text())
                .map_err(WebError::from)
        }) {
            dom::console_error(&err.to_string());
        }
    }

    fn open_native_prompt(&mut self) {
        let dispatch = self.dispatch;
        let prompt_event = self.deferred_prompt.take();
        // The answer always arrives on a later task, never inside the current dispatch.
        spawn_local(async move {
            let choice = match prompt_event {
                Some(event) => run_native_prompt(event).await.unwrap_or_else(|err| {
                    dom::console_error(&format!("native install prompt failed: {err}"));
                    NativeChoice::Dismissed
                }),
                None => {
                    log::warn!("install clicked without a held prompt");
                    NativeChoice::Dismissed
                }
            };
            log::info!("native install prompt answered: {choice:?}");
            dispatch(InstallEvent::NativePromptResolved(choice));
        });
    }

    fn schedule_banner_timer(&mut self, delay: Duration) {
        let dispatch = self.dispatch;
        let delay_ms = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
        if let Err(err) = dom::set_timeout_once(delay_ms, move || {
            dispatch(InstallEvent::IosTimerElapsed);
        }) {
            dom::console_error(&format!("banner timer not scheduled: {err}"));
        }
    }
}
