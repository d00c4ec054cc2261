use crate::dom::js_error_message;
use rps_game::ConfigError;
use wasm_bindgen::JsValue;

#[derive(Debug, thiserror::Error)]
pub enum WebError {
    #[error("browser window unavailable")]
    NoWindow,
    #[error("required element `{id}` missing from page")]
    MissingElement { id: &'static str },
    #[error("localStorage unavailable")]
    StorageUnavailable,
    #[error("JavaScript error: {0}")]
    Js(String),
    #[error("invalid engagement config: {0}")]
    Config(#[from] ConfigError),
}

impl From<JsValue> for WebError {
    fn from(value: JsValue) -> Self {
        Self::Js(js_error_message(&value))
    }
}
