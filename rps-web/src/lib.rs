#![forbid(unsafe_code)]
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

pub mod app;
pub mod clock;
pub mod dom;
pub mod environment;
pub mod error;
pub mod install;
pub mod scoreboard;
pub mod storage;
pub mod theme;

pub use error::WebError;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    if let Err(err) = app::mount() {
        dom::console_error(&format!("failed to start: {err}"));
    }
}
