//! Page wiring: one [`Page`] per load, reached from DOM listeners through a thread-local.
use crate::clock::JsClock;
use crate::dom;
use crate::environment::read_signals;
use crate::error::WebError;
use crate::install::{DomInstallHost, InstallElements, take_early_prompt};
use crate::scoreboard::Scoreboard;
use crate::storage::LocalStorageBackend;
use crate::theme::DomThemeSurface;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rps_game::{Engagement, EngagementConfig, InstallEvent, Move};
use std::cell::RefCell;
use wasm_bindgen::JsValue;
use web_sys::Document;

const GAME_BUTTON_SELECTOR: &str = ".game-buttons button";

pub struct Page {
    engagement: Engagement<LocalStorageBackend, JsClock>,
    theme: DomThemeSurface,
    scoreboard: Scoreboard,
    install: Option<DomInstallHost>,
    rng: SmallRng,
}

thread_local! {
    static PAGE: RefCell<Option<Page>> = const { RefCell::new(None) };
}

fn with_page(f: impl FnOnce(&mut Page)) {
    PAGE.with(|cell| match cell.try_borrow_mut() {
        Ok(mut slot) => {
            if let Some(page) = slot.as_mut() {
                f(page);
            }
        }
        Err(_) => dom::console_error("page state busy; event dropped"),
    });
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn entropy_seed() -> u64 {
    let noise = (js_sys::Math::random() * f64::from(u32::MAX)) as u64;
    (js_sys::Date::now() as u64).rotate_left(32) ^ noise
}

/// Route an install event to the page, if the install flow is running.
pub fn dispatch_install(event: InstallEvent) {
    with_page(|page| {
        if let Some(host) = page.install.as_mut() {
            page.engagement.dispatch(event, host);
        }
    });
}

fn play(mv: Move) {
    with_page(|page| {
        let (round, scores) = page.engagement.play(mv, &mut page.rng);
        log::debug!("{}", round.summary());
        page.scoreboard.render_round(&round);
        page.scoreboard.render_scores(&scores);
    });
}

fn select_theme(name: &str) {
    with_page(|page| {
        page.engagement.select_theme(name, &mut page.theme);
    });
}

fn wire_game(doc: &Document) -> Result<(), WebError> {
    for (index, button) in dom::query_all(doc, GAME_BUTTON_SELECTOR).iter().enumerate() {
        let Some(mv) = Move::from_index(index) else {
            log::warn!("ignoring extra game button #{index}");
            continue;
        };
        dom::listen(button, "click", move |_| play(mv))?;
    }
    Ok(())
}

fn wire_themes(theme: &DomThemeSurface) -> Result<(), WebError> {
    for button in theme.buttons() {
        let Some(name) = DomThemeSurface::button_theme(button) else {
            continue;
        };
        dom::listen(button, "click", move |_| select_theme(&name))?;
    }
    Ok(())
}

fn capture_prompt(prompt: JsValue) {
    with_page(|page| {
        if let Some(host) = page.install.as_mut() {
            host.capture_prompt(prompt);
        }
    });
    dispatch_install(InstallEvent::NativePromptCaptured);
}

fn wire_install(elements: &InstallElements) -> Result<(), WebError> {
    let window = dom::window()?;
    dom::listen(&window, "beforeinstallprompt", |event| {
        event.prevent_default();
        capture_prompt(event.into());
    })?;
    dom::listen(&elements.install_button, "click", |_| {
        dispatch_install(InstallEvent::InstallClicked);
    })?;
    dom::listen(&elements.dismiss_button, "click", |_| {
        dispatch_install(InstallEvent::DismissClicked);
    })?;
    dom::listen(&elements.overlay_close, "click", |_| {
        dispatch_install(InstallEvent::OverlayClosed);
    })?;
    Ok(())
}

/// Build the page state and attach every listener.
///
/// Install markup is optional: when it is missing the error is logged and the game and theme
/// switcher still work.
///
/// # Errors
/// Returns an error if there is no document or the core listeners cannot be attached.
pub fn mount() -> Result<(), WebError> {
    let window = dom::window()?;
    let doc = dom::document()?;

    let mut theme = DomThemeSurface::bind(&doc);
    let mut engagement = Engagement::new(
        LocalStorageBackend::open(),
        JsClock,
        EngagementConfig::default(),
        &mut theme,
    )?;
    let scoreboard = Scoreboard::bind(&doc);
    scoreboard.render_scores(&engagement.scores());

    let install = match InstallElements::find(&doc) {
        Ok(elements) => {
            let mut host = DomInstallHost::new(&elements, dispatch_install);
            let state = engagement.start_install(&read_signals(&window), &mut host);
            log::info!("install flow: {state:?}");
            Some((elements, host))
        }
        Err(err) => {
            dom::console_error(&format!("install prompt disabled: {err}"));
            None
        }
    };

    wire_game(&doc)?;
    wire_themes(&theme)?;
    if let Some((elements, _)) = &install {
        wire_install(elements)?;
    }

    let page = Page {
        engagement,
        theme,
        scoreboard,
        install: install.map(|(_, host)| host),
        rng: SmallRng::seed_from_u64(entropy_seed()),
    };
    PAGE.with(|cell| *cell.borrow_mut() = Some(page));

    if let Some(prompt) = take_early_prompt(&window) {
        log::info!("install prompt arrived before mount");
        capture_prompt(prompt);
    }
    Ok(())
}
