#![cfg(target_arch = "wasm32")]

use rps_game::{Engagement, EngagementConfig, InstallEvent, InstallHost, Theme, ThemeSurface};
use rps_web::clock::JsClock;
use rps_web::dom;
use rps_web::install::{DomInstallHost, EARLY_PROMPT_PROP, InstallElements, take_early_prompt};
use wasm_bindgen::JsValue;
use rps_web::storage::LocalStorageBackend;
use rps_web::theme::DomThemeSurface;
use wasm_bindgen_test::*;
use web_sys::Document;

wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

const FIXTURE: &str = r#"
<div id="installBanner"><button id="installBtn">Install</button><button id="dismissBtn">Later</button></div>
<div id="iosInstallOverlay" style="display:none"><button class="ios-close-btn">Got it</button></div>
<div class="theme-switcher">
  <button class="theme-btn" data-theme="brutalist">Brutalist</button>
  <button class="theme-btn" data-theme="y2k">Y2K</button>
  <button class="theme-btn" data-theme="neon">Neon</button>
</div>
"#;

fn fixture() -> Document {
    let doc = dom::document().expect("document");
    doc.body().expect("body").set_inner_html(FIXTURE);
    dom::local_storage().expect("storage").clear().expect("clear");
    doc
}

fn ignore(_event: InstallEvent) {}

#[wasm_bindgen_test]
fn banner_toggles_show_class() {
    let doc = fixture();
    let elements = InstallElements::find(&doc).expect("install markup");
    let mut host = DomInstallHost::new(&elements, ignore);
    host.show_banner();
    assert!(elements.banner.class_list().contains("show"));
    host.hide_banner();
    assert!(!elements.banner.class_list().contains("show"));

    host.show_overlay();
    assert_eq!(
        elements.overlay.style().get_property_value("display").unwrap(),
        "flex"
    );
    host.hide_overlay();
    assert_eq!(
        elements.overlay.style().get_property_value("display").unwrap(),
        "none"
    );
}

#[wasm_bindgen_test]
fn missing_overlay_is_reported() {
    let doc = fixture();
    doc.get_element_by_id("iosInstallOverlay").unwrap().remove();
    let err = InstallElements::find(&doc).err().expect("overlay missing");
    assert!(err.to_string().contains("iosInstallOverlay"));
}

#[wasm_bindgen_test]
fn theme_marks_body_and_active_button() {
    let doc = fixture();
    let mut surface = DomThemeSurface::bind(&doc);
    surface.apply_theme(Theme::Neon);
    let body = doc.body().unwrap();
    assert_eq!(body.get_attribute("data-theme").as_deref(), Some("neon"));
    let active: Vec<_> = surface
        .buttons()
        .iter()
        .filter(|b| b.class_list().contains("active"))
        .filter_map(DomThemeSurface::button_theme)
        .collect();
    assert_eq!(active, vec!["neon".to_owned()]);
}

#[wasm_bindgen_test]
fn dismissal_lands_in_local_storage() {
    let doc = fixture();
    let elements = InstallElements::find(&doc).expect("install markup");
    let mut host = DomInstallHost::new(&elements, ignore);
    let mut surface = DomThemeSurface::bind(&doc);
    let mut engagement = Engagement::new(
        LocalStorageBackend::open(),
        JsClock,
        EngagementConfig::default(),
        &mut surface,
    )
    .unwrap();
    engagement.start_install(
        &rps_game::EnvironmentSignals::with_user_agent("Mozilla/5.0 (X11; Linux x86_64)"),
        &mut host,
    );
    engagement.dispatch(InstallEvent::NativePromptCaptured, &mut host);
    engagement.dispatch(InstallEvent::DismissClicked, &mut host);

    let stored = dom::local_storage()
        .unwrap()
        .get_item("installBannerDismissed")
        .unwrap();
    assert!(stored.is_some_and(|v| v.parse::<u64>().is_ok()));
    assert!(!elements.banner.class_list().contains("show"));
}

#[wasm_bindgen_test]
fn early_prompt_is_collected_once() {
    let window = dom::window().expect("window");
    assert!(take_early_prompt(&window).is_none());

    let parked = js_sys::Object::new();
    js_sys::Reflect::set(&window, &JsValue::from_str(EARLY_PROMPT_PROP), &parked).unwrap();
    let taken = take_early_prompt(&window).expect("parked prompt");
    assert!(taken.is_object());
    assert!(take_early_prompt(&window).is_none());
}

#[wasm_bindgen_test]
fn rejected_dom_call_is_logged_not_raised() {
    let doc = fixture();
    let elements = InstallElements::find(&doc).expect("install markup");
    let bad_token = elements.banner.class_list().add_1("");
    assert!(bad_token.is_err());
    dom::report(bad_token, "empty class token");

    let mut host = DomInstallHost::new(&elements, ignore);
    host.show_banner();
    assert!(elements.banner.class_list().contains("show"));
}
