use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rps_game::{
    Engagement, EngagementConfig, EnvironmentSignals, HiddenReason, InstallEvent, InstallHost,
    InstallInstructions, InstallState, ManualClock, MemoryBackend, NativeChoice, Theme,
    ThemeSurface, Timestamp,
};
use std::time::Duration;

const IPHONE_UA: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1";
const DESKTOP_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const PIXEL_UA: &str = "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Mobile Safari/537.36";

const DAY: Duration = Duration::from_secs(24 * 60 * 60);
const START: Timestamp = Timestamp::from_millis(1_700_000_000_000);

#[derive(Debug, Default)]
struct Page {
    banner: bool,
    overlay: bool,
    instructions: Vec<InstallInstructions>,
    prompts_opened: u32,
    timers: Vec<Duration>,
}

impl InstallHost for Page {
    fn show_banner(&mut self) {
        self.banner = true;
    }
    fn hide_banner(&mut self) {
        self.banner = false;
    }
    fn show_overlay(&mut self) {
        self.overlay = true;
    }
    fn hide_overlay(&mut self) {
        self.overlay = false;
    }
    fn show_instructions(&mut self, instructions: InstallInstructions) {
        self.instructions.push(instructions);
    }
    fn open_native_prompt(&mut self) {
        self.prompts_opened += 1;
    }
    fn schedule_banner_timer(&mut self, delay: Duration) {
        self.timers.push(delay);
    }
}

struct Body;

impl ThemeSurface for Body {
    fn apply_theme(&mut self, _theme: Theme) {}
}

fn load<'c>(
    backend: MemoryBackend,
    clock: &'c ManualClock,
    ua: &str,
    page: &mut Page,
) -> Engagement<MemoryBackend, &'c ManualClock> {
    let mut engagement =
        Engagement::new(backend, clock, EngagementConfig::default(), &mut Body).unwrap();
    engagement.start_install(&EnvironmentSignals::with_user_agent(ua), page);
    engagement
}

#[test]
fn desktop_with_native_prompt() {
    let clock = ManualClock::new(START);
    let mut page = Page::default();
    let mut app = load(MemoryBackend::new(), &clock, DESKTOP_UA, &mut page);
    assert_eq!(app.install_state(), Some(InstallState::BannerEligiblePendingShow));
    assert!(!page.banner);

    app.dispatch(InstallEvent::NativePromptCaptured, &mut page);
    assert!(page.banner);
    assert!(!page.overlay);

    app.dispatch(InstallEvent::InstallClicked, &mut page);
    assert_eq!(page.prompts_opened, 1);

    app.dispatch(
        InstallEvent::NativePromptResolved(NativeChoice::Dismissed),
        &mut page,
    );
    assert!(!page.banner);
    assert!(app.store().dismissal().is_none(), "answering the prompt is not a dismissal");
}

#[test]
fn desktop_without_prompt_falls_back_to_instructions() {
    let clock = ManualClock::new(START);
    let mut page = Page::default();
    let backend = MemoryBackend::new();
    let mut app = load(backend.clone(), &clock, DESKTOP_UA, &mut page);
    app.dispatch(InstallEvent::IosTimerElapsed, &mut page);
    assert!(!page.banner, "the iOS timer means nothing on desktop");

    app.dispatch(InstallEvent::InstallClicked, &mut page);
    assert_eq!(page.instructions, vec![InstallInstructions::Desktop]);
    assert_eq!(
        app.install_state(),
        Some(InstallState::Hidden(HiddenReason::InstructionsShown))
    );
    assert!(backend.raw("installBannerDismissed").is_none());

    let backend = app.into_backend();
    let mut page = Page::default();
    let mut app = load(backend, &clock, DESKTOP_UA, &mut page);
    app.dispatch(InstallEvent::NativePromptCaptured, &mut page);
    assert!(page.banner, "eligible again on the next load");
}

#[test]
fn ios_banner_then_overlay_then_close() {
    let clock = ManualClock::new(START);
    let mut page = Page::default();
    let backend = MemoryBackend::new();
    let mut app = load(backend.clone(), &clock, IPHONE_UA, &mut page);
    assert_eq!(page.timers, vec![Duration::from_millis(3000)]);
    assert!(!page.banner);

    clock.advance(Duration::from_millis(3000));
    app.dispatch(InstallEvent::IosTimerElapsed, &mut page);
    assert!(page.banner);

    app.dispatch(InstallEvent::InstallClicked, &mut page);
    assert!(!page.banner);
    assert!(page.overlay);

    app.dispatch(InstallEvent::OverlayClosed, &mut page);
    assert!(!page.overlay);
    assert_eq!(
        app.install_state(),
        Some(InstallState::Hidden(HiddenReason::OverlayClosed))
    );
    assert!(backend.raw("installBannerDismissed").is_none());
}

#[test]
fn android_native_prompt_opens_once() {
    let clock = ManualClock::new(START);
    let mut page = Page::default();
    let mut app = load(MemoryBackend::new(), &clock, PIXEL_UA, &mut page);
    app.dispatch(InstallEvent::NativePromptCaptured, &mut page);
    app.dispatch(InstallEvent::InstallClicked, &mut page);
    assert_eq!(page.prompts_opened, 1);
    assert!(page.instructions.is_empty());
}

#[test]
fn dismissal_suppresses_for_seven_days_only() {
    let clock = ManualClock::new(START);
    let backend = MemoryBackend::new();

    let mut page = Page::default();
    let mut app = load(backend.clone(), &clock, DESKTOP_UA, &mut page);
    app.dispatch(InstallEvent::NativePromptCaptured, &mut page);
    app.dispatch(InstallEvent::DismissClicked, &mut page);
    assert!(!page.banner);
    assert_eq!(
        backend.raw("installBannerDismissed"),
        Some(START.as_millis().to_string())
    );
    let backend = app.into_backend();

    clock.advance(DAY);
    let mut page = Page::default();
    let mut app = load(backend, &clock, DESKTOP_UA, &mut page);
    app.dispatch(InstallEvent::NativePromptCaptured, &mut page);
    assert!(!page.banner, "one day later the banner stays hidden");
    let backend = app.into_backend();

    clock.set(START.saturating_add(DAY * 7));
    let mut page = Page::default();
    let mut app = load(backend, &clock, DESKTOP_UA, &mut page);
    app.dispatch(InstallEvent::NativePromptCaptured, &mut page);
    assert!(page.banner, "eligible again once the cooldown has elapsed");
}

#[test]
fn standalone_launch_hides_everything() {
    let clock = ManualClock::new(START);
    let mut page = Page::default();
    let mut app = Engagement::new(
        MemoryBackend::new(),
        &clock,
        EngagementConfig::default(),
        &mut Body,
    )
    .unwrap();
    let signals = EnvironmentSignals {
        referrer: "android-app://com.vera.rps".to_owned(),
        ..EnvironmentSignals::with_user_agent(PIXEL_UA)
    };
    app.start_install(&signals, &mut page);
    for event in [
        InstallEvent::NativePromptCaptured,
        InstallEvent::IosTimerElapsed,
        InstallEvent::InstallClicked,
    ] {
        app.dispatch(event, &mut page);
    }
    assert!(!page.banner && !page.overlay);
    assert_eq!(
        app.install_state(),
        Some(InstallState::Hidden(HiddenReason::Standalone))
    );
}

fn random_event(rng: &mut impl Rng) -> InstallEvent {
    match rng.gen_range(0..7) {
        0 => InstallEvent::NativePromptCaptured,
        1 => InstallEvent::IosTimerElapsed,
        2 => InstallEvent::InstallClicked,
        3 => InstallEvent::DismissClicked,
        4 => InstallEvent::OverlayClosed,
        5 => InstallEvent::NativePromptResolved(NativeChoice::Accepted),
        _ => InstallEvent::NativePromptResolved(NativeChoice::Dismissed),
    }
}

#[test]
fn banner_and_overlay_never_overlap() {
    for seed in 0..64_u64 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let ua = [IPHONE_UA, DESKTOP_UA, PIXEL_UA][rng.gen_range(0..3)];
        let clock = ManualClock::new(START);
        let mut page = Page::default();
        let mut app = load(MemoryBackend::new(), &clock, ua, &mut page);
        for _ in 0..24 {
            let event = random_event(&mut rng);
            let state = app.dispatch(event, &mut page).unwrap();
            assert!(
                !(page.banner && page.overlay),
                "seed {seed}: overlap after {event:?}"
            );
            assert_eq!(page.banner, state.visibility().banner, "seed {seed}");
            assert_eq!(page.overlay, state.visibility().overlay, "seed {seed}");
            clock.advance(Duration::from_millis(250));
        }
        assert!(page.prompts_opened <= 1, "seed {seed}: prompt reused");
    }
}
