//! In-process page double: the real engagement core over memory storage, a manual clock and a
//! host that records what would be on screen.
use anyhow::{Result, ensure};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rps_game::{
    Clock, Engagement, EngagementConfig, InstallEvent, InstallHost, InstallInstructions,
    InstallState, ManualClock, MemoryBackend, Move, Round, ScoreSnapshot, Theme, ThemeSurface,
    Timestamp,
};
use std::rc::Rc;
use std::time::Duration;

use crate::common::Device;

/// Fixed start time so runs are reproducible.
pub const START: Timestamp = Timestamp::from_millis(1_700_000_000_000);

#[derive(Debug, Clone, Default)]
pub struct SharedClock(Rc<ManualClock>);

impl Clock for SharedClock {
    fn now(&self) -> Timestamp {
        self.0.now()
    }
}

#[derive(Debug, Default)]
pub struct RecordingHost {
    pub banner: bool,
    pub overlay: bool,
    pub instructions: Vec<InstallInstructions>,
    pub prompts_opened: u32,
    timer_due: Option<Timestamp>,
    now: Timestamp,
}

impl InstallHost for RecordingHost {
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
        self.timer_due = Some(self.now.saturating_add(delay));
    }
}

#[derive(Debug, Default)]
pub struct RecordingBody {
    pub theme: Option<Theme>,
}

impl ThemeSurface for RecordingBody {
    fn apply_theme(&mut self, theme: Theme) {
        self.theme = Some(theme);
    }
}

pub struct PageHarness {
    pub device: Device,
    pub backend: MemoryBackend,
    pub host: RecordingHost,
    pub body: RecordingBody,
    clock: SharedClock,
    app: Engagement<MemoryBackend, SharedClock>,
    rng: ChaCha8Rng,
}

impl PageHarness {
    /// Open a fresh page with empty storage.
    ///
    /// # Errors
    /// Fails if the default configuration is rejected.
    pub fn open(device: Device, seed: u64) -> Result<Self> {
        let clock = SharedClock(Rc::new(ManualClock::new(START)));
        Self::load(device, MemoryBackend::new(), clock, seed)
    }

    fn load(
        device: Device,
        backend: MemoryBackend,
        clock: SharedClock,
        seed: u64,
    ) -> Result<Self> {
        let mut host = RecordingHost {
            now: clock.now(),
            ..RecordingHost::default()
        };
        let mut body = RecordingBody::default();
        let mut app = Engagement::new(
            backend.clone(),
            clock.clone(),
            EngagementConfig::default(),
            &mut body,
        )?;
        app.start_install(&device.signals(), &mut host);
        Ok(Self {
            device,
            backend,
            host,
            body,
            clock,
            app,
            rng: ChaCha8Rng::seed_from_u64(seed),
        })
    }

    /// Reload the page: same storage and clock, fresh in-memory state.
    ///
    /// # Errors
    /// Fails if the default configuration is rejected.
    pub fn reload(self) -> Result<Self> {
        let seed = self.clock.now().as_millis();
        Self::load(self.device, self.backend, self.clock, seed)
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// Let time pass, firing the banner timer if it comes due.
    ///
    /// # Errors
    /// Fails if the timer leaves the banner and overlay on screen together.
    pub fn advance(&mut self, by: Duration) -> Result<()> {
        self.clock.0.advance(by);
        self.host.now = self.clock.now();
        if self.host.timer_due.is_some_and(|due| due <= self.host.now) {
            self.host.timer_due = None;
            self.fire(InstallEvent::IosTimerElapsed)?;
        }
        Ok(())
    }

    /// Deliver one install event.
    ///
    /// # Errors
    /// Fails if the banner and overlay end up on screen together.
    pub fn fire(&mut self, event: InstallEvent) -> Result<Option<InstallState>> {
        let state = self.app.dispatch(event, &mut self.host);
        ensure!(
            !(self.host.banner && self.host.overlay),
            "banner and overlay visible together after {event:?} (state {state:?})"
        );
        Ok(state)
    }

    pub fn install_state(&self) -> Option<InstallState> {
        self.app.install_state()
    }

    pub fn play(&mut self, mv: Move) -> (Round, ScoreSnapshot) {
        self.app.play(mv, &mut self.rng)
    }

    pub fn scores(&self) -> ScoreSnapshot {
        self.app.scores()
    }

    pub fn select_theme(&mut self, name: &str) -> Option<Theme> {
        self.app.select_theme(name, &mut self.body)
    }

    pub fn theme(&self) -> Theme {
        self.app.theme()
    }

    pub fn rng(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    pub fn stored(&self, key: &str) -> Option<String> {
        self.backend.raw(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ios_timer_fires_when_clock_passes_delay() {
        let mut page = PageHarness::open(Device::Iphone, 1).unwrap();
        page.advance(Duration::from_millis(2999)).unwrap();
        assert!(!page.host.banner);
        page.advance(Duration::from_millis(1)).unwrap();
        assert!(page.host.banner);
    }

    #[test]
    fn reload_keeps_storage_and_clock() {
        let mut page = PageHarness::open(Device::Desktop, 1).unwrap();
        page.play(Move::Rock);
        page.advance(Duration::from_secs(60)).unwrap();
        let page = page.reload().unwrap();
        assert_eq!(page.scores().all_time.total(), 1);
        assert_eq!(page.scores().session.total(), 0);
        assert_eq!(page.now(), START.saturating_add(Duration::from_secs(60)));
    }

    #[test]
    fn overlapping_surfaces_fail_the_event() {
        let mut page = PageHarness::open(Device::Iphone, 1).unwrap();
        page.advance(Duration::from_secs(3)).unwrap();
        page.fire(InstallEvent::InstallClicked).unwrap();
        assert!(page.host.overlay);

        page.host.banner = true;
        let err = page.fire(InstallEvent::DismissClicked).unwrap_err();
        assert!(err.to_string().contains("visible together"));
    }
}
