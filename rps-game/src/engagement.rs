//! One page lifetime of engagement state: scores, theme and the install flow.
//!
//! The host (the wasm adapter, or the tester's fakes) forwards page events to these methods.
use crate::clock::Clock;
use crate::config::{ConfigError, EngagementConfig};
use crate::install::{InstallEvent, InstallHost, InstallOrchestrator, InstallState};
use crate::platform::{EnvironmentSignals, Platform, detect};
use crate::round::{Move, Round, play_round};
use crate::score::{Outcome, ScoreLedger, ScoreSnapshot};
use crate::storage::{KeyValueBackend, PersistenceStore};
use crate::theme::{Theme, ThemePreference, ThemeSurface};
use rand::Rng;

pub struct Engagement<B, C> {
    config: EngagementConfig,
    store: PersistenceStore<B>,
    clock: C,
    ledger: ScoreLedger,
    theme: ThemePreference,
    install: Option<InstallOrchestrator>,
}

impl<B, C> Engagement<B, C>
where
    B: KeyValueBackend,
    C: Clock,
{
    /// Load persisted state and reflect the stored theme on `theme_surface`.
    ///
    /// The install flow is started separately with [`Engagement::start_install`] so a page
    /// without install markup still gets scores and themes.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` fails validation.
    pub fn new(
        backend: B,
        clock: C,
        config: EngagementConfig,
        theme_surface: &mut impl ThemeSurface,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let store = PersistenceStore::new(backend, config.keys.clone());
        let ledger = ScoreLedger::load(&store);
        let theme = ThemePreference::load(&store, theme_surface);
        Ok(Self {
            config,
            store,
            clock,
            ledger,
            theme,
            install: None,
        })
    }

    /// Classify the environment and start the install flow.
    pub fn start_install(
        &mut self,
        signals: &EnvironmentSignals,
        host: &mut impl InstallHost,
    ) -> InstallState {
        let platform = detect(signals);
        self.start_install_on(platform, host)
    }

    /// Start the install flow for an already classified platform.
    ///
    /// The flow boots once per page lifetime; later calls return the current state untouched.
    pub fn start_install_on(
        &mut self,
        platform: Platform,
        host: &mut impl InstallHost,
    ) -> InstallState {
        if let Some(install) = &self.install {
            log::warn!("install flow already started; staying in {:?}", install.state());
            return install.state();
        }
        let orchestrator = InstallOrchestrator::boot(
            platform,
            self.clock.now(),
            &self.config,
            &mut self.store,
            host,
        );
        let state = orchestrator.state();
        self.install = Some(orchestrator);
        state
    }

    /// Route an install event. `None` when the install flow never started.
    pub fn dispatch(
        &mut self,
        event: InstallEvent,
        host: &mut impl InstallHost,
    ) -> Option<InstallState> {
        let now = self.clock.now();
        let install = self.install.as_mut()?;
        Some(install.handle(event, now, &mut self.store, host))
    }

    /// Play one round against a random computer move and count it.
    pub fn play(&mut self, player: Move, rng: &mut impl Rng) -> (Round, ScoreSnapshot) {
        let round = play_round(player, rng);
        let scores = self.record_outcome(round.outcome);
        (round, scores)
    }

    pub fn record_outcome(&mut self, outcome: Outcome) -> ScoreSnapshot {
        self.ledger.record_outcome(outcome, &mut self.store)
    }

    /// Switch theme by its page name; unknown names change nothing.
    pub fn select_theme(&mut self, name: &str, surface: &mut impl ThemeSurface) -> Option<Theme> {
        self.theme.select(name, &mut self.store, surface)
    }

    #[must_use]
    pub const fn scores(&self) -> ScoreSnapshot {
        self.ledger.snapshot()
    }

    #[must_use]
    pub const fn theme(&self) -> Theme {
        self.theme.get()
    }

    #[must_use]
    pub fn install_state(&self) -> Option<InstallState> {
        self.install.as_ref().map(InstallOrchestrator::state)
    }

    pub const fn store(&self) -> &PersistenceStore<B> {
        &self.store
    }

    /// End the page lifetime, handing back the backend for the next load.
    pub fn into_backend(self) -> B {
        self.store.into_backend()
    }
}
