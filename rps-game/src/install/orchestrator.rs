use super::machine::{Transition, TransitionCtx, initial_state, transition};
use super::state::{Effect, InstallEvent, InstallInstructions, InstallState, Visibility};
use crate::clock::Timestamp;
use crate::config::EngagementConfig;
use crate::platform::Platform;
use crate::storage::{KeyValueBackend, PersistenceStore};
use std::time::Duration;

/// Rendering and browser hooks the orchestrator drives. One-way notifications only.
pub trait InstallHost {
    fn show_banner(&mut self);
    fn hide_banner(&mut self);
    fn show_overlay(&mut self);
    fn hide_overlay(&mut self);
    fn show_instructions(&mut self, instructions: InstallInstructions);
    /// Call `prompt()` on the held deferred event and report the answer back as
    /// [`InstallEvent::NativePromptResolved`].
    fn open_native_prompt(&mut self);
    /// Deliver [`InstallEvent::IosTimerElapsed`] once after `delay`.
    fn schedule_banner_timer(&mut self, delay: Duration);
}

/// The browser's deferred install prompt, which can be used once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NativePrompt {
    #[default]
    Unavailable,
    Captured,
    Used,
}

/// Live install state for one page lifetime.
#[derive(Debug, Clone)]
pub struct InstallOrchestrator {
    state: InstallState,
    platform: Platform,
    native_prompt: NativePrompt,
    dismissal_cooldown: Duration,
}

impl InstallOrchestrator {
    /// Compute the load-time state and apply its effects.
    pub fn boot<B: KeyValueBackend>(
        platform: Platform,
        now: Timestamp,
        config: &EngagementConfig,
        store: &mut PersistenceStore<B>,
        host: &mut impl InstallHost,
    ) -> Self {
        let Transition { next, effects } = initial_state(platform, store.dismissal(), now, config);
        log::debug!("install flow starts in {next:?} on {platform:?}");
        let orchestrator = Self {
            state: next,
            platform,
            native_prompt: NativePrompt::Unavailable,
            dismissal_cooldown: config.dismissal_cooldown(),
        };
        orchestrator.apply(&effects, store, host);
        orchestrator
    }

    #[must_use]
    pub const fn state(&self) -> InstallState {
        self.state
    }

    #[must_use]
    pub const fn platform(&self) -> Platform {
        self.platform
    }

    #[must_use]
    pub const fn native_prompt(&self) -> NativePrompt {
        self.native_prompt
    }

    #[must_use]
    pub const fn visibility(&self) -> Visibility {
        self.state.visibility()
    }

    /// Feed one event through the state machine and apply the resulting effects.
    pub fn handle<B: KeyValueBackend>(
        &mut self,
        event: InstallEvent,
        now: Timestamp,
        store: &mut PersistenceStore<B>,
        host: &mut impl InstallHost,
    ) -> InstallState {
        if event == InstallEvent::NativePromptCaptured && !self.state.is_hidden() {
            self.native_prompt = NativePrompt::Captured;
        }

        let ctx = TransitionCtx {
            platform: self.platform,
            native_prompt: self.native_prompt == NativePrompt::Captured,
            now,
            dismissal_cooldown: self.dismissal_cooldown,
        };
        let Transition { next, effects } = transition(self.state, event, &ctx);
        if next != self.state {
            log::debug!("install flow {:?} --{event:?}--> {next:?}", self.state);
        }
        self.state = next;
        if effects.contains(&Effect::OpenNativePrompt) {
            self.native_prompt = NativePrompt::Used;
        }
        self.apply(&effects, store, host);
        debug_assert!(
            self.visibility().is_exclusive(),
            "banner and overlay visible together in {next:?}"
        );
        self.state
    }

    fn apply<B: KeyValueBackend>(
        &self,
        effects: &[Effect],
        store: &mut PersistenceStore<B>,
        host: &mut impl InstallHost,
    ) {
        for effect in effects {
            match *effect {
                Effect::ShowBanner => host.show_banner(),
                Effect::HideBanner => host.hide_banner(),
                Effect::ShowOverlay => host.show_overlay(),
                Effect::HideOverlay => host.hide_overlay(),
                Effect::OpenNativePrompt => host.open_native_prompt(),
                Effect::ShowInstructions(instructions) => host.show_instructions(instructions),
                Effect::PersistDismissal(at) => {
                    store.record_dismissal(at);
                }
                Effect::ScheduleBannerTimer(delay) => host.schedule_banner_timer(delay),
            }
        }
    }
}
