use super::state::{Effect, HiddenReason, InstallEvent, InstallInstructions, InstallState};
use crate::clock::Timestamp;
use crate::config::EngagementConfig;
use crate::platform::Platform;
use crate::storage::DismissalRecord;
use std::time::Duration;

/// Everything a transition may look at besides the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionCtx {
    pub platform: Platform,
    /// A deferred native prompt is held and has not been used yet.
    pub native_prompt: bool,
    pub now: Timestamp,
    pub dismissal_cooldown: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub next: InstallState,
    pub effects: Vec<Effect>,
}

impl Transition {
    const fn stay(state: InstallState) -> Self {
        Self {
            next: state,
            effects: Vec::new(),
        }
    }

    fn to(next: InstallState, effects: impl Into<Vec<Effect>>) -> Self {
        Self {
            next,
            effects: effects.into(),
        }
    }
}

/// State at page load.
#[must_use]
pub fn initial_state(
    platform: Platform,
    dismissal: Option<DismissalRecord>,
    now: Timestamp,
    config: &EngagementConfig,
) -> Transition {
    if platform.is_standalone {
        return Transition::stay(InstallState::Hidden(HiddenReason::Standalone));
    }
    let cooldown = config.dismissal_cooldown();
    if let Some(record) = dismissal.filter(|record| record.suppresses(now, cooldown)) {
        return Transition::stay(InstallState::Hidden(HiddenReason::DismissedUntil(
            record.expires_at(cooldown),
        )));
    }
    if platform.is_ios() {
        Transition::to(
            InstallState::BannerEligiblePendingShow,
            [Effect::ScheduleBannerTimer(config.ios_banner_delay())],
        )
    } else {
        Transition::stay(InstallState::BannerEligiblePendingShow)
    }
}

/// Apply one event. Events that do not apply to the current state are no-ops, which covers
/// stale timers and clicks on surfaces that are already gone.
#[must_use]
pub fn transition(state: InstallState, event: InstallEvent, ctx: &TransitionCtx) -> Transition {
    use InstallEvent as E;
    use InstallState as S;

    match (state, event) {
        (S::Hidden(_), _) => Transition::stay(state),

        (S::BannerEligiblePendingShow, E::NativePromptCaptured) => {
            Transition::to(S::BannerShown, [Effect::ShowBanner])
        }
        (S::BannerEligiblePendingShow, E::IosTimerElapsed)
            if ctx.platform.is_ios() && !ctx.native_prompt =>
        {
            Transition::to(S::BannerShown, [Effect::ShowBanner])
        }

        (S::BannerEligiblePendingShow | S::BannerShown, E::InstallClicked) => {
            install_clicked(ctx)
        }
        (S::BannerShown, E::DismissClicked) => {
            let until = ctx.now.saturating_add(ctx.dismissal_cooldown);
            Transition::to(
                S::Hidden(HiddenReason::DismissedUntil(until)),
                [Effect::HideBanner, Effect::PersistDismissal(ctx.now)],
            )
        }

        (S::NativePromptOpen, E::NativePromptResolved(choice)) => Transition::to(
            S::Hidden(HiddenReason::NativePromptResolved(choice)),
            [Effect::HideBanner],
        ),

        (S::OverlayShown, E::OverlayClosed) => Transition::to(
            S::Hidden(HiddenReason::OverlayClosed),
            [Effect::HideOverlay],
        ),

        _ => Transition::stay(state),
    }
}

fn install_clicked(ctx: &TransitionCtx) -> Transition {
    if ctx.platform.is_ios() {
        return Transition::to(
            InstallState::OverlayShown,
            [Effect::HideBanner, Effect::ShowOverlay],
        );
    }
    if ctx.native_prompt {
        return Transition::to(InstallState::NativePromptOpen, [Effect::OpenNativePrompt]);
    }
    Transition::to(
        InstallState::Hidden(HiddenReason::InstructionsShown),
        [
            Effect::HideBanner,
            Effect::ShowInstructions(InstallInstructions::for_os(ctx.platform.os)),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::install::state::NativeChoice;
    use crate::platform::OperatingSystem;

    const NOW: Timestamp = Timestamp::from_millis(1_700_000_000_000);

    fn ctx(os: OperatingSystem, native_prompt: bool) -> TransitionCtx {
        TransitionCtx {
            platform: Platform::browser(os),
            native_prompt,
            now: NOW,
            dismissal_cooldown: EngagementConfig::default().dismissal_cooldown(),
        }
    }

    #[test]
    fn standalone_wins_over_everything() {
        let platform = Platform {
            os: OperatingSystem::Ios,
            is_standalone: true,
        };
        let t = initial_state(platform, None, NOW, &EngagementConfig::default());
        assert_eq!(t.next, InstallState::Hidden(HiddenReason::Standalone));
        assert!(t.effects.is_empty());
    }

    #[test]
    fn ios_load_schedules_banner_timer() {
        let cfg = EngagementConfig::default();
        let t = initial_state(Platform::browser(OperatingSystem::Ios), None, NOW, &cfg);
        assert_eq!(t.next, InstallState::BannerEligiblePendingShow);
        assert_eq!(
            t.effects,
            vec![Effect::ScheduleBannerTimer(Duration::from_secs(3))]
        );

        let t = initial_state(
            Platform::browser(OperatingSystem::Android),
            None,
            NOW,
            &cfg,
        );
        assert!(t.effects.is_empty());
    }

    #[test]
    fn active_dismissal_hides_until_expiry() {
        let cfg = EngagementConfig::default();
        let record = DismissalRecord { dismissed_at: NOW };
        let t = initial_state(
            Platform::browser(OperatingSystem::DesktopOrOther),
            Some(record),
            NOW,
            &cfg,
        );
        assert_eq!(
            t.next,
            InstallState::Hidden(HiddenReason::DismissedUntil(
                NOW.saturating_add(cfg.dismissal_cooldown())
            ))
        );

        let later = NOW.saturating_add(cfg.dismissal_cooldown());
        let t = initial_state(
            Platform::browser(OperatingSystem::DesktopOrOther),
            Some(record),
            later,
            &cfg,
        );
        assert_eq!(t.next, InstallState::BannerEligiblePendingShow);
    }

    #[test]
    fn hidden_ignores_every_event() {
        let state = InstallState::Hidden(HiddenReason::OverlayClosed);
        for event in [
            InstallEvent::NativePromptCaptured,
            InstallEvent::IosTimerElapsed,
            InstallEvent::InstallClicked,
            InstallEvent::DismissClicked,
            InstallEvent::OverlayClosed,
            InstallEvent::NativePromptResolved(NativeChoice::Accepted),
        ] {
            let t = transition(state, event, &ctx(OperatingSystem::Ios, true));
            assert_eq!(t.next, state);
            assert!(t.effects.is_empty());
        }
    }

    #[test]
    fn timer_only_fires_on_ios_while_pending() {
        let pending = InstallState::BannerEligiblePendingShow;
        let t = transition(
            pending,
            InstallEvent::IosTimerElapsed,
            &ctx(OperatingSystem::Ios, false),
        );
        assert_eq!(t.next, InstallState::BannerShown);

        let t = transition(
            pending,
            InstallEvent::IosTimerElapsed,
            &ctx(OperatingSystem::Android, false),
        );
        assert_eq!(t.next, pending);

        let t = transition(
            InstallState::BannerShown,
            InstallEvent::IosTimerElapsed,
            &ctx(OperatingSystem::Ios, false),
        );
        assert!(t.effects.is_empty());
    }

    #[test]
    fn install_click_branches_by_platform() {
        let shown = InstallState::BannerShown;

        let ios = transition(
            shown,
            InstallEvent::InstallClicked,
            &ctx(OperatingSystem::Ios, false),
        );
        assert_eq!(ios.next, InstallState::OverlayShown);
        assert_eq!(ios.effects, vec![Effect::HideBanner, Effect::ShowOverlay]);

        let native = transition(
            shown,
            InstallEvent::InstallClicked,
            &ctx(OperatingSystem::Android, true),
        );
        assert_eq!(native.next, InstallState::NativePromptOpen);
        assert_eq!(native.effects, vec![Effect::OpenNativePrompt]);

        let manual = transition(
            shown,
            InstallEvent::InstallClicked,
            &ctx(OperatingSystem::DesktopOrOther, false),
        );
        assert_eq!(
            manual.next,
            InstallState::Hidden(HiddenReason::InstructionsShown)
        );
        assert_eq!(
            manual.effects,
            vec![
                Effect::HideBanner,
                Effect::ShowInstructions(InstallInstructions::Desktop)
            ]
        );
    }

    #[test]
    fn install_click_while_pending_without_prompt_shows_instructions() {
        let t = transition(
            InstallState::BannerEligiblePendingShow,
            InstallEvent::InstallClicked,
            &ctx(OperatingSystem::DesktopOrOther, false),
        );
        assert_eq!(t.next, InstallState::Hidden(HiddenReason::InstructionsShown));
        assert!(
            !t.effects
                .iter()
                .any(|e| matches!(e, Effect::PersistDismissal(_)))
        );
    }

    #[test]
    fn dismiss_persists_now_and_hides() {
        let t = transition(
            InstallState::BannerShown,
            InstallEvent::DismissClicked,
            &ctx(OperatingSystem::DesktopOrOther, false),
        );
        assert!(matches!(
            t.next,
            InstallState::Hidden(HiddenReason::DismissedUntil(_))
        ));
        assert_eq!(
            t.effects,
            vec![Effect::HideBanner, Effect::PersistDismissal(NOW)]
        );
    }

    #[test]
    fn overlay_close_writes_nothing() {
        let t = transition(
            InstallState::OverlayShown,
            InstallEvent::OverlayClosed,
            &ctx(OperatingSystem::Ios, false),
        );
        assert_eq!(t.next, InstallState::Hidden(HiddenReason::OverlayClosed));
        assert_eq!(t.effects, vec![Effect::HideOverlay]);
    }

    #[test]
    fn native_answer_closes_banner() {
        let t = transition(
            InstallState::NativePromptOpen,
            InstallEvent::NativePromptResolved(NativeChoice::Dismissed),
            &ctx(OperatingSystem::Android, false),
        );
        assert_eq!(
            t.next,
            InstallState::Hidden(HiddenReason::NativePromptResolved(NativeChoice::Dismissed))
        );
        assert_eq!(t.effects, vec![Effect::HideBanner]);
    }
}
