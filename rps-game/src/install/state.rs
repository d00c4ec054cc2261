use crate::clock::Timestamp;
use crate::platform::OperatingSystem;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Why install UI is hidden for the rest of the page lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HiddenReason {
    /// Already running as an installed app.
    Standalone,
    /// A banner dismissal is in force until the given time.
    DismissedUntil(Timestamp),
    /// The iOS instructions overlay was closed.
    OverlayClosed,
    /// Manual install instructions were shown instead of a native prompt.
    InstructionsShown,
    /// The browser's native prompt was answered.
    NativePromptResolved(NativeChoice),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstallState {
    /// Terminal for the page lifetime.
    Hidden(HiddenReason),
    /// Eligible; waiting for a native prompt or the iOS timer.
    BannerEligiblePendingShow,
    BannerShown,
    /// Native prompt is open over the banner; waiting for the user's answer.
    NativePromptOpen,
    OverlayShown,
}

impl InstallState {
    #[must_use]
    pub const fn is_hidden(&self) -> bool {
        matches!(self, Self::Hidden(_))
    }

    /// Surfaces this state implies.
    #[must_use]
    pub const fn visibility(&self) -> Visibility {
        match self {
            Self::BannerShown | Self::NativePromptOpen => Visibility {
                banner: true,
                overlay: false,
            },
            Self::OverlayShown => Visibility {
                banner: false,
                overlay: true,
            },
            Self::Hidden(_) | Self::BannerEligiblePendingShow => Visibility {
                banner: false,
                overlay: false,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Visibility {
    pub banner: bool,
    pub overlay: bool,
}

impl Visibility {
    /// Banner and overlay are never up together.
    #[must_use]
    pub const fn is_exclusive(&self) -> bool {
        !(self.banner && self.overlay)
    }
}

/// Answer to the browser's native install prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NativeChoice {
    Accepted,
    Dismissed,
}

impl NativeChoice {
    /// Map `userChoice.outcome` from the browser.
    #[must_use]
    pub fn from_outcome(outcome: &str) -> Self {
        if outcome == "accepted" {
            Self::Accepted
        } else {
            Self::Dismissed
        }
    }
}

/// Inputs from the page: clicks, the deferred prompt event, and timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstallEvent {
    NativePromptCaptured,
    IosTimerElapsed,
    InstallClicked,
    DismissClicked,
    OverlayClosed,
    NativePromptResolved(NativeChoice),
}

/// Manual install steps for platforms without a usable native prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstallInstructions {
    Ios,
    Android,
    Desktop,
}

impl InstallInstructions {
    #[must_use]
    pub const fn for_os(os: OperatingSystem) -> Self {
        match os {
            OperatingSystem::Ios => Self::Ios,
            OperatingSystem::Android => Self::Android,
            OperatingSystem::DesktopOrOther => Self::Desktop,
        }
    }

    #[must_use]
    pub const fn text(self) -> &'static str {
        match self {
            Self::Ios => "To install: tap the Share button, then \"Add to Home Screen\".",
            Self::Android => "To install: open the browser menu and choose \"Install app\".",
            Self::Desktop => {
                "To install: click the install icon in the address bar, or open the browser menu and choose \"Install app\"."
            }
        }
    }
}

/// Side effects requested by a transition, applied in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    ShowBanner,
    HideBanner,
    ShowOverlay,
    HideOverlay,
    OpenNativePrompt,
    ShowInstructions(InstallInstructions),
    PersistDismissal(Timestamp),
    ScheduleBannerTimer(Duration),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_visible_states_show_surfaces() {
        assert_eq!(
            InstallState::BannerEligiblePendingShow.visibility(),
            Visibility::default()
        );
        assert!(InstallState::NativePromptOpen.visibility().banner);
        assert!(InstallState::OverlayShown.visibility().overlay);
        assert!(!InstallState::OverlayShown.visibility().banner);
    }

    #[test]
    fn native_choice_maps_browser_outcome() {
        assert_eq!(NativeChoice::from_outcome("accepted"), NativeChoice::Accepted);
        assert_eq!(NativeChoice::from_outcome("dismissed"), NativeChoice::Dismissed);
        assert_eq!(NativeChoice::from_outcome(""), NativeChoice::Dismissed);
    }
}
