//! Runtime environment classification.
//!
//! The detector is a pure function of [`EnvironmentSignals`]; only the web adapter reads the
//! real `window`.
use crate::constants::ANDROID_APP_REFERRER;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static IOS_DEVICE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"iPad|iPhone|iPod").expect("valid iOS device pattern"));
static ANDROID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)android").expect("valid Android pattern"));

/// Raw inputs read from the host page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentSignals {
    pub user_agent: String,
    /// `matchMedia('(display-mode: standalone)').matches`
    pub display_mode_standalone: bool,
    /// Safari's `navigator.standalone`
    pub navigator_standalone: bool,
    pub referrer: String,
    /// `window.MSStream` exists (old IE mobile spoofing an iPhone UA).
    pub ms_stream: bool,
}

impl EnvironmentSignals {
    #[must_use]
    pub fn with_user_agent(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_standalone(&self) -> bool {
        self.display_mode_standalone
            || self.navigator_standalone
            || self.referrer.starts_with(ANDROID_APP_REFERRER)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperatingSystem {
    Ios,
    Android,
    DesktopOrOther,
}

/// Classified environment, fixed for the page lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    pub os: OperatingSystem,
    pub is_standalone: bool,
}

impl Platform {
    #[must_use]
    pub const fn browser(os: OperatingSystem) -> Self {
        Self {
            os,
            is_standalone: false,
        }
    }

    #[must_use]
    pub const fn is_ios(&self) -> bool {
        matches!(self.os, OperatingSystem::Ios)
    }
}

/// Classify the environment. Standalone wins over any OS match.
#[must_use]
pub fn detect(signals: &EnvironmentSignals) -> Platform {
    let ua = signals.user_agent.as_str();
    let os = if IOS_DEVICE.is_match(ua) && !signals.ms_stream {
        OperatingSystem::Ios
    } else if ANDROID.is_match(ua) {
        OperatingSystem::Android
    } else {
        OperatingSystem::DesktopOrOther
    };
    Platform {
        os,
        is_standalone: signals.is_standalone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IPHONE: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 14_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.0 Mobile/15E148 Safari/604.1";
    const PIXEL: &str = "Mozilla/5.0 (Linux; Android 11; Pixel 5) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/90.0.4430.91 Mobile Safari/537.36";
    const DESKTOP: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

    #[test]
    fn classifies_common_user_agents() {
        assert_eq!(
            detect(&EnvironmentSignals::with_user_agent(IPHONE)),
            Platform::browser(OperatingSystem::Ios)
        );
        assert_eq!(
            detect(&EnvironmentSignals::with_user_agent(PIXEL)).os,
            OperatingSystem::Android
        );
        assert_eq!(
            detect(&EnvironmentSignals::with_user_agent(DESKTOP)).os,
            OperatingSystem::DesktopOrOther
        );
        assert_eq!(
            detect(&EnvironmentSignals::default()).os,
            OperatingSystem::DesktopOrOther
        );
    }

    #[test]
    fn user_agent_patterns_compile() {
        assert!(IOS_DEVICE.is_match("iPod touch"));
        assert!(ANDROID.is_match("ANDROID 14"));
        assert!(!IOS_DEVICE.is_match("Macintosh"));
    }

    #[test]
    fn ms_stream_disqualifies_ios() {
        let signals = EnvironmentSignals {
            ms_stream: true,
            ..EnvironmentSignals::with_user_agent(IPHONE)
        };
        assert_eq!(detect(&signals).os, OperatingSystem::DesktopOrOther);
    }

    #[test]
    fn any_standalone_signal_marks_installed() {
        let by_media = EnvironmentSignals {
            display_mode_standalone: true,
            ..EnvironmentSignals::with_user_agent(DESKTOP)
        };
        let by_navigator = EnvironmentSignals {
            navigator_standalone: true,
            ..EnvironmentSignals::with_user_agent(IPHONE)
        };
        let by_referrer = EnvironmentSignals {
            referrer: "android-app://com.example.twa".to_string(),
            ..EnvironmentSignals::with_user_agent(PIXEL)
        };
        for signals in [by_media, by_navigator, by_referrer] {
            assert!(detect(&signals).is_standalone, "{signals:?}");
        }
        let web_referrer = EnvironmentSignals {
            referrer: "https://example.com/?from=android-app://x".to_string(),
            ..EnvironmentSignals::with_user_agent(PIXEL)
        };
        assert!(!detect(&web_referrer).is_standalone);
    }
}
