use rps_game::EnvironmentSignals;

pub const IPHONE_UA: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 14_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.0 Mobile/15E148 Safari/604.1";
pub const ANDROID_UA: &str = "Mozilla/5.0 (Linux; Android 11; Pixel 5) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/90.0.4430.91 Mobile Safari/537.36";
pub const DESKTOP_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Emulated client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Device {
    Desktop,
    Iphone,
    Android,
}

impl Device {
    #[must_use]
    pub const fn user_agent(self) -> &'static str {
        match self {
            Self::Desktop => DESKTOP_UA,
            Self::Iphone => IPHONE_UA,
            Self::Android => ANDROID_UA,
        }
    }

    /// Window size in CSS pixels.
    #[must_use]
    pub const fn window_size(self) -> (u32, u32) {
        match self {
            Self::Desktop => (1920, 1080),
            Self::Iphone => (390, 844),
            Self::Android => (393, 851),
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Desktop => "desktop",
            Self::Iphone => "iphone",
            Self::Android => "android",
        }
    }

    /// Signals a regular browser tab on this device would report.
    #[must_use]
    pub fn signals(self) -> EnvironmentSignals {
        EnvironmentSignals::with_user_agent(self.user_agent())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rps_game::{OperatingSystem, detect};

    #[test]
    fn devices_classify_as_expected() {
        assert_eq!(detect(&Device::Iphone.signals()).os, OperatingSystem::Ios);
        assert_eq!(detect(&Device::Android.signals()).os, OperatingSystem::Android);
        assert_eq!(
            detect(&Device::Desktop.signals()).os,
            OperatingSystem::DesktopOrOther
        );
    }
}
