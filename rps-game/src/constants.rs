//! Fixed values shared by the engagement components.

/// How long a banner dismissal suppresses the install banner (7 days).
pub const DISMISSAL_COOLDOWN_MS: u64 = 7 * 24 * 60 * 60 * 1000;

/// Delay before the banner is offered on iOS, which never fires a native prompt.
pub const IOS_BANNER_DELAY_MS: u64 = 3_000;

/// Storage key for the banner dismissal timestamp.
pub const DISMISSAL_KEY: &str = "installBannerDismissed";

/// Storage key for the selected theme.
pub const THEME_KEY: &str = "theme";

/// Storage key for the lifetime score counters.
pub const ALL_TIME_KEY: &str = "allTimeScores";

/// Referrer prefix Android uses when launching an installed web app.
pub const ANDROID_APP_REFERRER: &str = "android-app://";
