use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thirtyfour::prelude::*;

const SNAPSHOT_JS: &str = r"
const text = (sel) => { const el = document.querySelector(sel); return el ? el.textContent.trim() : null; };
const banner = document.getElementById('installBanner');
const overlay = document.getElementById('iosInstallOverlay');
const activeTheme = document.querySelector('.theme-btn.active');
return {
    title: document.title,
    banner_shown: !!banner && banner.classList.contains('show'),
    overlay_display: overlay ? window.getComputedStyle(overlay).display : null,
    body_theme: document.body.getAttribute('data-theme'),
    active_theme: activeTheme ? activeTheme.getAttribute('data-theme') : null,
    stored_theme: localStorage.getItem('theme'),
    stored_dismissal: localStorage.getItem('installBannerDismissed'),
    player_choice: text('#playerChoice'),
    computer_choice: text('#computerChoice'),
    result_title: text('.result h2'),
    session: [text('#sessionWins'), text('#sessionLosses'), text('#sessionDraws')],
    all_time: [text('#allTimeWins'), text('#allTimeLosses'), text('#allTimeDraws')],
};
";

const PWA_SHELL_JS: &str = r#"
const has = (sel) => document.querySelector(sel) !== null;
return {
    manifest: has('link[rel="manifest"]'),
    theme_color: has('meta[name="theme-color"]'),
    apple_capable: has('meta[name="apple-mobile-web-app-capable"]'),
    apple_touch_icon: has('link[rel="apple-touch-icon"]'),
    service_worker_api: 'serviceWorker' in navigator,
};
"#;

const STORAGE_DUMP_JS: &str = r"
const out = {};
for (let i = 0; i < localStorage.length; i++) {
    const key = localStorage.key(i);
    out[key] = localStorage.getItem(key);
}
return out;
";

const SW_REGISTERED_JS: &str = r"
const done = arguments[arguments.length - 1];
if (!('serviceWorker' in navigator)) { done(false); return; }
navigator.serviceWorker.getRegistration().then((reg) => done(!!reg), () => done(false));
";

/// What the page currently shows, read in a single round trip.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PageSnapshot {
    pub title: String,
    pub banner_shown: bool,
    pub overlay_display: Option<String>,
    pub body_theme: Option<String>,
    pub active_theme: Option<String>,
    pub stored_theme: Option<String>,
    pub stored_dismissal: Option<String>,
    pub player_choice: Option<String>,
    pub computer_choice: Option<String>,
    pub result_title: Option<String>,
    pub session: [Option<String>; 3],
    pub all_time: [Option<String>; 3],
}

impl PageSnapshot {
    #[must_use]
    pub fn overlay_visible(&self) -> bool {
        self.overlay_display.as_deref().is_some_and(|d| d != "none")
    }

    /// Sum of the three cells; unreadable cells count as zero.
    #[must_use]
    pub fn total(cells: &[Option<String>; 3]) -> u64 {
        cells
            .iter()
            .filter_map(|c| c.as_deref().and_then(|v| v.parse::<u64>().ok()))
            .sum()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct PwaShell {
    pub manifest: bool,
    pub theme_color: bool,
    pub apple_capable: bool,
    pub apple_touch_icon: bool,
    pub service_worker_api: bool,
}

#[derive(Debug, Clone)]
pub struct PageProbe<'a> {
    driver: &'a WebDriver,
}

impl<'a> PageProbe<'a> {
    pub const fn new(driver: &'a WebDriver) -> Self {
        Self { driver }
    }

    pub async fn snapshot(&self) -> Result<PageSnapshot> {
        let result = self.driver.execute(SNAPSHOT_JS, vec![]).await?;
        serde_json::from_value(result.json().clone()).context("parsing page snapshot")
    }

    pub async fn pwa_shell(&self) -> Result<PwaShell> {
        let result = self.driver.execute(PWA_SHELL_JS, vec![]).await?;
        serde_json::from_value(result.json().clone()).context("parsing PWA shell probe")
    }

    pub async fn service_worker_registered(&self) -> Result<bool> {
        let result = self.driver.execute_async(SW_REGISTERED_JS, vec![]).await?;
        Ok(result.json().as_bool().unwrap_or(false))
    }

    pub async fn set_storage(&self, key: &str, value: &str) -> Result<()> {
        self.driver
            .execute(
                "localStorage.setItem(arguments[0], arguments[1])",
                vec![key.into(), value.into()],
            )
            .await?;
        Ok(())
    }

    /// Every `localStorage` entry as a JSON object.
    pub async fn local_storage(&self) -> Result<serde_json::Value> {
        let result = self.driver.execute(STORAGE_DUMP_JS, vec![]).await?;
        Ok(result.json().clone())
    }

    pub async fn clear_storage(&self) -> Result<()> {
        self.driver.execute("localStorage.clear()", vec![]).await?;
        Ok(())
    }

    /// `Date.now()` in the page.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub async fn page_now(&self) -> Result<u64> {
        let result = self.driver.execute("return Date.now()", vec![]).await?;
        result
            .json()
            .as_f64()
            .map(|ms| ms as u64)
            .context("Date.now() returned a non-number")
    }

    pub async fn reload(&self) -> Result<()> {
        self.driver.refresh().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_total_ignores_blank_cells() {
        let cells = [Some("2".to_owned()), None, Some("x".to_owned())];
        assert_eq!(PageSnapshot::total(&cells), 2);
    }

    #[test]
    fn overlay_visibility_reads_computed_display() {
        let mut snap = PageSnapshot::default();
        assert!(!snap.overlay_visible());
        snap.overlay_display = Some("flex".to_owned());
        assert!(snap.overlay_visible());
        snap.overlay_display = Some("none".to_owned());
        assert!(!snap.overlay_visible());
    }
}
