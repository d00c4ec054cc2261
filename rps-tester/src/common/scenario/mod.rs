use anyhow::Result;
use std::time::{Duration, Instant};
use thirtyfour::prelude::*;

use crate::browser::{PageProbe, PageSnapshot};
use crate::common::Device;

pub mod desktop_install;
pub mod dismissal_expiry;
pub mod install_banner;
pub mod ios_overlay;
pub mod pwa_shell;
pub mod scoring;
pub mod themes;

/// Scenarios with a logic implementation, in the order `smoke` runs them.
pub const SMOKE_SCENARIOS: [&str; 6] = [
    "install-banner",
    "ios-overlay",
    "desktop-install",
    "dismissal-expiry",
    "themes",
    "scoring",
];

/// How long the page gets to settle after a load or click.
pub const SETTLE: Duration = Duration::from_millis(500);
/// Comfortably past the iOS banner delay.
pub const BANNER_WAIT: Duration = Duration::from_millis(4500);

#[derive(Debug, Clone)]
pub struct ScenarioCtx<'a> {
    pub base_url: String,
    pub device: Device,
    pub probe: PageProbe<'a>,
    pub verbose: bool,
}

// Logic test scenario
#[derive(Debug, Clone, Copy)]
pub struct LogicScenario {
    pub name: &'static str,
    pub run: fn(u64) -> Result<()>,
}

// Browser test scenario
#[async_trait::async_trait]
pub trait BrowserScenario {
    async fn run_browser(&self, driver: &WebDriver, ctx: &ScenarioCtx<'_>) -> Result<()>;

    /// Device this scenario must run on, overriding `--device`.
    fn device(&self) -> Option<Device> {
        None
    }
}

// Combined scenario that can run both logic and browser tests
pub trait CombinedScenario: BrowserScenario {
    fn as_logic_scenario(&self) -> Option<LogicScenario>;
}

/// Load the page with empty storage.
pub async fn fresh_page(driver: &WebDriver, ctx: &ScenarioCtx<'_>) -> Result<()> {
    driver.goto(&ctx.base_url).await?;
    ctx.probe.clear_storage().await?;
    ctx.probe.reload().await?;
    tokio::time::sleep(SETTLE).await;
    Ok(())
}

/// Poll until `done` holds or `timeout` passes; returns the last snapshot either way.
pub async fn wait_for(
    probe: &PageProbe<'_>,
    timeout: Duration,
    done: impl Fn(&PageSnapshot) -> bool + Send,
) -> Result<PageSnapshot> {
    let deadline = Instant::now() + timeout;
    loop {
        let snapshot = probe.snapshot().await?;
        if done(&snapshot) || Instant::now() >= deadline {
            return Ok(snapshot);
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
}

pub fn get_scenario(name: &str) -> Option<Box<dyn CombinedScenario + Send + Sync>> {
    match name.to_lowercase().as_str() {
        "install-banner" | "banner" => Some(Box::new(install_banner::InstallBannerScenario)),
        "ios-overlay" | "ios" => Some(Box::new(ios_overlay::IosOverlayScenario)),
        "desktop-install" | "desktop" => Some(Box::new(desktop_install::DesktopInstallScenario)),
        "dismissal-expiry" | "expiry" => {
            Some(Box::new(dismissal_expiry::DismissalExpiryScenario))
        }
        "themes" | "theme" => Some(Box::new(themes::ThemesScenario)),
        "scoring" | "scores" => Some(Box::new(scoring::ScoringScenario)),
        "pwa-shell" | "pwa" => Some(Box::new(pwa_shell::PwaShellScenario)),
        _ => None,
    }
}

pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    vec![
        ("smoke", "Every scenario with a logic implementation"),
        ("install-banner", "Install Banner Show and Dismiss"),
        ("ios-overlay", "iOS Install Overlay"),
        ("desktop-install", "Desktop Native Prompt and Manual Instructions"),
        ("dismissal-expiry", "Seven-Day Dismissal Expiry"),
        ("themes", "Theme Switching and Persistence"),
        ("scoring", "Session and All-Time Scores"),
        ("pwa-shell", "PWA Shell Metadata and Service Worker (browser only)"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_scenario_resolves() {
        for (key, _) in list_scenarios() {
            if key == "smoke" {
                continue;
            }
            assert!(get_scenario(key).is_some(), "{key} should resolve");
        }
        assert!(get_scenario("unknown").is_none());
    }

    #[test]
    fn smoke_scenarios_all_have_logic() {
        for key in SMOKE_SCENARIOS {
            let scenario = get_scenario(key).expect("known scenario");
            assert!(scenario.as_logic_scenario().is_some(), "{key}");
        }
        assert!(
            get_scenario("pwa-shell")
                .expect("known scenario")
                .as_logic_scenario()
                .is_none()
        );
    }

    #[test]
    fn smoke_logic_scenarios_pass() {
        for key in SMOKE_SCENARIOS {
            let logic = get_scenario(key)
                .and_then(|s| s.as_logic_scenario())
                .expect("logic scenario");
            for seed in [1, 42, 1337] {
                if let Err(err) = (logic.run)(seed) {
                    panic!("{key} seed {seed}: {err:#}");
                }
            }
        }
    }
}
