use anyhow::{Result, ensure};
use std::time::Duration;
use thirtyfour::prelude::*;

use super::{BrowserScenario, CombinedScenario, LogicScenario, ScenarioCtx};

const TITLE: &str = "VERA'S ROCK PAPER SCISSORS BATTLE";

pub struct PwaShellScenario;

#[async_trait::async_trait]
impl BrowserScenario for PwaShellScenario {
    async fn run_browser(&self, driver: &WebDriver, ctx: &ScenarioCtx<'_>) -> Result<()> {
        driver.goto(&ctx.base_url).await?;
        let title = driver.title().await?;
        ensure!(title.contains(TITLE), "unexpected title {title:?}");

        let shell = ctx.probe.pwa_shell().await?;
        ensure!(shell.manifest, "manifest link missing");
        ensure!(shell.theme_color, "theme-color meta missing");
        ensure!(shell.apple_capable, "apple-mobile-web-app-capable meta missing");
        if !shell.apple_touch_icon {
            log::warn!("apple-touch-icon link missing");
        }
        ensure!(shell.service_worker_api, "browser lacks service worker support");

        tokio::time::sleep(Duration::from_secs(2)).await;
        ensure!(
            ctx.probe.service_worker_registered().await?,
            "service worker not registered"
        );
        if ctx.verbose {
            println!("  📦 Manifest, meta tags and service worker present");
        }
        Ok(())
    }
}

impl CombinedScenario for PwaShellScenario {
    fn as_logic_scenario(&self) -> Option<LogicScenario> {
        None
    }
}
