use anyhow::{Context, Result, ensure};
use std::time::Duration;
use thirtyfour::prelude::*;

use super::{
    BANNER_WAIT, BrowserScenario, CombinedScenario, LogicScenario, SETTLE, ScenarioCtx,
    fresh_page, wait_for,
};
use crate::common::Device;
use crate::logic::PageHarness;
use rps_game::{HiddenReason, InstallEvent, InstallState, Timestamp};

const DISMISSAL_KEY: &str = "installBannerDismissed";
const WEEK: Duration = Duration::from_secs(7 * 24 * 60 * 60);

pub struct InstallBannerScenario;

fn run_logic(seed: u64) -> Result<()> {
    let mut page = PageHarness::open(Device::Desktop, seed)?;
    ensure!(!page.host.banner, "banner must start hidden");

    page.fire(InstallEvent::NativePromptCaptured)?;
    ensure!(page.host.banner, "captured prompt should show the banner");

    page.advance(Duration::from_millis(seed % 5_000))?;
    let dismissed_at = page.now();
    page.fire(InstallEvent::DismissClicked)?;
    ensure!(!page.host.banner, "dismiss should hide the banner");
    let stored = page.stored(DISMISSAL_KEY).context("dismissal not stored")?;
    ensure!(
        Timestamp::parse_millis(&stored) == Some(dismissed_at),
        "stored dismissal {stored} != {dismissed_at}"
    );

    let mut page = page.reload()?;
    page.fire(InstallEvent::NativePromptCaptured)?;
    ensure!(!page.host.banner, "banner reappeared right after dismissal");
    ensure!(
        page.install_state()
            == Some(InstallState::Hidden(HiddenReason::DismissedUntil(
                dismissed_at.saturating_add(WEEK)
            ))),
        "unexpected state {:?}",
        page.install_state()
    );
    Ok(())
}

#[async_trait::async_trait]
impl BrowserScenario for InstallBannerScenario {
    async fn run_browser(&self, driver: &WebDriver, ctx: &ScenarioCtx<'_>) -> Result<()> {
        fresh_page(driver, ctx).await?;
        driver.find(By::Id("installBanner")).await?;

        let initial = ctx.probe.snapshot().await?;
        ensure!(!initial.banner_shown, "banner visible right after load");

        let shown = wait_for(&ctx.probe, BANNER_WAIT, |s| s.banner_shown).await?;
        ensure!(shown.banner_shown, "banner never appeared");
        if ctx.verbose {
            println!("  📣 Banner shown");
        }

        driver.find(By::Id("dismissBtn")).await?.click().await?;
        tokio::time::sleep(SETTLE).await;
        let dismissed = ctx.probe.snapshot().await?;
        ensure!(!dismissed.banner_shown, "dismiss did not hide the banner");
        let stored = dismissed
            .stored_dismissal
            .context("dismissal not stored in localStorage")?;
        ensure!(
            Timestamp::parse_millis(&stored).is_some(),
            "dismissal {stored:?} is not a millisecond timestamp"
        );

        ctx.probe.reload().await?;
        tokio::time::sleep(BANNER_WAIT).await;
        let reloaded = ctx.probe.snapshot().await?;
        ensure!(!reloaded.banner_shown, "banner returned within the cooldown");
        Ok(())
    }

    fn device(&self) -> Option<Device> {
        Some(Device::Iphone)
    }
}

impl CombinedScenario for InstallBannerScenario {
    fn as_logic_scenario(&self) -> Option<LogicScenario> {
        Some(LogicScenario {
            name: "Install Banner Show and Dismiss",
            run: run_logic,
        })
    }
}
