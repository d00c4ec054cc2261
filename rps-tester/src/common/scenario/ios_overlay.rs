use anyhow::{Result, ensure};
use std::time::Duration;
use thirtyfour::prelude::*;

use super::{
    BANNER_WAIT, BrowserScenario, CombinedScenario, LogicScenario, SETTLE, ScenarioCtx,
    fresh_page, wait_for,
};
use crate::common::Device;
use crate::logic::PageHarness;
use rps_game::{HiddenReason, InstallEvent, InstallState};

const IOS_DELAY: Duration = Duration::from_secs(3);

pub struct IosOverlayScenario;

fn run_logic(seed: u64) -> Result<()> {
    let mut page = PageHarness::open(Device::Iphone, seed)?;
    page.advance(IOS_DELAY - Duration::from_millis(1 + seed % 1_000))?;
    ensure!(!page.host.banner, "banner shown before the iOS delay");
    page.advance(Duration::from_millis(1_000))?;
    ensure!(page.host.banner, "banner missing after the iOS delay");

    page.fire(InstallEvent::InstallClicked)?;
    ensure!(page.host.overlay, "install click should open the overlay");
    ensure!(!page.host.banner, "banner must hide while the overlay is up");
    ensure!(page.host.prompts_opened == 0, "iOS has no native prompt");

    page.fire(InstallEvent::DismissClicked)?;
    ensure!(page.host.overlay, "dismiss has no effect on the overlay");

    page.fire(InstallEvent::OverlayClosed)?;
    ensure!(!page.host.overlay && !page.host.banner, "everything hidden after close");
    ensure!(
        page.install_state() == Some(InstallState::Hidden(HiddenReason::OverlayClosed)),
        "unexpected state {:?}",
        page.install_state()
    );
    ensure!(
        page.stored("installBannerDismissed").is_none(),
        "closing the overlay must not record a dismissal"
    );

    let mut page = page.reload()?;
    page.advance(IOS_DELAY)?;
    ensure!(page.host.banner, "banner should be back on the next load");
    Ok(())
}

#[async_trait::async_trait]
impl BrowserScenario for IosOverlayScenario {
    async fn run_browser(&self, driver: &WebDriver, ctx: &ScenarioCtx<'_>) -> Result<()> {
        fresh_page(driver, ctx).await?;

        let initial = ctx.probe.snapshot().await?;
        ensure!(initial.overlay_display.is_some(), "overlay markup missing");
        ensure!(!initial.overlay_visible(), "overlay visible on load");

        let shown = wait_for(&ctx.probe, BANNER_WAIT, |s| s.banner_shown).await?;
        ensure!(shown.banner_shown, "banner never appeared on iPhone");

        driver.find(By::Id("installBtn")).await?.click().await?;
        tokio::time::sleep(SETTLE).await;
        let open = ctx.probe.snapshot().await?;
        ensure!(open.overlay_visible(), "overlay did not open");
        ensure!(!open.banner_shown, "banner still visible with overlay open");

        driver
            .find(By::Css(".ios-close-btn"))
            .await?
            .click()
            .await?;
        tokio::time::sleep(SETTLE).await;
        let closed = ctx.probe.snapshot().await?;
        ensure!(!closed.overlay_visible(), "overlay did not close");
        ensure!(
            closed.stored_dismissal.is_none(),
            "closing the overlay wrote a dismissal"
        );
        if ctx.verbose {
            println!("  📱 Overlay opened and closed");
        }
        Ok(())
    }

    fn device(&self) -> Option<Device> {
        Some(Device::Iphone)
    }
}

impl CombinedScenario for IosOverlayScenario {
    fn as_logic_scenario(&self) -> Option<LogicScenario> {
        Some(LogicScenario {
            name: "iOS Install Overlay",
            run: run_logic,
        })
    }
}
