use anyhow::{Result, ensure};
use rand::Rng;
use std::time::Duration;
use thirtyfour::prelude::*;

use super::{
    BANNER_WAIT, BrowserScenario, CombinedScenario, LogicScenario, SETTLE, ScenarioCtx,
    fresh_page,
};
use crate::common::Device;
use crate::logic::PageHarness;
use rps_game::{HiddenReason, InstallEvent, InstallInstructions, InstallState, NativeChoice};

pub struct DesktopInstallScenario;

fn manual_fallback(device: Device, expected: InstallInstructions, seed: u64) -> Result<()> {
    let mut page = PageHarness::open(device, seed)?;
    page.advance(Duration::from_secs(10))?;
    ensure!(!page.host.banner, "{device:?}: banner without a native prompt");

    page.fire(InstallEvent::InstallClicked)?;
    ensure!(
        page.host.instructions == vec![expected],
        "{device:?}: expected {expected:?}, got {:?}",
        page.host.instructions
    );
    ensure!(
        page.install_state() == Some(InstallState::Hidden(HiddenReason::InstructionsShown)),
        "{device:?}: unexpected state {:?}",
        page.install_state()
    );
    ensure!(
        page.stored("installBannerDismissed").is_none(),
        "{device:?}: instructions must not record a dismissal"
    );
    Ok(())
}

fn native_prompt(seed: u64) -> Result<()> {
    let mut page = PageHarness::open(Device::Desktop, seed)?;
    let delay = page.rng().gen_range(0..5_000);
    page.advance(Duration::from_millis(delay))?;
    page.fire(InstallEvent::NativePromptCaptured)?;
    ensure!(page.host.banner, "captured prompt should show the banner");

    page.fire(InstallEvent::InstallClicked)?;
    ensure!(page.host.prompts_opened == 1, "native prompt not opened");
    ensure!(page.host.banner, "banner stays until the prompt is answered");
    page.fire(InstallEvent::InstallClicked)?;
    ensure!(page.host.prompts_opened == 1, "native prompt opened twice");

    let choice = if page.rng().gen_bool(0.5) {
        NativeChoice::Accepted
    } else {
        NativeChoice::Dismissed
    };
    page.fire(InstallEvent::NativePromptResolved(choice))?;
    ensure!(!page.host.banner, "banner should hide once answered");
    ensure!(
        page.install_state()
            == Some(InstallState::Hidden(HiddenReason::NativePromptResolved(
                choice
            ))),
        "unexpected state {:?}",
        page.install_state()
    );
    ensure!(
        page.host.instructions.is_empty(),
        "instructions shown alongside the prompt"
    );
    Ok(())
}

fn run_logic(seed: u64) -> Result<()> {
    manual_fallback(Device::Desktop, InstallInstructions::Desktop, seed)?;
    manual_fallback(Device::Android, InstallInstructions::Android, seed)?;
    native_prompt(seed)
}

#[async_trait::async_trait]
impl BrowserScenario for DesktopInstallScenario {
    async fn run_browser(&self, driver: &WebDriver, ctx: &ScenarioCtx<'_>) -> Result<()> {
        fresh_page(driver, ctx).await?;
        tokio::time::sleep(BANNER_WAIT).await;
        let settled = ctx.probe.snapshot().await?;
        ensure!(!settled.overlay_visible(), "overlay shown on desktop");

        if settled.banner_shown {
            // The browser offered a native prompt; that path needs a real user gesture.
            if ctx.verbose {
                println!("  🖥️  Native install prompt available; skipping manual fallback");
            }
            return Ok(());
        }

        driver
            .execute("document.getElementById('installBtn').click()", vec![])
            .await?;
        tokio::time::sleep(SETTLE).await;
        let text = driver.get_alert_text().await?;
        ensure!(
            text.to_lowercase().contains("install"),
            "unexpected instructions: {text:?}"
        );
        driver.accept_alert().await?;

        let after = ctx.probe.snapshot().await?;
        ensure!(!after.banner_shown && !after.overlay_visible(), "install UI still visible");
        ensure!(
            after.stored_dismissal.is_none(),
            "instructions wrote a dismissal"
        );
        Ok(())
    }

    fn device(&self) -> Option<Device> {
        Some(Device::Desktop)
    }
}

impl CombinedScenario for DesktopInstallScenario {
    fn as_logic_scenario(&self) -> Option<LogicScenario> {
        Some(LogicScenario {
            name: "Desktop Native Prompt and Manual Instructions",
            run: run_logic,
        })
    }
}
