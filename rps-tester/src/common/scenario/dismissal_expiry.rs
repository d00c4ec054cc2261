use anyhow::{Result, ensure};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::time::Duration;
use thirtyfour::prelude::*;

use super::{
    BANNER_WAIT, BrowserScenario, CombinedScenario, LogicScenario, ScenarioCtx, fresh_page,
    wait_for,
};
use crate::common::Device;
use crate::logic::PageHarness;
use crate::logic::harness::START;
use rps_game::InstallEvent;

const DISMISSAL_KEY: &str = "installBannerDismissed";
const DAY_MS: u64 = 24 * 60 * 60 * 1000;
const WEEK_MS: u64 = 7 * DAY_MS;

pub struct DismissalExpiryScenario;

/// Load a desktop page whose stored dismissal is `age_ms` old and report whether a captured
/// prompt shows the banner.
fn banner_after(age_ms: u64, seed: u64) -> Result<bool> {
    let mut page = PageHarness::open(Device::Desktop, seed)?;
    let dismissed_at = START.as_millis().saturating_sub(age_ms);
    page.backend.insert_raw(DISMISSAL_KEY, &dismissed_at.to_string());
    let mut page = page.reload()?;
    page.fire(InstallEvent::NativePromptCaptured)?;
    Ok(page.host.banner)
}

fn run_logic(seed: u64) -> Result<()> {
    for (age_ms, expect_banner) in [
        (0, false),
        (DAY_MS, false),
        (WEEK_MS - 1, false),
        (WEEK_MS, true),
        (WEEK_MS + DAY_MS, true),
    ] {
        let shown = banner_after(age_ms, seed)?;
        ensure!(
            shown == expect_banner,
            "dismissal aged {age_ms}ms: banner shown = {shown}"
        );
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let age_ms = rng.gen_range(0..2 * WEEK_MS);
    let shown = banner_after(age_ms, seed)?;
    ensure!(
        shown == (age_ms >= WEEK_MS),
        "random dismissal aged {age_ms}ms: banner shown = {shown}"
    );

    let mut page = PageHarness::open(Device::Desktop, seed)?;
    page.backend.insert_raw(DISMISSAL_KEY, "not-a-timestamp");
    let mut page = page.reload()?;
    page.fire(InstallEvent::NativePromptCaptured)?;
    ensure!(page.host.banner, "unreadable dismissal should count as absent");
    Ok(())
}

#[async_trait::async_trait]
impl BrowserScenario for DismissalExpiryScenario {
    async fn run_browser(&self, driver: &WebDriver, ctx: &ScenarioCtx<'_>) -> Result<()> {
        fresh_page(driver, ctx).await?;

        let now = ctx.probe.page_now().await?;
        let expired = now.saturating_sub(WEEK_MS + DAY_MS);
        ctx.probe.set_storage(DISMISSAL_KEY, &expired.to_string()).await?;
        ctx.probe.reload().await?;
        let shown = wait_for(&ctx.probe, BANNER_WAIT, |s| s.banner_shown).await?;
        ensure!(shown.banner_shown, "expired dismissal still suppresses the banner");

        let recent = now.saturating_sub(DAY_MS);
        ctx.probe.set_storage(DISMISSAL_KEY, &recent.to_string()).await?;
        ctx.probe.reload().await?;
        tokio::time::sleep(BANNER_WAIT).await;
        let hidden = ctx.probe.snapshot().await?;
        ensure!(!hidden.banner_shown, "recent dismissal did not suppress the banner");
        if ctx.verbose {
            println!("  ⏳ Expired and recent dismissals behave");
        }
        Ok(())
    }

    fn device(&self) -> Option<Device> {
        Some(Device::Iphone)
    }
}

impl CombinedScenario for DismissalExpiryScenario {
    fn as_logic_scenario(&self) -> Option<LogicScenario> {
        Some(LogicScenario {
            name: "Seven-Day Dismissal Expiry",
            run: run_logic,
        })
    }
}
