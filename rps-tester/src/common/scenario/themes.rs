use anyhow::{Result, ensure};
use thirtyfour::prelude::*;

use super::{BrowserScenario, CombinedScenario, LogicScenario, SETTLE, ScenarioCtx, fresh_page};
use crate::browser::PageSnapshot;
use crate::common::Device;
use crate::logic::PageHarness;
use rps_game::Theme;

pub struct ThemesScenario;

fn run_logic(seed: u64) -> Result<()> {
    let mut page = PageHarness::open(Device::Desktop, seed)?;
    ensure!(page.theme() == Theme::Brutalist, "default theme should be brutalist");
    ensure!(
        page.body.theme == Some(Theme::Brutalist),
        "default theme not applied on load"
    );

    for theme in [Theme::Y2k, Theme::Neon] {
        ensure!(page.select_theme(theme.as_str()) == Some(theme), "{theme} rejected");
        ensure!(page.body.theme == Some(theme), "{theme} not applied");
        ensure!(
            page.stored("theme").as_deref() == Some(theme.as_str()),
            "{theme} not persisted"
        );
    }

    ensure!(page.select_theme("vaporwave").is_none(), "unknown theme accepted");
    ensure!(
        page.stored("theme").as_deref() == Some("neon"),
        "unknown theme changed storage"
    );

    let page = page.reload()?;
    ensure!(page.theme() == Theme::Neon, "theme lost on reload");
    ensure!(page.body.theme == Some(Theme::Neon), "stored theme not applied on reload");
    Ok(())
}

fn check_theme(snapshot: &PageSnapshot, theme: Theme) -> Result<()> {
    let expected = Some(theme.as_str());
    ensure!(
        snapshot.body_theme.as_deref() == expected,
        "body data-theme {:?}, want {theme}",
        snapshot.body_theme
    );
    ensure!(
        snapshot.active_theme.as_deref() == expected,
        "active button {:?}, want {theme}",
        snapshot.active_theme
    );
    Ok(())
}

#[async_trait::async_trait]
impl BrowserScenario for ThemesScenario {
    async fn run_browser(&self, driver: &WebDriver, ctx: &ScenarioCtx<'_>) -> Result<()> {
        fresh_page(driver, ctx).await?;
        check_theme(&ctx.probe.snapshot().await?, Theme::Brutalist)?;

        for theme in [Theme::Y2k, Theme::Neon] {
            let selector = format!("button[data-theme=\"{}\"]", theme.as_str());
            driver.find(By::Css(&selector)).await?.click().await?;
            tokio::time::sleep(SETTLE).await;
            let snapshot = ctx.probe.snapshot().await?;
            check_theme(&snapshot, theme)?;
            ensure!(
                snapshot.stored_theme.as_deref() == Some(theme.as_str()),
                "{theme} not persisted"
            );
            if ctx.verbose {
                println!("  🎨 Switched to {}", theme.label());
            }
        }

        ctx.probe.reload().await?;
        tokio::time::sleep(SETTLE).await;
        check_theme(&ctx.probe.snapshot().await?, Theme::Neon)?;
        Ok(())
    }
}

impl CombinedScenario for ThemesScenario {
    fn as_logic_scenario(&self) -> Option<LogicScenario> {
        Some(LogicScenario {
            name: "Theme Switching and Persistence",
            run: run_logic,
        })
    }
}
