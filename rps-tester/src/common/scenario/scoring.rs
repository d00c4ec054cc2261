use anyhow::{Result, ensure};
use rand::Rng;
use thirtyfour::prelude::*;

use super::{BrowserScenario, CombinedScenario, LogicScenario, SETTLE, ScenarioCtx, fresh_page};
use crate::browser::PageSnapshot;
use crate::common::Device;
use crate::logic::PageHarness;
use rps_game::{Move, Outcome, Tally};

const PLACEHOLDER: &str = "❓";
const READY_TITLE: &str = "READY TO BATTLE";

pub struct ScoringScenario;

fn play_rounds(page: &mut PageHarness, rounds: u64) -> Result<()> {
    for _ in 0..rounds {
        let mv = Move::random(page.rng());
        let before = page.scores();
        let (round, after) = page.play(mv);
        ensure!(round.player == mv, "played {mv} but recorded {}", round.player);
        ensure!(
            round.outcome == mv.against(round.computer),
            "{round:?} resolved wrongly"
        );
        ensure!(
            after.session.total() == before.session.total() + 1,
            "session total did not advance by one"
        );
        ensure!(
            after.all_time.total() == before.all_time.total() + 1,
            "all-time total did not advance by one"
        );
        ensure!(
            after.all_time.count(round.outcome) == before.all_time.count(round.outcome) + 1,
            "{:?} not counted",
            round.outcome
        );
    }
    Ok(())
}

fn run_logic(seed: u64) -> Result<()> {
    let mut page = PageHarness::open(Device::Desktop, seed)?;
    let rounds = page.rng().gen_range(1..=20_u64);
    play_rounds(&mut page, rounds)?;
    let first = page.scores();
    ensure!(
        first.session.total() == rounds,
        "session total {} after {rounds} rounds",
        first.session.total()
    );

    let mut page = page.reload()?;
    ensure!(page.scores().session == Tally::default(), "session survived reload");
    ensure!(page.scores().all_time == first.all_time, "all-time lost on reload");

    play_rounds(&mut page, 5)?;
    ensure!(
        page.scores().all_time.total() == first.all_time.total() + 5,
        "all-time should grow by the new rounds"
    );
    ensure!(
        [Outcome::Win, Outcome::Loss, Outcome::Draw]
            .iter()
            .all(|&o| page.scores().all_time.count(o) >= first.all_time.count(o)),
        "an all-time counter went down"
    );
    Ok(())
}

fn check_played(snapshot: &PageSnapshot, session: u64, all_time: u64) -> Result<()> {
    ensure!(
        snapshot.player_choice.as_deref() != Some(PLACEHOLDER),
        "player choice not shown"
    );
    ensure!(
        snapshot.computer_choice.as_deref() != Some(PLACEHOLDER),
        "computer choice not shown"
    );
    ensure!(
        snapshot.result_title.as_deref() != Some(READY_TITLE),
        "result not shown"
    );
    ensure!(
        PageSnapshot::total(&snapshot.session) == session,
        "session total {:?}, want {session}",
        snapshot.session
    );
    ensure!(
        PageSnapshot::total(&snapshot.all_time) == all_time,
        "all-time total {:?}, want {all_time}",
        snapshot.all_time
    );
    Ok(())
}

#[async_trait::async_trait]
impl BrowserScenario for ScoringScenario {
    async fn run_browser(&self, driver: &WebDriver, ctx: &ScenarioCtx<'_>) -> Result<()> {
        fresh_page(driver, ctx).await?;
        let buttons = driver.find_all(By::Css(".game-buttons button")).await?;
        ensure!(buttons.len() == 3, "expected 3 game buttons, found {}", buttons.len());
        let boxes = driver.find_all(By::Css(".score-box")).await?;
        ensure!(boxes.len() == 2, "expected 2 score boxes, found {}", boxes.len());

        let initial = ctx.probe.snapshot().await?;
        ensure!(
            PageSnapshot::total(&initial.session) == 0,
            "session scores not zero on a fresh page"
        );

        let mut played = 0;
        for button in &buttons {
            button.click().await?;
            tokio::time::sleep(SETTLE).await;
            played += 1;
            check_played(&ctx.probe.snapshot().await?, played, played)?;
        }

        ctx.probe.reload().await?;
        tokio::time::sleep(SETTLE).await;
        let reloaded = ctx.probe.snapshot().await?;
        ensure!(
            PageSnapshot::total(&reloaded.session) == 0,
            "session scores survived reload"
        );
        ensure!(
            PageSnapshot::total(&reloaded.all_time) == 3,
            "all-time scores lost on reload"
        );
        Ok(())
    }
}

impl CombinedScenario for ScoringScenario {
    fn as_logic_scenario(&self) -> Option<LogicScenario> {
        Some(LogicScenario {
            name: "Session and All-Time Scores",
            run: run_logic,
        })
    }
}
