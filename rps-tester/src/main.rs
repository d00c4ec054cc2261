mod browser;
mod common;
mod logic;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

use browser::{BrowserConfig, BrowserKind, PageProbe, new_session};
use common::scenario::{
    BrowserScenario, CombinedScenario, SMOKE_SCENARIOS, ScenarioCtx, get_scenario,
    list_scenarios,
};
use common::{Device, artifacts_dir, capture_artifacts, split_csv};
use logic::LogicTester;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TestMode {
    /// Engagement logic against in-memory fakes (fast, no browser)
    Logic,
    /// Browser automation against a served page (slow, captures screenshots)
    Browser,
    /// Run both logic and browser tests
    Both,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum HeadlessMode {
    /// Run browsers in headless mode
    Headless,
    /// Run browsers with visible windows
    Windowed,
}

impl HeadlessMode {
    const fn is_headless(self) -> bool {
        matches!(self, Self::Headless)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Console,
    Json,
    Markdown,
}

#[derive(Debug, Parser)]
#[command(name = "rps-tester", version = "0.1.0")]
#[command(about = "Automated QA for Vera's Rock Paper Scissors Battle")]
struct Args {
    /// Test mode: logic (fast), browser (visual), or both
    #[arg(long, value_enum, default_value_t = TestMode::Logic)]
    mode: TestMode,

    /// Scenarios to run (comma-separated; `smoke` expands to every logic scenario, `all` adds
    /// browser-only ones)
    #[arg(long, default_value = "smoke")]
    scenarios: String,

    /// List all available scenarios and exit
    #[arg(long)]
    list_scenarios: bool,

    /// Seeds to run (comma-separated)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Number of iterations per scenario and seed (logic mode only)
    #[arg(long, default_value_t = 10)]
    iterations: usize,

    /// Output report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    // Browser-specific options
    /// Browsers to run (chrome,edge,firefox,safari) - browser mode only
    #[arg(long, default_value = "chrome")]
    browsers: String,

    /// Device to emulate when a scenario does not pin one
    #[arg(long, value_enum, default_value_t = Device::Desktop)]
    device: Device,

    /// Base URL of the served game page
    #[arg(long, default_value = "http://localhost:8080/")]
    base_url: String,

    /// Artifacts directory for screenshots and logs
    #[arg(long, default_value = "target/test-artifacts")]
    artifacts_dir: String,

    /// Connect to a Selenium Grid/Appium hub instead of local drivers
    #[arg(long)]
    hub: Option<String>,

    /// Run headless where supported
    #[arg(long, value_enum, default_value_t = HeadlessMode::Headless)]
    headless: HeadlessMode,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    if maybe_list_scenarios(&args)? {
        return Ok(());
    }

    announce_banner();

    let start_time = Instant::now();
    let scenarios = expand_scenarios(&args.scenarios);
    let seeds = parse_seeds(&args.seeds)?;

    let results = run_logic_scenarios(&args, &scenarios, &seeds);
    let browser_failures = run_browser_scenarios(&args, &scenarios).await?;

    write_reports(&args, &results, start_time)?;

    if results.iter().any(|r| !r.passed) || browser_failures > 0 {
        std::process::exit(1);
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let env = env_logger::Env::default().default_filter_or(default_level);
    let _ = env_logger::Builder::from_env(env).try_init();
}

fn maybe_list_scenarios(args: &Args) -> Result<bool> {
    if !args.list_scenarios {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available scenarios:")?;
    for (key, description) in list_scenarios() {
        writeln!(output_target.writer(), "  {key:20} - {description}")?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn announce_banner() {
    println!("{}", "✊✋✌️  RPS Battle Automated Tester".bright_cyan().bold());
    println!("{}", "==================================".cyan());
}

fn expand_scenarios(scenarios_arg: &str) -> Vec<String> {
    let mut expanded: Vec<String> = Vec::new();
    for token in split_csv(scenarios_arg) {
        let names: Vec<String> = match token.to_lowercase().as_str() {
            "smoke" => SMOKE_SCENARIOS.iter().map(ToString::to_string).collect(),
            "all" => list_scenarios()
                .into_iter()
                .map(|(key, _)| key.to_string())
                .filter(|key| key != "smoke")
                .collect(),
            _ => vec![token],
        };
        for name in names {
            if !expanded.contains(&name) {
                expanded.push(name);
            }
        }
    }
    expanded
}

fn parse_seeds(seeds_arg: &str) -> Result<Vec<u64>> {
    split_csv(seeds_arg)
        .iter()
        .map(|s| s.parse::<u64>().with_context(|| format!("invalid seed {s:?}")))
        .collect()
}

fn parse_browser_kind(name: &str) -> Option<BrowserKind> {
    match name {
        "chrome" => Some(BrowserKind::Chrome),
        "edge" => Some(BrowserKind::Edge),
        "firefox" => Some(BrowserKind::Firefox),
        "safari" => Some(BrowserKind::Safari),
        _ => None,
    }
}

fn build_browser_config(args: &Args) -> BrowserConfig {
    BrowserConfig {
        headless: args.headless.is_headless(),
        implicit_wait_secs: 3,
        remote_hub: args.hub.clone(),
    }
}

fn browser_label(kind: BrowserKind) -> String {
    format!("{kind:?}").to_lowercase()
}

fn scenario_artifacts_dir(
    args: &Args,
    kind: BrowserKind,
    scenario: &str,
    device: Device,
) -> String {
    let label = browser_label(kind);
    artifacts_dir(&args.artifacts_dir, &label, scenario, device.label())
}

fn run_logic_scenarios(
    args: &Args,
    scenarios: &[String],
    seeds: &[u64],
) -> Vec<logic::ScenarioResult> {
    let mut results: Vec<logic::ScenarioResult> = Vec::new();
    if !matches!(args.mode, TestMode::Logic | TestMode::Both) {
        return results;
    }

    println!("{}", "🧠 Running Logic Tests".bright_yellow().bold());
    println!("{}", "-".repeat(30).yellow());

    let logic_tester = LogicTester::new(args.verbose);

    for scenario_name in scenarios {
        if let Some(combined_scenario) = get_scenario(scenario_name) {
            if let Some(logic_scenario) = combined_scenario.as_logic_scenario() {
                results.extend(logic_tester.run_scenario(&logic_scenario, seeds, args.iterations));
            } else {
                eprintln!(
                    "⚠️  Scenario {} has no logic test implementation",
                    scenario_name.yellow()
                );
            }
        } else {
            eprintln!("⚠️  Unknown scenario: {}", scenario_name.yellow());
        }
    }

    results
}

/// Run each scenario in its own session so storage never leaks between them. Returns the
/// number of failed scenario runs.
async fn run_browser_scenarios(args: &Args, scenarios: &[String]) -> Result<usize> {
    if !matches!(args.mode, TestMode::Browser | TestMode::Both) {
        return Ok(0);
    }

    println!("{}", "🌐 Running Browser Tests".bright_blue().bold());
    println!("{}", "-".repeat(30).blue());

    let cfg = build_browser_config(args);
    let mut failures = 0;

    for browser_name in split_csv(&args.browsers) {
        let Some(kind) = parse_browser_kind(&browser_name) else {
            eprintln!("⚠️  Unknown browser: {}", browser_name.yellow());
            continue;
        };

        for scenario_name in scenarios {
            let Some(scenario) = get_scenario(scenario_name) else {
                eprintln!("⚠️  Unknown scenario: {}", scenario_name.yellow());
                continue;
            };
            let device = scenario.device().unwrap_or(args.device);

            let driver = match new_session(kind, device, &cfg).await {
                Ok(d) => d,
                Err(e) => {
                    eprintln!("❌ Could not start {kind:?}: {e}");
                    failures += 1;
                    continue;
                }
            };

            let scenario = scenario.as_ref();
            let passed =
                run_browser_scenario(args, kind, device, scenario_name, scenario, &driver).await;
            if !passed {
                failures += 1;
            }
            let _ = driver.quit().await;
        }
    }

    Ok(failures)
}

async fn run_browser_scenario(
    args: &Args,
    kind: BrowserKind,
    device: Device,
    scenario_name: &str,
    scenario: &(dyn CombinedScenario + Send + Sync),
    driver: &thirtyfour::WebDriver,
) -> bool {
    let ctx = ScenarioCtx {
        base_url: args.base_url.clone(),
        device,
        probe: PageProbe::new(driver),
        verbose: args.verbose,
    };
    let label = format!("{} {}", browser_label(kind), device.label());

    let scenario_start = Instant::now();
    match scenario.run_browser(driver, &ctx).await {
        Ok(()) => {
            println!(
                "✅ [{}] {} - {:?}",
                label.green(),
                scenario_name,
                scenario_start.elapsed()
            );
            true
        }
        Err(e) => {
            eprintln!(
                "❌ [{}] {} - {:?}: {:#}",
                label.red(),
                scenario_name,
                scenario_start.elapsed(),
                e
            );
            let dir = scenario_artifacts_dir(args, kind, scenario_name, device);
            if let Err(capture_err) = capture_artifacts(driver, &dir, &e).await {
                log::warn!("artifact capture failed: {capture_err:#}");
            }
            false
        }
    }
}

fn write_reports(
    args: &Args,
    results: &[logic::ScenarioResult],
    start_time: Instant,
) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report {
        ReportFormat::Json => {
            if results.is_empty() {
                writeln!(&mut output_target, "[]")?;
            } else {
                logic::reports::generate_json_report(&mut output_target, results)?;
            }
        }
        ReportFormat::Markdown => {
            if results.is_empty() {
                writeln!(
                    &mut output_target,
                    "# RPS Battle Logic Test Results\n\n_No scenarios executed._"
                )?;
            } else {
                logic::reports::generate_markdown_report(&mut output_target, results)?;
            }
        }
        ReportFormat::Console => {
            if results.is_empty() {
                writeln!(&mut output_target, "No logic scenarios executed.")?;
            } else {
                logic::reports::generate_console_report(
                    &mut output_target,
                    results,
                    start_time.elapsed(),
                )?;
            }
            writeln!(&mut output_target)?;
            writeln!(&mut output_target, "🏁 Total time: {:?}", start_time.elapsed())?;
        }
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}
