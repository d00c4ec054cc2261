use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use std::{fs, path::Path};
use thirtyfour::prelude::*;

use crate::browser::{PageProbe, PageSnapshot};

pub fn artifacts_dir(base: &str, browser: &str, scenario: &str, device: &str) -> String {
    let ts = Utc::now().format("%Y%m%dT%H%M%S");
    format!("{base}/{browser}/{scenario}/{device}/{ts}")
}

/// Everything kept from a failed browser scenario.
#[derive(Debug, Default)]
pub struct Artifacts {
    pub screenshot: Option<Vec<u8>>,
    pub dom: Option<String>,
    pub local_storage: Option<serde_json::Value>,
    pub page: Option<PageSnapshot>,
    pub error_chain: String,
}

impl Artifacts {
    /// Gather what the browser can still give us. Each piece is optional: a crashed page may
    /// answer some calls and not others.
    pub async fn collect(driver: &WebDriver, err: &anyhow::Error) -> Self {
        let probe = PageProbe::new(driver);
        Self {
            screenshot: driver.screenshot_as_png().await.ok(),
            dom: driver.source().await.ok(),
            local_storage: probe.local_storage().await.ok(),
            page: probe.snapshot().await.ok(),
            error_chain: format!("{err:#}"),
        }
    }

    /// Write the collected pieces under `dir` and return the file names written.
    pub fn write_to(&self, dir: &Path) -> Result<Vec<&'static str>> {
        fs::create_dir_all(dir).context("creating artifacts dir")?;
        let mut written = Vec::new();
        let mut put = |name: &'static str, bytes: &[u8]| match fs::write(dir.join(name), bytes) {
            Ok(()) => written.push(name),
            Err(e) => log::warn!("could not write {name}: {e}"),
        };

        if let Some(png) = &self.screenshot {
            put("screenshot.png", png);
        }
        if let Some(dom) = &self.dom {
            put("dom.html", dom.as_bytes());
        }
        if let Some(storage) = &self.local_storage {
            put("local-storage.json", &pretty(storage));
        }
        if let Some(page) = &self.page {
            put("page.json", &pretty(page));
        }
        put("error.txt", self.error_chain.as_bytes());

        Ok(written)
    }
}

fn pretty(value: &impl Serialize) -> Vec<u8> {
    serde_json::to_vec_pretty(value).unwrap_or_default()
}

pub async fn capture_artifacts(driver: &WebDriver, dir: &str, err: &anyhow::Error) -> Result<()> {
    let written = Artifacts::collect(driver, err).await.write_to(Path::new(dir))?;
    log::info!("saved {} to {dir}", written.join(", "));
    Ok(())
}

pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn temp_dir(label: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!(
            "rps-artifacts-{label}-{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ))
    }

    #[test]
    fn split_csv_trims_and_filters() {
        let parts = split_csv(" alpha, ,beta,  gamma ");
        assert_eq!(parts, vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn artifacts_dir_includes_key_segments() {
        let dir = artifacts_dir("target/out", "chrome", "ios-overlay", "iphone");
        assert!(dir.contains("target/out/chrome/ios-overlay/iphone/"));
    }

    #[test]
    fn full_artifacts_write_every_file() {
        let base = temp_dir("full");
        let storage = json!({ "theme": "neon", "installBannerDismissed": "1700000000000" });
        let artifacts = Artifacts {
            screenshot: Some(vec![1, 2, 3]),
            dom: Some("<html />".to_string()),
            local_storage: Some(storage),
            page: Some(PageSnapshot {
                banner_shown: true,
                ..PageSnapshot::default()
            }),
            error_chain: "boom".to_string(),
        };
        let written = artifacts.write_to(&base).expect("write artifacts");
        assert_eq!(
            written,
            vec!["screenshot.png", "dom.html", "local-storage.json", "page.json", "error.txt"]
        );
        let page = std::fs::read_to_string(base.join("page.json")).unwrap();
        assert!(page.contains("\"banner_shown\": true"));
    }

    #[test]
    fn unreachable_page_still_records_the_error() {
        let base = temp_dir("bare");
        let artifacts = Artifacts {
            error_chain: "session lost: connection refused".to_string(),
            ..Artifacts::default()
        };
        assert_eq!(artifacts.write_to(&base).unwrap(), vec!["error.txt"]);
        let text = std::fs::read_to_string(base.join("error.txt")).unwrap();
        assert!(text.contains("connection refused"));
    }
}
