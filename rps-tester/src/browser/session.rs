use std::time::Duration;
use thirtyfour::prelude::*;

use crate::common::Device;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum BrowserKind {
    Chrome,
    Edge,
    Firefox,
    Safari,
}

#[derive(Debug, Clone)]
pub struct BrowserConfig {
    pub headless: bool,
    pub implicit_wait_secs: u64,
    pub remote_hub: Option<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            implicit_wait_secs: 3,
            remote_hub: None,
        }
    }
}

fn emulation_args(device: Device) -> [String; 2] {
    let (width, height) = device.window_size();
    [
        format!("--user-agent={}", device.user_agent()),
        format!("--window-size={width},{height}"),
    ]
}

/// Start a session emulating `device`. User agent emulation is Chromium-only; other browsers
/// run with their native agent.
pub async fn new_session(
    kind: BrowserKind,
    device: Device,
    cfg: &BrowserConfig,
) -> WebDriverResult<WebDriver> {
    let driver = match kind {
        BrowserKind::Chrome => {
            let mut caps = DesiredCapabilities::chrome();
            if cfg.headless {
                caps.set_headless()?;
            }
            for arg in emulation_args(device) {
                caps.add_arg(&arg)?;
            }

            let url = cfg.remote_hub.as_deref().unwrap_or("http://localhost:9515");
            WebDriver::new(url, caps).await?
        }
        BrowserKind::Edge => {
            let mut caps = DesiredCapabilities::edge();
            if cfg.headless {
                caps.set_headless()?;
            }
            for arg in emulation_args(device) {
                caps.add_arg(&arg)?;
            }

            let url = cfg
                .remote_hub
                .as_deref()
                .unwrap_or("http://localhost:17556");
            WebDriver::new(url, caps).await?
        }
        BrowserKind::Firefox => {
            let mut caps = DesiredCapabilities::firefox();
            if cfg.headless {
                caps.set_headless()?;
            }
            if device != Device::Desktop {
                log::warn!("firefox ignores --device {}", device.label());
            }

            let url = cfg.remote_hub.as_deref().unwrap_or("http://localhost:4444");
            WebDriver::new(url, caps).await?
        }
        BrowserKind::Safari => {
            let caps = DesiredCapabilities::safari();
            if device != Device::Desktop {
                log::warn!("safari ignores --device {}", device.label());
            }
            let url = cfg.remote_hub.as_deref().unwrap_or("http://localhost:4445");
            WebDriver::new(url, caps).await?
        }
    };

    driver
        .set_implicit_wait_timeout(Duration::from_secs(cfg.implicit_wait_secs))
        .await?;
    Ok(driver)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emulation_args_carry_agent_and_size() {
        let [ua, size] = emulation_args(Device::Iphone);
        assert!(ua.contains("iPhone"));
        assert_eq!(size, "--window-size=390,844");
    }
}
