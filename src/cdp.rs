//! Chrome DevTools Protocol session backend

use crate::{BrowserSession, Clip, Error, Result, SessionConfig, Viewport};
use headless_chrome::browser::tab::Tab;
use headless_chrome::protocol::cdp::Page;
use headless_chrome::types::Bounds;
use headless_chrome::{Browser, LaunchOptions};
use log::debug;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// CDP-based browser session (uses the `headless_chrome` crate)
///
/// Launches a headless Chrome instance and drives a single tab. The last
/// scroll offset requested through [`BrowserSession::scroll_to`] is kept so
/// viewport-relative clips can be turned into the document coordinates the
/// protocol expects.
pub struct CdpSession {
    browser: Browser,
    tab: Arc<Tab>,
    scroll: (i64, i64),
}

impl CdpSession {
    pub fn launch(config: &SessionConfig) -> Result<Self> {
        let launch_options = LaunchOptions::default_builder()
            .headless(config.headless)
            .window_size(Some((config.viewport.width, config.viewport.height)))
            .idle_browser_timeout(Duration::from_millis(config.timeout_ms.max(30000)))
            .build()
            .map_err(|e| Error::InitializationError(format!("Failed to build launch options: {}", e)))?;

        let browser = Browser::new(launch_options)
            .map_err(|e| Error::InitializationError(format!("Failed to launch browser: {}", e)))?;

        let tab = browser
            .new_tab()
            .map_err(|e| Error::InitializationError(format!("Failed to create tab: {}", e)))?;

        tab.set_default_timeout(Duration::from_millis(config.timeout_ms));

        if let Some(user_agent) = &config.user_agent {
            tab.set_user_agent(user_agent, None, None)
                .map_err(|e| Error::InitializationError(format!("Failed to set user agent: {}", e)))?;
        }

        Ok(Self {
            browser,
            tab,
            scroll: (0, 0),
        })
    }
}

impl BrowserSession for CdpSession {
    fn navigate(&mut self, url: &str) -> Result<()> {
        self.tab
            .navigate_to(url)
            .map_err(|e| Error::LoadError(format!("Navigation failed: {}", e)))?;

        self.tab
            .wait_until_navigated()
            .map_err(|e| Error::LoadError(format!("Wait for navigation failed: {}", e)))?;

        self.scroll = (0, 0);
        Ok(())
    }

    fn evaluate(&mut self, script: &str) -> Result<serde_json::Value> {
        // Objects are not returned by value, so the page hands back JSON text
        let wrapped = format!(
            "(async function() {{ return JSON.stringify(await ({})); }})()",
            script
        );

        let result = self
            .tab
            .evaluate(&wrapped, true)
            .map_err(|e| Error::ScriptError(format!("Evaluation failed: {}", e)))?;

        match result.value {
            Some(serde_json::Value::String(text)) => Ok(serde_json::from_str(&text)?),
            Some(other) => Err(Error::ScriptError(format!(
                "Expected JSON text from page, got {}",
                other
            ))),
            // JSON.stringify(undefined) yields undefined
            None => Ok(serde_json::Value::Null),
        }
    }

    fn inject_script(&mut self, source: &str) -> Result<()> {
        self.tab
            .evaluate(source, false)
            .map_err(|e| Error::ScriptError(format!("Script injection failed: {}", e)))?;
        Ok(())
    }

    fn set_viewport(&mut self, viewport: Viewport) -> Result<()> {
        self.tab
            .set_bounds(Bounds::Normal {
                left: Some(0),
                top: Some(0),
                width: Some(viewport.width as f64),
                height: Some(viewport.height as f64),
            })
            .map_err(|e| Error::CdpError(format!("Failed to resize window: {}", e)))?;
        Ok(())
    }

    fn scroll_to(&mut self, y: i64, x: i64) -> Result<()> {
        self.tab
            .evaluate(&crate::scripts::scroll_to(y, x), false)
            .map_err(|e| Error::ScriptError(format!("Scroll failed: {}", e)))?;
        self.scroll = (x, y);
        Ok(())
    }

    fn screenshot(&mut self, path: &Path, clip: Option<Clip>) -> Result<()> {
        let clip = clip.map(|c| Page::Viewport {
            x: (self.scroll.0 + c.x as i64) as f64,
            y: (self.scroll.1 + c.y as i64) as f64,
            width: c.width as f64,
            height: c.height as f64,
            scale: 1.0,
        });
        debug!("screenshot {} clip={:?}", path.display(), clip);

        let data = self
            .tab
            .capture_screenshot(Page::CaptureScreenshotFormatOption::Png, None, clip, true)
            .map_err(|e| Error::CaptureError(format!("Screenshot failed: {}", e)))?;

        std::fs::write(path, data)?;
        Ok(())
    }

    fn close(self) -> Result<()> {
        // Drop explicitly so the child process is terminated promptly
        drop(self.tab);
        drop(self.browser);
        Ok(())
    }
}
