//! Page Palette
//!
//! Visits a single web page, screenshots a fixed catalog of structural regions
//! (header, nav, main content, footer, ...), extracts the dominant colors of
//! each screenshot, and records the computed CSS styles of the same regions.
//! The results land in a per-URL directory as PNG files plus `css.json` and
//! `colors.json`.
//!
//! # Architecture
//!
//! - [`BrowserSession`] is the seam to the browser. The CDP backend
//!   ([`cdp::CdpSession`], feature `cdp`) drives headless Chrome; tests drive
//!   an instrumented fake.
//! - [`sequencer`] walks the [`catalog::Catalog`] in order against one
//!   session, capturing one screenshot per visible region.
//! - [`colors`] fans out palette extraction over the captured files.
//! - [`styles`] samples computed styles in a second, independent session.
//! - [`pipeline::run`] runs both pipelines concurrently.
//!
//! # Example
//!
//! ```no_run
//! # #[cfg(feature = "cdp")]
//! # async fn demo() -> pagepalette::Result<()> {
//! use pagepalette::{catalog::Catalog, RunConfig, SessionConfig};
//!
//! let run = RunConfig::new("https://example.com/")?;
//! let catalog = Catalog::default();
//! pagepalette::pipeline::run_with_chrome(run, catalog, SessionConfig::default()).await?;
//! # Ok(())
//! # }
//! ```

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub mod error;
pub use error::{Error, Result};

pub mod artifact;
pub mod catalog;
pub mod colors;
pub mod config;
pub mod palette;
pub mod paths;
pub mod pipeline;
pub mod resolve;
pub mod scripts;
pub mod sequencer;
pub mod styles;

#[cfg(feature = "cdp")]
pub mod cdp;

pub use config::RunConfig;

/// Configuration for a browser session
///
/// Both pipelines open their own session from the same `SessionConfig`.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// User agent override; `None` keeps the browser default
    pub user_agent: Option<String>,
    /// Initial window size, replaced by the body size before capture
    pub viewport: Viewport,
    /// Timeout for page loads in milliseconds
    pub timeout_ms: u64,
    /// Run the browser without a visible window
    pub headless: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            user_agent: None,
            viewport: Viewport::default(),
            timeout_ms: 30000,
            headless: true,
        }
    }
}

/// Viewport dimensions in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

/// A resolved element's box, padded by its CSS padding and floored to
/// integer pixels. Coordinates are relative to the document origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingRect {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

/// A crop rectangle relative to the current viewport origin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clip {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// The browser operations a capture run needs.
///
/// Every method takes `&mut self`: a session has one viewport and one scroll
/// position, so callers hold it exclusively for the whole sequence.
pub trait BrowserSession {
    /// Navigate to `url` and wait until the page reports it has loaded
    fn navigate(&mut self, url: &str) -> Result<()>;

    /// Evaluate an expression in page context and return its JSON value.
    ///
    /// Promises are awaited before the value is returned.
    fn evaluate(&mut self, script: &str) -> Result<serde_json::Value>;

    /// Evaluate and deserialize the result into `T`
    fn evaluate_as<T: DeserializeOwned>(&mut self, script: &str) -> Result<T>
    where
        Self: Sized,
    {
        let value = self.evaluate(script)?;
        serde_json::from_value(value)
            .map_err(|e| Error::ScriptError(format!("Unexpected evaluation result: {}", e)))
    }

    /// Run a helper script in page context (e.g. the visibility predicate)
    fn inject_script(&mut self, source: &str) -> Result<()>;

    /// Resize the viewport
    fn set_viewport(&mut self, viewport: Viewport) -> Result<()>;

    /// Scroll the page to the given document offset
    fn scroll_to(&mut self, y: i64, x: i64) -> Result<()>;

    /// Capture a PNG to `path`, cropped to `clip` when given
    fn screenshot(&mut self, path: &Path, clip: Option<Clip>) -> Result<()>;

    /// Close the session and release the browser
    fn close(self) -> Result<()>
    where
        Self: Sized;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_session_config() {
        let config = SessionConfig::default();
        assert_eq!(config.viewport.width, 1280);
        assert_eq!(config.viewport.height, 720);
        assert!(config.headless);
        assert!(config.user_agent.is_none());
    }

    #[test]
    fn test_bounding_rect_serializes_flat() {
        let rect = BoundingRect {
            x: 3,
            y: -4,
            width: 110,
            height: 50,
        };
        let v = serde_json::to_value(rect).unwrap();
        assert_eq!(v["width"], 110);
        assert_eq!(v["y"], -4);
    }
}
