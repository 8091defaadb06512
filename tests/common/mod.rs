//! Instrumented fake browser session shared by the integration tests.
#![allow(dead_code)]

use pagepalette::palette::{ColorExtractor, Rgb};
use pagepalette::{BrowserSession, Clip, Error, Result, Viewport};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// A call observed by the fake session
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Navigate(String),
    Resolve(String),
    BodyRect,
    SampleStyles,
    Inject,
    SetViewport(Viewport),
    ScrollTo(i64, i64),
    Screenshot(PathBuf, Option<Clip>),
    Close,
}

/// What the fake page looks like
#[derive(Debug, Clone, Default)]
pub struct FakePage {
    /// Resolution payloads keyed by primary selector
    pub visible: HashMap<String, Value>,
    /// Computed style values by property name, shared by every element
    pub computed: HashMap<String, String>,
    pub body: (f64, f64),
    /// Primary selectors whose capture produces an empty file
    pub empty_captures: Vec<String>,
    pub fail_screenshots: bool,
}

impl FakePage {
    pub fn new() -> Self {
        Self {
            body: (1024.0, 3000.0),
            ..Default::default()
        }
    }

    /// Make `selector` resolve to a box at (x, y) with the given size and no padding
    pub fn show(mut self, selector: &str, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.visible.insert(
            selector.to_string(),
            json!({
                "selector": selector,
                "rect": { "x": x, "y": y, "width": width, "height": height },
                "padding": { "top": 0, "right": 0, "bottom": 0, "left": 0 }
            }),
        );
        self
    }
}

/// Shared call log so a test can inspect what sessions did after they closed
pub type CallLog = Arc<Mutex<Vec<Call>>>;

pub struct FakeSession {
    page: Arc<FakePage>,
    log: CallLog,
    // Last resolved primary selector, used to name empty captures
    last_resolved: Option<String>,
}

impl FakeSession {
    pub fn new(page: Arc<FakePage>, log: CallLog) -> Self {
        Self {
            page,
            log,
            last_resolved: None,
        }
    }

    fn record(&self, call: Call) {
        self.log.lock().unwrap().push(call);
    }

    /// Answer the sampling script from its own arguments: a region is
    /// reported only when its primary selector matches an element.
    fn sample_styles(&self, script: &str) -> Result<Value> {
        let start = script.rfind("})([").ok_or_else(|| Error::ScriptError("no args".into()))?;
        let args = &script[start + 3..script.len() - 1];
        let (regions, props): (Vec<Value>, Vec<String>) =
            serde_json::from_str(&format!("[{}]", args))?;

        let entries: Vec<Value> = regions
            .iter()
            .filter(|r| {
                r["selector"]
                    .as_str()
                    .is_some_and(|s| self.page.visible.contains_key(s))
            })
            .map(|r| {
                let values: Vec<Value> = props
                    .iter()
                    .map(|p| json!([p, self.page.computed.get(p).cloned().unwrap_or_default()]))
                    .collect();
                json!({ "key": r["key"], "values": values })
            })
            .collect();
        Ok(Value::Array(entries))
    }
}

impl BrowserSession for FakeSession {
    fn navigate(&mut self, url: &str) -> Result<()> {
        self.record(Call::Navigate(url.to_string()));
        Ok(())
    }

    fn evaluate(&mut self, script: &str) -> Result<Value> {
        if script.contains("__pagePaletteIsVisible") {
            // Selector group is embedded as a JSON array; the first entry is primary
            let start = script.rfind("})([").ok_or_else(|| Error::ScriptError("no args".into()))?;
            let args = &script[start + 3..script.len() - 1];
            let selectors: Vec<String> = serde_json::from_str(args)?;
            let primary = selectors[0].clone();
            self.record(Call::Resolve(primary.clone()));
            let found = selectors
                .iter()
                .find_map(|s| self.page.visible.get(s).cloned())
                .unwrap_or(Value::Null);
            self.last_resolved = if found.is_null() { None } else { Some(primary) };
            return Ok(found);
        }
        if script.contains("document.body.getBoundingClientRect") {
            self.record(Call::BodyRect);
            return Ok(json!({ "width": self.page.body.0, "height": self.page.body.1 }));
        }
        if script.contains("getPropertyValue") {
            self.record(Call::SampleStyles);
            return self.sample_styles(script);
        }
        Err(Error::ScriptError(format!("unexpected script: {}", script)))
    }

    fn inject_script(&mut self, _source: &str) -> Result<()> {
        self.record(Call::Inject);
        Ok(())
    }

    fn set_viewport(&mut self, viewport: Viewport) -> Result<()> {
        self.record(Call::SetViewport(viewport));
        Ok(())
    }

    fn scroll_to(&mut self, y: i64, x: i64) -> Result<()> {
        self.record(Call::ScrollTo(y, x));
        Ok(())
    }

    fn screenshot(&mut self, path: &Path, clip: Option<Clip>) -> Result<()> {
        self.record(Call::Screenshot(path.to_path_buf(), clip));
        if self.page.fail_screenshots {
            return Err(Error::CaptureError("renderer crashed".into()));
        }
        let empty = self
            .last_resolved
            .as_ref()
            .is_some_and(|s| self.page.empty_captures.contains(s));
        let bytes: &[u8] = if empty { b"" } else { b"\x89PNG fake" };
        std::fs::write(path, bytes)?;
        Ok(())
    }

    fn close(self) -> Result<()> {
        self.record(Call::Close);
        Ok(())
    }
}

/// Extractor that returns a color derived from the file name
pub struct NameColor;

impl ColorExtractor for NameColor {
    fn extract(&self, path: &Path) -> Result<Vec<Rgb>> {
        let n = path
            .file_stem()
            .map(|s| s.to_string_lossy().len() as u8)
            .unwrap_or(0);
        Ok(vec![Rgb(n, n, n)])
    }
}
