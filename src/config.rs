//! Run parameters, built once at startup and passed down explicitly.

use crate::{paths, Error, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Bundled visibility predicate injected into every page before capture.
pub const VISIBILITY_SCRIPT: &str = include_str!("js/visibility.js");

/// Parameters of a single capture run
///
/// # Examples
///
/// ```
/// let cfg = pagepalette::RunConfig::new("https://example.com/path/").unwrap();
/// assert!(cfg.run_dir().ends_with("example.com-path"));
/// ```
#[derive(Debug, Clone)]
pub struct RunConfig {
    url: String,
    data_root: PathBuf,
    run_dir: PathBuf,
    /// Pause between sizing the viewport and the first capture
    pub settle_delay: Duration,
    /// Extra height added to the body rect when sizing the viewport
    pub chrome_allowance: u32,
    /// Maximum number of colors extracted per screenshot
    pub palette_size: usize,
    /// Replacement for the bundled visibility predicate
    pub visibility_script: Option<PathBuf>,
}

impl RunConfig {
    pub const DEFAULT_DATA_ROOT: &'static str = "./data";

    /// Validate `url` (absolute http/https) and derive the run directory
    /// under `./data`.
    pub fn new(url: &str) -> Result<Self> {
        Self::with_data_root(url, Self::DEFAULT_DATA_ROOT)
    }

    pub fn with_data_root(url: &str, data_root: impl AsRef<Path>) -> Result<Self> {
        let parsed = url::Url::parse(url)
            .map_err(|e| Error::ConfigError(format!("'{}' is not an absolute URL: {}", url, e)))?;
        match parsed.scheme() {
            "http" | "https" => {}
            other => {
                return Err(Error::ConfigError(format!(
                    "unsupported URL scheme '{}'",
                    other
                )))
            }
        }

        let data_root = data_root.as_ref().to_path_buf();
        let run_dir = paths::run_dir(&data_root, url);
        Ok(Self {
            url: url.to_string(),
            data_root,
            run_dir,
            settle_delay: Duration::from_millis(1000),
            chrome_allowance: 22,
            palette_size: 6,
            visibility_script: None,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn data_root(&self) -> &Path {
        &self.data_root
    }

    pub fn run_dir(&self) -> &Path {
        &self.run_dir
    }

    /// Source of the visibility predicate: the override file when set,
    /// otherwise the bundled script.
    pub fn visibility_source(&self) -> Result<String> {
        match &self.visibility_script {
            Some(path) => std::fs::read_to_string(path).map_err(|e| {
                Error::ConfigError(format!(
                    "cannot read visibility script {}: {}",
                    path.display(),
                    e
                ))
            }),
            None => Ok(VISIBILITY_SCRIPT.to_string()),
        }
    }

    /// Create the run directory if needed
    pub fn ensure_run_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.run_dir)?;
        Ok(())
    }
}
