//! Output layout: `<data-root>/<normalized-url>/<region>.png`, `css.json`, `colors.json`

use crate::catalog::RegionSpec;
use std::path::{Path, PathBuf};

pub const STYLES_FILE: &str = "css.json";
pub const COLORS_FILE: &str = "colors.json";

/// Turn a URL into a directory name: scheme stripped, slashes replaced with
/// hyphens, trailing hyphens trimmed.
///
/// ```
/// assert_eq!(pagepalette::paths::normalize_url("https://example.com/path/"), "example.com-path");
/// ```
pub fn normalize_url(url: &str) -> String {
    let rest = match url.find("://") {
        Some(idx) if is_scheme(&url[..idx]) => &url[idx + 3..],
        _ => url,
    };
    rest.replace('/', "-").trim_end_matches('-').to_string()
}

fn is_scheme(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Directory holding every artifact of a run against `url`
pub fn run_dir(data_root: &Path, url: &str) -> PathBuf {
    data_root.join(normalize_url(url))
}

/// Where the screenshot for `region` is written
pub fn screenshot_path(run_dir: &Path, region: &RegionSpec) -> PathBuf {
    run_dir.join(format!("{}.png", region.safe_id()))
}
