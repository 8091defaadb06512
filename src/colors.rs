//! Color extraction fan-out over the captured screenshots.
//!
//! One task per catalog region runs concurrently. A missing or empty
//! screenshot, or a failed extraction, drops that region from the result.
//! Results keep catalog order whatever order the tasks finish in.

use crate::catalog::Catalog;
use crate::palette::{ColorExtractor, Rgb};
use crate::paths;
use futures::future::join_all;
use log::{debug, warn};
use serde::Serialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Palette of one captured region
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColorResult {
    pub region: String,
    pub colors: Vec<Rgb>,
}

/// Extract the palette of a single region's screenshot.
///
/// Returns `None` when the file does not exist, when it is empty (the file
/// is deleted), or when extraction fails.
pub async fn extract_region(
    region: String,
    path: PathBuf,
    extractor: Arc<dyn ColorExtractor>,
) -> Option<ColorResult> {
    let meta = match tokio::fs::metadata(&path).await {
        Ok(meta) => meta,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("no screenshot for {}", region);
            return None;
        }
        Err(e) => {
            warn!("cannot stat {}: {}", path.display(), e);
            return None;
        }
    };

    if meta.len() == 0 {
        warn!("empty capture for {}, removing {}", region, path.display());
        if let Err(e) = tokio::fs::remove_file(&path).await {
            warn!("failed to remove {}: {}", path.display(), e);
        }
        return None;
    }

    let task_path = path.clone();
    match tokio::task::spawn_blocking(move || extractor.extract(&task_path)).await {
        Ok(Ok(colors)) => Some(ColorResult { region, colors }),
        Ok(Err(e)) => {
            warn!("color extraction failed for {}: {}", region, e);
            None
        }
        Err(e) => {
            warn!("color extraction task for {} did not finish: {}", region, e);
            None
        }
    }
}

/// Run extraction for every catalog region against `run_dir` and keep the
/// regions that produced a palette, in catalog order.
pub async fn extract_all(
    run_dir: &Path,
    catalog: &Catalog,
    extractor: Arc<dyn ColorExtractor>,
) -> Vec<ColorResult> {
    let tasks = catalog.regions().iter().map(|region| {
        extract_region(
            region.safe_id(),
            paths::screenshot_path(run_dir, region),
            Arc::clone(&extractor),
        )
    });

    join_all(tasks).await.into_iter().flatten().collect()
}
