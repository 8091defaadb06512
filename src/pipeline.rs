//! Top-level run: the style pipeline and the screenshot-then-color pipeline
//! run concurrently, each with its own browser session.

use crate::catalog::Catalog;
use crate::colors::{self, ColorResult};
use crate::config::RunConfig;
use crate::palette::ColorExtractor;
use crate::sequencer::{self, Capture};
use crate::styles::{self, StyleRecord};
use crate::{artifact, BrowserSession, Error, Result};
use log::{error, info};
use std::sync::Arc;

/// What a successful run produced
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub captures: Vec<Capture>,
    pub colors: Vec<ColorResult>,
    pub styles: StyleRecord,
}

/// Run both pipelines against sessions produced by `open`.
///
/// `open` is called once per pipeline on a blocking worker thread, so the
/// session type itself does not need to be `Send`. A failing pipeline does
/// not stop the other; once both are finished the first failure is returned.
pub async fn run<S, F>(
    run: RunConfig,
    catalog: Catalog,
    open: F,
    extractor: Arc<dyn ColorExtractor>,
) -> Result<RunSummary>
where
    S: BrowserSession + 'static,
    F: Fn() -> Result<S> + Send + Sync + 'static,
{
    run.ensure_run_dir()?;
    info!("capturing {} into {}", run.url(), run.run_dir().display());

    let run = Arc::new(run);
    let catalog = Arc::new(catalog);
    let open = Arc::new(open);

    let style_branch = {
        let (run, catalog, open) = (Arc::clone(&run), Arc::clone(&catalog), Arc::clone(&open));
        async move {
            let task_run = Arc::clone(&run);
            let record = tokio::task::spawn_blocking(move || {
                let session = (*open)()?;
                styles::run_sampler(session, &task_run, &catalog)
            })
            .await??;
            artifact::write_styles(run.run_dir(), &record);
            Ok::<_, Error>(record)
        }
    };

    let capture_branch = {
        let (run, catalog, open) = (Arc::clone(&run), Arc::clone(&catalog), Arc::clone(&open));
        async move {
            let (task_run, task_catalog) = (Arc::clone(&run), Arc::clone(&catalog));
            let captures = tokio::task::spawn_blocking(move || {
                let session = (*open)()?;
                sequencer::run_sequence(session, &task_run, &task_catalog)
            })
            .await??;
            let colors = colors::extract_all(run.run_dir(), &catalog, extractor).await;
            artifact::write_colors(run.run_dir(), &colors);
            Ok::<_, Error>((captures, colors))
        }
    };

    let (styles, captured) = tokio::join!(style_branch, capture_branch);

    if let Err(e) = &styles {
        error!("style pipeline failed: {}", e);
    }
    if let Err(e) = &captured {
        error!("screenshot pipeline failed: {}", e);
    }
    let styles = styles?;
    let (captures, colors) = captured?;

    info!(
        "done: {} of {} regions captured, {} with colors, {} with styles",
        captures.len(),
        catalog.len(),
        colors.len(),
        styles.len()
    );
    Ok(RunSummary {
        captures,
        colors,
        styles,
    })
}

/// Run against headless Chrome with the median-cut extractor
#[cfg(feature = "cdp")]
pub async fn run_with_chrome(
    run_config: RunConfig,
    catalog: Catalog,
    session_config: crate::SessionConfig,
) -> Result<RunSummary> {
    let extractor = Arc::new(crate::palette::MedianCut::new(run_config.palette_size));
    run(
        run_config,
        catalog,
        move || crate::cdp::CdpSession::launch(&session_config),
        extractor,
    )
    .await
}
