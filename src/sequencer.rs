//! Screenshot sequencer
//!
//! Walks the catalog in declared order against a single session. The session
//! has one viewport and one scroll position, so a region is fully captured
//! before the next one is resolved; captures are never run in parallel.

use crate::catalog::{Catalog, RegionSpec};
use crate::config::RunConfig;
use crate::{paths, resolve, scripts, BoundingRect, BrowserSession, Clip, Result, Viewport};
use log::{debug, info};
use serde::Deserialize;
use std::path::PathBuf;

/// A screenshot written by the sequencer
#[derive(Debug, Clone, PartialEq)]
pub struct Capture {
    pub region_id: String,
    pub path: PathBuf,
    pub rect: BoundingRect,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Step {
    Resolving(usize),
    Capturing(usize, BoundingRect),
    Advancing(usize),
    Done,
}

#[derive(Debug, Deserialize)]
struct BodySize {
    width: f64,
    height: f64,
}

/// Viewport covering the whole body, with `allowance` extra pixels of height
fn viewport_for(body: &BodySize, allowance: u32) -> Viewport {
    // Float to int casts saturate, so only the allowance can overflow
    Viewport {
        width: body.width.ceil().max(1.0) as u32,
        height: (body.height.ceil().max(0.0) as u32).saturating_add(allowance),
    }
}

/// Load the page and get it ready for capture: size the viewport to the
/// body (plus the chrome allowance), install the visibility helper, then
/// wait for the page to settle.
pub fn prepare<S: BrowserSession>(session: &mut S, run: &RunConfig) -> Result<()> {
    session.navigate(run.url())?;

    let body: BodySize = session.evaluate_as(scripts::body_rect())?;
    let viewport = viewport_for(&body, run.chrome_allowance);
    debug!("sizing viewport to {}x{}", viewport.width, viewport.height);
    session.set_viewport(viewport)?;

    session.inject_script(&run.visibility_source()?)?;

    if !run.settle_delay.is_zero() {
        std::thread::sleep(run.settle_delay);
    }
    Ok(())
}

/// Capture every visible region of `catalog` into the run directory.
///
/// Regions without a visible match are skipped silently. Any browser error
/// aborts the sequence.
pub fn capture_regions<S: BrowserSession>(
    session: &mut S,
    run: &RunConfig,
    catalog: &Catalog,
) -> Result<Vec<Capture>> {
    let regions = catalog.regions();
    let mut captures = Vec::new();
    let mut step = if regions.is_empty() {
        Step::Done
    } else {
        Step::Resolving(0)
    };

    loop {
        step = match step {
            Step::Resolving(i) => match resolve::bounding_rect(session, &regions[i])? {
                Some(rect) => Step::Capturing(i, rect),
                None => Step::Advancing(i),
            },
            Step::Capturing(i, rect) => {
                captures.push(capture_one(session, run, &regions[i], rect)?);
                Step::Advancing(i)
            }
            Step::Advancing(i) if i + 1 < regions.len() => Step::Resolving(i + 1),
            Step::Advancing(_) => Step::Done,
            Step::Done => break,
        };
    }

    Ok(captures)
}

fn capture_one<S: BrowserSession>(
    session: &mut S,
    run: &RunConfig,
    region: &RegionSpec,
    rect: BoundingRect,
) -> Result<Capture> {
    let path = paths::screenshot_path(run.run_dir(), region);

    // Bring the box to the viewport origin, then crop to its size
    session.scroll_to(rect.y, rect.x)?;
    session.screenshot(
        &path,
        Some(Clip {
            x: 0,
            y: 0,
            width: rect.width,
            height: rect.height,
        }),
    )?;

    info!(
        "captured {} ({}x{} at {},{}) -> {}",
        region.safe_id(),
        rect.width,
        rect.height,
        rect.x,
        rect.y,
        path.display()
    );
    Ok(Capture {
        region_id: region.safe_id(),
        path,
        rect,
    })
}

/// Full screenshot pipeline for one session: prepare, capture, close.
pub fn run_sequence<S: BrowserSession>(
    mut session: S,
    run: &RunConfig,
    catalog: &Catalog,
) -> Result<Vec<Capture>> {
    run.ensure_run_dir()?;
    prepare(&mut session, run)?;
    let captures = capture_regions(&mut session, run, catalog)?;
    session.close()?;
    Ok(captures)
}
