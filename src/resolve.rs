//! Selector resolution and padded bounding boxes.

use crate::catalog::RegionSpec;
use crate::{scripts, BoundingRect, BrowserSession, Result};
use log::debug;
use serde::Deserialize;

/// Layout rectangle as reported by the page, in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct LayoutRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Computed padding of an element, in CSS pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

/// The element a selector group resolved to
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResolvedElement {
    /// Which selector of the group matched
    pub selector: String,
    pub rect: LayoutRect,
    pub padding: Padding,
}

impl ResolvedElement {
    pub fn bounding_rect(&self) -> Option<BoundingRect> {
        padded_rect(self.rect, self.padding)
    }
}

/// Grow `rect` by its horizontal and vertical padding and floor to pixels.
///
/// Returns `None` when the result has no area, since nothing could be
/// cropped from it.
pub fn padded_rect(rect: LayoutRect, padding: Padding) -> Option<BoundingRect> {
    let width = (rect.width + padding.left + padding.right).floor();
    let height = (rect.height + padding.top + padding.bottom).floor();
    if !(width.is_finite() && height.is_finite() && rect.x.is_finite() && rect.y.is_finite()) {
        return None;
    }
    if width < 1.0 || height < 1.0 {
        return None;
    }
    Some(BoundingRect {
        x: rect.x.floor() as i64,
        y: rect.y.floor() as i64,
        width: width as u32,
        height: height as u32,
    })
}

/// Find the first visible element for `region`, trying selectors in order
/// and matches in DOM order. `Ok(None)` means nothing visible matched.
pub fn resolve<S: BrowserSession>(
    session: &mut S,
    region: &RegionSpec,
) -> Result<Option<ResolvedElement>> {
    let found: Option<ResolvedElement> = session.evaluate_as(&scripts::resolve_region(region))?;
    match &found {
        Some(el) => debug!("region {} resolved via '{}'", region.safe_id(), el.selector),
        None => debug!("region {} has no visible match", region.safe_id()),
    }
    Ok(found)
}

/// Resolve `region` and compute its padded box in one step
pub fn bounding_rect<S: BrowserSession>(
    session: &mut S,
    region: &RegionSpec,
) -> Result<Option<BoundingRect>> {
    Ok(resolve(session, region)?.and_then(|el| el.bounding_rect()))
}
