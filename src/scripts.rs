//! In-page JavaScript evaluated by the capture and style pipelines.
//!
//! Every builder returns a single expression. Arguments are spliced in as
//! JSON literals so selectors never need escaping by hand.

use crate::catalog::{PropertySpec, RegionSpec};
use serde_json::json;

/// Name of the global the visibility helper installs
pub const VISIBILITY_FN: &str = "__pagePaletteIsVisible";

const RESOLVE_TEMPLATE: &str = r#"(async function (selectors) {
    var isVisible = window.{{VISIBILITY_FN}};
    if (typeof isVisible !== 'function') {
        throw new Error('visibility helper is not installed');
    }
    for (var i = 0; i < selectors.length; i++) {
        var nodes;
        try { nodes = document.querySelectorAll(selectors[i]); } catch (e) { continue; }
        for (var j = 0; j < nodes.length; j++) {
            var el = nodes[j];
            if (!(await isVisible(el))) continue;
            var r = el.getBoundingClientRect();
            var s = window.getComputedStyle(el);
            return {
                selector: selectors[i],
                rect: {
                    x: r.left + window.scrollX,
                    y: r.top + window.scrollY,
                    width: r.width,
                    height: r.height
                },
                padding: {
                    top: parseFloat(s.paddingTop) || 0,
                    right: parseFloat(s.paddingRight) || 0,
                    bottom: parseFloat(s.paddingBottom) || 0,
                    left: parseFloat(s.paddingLeft) || 0
                }
            };
        }
    }
    return null;
})({{ARGS}})"#;

const STYLE_TEMPLATE: &str = r#"(function (regions, props) {
    var out = [];
    regions.forEach(function (region) {
        var el = null;
        try { el = document.querySelector(region.selector); } catch (e) { el = null; }
        if (!el) return;
        var style = window.getComputedStyle(el);
        out.push({
            key: region.key,
            values: props.map(function (p) { return [p, style.getPropertyValue(p)]; })
        });
    });
    return out;
})({{ARGS}})"#;

/// Resolve the first visible element of a selector group and report its
/// document-relative layout rect plus computed padding, or `null`.
pub fn resolve_region(region: &RegionSpec) -> String {
    RESOLVE_TEMPLATE
        .replace("{{VISIBILITY_FN}}", VISIBILITY_FN)
        .replace("{{ARGS}}", &json!(region.selectors()).to_string())
}

/// Size of the document body
pub fn body_rect() -> &'static str {
    r#"(function () {
    var r = document.body.getBoundingClientRect();
    return { width: r.width, height: r.height };
})()"#
}

/// Read every property for each region whose primary selector matches
pub fn sample_styles(regions: &[RegionSpec], properties: &PropertySpec) -> String {
    let regions: Vec<_> = regions
        .iter()
        .map(|r| json!({ "key": r.key(), "selector": r.primary() }))
        .collect();
    let args = format!("{}, {}", json!(regions), json!(properties.names()));
    STYLE_TEMPLATE.replace("{{ARGS}}", &args)
}

/// Scroll the window to a document offset
pub fn scroll_to(y: i64, x: i64) -> String {
    format!("window.scrollTo({}, {})", x, y)
}
