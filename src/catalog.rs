//! Region catalog: which page areas to capture and which styles to sample.
//!
//! Catalog order is significant. Screenshots, color results and style
//! entries are all emitted in the order regions are declared here.

use crate::{Error, Result};
use std::collections::HashSet;

/// Selector groups captured by default, one group per region. Within a
/// group the first selector that yields a visible element wins.
pub const DEFAULT_REGIONS: &[&[&str]] = &[
    &["header", "#header", ".header", "[role=banner]"],
    &["nav", "#nav", ".nav", ".navbar", "[role=navigation]"],
    &["main", "#main", ".main", "[role=main]", "#content", ".content"],
    &["aside", "#sidebar", ".sidebar", "[role=complementary]"],
    &["footer", "#footer", ".footer", "[role=contentinfo]"],
    &["body"],
];

/// Computed style properties sampled for every region
pub const DEFAULT_PROPERTIES: &[&str] = &[
    "background-color",
    "background-image",
    "color",
    "font-family",
    "font-size",
    "font-weight",
    "line-height",
    "letter-spacing",
    "text-transform",
    "text-align",
    "padding-top",
    "padding-right",
    "padding-bottom",
    "padding-left",
    "margin-top",
    "margin-bottom",
    "border-bottom-color",
    "border-bottom-width",
    "box-shadow",
];

/// One region: an ordered group of candidate selectors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionSpec {
    selectors: Vec<String>,
}

impl RegionSpec {
    /// Build a region from its selector group. The group must not be empty.
    pub fn new<I, S>(selectors: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let selectors: Vec<String> = selectors
            .into_iter()
            .map(Into::into)
            .filter(|s| !s.trim().is_empty())
            .collect();
        if selectors.is_empty() {
            return Err(Error::ConfigError("region has no selectors".into()));
        }
        Ok(Self { selectors })
    }

    pub fn selectors(&self) -> &[String] {
        &self.selectors
    }

    /// The first selector; the style sampler only looks at this one.
    pub fn primary(&self) -> &str {
        &self.selectors[0]
    }

    /// Raw selector-group key used in `css.json`
    pub fn key(&self) -> String {
        self.selectors.join(", ")
    }

    /// Filesystem-safe identifier: the primary selector with whitespace
    /// removed. Names the screenshot file and keys `colors.json`.
    pub fn safe_id(&self) -> String {
        self.primary().chars().filter(|c| !c.is_whitespace()).collect()
    }
}

/// Ordered list of CSS property names sampled for every region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertySpec(Vec<String>);

impl PropertySpec {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let names = names
            .into_iter()
            .map(Into::into)
            .filter(|n: &String| seen.insert(n.clone()))
            .collect();
        Self(names)
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The full, immutable configuration of what a run captures
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    regions: Vec<RegionSpec>,
    properties: PropertySpec,
}

impl Catalog {
    /// Build a catalog. Two regions whose safe ids collide would overwrite
    /// each other's screenshot, so that is rejected.
    pub fn new(regions: Vec<RegionSpec>, properties: PropertySpec) -> Result<Self> {
        let mut ids = HashSet::new();
        for region in &regions {
            let id = region.safe_id();
            if !ids.insert(id.clone()) {
                return Err(Error::ConfigError(format!("duplicate region id '{}'", id)));
            }
        }
        Ok(Self {
            regions,
            properties,
        })
    }

    /// Convenience for building a catalog from string slices
    pub fn from_groups(groups: &[&[&str]], properties: &[&str]) -> Result<Self> {
        let regions = groups
            .iter()
            .map(|g| RegionSpec::new(g.iter().copied()))
            .collect::<Result<Vec<_>>>()?;
        Self::new(regions, PropertySpec::new(properties.iter().copied()))
    }

    pub fn regions(&self) -> &[RegionSpec] {
        &self.regions
    }

    pub fn properties(&self) -> &PropertySpec {
        &self.properties
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        let regions = DEFAULT_REGIONS
            .iter()
            .map(|g| RegionSpec {
                selectors: g.iter().map(|s| s.to_string()).collect(),
            })
            .collect();
        Self {
            regions,
            properties: PropertySpec::new(DEFAULT_PROPERTIES.iter().copied()),
        }
    }
}
