//! Style sampler: computed styles of each region's primary match.

use crate::catalog::Catalog;
use crate::config::RunConfig;
use crate::{scripts, BrowserSession, Result};
use log::{debug, info};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Computed styles of one region, in property order
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StyleEntry {
    /// Raw selector-group key of the region
    pub key: String,
    pub values: Vec<(String, String)>,
}

impl StyleEntry {
    pub fn get(&self, property: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value.as_str())
    }
}

/// Styles of every region whose primary selector matched, in catalog order.
///
/// Serializes as `{ "<region key>": { "<property>": "<value>", ... }, ... }`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleRecord {
    pub entries: Vec<StyleEntry>,
}

impl StyleRecord {
    pub fn get(&self, key: &str) -> Option<&StyleEntry> {
        self.entries.iter().find(|e| e.key == key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Regions whose background color is fully transparent while a
    /// background image is set. Their solid color probably lives in the image.
    pub fn transparent_with_image(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.get("background-color").is_some_and(is_transparent))
            .filter(|e| {
                e.get("background-image")
                    .is_some_and(|img| !img.trim().is_empty() && img.trim() != "none")
            })
            .map(|e| e.key.as_str())
            .collect()
    }
}

struct Properties<'a>(&'a [(String, String)]);

impl Serialize for Properties<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl Serialize for StyleRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.key, &Properties(&entry.values))?;
        }
        map.end()
    }
}

fn is_transparent(color: &str) -> bool {
    let compact: String = color
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase();
    // Legacy `rgba(r, g, b, 0)` and CSS Color 4 `rgb(r g b / 0)`
    compact == "transparent"
        || (compact.starts_with("rgb") && (compact.ends_with(",0)") || compact.ends_with("/0)")))
}

/// Read computed styles on the already-loaded page
pub fn sample<S: BrowserSession>(session: &mut S, catalog: &Catalog) -> Result<StyleRecord> {
    let script = scripts::sample_styles(catalog.regions(), catalog.properties());
    let entries: Vec<StyleEntry> = session.evaluate_as(&script)?;
    debug!("sampled styles for {} of {} regions", entries.len(), catalog.len());
    Ok(StyleRecord { entries })
}

/// Full style pipeline for one session: load, sample, report, close.
pub fn run_sampler<S: BrowserSession>(
    mut session: S,
    run: &RunConfig,
    catalog: &Catalog,
) -> Result<StyleRecord> {
    session.navigate(run.url())?;
    let record = sample(&mut session, catalog)?;
    session.close()?;

    for key in record.transparent_with_image() {
        info!(
            "region '{}' has a transparent background over a background image",
            key
        );
    }
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(key: &str, values: &[(&str, &str)]) -> StyleEntry {
        StyleEntry {
            key: key.into(),
            values: values
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[test]
    fn serializes_in_declared_order() {
        let record = StyleRecord {
            entries: vec![
                entry("nav, .nav", &[("color", "rgb(0, 0, 0)"), ("font-size", "16px")]),
                entry("footer", &[("color", "red")]),
            ],
        };
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            r#"{"nav, .nav":{"color":"rgb(0, 0, 0)","font-size":"16px"},"footer":{"color":"red"}}"#
        );
    }

    #[test]
    fn parses_page_payload() {
        let v = serde_json::json!([{ "key": "main", "values": [["color", "blue"]] }]);
        let entries: Vec<StyleEntry> = serde_json::from_value(v).unwrap();
        assert_eq!(entries[0].get("color"), Some("blue"));
    }

    #[test]
    fn flags_transparent_background_with_image() {
        let record = StyleRecord {
            entries: vec![
                entry(
                    "header",
                    &[
                        ("background-color", "rgba(0, 0, 0, 0)"),
                        ("background-image", "url(\"hero.jpg\")"),
                    ],
                ),
                entry(
                    "nav",
                    &[
                        ("background-color", "transparent"),
                        ("background-image", "none"),
                    ],
                ),
                entry(
                    "footer",
                    &[
                        ("background-color", "rgb(10, 10, 10)"),
                        ("background-image", "url(a.png)"),
                    ],
                ),
            ],
        };
        assert_eq!(record.transparent_with_image(), vec!["header"]);
    }

    #[test]
    fn semi_transparent_is_not_flagged() {
        assert!(!is_transparent("rgba(0, 0, 0, 0.5)"));
        assert!(is_transparent("RGBA(255, 255, 255, 0)"));
    }

    #[test]
    fn space_separated_alpha_is_recognized() {
        assert!(is_transparent("rgb(0 0 0 / 0)"));
        assert!(is_transparent("rgba(12 34 56 / 0)"));
        assert!(!is_transparent("rgb(0 0 0 / 0.25)"));
        assert!(!is_transparent("rgb(0 0 0)"));

        let record = StyleRecord {
            entries: vec![entry(
                "header",
                &[
                    ("background-color", "rgb(0 0 0 / 0)"),
                    ("background-image", "linear-gradient(red, blue)"),
                ],
            )],
        };
        assert_eq!(record.transparent_with_image(), vec!["header"]);
    }
}
