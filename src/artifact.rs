//! JSON artifacts written next to the screenshots.

use crate::colors::ColorResult;
use crate::styles::StyleRecord;
use crate::{paths, Result};
use log::{error, info};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::path::Path;

/// `colors.json` view over the fan-out result: `{ "<region>": [[r, g, b], ...] }`
pub struct ColorRecord<'a>(pub &'a [ColorResult]);

impl Serialize for ColorRecord<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for result in self.0 {
            map.serialize_entry(&result.region, &result.colors)?;
        }
        map.end()
    }
}

fn try_write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Serialize `value` to `path`. Failures are logged, not returned; a run
/// never aborts because an artifact could not be written.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> bool {
    match try_write_json(path, value) {
        Ok(()) => {
            info!("wrote {}", path.display());
            true
        }
        Err(e) => {
            error!("failed to write {}: {}", path.display(), e);
            false
        }
    }
}

pub fn write_styles(run_dir: &Path, record: &StyleRecord) -> bool {
    write_json(&run_dir.join(paths::STYLES_FILE), record)
}

pub fn write_colors(run_dir: &Path, results: &[ColorResult]) -> bool {
    write_json(&run_dir.join(paths::COLORS_FILE), &ColorRecord(results))
}
