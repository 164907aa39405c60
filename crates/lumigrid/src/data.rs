use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use gridcore::series::synthetic_series;
use gridcore::SeriesPoint;

const SYNTHETIC_LEN: usize = 1000;

/// Loads the input series from a JSON file, or builds the synthetic demo
/// series when no file is given.
pub fn load_series(path: Option<&Path>) -> Result<Vec<SeriesPoint>> {
    let Some(path) = path else {
        tracing::info!(len = SYNTHETIC_LEN, "no series file; using synthetic series");
        return Ok(synthetic_series(SYNTHETIC_LEN));
    };

    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read series file {}", path.display()))?;
    let series: Vec<SeriesPoint> = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse series file {}", path.display()))?;
    if series.is_empty() {
        bail!("series file {} contains no points", path.display());
    }

    tracing::info!(len = series.len(), path = %path.display(), "loaded series");
    Ok(series)
}
