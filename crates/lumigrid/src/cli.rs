use std::path::PathBuf;

use clap::Parser;
use gridcore::VizMode;
use renderer::Antialiasing;

#[derive(Parser, Debug)]
#[command(
    name = "lumigrid",
    author,
    version,
    about = "Full-screen GPU visualizer for normalized time series",
    arg_required_else_help = false
)]
pub struct Cli {
    /// JSON series file (array of `{"v": .., "e": ..}` points); a synthetic
    /// demo series is used when omitted.
    #[arg(long, value_name = "FILE")]
    pub series: Option<PathBuf>,

    /// TOML scene file; CLI flags below override individual fields.
    #[arg(long, value_name = "FILE")]
    pub scene: Option<PathBuf>,

    /// Visualization mode: `grid` (brightness cells) or `bars` (ray-marched bar chart).
    #[arg(long, value_name = "MODE", value_parser = parse_mode)]
    pub mode: Option<VizMode>,

    /// Window size in physical pixels (e.g. `1280x720`).
    #[arg(long, value_name = "WIDTHxHEIGHT", value_parser = parse_size)]
    pub size: Option<(u32, u32)>,

    /// Packed data texture dimensions (e.g. `32x32`).
    #[arg(long, value_name = "WIDTHxHEIGHT", value_parser = parse_size)]
    pub texture_size: Option<(u32, u32)>,

    /// Optional FPS cap while animating (0=uncapped).
    #[arg(long, value_name = "FPS")]
    pub fps: Option<f32>,

    /// Render a still frame at the given timestamp instead of animating.
    #[arg(
        long,
        value_name = "SECONDS",
        num_args = 0..=1,
        default_missing_value = "0"
    )]
    pub still: Option<f32>,

    /// Cells per lattice edge (defaults to 40 for grid, 32 for bars).
    #[arg(long, value_name = "COUNT")]
    pub grid_edge: Option<u32>,

    /// Linear cell indices at or past this cap render black in grid mode.
    #[arg(long, value_name = "COUNT")]
    pub data_cap: Option<u32>,

    /// Sphere-tracing iteration bound for the bar chart.
    #[arg(long, value_name = "COUNT")]
    pub march_steps: Option<u32>,

    /// Hit threshold for the signed distance during marching.
    #[arg(long, value_name = "DISTANCE")]
    pub march_epsilon: Option<f32>,

    /// Accumulated distance past which a ray counts as a miss.
    #[arg(long, value_name = "DISTANCE")]
    pub max_ray_distance: Option<f32>,

    /// Anti-aliasing policy: `auto`, `off`, or an explicit MSAA sample count (e.g. `4`).
    #[arg(
        long,
        value_name = "MODE",
        value_parser = parse_antialias,
        default_value = "auto"
    )]
    pub antialias: Antialiasing,
}

pub fn parse() -> Cli {
    Cli::parse()
}

pub fn parse_mode(value: &str) -> Result<VizMode, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "grid" | "cells" => Ok(VizMode::Grid),
        "bars" | "bar" | "3d" => Ok(VizMode::Bars),
        other => Err(format!("unknown mode '{other}'; expected grid or bars")),
    }
}

pub fn parse_size(value: &str) -> Result<(u32, u32), String> {
    let trimmed = value.trim();
    let (width, height) = trimmed
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("invalid size '{trimmed}'; expected WIDTHxHEIGHT"))?;
    let width: u32 = width
        .trim()
        .parse()
        .map_err(|_| format!("invalid width in '{trimmed}'"))?;
    let height: u32 = height
        .trim()
        .parse()
        .map_err(|_| format!("invalid height in '{trimmed}'"))?;
    if width == 0 || height == 0 {
        return Err(format!("size '{trimmed}' contains a zero dimension"));
    }
    Ok((width, height))
}

pub fn parse_antialias(value: &str) -> Result<Antialiasing, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("anti-alias mode must not be empty".to_string());
    }

    let normalized = trimmed.to_ascii_lowercase();
    match normalized.as_str() {
        "auto" | "max" | "default" => Ok(Antialiasing::Auto),
        "off" | "none" | "disable" | "disabled" | "0" => Ok(Antialiasing::Off),
        _ => {
            let samples: u32 = normalized.parse().map_err(|_| {
                format!("invalid anti-alias sample count '{trimmed}'; use auto/off or 2/4")
            })?;

            if samples == 0 || samples == 1 {
                return Ok(Antialiasing::Off);
            }

            if !matches!(samples, 2 | 4) {
                return Err(format!(
                    "unsupported sample count {samples}; supported values are 2 or 4"
                ));
            }

            Ok(Antialiasing::Samples(samples))
        }
    }
}
