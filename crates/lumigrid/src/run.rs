use anyhow::{Context, Result};
use gridcore::{PackedGrid, VizConfig, VizMode};
use renderer::{RenderPolicy, Renderer, RendererConfig};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::data::load_series;

pub fn run(args: Cli) -> Result<()> {
    initialise_tracing();

    let viz = resolve_viz_config(&args)?;
    let series = load_series(args.series.as_deref())?;
    let grid = PackedGrid::pack(&series, viz.texture_size.0, viz.texture_size.1)
        .context("failed to pack series into data texture")?;

    tracing::info!(
        mode = %viz.mode,
        grid_edge = viz.grid_edge_count(),
        data_cap = viz.data_cap,
        texture = ?viz.texture_size,
        "starting visualizer"
    );

    let mut config = RendererConfig::new(viz, grid);
    if let Some(size) = args.size {
        config.surface_size = size;
    }
    config.policy = resolve_policy(&args);
    config.antialiasing = args.antialias;

    Renderer::new(config).run()
}

pub fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Builds the scene configuration from the optional scene file, then layers
/// CLI overrides on top and validates the result.
fn resolve_viz_config(args: &Cli) -> Result<VizConfig> {
    let mut viz = match &args.scene {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read scene file {}", path.display()))?;
            VizConfig::from_toml_str(&raw)
                .with_context(|| format!("invalid scene file {}", path.display()))?
        }
        None => VizConfig::new(args.mode.unwrap_or(VizMode::Grid)),
    };

    if let Some(mode) = args.mode {
        viz.mode = mode;
    }
    if let Some(edge) = args.grid_edge {
        viz.grid_edge_count = Some(edge);
    }
    if let Some(cap) = args.data_cap {
        viz.data_cap = cap;
    }
    if let Some(steps) = args.march_steps {
        viz.ray_march_steps = steps;
    }
    if let Some(epsilon) = args.march_epsilon {
        viz.ray_march_epsilon = epsilon;
    }
    if let Some(distance) = args.max_ray_distance {
        viz.max_ray_distance = distance;
    }
    if let Some(size) = args.texture_size {
        viz.texture_size = size;
    }

    viz.validate().context("invalid scene configuration")?;
    Ok(viz)
}

fn resolve_policy(args: &Cli) -> RenderPolicy {
    match args.still {
        Some(time) => RenderPolicy::Still { time: Some(time) },
        None => RenderPolicy::Animate {
            target_fps: args.fps.filter(|fps| *fps > 0.0),
        },
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    fn args(argv: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("lumigrid").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn cli_flags_override_scene_defaults() {
        let viz = resolve_viz_config(&args(&[
            "--mode",
            "bars",
            "--grid-edge",
            "16",
            "--data-cap",
            "200",
            "--march-steps",
            "40",
        ]))
        .unwrap();
        assert_eq!(viz.mode, VizMode::Bars);
        assert_eq!(viz.grid_edge_count(), 16);
        assert_eq!(viz.data_cap, 200);
        assert_eq!(viz.ray_march_steps, 40);
    }

    #[test]
    fn invalid_override_combinations_are_rejected() {
        // Cap larger than the packed texture capacity.
        let result = resolve_viz_config(&args(&["--texture-size", "8x8", "--data-cap", "65"]));
        assert!(result.is_err());
    }

    #[test]
    fn scene_file_is_layered_under_cli_flags() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "mode = \"grid\"\ndata_cap = 500\n").unwrap();

        let viz = resolve_viz_config(&args(&[
            "--scene",
            file.path().to_str().unwrap(),
            "--data-cap",
            "600",
        ]))
        .unwrap();
        assert_eq!(viz.mode, VizMode::Grid);
        assert_eq!(viz.data_cap, 600);
    }

    #[test]
    fn still_flag_selects_fixed_time_policy() {
        assert_eq!(
            resolve_policy(&args(&["--still", "3.5"])),
            RenderPolicy::Still { time: Some(3.5) }
        );
        assert_eq!(
            resolve_policy(&args(&["--fps", "30"])),
            RenderPolicy::Animate {
                target_fps: Some(30.0)
            }
        );
        assert_eq!(
            resolve_policy(&args(&["--fps", "0"])),
            RenderPolicy::Animate { target_fps: None }
        );
    }
}
