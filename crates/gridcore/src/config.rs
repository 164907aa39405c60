use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse scene file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Which of the two fragment programs drives the visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VizMode {
    /// Flat grid of brightness cells.
    Grid,
    /// Ray-marched 3D bar chart.
    Bars,
}

impl VizMode {
    /// Edge count of the cell lattice when the scene does not override it.
    /// The grid view historically uses a 40×40 lattice, the bar chart 32×32.
    pub fn default_grid_edge(self) -> u32 {
        match self {
            VizMode::Grid => 40,
            VizMode::Bars => 32,
        }
    }
}

impl std::fmt::Display for VizMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VizMode::Grid => f.write_str("grid"),
            VizMode::Bars => f.write_str("bars"),
        }
    }
}

fn default_data_cap() -> u32 {
    1000
}

fn default_march_steps() -> u32 {
    70
}

fn default_march_epsilon() -> f32 {
    0.001
}

fn default_max_ray_distance() -> f32 {
    20.0
}

fn default_texture_size() -> (u32, u32) {
    (32, 32)
}

/// Scene configuration for both visualization modes.
///
/// Grid edge count, packed-texture dimensions, and data cap are three
/// independent knobs; [`VizConfig::validate`] checks that they reconcile
/// instead of assuming they agree.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VizConfig {
    pub mode: VizMode,
    /// Cells per lattice edge; `None` uses the per-mode default (40 / 32).
    #[serde(default)]
    pub grid_edge_count: Option<u32>,
    /// Linear cell indices at or past this cap render solid black.
    #[serde(default = "default_data_cap")]
    pub data_cap: u32,
    /// Sphere-tracing iteration bound for the bar chart.
    #[serde(default = "default_march_steps")]
    pub ray_march_steps: u32,
    /// Hit threshold for the signed distance during marching.
    #[serde(default = "default_march_epsilon")]
    pub ray_march_epsilon: f32,
    /// Accumulated distance past which a ray counts as a miss.
    #[serde(default = "default_max_ray_distance")]
    pub max_ray_distance: f32,
    /// Dimensions of the packed series texture.
    #[serde(default = "default_texture_size")]
    pub texture_size: (u32, u32),
}

impl VizConfig {
    pub fn new(mode: VizMode) -> Self {
        Self {
            mode,
            grid_edge_count: None,
            data_cap: default_data_cap(),
            ray_march_steps: default_march_steps(),
            ray_march_epsilon: default_march_epsilon(),
            max_ray_distance: default_max_ray_distance(),
            texture_size: default_texture_size(),
        }
    }

    /// Parses a TOML scene file.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Effective lattice edge count for the configured mode.
    pub fn grid_edge_count(&self) -> u32 {
        self.grid_edge_count
            .unwrap_or_else(|| self.mode.default_grid_edge())
    }

    /// Number of cells in the packed texture.
    pub fn texture_cells(&self) -> u32 {
        self.texture_size.0.saturating_mul(self.texture_size.1)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_edge_count() == 0 {
            return Err(ConfigError::Invalid(
                "grid edge count must be at least 1".into(),
            ));
        }
        if self.texture_size.0 == 0 || self.texture_size.1 == 0 {
            return Err(ConfigError::Invalid(format!(
                "texture dimensions {}x{} contain no cells",
                self.texture_size.0, self.texture_size.1
            )));
        }
        if self.data_cap == 0 {
            return Err(ConfigError::Invalid("data cap must be at least 1".into()));
        }
        if self.data_cap > self.texture_cells() {
            return Err(ConfigError::Invalid(format!(
                "data cap {} exceeds packed texture capacity {} ({}x{})",
                self.data_cap,
                self.texture_cells(),
                self.texture_size.0,
                self.texture_size.1
            )));
        }
        if self.ray_march_steps == 0 {
            return Err(ConfigError::Invalid(
                "ray march step bound must be at least 1".into(),
            ));
        }
        if !(self.ray_march_epsilon > 0.0) {
            return Err(ConfigError::Invalid(
                "ray march epsilon must be positive".into(),
            ));
        }
        if !(self.max_ray_distance > 0.0) {
            return Err(ConfigError::Invalid(
                "max ray distance must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Parameters consumed by the grid-brightness kernel.
    pub fn grid_params(&self) -> crate::kernel::grid::GridParams {
        crate::kernel::grid::GridParams {
            edge_count: self.grid_edge_count(),
            data_cap: self.data_cap,
        }
    }

    /// Parameters consumed by the bar-chart kernel.
    pub fn bar_params(&self) -> crate::kernel::bars::BarParams {
        crate::kernel::bars::BarParams {
            edge_count: self.grid_edge_count(),
            steps: self.ray_march_steps,
            epsilon: self.ray_march_epsilon,
            max_distance: self.max_ray_distance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_mode_edge_defaults() {
        assert_eq!(VizConfig::new(VizMode::Grid).grid_edge_count(), 40);
        assert_eq!(VizConfig::new(VizMode::Bars).grid_edge_count(), 32);

        let mut config = VizConfig::new(VizMode::Grid);
        config.grid_edge_count = Some(8);
        assert_eq!(config.grid_edge_count(), 8);
    }

    #[test]
    fn defaults_validate() {
        VizConfig::new(VizMode::Grid).validate().unwrap();
        VizConfig::new(VizMode::Bars).validate().unwrap();
    }

    #[test]
    fn cap_beyond_texture_capacity_is_rejected() {
        let mut config = VizConfig::new(VizMode::Grid);
        config.data_cap = 1025;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        config.data_cap = 1024;
        config.validate().unwrap();
    }

    #[test]
    fn degenerate_knobs_are_rejected() {
        let mut config = VizConfig::new(VizMode::Bars);
        config.texture_size = (0, 32);
        assert!(config.validate().is_err());

        let mut config = VizConfig::new(VizMode::Bars);
        config.ray_march_epsilon = 0.0;
        assert!(config.validate().is_err());

        let mut config = VizConfig::new(VizMode::Bars);
        config.max_ray_distance = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn scene_file_round_trip() {
        let config = VizConfig::from_toml_str(
            r#"
                mode = "bars"
                data_cap = 900
                ray_march_steps = 48
                texture_size = [32, 32]
            "#,
        )
        .unwrap();
        assert_eq!(config.mode, VizMode::Bars);
        assert_eq!(config.data_cap, 900);
        assert_eq!(config.ray_march_steps, 48);
        assert_eq!(config.grid_edge_count(), 32);
        assert_eq!(config.ray_march_epsilon, 0.001);

        let serialized = toml::to_string(&config).unwrap();
        let reparsed = VizConfig::from_toml_str(&serialized).unwrap();
        assert_eq!(config, reparsed);
    }

    #[test]
    fn unknown_scene_keys_are_rejected() {
        let err = VizConfig::from_toml_str("mode = \"grid\"\nfog = 1.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
