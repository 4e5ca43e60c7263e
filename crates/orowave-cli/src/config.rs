//! TOML configuration deserialisation for solver jobs.

use serde::Deserialize;

/// Top-level job configuration.
#[derive(Debug, Deserialize)]
pub struct JobConfig {
    pub domain: DomainConfig,
    pub terrain: TerrainConfig,
    pub model: ModelConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Horizontal domain: an equidistant periodic grid.
#[derive(Debug, Deserialize)]
pub struct DomainConfig {
    /// Domain length (m).
    pub length: f64,
    /// Number of samples; must be even.
    pub points: usize,
}

/// Terrain profile specification.
#[derive(Debug, Deserialize)]
pub struct TerrainConfig {
    /// Profile kind: "gaussian" or "sinusoid".
    pub kind: String,
    /// Peak elevation (m).
    pub amplitude: f64,
    /// Gaussian: centre position (m). Defaults to the domain midpoint.
    pub centre: Option<f64>,
    /// Gaussian: standard deviation (m).
    pub half_width: Option<f64>,
    /// Sinusoid: wavelength (m). Defaults to the domain length.
    pub wavelength: Option<f64>,
}

/// Flow and boundary configuration.
#[derive(Debug, Deserialize)]
pub struct ModelConfig {
    /// Model kind: "half-plane", "channel", or "multi-layer".
    pub kind: String,
    /// Background wind speed (m/s); half-plane and channel models.
    pub wind: Option<f64>,
    /// Buoyancy frequency (1/s); half-plane and channel models.
    pub buoyancy: Option<f64>,
    /// Rigid-lid height (m); channel model only.
    pub lid_height: Option<f64>,
    /// Layer stack, bottom-up; multi-layer model only.
    #[serde(default, rename = "layer")]
    pub layers: Vec<LayerConfig>,
}

/// One layer of a multi-layer stack.
#[derive(Debug, Deserialize)]
pub struct LayerConfig {
    pub base_height: f64,
    pub wind: f64,
    pub buoyancy: f64,
}

/// Output configuration.
#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    /// Flow variable to solve for ("eta", "w", "u", or "p").
    #[serde(default = "default_variable")]
    pub variable: String,
    /// Target heights (m).
    #[serde(default = "default_heights")]
    pub heights: Vec<f64>,
    /// Output directory (default: "./output").
    #[serde(default = "default_output_dir")]
    pub directory: String,
    /// Whether to also save the field as JSON (default: false).
    #[serde(default)]
    pub save_json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            variable: default_variable(),
            heights: default_heights(),
            directory: default_output_dir(),
            save_json: false,
        }
    }
}

fn default_variable() -> String {
    "eta".into()
}
fn default_heights() -> Vec<f64> {
    vec![0.0]
}
fn default_output_dir() -> String {
    "./output".into()
}

/// Load and parse a TOML job configuration file.
pub fn load_config(path: &std::path::Path) -> anyhow::Result<JobConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: JobConfig = toml::from_str(&content)?;
    Ok(config)
}
