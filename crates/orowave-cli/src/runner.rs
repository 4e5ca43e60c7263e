//! Job runner: ties together grid, terrain, and the wave models.

use std::path::Path;

use anyhow::{Context, Result};
use ndarray::Array2;

use orowave_core::solver::multilayer::MultiLayerModel;
use orowave_core::solver::steady::LinearWaveModel;
use orowave_core::solver::BoundaryCondition;
use orowave_core::types::LayerSpec;
use orowave_core::FlowVariable;

use crate::config::{JobConfig, TerrainConfig};

/// Results from a solver run.
pub struct SolveOutput {
    pub variable: FlowVariable,
    pub positions: Vec<f64>,
    pub heights: Vec<f64>,
    /// Physical field, `(x, height)`.
    pub field: Array2<f64>,
}

/// Run a job from a parsed configuration.
pub fn run_job(job: &JobConfig) -> Result<SolveOutput> {
    let (x, h) = build_terrain(job)?;
    let variable: FlowVariable = job
        .output
        .variable
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;
    let heights = job.output.heights.clone();

    log::info!(
        "solving {} model for '{}' at {} heights on {} points",
        job.model.kind,
        variable,
        heights.len(),
        x.len()
    );

    let field = match job.model.kind.as_str() {
        "half-plane" | "channel" => {
            let wind = job
                .model
                .wind
                .context("model requires 'wind'")?;
            let buoyancy = job
                .model
                .buoyancy
                .context("model requires 'buoyancy'")?;
            let boundary = if job.model.kind == "channel" {
                let lid = job
                    .model
                    .lid_height
                    .context("channel model requires 'lid_height'")?;
                BoundaryCondition::RigidLid { height: lid }
            } else {
                BoundaryCondition::HalfPlane
            };
            let model = LinearWaveModel::new(&x, &h, wind, buoyancy, boundary)?;
            model.solve(variable, &heights)?
        }
        "multi-layer" => {
            if job.model.layers.is_empty() {
                anyhow::bail!("multi-layer model requires at least one [[model.layer]]");
            }
            let layers: Vec<LayerSpec> = job
                .model
                .layers
                .iter()
                .map(|l| LayerSpec {
                    base_height: l.base_height,
                    wind: l.wind,
                    buoyancy: l.buoyancy,
                })
                .collect();
            let model = MultiLayerModel::new(&x, &h, &layers)?;
            model.solve(variable, &heights)?
        }
        other => anyhow::bail!(
            "Unsupported model kind '{}'. Valid kinds: half-plane, channel, multi-layer",
            other
        ),
    };

    Ok(SolveOutput {
        variable,
        positions: x,
        heights,
        field,
    })
}

/// Build the sample grid and terrain profile from the configuration.
pub fn build_terrain(job: &JobConfig) -> Result<(Vec<f64>, Vec<f64>)> {
    let n = job.domain.points;
    let length = job.domain.length;
    if n < 2 || n % 2 != 0 {
        anyhow::bail!("domain.points must be even and at least 2, got {}", n);
    }
    if !(length.is_finite() && length > 0.0) {
        anyhow::bail!("domain.length must be positive, got {}", length);
    }

    let dx = length / n as f64;
    let x: Vec<f64> = (0..n).map(|i| dx * i as f64).collect();
    let h = evaluate_terrain(&job.terrain, &x, length)?;
    Ok((x, h))
}

fn evaluate_terrain(terrain: &TerrainConfig, x: &[f64], length: f64) -> Result<Vec<f64>> {
    match terrain.kind.as_str() {
        "gaussian" => {
            let centre = terrain.centre.unwrap_or(length / 2.0);
            let sigma = terrain
                .half_width
                .context("gaussian terrain requires 'half_width'")?;
            if sigma <= 0.0 {
                anyhow::bail!("gaussian 'half_width' must be positive, got {}", sigma);
            }
            Ok(x.iter()
                .map(|&xi| {
                    terrain.amplitude * (-(xi - centre).powi(2) / (2.0 * sigma * sigma)).exp()
                })
                .collect())
        }
        "sinusoid" => {
            let wavelength = terrain.wavelength.unwrap_or(length);
            if wavelength <= 0.0 {
                anyhow::bail!("sinusoid 'wavelength' must be positive, got {}", wavelength);
            }
            let k0 = 2.0 * std::f64::consts::PI / wavelength;
            Ok(x.iter()
                .map(|&xi| terrain.amplitude * (k0 * xi).sin())
                .collect())
        }
        other => anyhow::bail!(
            "Unsupported terrain kind '{}'. Valid kinds: gaussian, sinusoid",
            other
        ),
    }
}

/// Write the solved field to a CSV file with a metadata header.
pub fn write_field_csv(output: &SolveOutput, path: &Path, job: &JobConfig) -> Result<()> {
    use std::io::Write;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = std::fs::File::create(path)?;

    writeln!(file, "# Orowave — linear buoyancy-wave field")?;
    writeln!(file, "# Version: {}", env!("CARGO_PKG_VERSION"))?;
    writeln!(file, "# model: {}", job.model.kind)?;
    writeln!(file, "# terrain: {}", job.terrain.kind)?;
    writeln!(file, "# variable: {}", output.variable)?;
    writeln!(file, "#")?;

    let header: Vec<String> = std::iter::once("x_m".to_string())
        .chain(output.heights.iter().map(|z| format!("z_{}m", z)))
        .collect();
    writeln!(file, "{}", header.join(","))?;

    for (i, &xi) in output.positions.iter().enumerate() {
        let mut row = vec![format!("{:.4}", xi)];
        for j in 0..output.heights.len() {
            row.push(format!("{:.6e}", output.field[[i, j]]));
        }
        writeln!(file, "{}", row.join(","))?;
    }

    println!("Field written to: {}", path.display());
    Ok(())
}

/// Write the solved field to a JSON file.
pub fn write_field_json(output: &SolveOutput, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let rows: Vec<serde_json::Value> = output
        .positions
        .iter()
        .enumerate()
        .map(|(i, &xi)| {
            serde_json::json!({
                "x": xi,
                "values": (0..output.heights.len())
                    .map(|j| output.field[[i, j]])
                    .collect::<Vec<f64>>(),
            })
        })
        .collect();
    let doc = serde_json::json!({
        "variable": output.variable.symbol(),
        "heights": output.heights,
        "rows": rows,
    });

    std::fs::write(path, serde_json::to_string_pretty(&doc)?)?;
    println!("Field (JSON) written to: {}", path.display());
    Ok(())
}
