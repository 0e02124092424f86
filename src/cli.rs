use crate::{
    bitmap::write_bmp_file,
    fractal_image::render_pooled,
    presets::{Preset, Presets},
};
use anyhow::{anyhow, Context};
use clap::Parser;
use log::debug;
use std::path::{Path, PathBuf};

/// Render the Mandelbrot or Julia set as a grayscale bitmap.
#[derive(Debug, Parser)]
#[command(name = "escape-bmp", version)]
pub struct Cli {
    /// Fractal to render: mandelbrot or julia
    #[arg(default_value = "mandelbrot")]
    pub preset: String,
    /// Output file, defaults to the preset's own file name
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Number of threads computing rows
    #[arg(short = 'j', long, default_value_t = 1)]
    pub threads: u32,
    /// Render every preset to its default file
    #[arg(long, conflicts_with_all = ["preset", "output"])]
    pub all: bool,
}

fn render_preset(preset: &Preset, path: &Path, threads: u32) -> anyhow::Result<()> {
    debug!("preset {} -> {}", preset.name(), path.display());
    let img = render_pooled(&preset.job(), threads);
    write_bmp_file(path, &img)
        .with_context(|| format!("rendering {} failed", preset.name()))?;
    println!("{} has been generated.", path.display());
    Ok(())
}

pub fn run(cli: &Cli) -> anyhow::Result<()> {
    let presets = Presets::new();
    if cli.all {
        for preset in presets.iter() {
            render_preset(preset, Path::new(preset.file_name()), cli.threads)?;
        }
        return Ok(());
    }
    let preset = presets.by_name(&cli.preset).ok_or_else(|| {
        anyhow!(
            "unknown fractal '{}', expected one of: {}",
            cli.preset,
            presets.names().join(", ")
        )
    })?;
    let path = cli
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(preset.file_name()));
    render_preset(preset, &path, cli.threads)
}
