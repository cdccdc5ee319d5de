use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use aquacc::band::{BandShifts, ShiftTriple};
use aquacc::config::{self, CorrectionParams, RawConfig};
use aquacc::parallel::prelude::*;
use aquacc::{codec, logger, Pipeline};
use clap::Parser as Clap_parser;
use tracing::{info, warn};

#[derive(Clap_parser, Debug, Clone)]
#[command(author, version, about = "Underwater photo color correction", long_about = None)]
struct Args {
    /// images to correct
    #[arg(value_name = "INPUT", required = true)]
    input_paths: Vec<PathBuf>,

    /// output file, used when a single input is given
    #[arg(short, long, default_value = "corrected_image.png")]
    output: PathBuf,

    /// output directory, used when several inputs are given
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// TOML correction preset
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// skip the gray-world white balance
    #[arg(long)]
    no_balance: bool,

    /// shadow shift as r,g,b
    #[arg(long, value_name = "R,G,B", allow_hyphen_values = true)]
    shadows: Option<ShiftTriple>,

    /// midtone shift as r,g,b
    #[arg(long, value_name = "R,G,B", allow_hyphen_values = true)]
    midtones: Option<ShiftTriple>,

    /// highlight shift as r,g,b
    #[arg(long, value_name = "R,G,B", allow_hyphen_values = true)]
    highlights: Option<ShiftTriple>,

    /// reject shifts outside [-50, 50] instead of clamping them
    #[arg(long)]
    strict: bool,
}

impl Args {
    /// Merges the preset with the command line flags. The flag is true when
    /// any shift had to be clamped.
    fn correction_params(&self) -> Result<(CorrectionParams, bool)> {
        let preset = match &self.config {
            Some(path) => config::load_raw_config(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => RawConfig::default(),
        };

        let shifts = BandShifts::new(
            self.shadows.unwrap_or(preset.shadows),
            self.midtones.unwrap_or(preset.midtones),
            self.highlights.unwrap_or(preset.highlights),
        );
        let white_balance = preset.white_balance && !self.no_balance;
        let params = CorrectionParams::new(white_balance, shifts, preset.strict || self.strict)?;
        Ok((params, params.shifts != shifts))
    }

    /// One output path per input. Several inputs that would write the same
    /// file are rejected before anything is processed.
    fn output_paths(&self) -> Result<Vec<PathBuf>> {
        if let [_] = self.input_paths.as_slice() {
            return Ok(vec![self.output.clone()]);
        }

        let mut seen = HashSet::new();
        let mut outputs = Vec::with_capacity(self.input_paths.len());
        for input_path in &self.input_paths {
            let stem = input_path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "image".to_string());
            let output_path = self.out_dir.join(format!("{stem}_corrected.png"));
            if !seen.insert(output_path.clone()) {
                bail!(
                    "{} would overwrite another output at {}",
                    input_path.display(),
                    output_path.display()
                );
            }
            outputs.push(output_path);
        }
        Ok(outputs)
    }
}

fn process_image(pipeline: &Pipeline, input_path: &Path, output_path: &Path) -> Result<()> {
    let decode = Instant::now();
    let raster = codec::open(input_path).with_context(|| format!("failed to read {}", input_path.display()))?;
    info!("decode {}: {:.2?}", input_path.display(), decode.elapsed());

    let now = Instant::now();
    let corrected = pipeline.run(&raster);
    info!("pixel pipeline time: {:.2?}", now.elapsed());

    codec::save_png(output_path, &corrected).with_context(|| format!("failed to write {}", output_path.display()))?;
    info!("saved {}", output_path.display());
    Ok(())
}

fn main() -> Result<()> {
    logger::init();
    let args = Args::parse();

    let (params, clamped) = args.correction_params()?;
    if clamped {
        warn!("shifts clamped to [-50, 50]");
    }
    info!(
        white_balance = params.white_balance,
        shadows = ?params.shifts.shadows,
        midtones = ?params.shifts.midtones,
        highlights = ?params.shifts.highlights,
        "correction parameters"
    );
    let pipeline = Pipeline::from_params(&params);
    let output_paths = args.output_paths()?;

    let total = Instant::now();
    let failures: Vec<String> = args
        .input_paths
        .par_iter()
        .zip(output_paths.par_iter())
        .filter_map(|(input_path, output_path)| {
            process_image(&pipeline, input_path, output_path)
                .err()
                .map(|e| format!("{e:#}"))
        })
        .collect();

    for failure in &failures {
        tracing::error!("{failure}");
    }
    info!("total time: {:.2?}", total.elapsed());

    if !failures.is_empty() {
        bail!("{} of {} images failed", failures.len(), args.input_paths.len());
    }
    Ok(())
}
