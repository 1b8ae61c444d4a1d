//! low-export - skeletal animation compiler
//!
//! Samples glTF skeletal animation into per-bone keyframe tracks (.low)

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Instant;

use low_common::{read_animation, ANIMATION_EXT};
use low_export::config::{ExportConfig, CONFIG_FILE};
use low_export::{animation, batch};

#[derive(Parser)]
#[command(name = "low-export")]
#[command(about = "Skeletal animation compiler")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile every animation under the source directory
    Build {
        /// Path to low-export.toml
        #[arg(short, long, default_value = CONFIG_FILE)]
        config: PathBuf,

        /// Source directory (overrides config)
        #[arg(short, long)]
        source: Option<PathBuf>,

        /// Output directory (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Frame rate for sampling (overrides config)
        #[arg(short, long)]
        frame_rate: Option<f32>,

        /// Also sample the last frame
        #[arg(long)]
        inclusive: bool,

        /// Stop at the first failing asset
        #[arg(long)]
        fail_fast: bool,

        /// Remove the output directory before building
        #[arg(long)]
        clean: bool,
    },

    /// Compile a single animation
    Animation {
        /// Input glTF/GLB file
        input: PathBuf,

        /// Output .low file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Animation that drives the pose (default: first animation)
        #[arg(short, long)]
        action: Option<String>,

        /// Skin name (default: first skin)
        #[arg(short, long)]
        skin: Option<String>,

        /// Frame rate for sampling (default: 30)
        #[arg(short, long)]
        frame_rate: Option<f32>,

        /// Also sample the last frame
        #[arg(long)]
        inclusive: bool,

        /// List skins, bones and actions instead of exporting
        #[arg(long)]
        list: bool,
    },

    /// Print the contents of a compiled .low file
    Inspect {
        /// Input .low file
        file: PathBuf,

        /// Also print every matrix
        #[arg(long)]
        frames: bool,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            config,
            source,
            output,
            frame_rate,
            inclusive,
            fail_fast,
            clean,
        } => {
            let mut config = ExportConfig::load_or_default(&config)?;
            if let Some(source) = source {
                config.paths.source = source;
            }
            if let Some(output) = output {
                config.paths.output = output;
            }
            if let Some(rate) = frame_rate {
                config.sampling.frame_rate = rate;
            }
            config.sampling.include_last_frame |= inclusive;
            config.batch.fail_fast |= fail_fast;
            config.batch.clean |= clean;
            config.validate()?;

            build(&config)?;
        }

        Commands::Animation {
            input,
            output,
            action,
            skin,
            frame_rate,
            inclusive,
            list,
        } => {
            let mut config = ExportConfig::default();
            config.sampling.action = action;
            config.sampling.skin = skin;
            if let Some(rate) = frame_rate {
                config.sampling.frame_rate = rate;
            }
            config.sampling.include_last_frame = inclusive;
            config.validate()?;
            let options = config.export_options();

            if list {
                animation::list_scene(&input, &options.scene)?;
            } else {
                let output = output.unwrap_or_else(|| input.with_extension(ANIMATION_EXT));
                tracing::info!("Exporting animation {:?} -> {:?}", input, output);
                animation::convert_gltf_animation(&input, &output, &options)?;
                tracing::info!("Done!");
            }
        }

        Commands::Inspect { file, frames } => inspect(&file, frames)?,
    }

    Ok(())
}

fn build(config: &ExportConfig) -> Result<()> {
    let start = Instant::now();
    let source = &config.paths.source;
    let output = &config.paths.output;

    if config.batch.clean {
        batch::clean_output(output)?;
    }

    let inputs = batch::discover_assets(source)?;
    if inputs.is_empty() {
        tracing::warn!("No animations found in {:?}", source);
        return Ok(());
    }
    tracing::info!("Found {} animation(s) in {:?}", inputs.len(), source);

    let options = config.export_options();
    let report = batch::compile_batch(
        &inputs,
        source,
        output,
        &options,
        config.failure_policy(),
    );
    report.log_summary();

    if !report.is_success() {
        anyhow::bail!("{} animation(s) failed to compile", report.failures.len());
    }

    tracing::info!(
        "Animations compiled in {:.2} sec",
        start.elapsed().as_secs_f32()
    );
    Ok(())
}

fn inspect(file: &Path, frames: bool) -> Result<()> {
    let data = std::fs::read(file).with_context(|| format!("Failed to read {:?}", file))?;
    let clip = read_animation(&data).with_context(|| format!("Failed to decode {:?}", file))?;

    tracing::info!(
        "{:?}: {} bones, {} frames, {} bytes",
        file,
        clip.bone_count(),
        clip.frame_count,
        data.len()
    );
    for (i, track) in clip.tracks.iter().enumerate() {
        tracing::info!("  [{}] '{}'", i, track.name);
        if frames {
            for (frame, matrix) in track.matrices.iter().enumerate() {
                tracing::info!("    {:>4}: {:?}", frame, matrix.to_cols_array());
            }
        }
    }
    Ok(())
}
