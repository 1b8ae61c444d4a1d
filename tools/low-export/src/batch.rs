//! Batch compilation
//!
//! Discovery turns a source root into a list of inputs; compilation takes an
//! explicit list, so either half can be used on its own. Each asset is
//! compiled independently and its failure is recorded rather than unwinding
//! the whole batch.

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use low_common::ANIMATION_EXT;

use crate::animation::{convert_gltf_animation, ExportOptions, ExportSummary};

/// Source asset extensions picked up by discovery
pub const SOURCE_EXTENSIONS: &[&str] = &["gltf", "glb"];

/// What to do after an asset fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Record the failure and compile the remaining assets
    #[default]
    Continue,
    /// Stop at the first failure
    Abort,
}

/// Find every source asset under `root`, sorted by path.
///
/// Files whose name starts with `_` are treated as work files and skipped.
pub fn discover_assets(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        bail!("Source directory not found: {}", root.display());
    }

    let mut assets = Vec::new();
    for entry in WalkDir::new(root).follow_links(false) {
        let entry =
            entry.with_context(|| format!("Failed to scan source directory: {}", root.display()))?;
        let path = entry.path();
        if !entry.file_type().is_file() || !is_source_asset(path) {
            continue;
        }
        assets.push(path.to_path_buf());
    }

    assets.sort();
    Ok(assets)
}

fn is_source_asset(path: &Path) -> bool {
    let hidden = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('_'));
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();
    !hidden && SOURCE_EXTENSIONS.contains(&ext.as_str())
}

/// Mirror `input`'s path below `source_root` under `output_root` with the .low extension
pub fn output_path_for(input: &Path, source_root: &Path, output_root: &Path) -> Result<PathBuf> {
    let relative = input.strip_prefix(source_root).with_context(|| {
        format!(
            "{} is not inside source directory {}",
            input.display(),
            source_root.display()
        )
    })?;
    Ok(output_root.join(relative).with_extension(ANIMATION_EXT))
}

/// Remove a previous build's output root
pub fn clean_output(output_root: &Path) -> Result<()> {
    if output_root.exists() {
        tracing::info!("Removing {}", output_root.display());
        std::fs::remove_dir_all(output_root)
            .with_context(|| format!("Failed to remove {}", output_root.display()))?;
    }
    Ok(())
}

/// An asset that compiled
#[derive(Debug, Clone)]
pub struct CompiledAsset {
    pub input: PathBuf,
    pub output: PathBuf,
    pub summary: ExportSummary,
}

/// An asset that failed, with the reason
#[derive(Debug)]
pub struct AssetFailure {
    pub input: PathBuf,
    pub error: anyhow::Error,
}

/// Outcome of a batch
#[derive(Debug, Default)]
pub struct BatchReport {
    pub compiled: Vec<CompiledAsset>,
    pub failures: Vec<AssetFailure>,
    /// Assets not attempted because the batch aborted
    pub skipped: Vec<PathBuf>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty() && self.skipped.is_empty()
    }

    /// Log the final summary, one line per failure
    pub fn log_summary(&self) {
        tracing::info!(
            "{} compiled, {} failed, {} skipped",
            self.compiled.len(),
            self.failures.len(),
            self.skipped.len()
        );
        for failure in &self.failures {
            tracing::error!("  {}: {:#}", failure.input.display(), failure.error);
        }
    }
}

/// Compile every input, mirroring paths from `source_root` into `output_root`
pub fn compile_batch(
    inputs: &[PathBuf],
    source_root: &Path,
    output_root: &Path,
    options: &ExportOptions,
    policy: FailurePolicy,
) -> BatchReport {
    let mut report = BatchReport::default();

    for (i, input) in inputs.iter().enumerate() {
        tracing::info!("Compiling animation: {}", input.display());

        let result = output_path_for(input, source_root, output_root).and_then(|output| {
            let summary = convert_gltf_animation(input, &output, options)
                .with_context(|| format!("Failed to compile {}", input.display()))?;
            Ok(CompiledAsset {
                input: input.clone(),
                output,
                summary,
            })
        });

        match result {
            Ok(asset) => {
                tracing::info!("  -> {}", asset.output.display());
                report.compiled.push(asset);
            }
            Err(error) => {
                tracing::error!("{:#}", error);
                report.failures.push(AssetFailure {
                    input: input.clone(),
                    error,
                });
                if policy == FailurePolicy::Abort {
                    report.skipped.extend(inputs[i + 1..].iter().cloned());
                    break;
                }
            }
        }
    }

    report
}
