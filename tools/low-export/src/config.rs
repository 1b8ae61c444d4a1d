//! low-export.toml configuration
//!
//! Every field is optional; command-line flags override file values.
//!
//! ```toml
//! [paths]
//! source = "assets/animations"
//! output = ".compiled/animations"
//!
//! [sampling]
//! frame_rate = 30.0
//! include_last_frame = false
//!
//! [batch]
//! fail_fast = false
//! clean = false
//! ```

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::animation::ExportOptions;
use crate::batch::FailurePolicy;
use crate::frames::FrameBoundary;
use crate::scene::{GltfSceneOptions, DEFAULT_FRAME_RATE};

/// Default configuration file name
pub const CONFIG_FILE: &str = "low-export.toml";

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExportConfig {
    #[serde(default)]
    pub paths: PathsSection,
    #[serde(default)]
    pub sampling: SamplingSection,
    #[serde(default)]
    pub batch: BatchSection,
}

/// Source and output roots
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathsSection {
    #[serde(default = "default_source_dir")]
    pub source: PathBuf,
    #[serde(default = "default_output_dir")]
    pub output: PathBuf,
}

impl Default for PathsSection {
    fn default() -> Self {
        Self {
            source: default_source_dir(),
            output: default_output_dir(),
        }
    }
}

fn default_source_dir() -> PathBuf {
    PathBuf::from("assets/animations")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".compiled/animations")
}

/// Sampling section
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SamplingSection {
    /// Frames per second used to convert key times to frames.
    /// Default: 30
    #[serde(default = "default_frame_rate")]
    pub frame_rate: f32,

    /// Sample the final boundary frame as well (`0..=last` instead of `0..last`).
    /// Default: false
    #[serde(default)]
    pub include_last_frame: bool,

    /// Animation that drives the pose. If not specified, uses the first animation.
    #[serde(default)]
    pub action: Option<String>,

    /// Skin to export. If not specified, uses the first skin.
    #[serde(default)]
    pub skin: Option<String>,
}

impl Default for SamplingSection {
    fn default() -> Self {
        Self {
            frame_rate: default_frame_rate(),
            include_last_frame: false,
            action: None,
            skin: None,
        }
    }
}

fn default_frame_rate() -> f32 {
    DEFAULT_FRAME_RATE
}

/// Batch section
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BatchSection {
    /// Stop at the first failing asset instead of compiling the rest.
    #[serde(default)]
    pub fail_fast: bool,

    /// Remove the output root before building.
    #[serde(default)]
    pub clean: bool,
}

impl ExportConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    /// Load `path` if it exists, otherwise fall back to defaults
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Parse configuration from string
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let rate = self.sampling.frame_rate;
        if !(rate.is_finite() && rate > 0.0) {
            bail!("sampling.frame_rate must be a positive number, got {}", rate);
        }
        Ok(())
    }

    pub fn boundary(&self) -> FrameBoundary {
        if self.sampling.include_last_frame {
            FrameBoundary::Inclusive
        } else {
            FrameBoundary::Exclusive
        }
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        if self.batch.fail_fast {
            FailurePolicy::Abort
        } else {
            FailurePolicy::Continue
        }
    }

    /// Per-asset export options
    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            scene: GltfSceneOptions {
                frame_rate: self.sampling.frame_rate,
                skin_name: self.sampling.skin.clone(),
                action_name: self.sampling.action.clone(),
            },
            boundary: self.boundary(),
        }
    }
}
