//! JSON description of one comparison run.
//!
//! ```json
//! {
//!   "input": { "hexdump": "input.hex" },
//!   "filter": {
//!     "coefficients": { "sos": [[0.388, 0.0, -0.388, 1.0, -0.852, 0.224]] },
//!     "outputs": ["filter_sample.hex", "filter_block.hex"],
//!     "tolerance": { "max_abs": 1e-3 }
//!   },
//!   "rfft": { "output": "rfft.hex", "size": 1024 }
//! }
//! ```
//!
//! Relative paths resolve against the manifest's directory.

use anyhow::{bail, Context, Result};
use hexcheck::signal::Tone;
use hexcheck::sos::Sos;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Upper limits for one error report. Missing limits are not checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Tolerance {
    pub max_abs: Option<f64>,
    pub max_rel: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ToneSpec {
    pub freq: f64,
    pub amp: f64,
}

/// Where the signal fed to the device comes from.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputSpec {
    /// The device logged its input buffer.
    Hexdump(PathBuf),
    /// Regenerate the input from its tones.
    Tones {
        sample_rate: f64,
        samples: usize,
        tones: Vec<ToneSpec>,
    },
}

/// Filter coefficients in either layout.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Coefficients {
    /// SciPy rows, `[b0, b1, b2, a0, a1, a2]`.
    Sos(Vec<[f64; 6]>),
    /// CMSIS rows, `[b0, b1, b2, -a1, -a2]`.
    Cmsis(Vec<[f64; 5]>),
}

impl Coefficients {
    pub fn sections(&self) -> Vec<Sos<f64>> {
        match self {
            Coefficients::Sos(rows) => rows.iter().map(|&r| Sos::from_row(r)).collect(),
            Coefficients::Cmsis(rows) => rows.iter().map(|&r| Sos::from_cmsis(r)).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FilterSpec {
    pub coefficients: Coefficients,
    /// Device outputs of the same filter; all of them must be identical.
    pub outputs: Vec<PathBuf>,
    #[serde(default)]
    pub tolerance: Tolerance,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RfftSpec {
    pub output: PathBuf,
    pub size: usize,
    #[serde(default)]
    pub magnitude_tolerance: Tolerance,
    #[serde(default)]
    pub phase_tolerance: Tolerance,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Manifest {
    pub input: InputSpec,
    pub filter: Option<FilterSpec>,
    pub rfft: Option<RfftSpec>,
    /// Directory relative paths are resolved against.
    #[serde(skip)]
    pub base_dir: PathBuf,
}

impl Manifest {
    /// Parse a manifest from JSON text, resolving paths against `base_dir`.
    pub fn from_json(text: &str, base_dir: &Path) -> Result<Self> {
        let mut manifest: Manifest =
            serde_json::from_str(text).context("invalid manifest JSON")?;
        manifest.base_dir = base_dir.to_path_buf();
        manifest.validate()?;
        Ok(manifest)
    }

    /// Read and parse a manifest file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest {}", path.display()))?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_json(&text, base_dir)
            .with_context(|| format!("failed to load manifest {}", path.display()))
    }

    fn validate(&self) -> Result<()> {
        if self.filter.is_none() && self.rfft.is_none() {
            bail!("manifest has neither a filter nor an rfft section");
        }
        if let InputSpec::Tones { sample_rate, .. } = &self.input {
            if !sample_rate.is_finite() || *sample_rate <= 0.0 {
                bail!("sample_rate must be finite and positive");
            }
        }
        if let Some(filter) = &self.filter {
            if filter.outputs.is_empty() {
                bail!("filter section lists no device outputs");
            }
        }
        if let Some(rfft) = &self.rfft {
            if rfft.size < 2 || rfft.size % 2 != 0 {
                bail!("rfft size must be even and at least 2, got {}", rfft.size);
            }
        }
        Ok(())
    }

    /// Resolve a manifest-relative path.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
}

impl ToneSpec {
    pub fn tone(&self) -> Tone<f64> {
        Tone::new(self.freq, self.amp)
    }
}
