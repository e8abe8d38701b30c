pub mod manifest;
pub mod reference;

use anyhow::{Context, Result};
use hexcheck::hexdump;
use hexcheck::metrics::{self, ErrorReport};
use hexcheck::signal;
use hexcheck::verify;
use log::{debug, info, warn};
use manifest::{InputSpec, Manifest, Tolerance};
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::Path;

/// Read a hexdump file and decode it into samples.
pub fn read_hexdump(path: &Path) -> Result<Vec<f32>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let samples = hexdump::decode_f32(&text)
        .with_context(|| format!("failed to decode {}", path.display()))?;
    debug!("{}: {} samples", path.display(), samples.len());
    Ok(samples)
}

/// Parse whitespace or comma separated decimal samples.
pub fn parse_samples(text: &str) -> Result<Vec<f32>> {
    text.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .map(|t| {
            t.parse::<f32>()
                .or_else(|_| {
                    // C float literals such as `1.5f`
                    t.strip_suffix(['f', 'F'])
                        .unwrap_or(t)
                        .parse::<f32>()
                })
                .with_context(|| format!("invalid sample {:?}", t))
        })
        .collect()
}

/// Outcome of one metric comparison against optional limits.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Check {
    pub name: String,
    pub max_abs: f64,
    pub max_rel: f64,
    pub tolerance: Tolerance,
    pub passed: bool,
}

impl Check {
    pub fn new(name: &str, report: ErrorReport<f64>, tolerance: Tolerance) -> Self {
        Self {
            name: name.to_string(),
            max_abs: report.max_abs,
            max_rel: report.max_rel,
            tolerance,
            passed: report.within(tolerance.max_abs, tolerance.max_rel),
        }
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: max abs error {:e}, max rel error {:e} [{}]",
            self.name,
            self.max_abs,
            self.max_rel,
            if self.passed { "ok" } else { "FAIL" }
        )
    }
}

/// Everything one manifest run measured.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunReport {
    /// `Some(false)` when the device's filter outputs disagree with each other.
    pub filter_outputs_identical: Option<bool>,
    pub checks: Vec<Check>,
}

impl RunReport {
    pub fn passed(&self) -> bool {
        self.filter_outputs_identical != Some(false) && self.checks.iter().all(|c| c.passed)
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(identical) = self.filter_outputs_identical {
            writeln!(f, "filter outputs identical: {}", identical)?;
        }
        for check in &self.checks {
            writeln!(f, "{}", check)?;
        }
        Ok(())
    }
}

fn load_input(manifest: &Manifest) -> Result<Vec<f32>> {
    match &manifest.input {
        InputSpec::Hexdump(path) => read_hexdump(&manifest.resolve(path)),
        InputSpec::Tones {
            sample_rate,
            samples,
            tones,
        } => {
            let tones: Vec<_> = tones.iter().map(|t| t.tone()).collect();
            let signal = signal::sum_of_tones(*samples, &tones, *sample_rate)?;
            Ok(signal.into_iter().map(|x| x as f32).collect())
        }
    }
}

/// Run every comparison the manifest describes.
pub fn run(manifest: &Manifest) -> Result<RunReport> {
    let input = load_input(manifest).context("failed to load input signal")?;
    info!("input signal: {} samples", input.len());
    let mut report = RunReport::default();

    if let Some(filter) = &manifest.filter {
        let outputs = filter
            .outputs
            .iter()
            .map(|p| read_hexdump(&manifest.resolve(p)))
            .collect::<Result<Vec<_>>>()?;
        let identical = outputs
            .windows(2)
            .all(|pair| metrics::identical(&pair[0], &pair[1]));
        if !identical {
            warn!("device filter outputs differ from each other");
        }
        report.filter_outputs_identical = Some(identical);

        let first = outputs
            .first()
            .context("filter section lists no device outputs")?;
        let sections = filter.coefficients.sections();
        let errors = verify::verify_filter(&input, &sections, first)
            .context("filter comparison failed")?;
        report
            .checks
            .push(Check::new("filter", errors, filter.tolerance));
    }

    if let Some(rfft) = &manifest.rfft {
        let packed = read_hexdump(&manifest.resolve(&rfft.output))?;
        let bins = reference::rfft(&input, rfft.size);
        let errors =
            verify::verify_spectrum(&bins, &packed).context("rfft comparison failed")?;
        report.checks.push(Check::new(
            "rfft magnitude",
            errors.magnitude,
            rfft.magnitude_tolerance,
        ));
        report
            .checks
            .push(Check::new("rfft phase", errors.phase, rfft.phase_tolerance));
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_c_style_sample_lists() {
        let samples = parse_samples("0.5f, -1.25\n3e2 4F").unwrap();
        assert_eq!(samples, vec![0.5, -1.25, 300.0, 4.0]);
        assert!(parse_samples("1.0 abc").is_err());
        assert!(parse_samples("  \n").unwrap().is_empty());

        // what `decode` prints for non-finite samples reads back
        let special = parse_samples("inf, -inf NaN 1e3f").unwrap();
        assert_eq!(special[0], f32::INFINITY);
        assert_eq!(special[1], f32::NEG_INFINITY);
        assert!(special[2].is_nan());
        assert_eq!(special[3], 1000.0);
    }

    #[test]
    fn check_applies_tolerance() {
        let report = ErrorReport {
            max_abs: 0.01,
            max_rel: 0.5,
        };
        let loose = Check::new("x", report, Tolerance::default());
        assert!(loose.passed);
        let tight = Check::new(
            "x",
            report,
            Tolerance {
                max_abs: Some(0.001),
                max_rel: None,
            },
        );
        assert!(!tight.passed);
        assert!(tight.to_string().ends_with("[FAIL]"));
    }

    #[test]
    fn run_report_fails_on_disagreeing_outputs() {
        let report = RunReport {
            filter_outputs_identical: Some(false),
            checks: vec![],
        };
        assert!(!report.passed());
        assert!(RunReport::default().passed());
    }
}
