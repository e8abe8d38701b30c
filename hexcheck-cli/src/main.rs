use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hexcheck::hexdump;
use hexcheck::metrics;
use hexcheck_cli::manifest::{Manifest, Tolerance};
use hexcheck_cli::{parse_samples, read_hexdump, run, Check};
use log::LevelFilter;
use std::fs;
use std::path::PathBuf;

/// Compare CMSIS-DSP hexdumps with reference filter and FFT results.
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Log decoding and comparison details
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the samples of a hexdump, one per line
    Decode {
        /// Hexdump file
        input: PathBuf,
    },
    /// Turn a list of decimal samples into a hexdump
    Encode {
        /// File with whitespace or comma separated samples
        input: PathBuf,
    },
    /// Compare two hexdumps, the first one being the reference
    Compare {
        reference: PathBuf,
        candidate: PathBuf,
        /// Fail when the max absolute error exceeds this value
        #[arg(long)]
        max_abs: Option<f64>,
        /// Fail when the max relative error exceeds this value
        #[arg(long)]
        max_rel: Option<f64>,
    },
    /// Run the filter and RFFT comparisons described by a JSON manifest
    Run {
        manifest: PathBuf,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let passed = match cli.command {
        Commands::Decode { input } => {
            for sample in read_hexdump(&input)? {
                println!("{}", sample);
            }
            true
        }
        Commands::Encode { input } => {
            let text = fs::read_to_string(&input)
                .with_context(|| format!("failed to read {}", input.display()))?;
            print!("{}", hexdump::encode_f32(&parse_samples(&text)?));
            true
        }
        Commands::Compare {
            reference,
            candidate,
            max_abs,
            max_rel,
        } => {
            let reference = read_hexdump(&reference)?;
            let candidate = read_hexdump(&candidate)?;
            let report = metrics::compare(
                &hexcheck::verify::widen(&reference),
                &hexcheck::verify::widen(&candidate),
            )?;
            let check = Check::new("compare", report, Tolerance { max_abs, max_rel });
            println!("{}", check);
            check.passed
        }
        Commands::Run { manifest, json } => {
            let manifest = Manifest::load(&manifest)?;
            let report = run(&manifest)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", report);
            }
            report.passed()
        }
    };

    if !passed {
        std::process::exit(1);
    }
    Ok(())
}
