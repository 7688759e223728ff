use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cnossos_road::catalog::{defaults, RoadNoiseCatalog};
use cnossos_road::emission::SegmentCalculator;
use cnossos_road::scenario::Scenario;
use cnossos_road::spectrum::OCTAVE_BANDS_HZ;

#[derive(Parser, Debug)]
#[command(
    name = "road_noise_cli",
    about = "CNOSSOS-EU road-traffic source-emission calculator"
)]
struct Cli {
    /// Catalogue JSON file (defaults to the built-in reference catalogue)
    #[arg(long)]
    catalog: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compute the emission spectrum for a scenario file
    Compute {
        #[arg(long)]
        scenario: PathBuf,
        /// Write the full intermediate trace as CSV
        #[arg(long)]
        trace: Option<PathBuf>,
        /// Write the result (total spectrum, trace, warnings) as JSON
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// List the catalogue's categories, surfaces, and reference constants
    DumpCatalog,
    /// Print the octave-band table
    Bands,
}

fn main() -> ExitCode {
    cnossos_road::init_logging();
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    let catalog = match &cli.catalog {
        Some(path) => RoadNoiseCatalog::load_from_file(path),
        None => defaults::reference_catalog().clone(),
    };

    match cli.command {
        Commands::Compute {
            scenario,
            trace,
            output,
        } => {
            let scenario = Scenario::load_from_file(&scenario)
                .with_context(|| format!("loading scenario {}", scenario.display()))?;
            let segment = scenario
                .bind(&catalog)
                .context("binding scenario against the catalogue")?;

            let result = SegmentCalculator::new(&catalog, &segment).calc();

            println!("Segment: {}", scenario.name);
            println!("Source height: {} m", result.src_height_m);
            println!("Total sound power spectrum [dB]:");
            for (band, level) in result.total.iter() {
                println!("  {:>5} Hz  {:>8.2}", OCTAVE_BANDS_HZ[band], level);
            }
            if result.warnings > 0 {
                eprintln!("Completed with {} warning(s), see log", result.warnings);
            }

            if let Some(path) = trace {
                fs::write(&path, result.trace.to_csv())
                    .with_context(|| format!("writing trace {}", path.display()))?;
                println!("Trace written to {}", path.display());
            } else if scenario.debug_output {
                print!("{}", result.trace.to_csv());
            }

            if let Some(path) = output {
                let json = serde_json::to_string_pretty(&result)?;
                fs::write(&path, json)
                    .with_context(|| format!("writing result {}", path.display()))?;
                println!("Result written to {}", path.display());
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::DumpCatalog => {
            println!(
                "Reference: speed {} km/h, temperature {} degC, minimum speed {} km/h, source height {} m",
                catalog.ref_speed_kmh,
                catalog.ref_temp_c,
                catalog.min_speed_kmh,
                catalog.src_height_m
            );
            println!("Categories:");
            for cat in &catalog.categories {
                println!(
                    "  {:>3}  {} (rolling: {}, propulsion: {}, studded: {})",
                    cat.id,
                    cat.description,
                    cat.rolling_noise,
                    cat.propulsion_noise,
                    cat.studded.is_some()
                );
            }
            println!("Surfaces:");
            for surface in &catalog.surfaces {
                println!(
                    "  {:>6}  {} (valid {}-{} km/h)",
                    surface.id, surface.description, surface.v_min, surface.v_max
                );
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Bands => {
            for hz in OCTAVE_BANDS_HZ {
                println!("{}", hz);
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}
