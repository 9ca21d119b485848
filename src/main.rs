// ==============================================================================
// main.rs - VEP Output Validator Entry Point
// ==============================================================================
// Description: Post-run validation of Nextflow VEP annotated VCFs
// Author: Matt Barham
// Created: 2026-10-19
// Modified: 2026-10-19
// Version: 1.0.0
// ==============================================================================
// Output: {project}/results/validation_report_nextflow.csv
// ==============================================================================

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vep_output_validator::parsers::manifest::expand_tilde;
use vep_output_validator::processor::{RunOutcome, ValidationProcessor, ValidatorConfig};

const DEFAULT_PROJECT_DIR: &str = "~/clovertex_assignment/assignment_2_nextflow_pipeline";

#[derive(Parser, Debug)]
#[command(author, version, about = "Validate VEP annotated VCFs from Nextflow run", long_about = None)]
struct Args {
    /// Path to assignment_2_nextflow_pipeline folder
    #[arg(long, env = "VEP_VALIDATOR_PROJECT", default_value = DEFAULT_PROJECT_DIR)]
    project: String,

    /// Manifest CSV relative to project folder
    #[arg(long, env = "VEP_VALIDATOR_MANIFEST", default_value = "samples.csv")]
    manifest: PathBuf,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vep_output_validator=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let project_dir = expand_tilde(&args.project);
    let project_dir = project_dir.canonicalize().unwrap_or(project_dir);
    info!("Project directory: {:?}", project_dir);

    let processor = ValidationProcessor::new(ValidatorConfig::new(project_dir, args.manifest));

    match processor.run()? {
        RunOutcome::ManifestMissing(path) => {
            println!("ERROR: manifest not found: {}", path.display());
        }
        RunOutcome::Completed { report_path, rows } => {
            println!("Validation report written to: {}", report_path.display());
            for row in &rows {
                println!("{}", row.summary());
            }
        }
    }

    Ok(())
}
