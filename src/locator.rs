// ==============================================================================
// locator.rs - Annotated VCF Locator
// ==============================================================================
// Description: Resolves the VEP output file for a sample inside a project dir
// Author: Matt Barham
// Created: 2026-10-19
// Modified: 2026-10-19
// Version: 1.0.0
// ==============================================================================
// Search order:
//   1. results/{sample}_vep_output.vcf
//   2. results/{sample}_vep_output.vcf.gz
//   3. {sample}_vep_output.vcf
//   4. {sample}_vep_output.vcf.gz
//   5. first file in results/ (sorted by name) containing both the sample
//      name and "vep_output", ending in .vcf or .gz
// ==============================================================================

use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Pipeline output directory under the project root
pub const RESULTS_DIR: &str = "results";

/// Filename marker for VEP output files
const VEP_OUTPUT_MARKER: &str = "vep_output";

/// Accepted annotated file endings for the directory scan
const ANNOTATED_SUFFIXES: [&str; 2] = [".vcf", ".gz"];

/// Locate the annotated VCF for `sample`, or None if nothing matches
pub fn locate_annotated(project_dir: &Path, sample: &str) -> Option<PathBuf> {
    let results_dir = project_dir.join(RESULTS_DIR);

    let candidates = [
        results_dir.join(format!("{}_vep_output.vcf", sample)),
        results_dir.join(format!("{}_vep_output.vcf.gz", sample)),
        project_dir.join(format!("{}_vep_output.vcf", sample)),
        project_dir.join(format!("{}_vep_output.vcf.gz", sample)),
    ];

    if let Some(found) = candidates.into_iter().find(|p| p.exists()) {
        debug!("Located annotated VCF for {}: {:?}", sample, found);
        return Some(found);
    }

    scan_results_dir(&results_dir, sample)
}

/// Non-recursive fallback scan of the results directory
fn scan_results_dir(results_dir: &Path, sample: &str) -> Option<PathBuf> {
    if !results_dir.is_dir() {
        debug!("Results directory {:?} does not exist", results_dir);
        return None;
    }

    debug!("Scanning {:?} for {} annotated output", results_dir, sample);

    let matches: Vec<PathBuf> = WalkDir::new(results_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        // publishDir links are followed to their target
        .filter(|entry| entry.path().is_file())
        .filter(|entry| is_annotated_name(&entry.file_name().to_string_lossy(), sample))
        .map(|entry| entry.into_path())
        .collect();

    if matches.len() > 1 {
        warn!(
            "{} annotated candidates match sample {}, using {:?}: {:?}",
            matches.len(),
            sample,
            matches[0],
            matches
        );
    }

    matches.into_iter().next()
}

fn is_annotated_name(file_name: &str, sample: &str) -> bool {
    file_name.contains(sample)
        && file_name.contains(VEP_OUTPUT_MARKER)
        && ANNOTATED_SUFFIXES.iter().any(|suffix| file_name.ends_with(suffix))
}
