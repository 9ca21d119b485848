// ==============================================================================
// processor.rs - Validation Pipeline
// ==============================================================================
// Description: Runs locate -> count raw -> analyze annotated -> notes per sample
// Author: Matt Barham
// Created: 2026-10-19
// Modified: 2026-10-19
// Version: 1.0.0
// ==============================================================================

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::locator::{locate_annotated, RESULTS_DIR};
use crate::models::{ReportRow, SampleRecord};
use crate::output::ReportWriter;
use crate::parsers::{count_non_header, AnnotationAnalyzer, ManifestEntry, ManifestParser};
use crate::validator::{check_discrepancies, format_notes};

/// Runtime settings, resolved once at startup
#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    /// Pipeline project root (holds the manifest and results/)
    pub project_dir: PathBuf,

    /// Manifest filename, relative to `project_dir`
    pub manifest: PathBuf,
}

impl ValidatorConfig {
    pub fn new(project_dir: impl Into<PathBuf>, manifest: impl Into<PathBuf>) -> Self {
        Self {
            project_dir: project_dir.into(),
            manifest: manifest.into(),
        }
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.project_dir.join(&self.manifest)
    }

    pub fn results_dir(&self) -> PathBuf {
        self.project_dir.join(RESULTS_DIR)
    }
}

/// Result of a validation run
#[derive(Debug)]
pub enum RunOutcome {
    /// Manifest file absent; no report was written
    ManifestMissing(PathBuf),

    /// Report written with one row per manifest sample
    Completed {
        report_path: PathBuf,
        rows: Vec<ReportRow>,
    },
}

pub struct ValidationProcessor {
    config: ValidatorConfig,
}

impl ValidationProcessor {
    pub fn new(config: ValidatorConfig) -> Self {
        Self { config }
    }

    /// Main validation pipeline
    ///
    /// Samples are processed strictly one after another. A missing raw or
    /// annotated file is recorded in the row; unreadable or corrupt file
    /// content aborts the run.
    pub fn run(&self) -> Result<RunOutcome> {
        let results_dir = self.config.results_dir();
        std::fs::create_dir_all(&results_dir)
            .with_context(|| format!("Failed to create results directory {:?}", results_dir))?;

        let manifest_path = self.config.manifest_path();
        if !manifest_path.exists() {
            warn!("Manifest not found: {:?}", manifest_path);
            return Ok(RunOutcome::ManifestMissing(manifest_path));
        }

        info!("Reading manifest {:?}", manifest_path);
        let entries = ManifestParser::parse(&manifest_path)
            .with_context(|| format!("Failed to parse manifest {:?}", manifest_path))?;
        info!("Validating {} samples", entries.len());

        let mut rows = Vec::with_capacity(entries.len());
        for entry in &entries {
            rows.push(self.process_sample(entry)?);
        }

        let report_path = ReportWriter::new(&results_dir).write(&rows)?;

        Ok(RunOutcome::Completed { report_path, rows })
    }

    /// Validate a single manifest sample
    pub fn process_sample(&self, entry: &ManifestEntry) -> Result<ReportRow> {
        info!("Validating sample {}", entry.sample);

        let record = SampleRecord {
            sample: entry.sample.clone(),
            raw_vcf: entry.raw_vcf.clone(),
            annotated_vcf: locate_annotated(&self.config.project_dir, &entry.sample),
        };

        let raw_count = match existing(record.raw_vcf.as_deref()) {
            Some(path) => Some(
                count_non_header(path)
                    .with_context(|| format!("Failed to count records for sample {}", record.sample))?,
            ),
            None => {
                debug!("Raw VCF for {} not available: {:?}", record.sample, record.raw_vcf);
                None
            }
        };

        let annotation = match existing(record.annotated_vcf.as_deref()) {
            Some(path) => Some(
                AnnotationAnalyzer::new()
                    .analyze(path)
                    .with_context(|| format!("Failed to analyze annotated VCF for sample {}", record.sample))?,
            ),
            None => {
                warn!("Annotated VCF not found for sample {}", record.sample);
                None
            }
        };

        let flags = check_discrepancies(&record, raw_count, annotation.as_ref());
        let note = format_notes(&flags);

        Ok(ReportRow::new(&record, raw_count, annotation.as_ref(), note))
    }
}

fn existing(path: Option<&Path>) -> Option<&Path> {
    path.filter(|p| p.exists())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const CSQ_HEADER: &str = "##INFO=<ID=CSQ,Number=.,Type=String,Description=\"Consequence annotations from Ensembl VEP\">";
    const COLUMNS_HEADER: &str = "#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO";

    fn raw_vcf(records: usize) -> String {
        let mut contents = format!("##fileformat=VCFv4.2\n{}\n", COLUMNS_HEADER);
        for pos in 1..=records {
            contents.push_str(&format!("chr1\t{}\t.\tA\tG\t50\tPASS\tDP=10\n", pos * 100));
        }
        contents
    }

    fn annotated_vcf(records: usize) -> String {
        let mut contents = format!("##fileformat=VCFv4.2\n{}\n{}\n", CSQ_HEADER, COLUMNS_HEADER);
        for pos in 1..=records {
            contents.push_str(&format!(
                "chr1\t{}\t.\tA\tG\t50\tPASS\tDP=10;CSQ=G|missense_variant,G|intron_variant\n",
                pos * 100
            ));
        }
        contents
    }

    #[test]
    fn test_missing_manifest() {
        let dir = tempdir().unwrap();
        let processor = ValidationProcessor::new(ValidatorConfig::new(dir.path(), "samples.csv"));

        match processor.run().unwrap() {
            RunOutcome::ManifestMissing(path) => {
                assert_eq!(path, dir.path().join("samples.csv"));
            }
            other => panic!("Expected ManifestMissing, got {:?}", other),
        }

        // results/ is created, but no report is written
        assert!(dir.path().join("results").is_dir());
        assert!(!dir.path().join("results/validation_report_nextflow.csv").exists());
    }

    #[test]
    fn test_sample_without_annotated_output() {
        let dir = tempdir().unwrap();
        let project = dir.path();
        fs::write(project.join("samples.csv"), "sample_name,vcf_path\nS1,\n").unwrap();

        let processor = ValidationProcessor::new(ValidatorConfig::new(project, "samples.csv"));
        let RunOutcome::Completed { report_path, rows } = processor.run().unwrap() else {
            panic!("Expected a completed run");
        };

        assert_eq!(report_path, project.join("results/validation_report_nextflow.csv"));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].sample, "S1");
        assert_eq!(rows[0].raw_vcf_path, "");
        assert_eq!(rows[0].annotated_vcf_path, "");
        assert_eq!(rows[0].vcf_total_records_raw, None);
        assert_eq!(rows[0].annotated_total_records, None);
        assert_eq!(rows[0].note, "annotated_not_found;CSQ_header_missing");

        let report = fs::read_to_string(report_path).unwrap();
        assert!(report.lines().nth(1).unwrap().starts_with("S1,,,,,,False,"));
    }

    #[test]
    fn test_count_mismatch_between_raw_and_annotated() {
        let dir = tempdir().unwrap();
        let project = dir.path();
        fs::create_dir_all(project.join("results")).unwrap();

        let raw_path = project.join("S1.vcf");
        fs::write(&raw_path, raw_vcf(50)).unwrap();
        fs::write(project.join("results/S1_vep_output.vcf"), annotated_vcf(48)).unwrap();
        fs::write(
            project.join("samples.csv"),
            format!("sample,vcf\nS1,{}\n", raw_path.display()),
        )
        .unwrap();

        let processor = ValidationProcessor::new(ValidatorConfig::new(project, "samples.csv"));
        let RunOutcome::Completed { rows, .. } = processor.run().unwrap() else {
            panic!("Expected a completed run");
        };

        let row = &rows[0];
        assert_eq!(row.vcf_total_records_raw, Some(50));
        assert_eq!(row.annotated_total_records, Some(48));
        assert_eq!(row.vcf_records_with_csq, Some(48));
        assert_eq!(row.annotated_unique_variants_count, Some(48));
        assert_eq!(row.csq_entries_total, Some(96));
        assert_eq!(row.variants_with_multiple_csq_entries, Some(48));
        assert!(row.csq_header_present);
        assert_eq!(row.note, "raw_vs_annotated_count_mismatch");
    }

    #[test]
    fn test_matching_sample_has_empty_note() {
        let dir = tempdir().unwrap();
        let project = dir.path();

        let raw_path = project.join("S2.vcf");
        fs::write(&raw_path, raw_vcf(5)).unwrap();
        fs::write(project.join("S2_vep_output.vcf"), annotated_vcf(5)).unwrap();
        fs::write(
            project.join("samples.csv"),
            format!("sample_name,vcf_path\nS2,{}\n", raw_path.display()),
        )
        .unwrap();

        let processor = ValidationProcessor::new(ValidatorConfig::new(project, "samples.csv"));
        let entry = ManifestEntry {
            sample: "S2".to_string(),
            raw_vcf: Some(raw_path),
        };
        let row = processor.process_sample(&entry).unwrap();

        assert_eq!(row.annotated_vcf_path, project.join("S2_vep_output.vcf").display().to_string());
        assert_eq!(row.note, "");
    }

    #[test]
    fn test_one_row_per_sample_in_manifest_order() {
        let dir = tempdir().unwrap();
        let project = dir.path();
        fs::create_dir_all(project.join("results")).unwrap();
        fs::write(project.join("results/B_vep_output.vcf"), annotated_vcf(2)).unwrap();
        fs::write(project.join("samples.csv"), "sample_name,vcf_path\nA,/missing/A.vcf\nB,\nC,\n").unwrap();

        let processor = ValidationProcessor::new(ValidatorConfig::new(project, "samples.csv"));
        let RunOutcome::Completed { rows, .. } = processor.run().unwrap() else {
            panic!("Expected a completed run");
        };

        let samples: Vec<&str> = rows.iter().map(|r| r.sample.as_str()).collect();
        assert_eq!(samples, vec!["A", "B", "C"]);
        assert_eq!(rows[0].raw_vcf_path, "/missing/A.vcf");
        assert_eq!(rows[0].vcf_total_records_raw, None);
        assert_eq!(rows[1].annotated_total_records, Some(2));
        assert_eq!(rows[1].note, "");
        assert_eq!(rows[2].note, "annotated_not_found;CSQ_header_missing");
    }

    #[test]
    fn test_corrupt_annotated_file_aborts_run() {
        let dir = tempdir().unwrap();
        let project = dir.path();
        fs::create_dir_all(project.join("results")).unwrap();
        fs::write(project.join("results/S1_vep_output.vcf.gz"), b"not gzip").unwrap();
        fs::write(project.join("samples.csv"), "sample_name\nS1\n").unwrap();

        let processor = ValidationProcessor::new(ValidatorConfig::new(project, "samples.csv"));
        assert!(processor.run().is_err());
    }
}
