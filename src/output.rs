// ==============================================================================
// output.rs - Validation Report Writer
// ==============================================================================
// Description: Writes per-sample validation rows to validation_report_nextflow.csv
// Author: Matt Barham
// Created: 2026-10-19
// Modified: 2026-10-19
// Version: 1.0.0
// ==============================================================================

use anyhow::{Context, Result};
use csv::WriterBuilder;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::models::{ReportRow, REPORT_COLUMNS};

/// Report filename inside the results directory
pub const REPORT_FILENAME: &str = "validation_report_nextflow.csv";

pub struct ReportWriter {
    output_dir: PathBuf,
}

impl ReportWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn report_path(&self) -> PathBuf {
        self.output_dir.join(REPORT_FILENAME)
    }

    /// Write all rows, overwriting any previous report
    ///
    /// The header row is always written, even for an empty manifest.
    pub fn write(&self, rows: &[ReportRow]) -> Result<PathBuf> {
        let path = self.report_path();
        write_report(&path, rows)
            .with_context(|| format!("Failed to write validation report {:?}", path))?;

        info!("Wrote {} report rows to {:?}", rows.len(), path);
        Ok(path)
    }
}

fn write_report(path: &Path, rows: &[ReportRow]) -> Result<()> {
    let mut writer = WriterBuilder::new().has_headers(false).from_path(path)?;

    writer.write_record(REPORT_COLUMNS)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn row(sample: &str, annotated: bool) -> ReportRow {
        ReportRow {
            sample: sample.to_string(),
            raw_vcf_path: format!("/data/{}.vcf", sample),
            annotated_vcf_path: if annotated {
                format!("/proj/results/{}_vep_output.vcf", sample)
            } else {
                String::new()
            },
            vcf_total_records_raw: Some(3),
            annotated_total_records: annotated.then_some(3),
            vcf_records_with_csq: annotated.then_some(2),
            csq_header_present: annotated,
            annotated_unique_variants_count: annotated.then_some(2),
            csq_entries_total: annotated.then_some(5),
            variants_with_multiple_csq_entries: annotated.then_some(1),
            note: if annotated {
                String::new()
            } else {
                "annotated_not_found;CSQ_header_missing".to_string()
            },
        }
    }

    #[test]
    fn test_report_columns_and_empty_cells() {
        let dir = tempdir().unwrap();
        let writer = ReportWriter::new(dir.path());

        let path = writer.write(&[row("S1", true), row("S2", false)]).unwrap();
        assert_eq!(path, dir.path().join(REPORT_FILENAME));

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], REPORT_COLUMNS.join(","));
        assert_eq!(
            lines[1],
            "S1,/data/S1.vcf,/proj/results/S1_vep_output.vcf,3,3,2,True,2,5,1,"
        );
        assert_eq!(
            lines[2],
            "S2,/data/S2.vcf,,3,,,False,,,,annotated_not_found;CSQ_header_missing"
        );
    }

    #[test]
    fn test_empty_report_has_header() {
        let dir = tempdir().unwrap();
        let path = ReportWriter::new(dir.path()).write(&[]).unwrap();

        let contents = std::fs::read_to_string(path).unwrap();
        assert_eq!(contents.trim_end(), REPORT_COLUMNS.join(","));
    }

    #[test]
    fn test_missing_output_dir_is_an_error() {
        let dir = tempdir().unwrap();
        let writer = ReportWriter::new(dir.path().join("does/not/exist"));

        assert!(writer.write(&[row("S1", true)]).is_err());
    }
}
