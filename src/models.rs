// ==============================================================================
// models.rs - Validation Data Models
// ==============================================================================
// Description: Data structures for per-sample VEP output validation
// Author: Matt Barham
// Created: 2026-10-19
// Modified: 2026-10-19
// Version: 1.0.0
// ==============================================================================

use serde::{Serialize, Serializer};
use std::fmt;
use std::path::PathBuf;

use crate::parsers::AnnotationStats;

/// A pipeline sample with its resolved input/output files
#[derive(Debug, Clone, PartialEq)]
pub struct SampleRecord {
    /// Sample identifier from the manifest
    pub sample: String,

    /// Raw VCF listed in the manifest
    pub raw_vcf: Option<PathBuf>,

    /// Annotated VCF resolved by the locator; None if not found
    pub annotated_vcf: Option<PathBuf>,
}

/// One row of validation_report_nextflow.csv
///
/// Field order is the report column order. Absent counts serialize as empty cells.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub sample: String,
    pub raw_vcf_path: String,
    pub annotated_vcf_path: String,
    pub vcf_total_records_raw: Option<u64>,
    pub annotated_total_records: Option<u64>,
    #[serde(rename = "vcf_records_with_CSQ")]
    pub vcf_records_with_csq: Option<u64>,
    #[serde(serialize_with = "serialize_flag")]
    pub csq_header_present: bool,
    pub annotated_unique_variants_count: Option<u64>,
    pub csq_entries_total: Option<u64>,
    pub variants_with_multiple_csq_entries: Option<u64>,
    pub note: String,
}

/// Report column names, in output order
pub const REPORT_COLUMNS: [&str; 11] = [
    "sample",
    "raw_vcf_path",
    "annotated_vcf_path",
    "vcf_total_records_raw",
    "annotated_total_records",
    "vcf_records_with_CSQ",
    "csq_header_present",
    "annotated_unique_variants_count",
    "csq_entries_total",
    "variants_with_multiple_csq_entries",
    "note",
];

impl ReportRow {
    /// Merge a resolved sample with its counts
    ///
    /// `annotation` is None when the annotated file was not found; the header
    /// flag then defaults to false.
    pub fn new(
        record: &SampleRecord,
        raw_count: Option<u64>,
        annotation: Option<&AnnotationStats>,
        note: String,
    ) -> Self {
        Self {
            sample: record.sample.clone(),
            raw_vcf_path: display_path(record.raw_vcf.as_ref()),
            annotated_vcf_path: display_path(record.annotated_vcf.as_ref()),
            vcf_total_records_raw: raw_count,
            annotated_total_records: annotation.map(|a| a.total_records),
            vcf_records_with_csq: annotation.map(|a| a.records_with_csq),
            csq_header_present: annotation.map(|a| a.csq_header_present).unwrap_or(false),
            annotated_unique_variants_count: annotation.map(|a| a.unique_variants),
            csq_entries_total: annotation.map(|a| a.csq_entries_total),
            variants_with_multiple_csq_entries: annotation.map(|a| a.variants_with_multiple_csq),
            note,
        }
    }

    /// Console summary line for this sample
    pub fn summary(&self) -> String {
        format!(
            "{}: raw={} ann={} CSQ_lines={} notes={}",
            self.sample,
            OptionalCount(self.vcf_total_records_raw),
            OptionalCount(self.annotated_total_records),
            OptionalCount(self.vcf_records_with_csq),
            self.note
        )
    }
}

/// Report booleans as `True`/`False`, matching existing downstream readers
fn serialize_flag<S: Serializer>(flag: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(if *flag { "True" } else { "False" })
}

fn display_path(path: Option<&PathBuf>) -> String {
    path.map(|p| p.display().to_string()).unwrap_or_default()
}

/// Renders absent counts as `NA` in console output
struct OptionalCount(Option<u64>);

impl fmt::Display for OptionalCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(n) => write!(f, "{}", n),
            None => write!(f, "NA"),
        }
    }
}
