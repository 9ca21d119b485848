// ==============================================================================
// validator.rs - Discrepancy Checks
// ==============================================================================
// Description: Flags inconsistencies between raw and VEP-annotated outputs
// Author: Matt Barham
// Created: 2026-10-19
// Modified: 2026-10-19
// Version: 1.0.0
// ==============================================================================

use std::fmt;

use crate::models::SampleRecord;
use crate::parsers::AnnotationStats;

/// A single discrepancy flag written to the report `note` column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discrepancy {
    /// Raw and annotated record counts are both known and differ
    CountMismatch,
    /// No annotated VCF could be located for the sample
    AnnotatedNotFound,
    /// No `##INFO=<ID=CSQ` header line (also raised when the file was not found)
    CsqHeaderMissing,
}

impl Discrepancy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Discrepancy::CountMismatch => "raw_vs_annotated_count_mismatch",
            Discrepancy::AnnotatedNotFound => "annotated_not_found",
            Discrepancy::CsqHeaderMissing => "CSQ_header_missing",
        }
    }
}

impl fmt::Display for Discrepancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Run all checks for one sample, in report order
pub fn check_discrepancies(
    record: &SampleRecord,
    raw_count: Option<u64>,
    annotation: Option<&AnnotationStats>,
) -> Vec<Discrepancy> {
    let mut flags = Vec::new();

    if let (Some(raw), Some(stats)) = (raw_count, annotation) {
        if raw != stats.total_records {
            flags.push(Discrepancy::CountMismatch);
        }
    }

    if record.annotated_vcf.is_none() {
        flags.push(Discrepancy::AnnotatedNotFound);
    }

    if !annotation.map(|stats| stats.csq_header_present).unwrap_or(false) {
        flags.push(Discrepancy::CsqHeaderMissing);
    }

    flags
}

/// Join flags with `;` for the report; empty when nothing fired
pub fn format_notes(flags: &[Discrepancy]) -> String {
    flags
        .iter()
        .map(Discrepancy::as_str)
        .collect::<Vec<_>>()
        .join(";")
}
