// ==============================================================================
// parsers/manifest.rs - Sample Manifest Parser
// ==============================================================================
// Description: Parser for the pipeline sample sheet (sample name + raw VCF path)
// Author: Matt Barham
// Created: 2026-10-19
// Modified: 2026-10-19
// Version: 1.0.0
// ==============================================================================
// Format: CSV file with header
// Example:
//   sample_name,vcf_path
//   S1,~/data/S1.vcf.gz
//   S2,/data/raw/S2.vcf
// ==============================================================================

use csv::{ReaderBuilder, StringRecord};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

/// Accepted column names for the sample identifier, in priority order
pub const SAMPLE_COLUMNS: [&str; 3] = ["sample_name", "sample", "name"];

/// Accepted column names for the raw VCF path, in priority order
pub const VCF_COLUMNS: [&str; 2] = ["vcf_path", "vcf"];

/// One manifest row
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestEntry {
    /// Sample identifier
    pub sample: String,

    /// Raw (pre-annotation) VCF, with `~` expanded; None when the row has no path
    pub raw_vcf: Option<PathBuf>,
}

/// Errors that can occur during manifest parsing
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Manifest has no sample column (expected one of: {})", SAMPLE_COLUMNS.join(", "))]
    MissingSampleColumn,
}

/// Manifest parser
pub struct ManifestParser;

impl ManifestParser {
    /// Parse the sample manifest
    ///
    /// # Arguments
    /// * `path` - Path to the manifest CSV (samples.csv)
    ///
    /// # Returns
    /// * `Ok(Vec<ManifestEntry>)` - Entries in file order
    /// * `Err(ManifestError)` - Parse error
    ///
    /// # Column aliases
    /// The first non-empty value wins:
    /// - sample: `sample_name`, `sample`, `name`
    /// - raw VCF: `vcf_path`, `vcf`
    ///
    /// Rows without any sample value are skipped with a warning.
    pub fn parse(path: impl AsRef<Path>) -> Result<Vec<ManifestEntry>, ManifestError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path.as_ref())?;

        let headers = reader.headers()?.clone();
        let sample_idx = Self::column_indices(&headers, &SAMPLE_COLUMNS);
        let vcf_idx = Self::column_indices(&headers, &VCF_COLUMNS);

        if sample_idx.is_empty() {
            return Err(ManifestError::MissingSampleColumn);
        }

        let mut entries = Vec::new();
        for (idx, result) in reader.records().enumerate() {
            let record = result?;

            let Some(sample) = Self::first_value(&record, &sample_idx) else {
                // Row 1 is the header
                warn!("Manifest row {} has no sample identifier, skipping", idx + 2);
                continue;
            };

            let raw_vcf = Self::first_value(&record, &vcf_idx).map(expand_tilde);

            entries.push(ManifestEntry {
                sample: sample.to_string(),
                raw_vcf,
            });
        }

        Ok(entries)
    }

    /// Positions of the alias columns present in the header, in alias priority order
    fn column_indices(headers: &StringRecord, aliases: &[&str]) -> Vec<usize> {
        aliases
            .iter()
            .filter_map(|alias| headers.iter().position(|h| h == *alias))
            .collect()
    }

    /// First non-empty value among the given columns
    fn first_value<'r>(record: &'r StringRecord, indices: &[usize]) -> Option<&'r str> {
        indices
            .iter()
            .filter_map(|&i| record.get(i))
            .find(|value| !value.is_empty())
    }
}

/// Expand a leading `~` to the user's home directory
///
/// Paths without a leading `~`, or when HOME is unset, are returned unchanged.
pub fn expand_tilde(path: &str) -> PathBuf {
    let home = std::env::var_os("HOME").map(PathBuf::from);

    match (path.strip_prefix('~'), home) {
        (Some(""), Some(home)) => home,
        (Some(rest), Some(home)) if rest.starts_with('/') => home.join(&rest[1..]),
        _ => PathBuf::from(path),
    }
}
