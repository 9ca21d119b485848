// ==============================================================================
// parsers/vcf.rs - VCF record counting and CSQ annotation analysis
// ==============================================================================
// Description: Streaming text parser for raw and VEP-annotated VCF files
// Author: Matt Barham
// Created: 2026-10-19
// Modified: 2026-10-19
// Version: 1.0.0
// ==============================================================================
// References:
// - VCF 4.2 Spec: https://samtools.github.io/hts-specs/VCFv4.2.pdf
// - VEP VCF output: https://www.ensembl.org/info/docs/tools/vep/vep_formats.html
// ==============================================================================
// Format: Tab-delimited text, optionally gzip/BGZF compressed
// Example (annotated):
//   ##INFO=<ID=CSQ,Number=.,Type=String,Description="Consequence annotations ...">
//   #CHROM  POS  ID  REF  ALT  QUAL  FILTER  INFO
//   chr1    100  .   A    T    50    PASS    DP=30;CSQ=T|missense|...,T|intron|...
// ==============================================================================

use flate2::read::MultiGzDecoder;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Header line prefix declaring the VEP CSQ INFO field
const CSQ_HEADER_PREFIX: &str = "##INFO=<ID=CSQ";

/// Marker for the CSQ key inside the INFO column
const CSQ_KEY: &str = "CSQ=";

/// Fixed VCF columns: CHROM POS ID REF ALT QUAL FILTER INFO
const FIXED_COLUMNS: usize = 8;

/// VCF reading errors
#[derive(Error, Debug)]
pub enum VCFParseError {
    #[error("Failed to open VCF file {path}: {source}")]
    FileOpenError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read VCF file {path} at line {line}: {source}")]
    ReadError {
        path: PathBuf,
        line: usize,
        #[source]
        source: std::io::Error,
    },
}

/// Open a VCF as buffered text, decompressing when the path ends in `.gz`
///
/// Multi-member gzip streams (BGZF, as written by bgzip/VEP) are read to the end.
pub fn open_text(path: impl AsRef<Path>) -> Result<Box<dyn BufRead>, VCFParseError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| VCFParseError::FileOpenError {
        path: path.to_path_buf(),
        source,
    })?;

    if is_gzipped(path) {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

fn is_gzipped(path: &Path) -> bool {
    path.to_string_lossy().ends_with(".gz")
}

/// Count every line that does not begin with `#`
///
/// Blank lines are counted as records; no column validation is applied.
pub fn count_non_header(path: impl AsRef<Path>) -> Result<u64, VCFParseError> {
    let path = path.as_ref();
    let reader = open_text(path)?;

    let mut count = 0;
    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result.map_err(|source| VCFParseError::ReadError {
            path: path.to_path_buf(),
            line: line_num + 1,
            source,
        })?;

        if !line.starts_with('#') {
            count += 1;
        }
    }

    debug!("Counted {} non-header lines in {}", count, path.display());
    Ok(count)
}

/// Identity of a variant within one VCF: (CHROM, POS, REF, ALT)
///
/// Fields are kept as the raw column text; `chr1` and `1` are distinct keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VariantKey {
    pub chromosome: String,
    pub position: String,
    pub ref_allele: String,
    pub alt_allele: String,
}

/// Aggregate CSQ statistics for one annotated VCF
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationStats {
    /// Data lines with at least 8 columns
    pub total_records: u64,

    /// Records whose INFO column contains `CSQ=`
    pub records_with_csq: u64,

    /// `##INFO=<ID=CSQ` header line seen
    pub csq_header_present: bool,

    /// Distinct variant keys among CSQ-bearing records
    pub unique_variants: u64,

    /// Comma-separated CSQ entries summed over all records
    pub csq_entries_total: u64,

    /// Variant keys whose accumulated entry count exceeds 1
    pub variants_with_multiple_csq: u64,
}

/// Streaming analyzer for VEP-annotated VCF files
#[derive(Debug, Default)]
pub struct AnnotationAnalyzer {
    stats: AnnotationStats,

    /// CSQ entry count accumulated per variant key (keys double as the unique set)
    entries_per_variant: HashMap<VariantKey, u64>,

    /// Count of data lines with fewer than 8 columns (for reporting)
    skipped_count: usize,
}

impl AnnotationAnalyzer {
    /// Create new analyzer with empty counters
    pub fn new() -> Self {
        Self::default()
    }

    /// Stream an annotated VCF and compute its CSQ statistics
    ///
    /// # Arguments
    /// * `path` - Path to annotated VCF file (can be .vcf or .vcf.gz)
    ///
    /// # Returns
    /// * `Result<AnnotationStats, VCFParseError>` - Statistics or read error
    ///
    /// # Example
    /// ```no_run
    /// use vep_output_validator::parsers::AnnotationAnalyzer;
    ///
    /// let mut analyzer = AnnotationAnalyzer::new();
    /// let stats = analyzer.analyze("results/S1_vep_output.vcf.gz")?;
    /// println!("{} of {} records carry CSQ", stats.records_with_csq, stats.total_records);
    /// # Ok::<(), vep_output_validator::parsers::VCFParseError>(())
    /// ```
    pub fn analyze(&mut self, path: impl AsRef<Path>) -> Result<AnnotationStats, VCFParseError> {
        let path = path.as_ref();
        let reader = open_text(path)?;
        self.reset();

        for (line_num, line_result) in reader.lines().enumerate() {
            let line = line_result.map_err(|source| VCFParseError::ReadError {
                path: path.to_path_buf(),
                line: line_num + 1,
                source,
            })?;
            self.observe_line(&line);
        }

        if self.skipped_count > 0 {
            debug!(
                "Skipped {} data lines with fewer than {} columns in {}",
                self.skipped_count,
                FIXED_COLUMNS,
                path.display()
            );
        }

        Ok(self.finish())
    }

    fn reset(&mut self) {
        self.stats = AnnotationStats::default();
        self.entries_per_variant.clear();
        self.skipped_count = 0;
    }

    /// Feed a single line (without its trailing newline)
    fn observe_line(&mut self, line: &str) {
        if line.starts_with(CSQ_HEADER_PREFIX) {
            self.stats.csq_header_present = true;
        }

        if line.starts_with('#') {
            return;
        }

        let columns: Vec<&str> = line.split('\t').collect();
        if columns.len() < FIXED_COLUMNS {
            self.skipped_count += 1;
            return;
        }

        self.stats.total_records += 1;

        let info = columns[7];
        let Some(csq_start) = info.find(CSQ_KEY) else {
            return;
        };

        self.stats.records_with_csq += 1;

        let key = VariantKey {
            chromosome: columns[0].to_string(),
            position: columns[1].to_string(),
            ref_allele: columns[3].to_string(),
            alt_allele: columns[4].to_string(),
        };

        // An empty value still splits into one (empty) entry
        let csq_value = info[csq_start + CSQ_KEY.len()..]
            .split(';')
            .next()
            .unwrap_or_default();
        let entries = csq_value.split(',').count() as u64;

        self.stats.csq_entries_total += entries;
        *self.entries_per_variant.entry(key).or_insert(0) += entries;
    }

    /// Finalize per-variant counters into a statistics snapshot
    fn finish(&self) -> AnnotationStats {
        let mut stats = self.stats.clone();
        stats.unique_variants = self.entries_per_variant.len() as u64;
        stats.variants_with_multiple_csq = self
            .entries_per_variant
            .values()
            .filter(|&&n| n > 1)
            .count() as u64;
        stats
    }
}
