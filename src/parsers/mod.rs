// ==============================================================================
// parsers/mod.rs - File parser modules
// ==============================================================================
// Description: Parsers for raw/annotated VCF files and the sample manifest
// Author: Matt Barham
// Created: 2026-10-19
// Modified: 2026-10-19
// Version: 1.0.0
// ==============================================================================

pub mod vcf;
pub mod manifest;

pub use vcf::{count_non_header, open_text, AnnotationAnalyzer, AnnotationStats, VariantKey, VCFParseError};
pub use manifest::{ManifestEntry, ManifestError, ManifestParser};
