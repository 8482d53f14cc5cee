// ==============================================================================
// models.rs - Annotation Pipeline Data Models
// ==============================================================================
// Description: Variant records, HGVS identifiers and summary results
// Author: Matt Barham
// Created: 2025-11-20
// Modified: 2025-11-24
// Version: 1.1.0
// ==============================================================================

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// One data row of the input VCF, reduced to the fields needed for annotation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantRecord {
    /// Chromosome name exactly as written in the CHROM column (e.g., "chr16")
    pub chromosome: String,

    /// 1-based position
    pub position: u64,

    /// Reference allele
    pub ref_allele: String,

    /// First alternate allele (further ALT alleles are ignored)
    pub alt_allele: String,
}

/// HGVS-style genomic identifier: `<chrom>:g.<pos><ref>><alt>`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VariantIdentifier(String);

impl VariantIdentifier {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&VariantRecord> for VariantIdentifier {
    fn from(record: &VariantRecord) -> Self {
        Self(format!(
            "{}:g.{}{}>{}",
            record.chromosome, record.position, record.ref_allele, record.alt_allele
        ))
    }
}

impl fmt::Display for VariantIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Genome build requested from the annotation service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenomeBuild {
    /// GRCh38 (adds `hg38=true` to the request)
    Hg38,
    /// GRCh37, the service default (no build parameter sent)
    Hg19,
}

impl GenomeBuild {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenomeBuild::Hg38 => "hg38",
            GenomeBuild::Hg19 => "hg19",
        }
    }

    /// Form parameter appended to the request body, if any
    pub fn assembly_flag(&self) -> Option<&'static str> {
        match self {
            GenomeBuild::Hg38 => Some("hg38=true"),
            GenomeBuild::Hg19 => None,
        }
    }

    /// Build name understood by the VCF visualization service
    pub fn grc_name(&self) -> &'static str {
        match self {
            GenomeBuild::Hg38 => "GRCh38",
            GenomeBuild::Hg19 => "GRCh37",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "hg38" | "grch38" => Some(GenomeBuild::Hg38),
            "hg19" | "grch37" => Some(GenomeBuild::Hg19),
            _ => None,
        }
    }
}

/// How the persisted annotation document is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
    /// Line-oriented substring matching on the raw text
    Text,
    /// Parsed JSON, queried by field name
    Structured,
}

impl ScanMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanMode::Text => "text",
            ScanMode::Structured => "structured",
        }
    }
}

/// Answers to the four summary questions for one annotation document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryCounts {
    pub scan_mode: ScanMode,

    /// Unique gene names, sorted
    pub gene_names: BTreeSet<String>,

    /// Variants with putative_impact "MODIFIER"
    pub modifier_count: usize,

    /// Variants carrying a mutationtaster annotation
    pub mutationtaster_count: usize,

    /// Variants with consequence "NON_SYNONYMOUS"
    pub non_synonymous_count: usize,
}

impl SummaryCounts {
    pub fn gene_count(&self) -> usize {
        self.gene_names.len()
    }
}
