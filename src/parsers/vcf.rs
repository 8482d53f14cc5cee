// ==============================================================================
// parsers/vcf.rs - VCF variant loader
// ==============================================================================
// Description: Reads the leading records of a VCF file as HGVS identifiers
// Author: Matt Barham
// Created: 2025-11-20
// Modified: 2025-11-24
// Version: 1.1.0
// ==============================================================================
// References:
// - VCF 4.2 Spec: https://samtools.github.io/hts-specs/VCFv4.2.pdf
// - noodles-vcf: https://docs.rs/noodles-vcf/0.81.0/noodles_vcf/
// - HGVS genomic notation: https://hgvs-nomenclature.org/stable/recommendations/DNA/substitution/
// ==============================================================================

use noodles_vcf as vcf;
use noodles_vcf::variant::record::AlternateBases;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::DEFAULT_MAX_BATCH_SIZE;
use crate::models::{VariantIdentifier, VariantRecord};

/// VCF loading errors
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Input VCF file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("Failed to open VCF file: {0}")]
    FileOpenError(String),

    #[error("Failed to read VCF header: {0}")]
    HeaderError(String),

    #[error("Malformed VCF record {record}: {reason}")]
    Malformed { record: usize, reason: String },
}

/// Loads at most `max_records` data records from a VCF file
pub struct VariantLoader {
    pub max_records: usize,
}

impl Default for VariantLoader {
    fn default() -> Self {
        Self {
            max_records: DEFAULT_MAX_BATCH_SIZE,
        }
    }
}

impl VariantLoader {
    pub fn new(max_records: usize) -> Self {
        Self { max_records }
    }

    /// Load identifiers for the first `max_records` variants
    ///
    /// # Arguments
    /// * `path` - Path to VCF file (can be .vcf or bgzipped .vcf.gz)
    ///
    /// # Returns
    /// * `Ok(Vec<VariantIdentifier>)` - One identifier per record, in file order
    /// * `Err(LoadError)` - Missing file or any malformed record (no partial results)
    ///
    /// # Example
    /// ```no_run
    /// use genetics_annotator::parsers::VariantLoader;
    ///
    /// let ids = VariantLoader::new(900).load("chr16.vcf")?;
    /// println!("Loaded {} variants", ids.len());
    /// # Ok::<(), genetics_annotator::parsers::LoadError>(())
    /// ```
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Vec<VariantIdentifier>, LoadError> {
        let records = self.load_records(path)?;
        Ok(records.iter().map(VariantIdentifier::from).collect())
    }

    /// Load the leading records without converting them to identifiers
    pub fn load_records(&self, path: impl AsRef<Path>) -> Result<Vec<VariantRecord>, LoadError> {
        let path = path.as_ref();

        let mut reader = vcf::io::reader::Builder::default()
            .build_from_path(path)
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => LoadError::InputNotFound(path.to_path_buf()),
                _ => LoadError::FileOpenError(format!("{}: {}", path.display(), e)),
            })?;

        reader
            .read_header()
            .map_err(|e| LoadError::HeaderError(format!("{}", e)))?;

        let mut records = Vec::new();

        for (index, result) in reader.records().take(self.max_records).enumerate() {
            let record_num = index + 1;

            let record = result.map_err(|e| LoadError::Malformed {
                record: record_num,
                reason: format!("Failed to read record: {}", e),
            })?;

            let variant = Self::parse_record(&record).map_err(|reason| LoadError::Malformed {
                record: record_num,
                reason,
            })?;

            records.push(variant);
        }

        info!(
            "Loaded {} variants from {} (limit {})",
            records.len(),
            path.display(),
            self.max_records
        );

        Ok(records)
    }

    /// Extract CHROM, POS, REF and the first ALT from one record
    fn parse_record(record: &vcf::Record) -> Result<VariantRecord, String> {
        let chromosome = record.reference_sequence_name().to_string();
        if chromosome.is_empty() {
            return Err("Missing chromosome".to_string());
        }

        let position = match record.variant_start() {
            Some(Ok(pos)) => usize::from(pos) as u64,
            Some(Err(e)) => return Err(format!("Failed to get position: {}", e)),
            None => return Err("Missing position".to_string()),
        };

        let ref_allele = record.reference_bases().to_string();
        if ref_allele.is_empty() {
            return Err("Missing REF allele".to_string());
        }

        // Only the first ALT allele is annotated
        let alt_alleles = record.alternate_bases();
        let alt_allele = match alt_alleles.iter().next() {
            Some(Ok(alt)) => alt.to_string(),
            Some(Err(e)) => return Err(format!("Failed to get ALT allele: {}", e)),
            None => return Err("Missing ALT allele".to_string()),
        };

        if alt_alleles.len() > 1 {
            debug!(
                "Multi-allelic site {}:{}, using first ALT {}",
                chromosome, position, alt_allele
            );
        }

        Ok(VariantRecord {
            chromosome,
            position,
            ref_allele,
            alt_allele,
        })
    }
}
