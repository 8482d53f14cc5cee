// ==============================================================================
// config.rs - Annotation Run Configuration
// ==============================================================================
// Description: Paths, endpoint and limits for a single annotation run
// Author: Matt Barham
// Created: 2025-11-20
// Modified: 2025-11-24
// Version: 1.0.0
// ==============================================================================

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::models::{GenomeBuild, ScanMode};
use crate::report::BrowserLink;

pub const DEFAULT_INPUT_PATH: &str = "chr16.vcf";
pub const DEFAULT_OUTPUT_PATH: &str = "annotation.json";
pub const DEFAULT_ENDPOINT: &str = "http://myvariant.info/v1/variant";

/// Variants sent in the single batched request
pub const DEFAULT_MAX_BATCH_SIZE: usize = 900;

/// Upper bound accepted by the annotation service for one POST
pub const SERVICE_MAX_BATCH_SIZE: usize = 1000;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Invalid batch size: {0} (must be 1-{max})", max = SERVICE_MAX_BATCH_SIZE)]
    InvalidBatchSize(usize),

    #[error("Invalid endpoint URL: {0} (must start with http:// or https://)")]
    InvalidEndpoint(String),

    #[error("Invalid timeout: 0 seconds")]
    InvalidTimeout,

    #[error("Output path is empty")]
    EmptyOutputPath,
}

/// Everything a run needs, injected once at startup
#[derive(Debug, Clone)]
pub struct AnnotatorConfig {
    /// Input VCF (.vcf or bgzipped .vcf.gz)
    pub input_path: PathBuf,

    /// Where the raw annotation response is written (overwritten each run)
    pub output_path: PathBuf,

    /// Batch annotation endpoint
    pub endpoint: String,

    /// Maximum number of variants requested
    pub max_batch_size: usize,

    pub genome_build: GenomeBuild,

    /// Request timeout; None blocks until the service answers
    pub timeout_secs: Option<u64>,

    pub scan_mode: ScanMode,

    pub browser_link: BrowserLink,
}

impl Default for AnnotatorConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
            genome_build: GenomeBuild::Hg38,
            timeout_secs: None,
            scan_mode: ScanMode::Text,
            browser_link: BrowserLink::default(),
        }
    }
}

impl AnnotatorConfig {
    pub fn new(input_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: output_path.into(),
            ..Self::default()
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_max_batch_size(mut self, max: usize) -> Self {
        self.max_batch_size = max;
        self
    }

    /// Also points the browser link at the matching build
    pub fn with_genome_build(mut self, build: GenomeBuild) -> Self {
        self.genome_build = build;
        self.browser_link.build = build.grc_name().to_string();
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: Option<u64>) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn with_scan_mode(mut self, mode: ScanMode) -> Self {
        self.scan_mode = mode;
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Check limits before any file or network access
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=SERVICE_MAX_BATCH_SIZE).contains(&self.max_batch_size) {
            return Err(ConfigError::InvalidBatchSize(self.max_batch_size));
        }

        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(ConfigError::InvalidEndpoint(self.endpoint.clone()));
        }

        if self.timeout_secs == Some(0) {
            return Err(ConfigError::InvalidTimeout);
        }

        if self.output_path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyOutputPath);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_original_run() {
        let config = AnnotatorConfig::default();

        assert_eq!(config.input_path, PathBuf::from("chr16.vcf"));
        assert_eq!(config.output_path, PathBuf::from("annotation.json"));
        assert_eq!(config.endpoint, "http://myvariant.info/v1/variant");
        assert_eq!(config.max_batch_size, 900);
        assert_eq!(config.genome_build, GenomeBuild::Hg38);
        assert_eq!(config.timeout(), None);
        assert_eq!(config.scan_mode, ScanMode::Text);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_batch_size_limits() {
        let config = AnnotatorConfig::default().with_max_batch_size(0);
        assert_eq!(config.validate(), Err(ConfigError::InvalidBatchSize(0)));

        let config = AnnotatorConfig::default().with_max_batch_size(1001);
        assert_eq!(config.validate(), Err(ConfigError::InvalidBatchSize(1001)));

        let config = AnnotatorConfig::default().with_max_batch_size(1000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_endpoint_must_be_http() {
        let config = AnnotatorConfig::default().with_endpoint("ftp://myvariant.info/v1/variant");
        assert!(matches!(config.validate(), Err(ConfigError::InvalidEndpoint(_))));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = AnnotatorConfig::default().with_timeout_secs(Some(0));
        assert_eq!(config.validate(), Err(ConfigError::InvalidTimeout));

        let config = AnnotatorConfig::default().with_timeout_secs(Some(30));
        assert_eq!(config.timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_genome_build_updates_browser_link() {
        let config = AnnotatorConfig::default().with_genome_build(GenomeBuild::Hg19);
        assert_eq!(config.browser_link.build, "GRCh37");
    }
}
