// ==============================================================================
// report.rs - Console Report and Summary Export
// ==============================================================================
// Description: Prints the summary answers and the VCF browser link, and
//              optionally exports them as JSON
// Author: Matt Barham
// Created: 2025-11-21
// Modified: 2025-11-24
// Version: 1.0.0
// ==============================================================================

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::annotation::AnnotationDocument;
use crate::models::{ScanMode, SummaryCounts};

pub const DEFAULT_BROWSER_URL: &str = "https://vcf.iobio.io/";

/// Link to the vcf.iobio visualization service (no request is made)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowserLink {
    pub base_url: String,
    pub species: String,
    pub build: String,
}

impl Default for BrowserLink {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BROWSER_URL.to_string(),
            species: "Human".to_string(),
            build: "GRCh38".to_string(),
        }
    }
}

impl fmt::Display for BrowserLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}?species={}&build={}", self.base_url, self.species, self.build)
    }
}

/// Human-readable report lines, in the order the questions are asked
pub struct SummaryReport<'a> {
    pub counts: &'a SummaryCounts,
    pub browser_link: &'a BrowserLink,
}

impl<'a> SummaryReport<'a> {
    pub fn new(counts: &'a SummaryCounts, browser_link: &'a BrowserLink) -> Self {
        Self { counts, browser_link }
    }

    pub fn write_to<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        writeln!(out, "\nNumber of genes that were found: {}", self.counts.gene_count())?;
        writeln!(out, "\nGene names: {:?}", self.counts.gene_names)?;
        writeln!(
            out,
            "\nVariants with putative impact = modifier: {}",
            self.counts.modifier_count
        )?;
        writeln!(
            out,
            "\nVariants with mutationtaster annotation: {}",
            self.counts.mutationtaster_count
        )?;
        writeln!(
            out,
            "\nVariants with consequence = non-synonymous: {}",
            self.counts.non_synonymous_count
        )?;
        writeln!(out, "\nResults: {}", self.browser_link)?;
        Ok(())
    }
}

/// Metadata stored alongside an exported summary
#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryMetadata {
    pub generated_at: DateTime<Utc>,
    pub annotation_file: PathBuf,
    pub annotation_sha256: String,
    /// None when only an existing document was scanned
    pub variants_requested: Option<usize>,
    pub scan_mode: ScanMode,
}

/// JSON export of one run's summary
#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryExport {
    pub metadata: SummaryMetadata,
    pub summary: SummaryCounts,
    pub browser_link: String,
}

impl SummaryExport {
    pub fn new(
        document: &AnnotationDocument,
        counts: &SummaryCounts,
        variants_requested: Option<usize>,
        browser_link: &BrowserLink,
    ) -> Self {
        Self {
            metadata: SummaryMetadata {
                generated_at: Utc::now(),
                annotation_file: document.path.clone(),
                annotation_sha256: document.sha256(),
                variants_requested,
                scan_mode: counts.scan_mode,
            },
            summary: counts.clone(),
            browser_link: browser_link.to_string(),
        }
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        info!("Writing summary JSON: {:?}", path);

        let file = std::fs::File::create(path)
            .context("Failed to create summary JSON file")?;

        serde_json::to_writer_pretty(file, self)
            .context("Failed to write summary JSON")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use tempfile::tempdir;

    fn counts() -> SummaryCounts {
        SummaryCounts {
            scan_mode: ScanMode::Text,
            gene_names: ["TUBB3", "MC1R"].iter().map(|s| s.to_string()).collect(),
            modifier_count: 7,
            mutationtaster_count: 3,
            non_synonymous_count: 2,
        }
    }

    #[test]
    fn test_default_browser_link() {
        assert_eq!(
            BrowserLink::default().to_string(),
            "https://vcf.iobio.io/?species=Human&build=GRCh38"
        );
    }

    #[test]
    fn test_report_lines() {
        let counts = counts();
        let link = BrowserLink::default();
        let mut out = Vec::new();

        SummaryReport::new(&counts, &link).write_to(&mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().filter(|l| !l.is_empty()).collect();
        assert_eq!(
            lines,
            vec![
                "Number of genes that were found: 2",
                "Gene names: {\"MC1R\", \"TUBB3\"}",
                "Variants with putative impact = modifier: 7",
                "Variants with mutationtaster annotation: 3",
                "Variants with consequence = non-synonymous: 2",
                "Results: https://vcf.iobio.io/?species=Human&build=GRCh38",
            ]
        );
    }

    #[test]
    fn test_report_with_no_genes() {
        let counts = SummaryCounts {
            gene_names: BTreeSet::new(),
            ..counts()
        };
        let link = BrowserLink::default();
        let mut out = Vec::new();

        SummaryReport::new(&counts, &link).write_to(&mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Number of genes that were found: 0"));
        assert!(text.contains("Gene names: {}"));
    }

    #[test]
    fn test_summary_export() {
        let dir = tempdir().unwrap();
        let document = AnnotationDocument {
            path: dir.path().join("annotation.json"),
            text: "abc".to_string(),
        };
        let export = SummaryExport::new(&document, &counts(), Some(3), &BrowserLink::default());
        let path = dir.path().join("summary.json");

        export.write_json(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["metadata"]["variants_requested"], 3);
        assert_eq!(value["metadata"]["scan_mode"], "text");
        assert_eq!(
            value["metadata"]["annotation_sha256"],
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(value["summary"]["modifier_count"], 7);
        assert_eq!(value["summary"]["gene_names"][0], "MC1R");
    }
}
