// ==============================================================================
// pipeline.rs - Annotation Pipeline
// ==============================================================================
// Description: Loads variants, annotates them in one batch, and summarizes
//              the persisted response
// Author: Matt Barham
// Created: 2025-11-21
// Modified: 2025-11-24
// Version: 1.0.0
// ==============================================================================

use anyhow::{Context, Result};
use std::io::Write;
use tracing::info;

use crate::annotation::{AnnotationClient, AnnotationDocument, AnnotationTransport};
use crate::config::AnnotatorConfig;
use crate::models::SummaryCounts;
use crate::parsers::VariantLoader;
use crate::report::SummaryReport;
use crate::summary::SummaryScanner;

/// Result of one pipeline run
#[derive(Debug)]
pub struct PipelineOutcome {
    pub document: AnnotationDocument,
    pub counts: SummaryCounts,
    /// None when an existing document was only re-scanned
    pub variants_requested: Option<usize>,
}

pub struct AnnotationPipeline<T: AnnotationTransport> {
    config: AnnotatorConfig,
    client: AnnotationClient<T>,
}

impl<T: AnnotationTransport> AnnotationPipeline<T> {
    pub fn new(config: AnnotatorConfig, transport: T) -> Result<Self> {
        config.validate().context("Invalid annotator configuration")?;
        let client = AnnotationClient::new(transport, &config);

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &AnnotatorConfig {
        &self.config
    }

    /// Full run: load → annotate → scan → report
    pub fn run<W: Write>(&self, out: &mut W) -> Result<PipelineOutcome> {
        // 1. Load variant identifiers
        info!("Loading variants from {:?}", self.config.input_path);
        let ids = VariantLoader::new(self.config.max_batch_size)
            .load(&self.config.input_path)
            .context("Failed to load variants")?;

        // 2. Annotate in one batch and persist the response
        let document = self
            .client
            .annotate(&ids)
            .context("Failed to annotate variants")?;

        // 3. Summarize and report
        let counts = self.summarize_and_report(&document, out)?;

        info!("Pipeline complete: {} variants annotated", ids.len());

        Ok(PipelineOutcome {
            document,
            counts,
            variants_requested: Some(ids.len()),
        })
    }

    /// Re-scan the document left by a previous run; no network access
    pub fn run_summary_only<W: Write>(&self, out: &mut W) -> Result<PipelineOutcome> {
        info!("Summarizing existing annotation file {:?}", self.config.output_path);

        let document = SummaryScanner::read_document(&self.config.output_path)
            .context("Failed to read annotation file")?;

        let counts = self.summarize_and_report(&document, out)?;

        Ok(PipelineOutcome {
            document,
            counts,
            variants_requested: None,
        })
    }

    fn summarize_and_report<W: Write>(
        &self,
        document: &AnnotationDocument,
        out: &mut W,
    ) -> Result<SummaryCounts> {
        let counts = SummaryScanner::new(self.config.scan_mode)
            .summarize(document)
            .context("Failed to summarize annotation file")?;

        SummaryReport::new(&counts, &self.config.browser_link)
            .write_to(out)
            .context("Failed to write report")?;

        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::client::CannedTransport;
    use crate::models::ScanMode;
    use crate::summary::ScanError;
    use std::path::Path;
    use tempfile::tempdir;

    const VCF: &str = "##fileformat=VCFv4.2\n\
##contig=<ID=chr16>\n\
#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\n\
chr16\t89985940\trs1805007\tC\tT\t50\tPASS\t.\n\
chr16\t89919736\t.\tG\tA\t50\tPASS\t.\n\
chr16\t60095\t.\tT\tC,G\t50\tPASS\t.\n";

    // Canned service response for the three variants above
    const RESPONSE: &str = r#"[
  {
    "_id": "chr16:g.89985940C>T",
    "query": "chr16:g.89985940C>T",
    "cadd": {
      "consequence": "NON_SYNONYMOUS",
      "gene": {
        "genename": "MC1R"
      }
    },
    "dbnsfp": {
      "genename": "MC1R",
      "mutationtaster": {
        "pred": "D"
      }
    },
    "snpeff": {
      "ann": {
        "genename": "MC1R",
        "putative_impact": "MODERATE"
      }
    }
  },
  {
    "_id": "chr16:g.89919736G>A",
    "query": "chr16:g.89919736G>A",
    "cadd": {
      "consequence": "NON_SYNONYMOUS"
    },
    "dbnsfp": {
      "genename": "ANKRD11",
      "mutationtaster": {
        "pred": "N"
      }
    },
    "snpeff": {
      "ann": [
        {
          "genename": "ANKRD11",
          "putative_impact": "MODIFIER"
        },
        {
          "genename": "SPG7",
          "putative_impact": "MODIFIER"
        }
      ]
    }
  },
  {
    "query": "chr16:g.60095T>C",
    "notfound": true
  }
]
"#;

    fn setup(dir: &Path) -> AnnotatorConfig {
        let input = dir.join("chr16.vcf");
        std::fs::write(&input, VCF).unwrap();
        AnnotatorConfig::new(input, dir.join("annotation.json"))
    }

    #[test]
    fn test_end_to_end_text_mode() {
        let dir = tempdir().unwrap();
        let config = setup(dir.path());
        let pipeline = AnnotationPipeline::new(config.clone(), CannedTransport::ok(RESPONSE)).unwrap();
        let mut out = Vec::new();

        let outcome = pipeline.run(&mut out).unwrap();

        // One request with all three identifiers, first ALT only
        let calls = pipeline.client.transport().calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0].1,
            "ids=chr16:g.89985940C>T,chr16:g.89919736G>A,chr16:g.60095T>C&hg38=true"
        );

        assert_eq!(outcome.variants_requested, Some(3));
        assert_eq!(std::fs::read_to_string(&config.output_path).unwrap(), RESPONSE);

        let counts = &outcome.counts;
        assert_eq!(
            counts.gene_names.iter().cloned().collect::<Vec<_>>(),
            vec!["ANKRD11".to_string(), "MC1R".to_string(), "SPG7".to_string()]
        );
        assert_eq!(counts.modifier_count, 2);
        assert_eq!(counts.mutationtaster_count, 2);
        assert_eq!(counts.non_synonymous_count, 2);

        let report = String::from_utf8(out).unwrap();
        assert!(report.contains("Number of genes that were found: 3"));
        assert!(report.contains("Variants with putative impact = modifier: 2"));
        assert!(report.contains("Variants with mutationtaster annotation: 2"));
        assert!(report.contains("Variants with consequence = non-synonymous: 2"));
        assert!(report.contains("Results: https://vcf.iobio.io/?species=Human&build=GRCh38"));
    }

    #[test]
    fn test_end_to_end_structured_mode() {
        let dir = tempdir().unwrap();
        let config = setup(dir.path()).with_scan_mode(ScanMode::Structured);
        let pipeline = AnnotationPipeline::new(config, CannedTransport::ok(RESPONSE)).unwrap();

        let outcome = pipeline.run(&mut Vec::new()).unwrap();

        // The second hit has two MODIFIER annotations but counts once
        assert_eq!(outcome.counts.gene_count(), 3);
        assert_eq!(outcome.counts.modifier_count, 1);
        assert_eq!(outcome.counts.mutationtaster_count, 2);
        assert_eq!(outcome.counts.non_synonymous_count, 2);
    }

    #[test]
    fn test_empty_vcf_fails_without_request() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("empty.vcf");
        std::fs::write(&input, "##fileformat=VCFv4.2\n#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\n").unwrap();
        let config = AnnotatorConfig::new(input, dir.path().join("annotation.json"));
        let pipeline = AnnotationPipeline::new(config, CannedTransport::ok("[]")).unwrap();

        assert!(pipeline.run(&mut Vec::new()).is_err());
        assert_eq!(pipeline.client.transport().call_count(), 0);
    }

    #[test]
    fn test_summary_only_reuses_existing_document() {
        let dir = tempdir().unwrap();
        let config = setup(dir.path());
        std::fs::write(&config.output_path, RESPONSE).unwrap();
        let pipeline = AnnotationPipeline::new(config, CannedTransport::ok("[]")).unwrap();

        let first = pipeline.run_summary_only(&mut Vec::new()).unwrap();
        let second = pipeline.run_summary_only(&mut Vec::new()).unwrap();

        assert_eq!(pipeline.client.transport().call_count(), 0);
        assert_eq!(first.variants_requested, None);
        assert_eq!(first.counts, second.counts);
    }

    #[test]
    fn test_summary_only_without_document() {
        let dir = tempdir().unwrap();
        let config = setup(dir.path());
        let pipeline = AnnotationPipeline::new(config, CannedTransport::ok("[]")).unwrap();

        let err = pipeline.run_summary_only(&mut Vec::new()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ScanError>(),
            Some(ScanError::OutputMissing(_))
        ));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = AnnotatorConfig::default().with_max_batch_size(0);
        assert!(AnnotationPipeline::new(config, CannedTransport::ok("[]")).is_err());
    }
}
