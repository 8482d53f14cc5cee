// ==============================================================================
// main.rs - Genetics Annotator Entry Point
// ==============================================================================
// Description: Annotates the leading variants of a VCF file and prints a
//              summary of the annotation response
// Author: Matt Barham
// Created: 2025-11-20
// Modified: 2025-11-24
// Version: 1.0.0
// ==============================================================================

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use genetics_annotator::annotation::HttpTransport;
use genetics_annotator::config::{
    AnnotatorConfig, DEFAULT_ENDPOINT, DEFAULT_INPUT_PATH, DEFAULT_MAX_BATCH_SIZE,
    DEFAULT_OUTPUT_PATH,
};
use genetics_annotator::models::{GenomeBuild, ScanMode};
use genetics_annotator::pipeline::AnnotationPipeline;
use genetics_annotator::report::SummaryExport;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input VCF file
    #[arg(short, long, env = "ANNOTATOR_INPUT", default_value = DEFAULT_INPUT_PATH)]
    input: PathBuf,

    /// Annotation response file (overwritten on each run)
    #[arg(short, long, env = "ANNOTATOR_OUTPUT", default_value = DEFAULT_OUTPUT_PATH)]
    output: PathBuf,

    /// Batch annotation endpoint
    #[arg(long, env = "ANNOTATOR_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Number of leading VCF records to annotate
    #[arg(long, env = "ANNOTATOR_MAX_BATCH_SIZE", default_value_t = DEFAULT_MAX_BATCH_SIZE)]
    max_batch_size: usize,

    /// Genome build (hg38 or hg19)
    #[arg(long, env = "ANNOTATOR_GENOME_BUILD", default_value = "hg38")]
    genome_build: String,

    /// Request timeout in seconds (waits indefinitely if unset)
    #[arg(long, env = "ANNOTATOR_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    /// Parse the response as JSON instead of scanning its lines
    #[arg(long)]
    structured: bool,

    /// Skip annotation and summarize the existing output file
    #[arg(long)]
    summary_only: bool,

    /// Also write the summary as JSON to this path
    #[arg(long)]
    summary_json: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Initialize tracing (stderr, so stdout carries only the report)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "genetics_annotator=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load environment variables before clap reads them
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let genome_build = GenomeBuild::parse(&args.genome_build).ok_or_else(|| {
        anyhow::anyhow!("Invalid genome build '{}' (expected hg38 or hg19)", args.genome_build)
    })?;

    let scan_mode = if args.structured {
        ScanMode::Structured
    } else {
        ScanMode::Text
    };

    let config = AnnotatorConfig::new(args.input, args.output)
        .with_endpoint(args.endpoint)
        .with_max_batch_size(args.max_batch_size)
        .with_genome_build(genome_build)
        .with_timeout_secs(args.timeout_secs)
        .with_scan_mode(scan_mode);

    println!("Genetics Annotator");
    info!(
        "Input {:?}, output {:?}, endpoint {} ({} scan mode)",
        config.input_path,
        config.output_path,
        config.endpoint,
        scan_mode.as_str()
    );

    let transport = HttpTransport::new(config.timeout())?;
    let pipeline = AnnotationPipeline::new(config, transport)?;

    let outcome = {
        let mut stdout = std::io::stdout().lock();
        if args.summary_only {
            pipeline.run_summary_only(&mut stdout)?
        } else {
            pipeline.run(&mut stdout)?
        }
    };

    if let Some(path) = args.summary_json {
        SummaryExport::new(
            &outcome.document,
            &outcome.counts,
            outcome.variants_requested,
            &pipeline.config().browser_link,
        )
        .write_json(&path)?;
    }

    println!("\nDone with annotation summary");
    Ok(())
}
