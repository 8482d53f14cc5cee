// ==============================================================================
// summary.rs - Annotation Summary Scanner
// ==============================================================================
// Description: Answers the gene / impact / mutationtaster / consequence
//              questions from a persisted annotation document
// Author: Matt Barham
// Created: 2025-11-21
// Modified: 2025-11-24
// Version: 1.1.0
// ==============================================================================
// Text mode matches raw lines, so results depend on how the service
// happened to format its response:
//   "genename": "ANKRD11",                     -> gene ANKRD11
//   "putative_impact": "MODIFIER"              -> modifier
//   ...mutationtaster... (anywhere on a line)  -> mutationtaster
//   "consequence": "NON_SYNONYMOUS"            -> non-synonymous
// Structured mode parses the JSON and counts each top-level hit once.
// ==============================================================================

use serde_json::Value;
use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::annotation::AnnotationDocument;
use crate::models::{ScanMode, SummaryCounts};

const GENENAME_MARKER: &str = "\"genename\"";
const MODIFIER_MARKER: &str = "\"putative_impact\": \"MODIFIER\"";
const MUTATIONTASTER_MARKER: &str = "mutationtaster";
const NON_SYNONYMOUS_MARKER: &str = "\"consequence\": \"NON_SYNONYMOUS\"";

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Annotation file not found: {} (run the annotation step first)", .0.display())]
    OutputMissing(PathBuf),

    #[error("Failed to read annotation file: {0}")]
    Io(#[from] io::Error),

    #[error("Annotation file is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Reads an annotation document once and answers all four questions
pub struct SummaryScanner {
    mode: ScanMode,
}

impl SummaryScanner {
    pub fn new(mode: ScanMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> ScanMode {
        self.mode
    }

    /// Load the persisted document exactly as it was written
    pub fn read_document(path: impl AsRef<Path>) -> Result<AnnotationDocument, ScanError> {
        let path = path.as_ref();

        AnnotationDocument::load(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ScanError::OutputMissing(path.to_path_buf()),
            _ => ScanError::Io(e),
        })
    }

    /// Read `path` and summarize it
    pub fn scan(&self, path: impl AsRef<Path>) -> Result<SummaryCounts, ScanError> {
        let document = Self::read_document(path)?;
        self.summarize(&document)
    }

    pub fn summarize(&self, document: &AnnotationDocument) -> Result<SummaryCounts, ScanError> {
        let counts = match self.mode {
            ScanMode::Text => summarize_text(&document.text),
            ScanMode::Structured => summarize_structured(&document.text)?,
        };

        info!(
            "Scanned {} ({} mode): {} genes, {} modifier, {} mutationtaster, {} non-synonymous",
            document.path.display(),
            self.mode.as_str(),
            counts.gene_count(),
            counts.modifier_count,
            counts.mutationtaster_count,
            counts.non_synonymous_count
        );

        Ok(counts)
    }
}

// ------------------------------------------------------------------------------
// Text mode
// ------------------------------------------------------------------------------

/// Single pass over the lines of `text`
pub fn summarize_text(text: &str) -> SummaryCounts {
    let mut counts = SummaryCounts {
        scan_mode: ScanMode::Text,
        gene_names: BTreeSet::new(),
        modifier_count: 0,
        mutationtaster_count: 0,
        non_synonymous_count: 0,
    };

    for line in text.lines() {
        if line.contains(GENENAME_MARKER) {
            counts.gene_names.insert(extract_gene_name(line));
        }
        if line.contains(MODIFIER_MARKER) {
            counts.modifier_count += 1;
        }
        if line.contains(MUTATIONTASTER_MARKER) {
            counts.mutationtaster_count += 1;
        }
        if line.contains(NON_SYNONYMOUS_MARKER) {
            counts.non_synonymous_count += 1;
        }
    }

    counts
}

/// Unique gene names from lines containing `"genename"`
pub fn gene_names(text: &str) -> BTreeSet<String> {
    text.lines()
        .filter(|line| line.contains(GENENAME_MARKER))
        .map(extract_gene_name)
        .collect()
}

/// Lines containing `"putative_impact": "MODIFIER"`
pub fn count_modifier(text: &str) -> usize {
    count_lines_containing(text, MODIFIER_MARKER)
}

/// Lines containing `mutationtaster` anywhere, including inside unrelated values
pub fn count_mutationtaster(text: &str) -> usize {
    count_lines_containing(text, MUTATIONTASTER_MARKER)
}

/// Lines containing `"consequence": "NON_SYNONYMOUS"`
pub fn count_non_synonymous(text: &str) -> usize {
    count_lines_containing(text, NON_SYNONYMOUS_MARKER)
}

fn count_lines_containing(text: &str, marker: &str) -> usize {
    text.lines().filter(|line| line.contains(marker)).count()
}

/// `   "genename": "ANKRD11",` -> `ANKRD11`
fn extract_gene_name(line: &str) -> String {
    let trimmed = line.trim().trim_matches(',');

    let value = match trimmed.find(GENENAME_MARKER) {
        Some(idx) => {
            let rest = trimmed[idx + GENENAME_MARKER.len()..].trim_start();
            rest.strip_prefix(':').unwrap_or(rest)
        }
        None => trimmed,
    };

    value.trim().trim_matches('"').to_string()
}

// ------------------------------------------------------------------------------
// Structured mode
// ------------------------------------------------------------------------------

/// Parse once and query by field name; each top-level hit counts at most once
pub fn summarize_structured(text: &str) -> Result<SummaryCounts, ScanError> {
    let root: Value = serde_json::from_str(text)?;

    let hits: Vec<&Value> = match &root {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    };
    debug!("Parsed {} annotation hits", hits.len());

    let mut counts = SummaryCounts {
        scan_mode: ScanMode::Structured,
        gene_names: BTreeSet::new(),
        modifier_count: 0,
        mutationtaster_count: 0,
        non_synonymous_count: 0,
    };

    for hit in hits {
        for value in values_for_key(hit, "genename") {
            match value {
                Value::String(name) => {
                    counts.gene_names.insert(name.clone());
                }
                Value::Array(names) => {
                    counts
                        .gene_names
                        .extend(names.iter().filter_map(|n| n.as_str().map(str::to_string)));
                }
                _ => {}
            }
        }

        if any_value_equals(hit, "putative_impact", "MODIFIER") {
            counts.modifier_count += 1;
        }
        if !values_for_key(hit, "mutationtaster").is_empty() {
            counts.mutationtaster_count += 1;
        }
        if any_value_equals(hit, "consequence", "NON_SYNONYMOUS") {
            counts.non_synonymous_count += 1;
        }
    }

    Ok(counts)
}

/// Every value stored under `key`, at any depth
fn values_for_key<'a>(value: &'a Value, key: &str) -> Vec<&'a Value> {
    let mut found = Vec::new();
    collect_values(value, key, &mut found);
    found
}

fn collect_values<'a>(value: &'a Value, key: &str, found: &mut Vec<&'a Value>) {
    match value {
        Value::Object(map) => {
            for (k, v) in map {
                if k == key {
                    found.push(v);
                }
                collect_values(v, key, found);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_values(item, key, found);
            }
        }
        _ => {}
    }
}

/// True if some value under `key` is `expected` (or a list containing it)
fn any_value_equals(value: &Value, key: &str, expected: &str) -> bool {
    values_for_key(value, key).into_iter().any(|v| match v {
        Value::String(s) => s == expected,
        Value::Array(items) => items.iter().any(|i| i.as_str() == Some(expected)),
        _ => false,
    })
}
