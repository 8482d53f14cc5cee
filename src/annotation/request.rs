// ==============================================================================
// annotation/request.rs - Batched annotation request body
// ==============================================================================
// Description: Form-encoded POST body for the batch variant endpoint
// Author: Matt Barham
// Created: 2025-11-20
// Modified: 2025-11-20
// Version: 1.0.0
// ==============================================================================
// Format:
//   ids=chr16:g.60095T>C,chr16:g.60134G>A&hg38=true
// Reference: https://docs.myvariant.info/en/latest/doc/variant_annotation_service.html
// ==============================================================================

use crate::models::{GenomeBuild, VariantIdentifier};

pub const CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Single batched request for the annotation service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationRequest {
    pub ids: Vec<String>,
    pub genome_build: GenomeBuild,
}

impl AnnotationRequest {
    pub fn new(ids: &[VariantIdentifier], genome_build: GenomeBuild) -> Self {
        Self {
            ids: ids.iter().map(|id| id.as_str().to_string()).collect(),
            genome_build,
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Render the request body
    ///
    /// Identifiers are joined verbatim (no percent-encoding); the service
    /// accepts `:`, `>` and `,` unescaped in form bodies.
    pub fn body(&self) -> String {
        let mut body = format!("ids={}", self.ids.join(","));

        if let Some(flag) = self.genome_build.assembly_flag() {
            body.push('&');
            body.push_str(flag);
        }

        body
    }
}
