// ==============================================================================
// annotation/mod.rs - Variant annotation service client
// ==============================================================================
// Description: Batched request, HTTP transport and persisted response
// Author: Matt Barham
// Created: 2025-11-20
// Modified: 2025-11-24
// Version: 1.0.0
// ==============================================================================

pub mod client;
pub mod document;
pub mod request;

pub use client::{AnnotationClient, AnnotationError, AnnotationTransport, HttpTransport, TransportResponse};
pub use document::AnnotationDocument;
pub use request::AnnotationRequest;
