// ==============================================================================
// annotation/client.rs - Batch annotation client
// ==============================================================================
// Description: Sends one batched POST and persists the raw response body
// Author: Matt Barham
// Created: 2025-11-20
// Modified: 2025-11-24
// Version: 1.1.0
// ==============================================================================

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE as CONTENT_TYPE_HEADER;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::document::AnnotationDocument;
use super::request::{AnnotationRequest, CONTENT_TYPE};
use crate::config::AnnotatorConfig;
use crate::models::{GenomeBuild, VariantIdentifier};

/// Longest slice of an error body kept in `AnnotationError::Remote`
const MAX_ERROR_BODY: usize = 512;

#[derive(Error, Debug)]
pub enum AnnotationError {
    #[error("No variants to annotate; refusing to send an empty batch")]
    EmptyBatch,

    #[error("Batch of {size} variants exceeds the limit of {max}")]
    BatchTooLarge { size: usize, max: usize },

    #[error("Annotation request failed: {0}")]
    Network(String),

    #[error("Annotation service returned HTTP {status}: {body}")]
    Remote { status: u16, body: String },

    #[error("Annotation response is not valid UTF-8: {0}")]
    Decode(#[from] std::string::FromUtf8Error),

    #[error("Failed to write annotation file {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Raw response as seen by the transport
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends a form-encoded POST; one call per annotation run
pub trait AnnotationTransport {
    fn post_form(&self, url: &str, body: String) -> Result<TransportResponse, AnnotationError>;
}

/// Blocking HTTP transport
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// `timeout` of None waits for the service indefinitely
    pub fn new(timeout: Option<Duration>) -> Result<Self, AnnotationError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AnnotationError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

impl AnnotationTransport for HttpTransport {
    fn post_form(&self, url: &str, body: String) -> Result<TransportResponse, AnnotationError> {
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE_HEADER, CONTENT_TYPE)
            .body(body)
            .send()
            .map_err(|e| AnnotationError::Network(format!("POST {}: {}", url, e)))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .map_err(|e| AnnotationError::Network(format!("Failed to read response: {}", e)))?;

        Ok(TransportResponse {
            status,
            body: body.to_vec(),
        })
    }
}

/// Annotates one batch of variants and writes the response to disk
pub struct AnnotationClient<T: AnnotationTransport> {
    transport: T,
    endpoint: String,
    genome_build: GenomeBuild,
    max_batch_size: usize,
    output_path: PathBuf,
}

impl<T: AnnotationTransport> AnnotationClient<T> {
    pub fn new(transport: T, config: &AnnotatorConfig) -> Self {
        Self {
            transport,
            endpoint: config.endpoint.clone(),
            genome_build: config.genome_build,
            max_batch_size: config.max_batch_size,
            output_path: config.output_path.clone(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Build the request for `ids`, enforcing the batch limits
    pub fn build_request(&self, ids: &[VariantIdentifier]) -> Result<AnnotationRequest, AnnotationError> {
        if ids.is_empty() {
            return Err(AnnotationError::EmptyBatch);
        }

        if ids.len() > self.max_batch_size {
            return Err(AnnotationError::BatchTooLarge {
                size: ids.len(),
                max: self.max_batch_size,
            });
        }

        Ok(AnnotationRequest::new(ids, self.genome_build))
    }

    /// Send the batch and persist the verbatim response body
    ///
    /// Exactly one request is made. Nothing is written unless the service
    /// answers with a 2xx status.
    pub fn annotate(&self, ids: &[VariantIdentifier]) -> Result<AnnotationDocument, AnnotationError> {
        let request = self.build_request(ids)?;
        let body = request.body();

        info!(
            "Requesting annotation for {} variants from {} ({})",
            request.len(),
            self.endpoint,
            self.genome_build.as_str()
        );
        debug!("Request body: {} bytes", body.len());

        let response = self.transport.post_form(&self.endpoint, body)?;

        if !response.is_success() {
            let mut text = String::from_utf8_lossy(&response.body).into_owned();
            if text.len() > MAX_ERROR_BODY {
                let mut cut = MAX_ERROR_BODY;
                while !text.is_char_boundary(cut) {
                    cut -= 1;
                }
                text.truncate(cut);
            }

            warn!("Annotation service returned HTTP {}", response.status);
            return Err(AnnotationError::Remote {
                status: response.status,
                body: text,
            });
        }

        let text = String::from_utf8(response.body)?;

        let document = AnnotationDocument::persist(&self.output_path, text).map_err(|source| {
            AnnotationError::Write {
                path: self.output_path.clone(),
                source,
            }
        })?;

        info!(
            "Saved annotation response ({} bytes) to {}",
            document.text.len(),
            document.path.display()
        );

        Ok(document)
    }
}

/// Transport that replays a fixed response and records what was sent
#[cfg(test)]
pub(crate) struct CannedTransport {
    status: u16,
    body: String,
    pub calls: std::cell::RefCell<Vec<(String, String)>>,
}

#[cfg(test)]
impl CannedTransport {
    pub fn ok(body: &str) -> Self {
        Self::with_status(200, body)
    }

    pub fn with_status(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            calls: std::cell::RefCell::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

#[cfg(test)]
impl AnnotationTransport for CannedTransport {
    fn post_form(&self, url: &str, body: String) -> Result<TransportResponse, AnnotationError> {
        self.calls.borrow_mut().push((url.to_string(), body));
        Ok(TransportResponse {
            status: self.status,
            body: self.body.clone().into_bytes(),
        })
    }
}
