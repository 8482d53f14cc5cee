// ==============================================================================
// parsers/mod.rs - File parser modules
// ==============================================================================
// Description: Parsers for genetic data file formats
// Author: Matt Barham
// Created: 2025-11-20
// Modified: 2025-11-20
// Version: 1.0.0
// ==============================================================================

pub mod vcf;

pub use vcf::{LoadError, VariantLoader};
