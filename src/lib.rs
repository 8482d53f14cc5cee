// ==============================================================================
// lib.rs - Genetics Annotator Library
// ==============================================================================
// Description: Library interface for variant annotation and summary modules
// Author: Matt Barham
// Created: 2025-11-20
// Modified: 2025-11-24
// Version: 1.0.0
// ==============================================================================

pub mod annotation;
pub mod config;
pub mod models;
pub mod parsers;
pub mod pipeline;
pub mod report;
pub mod summary;
