//! CLI utilities for gradlecheck
//!
//! Provides shared CLI functionality:
//! - Terminal output formatting
//! - Status messages
//! - Validation report printing

#![warn(missing_docs)]

pub mod output;
pub mod report;
