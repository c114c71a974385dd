//! Error types for Topograph operations.
//!
//! This module provides the main error type [`TopologyError`] which wraps
//! the error conditions of a visualize invocation. Every variant is terminal
//! for the invocation that raised it; per-edge mapping problems are not
//! errors and are reported as [`crate::plan::MappingWarning`]s instead.

use std::io;

use thiserror::Error;

use crate::{request::PreconditionError, source::SourceError};

/// The main error type for Topograph operations.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A required input was missing; nothing was fetched or drawn.
    #[error(transparent)]
    Precondition(#[from] PreconditionError),

    /// The channel source failed; its error is passed through unchanged.
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(#[from] crate::export::Error),
}
