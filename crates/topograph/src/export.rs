//! Export functionality for drawn canvases.
//!
//! This module provides the [`Exporter`] trait that turns a [`Canvas`] into
//! an output document. It is the last stage of a visualize invocation.
//!
//! # Pipeline Position
//!
//! ```text
//! Channel snapshot
//!     ↓ plan
//! Plan (ordered steps)
//!     ↓ layout
//! Canvas (positioned nodes and edges)
//!     ↓ export (this module)
//! Output document
//! ```
//!
//! # Available Backends
//!
//! - [`svg`] — SVG drawing via [`svg::SvgExporter`]
//! - [`json`] — Machine-readable node and edge listing via [`json::JsonExporter`]

pub mod json;
pub mod svg;

use crate::surface::Canvas;

/// Abstraction for canvas export backends.
pub trait Exporter {
    /// Renders the canvas to the backend's output format.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if the canvas cannot be converted to the
    /// target format.
    fn export_canvas(&self, canvas: &Canvas) -> Result<String, Error>;
}

/// Errors that can occur during canvas export.
#[derive(Debug)]
pub enum Error {
    /// A rendering or conversion failure described by `message`.
    Render(String),
    /// A serialization failure.
    Json(serde_json::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Render(msg) => write!(f, "Render error: {msg}"),
            Self::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Render(_) => None,
            Self::Json(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}
