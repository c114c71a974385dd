//! JSON export backend.

use super::{Error, Exporter};
use crate::surface::Canvas;

/// Writes the canvas as pretty-printed JSON.
///
/// The document has a `nodes` array (handle, id, kind, position, label,
/// selected) and an `edges` array (from, to, output, input).
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonExporter;

impl Exporter for JsonExporter {
    fn export_canvas(&self, canvas: &Canvas) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(canvas)?)
    }
}
