//! Visual node kinds.
//!
//! Every entity of a channel snapshot is drawn as exactly one node, tagged
//! with the [`NodeKind`] of the entity it came from. Each node has a single
//! output port and a single input port; edges always run from the former to
//! the latter.

use std::fmt;

use serde::Serialize;

/// Name of the only output port a node exposes.
pub const OUTPUT_PORT: &str = "output_1";

/// Name of the only input port a node exposes.
pub const INPUT_PORT: &str = "input_1";

/// The kind of entity a visual node represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Member,
    Publication,
    Subscription,
}

impl NodeKind {
    /// Returns the tag handed to the diagramming surface.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Publication => "publication",
            Self::Subscription => "subscription",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
