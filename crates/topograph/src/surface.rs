//! Diagramming surfaces.
//!
//! A [`Surface`] is the canvas the layout pass draws onto. It only has to
//! support two primitives: placing a labelled node of some [`NodeKind`] at a
//! position, and connecting one node's output port to another node's input
//! port.
//!
//! [`Canvas`] is the in-memory surface used by the CLI and the exporters. It
//! is append-only: nodes are never merged or moved, so drawing the same
//! snapshot twice leaves two complete, overlapping copies on the canvas.

use std::fmt;

use serde::Serialize;

use topograph_core::{
    geometry::{Bounds, Point, Size},
    node::{INPUT_PORT, NodeKind, OUTPUT_PORT},
};

/// Something nodes and edges can be drawn on.
pub trait Surface {
    /// Opaque reference to a created node.
    type Handle: Copy + fmt::Debug;

    /// Places a node and returns a handle to connect it with.
    fn create_node(
        &mut self,
        id: &str,
        kind: NodeKind,
        position: Point,
        label: &str,
    ) -> Self::Handle;

    /// Connects the output port of `from` to the input port of `to`.
    fn connect(&mut self, from: Self::Handle, to: Self::Handle);
}

/// Handle of a node on a [`Canvas`].
///
/// Handles are numbered from 1 in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeHandle(usize);

impl NodeHandle {
    pub fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A node placed on a [`Canvas`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanvasNode {
    handle: NodeHandle,
    id: String,
    kind: NodeKind,
    position: Point,
    label: String,
    selected: bool,
}

impl CanvasNode {
    pub fn handle(&self) -> NodeHandle {
        self.handle
    }

    /// Id of the snapshot entity this node represents. Not unique.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Top-left corner of the node.
    pub fn position(&self) -> Point {
        self.position
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Nodes are always created unselected.
    pub fn is_selected(&self) -> bool {
        self.selected
    }
}

/// A directed connection between two canvas nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanvasEdge {
    from: NodeHandle,
    to: NodeHandle,
    output: &'static str,
    input: &'static str,
}

impl CanvasEdge {
    /// Node whose output port the edge leaves from.
    pub fn source(&self) -> NodeHandle {
        self.from
    }

    /// Node whose input port the edge enters.
    pub fn target(&self) -> NodeHandle {
        self.to
    }
}

/// In-memory, append-only [`Surface`].
///
/// # Examples
///
/// ```
/// use topograph::surface::{Canvas, Surface};
/// use topograph_core::{geometry::Point, node::NodeKind};
///
/// let mut canvas = Canvas::new();
/// let alice = canvas.create_node("alice", NodeKind::Member, Point::new(0.0, 0.0), "alice (person)");
/// let cam = canvas.create_node("cam", NodeKind::Publication, Point::new(400.0, 0.0), "cam (video)");
/// canvas.connect(alice, cam);
///
/// assert_eq!(canvas.nodes().len(), 2);
/// assert_eq!(canvas.edges()[0].source(), alice);
/// ```
#[derive(Debug, Clone, Default, Serialize)]
pub struct Canvas {
    nodes: Vec<CanvasNode>,
    edges: Vec<CanvasEdge>,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &[CanvasNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[CanvasEdge] {
        &self.edges
    }

    /// Looks up a node by handle.
    pub fn node(&self, handle: NodeHandle) -> Option<&CanvasNode> {
        // Handles are 1-based creation indices.
        let index = handle.0.checked_sub(1)?;
        self.nodes.get(index)
    }

    /// Returns every node created for the given snapshot id.
    pub fn nodes_with_id<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a CanvasNode> {
        self.nodes.iter().filter(move |node| node.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Returns the bounds enclosing every node when each is drawn at
    /// `node_size`, or `None` for an empty canvas.
    pub fn bounds(&self, node_size: Size) -> Option<Bounds> {
        self.nodes
            .iter()
            .map(|node| node.position.to_bounds(node_size))
            .reduce(|acc, bounds| acc.merge(&bounds))
    }
}

impl Surface for Canvas {
    type Handle = NodeHandle;

    fn create_node(
        &mut self,
        id: &str,
        kind: NodeKind,
        position: Point,
        label: &str,
    ) -> NodeHandle {
        let handle = NodeHandle(self.nodes.len() + 1);
        self.nodes.push(CanvasNode {
            handle,
            id: id.to_string(),
            kind,
            position,
            label: label.to_string(),
            selected: false,
        });
        handle
    }

    fn connect(&mut self, from: NodeHandle, to: NodeHandle) {
        self.edges.push(CanvasEdge {
            from,
            to,
            output: OUTPUT_PORT,
            input: INPUT_PORT,
        });
    }
}
