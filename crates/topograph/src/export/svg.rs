//! SVG export backend.
//!
//! Every node is drawn as a rounded box of [`NODE_SIZE`] whose top-left
//! corner is the node's position, filled with the color configured for its
//! kind. Edges leave a node from the middle of its right side (the output
//! port) and enter the target at the middle of its left side (the input
//! port), drawn as horizontal-tangent curves like a node editor would.

use log::debug;
use svg::node::{Text as SvgText, element as svg_element};

use topograph_core::geometry::{Insets, Point, Size};

use super::{Error, Exporter};
use crate::{
    config::StyleConfig,
    surface::{Canvas, CanvasNode},
};

/// Size every node is drawn at.
pub const NODE_SIZE: Size = Size::new(240.0, 80.0);

const MARKER_ID: &str = "topograph-arrow";
const STROKE_COLOR: &str = "#334155";

/// Renders canvases to SVG documents.
#[derive(Debug, Clone)]
pub struct SvgExporter {
    style: StyleConfig,
    padding: Insets,
}

impl Default for SvgExporter {
    fn default() -> Self {
        Self::new(StyleConfig::default())
    }
}

impl SvgExporter {
    pub fn new(style: StyleConfig) -> Self {
        Self {
            style,
            padding: Insets::uniform(40.0),
        }
    }

    /// Sets the margin around the drawing (builder style).
    pub fn with_padding(mut self, padding: Insets) -> Self {
        self.padding = padding;
        self
    }

    fn render_node(&self, node: &CanvasNode) -> Result<svg_element::Group, Error> {
        let fill = self.style.node_color(node.kind()).map_err(Error::Render)?;
        let position = node.position();
        let center = position.to_bounds(NODE_SIZE).center();

        let rect = svg_element::Rectangle::new()
            .set("x", position.x())
            .set("y", position.y())
            .set("width", NODE_SIZE.width())
            .set("height", NODE_SIZE.height())
            .set("rx", 8)
            .set("fill", fill)
            .set("stroke", STROKE_COLOR)
            .set("stroke-width", 1.5);

        let label = svg_element::Text::new("")
            .set("x", center.x())
            .set("y", center.y())
            .set("text-anchor", "middle")
            .set("dominant-baseline", "central")
            .set("font-family", "sans-serif")
            .set("font-size", 14)
            .add(SvgText::new(node.label()));

        Ok(svg_element::Group::new()
            .set("class", node.kind().as_str())
            .set("data-id", node.id())
            .add(rect)
            .add(label))
    }

    fn render_edge(source: Point, target: Point) -> svg_element::Path {
        // Control points pull the curve out horizontally from both ports.
        let pull = ((target.x() - source.x()).abs() / 2.0).max(40.0);
        let path_data = format!(
            "M {} {} C {} {}, {} {}, {} {}",
            source.x(),
            source.y(),
            source.x() + pull,
            source.y(),
            target.x() - pull,
            target.y(),
            target.x(),
            target.y()
        );

        svg_element::Path::new()
            .set("d", path_data)
            .set("fill", "none")
            .set("stroke", STROKE_COLOR)
            .set("stroke-width", 2)
            .set("marker-end", format!("url(#{MARKER_ID})"))
    }

    fn arrow_marker() -> svg_element::Definitions {
        svg_element::Definitions::new().add(
            svg_element::Marker::new()
                .set("id", MARKER_ID)
                .set("viewBox", "0 0 10 10")
                .set("refX", 9)
                .set("refY", 5)
                .set("markerWidth", 6)
                .set("markerHeight", 6)
                .set("orient", "auto")
                .add(
                    svg_element::Path::new()
                        .set("d", "M 0 0 L 10 5 L 0 10 z")
                        .set("fill", STROKE_COLOR),
                ),
        )
    }
}

impl Exporter for SvgExporter {
    fn export_canvas(&self, canvas: &Canvas) -> Result<String, Error> {
        let content_bounds = canvas
            .bounds(NODE_SIZE)
            .unwrap_or_default()
            .add_padding(self.padding);

        let mut doc = svg::Document::new()
            .set(
                "viewBox",
                format!(
                    "{} {} {} {}",
                    content_bounds.min_x(),
                    content_bounds.min_y(),
                    content_bounds.width(),
                    content_bounds.height()
                ),
            )
            .set("width", content_bounds.width())
            .set("height", content_bounds.height());

        if let Some(background) = self.style.background_color().map_err(Error::Render)? {
            doc = doc.add(
                svg_element::Rectangle::new()
                    .set("x", content_bounds.min_x())
                    .set("y", content_bounds.min_y())
                    .set("width", content_bounds.width())
                    .set("height", content_bounds.height())
                    .set("fill", background),
            );
        }

        doc = doc.add(Self::arrow_marker());

        // Edges go underneath the nodes.
        let mut edges = svg_element::Group::new().set("class", "edges");
        for edge in canvas.edges() {
            let (Some(source), Some(target)) = (canvas.node(edge.source()), canvas.node(edge.target()))
            else {
                return Err(Error::Render(format!(
                    "edge {} -> {} refers to a node that is not on the canvas",
                    edge.source(),
                    edge.target()
                )));
            };
            edges = edges.add(Self::render_edge(
                source.position().to_bounds(NODE_SIZE).right_middle(),
                target.position().to_bounds(NODE_SIZE).left_middle(),
            ));
        }
        doc = doc.add(edges);

        let mut nodes = svg_element::Group::new().set("class", "nodes");
        for node in canvas.nodes() {
            nodes = nodes.add(self.render_node(node)?);
        }
        doc = doc.add(nodes);

        debug!(
            nodes = canvas.nodes().len(),
            edges = canvas.edges().len();
            "Canvas rendered to SVG"
        );
        Ok(doc.to_string())
    }
}
