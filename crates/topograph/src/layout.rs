//! Cursor-based placement: deciding *where* to draw.
//!
//! The [`Emitter`] replays a [`Plan`] against a [`Surface`], assigning each
//! node the current position of a [`Cursor`] and then moving the cursor
//! according to what was just placed:
//!
//! | Step | Placement | Cursor afterwards |
//! |---|---|---|
//! | group start | | column = group base (0 for people, 1500 for bots) |
//! | member | at cursor | column += 400 |
//! | publication | at cursor | column += 400 |
//! | subscription | at cursor | row += 200 |
//! | end of publication | | column -= 400, row += 200 |
//! | end of member | | column = group base |
//!
//! The row never moves back up within a sweep, so each member's block sits
//! below the previous one. Whether the bot sweep starts again at row 0 is
//! controlled by [`LayoutConfig::carry_rows_across_groups`]. All distances
//! come from [`LayoutConfig`]; the numbers above are the defaults.

use log::{debug, info, trace};

use topograph_core::{channel::MemberType, geometry::Point, node::NodeKind};

use crate::{
    config::LayoutConfig,
    plan::{MappingWarning, Plan, Step},
    surface::Surface,
};

/// The running placement position.
///
/// Cursors are plain values: every movement returns a new cursor, and the
/// emitter threads the current one through the pass explicitly.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Cursor {
    column: f32,
    row: f32,
}

impl Cursor {
    pub fn new(column: f32, row: f32) -> Self {
        Self { column, row }
    }

    /// Returns the position a node would be placed at.
    pub fn position(self) -> Point {
        Point::new(self.column, self.row)
    }

    /// Moves the cursor to a group's base column, optionally back to the top row.
    fn start_group(self, base_column: f32, reset_row: bool) -> Self {
        Self {
            column: base_column,
            row: if reset_row { 0.0 } else { self.row },
        }
    }

    /// Moves the cursor past a node of the given kind.
    fn advance(self, kind: NodeKind, config: &LayoutConfig) -> Self {
        match kind {
            NodeKind::Member | NodeKind::Publication => Self {
                column: self.column + config.column_step(),
                ..self
            },
            NodeKind::Subscription => Self {
                row: self.row + config.row_step(),
                ..self
            },
        }
    }

    /// Returns to the publishing member's output column, one row further down.
    fn end_publication(self, config: &LayoutConfig) -> Self {
        Self {
            column: self.column - config.column_step(),
            row: self.row + config.row_step(),
        }
    }

    fn end_member(self, base_column: f32) -> Self {
        Self {
            column: base_column,
            ..self
        }
    }
}

/// Outcome of emitting a plan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmitReport {
    nodes_created: usize,
    edges_created: usize,
    warnings: Vec<MappingWarning>,
}

impl EmitReport {
    pub fn nodes_created(&self) -> usize {
        self.nodes_created
    }

    pub fn edges_created(&self) -> usize {
        self.edges_created
    }

    /// Mapping problems carried over from the plan.
    pub fn warnings(&self) -> &[MappingWarning] {
        &self.warnings
    }
}

/// Replays plans onto surfaces.
#[derive(Debug, Clone, Default)]
pub struct Emitter {
    config: LayoutConfig,
}

impl Emitter {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    /// Places and connects every node of `plan` on `surface`.
    ///
    /// The pass always runs to completion; the surface is only ever added to.
    pub fn emit<S: Surface>(&self, plan: &Plan<'_>, surface: &mut S) -> EmitReport {
        info!(
            nodes = plan.nodes_count(),
            edges = plan.edges_count();
            "Emitting layout"
        );

        let mut handles = Vec::with_capacity(plan.nodes_count());
        let mut report = EmitReport {
            warnings: plan.warnings().to_vec(),
            ..EmitReport::default()
        };
        let mut cursor = Cursor::default();
        let mut base_column = self.config.base_column(MemberType::Person);

        for step in plan.steps() {
            match step {
                Step::Group(member_type) => {
                    base_column = self.config.base_column(*member_type);
                    let reset_row = !self.config.carry_rows_across_groups();
                    cursor = cursor.start_group(base_column, reset_row);
                    debug!(
                        group = member_type.as_str(),
                        column = base_column,
                        row = cursor.row;
                        "Starting member group"
                    );
                }
                Step::Node(node) => {
                    let position = cursor.position();
                    trace!(
                        id = node.id(),
                        kind = node.kind().as_str(),
                        x = position.x(),
                        y = position.y();
                        "Placing node"
                    );
                    handles.push(surface.create_node(
                        node.id(),
                        node.kind(),
                        position,
                        node.label(),
                    ));
                    report.nodes_created += 1;
                    cursor = cursor.advance(node.kind(), &self.config);
                }
                Step::Connect { from, to } => {
                    // Plans only refer to slots created by earlier steps.
                    surface.connect(handles[*from], handles[*to]);
                    report.edges_created += 1;
                }
                Step::EndPublication => cursor = cursor.end_publication(&self.config),
                Step::EndMember => cursor = cursor.end_member(base_column),
            }
        }

        info!(
            nodes_created = report.nodes_created,
            edges_created = report.edges_created,
            warnings = report.warnings.len();
            "Layout emitted"
        );
        report
    }
}
