//! Integration tests for the TopologyBuilder API
//!
//! These tests drive whole visualize invocations against in-memory and
//! recording sources and check what ends up on the canvas.

use std::cell::Cell;

use float_cmp::approx_eq;

use topograph::{
    TopologyBuilder, TopologyError,
    channel::{Channel, Member, MemberType, Publication, Subscription},
    config::{AppConfig, LayoutConfig, StyleConfig},
    node::NodeKind,
    plan::MappingWarning,
    request::{ChannelSelector, Credentials, PreconditionError, VisualizeRequest},
    source::{ChannelSource, SnapshotDocument, SourceError},
    surface::{Canvas, CanvasNode},
};

fn request() -> VisualizeRequest {
    VisualizeRequest::new()
        .with_app_id("app")
        .with_secret_key("secret")
        .with_channel_name("standup")
}

/// One person `A` publishing video `P`, subscribed to by bot `B` via `S`.
fn scenario_channel() -> Channel {
    Channel::new("ch-1")
        .with_name("standup")
        .with_member(Member::new("A", MemberType::Person))
        .with_member(Member::new("B", MemberType::Bot))
        .with_publication(Publication::new("P", "A", "video"))
        .with_subscription(Subscription::new("S", "P", "B"))
}

fn source(channel: Channel) -> SnapshotDocument {
    SnapshotDocument::new(vec![channel])
}

fn node<'a>(canvas: &'a Canvas, id: &'a str) -> &'a CanvasNode {
    canvas
        .nodes_with_id(id)
        .next()
        .unwrap_or_else(|| panic!("node `{id}` not on canvas"))
}

fn assert_at(node: &CanvasNode, x: f32, y: f32) {
    let position = node.position();
    assert!(
        approx_eq!(f32, position.x(), x) && approx_eq!(f32, position.y(), y),
        "node `{}` at ({}, {}), expected ({x}, {y})",
        node.id(),
        position.x(),
        position.y()
    );
}

/// Edges as `(from id, to id)` pairs in creation order.
fn edge_ids(canvas: &Canvas) -> Vec<(String, String)> {
    canvas
        .edges()
        .iter()
        .map(|edge| {
            let from = canvas.node(edge.source()).expect("edge source exists");
            let to = canvas.node(edge.target()).expect("edge target exists");
            (from.id().to_string(), to.id().to_string())
        })
        .collect()
}

/// A source that counts how often it is asked.
struct CountingSource {
    inner: SnapshotDocument,
    calls: Cell<usize>,
}

impl ChannelSource for CountingSource {
    fn find(
        &self,
        app_id: &str,
        credentials: &Credentials,
        selector: &ChannelSelector,
    ) -> Result<Channel, SourceError> {
        self.calls.set(self.calls.get() + 1);
        self.inner.find(app_id, credentials, selector)
    }
}

#[test]
fn test_end_to_end_scenario() {
    let builder = TopologyBuilder::default();
    let mut canvas = Canvas::new();

    let report = builder
        .visualize(&request(), &source(scenario_channel()), &mut canvas)
        .expect("Failed to visualize");

    assert_eq!(report.nodes_created(), 4);
    assert_eq!(report.edges_created(), 3);
    assert!(report.warnings().is_empty());

    let a = node(&canvas, "A");
    assert_eq!(a.kind(), NodeKind::Member);
    assert_at(a, 0.0, 0.0);
    assert_eq!(a.label(), "A (person)");

    let p = node(&canvas, "P");
    assert_eq!(p.kind(), NodeKind::Publication);
    assert_at(p, 400.0, 0.0);
    assert_eq!(p.label(), "P (video)");

    let s = node(&canvas, "S");
    assert_eq!(s.kind(), NodeKind::Subscription);
    assert_at(s, 800.0, 0.0);
    assert_eq!(s.label(), "S");

    let b = node(&canvas, "B");
    assert_at(b, 1500.0, 0.0);
    assert_eq!(b.label(), "B (bot)");

    let ids: Vec<_> = canvas.nodes().iter().map(|node| node.id()).collect();
    assert_eq!(ids, vec!["A", "P", "S", "B"]);

    assert_eq!(
        edge_ids(&canvas),
        vec![
            ("A".to_string(), "P".to_string()),
            ("P".to_string(), "S".to_string()),
            ("S".to_string(), "B".to_string()),
        ]
    );
}

#[test]
fn test_empty_channel_draws_nothing() {
    let builder = TopologyBuilder::default();
    let mut canvas = Canvas::new();

    let report = builder
        .visualize(
            &request(),
            &source(Channel::new("ch-1").with_name("standup")),
            &mut canvas,
        )
        .expect("Failed to visualize");

    assert_eq!(report.nodes_created(), 0);
    assert_eq!(report.edges_created(), 0);
    assert!(canvas.is_empty());
}

#[test]
fn test_unresolved_subscriber_is_skipped_and_reported() {
    let channel = scenario_channel().with_subscription(Subscription::new("S-ghost", "P", "ghost"));
    let builder = TopologyBuilder::default();
    let mut canvas = Canvas::new();

    let report = builder
        .visualize(&request(), &source(channel), &mut canvas)
        .expect("Unresolved subscribers must not abort the pass");

    assert_eq!(
        report.warnings(),
        &[MappingWarning::UnresolvedSubscriber {
            subscription: "S-ghost".to_string(),
            subscriber: "ghost".to_string(),
        }]
    );

    // The subscription node and its incoming edge are still drawn.
    assert_at(node(&canvas, "S-ghost"), 800.0, 200.0);
    let edges = edge_ids(&canvas);
    assert!(edges.contains(&("P".to_string(), "S-ghost".to_string())));
    assert!(!edges.iter().any(|(from, _)| from == "S-ghost"));

    // Everything else is unaffected.
    assert!(edges.contains(&("S".to_string(), "B".to_string())));
    assert_eq!(canvas.nodes().len(), 5);
    assert_eq!(canvas.edges().len(), 4);
}

#[test]
fn test_repeated_visualize_duplicates_everything() {
    let builder = TopologyBuilder::default();
    let source = source(scenario_channel());
    let mut canvas = Canvas::new();

    builder
        .visualize(&request(), &source, &mut canvas)
        .expect("First pass failed");
    builder
        .visualize(&request(), &source, &mut canvas)
        .expect("Second pass failed");

    assert_eq!(canvas.nodes().len(), 8);
    assert_eq!(canvas.edges().len(), 6);
    for id in ["A", "P", "S", "B"] {
        let copies: Vec<_> = canvas.nodes_with_id(id).collect();
        assert_eq!(copies.len(), 2, "expected two copies of `{id}`");
        assert_eq!(copies[0].position(), copies[1].position());
        assert_ne!(copies[0].handle(), copies[1].handle());
    }
}

#[test]
fn test_member_order_is_stable() {
    let channel = Channel::new("ch-1")
        .with_name("standup")
        .with_member(Member::new("m1", MemberType::Person))
        .with_member(Member::new("m2", MemberType::Person))
        .with_publication(Publication::new("p2", "m2", "audio"))
        .with_publication(Publication::new("p1", "m1", "audio"));
    let mut canvas = Canvas::new();

    TopologyBuilder::default()
        .visualize(&request(), &source(channel), &mut canvas)
        .expect("Failed to visualize");

    let ids: Vec<_> = canvas.nodes().iter().map(|node| node.id()).collect();
    assert_eq!(ids, vec!["m1", "p1", "m2", "p2"]);
}

#[test]
fn test_precondition_error_stops_before_fetch() {
    let source = CountingSource {
        inner: source(scenario_channel()),
        calls: Cell::new(0),
    };
    let mut canvas = Canvas::new();

    let result = TopologyBuilder::default().visualize(
        &VisualizeRequest::new()
            .with_app_id("app")
            .with_channel_id("ch-1"),
        &source,
        &mut canvas,
    );

    assert!(matches!(
        result,
        Err(TopologyError::Precondition(
            PreconditionError::MissingCredentials
        ))
    ));
    assert_eq!(source.calls.get(), 0);
    assert!(canvas.is_empty());
}

#[test]
fn test_source_error_propagates_after_single_attempt() {
    let source = CountingSource {
        inner: source(scenario_channel()),
        calls: Cell::new(0),
    };
    let mut canvas = Canvas::new();

    let result = TopologyBuilder::default().visualize(
        &request().with_channel_name("retro"),
        &source,
        &mut canvas,
    );

    let err = result.expect_err("Unknown channel must fail");
    assert!(matches!(
        err,
        TopologyError::Source(SourceError::ChannelNotFound(_))
    ));
    assert_eq!(err.to_string(), "No channel found with name `retro`");
    assert_eq!(source.calls.get(), 1);
    assert!(canvas.is_empty());
}

#[test]
fn test_layout_config_is_applied() {
    let config = AppConfig::new(
        LayoutConfig::default().with_bot_column(2000.0),
        StyleConfig::default(),
    );
    let mut canvas = Canvas::new();

    TopologyBuilder::new(config)
        .visualize(&request(), &source(scenario_channel()), &mut canvas)
        .expect("Failed to visualize");

    assert_at(node(&canvas, "B"), 2000.0, 0.0);
}

#[test]
fn test_render_svg_and_json() {
    let builder = TopologyBuilder::default();
    let mut canvas = Canvas::new();
    builder
        .visualize(&request(), &source(scenario_channel()), &mut canvas)
        .expect("Failed to visualize");

    let svg = builder.render_svg(&canvas).expect("Failed to render SVG");
    assert!(svg.contains("<svg"), "Output should contain SVG tag");
    assert!(svg.contains("</svg>"), "Output should be complete SVG");
    assert!(svg.contains("B (bot)"));

    let json = builder.render_json(&canvas).expect("Failed to render JSON");
    let value: serde_json::Value = serde_json::from_str(&json).expect("Invalid JSON");
    assert_eq!(value["nodes"].as_array().map(Vec::len), Some(4));
    assert_eq!(value["edges"].as_array().map(Vec::len), Some(3));
}
