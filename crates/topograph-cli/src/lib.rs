//! CLI logic for the Topograph channel visualizer.
//!
//! This module contains the core CLI logic: load configuration, fetch the
//! requested channel from a snapshot file, lay it out on a fresh canvas and
//! write the result.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, OutputFormat};

use std::fs;

use log::{info, warn};

use topograph::{
    TopologyBuilder, TopologyError, request::VisualizeRequest, source::SnapshotFile,
    surface::Canvas,
};

/// Run the Topograph CLI application
///
/// # Errors
///
/// Returns `TopologyError` for:
/// - Missing app id, credentials or channel selection
/// - Configuration loading errors
/// - Snapshot reading errors and unknown channels
/// - Rendering errors
/// - File I/O errors
pub fn run(args: &Args) -> Result<(), TopologyError> {
    info!(
        snapshot_path = args.snapshot,
        output_path = args.output;
        "Visualizing channel"
    );

    let app_config = config::load_config(args.config.as_ref())?;
    let builder = TopologyBuilder::new(app_config);

    let request = build_request(args);
    let source = SnapshotFile::new(&args.snapshot);
    let mut canvas = Canvas::new();

    let report = builder.visualize(&request, &source, &mut canvas)?;
    if !report.warnings().is_empty() {
        warn!(
            count = report.warnings().len();
            "Some parts of the channel could not be connected"
        );
    }

    let output = match args.format {
        OutputFormat::Svg => builder.render_svg(&canvas)?,
        OutputFormat::Json => builder.render_json(&canvas)?,
    };
    fs::write(&args.output, output)?;

    info!(
        output_file = args.output,
        nodes = report.nodes_created(),
        edges = report.edges_created();
        "Topology exported successfully"
    );

    Ok(())
}

fn build_request(args: &Args) -> VisualizeRequest {
    let mut request = VisualizeRequest::new();
    if let Some(app_id) = &args.app_id {
        request = request.with_app_id(app_id);
    }
    if let Some(secret_key) = &args.secret_key {
        request = request.with_secret_key(secret_key);
    }
    if let Some(auth_token) = &args.auth_token {
        request = request.with_auth_token(auth_token);
    }
    if let Some(channel_id) = &args.channel_id {
        request = request.with_channel_id(channel_id);
    }
    if let Some(channel_name) = &args.channel_name {
        request = request.with_channel_name(channel_name);
    }
    request
}
