//! Topograph - draws the topology of a real-time communication channel.
//!
//! Given a snapshot of a channel's members, the streams they publish and the
//! subscriptions other members hold on those streams, Topograph places one
//! node per entity on a canvas and connects them:
//!
//! ```text
//! member ──► publication ──► subscription ──► subscribing member
//! ```
//!
//! People are laid out in a left column block and bots (automated relays) in
//! a block starting further right. Placement is a single deterministic pass
//! over the snapshot, see [`plan`] for what gets drawn and [`layout`] for
//! where.

pub mod color;
pub mod config;
pub mod export;
pub mod layout;
pub mod plan;
pub mod request;
pub mod source;
pub mod surface;

mod error;

pub use topograph_core::{channel, geometry, node};

pub use error::TopologyError;

use log::{debug, info, trace};

use config::AppConfig;
use export::{Exporter, json::JsonExporter, svg::SvgExporter};
use layout::{EmitReport, Emitter};
use request::VisualizeRequest;
use source::ChannelSource;
use surface::{Canvas, Surface};

/// Builder for visualizing channels.
///
/// # Examples
///
/// ```rust
/// use topograph::{
///     TopologyBuilder,
///     channel::{Channel, Member, MemberType},
///     request::VisualizeRequest,
///     source::SnapshotDocument,
///     surface::Canvas,
/// };
///
/// let source = SnapshotDocument::new(vec![
///     Channel::new("ch-1").with_member(Member::new("alice", MemberType::Person)),
/// ]);
/// let request = VisualizeRequest::new()
///     .with_app_id("app")
///     .with_auth_token("token")
///     .with_channel_id("ch-1");
///
/// let builder = TopologyBuilder::default();
/// let mut canvas = Canvas::new();
/// let report = builder.visualize(&request, &source, &mut canvas)
///     .expect("Failed to visualize");
/// assert_eq!(report.nodes_created(), 1);
///
/// let svg = builder.render_svg(&canvas).expect("Failed to render");
/// assert!(svg.contains("alice (person)"));
/// ```
#[derive(Default)]
pub struct TopologyBuilder {
    config: AppConfig,
}

impl TopologyBuilder {
    /// Create a new builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Fetch a channel snapshot and draw it onto `surface`.
    ///
    /// The request is validated before the source is asked for anything.
    /// The source is called exactly once. Nodes are added to the surface as
    /// they are placed; nothing already on the surface is touched, so
    /// repeating the call draws a second, overlapping copy.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::Precondition`] if a required input is missing
    /// and [`TopologyError::Source`] if the snapshot cannot be fetched.
    /// Unresolvable references inside the snapshot are not errors; they are
    /// listed in [`EmitReport::warnings`].
    pub fn visualize<S: Surface>(
        &self,
        request: &VisualizeRequest,
        source: &dyn ChannelSource,
        surface: &mut S,
    ) -> Result<EmitReport, TopologyError> {
        let validated = request.validate()?;
        info!(
            app_id = validated.app_id,
            channel:% = validated.channel;
            "Fetching channel snapshot"
        );

        let channel = source.find(&validated.app_id, &validated.credentials, &validated.channel)?;
        debug!(
            channel_id = channel.id(),
            members = channel.members().len(),
            publications = channel.publications().len(),
            subscriptions = channel.subscriptions().len();
            "Channel snapshot fetched"
        );
        trace!(channel:?; "Fetched channel");

        let plan = plan::plan(&channel);
        let report = Emitter::new(self.config.layout().clone()).emit(&plan, surface);

        Ok(report)
    }

    /// Render a canvas to an SVG string.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::Export`] if a configured color is invalid.
    pub fn render_svg(&self, canvas: &Canvas) -> Result<String, TopologyError> {
        let svg = SvgExporter::new(self.config.style().clone()).export_canvas(canvas)?;
        info!("SVG rendered successfully");
        Ok(svg)
    }

    /// Render a canvas to a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::Export`] if serialization fails.
    pub fn render_json(&self, canvas: &Canvas) -> Result<String, TopologyError> {
        Ok(JsonExporter.export_canvas(canvas)?)
    }
}
