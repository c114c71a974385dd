//! Configuration types for Topograph layout and rendering.
//!
//! This module provides configuration structures that control where nodes
//! are placed and how the resulting canvas is styled. All types implement
//! [`serde::Deserialize`] for loading from external sources; every field is
//! optional and falls back to its default.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining layout and style settings.
//! - [`LayoutConfig`] - Cursor steps and column offsets used by the layout pass.
//! - [`StyleConfig`] - Colors used when exporting the canvas to SVG.
//!
//! # Example
//!
//! ```
//! # use topograph::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.layout().column_step(), 400.0);
//! assert!(config.style().background_color().is_ok());
//! ```

use serde::Deserialize;

use topograph_core::{channel::MemberType, node::NodeKind};

use crate::color::Color;

/// Top-level application configuration combining layout and style settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified layout and style configurations.
    pub fn new(layout: LayoutConfig, style: StyleConfig) -> Self {
        Self { layout, style }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }
}

/// Cursor settings for the layout pass.
///
/// The defaults place each member's publications one column (400px) to the
/// right of the member, stack subscriptions 200px apart, and start the bot
/// column 1500px from the left edge.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Horizontal advance after a member or publication node.
    column_step: f32,

    /// Vertical advance after a subscription node and after each publication.
    row_step: f32,

    /// Base column of the person sweep.
    person_column: f32,

    /// Base column of the bot sweep.
    bot_column: f32,

    /// Keep accumulating the row cursor into the bot sweep instead of
    /// starting it back at the top.
    carry_rows_across_groups: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            column_step: 400.0,
            row_step: 200.0,
            person_column: 0.0,
            bot_column: 1500.0,
            carry_rows_across_groups: false,
        }
    }
}

impl LayoutConfig {
    /// Returns the horizontal cursor advance.
    pub fn column_step(&self) -> f32 {
        self.column_step
    }

    /// Returns the vertical cursor advance.
    pub fn row_step(&self) -> f32 {
        self.row_step
    }

    /// Returns the base column for members of the given type.
    pub fn base_column(&self, member_type: MemberType) -> f32 {
        match member_type {
            MemberType::Person => self.person_column,
            MemberType::Bot => self.bot_column,
        }
    }

    /// Returns whether the row cursor carries over into the bot sweep.
    pub fn carry_rows_across_groups(&self) -> bool {
        self.carry_rows_across_groups
    }

    /// Sets the horizontal cursor advance (builder style).
    pub fn with_column_step(mut self, column_step: f32) -> Self {
        self.column_step = column_step;
        self
    }

    /// Sets the vertical cursor advance (builder style).
    pub fn with_row_step(mut self, row_step: f32) -> Self {
        self.row_step = row_step;
        self
    }

    /// Sets the base column of the bot sweep (builder style).
    pub fn with_bot_column(mut self, bot_column: f32) -> Self {
        self.bot_column = bot_column;
        self
    }

    /// Sets whether rows carry across groups (builder style).
    pub fn with_carry_rows_across_groups(mut self, carry: bool) -> Self {
        self.carry_rows_across_groups = carry;
        self
    }
}

/// Visual styling configuration for exported canvases.
///
/// Colors are CSS color strings. Unset node colors fall back to a built-in
/// palette; an unset background leaves the SVG transparent.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct StyleConfig {
    #[serde(default)]
    background_color: Option<String>,

    #[serde(default)]
    member_color: Option<String>,

    #[serde(default)]
    publication_color: Option<String>,

    #[serde(default)]
    subscription_color: Option<String>,
}

impl StyleConfig {
    /// Returns the parsed background [`Color`], or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed
    /// into a valid [`Color`].
    pub fn background_color(&self) -> Result<Option<Color>, String> {
        self.background_color
            .as_deref()
            .map(Color::new)
            .transpose()
            .map_err(|err| format!("Invalid background color in config: {err}"))
    }

    /// Returns the fill [`Color`] for nodes of the given kind.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string for `kind` cannot be
    /// parsed.
    pub fn node_color(&self, kind: NodeKind) -> Result<Color, String> {
        let (configured, fallback) = match kind {
            NodeKind::Member => (&self.member_color, "#dbeafe"),
            NodeKind::Publication => (&self.publication_color, "#dcfce7"),
            NodeKind::Subscription => (&self.subscription_color, "#fef3c7"),
        };

        Color::new(configured.as_deref().unwrap_or(fallback))
            .map_err(|err| format!("Invalid {kind} color in config: {err}"))
    }
}
