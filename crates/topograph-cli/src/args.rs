//! Command-line argument definitions for the Topograph CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments select the snapshot and channel to draw, carry
//! the credentials for the channel backend, and control output and logging.

use std::fmt;

use clap::{Parser, ValueEnum};

/// Output document format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// SVG drawing of the canvas
    #[default]
    Svg,
    /// JSON listing of nodes and edges
    Json,
}

/// Command-line arguments for the Topograph tool
#[derive(Parser, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the channel snapshot (JSON)
    #[arg(short, long)]
    pub snapshot: String,

    /// Application ID
    #[arg(long, env = "APP_ID")]
    pub app_id: Option<String>,

    /// Secret key of the application
    #[arg(long, env = "SECRET_KEY", hide_env_values = true)]
    pub secret_key: Option<String>,

    /// Ready-made auth token, used instead of the secret key
    #[arg(long, env = "AUTH_TOKEN", hide_env_values = true)]
    pub auth_token: Option<String>,

    /// ID of the channel to draw
    #[arg(long)]
    pub channel_id: Option<String>,

    /// Name of the channel to draw
    #[arg(long)]
    pub channel_name: Option<String>,

    /// Path to the output file
    #[arg(short, long, default_value = "out.svg")]
    pub output: String,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Svg)]
    pub format: OutputFormat,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

// Credentials never reach debug logs.
impl fmt::Debug for Args {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Args")
            .field("snapshot", &self.snapshot)
            .field("app_id", &self.app_id)
            .field("secret_key", &self.secret_key.as_ref().map(|_| ".."))
            .field("auth_token", &self.auth_token.as_ref().map(|_| ".."))
            .field("channel_id", &self.channel_id)
            .field("channel_name", &self.channel_name)
            .field("output", &self.output)
            .field("format", &self.format)
            .field("config", &self.config)
            .field("log_level", &self.log_level)
            .finish()
    }
}
