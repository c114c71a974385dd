//! Error adapter for converting TopologyError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI.

use std::fmt;

use miette::Diagnostic as MietteDiagnostic;

use topograph::{TopologyError, request::PreconditionError, source::SourceError};

/// Adapter presenting a [`TopologyError`] as a miette diagnostic.
pub struct ErrorAdapter<'a>(pub &'a TopologyError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(self.0)
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            TopologyError::Io(_) => "topograph::io",
            TopologyError::Precondition(_) => "topograph::precondition",
            TopologyError::Source(_) => "topograph::source",
            TopologyError::Config(_) => "topograph::config",
            TopologyError::Export(_) => "topograph::export",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match &self.0 {
            TopologyError::Precondition(PreconditionError::MissingAppId) => {
                "pass --app-id or set APP_ID"
            }
            TopologyError::Precondition(PreconditionError::MissingCredentials) => {
                "pass --secret-key or --auth-token, or set SECRET_KEY or AUTH_TOKEN"
            }
            TopologyError::Precondition(PreconditionError::MissingChannel) => {
                "pass --channel-id or --channel-name"
            }
            TopologyError::Source(SourceError::ChannelNotFound(_)) => {
                "check the channel id or name against the snapshot"
            }
            _ => return None,
        };
        Some(Box::new(help))
    }
}
