//! Channel discovery.
//!
//! The layout pass never talks to a channel backend itself; it asks a
//! [`ChannelSource`] for the snapshot of one channel and waits for the
//! answer. The call is made once per invocation and is never retried, so a
//! failure surfaces to the caller exactly as the source reported it.
//!
//! [`SnapshotDocument`] and [`SnapshotFile`] are sources backed by a
//! recorded snapshot, which is how the CLI and the tests feed channels in.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use log::{debug, info};
use serde::Deserialize;
use thiserror::Error;

use topograph_core::channel::Channel;

use crate::request::{ChannelSelector, Credentials};

/// Failure reported by a [`ChannelSource`].
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to read snapshot `{path}`: {err}")]
    Io {
        path: PathBuf,
        #[source]
        err: io::Error,
    },

    #[error("Failed to parse snapshot: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Snapshot belongs to app `{expected}`, not `{requested}`")]
    AppMismatch { expected: String, requested: String },

    #[error("No channel found with {0}")]
    ChannelNotFound(ChannelSelector),
}

/// Something that can look up the current snapshot of a channel.
pub trait ChannelSource {
    /// Finds the channel matching `selector` and returns its snapshot.
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] when the channel cannot be found or the
    /// backend cannot be reached.
    fn find(
        &self,
        app_id: &str,
        credentials: &Credentials,
        selector: &ChannelSelector,
    ) -> Result<Channel, SourceError>;
}

/// A recorded set of channel snapshots.
///
/// ```
/// use topograph::source::SnapshotDocument;
///
/// let doc: SnapshotDocument = serde_json::from_str(r#"{
///     "appId": "app",
///     "channels": [{ "id": "ch-1", "name": "standup" }]
/// }"#).unwrap();
/// assert_eq!(doc.channels().len(), 1);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotDocument {
    /// App the snapshot was recorded for; unchecked when absent.
    #[serde(default)]
    app_id: Option<String>,

    #[serde(default)]
    channels: Vec<Channel>,
}

impl SnapshotDocument {
    /// Creates a document holding the given channels for any app.
    pub fn new(channels: Vec<Channel>) -> Self {
        Self {
            app_id: None,
            channels,
        }
    }

    /// Restricts the document to a single app (builder style).
    pub fn with_app_id(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = Some(app_id.into());
        self
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }
}

impl ChannelSource for SnapshotDocument {
    fn find(
        &self,
        app_id: &str,
        _credentials: &Credentials,
        selector: &ChannelSelector,
    ) -> Result<Channel, SourceError> {
        if let Some(expected) = self.app_id.as_deref().filter(|expected| *expected != app_id) {
            return Err(SourceError::AppMismatch {
                expected: expected.to_string(),
                requested: app_id.to_string(),
            });
        }

        // An id wins over a name; when both are given both must match.
        let found = self.channels.iter().find(|channel| {
            let id_matches = selector.id().is_none_or(|id| channel.id() == id);
            let name_matches = selector.name().is_none_or(|name| channel.name() == Some(name));
            id_matches && name_matches
        });

        match found {
            Some(channel) => {
                debug!(channel_id = channel.id(); "Channel found in snapshot");
                Ok(channel.clone())
            }
            None => Err(SourceError::ChannelNotFound(selector.clone())),
        }
    }
}

/// A [`SnapshotDocument`] stored as JSON on disk.
///
/// The file is read on every lookup.
#[derive(Debug, Clone)]
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads and parses the snapshot document.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Io`] if the file cannot be read and
    /// [`SourceError::Parse`] if it is not a valid snapshot document.
    pub fn load(&self) -> Result<SnapshotDocument, SourceError> {
        info!(path = self.path.display().to_string(); "Loading channel snapshot");

        let content = fs::read_to_string(&self.path).map_err(|err| SourceError::Io {
            path: self.path.clone(),
            err,
        })?;

        Ok(serde_json::from_str(&content)?)
    }
}

impl ChannelSource for SnapshotFile {
    fn find(
        &self,
        app_id: &str,
        credentials: &Credentials,
        selector: &ChannelSelector,
    ) -> Result<Channel, SourceError> {
        self.load()?.find(app_id, credentials, selector)
    }
}
