//! Visualize requests and their preconditions.
//!
//! A [`VisualizeRequest`] carries the raw, user-supplied inputs of one
//! visualize invocation. Nothing is fetched or drawn until
//! [`VisualizeRequest::validate`] has turned it into an app id,
//! [`Credentials`] and a [`ChannelSelector`].
//!
//! Empty strings are treated exactly like missing values.

use std::fmt;

use thiserror::Error;

/// A required input is missing; the pass must not start.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreconditionError {
    #[error("App ID is required.")]
    MissingAppId,

    #[error("Either Secret Key or Auth Token is required.")]
    MissingCredentials,

    #[error("Either Channel ID or Channel Name is required.")]
    MissingChannel,
}

/// How the caller authenticates against the channel backend.
///
/// Building a token from a secret key is the backend client's business;
/// this type only records which of the two inputs was supplied.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// A ready-made auth token. Preferred when both inputs are present.
    Token(String),
    /// A secret key a token can be derived from.
    SecretKey(String),
}

// Keep secrets out of debug logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Token(_) => f.write_str("Token(..)"),
            Self::SecretKey(_) => f.write_str("SecretKey(..)"),
        }
    }
}

/// Identifies the channel to visualize by id, name, or both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSelector {
    id: Option<String>,
    name: Option<String>,
}

impl ChannelSelector {
    /// Selects a channel by id.
    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name: None,
        }
    }

    /// Selects a channel by name.
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: Some(name.into()),
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl fmt::Display for ChannelSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.id, &self.name) {
            (Some(id), Some(name)) => write!(f, "id `{id}` and name `{name}`"),
            (Some(id), None) => write!(f, "id `{id}`"),
            (None, Some(name)) => write!(f, "name `{name}`"),
            (None, None) => f.write_str("<none>"),
        }
    }
}

/// The validated inputs of a visualize invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    pub app_id: String,
    pub credentials: Credentials,
    pub channel: ChannelSelector,
}

/// Raw inputs of a visualize invocation.
///
/// # Examples
///
/// ```
/// use topograph::request::{PreconditionError, VisualizeRequest};
///
/// let request = VisualizeRequest::new()
///     .with_app_id("app")
///     .with_secret_key("secret");
/// assert_eq!(request.validate().unwrap_err(), PreconditionError::MissingChannel);
///
/// let request = request.with_channel_name("standup");
/// assert!(request.validate().is_ok());
/// ```
#[derive(Clone, Default)]
pub struct VisualizeRequest {
    app_id: Option<String>,
    secret_key: Option<String>,
    auth_token: Option<String>,
    channel_id: Option<String>,
    channel_name: Option<String>,
}

impl fmt::Debug for VisualizeRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VisualizeRequest")
            .field("app_id", &self.app_id)
            .field("secret_key", &self.secret_key.as_ref().map(|_| ".."))
            .field("auth_token", &self.auth_token.as_ref().map(|_| ".."))
            .field("channel_id", &self.channel_id)
            .field("channel_name", &self.channel_name)
            .finish()
    }
}

impl VisualizeRequest {
    /// Creates a request with every input missing.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_app_id(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = Some(app_id.into());
        self
    }

    pub fn with_secret_key(mut self, secret_key: impl Into<String>) -> Self {
        self.secret_key = Some(secret_key.into());
        self
    }

    pub fn with_auth_token(mut self, auth_token: impl Into<String>) -> Self {
        self.auth_token = Some(auth_token.into());
        self
    }

    pub fn with_channel_id(mut self, channel_id: impl Into<String>) -> Self {
        self.channel_id = Some(channel_id.into());
        self
    }

    pub fn with_channel_name(mut self, channel_name: impl Into<String>) -> Self {
        self.channel_name = Some(channel_name.into());
        self
    }

    /// Checks that every required input is present.
    ///
    /// Checks run in a fixed order and the first failure is returned: app
    /// id, then credentials, then channel selection.
    ///
    /// # Errors
    ///
    /// Returns the [`PreconditionError`] of the first missing input.
    pub fn validate(&self) -> Result<ValidatedRequest, PreconditionError> {
        let app_id = present(&self.app_id).ok_or(PreconditionError::MissingAppId)?;

        let credentials = match (present(&self.auth_token), present(&self.secret_key)) {
            (Some(token), _) => Credentials::Token(token.to_string()),
            (None, Some(secret_key)) => Credentials::SecretKey(secret_key.to_string()),
            (None, None) => return Err(PreconditionError::MissingCredentials),
        };

        let channel = ChannelSelector {
            id: present(&self.channel_id).map(str::to_string),
            name: present(&self.channel_name).map(str::to_string),
        };
        if channel.id.is_none() && channel.name.is_none() {
            return Err(PreconditionError::MissingChannel);
        }

        Ok(ValidatedRequest {
            app_id: app_id.to_string(),
            credentials,
            channel,
        })
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}
