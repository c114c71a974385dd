//! Channel snapshot model.
//!
//! A [`Channel`] is the read-only, point-in-time view of a real-time
//! communication channel: who is in it ([`Member`]), which streams they
//! offer ([`Publication`]) and who consumes those streams
//! ([`Subscription`]). References between entities are plain ids, exactly as
//! the channel backend reports them; nothing here guarantees that a
//! reference resolves.
//!
//! All types deserialize from the camel-cased JSON shape used by snapshot
//! files:
//!
//! ```
//! # use topograph_core::channel::{Channel, MemberType};
//! let json = r#"{
//!     "id": "ch-1",
//!     "name": "standup",
//!     "members": [{ "id": "alice", "name": "Alice", "type": "person" }],
//!     "publications": [{ "id": "pub-1", "publisher": "alice", "contentType": "video" }],
//!     "subscriptions": []
//! }"#;
//!
//! let channel: Channel = serde_json::from_str(json).unwrap();
//! assert_eq!(channel.members()[0].member_type(), MemberType::Person);
//! assert_eq!(channel.publications()[0].content_type(), "video");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Whether a member is a human participant or an automated relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberType {
    Person,
    Bot,
}

impl MemberType {
    /// The member types in sweep order: people first, then bots.
    pub const SWEEP_ORDER: [MemberType; 2] = [MemberType::Person, MemberType::Bot];

    /// Returns the lowercase name used in labels and snapshot files.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Person => "person",
            Self::Bot => "bot",
        }
    }
}

impl fmt::Display for MemberType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A channel participant.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Member {
    id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(rename = "type")]
    member_type: MemberType,
}

impl Member {
    /// Creates a member without a display name.
    pub fn new(id: impl Into<String>, member_type: MemberType) -> Self {
        Self {
            id: id.into(),
            name: None,
            member_type,
        }
    }

    /// Sets the display name (builder style).
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn member_type(&self) -> MemberType {
        self.member_type
    }
}

/// A stream offered by a member.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Publication {
    id: String,
    publisher: String,
    content_type: String,
}

impl Publication {
    pub fn new(
        id: impl Into<String>,
        publisher: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            publisher: publisher.into(),
            content_type: content_type.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Id of the publishing member.
    pub fn publisher(&self) -> &str {
        &self.publisher
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }
}

/// A member's consumption of a publication.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Subscription {
    id: String,
    publication: String,
    subscriber: String,
}

impl Subscription {
    pub fn new(
        id: impl Into<String>,
        publication: impl Into<String>,
        subscriber: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            publication: publication.into(),
            subscriber: subscriber.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Id of the subscribed publication.
    pub fn publication(&self) -> &str {
        &self.publication
    }

    /// Id of the subscribing member.
    pub fn subscriber(&self) -> &str {
        &self.subscriber
    }
}

/// Snapshot of a single channel.
///
/// Sequence order is significant: every traversal over a channel follows the
/// order in which the backend listed the entities.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Channel {
    id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default)]
    members: Vec<Member>,
    #[serde(default)]
    publications: Vec<Publication>,
    #[serde(default)]
    subscriptions: Vec<Subscription>,
}

impl Channel {
    /// Creates an empty channel snapshot.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_member(mut self, member: Member) -> Self {
        self.members.push(member);
        self
    }

    pub fn with_publication(mut self, publication: Publication) -> Self {
        self.publications.push(publication);
        self
    }

    pub fn with_subscription(mut self, subscription: Subscription) -> Self {
        self.subscriptions.push(subscription);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn publications(&self) -> &[Publication] {
        &self.publications
    }

    pub fn subscriptions(&self) -> &[Subscription] {
        &self.subscriptions
    }

    /// Returns the members of the given type, in snapshot order.
    pub fn members_of(&self, member_type: MemberType) -> impl Iterator<Item = &Member> {
        self.members
            .iter()
            .filter(move |member| member.member_type == member_type)
    }

    /// Returns the publications offered by the given member, in snapshot order.
    pub fn publications_by<'a>(
        &'a self,
        member_id: &'a str,
    ) -> impl Iterator<Item = &'a Publication> {
        self.publications
            .iter()
            .filter(move |publication| publication.publisher == member_id)
    }

    /// Returns the subscriptions to the given publication, in snapshot order.
    pub fn subscriptions_to<'a>(
        &'a self,
        publication_id: &'a str,
    ) -> impl Iterator<Item = &'a Subscription> {
        self.subscriptions
            .iter()
            .filter(move |subscription| subscription.publication == publication_id)
    }
}
