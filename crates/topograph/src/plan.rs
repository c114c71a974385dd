//! Snapshot mapping: deciding *what* to draw.
//!
//! [`plan`] walks a [`Channel`] snapshot and produces a [`Plan`], the ordered
//! list of node-creation and connection steps the layout pass will replay.
//! The plan holds no positions; it only fixes the order in which nodes are
//! created, which in turn drives every cursor movement in
//! [`crate::layout`].
//!
//! # Traversal
//!
//! Members are visited in two sweeps, people first and bots second, each in
//! snapshot order. Under every member come its publications, and under
//! every publication its subscriptions:
//!
//! ```text
//! Group(person)
//!   Node(member A)
//!     Node(publication P)   Connect(A -> P)
//!       Node(subscription S)  Connect(P -> S)
//!     EndPublication
//!   EndMember
//! Group(bot)
//!   Node(member B)
//!   EndMember
//! Connect(S -> B)           <- fan-in pass
//! ```
//!
//! Once both sweeps are done, the fan-in pass connects every subscription
//! node back to its subscriber's member node. Subscribers are visited in the
//! order they were first seen, and each subscriber's subscriptions in the
//! order they were planned.
//!
//! # Warnings
//!
//! A subscriber that is not a member of the channel cannot be connected.
//! That single edge is skipped and reported as
//! [`MappingWarning::UnresolvedSubscriber`]; the rest of the plan is
//! unaffected. Publications whose publisher is not a member are never
//! reached by the sweeps and are reported as
//! [`MappingWarning::OrphanPublication`]. Subscriptions to a publication id
//! the snapshot does not contain are reported as
//! [`MappingWarning::DanglingSubscription`].

use std::{
    collections::{HashMap, HashSet},
    fmt,
};

use indexmap::IndexMap;
use log::{debug, warn};

use topograph_core::{
    channel::{Channel, Member, MemberType, Publication, Subscription},
    node::NodeKind,
};

/// Position of a node step among all node steps of a plan.
///
/// Slots are assigned densely from zero in creation order, so the n-th
/// created node always has slot n.
pub type Slot = usize;

/// A node to be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSpec<'a> {
    id: &'a str,
    kind: NodeKind,
    label: String,
}

impl<'a> NodeSpec<'a> {
    fn member(member: &'a Member) -> Self {
        Self {
            id: member.id(),
            kind: NodeKind::Member,
            label: member_label(member),
        }
    }

    fn publication(publication: &'a Publication) -> Self {
        Self {
            id: publication.id(),
            kind: NodeKind::Publication,
            label: format!("{} ({})", publication.id(), publication.content_type()),
        }
    }

    fn subscription(subscription: &'a Subscription) -> Self {
        Self {
            id: subscription.id(),
            kind: NodeKind::Subscription,
            label: subscription.id().to_string(),
        }
    }

    /// Id of the snapshot entity this node represents.
    pub fn id(&self) -> &'a str {
        self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

/// Member labels read `name (type)`, with the id standing in for a missing name.
fn member_label(member: &Member) -> String {
    let display = member
        .name()
        .filter(|name| !name.is_empty())
        .unwrap_or(member.id());
    format!("{display} ({})", member.member_type())
}

/// One instruction of a [`Plan`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step<'a> {
    /// Start of the sweep over members of one type.
    Group(MemberType),
    /// Create a node. Its slot is the number of `Node` steps before it.
    Node(NodeSpec<'a>),
    /// Connect the output of `from` to the input of `to`.
    Connect { from: Slot, to: Slot },
    /// All subscriptions of the current publication have been planned.
    EndPublication,
    /// All publications of the current member have been planned.
    EndMember,
}

/// A problem found while mapping a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingWarning {
    /// The subscriber of a subscription has no member node; the fan-in edge
    /// was skipped.
    UnresolvedSubscriber {
        subscription: String,
        subscriber: String,
    },
    /// The publisher of a publication has no member node; neither the
    /// publication nor its subscriptions were planned.
    OrphanPublication {
        publication: String,
        publisher: String,
    },
    /// The publication of a subscription is not in the snapshot; the
    /// subscription was not planned.
    DanglingSubscription {
        subscription: String,
        publication: String,
    },
}

impl fmt::Display for MappingWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnresolvedSubscriber {
                subscription,
                subscriber,
            } => write!(
                f,
                "subscription `{subscription}` refers to unknown subscriber `{subscriber}`; edge skipped"
            ),
            Self::OrphanPublication {
                publication,
                publisher,
            } => write!(
                f,
                "publication `{publication}` refers to unknown publisher `{publisher}`; not drawn"
            ),
            Self::DanglingSubscription {
                subscription,
                publication,
            } => write!(
                f,
                "subscription `{subscription}` refers to unknown publication `{publication}`; not drawn"
            ),
        }
    }
}

/// The ordered instructions for drawing one snapshot.
#[derive(Debug, Clone, Default)]
pub struct Plan<'a> {
    steps: Vec<Step<'a>>,
    warnings: Vec<MappingWarning>,
    nodes_count: usize,
    edges_count: usize,
}

impl<'a> Plan<'a> {
    pub fn steps(&self) -> &[Step<'a>] {
        &self.steps
    }

    pub fn warnings(&self) -> &[MappingWarning] {
        &self.warnings
    }

    /// Number of nodes the plan creates.
    pub fn nodes_count(&self) -> usize {
        self.nodes_count
    }

    /// Number of connections the plan makes.
    pub fn edges_count(&self) -> usize {
        self.edges_count
    }

    /// Returns the planned nodes in creation order, so that the node at
    /// index n has slot n.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeSpec<'a>> {
        self.steps.iter().filter_map(|step| match step {
            Step::Node(node) => Some(node),
            _ => None,
        })
    }

    /// Returns the planned connections as `(from, to)` slot pairs.
    pub fn connections(&self) -> impl Iterator<Item = (Slot, Slot)> + '_ {
        self.steps.iter().filter_map(|step| match step {
            Step::Connect { from, to } => Some((*from, *to)),
            _ => None,
        })
    }
}

/// Accumulates steps while the sweeps run.
#[derive(Default)]
struct PlanBuilder<'a> {
    plan: Plan<'a>,
    member_slots: HashMap<&'a str, Slot>,
    subscribers: IndexMap<&'a str, Vec<(Slot, &'a str)>>,
}

impl<'a> PlanBuilder<'a> {
    fn push(&mut self, step: Step<'a>) {
        self.plan.steps.push(step);
    }

    fn node(&mut self, node: NodeSpec<'a>) -> Slot {
        let slot = self.plan.nodes_count;
        self.plan.nodes_count += 1;
        self.push(Step::Node(node));
        slot
    }

    fn connect(&mut self, from: Slot, to: Slot) {
        self.plan.edges_count += 1;
        self.push(Step::Connect { from, to });
    }

    fn warn(&mut self, warning: MappingWarning) {
        warn!(warning:% = warning; "Channel snapshot is inconsistent");
        self.plan.warnings.push(warning);
    }

    fn sweep(&mut self, channel: &'a Channel, member_type: MemberType) {
        self.push(Step::Group(member_type));

        for member in channel.members_of(member_type) {
            let member_slot = self.node(NodeSpec::member(member));
            // A repeated member id points at its latest node.
            self.member_slots.insert(member.id(), member_slot);

            for publication in channel.publications_by(member.id()) {
                let publication_slot = self.node(NodeSpec::publication(publication));
                self.connect(member_slot, publication_slot);

                for subscription in channel.subscriptions_to(publication.id()) {
                    let subscription_slot = self.node(NodeSpec::subscription(subscription));
                    self.connect(publication_slot, subscription_slot);
                    self.subscribers
                        .entry(subscription.subscriber())
                        .or_default()
                        .push((subscription_slot, subscription.id()));
                }

                self.push(Step::EndPublication);
            }

            self.push(Step::EndMember);
        }
    }

    fn report_orphans(&mut self, channel: &'a Channel) {
        for publication in channel.publications() {
            if !self.member_slots.contains_key(publication.publisher()) {
                self.warn(MappingWarning::OrphanPublication {
                    publication: publication.id().to_string(),
                    publisher: publication.publisher().to_string(),
                });
            }
        }

        let publication_ids: HashSet<&str> =
            channel.publications().iter().map(Publication::id).collect();
        for subscription in channel.subscriptions() {
            if !publication_ids.contains(subscription.publication()) {
                self.warn(MappingWarning::DanglingSubscription {
                    subscription: subscription.id().to_string(),
                    publication: subscription.publication().to_string(),
                });
            }
        }
    }

    fn fan_in(&mut self) {
        let subscribers = std::mem::take(&mut self.subscribers);

        for (subscriber, subscriptions) in subscribers {
            match self.member_slots.get(subscriber).copied() {
                Some(member_slot) => {
                    for (subscription_slot, _) in subscriptions {
                        self.connect(subscription_slot, member_slot);
                    }
                }
                None => {
                    for (_, subscription) in subscriptions {
                        self.warn(MappingWarning::UnresolvedSubscriber {
                            subscription: subscription.to_string(),
                            subscriber: subscriber.to_string(),
                        });
                    }
                }
            }
        }
    }
}

/// Maps a channel snapshot to the plan that draws it.
///
/// The result depends only on the snapshot and its ordering; mapping the
/// same snapshot twice yields identical plans.
///
/// # Examples
///
/// ```
/// use topograph::plan;
/// use topograph_core::channel::{Channel, Member, MemberType, Publication};
///
/// let channel = Channel::new("ch")
///     .with_member(Member::new("alice", MemberType::Person))
///     .with_publication(Publication::new("cam", "alice", "video"));
///
/// let plan = plan::plan(&channel);
/// assert_eq!(plan.nodes_count(), 2);
/// assert_eq!(plan.connections().collect::<Vec<_>>(), vec![(0, 1)]);
/// ```
pub fn plan(channel: &Channel) -> Plan<'_> {
    let mut builder = PlanBuilder::default();

    for member_type in MemberType::SWEEP_ORDER {
        builder.sweep(channel, member_type);
    }
    builder.report_orphans(channel);
    builder.fan_in();

    let plan = builder.plan;
    debug!(
        channel_id = channel.id(),
        nodes = plan.nodes_count,
        edges = plan.edges_count,
        warnings = plan.warnings.len();
        "Snapshot mapped"
    );
    plan
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn kinds_and_ids<'a>(plan: &'a Plan<'_>) -> Vec<(NodeKind, &'a str)> {
        plan.nodes().map(|node| (node.kind(), node.id())).collect()
    }

    #[test]
    fn test_empty_channel() {
        let channel = Channel::new("empty");
        let plan = plan(&channel);

        assert_eq!(plan.nodes_count(), 0);
        assert_eq!(plan.edges_count(), 0);
        assert!(plan.warnings().is_empty());
        assert_eq!(
            plan.steps(),
            &[Step::Group(MemberType::Person), Step::Group(MemberType::Bot)]
        );
    }

    #[test]
    fn test_people_before_bots() {
        let channel = Channel::new("ch")
            .with_member(Member::new("relay", MemberType::Bot))
            .with_member(Member::new("m1", MemberType::Person))
            .with_member(Member::new("m2", MemberType::Person));
        let plan = plan(&channel);

        assert_eq!(
            kinds_and_ids(&plan),
            vec![
                (NodeKind::Member, "m1"),
                (NodeKind::Member, "m2"),
                (NodeKind::Member, "relay"),
            ]
        );
    }

    #[test]
    fn test_step_sequence_for_single_chain() {
        let channel = Channel::new("ch")
            .with_member(Member::new("A", MemberType::Person))
            .with_member(Member::new("B", MemberType::Bot))
            .with_publication(Publication::new("P", "A", "video"))
            .with_subscription(Subscription::new("S", "P", "B"));
        let plan = plan(&channel);

        let steps: Vec<_> = plan
            .steps()
            .iter()
            .map(|step| match step {
                Step::Group(member_type) => format!("group {member_type}"),
                Step::Node(node) => format!("node {}", node.id()),
                Step::Connect { from, to } => format!("connect {from}->{to}"),
                Step::EndPublication => "end publication".to_string(),
                Step::EndMember => "end member".to_string(),
            })
            .collect();

        assert_eq!(
            steps,
            vec![
                "group person",
                "node A",
                "node P",
                "connect 0->1",
                "node S",
                "connect 1->2",
                "end publication",
                "end member",
                "group bot",
                "node B",
                "end member",
                "connect 2->3",
            ]
        );
    }

    #[test]
    fn test_labels() {
        let channel = Channel::new("ch")
            .with_member(Member::new("alice", MemberType::Person).with_name("Alice"))
            .with_member(Member::new("relay", MemberType::Bot))
            .with_publication(Publication::new("mic", "alice", "audio"))
            .with_subscription(Subscription::new("sub-1", "mic", "relay"));
        let plan = plan(&channel);

        let labels: Vec<_> = plan.nodes().map(NodeSpec::label).collect();
        assert_eq!(
            labels,
            vec!["Alice (person)", "mic (audio)", "sub-1", "relay (bot)"]
        );
    }

    #[test]
    fn test_fan_in_groups_by_first_seen_subscriber() {
        let channel = Channel::new("ch")
            .with_member(Member::new("a", MemberType::Person))
            .with_member(Member::new("b", MemberType::Person))
            .with_member(Member::new("c", MemberType::Person))
            .with_publication(Publication::new("pa", "a", "video"))
            .with_publication(Publication::new("pb", "b", "video"))
            .with_subscription(Subscription::new("s1", "pa", "c"))
            .with_subscription(Subscription::new("s2", "pa", "b"))
            .with_subscription(Subscription::new("s3", "pb", "c"));
        let plan = plan(&channel);

        // Slots: a=0 pa=1 s1=2 s2=3 b=4 pb=5 s3=6 c=7
        let fan_in: Vec<_> = plan.connections().skip(5).collect();
        assert_eq!(fan_in, vec![(2, 7), (6, 7), (3, 4)]);
    }

    #[test]
    fn test_unresolved_subscriber_is_skipped() {
        let channel = Channel::new("ch")
            .with_member(Member::new("a", MemberType::Person))
            .with_member(Member::new("b", MemberType::Person))
            .with_publication(Publication::new("p", "a", "data"))
            .with_subscription(Subscription::new("s-ok", "p", "b"))
            .with_subscription(Subscription::new("s-gone", "p", "ghost"));
        let plan = plan(&channel);

        assert_eq!(plan.nodes_count(), 5);
        // a->p, p->s-ok, p->s-gone, s-ok->b
        assert_eq!(plan.edges_count(), 4);
        assert_eq!(
            plan.warnings(),
            &[MappingWarning::UnresolvedSubscriber {
                subscription: "s-gone".to_string(),
                subscriber: "ghost".to_string(),
            }]
        );
    }

    #[test]
    fn test_orphan_publication_reported() {
        let channel = Channel::new("ch")
            .with_member(Member::new("a", MemberType::Person))
            .with_publication(Publication::new("p", "departed", "video"))
            .with_subscription(Subscription::new("s", "p", "a"));
        let plan = plan(&channel);

        assert_eq!(plan.nodes_count(), 1);
        assert_eq!(plan.edges_count(), 0);
        assert_eq!(
            plan.warnings(),
            &[MappingWarning::OrphanPublication {
                publication: "p".to_string(),
                publisher: "departed".to_string(),
            }]
        );
    }

    #[test]
    fn test_subscription_to_unknown_publication_reported() {
        let channel = Channel::new("ch")
            .with_member(Member::new("a", MemberType::Person))
            .with_subscription(Subscription::new("s", "no-such-pub", "a"));
        let plan = plan(&channel);

        assert_eq!(plan.nodes_count(), 1);
        assert_eq!(plan.edges_count(), 0);
        assert_eq!(
            plan.warnings(),
            &[MappingWarning::DanglingSubscription {
                subscription: "s".to_string(),
                publication: "no-such-pub".to_string(),
            }]
        );
    }

    #[test]
    fn test_empty_member_name_falls_back_to_id() {
        let channel = Channel::new("ch")
            .with_member(Member::new("alice", MemberType::Person).with_name(""));
        let plan = plan(&channel);

        let labels: Vec<_> = plan.nodes().map(NodeSpec::label).collect();
        assert_eq!(labels, vec!["alice (person)"]);
    }

    #[test]
    fn test_duplicate_member_id_fans_into_latest_node() {
        let channel = Channel::new("ch")
            .with_member(Member::new("dup", MemberType::Person))
            .with_member(Member::new("pub", MemberType::Person))
            .with_member(Member::new("dup", MemberType::Bot))
            .with_publication(Publication::new("p", "pub", "video"))
            .with_subscription(Subscription::new("s", "p", "dup"));
        let plan = plan(&channel);

        // Slots: dup=0 pub=1 p=2 s=3 dup=4
        assert_eq!(plan.connections().last(), Some((3, 4)));
    }

    #[test]
    fn test_warning_display() {
        let warning = MappingWarning::UnresolvedSubscriber {
            subscription: "s".into(),
            subscriber: "x".into(),
        };
        assert_eq!(
            warning.to_string(),
            "subscription `s` refers to unknown subscriber `x`; edge skipped"
        );
    }

    // ===================
    // Proptest Strategies
    // ===================

    /// Channels with a handful of members and random, always-resolvable references.
    fn channel_strategy() -> impl Strategy<Value = Channel> {
        (
            prop::collection::vec(any::<bool>(), 0..6),
            prop::collection::vec(any::<prop::sample::Index>(), 0..8),
            prop::collection::vec(
                (any::<prop::sample::Index>(), any::<prop::sample::Index>()),
                0..12,
            ),
        )
            .prop_map(|(member_is_bot, publishers, subscriptions)| {
                let mut channel = Channel::new("prop");
                for (i, is_bot) in member_is_bot.iter().enumerate() {
                    let member_type = if *is_bot {
                        MemberType::Bot
                    } else {
                        MemberType::Person
                    };
                    channel = channel.with_member(Member::new(format!("m{i}"), member_type));
                }
                if member_is_bot.is_empty() {
                    return channel;
                }
                for (i, publisher) in publishers.iter().enumerate() {
                    let publisher = publisher.index(member_is_bot.len());
                    channel = channel.with_publication(Publication::new(
                        format!("p{i}"),
                        format!("m{publisher}"),
                        "video",
                    ));
                }
                if publishers.is_empty() {
                    return channel;
                }
                for (i, (publication, subscriber)) in subscriptions.iter().enumerate() {
                    let publication = publication.index(publishers.len());
                    let subscriber = subscriber.index(member_is_bot.len());
                    channel = channel.with_subscription(Subscription::new(
                        format!("s{i}"),
                        format!("p{publication}"),
                        format!("m{subscriber}"),
                    ));
                }
                channel
            })
    }

    // ===================
    // Property Test Functions
    // ===================

    /// Every entity gets exactly one node of its kind.
    fn check_one_node_per_entity(channel: &Channel) -> Result<(), TestCaseError> {
        let plan = plan(channel);
        let count = |kind| plan.nodes().filter(|node| node.kind() == kind).count();

        prop_assert_eq!(count(NodeKind::Member), channel.members().len());
        prop_assert_eq!(count(NodeKind::Publication), channel.publications().len());
        prop_assert_eq!(count(NodeKind::Subscription), channel.subscriptions().len());
        prop_assert_eq!(plan.nodes_count(), plan.nodes().count());
        Ok(())
    }

    /// Publications get one incoming edge, subscriptions one incoming and one outgoing.
    fn check_edge_counts(channel: &Channel) -> Result<(), TestCaseError> {
        let plan = plan(channel);
        let nodes: Vec<_> = plan.nodes().collect();
        let connections: Vec<_> = plan.connections().collect();

        for (slot, node) in nodes.iter().enumerate() {
            let incoming = connections.iter().filter(|(_, to)| *to == slot).count();
            let outgoing = connections.iter().filter(|(from, _)| *from == slot).count();
            match node.kind() {
                NodeKind::Publication => {
                    prop_assert_eq!(incoming, 1);
                }
                NodeKind::Subscription => {
                    prop_assert_eq!(incoming, 1);
                    prop_assert_eq!(outgoing, 1);
                }
                NodeKind::Member => {}
            }
        }

        prop_assert_eq!(
            connections.len(),
            channel.publications().len() + 2 * channel.subscriptions().len()
        );
        prop_assert!(plan.warnings().is_empty());
        Ok(())
    }

    /// Every connection refers to slots that exist.
    fn check_slots_in_range(channel: &Channel) -> Result<(), TestCaseError> {
        let plan = plan(channel);
        for (from, to) in plan.connections() {
            prop_assert!(from < plan.nodes_count());
            prop_assert!(to < plan.nodes_count());
        }
        Ok(())
    }

    // ===================
    // Proptest Wrappers
    // ===================

    proptest! {
        #[test]
        fn one_node_per_entity(channel in channel_strategy()) {
            check_one_node_per_entity(&channel)?;
        }

        #[test]
        fn edge_counts(channel in channel_strategy()) {
            check_edge_counts(&channel)?;
        }

        #[test]
        fn slots_in_range(channel in channel_strategy()) {
            check_slots_in_range(&channel)?;
        }
    }
}
