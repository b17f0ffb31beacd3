//! Knowledge graph view model and its filters.
//!
//! A [`GraphView`] is always self-consistent: every link endpoint names a
//! node of the same view. Filtering rebuilds the link list from scratch
//! against the surviving node ids, so narrowing a filter can never leave a
//! dangling edge behind.

use std::collections::HashSet;

use log::{debug, warn};

use crate::api::GraphPayload;

const UNKNOWN: &str = "unknown";
const DEFAULT_RELATIONSHIP: &str = "related to";

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
	Project,
	Person,
	Task,
	Other(String),
}

impl NodeKind {
	pub fn parse(kind: Option<&str>) -> Self {
		match kind {
			Some("project") => Self::Project,
			Some("person") => Self::Person,
			Some("task") => Self::Task,
			Some(other) if !other.is_empty() => Self::Other(other.to_string()),
			_ => Self::Other(UNKNOWN.into()),
		}
	}

	pub fn as_str(&self) -> &str {
		match self {
			Self::Project => "project",
			Self::Person => "person",
			Self::Task => "task",
			Self::Other(other) => other,
		}
	}

	pub fn icon(&self) -> &'static str {
		match self {
			Self::Project => "📁",
			Self::Person => "👤",
			Self::Task => "📋",
			Self::Other(_) => "🔹",
		}
	}

	pub fn color(&self) -> &'static str {
		match self {
			Self::Task => "hsl(214, 23%, 61%)",
			Self::Person => "hsl(348, 29%, 34%)",
			Self::Project => "hsl(7, 56%, 72%)",
			Self::Other(_) => "hsl(214, 15%, 45%)",
		}
	}
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeStatus {
	Active,
	Pending,
	Completed,
	Busy,
	Other(String),
}

impl NodeStatus {
	pub fn parse(status: Option<&str>) -> Self {
		match status {
			Some("active") => Self::Active,
			Some("pending") => Self::Pending,
			Some("completed") => Self::Completed,
			Some("busy") => Self::Busy,
			Some(other) if !other.is_empty() => Self::Other(other.to_string()),
			_ => Self::Other(UNKNOWN.into()),
		}
	}

	pub fn as_str(&self) -> &str {
		match self {
			Self::Active => "active",
			Self::Pending => "pending",
			Self::Completed => "completed",
			Self::Busy => "busy",
			Self::Other(other) => other,
		}
	}

	pub fn badge_class(&self) -> &'static str {
		match self {
			Self::Active => "badge badge-primary",
			Self::Pending => "badge badge-accent",
			Self::Completed => "badge badge-secondary",
			Self::Busy => "badge badge-destructive",
			Self::Other(_) => "badge badge-muted",
		}
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewNode {
	pub id: String,
	pub name: String,
	pub kind: NodeKind,
	pub status: NodeStatus,
	pub connections: u32,
	pub description: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewLink {
	pub source: String,
	pub target: String,
	pub relationship: String,
}

/// Node type filter; `All` is the wildcard.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TypeFilter {
	#[default]
	All,
	Project,
	Person,
	Task,
}

impl TypeFilter {
	pub const OPTIONS: [(Self, &'static str); 4] = [
		(Self::All, "All Types"),
		(Self::Project, "Projects"),
		(Self::Person, "People"),
		(Self::Task, "Tasks"),
	];

	pub fn matches(self, kind: &NodeKind) -> bool {
		match self {
			Self::All => true,
			Self::Project => *kind == NodeKind::Project,
			Self::Person => *kind == NodeKind::Person,
			Self::Task => *kind == NodeKind::Task,
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::All => "all",
			Self::Project => "project",
			Self::Person => "person",
			Self::Task => "task",
		}
	}

	pub fn parse(value: &str) -> Self {
		Self::OPTIONS
			.iter()
			.map(|(filter, _)| *filter)
			.find(|filter| filter.as_str() == value)
			.unwrap_or_default()
	}
}

/// Node status filter; `All` is the wildcard.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StatusFilter {
	#[default]
	All,
	Active,
	Pending,
	Completed,
	Busy,
}

impl StatusFilter {
	pub const OPTIONS: [(Self, &'static str); 5] = [
		(Self::All, "All Statuses"),
		(Self::Active, "Active"),
		(Self::Pending, "Pending"),
		(Self::Completed, "Completed"),
		(Self::Busy, "Busy"),
	];

	pub fn matches(self, status: &NodeStatus) -> bool {
		match self {
			Self::All => true,
			Self::Active => *status == NodeStatus::Active,
			Self::Pending => *status == NodeStatus::Pending,
			Self::Completed => *status == NodeStatus::Completed,
			Self::Busy => *status == NodeStatus::Busy,
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::All => "all",
			Self::Active => "active",
			Self::Pending => "pending",
			Self::Completed => "completed",
			Self::Busy => "busy",
		}
	}

	pub fn parse(value: &str) -> Self {
		Self::OPTIONS
			.iter()
			.map(|(filter, _)| *filter)
			.find(|filter| filter.as_str() == value)
			.unwrap_or_default()
	}
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterState {
	pub search: String,
	pub kind: TypeFilter,
	pub status: StatusFilter,
}

impl FilterState {
	/// Anything other than the `all/all/""` combination.
	pub fn is_active(&self) -> bool {
		!self.search.is_empty() || self.kind != TypeFilter::All || self.status != StatusFilter::All
	}

	fn accepts(&self, node: &ViewNode, needle: &str) -> bool {
		node.name.to_lowercase().contains(needle)
			&& self.kind.matches(&node.kind)
			&& self.status.matches(&node.status)
	}
}

/// A node adjacent to the selection, with the relationship that joins them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Neighbor<'a> {
	pub node: &'a ViewNode,
	pub relationship: &'a str,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GraphView {
	pub nodes: Vec<ViewNode>,
	pub links: Vec<ViewLink>,
}

impl GraphView {
	pub fn from_payload(payload: &GraphPayload) -> Self {
		let nodes: Vec<ViewNode> = payload
			.nodes
			.iter()
			.map(|node| ViewNode {
				id: node.id.clone(),
				name: node
					.name
					.clone()
					.filter(|name| !name.is_empty())
					.unwrap_or_else(|| node.id.clone()),
				kind: NodeKind::parse(node.kind.as_deref()),
				status: NodeStatus::parse(node.status.as_deref()),
				connections: node.connections.unwrap_or(0),
				description: node.description.clone(),
			})
			.collect();

		let links = payload.edges.iter().map(|edge| ViewLink {
			source: edge.from.clone(),
			target: edge.to.clone(),
			relationship: edge
				.label
				.as_deref()
				.or(edge.relationship.as_deref())
				.filter(|r| !r.is_empty())
				.unwrap_or(DEFAULT_RELATIONSHIP)
				.to_string(),
		});

		let view = Self::retain_links(nodes, links);
		let dropped = payload.edges.len() - view.links.len();
		if dropped > 0 {
			warn!("Dropped {dropped} edge(s) referencing unknown nodes");
		}
		debug!("Processed {} nodes and {} links", view.nodes.len(), view.links.len());
		view
	}

	/// Nodes passing every predicate, and only the links between them.
	pub fn filtered(&self, filter: &FilterState) -> Self {
		let needle = filter.search.to_lowercase();
		let nodes = self
			.nodes
			.iter()
			.filter(|node| filter.accepts(node, &needle))
			.cloned()
			.collect();
		Self::retain_links(nodes, self.links.iter().cloned())
	}

	fn retain_links(nodes: Vec<ViewNode>, links: impl IntoIterator<Item = ViewLink>) -> Self {
		let links = {
			let ids: HashSet<&str> = nodes.iter().map(|node| node.id.as_str()).collect();
			links
				.into_iter()
				.filter(|link| ids.contains(link.source.as_str()) && ids.contains(link.target.as_str()))
				.collect()
		};
		Self { nodes, links }
	}

	pub fn node(&self, id: &str) -> Option<&ViewNode> {
		self.nodes.iter().find(|node| node.id == id)
	}

	/// Nodes linked to `id` in either direction, in link order.
	pub fn neighbors(&self, id: &str) -> Vec<Neighbor<'_>> {
		self.links
			.iter()
			.filter_map(|link| {
				let other = if link.source == id {
					&link.target
				} else if link.target == id {
					&link.source
				} else {
					return None;
				};
				self.node(other).map(|node| Neighbor {
					node,
					relationship: &link.relationship,
				})
			})
			.collect()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;
	use serde_json::json;

	use super::*;
	use crate::api::{RawEdge, RawNode};

	fn sample_payload() -> GraphPayload {
		serde_json::from_value(json!({
			"nodes": [
				{"id": "A", "type": "task", "status": "active"},
				{"id": "B", "type": "person", "status": "pending"}
			],
			"edges": [{"from": "A", "to": "B", "label": "assigned"}]
		}))
		.unwrap()
	}

	fn search(term: &str) -> FilterState {
		FilterState {
			search: term.into(),
			..Default::default()
		}
	}

	#[test]
	fn maps_payload_into_view_model() {
		let view = GraphView::from_payload(&sample_payload());
		assert_eq!(
			view.nodes[0],
			ViewNode {
				id: "A".into(),
				name: "A".into(),
				kind: NodeKind::Task,
				status: NodeStatus::Active,
				connections: 0,
				description: None,
			}
		);
		assert_eq!(view.nodes[1].kind, NodeKind::Person);
		assert_eq!(view.nodes[1].status, NodeStatus::Pending);
		assert_eq!(
			view.links,
			vec![ViewLink {
				source: "A".into(),
				target: "B".into(),
				relationship: "assigned".into(),
			}]
		);
	}

	#[test]
	fn search_drops_edges_to_excluded_nodes() {
		let view = GraphView::from_payload(&sample_payload());
		let filtered = view.filtered(&search("A"));
		assert_eq!(filtered.nodes.len(), 1);
		assert_eq!(filtered.nodes[0].id, "A");
		assert!(filtered.links.is_empty());
	}

	#[test]
	fn search_is_case_insensitive() {
		let view = GraphView::from_payload(&sample_payload());
		assert_eq!(view.filtered(&search("b")).nodes[0].id, "B");
	}

	#[test]
	fn missing_fields_fall_into_unknown_bucket() {
		let payload = GraphPayload {
			nodes: vec![RawNode {
				id: "n".into(),
				..Default::default()
			}],
			edges: vec![RawEdge {
				from: "n".into(),
				to: "n".into(),
				relationship: Some("owns".into()),
				..Default::default()
			}],
		};
		let view = GraphView::from_payload(&payload);
		assert_eq!(view.nodes[0].kind.as_str(), "unknown");
		assert_eq!(view.nodes[0].status.as_str(), "unknown");
		assert_eq!(view.links[0].relationship, "owns");

		let typed = view.filtered(&FilterState {
			kind: TypeFilter::Task,
			..Default::default()
		});
		assert!(typed.is_empty());
	}

	#[test]
	fn unlabelled_edges_are_related_to() {
		let payload = GraphPayload {
			nodes: vec![
				RawNode {
					id: "a".into(),
					..Default::default()
				},
				RawNode {
					id: "b".into(),
					..Default::default()
				},
			],
			edges: vec![RawEdge {
				from: "a".into(),
				to: "b".into(),
				..Default::default()
			}],
		};
		let view = GraphView::from_payload(&payload);
		assert_eq!(view.links[0].relationship, "related to");
	}

	#[test]
	fn dangling_payload_edges_are_dropped() {
		let mut payload = sample_payload();
		payload.edges.push(RawEdge {
			from: "A".into(),
			to: "ghost".into(),
			..Default::default()
		});
		let view = GraphView::from_payload(&payload);
		assert_eq!(view.links.len(), 1);
	}

	#[test]
	fn neighbors_scan_both_directions() {
		let view = GraphView::from_payload(&sample_payload());
		let from_a = view.neighbors("A");
		assert_eq!(from_a.len(), 1);
		assert_eq!(from_a[0].node.id, "B");
		assert_eq!(from_a[0].relationship, "assigned");

		let from_b = view.neighbors("B");
		assert_eq!(from_b[0].node.id, "A");
		assert!(view.filtered(&search("A")).neighbors("A").is_empty());
	}

	#[test]
	fn filter_values_round_trip_through_select_options() {
		for (filter, _) in TypeFilter::OPTIONS {
			assert_eq!(TypeFilter::parse(filter.as_str()), filter);
		}
		for (filter, _) in StatusFilter::OPTIONS {
			assert_eq!(StatusFilter::parse(filter.as_str()), filter);
		}
		assert_eq!(StatusFilter::parse("bogus"), StatusFilter::All);
		assert!(!FilterState::default().is_active());
		assert!(search("x").is_active());
	}

	fn payload_strategy() -> impl Strategy<Value = GraphPayload> {
		let kinds = prop::option::of(prop::sample::select(vec![
			"project", "person", "task", "milestone",
		]));
		let statuses = prop::option::of(prop::sample::select(vec![
			"active",
			"pending",
			"completed",
			"busy",
			"critical",
		]));
		let node = ("[a-eA-E]{1,3}", kinds, statuses, prop::option::of(0u32..20)).prop_map(
			|(id, kind, status, connections)| RawNode {
				id,
				kind: kind.map(str::to_string),
				status: status.map(str::to_string),
				connections,
				..Default::default()
			},
		);
		let edge = ("[a-eA-E]{1,3}", "[a-eA-E]{1,3}", prop::option::of("[a-z]{1,6}")).prop_map(
			|(from, to, label)| RawEdge {
				from,
				to,
				label,
				..Default::default()
			},
		);
		(
			prop::collection::vec(node, 0..24),
			prop::collection::vec(edge, 0..48),
		)
			.prop_map(|(nodes, edges)| GraphPayload { nodes, edges })
	}

	fn filter_strategy() -> impl Strategy<Value = FilterState> {
		(
			"[a-eA-E]{0,2}",
			prop::sample::select(TypeFilter::OPTIONS.map(|(f, _)| f).to_vec()),
			prop::sample::select(StatusFilter::OPTIONS.map(|(f, _)| f).to_vec()),
		)
			.prop_map(|(search, kind, status)| FilterState {
				search,
				kind,
				status,
			})
	}

	fn assert_consistent(view: &GraphView) {
		let ids: HashSet<&str> = view.nodes.iter().map(|n| n.id.as_str()).collect();
		for link in &view.links {
			assert!(ids.contains(link.source.as_str()), "dangling source {link:?}");
			assert!(ids.contains(link.target.as_str()), "dangling target {link:?}");
		}
	}

	proptest! {
		#[test]
		fn filtered_links_never_dangle(payload in payload_strategy(), filter in filter_strategy()) {
			let view = GraphView::from_payload(&payload);
			assert_consistent(&view);
			assert_consistent(&view.filtered(&filter));
		}

		#[test]
		fn wildcard_filter_is_a_no_op(payload in payload_strategy()) {
			let view = GraphView::from_payload(&payload);
			prop_assert_eq!(view.filtered(&FilterState::default()), view);
		}

		#[test]
		fn filtering_is_idempotent(payload in payload_strategy(), filter in filter_strategy()) {
			let once = GraphView::from_payload(&payload).filtered(&filter);
			prop_assert_eq!(once.filtered(&filter), once);
		}

		#[test]
		fn narrowing_never_adds_nodes(payload in payload_strategy(), filter in filter_strategy()) {
			let view = GraphView::from_payload(&payload);
			let filtered = view.filtered(&filter);
			prop_assert!(filtered.nodes.len() <= view.nodes.len());
			prop_assert!(filtered.links.len() <= view.links.len());
		}
	}
}
