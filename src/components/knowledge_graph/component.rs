use leptos::prelude::*;
use log::debug;

use super::detail::NodeDetail;
use super::model::{FilterState, GraphView, StatusFilter, TypeFilter};
use crate::api::GraphPayload;
use crate::components::force_graph::{ForceGraphCanvas, GraphData, GraphLink, GraphNode};

const GRAPH_HEIGHT: f64 = 480.0;

/// Canvas radius for a node with `connections` edges.
fn node_radius(connections: u32) -> f64 {
	let val = (connections.max(1) as f64 * 2.0).max(3.0);
	val.sqrt() * 4.0
}

fn canvas_data(view: &GraphView) -> GraphData {
	GraphData {
		nodes: view
			.nodes
			.iter()
			.map(|node| GraphNode {
				id: node.id.clone(),
				label: Some(node.name.clone()),
				color: node.kind.color().to_string(),
				radius: node_radius(node.connections),
			})
			.collect(),
		links: view
			.links
			.iter()
			.map(|link| GraphLink {
				source: link.source.clone(),
				target: link.target.clone(),
				label: Some(link.relationship.clone()),
			})
			.collect(),
	}
}

/// What the graph card shows in place of, or inside, the graph frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum GraphPane {
	Loading,
	NoPayload,
	NoNodes,
	NoMatches,
	Graph,
}

impl GraphPane {
	fn select(loading: bool, full: Option<&GraphView>, filtered: &GraphView) -> Self {
		match full {
			_ if loading => Self::Loading,
			None => Self::NoPayload,
			Some(full) if full.is_empty() => Self::NoNodes,
			Some(_) if filtered.is_empty() => Self::NoMatches,
			Some(_) => Self::Graph,
		}
	}

	/// Filters and stats stay up; only the frame changes.
	fn shows_controls(self) -> bool {
		matches!(self, Self::NoMatches | Self::Graph)
	}

	fn message(self) -> Option<&'static str> {
		match self {
			Self::NoPayload => {
				Some("No knowledge graph data available. Please analyze a project first.")
			}
			Self::NoNodes => Some("No graph data available"),
			Self::NoMatches => Some("No nodes match the current filters"),
			Self::Loading | Self::Graph => None,
		}
	}
}

/// Whether the inspector may stay open on `selected`.
fn keep_selection(filtered: &GraphView, selected: Option<&str>) -> bool {
	selected.is_none_or(|id| filtered.node(id).is_some())
}

/// Filterable knowledge graph with a node inspector.
#[component]
pub fn InteractiveGraph(
	#[prop(into)] graph: Signal<Option<GraphPayload>>,
	#[prop(into)] loading: Signal<bool>,
) -> impl IntoView {
	let search = RwSignal::new(String::new());
	let kind = RwSignal::new(TypeFilter::All);
	let status = RwSignal::new(StatusFilter::All);
	let selected = RwSignal::new(None::<String>);

	let view_model = Memo::new(move |_| graph.with(|g| g.as_ref().map(GraphView::from_payload)));
	let filter = Memo::new(move |_| FilterState {
		search: search.get(),
		kind: kind.get(),
		status: status.get(),
	});
	let filtered = Memo::new(move |_| {
		view_model.with(|view| {
			view.as_ref()
				.map(|view| filter.with(|f| view.filtered(f)))
				.unwrap_or_default()
		})
	});
	let canvas = Signal::derive(move || filtered.with(canvas_data));
	let pane = Memo::new(move |_| {
		let loading = loading.get();
		view_model.with(|full| filtered.with(|view| GraphPane::select(loading, full.as_ref(), view)))
	});
	// Only flips when the whole card has to be rebuilt.
	let placeholder = Memo::new(move |_| Some(pane.get()).filter(|p| !p.shows_controls()));

	// Close the inspector once its node is filtered out.
	Effect::new(move |_| {
		let keep = selected.with(|id| filtered.with(|view| keep_selection(view, id.as_deref())));
		if !keep {
			debug!("Selected node no longer visible, closing detail panel");
			selected.set(None);
		}
	});

	let clear_filters = move |_| {
		search.set(String::new());
		kind.set(TypeFilter::All);
		status.set(StatusFilter::All);
	};

	let on_node_click = move |id: String| {
		debug!("Node {id} selected");
		selected.set(Some(id));
	};

	move || {
		if let Some(placeholder) = placeholder.get() {
			return match placeholder.message() {
				Some(message) => view! {
					<div class="empty-state">
						<p class="muted">{message}</p>
					</div>
				}
				.into_any(),
				None => view! {
					<div class="graph-placeholder">
						<div class="skeleton skeleton-bar"></div>
						<div class="skeleton skeleton-canvas"></div>
						<p class="muted">"Loading interactive visualization..."</p>
					</div>
				}
				.into_any(),
			};
		}

		view! {
			<div class="interactive-graph">
				<div class="graph-filters">
					<input
						class="input search-input"
						type="search"
						placeholder="Search nodes..."
						prop:value=move || search.get()
						on:input=move |ev| search.set(event_target_value(&ev))
					/>
					<select
						class="select"
						prop:value=move || kind.get().as_str()
						on:change=move |ev| kind.set(TypeFilter::parse(&event_target_value(&ev)))
					>
						{TypeFilter::OPTIONS
							.into_iter()
							.map(|(f, label)| view! { <option value=f.as_str()>{label}</option> })
							.collect_view()}
					</select>
					<select
						class="select"
						prop:value=move || status.get().as_str()
						on:change=move |ev| status.set(StatusFilter::parse(&event_target_value(&ev)))
					>
						{StatusFilter::OPTIONS
							.into_iter()
							.map(|(f, label)| view! { <option value=f.as_str()>{label}</option> })
							.collect_view()}
					</select>
					<Show when=move || filter.with(FilterState::is_active)>
						<button class="button button-outline button-sm" on:click=clear_filters>
							"✕ Clear"
						</button>
					</Show>
				</div>

				<div class="graph-frame">
					<Show
						when=move || pane.get() == GraphPane::Graph
						fallback=move || {
							view! {
								<div class="empty-state">
									<p class="muted">{GraphPane::NoMatches.message()}</p>
								</div>
							}
						}
					>
						<ForceGraphCanvas data=canvas on_node_click=on_node_click height=GRAPH_HEIGHT />
					</Show>
				</div>

				<div class="graph-stats muted">
					<span>{move || format!("Nodes: {}", filtered.with(|v| v.nodes.len()))}</span>
					<span>{move || format!("Connections: {}", filtered.with(|v| v.links.len()))}</span>
				</div>

				<NodeDetail graph=filtered selected=selected />
			</div>
		}
		.into_any()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::api::{RawEdge, RawNode};

	fn sample() -> GraphView {
		GraphView::from_payload(&GraphPayload {
			nodes: vec![
				RawNode {
					id: "ann".into(),
					name: Some("Ann".into()),
					kind: Some("person".into()),
					..Default::default()
				},
				RawNode {
					id: "launch".into(),
					name: Some("Launch".into()),
					kind: Some("task".into()),
					..Default::default()
				},
			],
			edges: Vec::new(),
		})
	}

	fn searching(view: &GraphView, search: &str) -> GraphView {
		view.filtered(&FilterState {
			search: search.into(),
			..Default::default()
		})
	}

	#[test]
	fn pane_follows_loading_payload_and_filters() {
		let full = sample();
		let empty = GraphView::default();
		let none_match = searching(&full, "zzz");

		assert_eq!(GraphPane::select(true, Some(&full), &full), GraphPane::Loading);
		assert_eq!(GraphPane::select(false, None, &empty), GraphPane::NoPayload);
		assert_eq!(GraphPane::select(false, Some(&empty), &empty), GraphPane::NoNodes);
		assert_eq!(GraphPane::select(false, Some(&full), &none_match), GraphPane::NoMatches);
		assert_eq!(GraphPane::select(false, Some(&full), &full), GraphPane::Graph);

		assert!(GraphPane::NoMatches.shows_controls());
		assert!(!GraphPane::NoNodes.shows_controls());
		assert_eq!(GraphPane::NoNodes.message(), Some("No graph data available"));
		assert_eq!(
			GraphPane::NoMatches.message(),
			Some("No nodes match the current filters")
		);
		assert!(GraphPane::NoPayload.message().is_some_and(|m| m.starts_with("No knowledge graph")));
	}

	#[test]
	fn selection_closes_when_its_node_is_filtered_out() {
		let full = sample();
		let only_ann = searching(&full, "ann");
		assert!(keep_selection(&full, None));
		assert!(keep_selection(&only_ann, Some("ann")));
		assert!(!keep_selection(&only_ann, Some("launch")));
		assert!(!keep_selection(&GraphView::default(), Some("ann")));
	}

	#[test]
	fn radius_grows_with_connections() {
		assert_eq!(node_radius(0), node_radius(1));
		assert!(node_radius(10) > node_radius(2));
		assert!((node_radius(0) - 3f64.sqrt() * 4.0).abs() < 1e-9);
	}

	#[test]
	fn canvas_data_mirrors_the_view() {
		let payload = GraphPayload {
			nodes: vec![
				RawNode {
					id: "p".into(),
					kind: Some("project".into()),
					connections: Some(4),
					..Default::default()
				},
				RawNode {
					id: "t".into(),
					kind: Some("task".into()),
					..Default::default()
				},
			],
			edges: vec![RawEdge {
				from: "p".into(),
				to: "t".into(),
				label: Some("contains".into()),
				..Default::default()
			}],
		};
		let data = canvas_data(&GraphView::from_payload(&payload));
		assert_eq!(data.nodes[0].color, "hsl(7, 56%, 72%)");
		assert_eq!(data.nodes[1].label.as_deref(), Some("t"));
		assert_eq!(data.links[0].label.as_deref(), Some("contains"));
	}
}
