use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::types::GraphData;

pub const HIT_RADIUS: f64 = 12.0;
/// Pointer travel (screen px) below which a press-release counts as a click.
pub const CLICK_SLOP: f64 = 4.0;
const SEED_RADIUS: f64 = 100.0;
const ZOOM_RANGE: (f64, f64) = (0.1, 10.0);

const PHYSICS: SimulationParameters = SimulationParameters {
	force_charge: 150.0,
	force_spring: 0.05,
	force_max: 100.0,
	node_speed: 3000.0,
	damping_factor: 0.9,
};

#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	pub id: String,
	pub label: Option<String>,
	pub color: String,
	pub radius: f64,
}

/// Screen = graph * k + (x, y).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl ViewTransform {
	fn centered(width: f64, height: f64) -> Self {
		Self {
			x: width / 2.0,
			y: height / 2.0,
			k: 1.0,
		}
	}

	fn to_graph(self, sx: f64, sy: f64) -> (f64, f64) {
		((sx - self.x) / self.k, (sy - self.y) / self.k)
	}
}

/// What the pointer is doing between press and release.
#[derive(Clone, Copy, Debug, Default)]
enum Gesture {
	#[default]
	Idle,
	Drag {
		node: DefaultNodeIdx,
		origin: (f64, f64),
		node_origin: (f32, f32),
		travel: f64,
	},
	Pan {
		origin: (f64, f64),
		transform_origin: (f64, f64),
	},
}

type Adjacency = HashMap<DefaultNodeIdx, Vec<DefaultNodeIdx>>;

#[derive(Clone, Debug)]
struct Focus {
	node: DefaultNodeIdx,
	neighbors: HashSet<DefaultNodeIdx>,
}

/// Hovered node plus neighbours, with a fade that lags behind the pointer.
///
/// Leaving a node keeps it as `fading` until the fade-out completes.
#[derive(Clone, Debug, Default)]
pub struct HoverState {
	current: Option<Focus>,
	fading: Option<Focus>,
	strength: f64,
	delay: f64,
}

impl HoverState {
	const FADE_IN_DELAY: f64 = 0.08;
	const FADE_IN_SPEED: f64 = 1.8;
	const FADE_OUT_SPEED: f64 = 1.26;

	fn focus(&mut self, node: Option<DefaultNodeIdx>, adjacency: &Adjacency) {
		if self.current.as_ref().map(|f| f.node) == node {
			return;
		}
		let previous = self.current.take();
		let was_hovering = previous.is_some();
		self.fading = if node.is_none() { previous } else { None };

		if let Some(node) = node {
			if !was_hovering {
				self.delay = 0.0;
			}
			let neighbors = adjacency.get(&node).into_iter().flatten().copied().collect();
			self.current = Some(Focus { node, neighbors });
		}
	}

	fn advance(&mut self, dt: f64) {
		if self.current.is_some() {
			self.delay = (self.delay + dt).min(Self::FADE_IN_DELAY);
			if self.delay >= Self::FADE_IN_DELAY {
				self.strength += (1.0 - self.strength) * Self::FADE_IN_SPEED * dt;
			}
			return;
		}
		self.strength -= self.strength * Self::FADE_OUT_SPEED * dt;
		if self.strength < 0.01 {
			self.strength = 0.0;
			self.fading = None;
		}
	}

	fn foci(&self) -> impl Iterator<Item = &Focus> {
		self.current.iter().chain(self.fading.iter())
	}

	/// Fade progress in `0..=1`.
	pub fn strength(&self) -> f64 {
		self.strength
	}

	pub fn is_active(&self) -> bool {
		self.current.is_some() || self.fading.is_some()
	}

	pub fn is_focus(&self, idx: DefaultNodeIdx) -> bool {
		self.foci().any(|f| f.node == idx)
	}

	pub fn is_neighbor(&self, idx: DefaultNodeIdx) -> bool {
		self.foci().any(|f| f.neighbors.contains(&idx))
	}

	pub fn contains(&self, idx: DefaultNodeIdx) -> bool {
		self.is_focus(idx) || self.is_neighbor(idx)
	}
}

/// Simulation plus everything the pointer handlers and renderer share.
pub struct ForceGraphState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub transform: ViewTransform,
	pub hover: HoverState,
	pub width: f64,
	pub height: f64,
	pub flow_time: f64,
	gesture: Gesture,
	adjacency: Adjacency,
	edge_labels: HashMap<(DefaultNodeIdx, DefaultNodeIdx), String>,
}

impl ForceGraphState {
	/// Build a fresh simulation. Pass the previous transform to keep the
	/// user's pan and zoom across data updates.
	pub fn new(data: &GraphData, width: f64, height: f64, transform: Option<ViewTransform>) -> Self {
		let mut graph = ForceGraph::new(PHYSICS);
		let step = 2.0 * PI / data.nodes.len().max(1) as f64;

		// Seeded on a circle around the origin; the transform centres it.
		let index: HashMap<&str, DefaultNodeIdx> = data
			.nodes
			.iter()
			.enumerate()
			.map(|(i, node)| {
				let angle = i as f64 * step;
				let idx = graph.add_node(NodeData {
					x: (SEED_RADIUS * angle.cos()) as f32,
					y: (SEED_RADIUS * angle.sin()) as f32,
					mass: 10.0,
					is_anchor: false,
					user_data: NodeInfo {
						id: node.id.clone(),
						label: node.label.clone(),
						color: node.color.clone(),
						radius: node.radius,
					},
				});
				(node.id.as_str(), idx)
			})
			.collect();

		let mut adjacency = Adjacency::new();
		let mut edge_labels = HashMap::new();
		for link in &data.links {
			let (Some(&src), Some(&tgt)) =
				(index.get(link.source.as_str()), index.get(link.target.as_str()))
			else {
				continue;
			};
			graph.add_edge(src, tgt, EdgeData::default());
			adjacency.entry(src).or_default().push(tgt);
			adjacency.entry(tgt).or_default().push(src);
			if let Some(label) = &link.label {
				edge_labels.insert((src, tgt), label.clone());
			}
		}

		Self {
			graph,
			transform: transform.unwrap_or(ViewTransform::centered(width, height)),
			hover: HoverState::default(),
			width,
			height,
			flow_time: 0.0,
			gesture: Gesture::Idle,
			adjacency,
			edge_labels,
		}
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.transform.to_graph(sx, sy);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			// world-space, scales with zoom like the nodes themselves
			let reach = node.data.user_data.radius.max(HIT_RADIUS);
			if dx.hypot(dy) < reach {
				found = Some(node.index());
			}
		});
		found
	}

	pub fn node_id(&self, idx: DefaultNodeIdx) -> Option<String> {
		let mut id = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				id = Some(node.data.user_data.id.clone());
			}
		});
		id
	}

	fn node_position(&self, idx: DefaultNodeIdx) -> Option<(f32, f32)> {
		let mut position = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				position = Some((node.x(), node.y()));
			}
		});
		position
	}

	fn pin_node(&mut self, idx: DefaultNodeIdx, position: Option<(f32, f32)>) {
		self.graph.visit_nodes_mut(|node| {
			if node.index() == idx {
				if let Some((x, y)) = position {
					node.data.x = x;
					node.data.y = y;
				}
				node.data.is_anchor = true;
			}
		});
	}

	pub fn edge_label(&self, src: DefaultNodeIdx, tgt: DefaultNodeIdx) -> Option<&str> {
		self.edge_labels
			.get(&(src, tgt))
			.or_else(|| self.edge_labels.get(&(tgt, src)))
			.map(String::as_str)
	}

	/// Pointer down: grab the node under the pointer, or start panning.
	pub fn press(&mut self, x: f64, y: f64) {
		self.gesture = match self.node_at_position(x, y) {
			Some(node) => Gesture::Drag {
				node,
				origin: (x, y),
				node_origin: self.node_position(node).unwrap_or_default(),
				travel: 0.0,
			},
			None => Gesture::Pan {
				origin: (x, y),
				transform_origin: (self.transform.x, self.transform.y),
			},
		};
	}

	pub fn pointer_move(&mut self, x: f64, y: f64) {
		match &mut self.gesture {
			Gesture::Idle => {
				let hovered = self.node_at_position(x, y);
				self.hover.focus(hovered, &self.adjacency);
			}
			Gesture::Drag {
				node,
				origin,
				node_origin,
				travel,
			} => {
				let (sx, sy) = (x - origin.0, y - origin.1);
				*travel = travel.max(sx.hypot(sy));
				let k = self.transform.k;
				let target = (
					node_origin.0 + (sx / k) as f32,
					node_origin.1 + (sy / k) as f32,
				);
				let node = *node;
				self.pin_node(node, Some(target));
			}
			Gesture::Pan {
				origin,
				transform_origin,
			} => {
				self.transform.x = transform_origin.0 + (x - origin.0);
				self.transform.y = transform_origin.1 + (y - origin.1);
			}
		}
	}

	/// Pointer up. Returns the node id when the press was a click rather
	/// than a drag; a dragged node stays where it was dropped.
	pub fn release(&mut self) -> Option<String> {
		match std::mem::take(&mut self.gesture) {
			Gesture::Drag { node, travel, .. } if travel < CLICK_SLOP => self.node_id(node),
			Gesture::Drag { node, .. } => {
				self.pin_node(node, None);
				None
			}
			Gesture::Idle | Gesture::Pan { .. } => None,
		}
	}

	pub fn leave(&mut self) {
		self.gesture = Gesture::Idle;
		self.hover.focus(None, &self.adjacency);
	}

	/// Zoom around the pointer so the point under it stays put.
	pub fn zoom_at(&mut self, x: f64, y: f64, delta_y: f64) {
		let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
		let k = (self.transform.k * factor).clamp(ZOOM_RANGE.0, ZOOM_RANGE.1);
		let ratio = k / self.transform.k;
		self.transform.x = x - (x - self.transform.x) * ratio;
		self.transform.y = y - (y - self.transform.y) * ratio;
		self.transform.k = k;
	}

	pub fn tick(&mut self, dt: f32) {
		self.graph.update(dt);
		self.flow_time += dt as f64;
		self.hover.advance(dt as f64);
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::types::{GraphLink, GraphNode};

	fn data() -> GraphData {
		let node = |id: &str| GraphNode {
			id: id.into(),
			label: Some(id.into()),
			color: "#fff".into(),
			radius: 6.0,
		};
		GraphData {
			nodes: vec![node("a"), node("b"), node("c")],
			links: vec![
				GraphLink {
					source: "a".into(),
					target: "b".into(),
					label: Some("owns".into()),
				},
				GraphLink {
					source: "a".into(),
					target: "ghost".into(),
					label: None,
				},
			],
		}
	}

	fn state() -> ForceGraphState {
		ForceGraphState::new(&data(), 800.0, 600.0, None)
	}

	// node "a" is seeded at angle 0, 100 units right of the centre
	const A: (f64, f64) = (500.0, 300.0);

	fn idx(state: &ForceGraphState, id: &str) -> DefaultNodeIdx {
		let mut found = None;
		state.graph.visit_nodes(|node| {
			if node.data.user_data.id == id {
				found = Some(node.index());
			}
		});
		found.unwrap()
	}

	#[test]
	fn ignores_links_to_unknown_nodes() {
		let state = state();
		let (a, b, c) = (idx(&state, "a"), idx(&state, "b"), idx(&state, "c"));
		assert_eq!(state.adjacency.get(&a), Some(&vec![b]));
		assert_eq!(state.adjacency.get(&c), None);
		assert_eq!(state.edge_label(a, b), Some("owns"));
		assert_eq!(state.edge_label(b, a), Some("owns"));
	}

	#[test]
	fn hover_fades_out_after_leaving() {
		let mut state = state();
		let (a, b) = (idx(&state, "a"), idx(&state, "b"));
		state.pointer_move(A.0, A.1);
		assert!(state.hover.is_focus(a));
		assert!(state.hover.is_neighbor(b));

		for _ in 0..30 {
			state.tick(0.016);
		}
		assert!(state.hover.strength() > 0.0);

		state.leave();
		assert!(state.hover.is_active());
		assert!(state.hover.contains(b));
		for _ in 0..400 {
			state.tick(0.016);
		}
		assert!(!state.hover.is_active());
		assert_eq!(state.hover.strength(), 0.0);
	}

	#[test]
	fn keeps_transform_across_rebuilds() {
		let kept = ViewTransform {
			x: 10.0,
			y: 20.0,
			k: 2.5,
		};
		let state = ForceGraphState::new(&data(), 800.0, 600.0, Some(kept));
		assert_eq!(state.transform, kept);
		assert_eq!(state.transform.to_graph(10.0, 20.0), (0.0, 0.0));
	}

	#[test]
	fn hit_testing_uses_seeded_positions() {
		let state = state();
		let hit = state.node_at_position(A.0, A.1);
		assert_eq!(hit.and_then(|idx| state.node_id(idx)).as_deref(), Some("a"));
		assert_eq!(state.node_at_position(400.0, 300.0), None);
	}

	#[test]
	fn short_press_on_a_node_is_a_click() {
		let mut state = state();
		state.press(A.0, A.1);
		state.pointer_move(A.0 + 2.0, A.1 + 1.0);
		assert_eq!(state.release().as_deref(), Some("a"));
	}

	#[test]
	fn dragging_moves_and_pins_the_node() {
		let mut state = state();
		let a = idx(&state, "a");
		state.press(A.0, A.1);
		state.pointer_move(A.0 + 30.0, A.1);
		assert_eq!(state.release(), None);
		assert_eq!(state.node_position(a), Some((130.0, 0.0)));
		let mut anchored = false;
		state.graph.visit_nodes(|node| {
			if node.index() == a {
				anchored = node.data.is_anchor;
			}
		});
		assert!(anchored);
	}

	#[test]
	fn background_press_pans() {
		let mut state = state();
		state.press(10.0, 10.0);
		state.pointer_move(40.0, 30.0);
		assert_eq!(state.release(), None);
		assert_eq!((state.transform.x, state.transform.y), (430.0, 320.0));
	}

	#[test]
	fn zoom_keeps_the_pointer_anchored() {
		let mut state = state();
		let before = state.transform.to_graph(A.0, A.1);
		state.zoom_at(A.0, A.1, -1.0);
		assert!(state.transform.k > 1.0);
		let after = state.transform.to_graph(A.0, A.1);
		assert!((before.0 - after.0).abs() < 1e-9 && (before.1 - after.1).abs() < 1e-9);
	}
}
