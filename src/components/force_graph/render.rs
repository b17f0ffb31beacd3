use std::f64::consts::TAU;

use force_graph::DefaultNodeIdx;
use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::ForceGraphState;

const BACKGROUND: &str = "#0f172a";
const EDGE_RGB: &str = "148, 163, 184";
const DASH: (f64, f64) = (8.0, 4.0);
const FLOW_SPEED: f64 = 30.0;

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

/// How an edge is stroked at highlight progress `t`.
#[derive(Clone, Copy, Debug, PartialEq)]
struct EdgeStyle {
	line_alpha: f64,
	arrow_alpha: f64,
	width_scale: f64,
}

impl EdgeStyle {
	/// Highlighted edges brighten as `t` grows; the rest dim.
	fn at(highlighted: bool, t: f64) -> Self {
		let (line, arrow, width) = if highlighted {
			(0.3, 0.1, 0.3)
		} else {
			(-0.45, -0.45, -0.3)
		};
		Self {
			line_alpha: 0.6 + line * t,
			arrow_alpha: 0.8 + arrow * t,
			width_scale: 1.0 + width * t,
		}
	}
}

/// How a node is filled at highlight progress `t`.
#[derive(Clone, Copy, Debug, PartialEq)]
struct NodeStyle {
	alpha: f64,
	radius: f64,
	/// Outer radius and peak alpha of the glow.
	glow: Option<(f64, f64)>,
	ring: bool,
}

impl NodeStyle {
	fn at(state: &ForceGraphState, idx: DefaultNodeIdx, base: f64, t: f64) -> Self {
		let hover = &state.hover;
		if !hover.is_active() {
			return Self::plain(base);
		}
		if hover.is_focus(idx) {
			Self {
				alpha: 1.0,
				radius: base * (1.0 + 0.35 * t),
				glow: Some((base * (1.8 + 1.2 * t), 0.35 * t)),
				ring: true,
			}
		} else if hover.is_neighbor(idx) {
			Self {
				alpha: 1.0,
				radius: base * (1.0 + 0.2 * t),
				glow: Some((base * (1.4 + 0.6 * t), 0.2 * t)),
				ring: false,
			}
		} else {
			Self {
				alpha: 1.0 - 0.7 * t,
				radius: base * (1.0 - 0.15 * t),
				glow: None,
				ring: false,
			}
		}
	}

	fn plain(radius: f64) -> Self {
		Self {
			alpha: 1.0,
			radius,
			glow: None,
			ring: false,
		}
	}
}

pub fn render(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);

	let view = state.transform;
	ctx.save();
	let _ = ctx.translate(view.x, view.y);
	let _ = ctx.scale(view.k, view.k);
	let t = ease_out_cubic(state.hover.strength());
	draw_edges(state, ctx, t);
	// dimmed nodes first so the highlighted ones paint over them
	draw_nodes(state, ctx, t, false);
	if state.hover.is_active() {
		draw_nodes(state, ctx, t, true);
	}
	ctx.restore();
}

fn set_dash(ctx: &CanvasRenderingContext2d, k: f64) {
	let pattern = js_sys::Array::of2(&JsValue::from_f64(DASH.0 / k), &JsValue::from_f64(DASH.1 / k));
	let _ = ctx.set_line_dash(&pattern);
}

fn clear_dash(ctx: &CanvasRenderingContext2d) {
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn draw_edges(state: &ForceGraphState, ctx: &CanvasRenderingContext2d, t: f64) {
	let k = state.transform.k;
	let arrow = 8.0 / k;
	let period = (DASH.0 + DASH.1) / k;

	state.graph.visit_edges(|from, to, _| {
		let (x1, y1) = (from.x() as f64, from.y() as f64);
		let (x2, y2) = (to.x() as f64, to.y() as f64);
		let length = (x2 - x1).hypot(y2 - y1);
		if length < 0.001 {
			return;
		}
		let (ux, uy) = ((x2 - x1) / length, (y2 - y1) / length);
		let (r1, r2) = (from.data.user_data.radius, to.data.user_data.radius);
		let highlighted = state.hover.contains(from.index()) && state.hover.contains(to.index());
		let style = EdgeStyle::at(highlighted, t);

		// shaft, dashed and flowing towards the target
		set_dash(ctx, k);
		ctx.set_line_dash_offset(-(state.flow_time * FLOW_SPEED) % period);
		ctx.set_line_width(2.0 / k * style.width_scale);
		ctx.set_stroke_style_str(&format!("rgba({EDGE_RGB}, {})", style.line_alpha));
		ctx.begin_path();
		ctx.move_to(x1 + ux * r1, y1 + uy * r1);
		ctx.line_to(x2 - ux * (r2 + arrow), y2 - uy * (r2 + arrow));
		ctx.stroke();
		clear_dash(ctx);

		let tip = (x2 - ux * r2, y2 - uy * r2);
		draw_arrow_head(ctx, tip, (ux, uy), arrow, style.arrow_alpha);

		if highlighted && t > 0.05 {
			if let Some(label) = state.edge_label(from.index(), to.index()) {
				ctx.set_fill_style_str(&format!("rgba(226, 232, 240, {})", 0.9 * t));
				ctx.set_font(&format!("{}px sans-serif", 9.0 / k.max(0.5)));
				ctx.set_text_align("center");
				let _ = ctx.fill_text(label, (x1 + x2) / 2.0, (y1 + y2) / 2.0 - 3.0 / k);
				ctx.set_text_align("start");
			}
		}
	});
}

fn draw_arrow_head(
	ctx: &CanvasRenderingContext2d,
	(tx, ty): (f64, f64),
	(ux, uy): (f64, f64),
	size: f64,
	alpha: f64,
) {
	let (bx, by) = (tx - ux * size, ty - uy * size);
	let (px, py) = (-uy * size / 2.0, ux * size / 2.0);
	ctx.set_fill_style_str(&format!("rgba({EDGE_RGB}, {alpha})"));
	ctx.begin_path();
	ctx.move_to(tx, ty);
	ctx.line_to(bx + px, by + py);
	ctx.line_to(bx - px, by - py);
	ctx.close_path();
	ctx.fill();
}

fn fill_circle(ctx: &CanvasRenderingContext2d, (x, y): (f64, f64), radius: f64) {
	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, TAU);
	ctx.fill();
}

/// One pass over the nodes: either the highlighted set or everything else.
fn draw_nodes(state: &ForceGraphState, ctx: &CanvasRenderingContext2d, t: f64, highlighted: bool) {
	let k = state.transform.k;

	state.graph.visit_nodes(|node| {
		let idx = node.index();
		if state.hover.contains(idx) != highlighted {
			return;
		}
		let info = &node.data.user_data;
		let center = (node.x() as f64, node.y() as f64);
		let style = NodeStyle::at(state, idx, info.radius, t);

		if let Some((outer, alpha)) = style.glow.filter(|_| t > 0.01) {
			let (x, y) = center;
			if let Ok(glow) = ctx.create_radial_gradient(x, y, style.radius * 0.3, x, y, outer) {
				let _ = glow.add_color_stop(0.0, &format!("rgba(255, 255, 255, {alpha})"));
				let _ = glow.add_color_stop(0.6, &format!("rgba(200, 220, 255, {})", alpha * 0.3));
				let _ = glow.add_color_stop(1.0, "rgba(255, 255, 255, 0)");
				#[allow(deprecated)]
				ctx.set_fill_style(&glow);
				fill_circle(ctx, center, outer);
			}
		}

		ctx.set_global_alpha(style.alpha);
		ctx.set_fill_style_str(&info.color);
		fill_circle(ctx, center, style.radius);
		ctx.set_global_alpha(1.0);

		if style.ring && t > 0.01 {
			ctx.begin_path();
			let _ = ctx.arc(center.0, center.1, style.radius + 2.0 / k, 0.0, TAU);
			ctx.set_stroke_style_str(&format!("rgba(255, 255, 255, {})", 0.7 * t));
			ctx.set_line_width(1.5 / k);
			ctx.stroke();
		}

		if let Some(label) = &info.label {
			ctx.set_fill_style_str(&format!("rgba(255, 255, 255, {})", 0.8 * style.alpha));
			ctx.set_font(&format!("{}px sans-serif", 10.0 / k.max(0.5)));
			let _ = ctx.fill_text(label, center.0 + style.radius + 3.0, center.1 + 3.0);
		}
	});
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::types::{GraphData, GraphLink, GraphNode};

	#[test]
	fn edges_are_unchanged_without_highlight() {
		assert_eq!(EdgeStyle::at(true, 0.0), EdgeStyle::at(false, 0.0));
		let lit = EdgeStyle::at(true, 1.0);
		let dim = EdgeStyle::at(false, 1.0);
		assert!(lit.line_alpha > dim.line_alpha);
		assert!(lit.width_scale > dim.width_scale);
		assert!(dim.line_alpha > 0.0);
	}

	#[test]
	fn hovered_node_grows_and_others_fade() {
		let node = |id: &str| GraphNode {
			id: id.into(),
			label: None,
			color: "#fff".into(),
			radius: 10.0,
		};
		let data = GraphData {
			nodes: vec![node("a"), node("b"), node("c")],
			links: vec![GraphLink {
				source: "a".into(),
				target: "b".into(),
				label: None,
			}],
		};
		let mut state = ForceGraphState::new(&data, 800.0, 600.0, None);
		let index_of = |state: &ForceGraphState, id: &str| {
			let mut found = None;
			state.graph.visit_nodes(|n| {
				if n.data.user_data.id == id {
					found = Some(n.index());
				}
			});
			found.unwrap()
		};
		let (a, b, c) = (index_of(&state, "a"), index_of(&state, "b"), index_of(&state, "c"));
		assert_eq!(NodeStyle::at(&state, c, 10.0, 1.0), NodeStyle::plain(10.0));

		// node "a" sits 100 units right of the centre
		state.pointer_move(500.0, 300.0);
		let focus = NodeStyle::at(&state, a, 10.0, 1.0);
		let neighbor = NodeStyle::at(&state, b, 10.0, 1.0);
		let other = NodeStyle::at(&state, c, 10.0, 1.0);
		assert!(focus.ring && focus.radius > neighbor.radius);
		assert!(neighbor.glow.is_some() && !neighbor.ring);
		assert!(other.alpha < 1.0 && other.glow.is_none());
	}
}
