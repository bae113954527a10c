//! Canvas rendering for the term graph.
//!
//! Handles all drawing operations: background, edges, relation labels and node boxes.
//! Rendering uses multiple passes for correct z-ordering:
//! 1. Background fill and dot grid (world-aligned)
//! 2. Edge strokes with arrowheads, then relation labels above them
//! 3. Plain node boxes, then highlighted boxes on top

use std::collections::HashMap;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::scale::{ScaleConfig, ScaledValues};
use super::state::{NodeRect, TermGraphState};
use super::theme::{BoxStyle, Theme};
use super::types::{EdgeView, NodeView};

/// Below this on-screen spacing the dot grid is skipped.
const MIN_DOT_SPACING_PX: f64 = 4.0;

/// Vertical run out of a source / into a target before bending.
const STEP_OFFSET: f64 = 20.0;

/// Horizontal padding inside a node box.
const LABEL_PADDING: f64 = 16.0;

/// Renders the complete graph to the canvas.
pub fn render(
	state: &TermGraphState,
	ctx: &CanvasRenderingContext2d,
	config: &ScaleConfig,
	theme: &Theme,
	labels: &mut LabelCache,
) {
	let scale = ScaledValues::new(config, state.transform.k);

	draw_background(state, ctx, theme);

	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);

	draw_edges(state, ctx, config, &scale, theme);
	draw_nodes(state, ctx, config, &scale, theme, labels);

	ctx.restore();
}

fn draw_background(state: &TermGraphState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let bg = &theme.background;
	ctx.set_fill_style_str(&bg.color.to_css());
	ctx.fill_rect(0.0, 0.0, state.width, state.height);

	let k = state.transform.k;
	let spacing = bg.dot_gap * k;
	if spacing < MIN_DOT_SPACING_PX {
		return;
	}

	// Grid is anchored in world space so it pans and zooms with the graph.
	let (ox, oy) = (
		state.transform.x.rem_euclid(spacing),
		state.transform.y.rem_euclid(spacing),
	);
	let size = (bg.dot_size * k).max(0.5);
	ctx.set_fill_style_str(&bg.dot_color.to_css());

	let mut y = oy;
	while y < state.height {
		let mut x = ox;
		while x < state.width {
			ctx.fill_rect(x - size / 2.0, y - size / 2.0, size, size);
			x += spacing;
		}
		y += spacing;
	}
}

fn draw_edges(
	state: &TermGraphState,
	ctx: &CanvasRenderingContext2d,
	config: &ScaleConfig,
	scale: &ScaledValues,
	theme: &Theme,
) {
	let dash_offset = scale.dash_offset(state.flow_time, config.edge.flow_speed);
	let mut labels = Vec::new();

	for edge in state.edge_views() {
		let Some((route, label_at)) = edge_route(state, &edge) else {
			continue;
		};
		let emphasis = state.highlight.styles().edge(&edge.id).emphasis;
		let stroke = theme.edge.stroke(emphasis);

		ctx.set_stroke_style_str(&stroke.color.to_css());
		ctx.set_line_width(scale.edge_width(stroke.width));
		if stroke.animated {
			let _ = ctx.set_line_dash(&js_sys::Array::of2(
				&JsValue::from_f64(config.edge.dash_pattern.0),
				&JsValue::from_f64(config.edge.dash_pattern.1),
			));
			ctx.set_line_dash_offset(dash_offset);
		} else {
			let _ = ctx.set_line_dash(&js_sys::Array::new());
		}

		stroke_polyline(ctx, &route, config.edge.bend_radius);
		let _ = ctx.set_line_dash(&js_sys::Array::new());

		if let Some(&(tx, ty)) = route.last() {
			draw_arrowhead(ctx, tx, ty, config.edge.arrow_size, theme);
		}

		if !edge.label.is_empty() {
			labels.push((label_at, edge.label));
		}
	}

	if !scale.cull_edge_labels {
		for ((x, y), text) in labels {
			draw_edge_label(ctx, x, y, &text, config, scale, theme);
		}
	}
}

/// Smooth-step route from the source's bottom handle to the target's top
/// handle, plus the anchor for the relation label.
fn edge_route(state: &TermGraphState, edge: &EdgeView) -> Option<(Vec<(f64, f64)>, (f64, f64))> {
	let source = state.rect_for(&edge.source)?;
	let target = state.rect_for(&edge.target)?;
	let (sx, sy) = source.bottom_center();
	let (tx, ty) = target.top_center();

	if ty - sy >= 2.0 * STEP_OFFSET {
		let mid_y = (sy + ty) / 2.0;
		let route = vec![(sx, sy), (sx, mid_y), (tx, mid_y), (tx, ty)];
		return Some((route, ((sx + tx) / 2.0, mid_y)));
	}

	// Target is level with or above the source: leave downwards, travel in
	// the gap beside the boxes, and come back into the target from above.
	let side_x = if (sx - tx).abs() < f64::EPSILON {
		sx + (source.w + state.layout.node_sep) / 2.0
	} else {
		(sx + tx) / 2.0
	};
	let (low, high) = (sy + STEP_OFFSET, ty - STEP_OFFSET);
	let route = vec![
		(sx, sy),
		(sx, low),
		(side_x, low),
		(side_x, high),
		(tx, high),
		(tx, ty),
	];
	Some((route, (side_x, (low + high) / 2.0)))
}

/// Strokes a polyline with rounded corners.
fn stroke_polyline(ctx: &CanvasRenderingContext2d, points: &[(f64, f64)], radius: f64) {
	let Some((&(x0, y0), rest)) = points.split_first() else {
		return;
	};
	ctx.begin_path();
	ctx.move_to(x0, y0);
	for window in points.windows(3) {
		let [_, (cx, cy), (nx, ny)] = [window[0], window[1], window[2]];
		let _ = ctx.arc_to(cx, cy, nx, ny, radius);
	}
	if let Some(&(lx, ly)) = rest.last() {
		ctx.line_to(lx, ly);
	}
	ctx.stroke();
}

/// Closed arrowhead pointing down onto the target handle.
fn draw_arrowhead(ctx: &CanvasRenderingContext2d, tip_x: f64, tip_y: f64, size: f64, theme: &Theme) {
	ctx.set_fill_style_str(&theme.edge.marker.to_css());
	ctx.begin_path();
	ctx.move_to(tip_x, tip_y);
	ctx.line_to(tip_x - size * 0.5, tip_y - size);
	ctx.line_to(tip_x + size * 0.5, tip_y - size);
	ctx.close_path();
	ctx.fill();
}

fn draw_edge_label(
	ctx: &CanvasRenderingContext2d,
	x: f64,
	y: f64,
	text: &str,
	config: &ScaleConfig,
	scale: &ScaledValues,
	theme: &Theme,
) {
	ctx.set_global_alpha(scale.edge_label_alpha);
	ctx.set_font(&scale.edge_label_font);
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");

	let width = ctx
		.measure_text(text)
		.map(|m| m.width())
		.unwrap_or(text.chars().count() as f64 * config.edge.label_size * 0.6);
	let (pad_x, pad_y) = (4.0, 2.0);
	let h = config.edge.label_size + 2.0 * pad_y;

	ctx.set_fill_style_str(&theme.edge.label_background.to_css());
	rounded_rect_path(ctx, x - width / 2.0 - pad_x, y - h / 2.0, width + 2.0 * pad_x, h, 2.0);
	ctx.fill();

	ctx.set_fill_style_str(&theme.edge.label_color.to_css());
	let _ = ctx.fill_text(text, x, y);
	ctx.set_global_alpha(1.0);
}

fn draw_nodes(
	state: &TermGraphState,
	ctx: &CanvasRenderingContext2d,
	config: &ScaleConfig,
	scale: &ScaledValues,
	theme: &Theme,
	labels: &mut LabelCache,
) {
	let (highlighted, plain): (Vec<NodeView>, Vec<NodeView>) =
		state.node_views().into_iter().partition(|v| v.is_highlighted);

	// Plain nodes first, highlighted nodes on top
	for view in plain.iter().chain(&highlighted) {
		draw_node(state, ctx, config, scale, theme, labels, view);
	}
}

fn draw_node(
	state: &TermGraphState,
	ctx: &CanvasRenderingContext2d,
	config: &ScaleConfig,
	scale: &ScaledValues,
	theme: &Theme,
	labels: &mut LabelCache,
	view: &NodeView,
) {
	let rect = state.view_rect(view);
	// Center styling wins over highlight styling, but the box still grows.
	let style: BoxStyle = if view.is_center {
		theme.node.center
	} else if view.is_highlighted {
		theme.node.highlighted
	} else {
		theme.node.base
	};
	let label_width = rect.w - 2.0 * LABEL_PADDING;
	let rect = if view.is_highlighted {
		rect.scaled(theme.node.highlight_scale)
	} else {
		rect
	};
	let radius = config.node.corner_radius;

	ctx.save();
	ctx.set_shadow_color(&theme.node.shadow.to_css());
	ctx.set_shadow_blur(6.0 * scale.k);
	ctx.set_shadow_offset_y(2.0 * scale.k);
	ctx.set_fill_style_str(&style.fill.to_css());
	rounded_rect_path(ctx, rect.x, rect.y, rect.w, rect.h, radius);
	ctx.fill();
	ctx.restore();

	ctx.set_stroke_style_str(&style.border.to_css());
	ctx.set_line_width(scale.border_width);
	rounded_rect_path(ctx, rect.x, rect.y, rect.w, rect.h, radius);
	ctx.stroke();

	draw_handles(ctx, &rect, config.node.handle_radius, theme);

	let font = if view.is_center {
		&scale.center_label_font
	} else {
		&scale.label_font
	};
	ctx.set_font(font);
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	ctx.set_fill_style_str(&style.text.to_css());
	let label = labels.fit(ctx, &view.id, &view.label, font, label_width);
	let _ = ctx.fill_text(label, rect.x + rect.w / 2.0, rect.y + rect.h / 2.0);
}

fn draw_handles(ctx: &CanvasRenderingContext2d, rect: &NodeRect, radius: f64, theme: &Theme) {
	ctx.set_fill_style_str(&theme.node.handle_color.to_css());
	for (x, y) in [rect.top_center(), rect.bottom_center()] {
		ctx.begin_path();
		let _ = ctx.arc(x, y, radius / 2.0, 0.0, std::f64::consts::TAU);
		ctx.fill();
	}
}

/// Node labels truncated to their box, measured once per node and font.
///
/// Node fonts scale with the world, so a label only needs measuring again
/// when the font string itself changes.
#[derive(Debug, Default)]
pub struct LabelCache {
	entries: HashMap<String, (String, String)>,
}

impl LabelCache {
	/// Cached truncation of `label`, measuring with the context's current font.
	pub fn fit<'a>(
		&'a mut self,
		ctx: &CanvasRenderingContext2d,
		id: &str,
		label: &'a str,
		font: &str,
		max_width: f64,
	) -> &'a str {
		let stale = self.entries.get(id).is_none_or(|(f, _)| f != font);
		if stale {
			let text = truncate_to_fit(label, max_width, |s| {
				ctx.measure_text(s).map(|m| m.width()).unwrap_or(0.0)
			});
			self.entries.insert(id.to_string(), (font.to_string(), text));
		}
		self.entries.get(id).map_or(label, |(_, text)| text.as_str())
	}
}

/// Longest prefix of `label` that fits `max_width` with an ellipsis appended.
/// Binary search over the prefix length keeps `measure` calls logarithmic.
fn truncate_to_fit(label: &str, max_width: f64, measure: impl Fn(&str) -> f64) -> String {
	if measure(label) <= max_width {
		return label.to_string();
	}
	let chars: Vec<char> = label.chars().collect();
	let candidate = |n: usize| chars[..n].iter().collect::<String>() + "…";
	// prefix `lo` fits (or is empty), prefix `hi` does not
	let (mut lo, mut hi) = (0, chars.len());
	while hi - lo > 1 {
		let mid = (lo + hi) / 2;
		if measure(&candidate(mid)) <= max_width {
			lo = mid;
		} else {
			hi = mid;
		}
	}
	candidate(lo)
}

fn rounded_rect_path(ctx: &CanvasRenderingContext2d, x: f64, y: f64, w: f64, h: f64, r: f64) {
	let r = r.min(w / 2.0).min(h / 2.0).max(0.0);
	ctx.begin_path();
	ctx.move_to(x + r, y);
	let _ = ctx.arc_to(x + w, y, x + w, y + h, r);
	let _ = ctx.arc_to(x + w, y + h, x, y + h, r);
	let _ = ctx.arc_to(x, y + h, x, y, r);
	let _ = ctx.arc_to(x, y, x + w, y, r);
	ctx.close_path();
}
