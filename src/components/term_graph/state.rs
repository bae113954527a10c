//! View state for the term graph canvas.
//!
//! Owns the positioned nodes and edges of one loaded graph together with the
//! pan/zoom transform and the hover highlight. Layout runs once in [`TermGraphState::new`];
//! afterwards only the transform, focus and flow clock change.

use std::collections::HashMap;

use super::highlight::{EdgeHighlight, HighlightState};
use super::layout::{LayoutConfig, bounds, layout};
use super::scale::{ScaledValues, ZoomConfig};
use super::types::{EdgeView, NodeView, PositionedNode, RelationEdge, TermGraph};

/// Pan and zoom transform applied to the entire graph view.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	/// Zoom factor (1.0 = 100%), clamped to the configured zoom range.
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

/// Tracks an in-progress canvas pan operation.
#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// A node box in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeRect {
	pub x: f64,
	pub y: f64,
	pub w: f64,
	pub h: f64,
}

impl NodeRect {
	fn contains(&self, px: f64, py: f64, slop: f64) -> bool {
		px >= self.x - slop
			&& px <= self.x + self.w + slop
			&& py >= self.y - slop
			&& py <= self.y + self.h + slop
	}

	/// Same box scaled about its center.
	pub fn scaled(&self, factor: f64) -> Self {
		let (w, h) = (self.w * factor, self.h * factor);
		Self {
			x: self.x - (w - self.w) / 2.0,
			y: self.y - (h - self.h) / 2.0,
			w,
			h,
		}
	}

	pub fn bottom_center(&self) -> (f64, f64) {
		(self.x + self.w / 2.0, self.y + self.h)
	}

	pub fn top_center(&self) -> (f64, f64) {
		(self.x + self.w / 2.0, self.y)
	}
}

/// Graph view state combining layout output with interaction and highlight tracking.
///
/// Created once per successful load, then mutated by pointer events and the
/// animation loop. Nodes and edges are never mutated after construction.
pub struct TermGraphState {
	pub graph: TermGraph,
	pub nodes: Vec<PositionedNode>,
	pub layout: LayoutConfig,
	pub transform: ViewTransform,
	pub pan: PanState,
	pub highlight: HighlightState,
	pub width: f64,
	pub height: f64,
	pub flow_time: f64,
	index: HashMap<String, usize>,
}

impl TermGraphState {
	pub fn new(
		graph: TermGraph,
		width: f64,
		height: f64,
		layout_config: &LayoutConfig,
		zoom: &ZoomConfig,
	) -> Self {
		let nodes = layout(&graph, layout_config);
		let mut index = HashMap::new();
		for (i, node) in nodes.iter().enumerate() {
			index.entry(node.node.id.clone()).or_insert(i);
		}
		let highlight = HighlightState::new(&graph.nodes, &graph.edges);

		let mut state = Self {
			graph,
			nodes,
			layout: layout_config.clone(),
			transform: ViewTransform::default(),
			pan: PanState::default(),
			highlight,
			width,
			height,
			flow_time: 0.0,
			index,
		};
		state.fit_view(zoom);
		state
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_rect(&self, idx: usize) -> Option<NodeRect> {
		let node = self.nodes.get(idx)?;
		Some(NodeRect {
			x: node.x,
			y: node.y,
			w: self.layout.node_width,
			h: self.layout.node_height,
		})
	}

	/// Box of a node view record.
	pub fn view_rect(&self, view: &NodeView) -> NodeRect {
		NodeRect {
			x: view.x,
			y: view.y,
			w: self.layout.node_width,
			h: self.layout.node_height,
		}
	}

	/// Rect of the first node with `id`, if it was placed.
	pub fn rect_for(&self, id: &str) -> Option<NodeRect> {
		self.index.get(id).and_then(|&i| self.node_rect(i))
	}

	/// Index of the node under a screen point.
	pub fn node_at_position(&self, sx: f64, sy: f64, scale: &ScaledValues) -> Option<usize> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		(0..self.nodes.len()).rev().find(|&i| {
			self.node_rect(i)
				.is_some_and(|rect| rect.contains(gx, gy, scale.hit_slop))
		})
	}

	/// Set the focused node id. Returns whether the highlight changed.
	pub fn set_focus(&mut self, id: Option<&str>) -> bool {
		self.highlight
			.set_focus(id, &self.graph.nodes, &self.graph.edges)
	}

	/// Pointer moved over the canvas: focus whichever node is under it.
	pub fn hover_at(&mut self, sx: f64, sy: f64, scale: &ScaledValues) -> bool {
		let hovered = self
			.node_at_position(sx, sy, scale)
			.map(|i| self.nodes[i].node.id.clone());
		self.set_focus(hovered.as_deref())
	}

	pub fn edge_highlight(&self, edge: &RelationEdge) -> EdgeHighlight {
		self.highlight.styles().edge(&edge.id)
	}

	pub fn is_highlighted(&self, idx: usize) -> bool {
		self.nodes
			.get(idx)
			.is_some_and(|n| self.highlight.styles().is_node_highlighted(&n.node.id))
	}

	/// Both endpoints were placed. Dangling edges are never drawn.
	pub fn is_renderable(&self, edge: &RelationEdge) -> bool {
		self.index.contains_key(&edge.source) && self.index.contains_key(&edge.target)
	}

	/// Frame all content in the viewport. An empty graph resets to 1:1
	/// centered on the origin.
	pub fn fit_view(&mut self, zoom: &ZoomConfig) {
		let Some(b) = bounds(&self.nodes, &self.layout) else {
			self.transform = ViewTransform {
				x: self.width / 2.0,
				y: self.height / 2.0,
				k: 1.0,
			};
			return;
		};

		let padded = 1.0 + zoom.fit_padding;
		let kx = self.width / (b.width() * padded).max(f64::EPSILON);
		let ky = self.height / (b.height() * padded).max(f64::EPSILON);
		let k = kx.min(ky).clamp(zoom.min_k, zoom.max_k);
		let (cx, cy) = b.center();
		self.transform = ViewTransform {
			x: self.width / 2.0 - cx * k,
			y: self.height / 2.0 - cy * k,
			k,
		};
	}

	/// Zoom by `factor` keeping the screen point `(sx, sy)` fixed.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64, zoom: &ZoomConfig) {
		let new_k = (self.transform.k * factor).clamp(zoom.min_k, zoom.max_k);
		let ratio = new_k / self.transform.k;
		self.transform.x = sx - (sx - self.transform.x) * ratio;
		self.transform.y = sy - (sy - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	/// Zoom about the viewport center (zoom buttons).
	pub fn zoom_by(&mut self, factor: f64, zoom: &ZoomConfig) {
		self.zoom_at(self.width / 2.0, self.height / 2.0, factor, zoom);
	}

	pub fn begin_pan(&mut self, sx: f64, sy: f64) {
		self.pan = PanState {
			active: true,
			start_x: sx,
			start_y: sy,
			transform_start_x: self.transform.x,
			transform_start_y: self.transform.y,
		};
	}

	pub fn pan_to(&mut self, sx: f64, sy: f64) {
		if self.pan.active {
			self.transform.x = self.pan.transform_start_x + (sx - self.pan.start_x);
			self.transform.y = self.pan.transform_start_y + (sy - self.pan.start_y);
		}
	}

	pub fn end_pan(&mut self) {
		self.pan.active = false;
	}

	pub fn tick(&mut self, dt: f64) {
		self.flow_time += dt;
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	/// Positioned nodes with their current highlight flag.
	pub fn node_views(&self) -> Vec<NodeView> {
		self.nodes
			.iter()
			.enumerate()
			.map(|(i, n)| NodeView {
				id: n.node.id.clone(),
				label: n.node.label.clone(),
				is_center: n.node.is_center,
				is_highlighted: self.is_highlighted(i),
				x: n.x,
				y: n.y,
			})
			.collect()
	}

	/// Renderable edges with their current connected flag, in build order.
	pub fn edge_views(&self) -> Vec<EdgeView> {
		self.graph
			.edges
			.iter()
			.filter(|e| self.is_renderable(e))
			.map(|e| EdgeView {
				id: e.id.clone(),
				source: e.source.clone(),
				target: e.target.clone(),
				label: e.label.clone(),
				connected: self.edge_highlight(e).connected,
			})
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::term_graph::builder::build_graph;
	use crate::components::term_graph::scale::ScaleConfig;
	use crate::components::term_graph::types::{GraphConfig, Relation, TermRecord};

	fn term(id: &str, targets: &[&str]) -> TermRecord {
		TermRecord {
			id: Some(id.into()),
			term: Some(id.to_uppercase()),
			relations: targets
				.iter()
				.map(|t| Relation {
					target_term_id: t.to_string(),
					relation_type: "has".into(),
					description: None,
				})
				.collect(),
			..Default::default()
		}
	}

	fn state(terms: &[TermRecord]) -> TermGraphState {
		let config = GraphConfig::default();
		let graph = build_graph(terms, &config);
		TermGraphState::new(graph, 800.0, 600.0, &config.layout, &ScaleConfig::default().zoom)
	}

	fn scaled(state: &TermGraphState) -> ScaledValues {
		ScaledValues::new(&ScaleConfig::default(), state.transform.k)
	}

	fn screen_center_of(state: &TermGraphState, id: &str) -> (f64, f64) {
		let rect = state.rect_for(id).unwrap();
		let (gx, gy) = (rect.x + rect.w / 2.0, rect.y + rect.h / 2.0);
		(
			gx * state.transform.k + state.transform.x,
			gy * state.transform.k + state.transform.y,
		)
	}

	#[test]
	fn fit_view_centers_content() {
		let s = state(&[term("a", &["b"]), term("b", &[])]);
		let b = bounds(&s.nodes, &s.layout).unwrap();
		let (cx, cy) = b.center();
		assert!((cx * s.transform.k + s.transform.x - 400.0).abs() < 1e-9);
		assert!((cy * s.transform.k + s.transform.y - 300.0).abs() < 1e-9);
		let zoom = ScaleConfig::default().zoom;
		assert!(s.transform.k >= zoom.min_k && s.transform.k <= zoom.max_k);
	}

	#[test]
	fn empty_graph_is_an_empty_canvas() {
		let s = state(&[]);
		assert!(s.nodes.is_empty());
		assert!(s.node_views().is_empty());
		assert_eq!(s.transform.k, 1.0);
	}

	#[test]
	fn hover_focuses_node_under_pointer_and_leaving_clears() {
		let mut s = state(&[term("a", &["b"]), term("b", &[]), term("c", &[])]);
		let sv = scaled(&s);
		let (x, y) = screen_center_of(&s, "a");
		assert!(s.hover_at(x, y, &sv));
		assert_eq!(s.highlight.focused(), Some("a"));

		let views = s.node_views();
		let lit: Vec<_> = views
			.iter()
			.filter(|v| v.is_highlighted)
			.map(|v| v.id.as_str())
			.collect();
		assert_eq!(lit, ["a", "b"]);

		assert!(s.hover_at(-10_000.0, -10_000.0, &sv));
		assert_eq!(s.highlight.focused(), None);
		assert!(s.node_views().iter().all(|v| !v.is_highlighted));
		assert!(s.edge_views().iter().all(|e| !e.connected));
	}

	#[test]
	fn dangling_edges_are_not_rendered() {
		let mut s = state(&[term("a", &["b", "ghost"]), term("b", &[])]);
		assert_eq!(s.graph.edges.len(), 2);
		for view in s.node_views() {
			assert_eq!(Some(s.view_rect(&view)), s.rect_for(&view.id));
		}
		let views = s.edge_views();
		assert_eq!(views.len(), 1);
		assert_eq!(views[0].id, "a-b");

		assert!(s.set_focus(Some("a")));
		assert!(s.edge_views()[0].connected);
	}

	#[test]
	fn zoom_keeps_anchor_point_and_clamps() {
		let mut s = state(&[term("a", &[])]);
		let zoom = ScaleConfig::default().zoom;
		let before = s.screen_to_graph(100.0, 50.0);
		s.zoom_at(100.0, 50.0, 1.1, &zoom);
		let after = s.screen_to_graph(100.0, 50.0);
		assert!((before.0 - after.0).abs() < 1e-9);
		assert!((before.1 - after.1).abs() < 1e-9);

		for _ in 0..50 {
			s.zoom_by(zoom.step, &zoom);
		}
		assert_eq!(s.transform.k, zoom.max_k);
		for _ in 0..50 {
			s.zoom_by(1.0 / zoom.step, &zoom);
		}
		assert_eq!(s.transform.k, zoom.min_k);
	}

	#[test]
	fn pan_moves_transform_only_while_active() {
		let mut s = state(&[term("a", &[])]);
		let start = s.transform.clone();
		s.pan_to(50.0, 50.0);
		assert_eq!(s.transform, start);

		s.begin_pan(10.0, 10.0);
		s.pan_to(40.0, 30.0);
		assert_eq!(s.transform.x, start.x + 30.0);
		assert_eq!(s.transform.y, start.y + 20.0);
		s.end_pan();
		s.pan_to(0.0, 0.0);
		assert_eq!(s.transform.x, start.x + 30.0);
	}

	#[test]
	fn scaled_rect_grows_about_center() {
		let rect = NodeRect {
			x: 0.0,
			y: 0.0,
			w: 200.0,
			h: 50.0,
		};
		let grown = rect.scaled(1.1);
		assert!((grown.w - 220.0).abs() < 1e-9);
		assert!((grown.x + 10.0).abs() < 1e-9);
		assert_eq!(rect.bottom_center(), (100.0, 50.0));
		assert_eq!(rect.top_center(), (100.0, 0.0));
	}
}
