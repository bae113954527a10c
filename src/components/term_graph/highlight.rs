//! Hover highlight: the focused node's one-edge neighborhood.
//!
//! Highlight styles are a side table keyed by node and edge id. They are never
//! written into the node or edge records, and every focus change recomputes
//! the whole table from scratch.

use std::collections::{HashMap, HashSet};

use super::types::{RelationEdge, TermNode};

/// How an edge should be drawn relative to the current focus.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Emphasis {
	/// No node is focused.
	#[default]
	Base,
	/// The edge touches the focused node.
	Connected,
	/// Some other node is focused.
	Muted,
}

/// Per-edge highlight result.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EdgeHighlight {
	pub connected: bool,
	pub emphasis: Emphasis,
}

/// Complete highlight table for one focus value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HighlightStyles {
	/// Node id to highlighted flag, one entry per node.
	pub nodes: HashMap<String, bool>,
	/// Edge id to edge highlight, one entry per edge.
	pub edges: HashMap<String, EdgeHighlight>,
}

impl HighlightStyles {
	pub fn is_node_highlighted(&self, id: &str) -> bool {
		self.nodes.get(id).copied().unwrap_or(false)
	}

	pub fn edge(&self, id: &str) -> EdgeHighlight {
		self.edges.get(id).copied().unwrap_or_default()
	}
}

/// The focused id plus every node one edge away in either direction.
/// Empty when nothing is focused. Does not check that `focus` is a node.
pub fn connected_set<'a>(focus: Option<&'a str>, edges: &'a [RelationEdge]) -> HashSet<&'a str> {
	let mut connected = HashSet::new();
	let Some(focus) = focus else {
		return connected;
	};
	connected.insert(focus);
	for edge in edges {
		if edge.source == focus {
			connected.insert(edge.target.as_str());
		}
		if edge.target == focus {
			connected.insert(edge.source.as_str());
		}
	}
	connected
}

/// Derives the highlight table for `focus`. Total over any input: a focus id
/// that is not a node is treated as no focus, so nothing is connected.
pub fn compute_highlight(
	focus: Option<&str>,
	nodes: &[TermNode],
	edges: &[RelationEdge],
) -> HighlightStyles {
	let focus = focus.filter(|f| nodes.iter().any(|node| node.id == *f));
	let connected = connected_set(focus, edges);

	let nodes = nodes
		.iter()
		.map(|node| (node.id.clone(), connected.contains(node.id.as_str())))
		.collect();

	let edges = edges
		.iter()
		.map(|edge| {
			let highlight = match focus {
				None => EdgeHighlight::default(),
				Some(f) if edge.source == f || edge.target == f => EdgeHighlight {
					connected: true,
					emphasis: Emphasis::Connected,
				},
				Some(_) => EdgeHighlight {
					connected: false,
					emphasis: Emphasis::Muted,
				},
			};
			(edge.id.clone(), highlight)
		})
		.collect();

	HighlightStyles { nodes, edges }
}

/// Current focus and the highlight table derived from it.
#[derive(Clone, Debug, Default)]
pub struct HighlightState {
	focused: Option<String>,
	styles: HighlightStyles,
}

impl HighlightState {
	/// Base styles for a freshly loaded graph.
	pub fn new(nodes: &[TermNode], edges: &[RelationEdge]) -> Self {
		Self {
			focused: None,
			styles: compute_highlight(None, nodes, edges),
		}
	}

	/// Replace the focus and recompute every style. Returns `false` when the
	/// focus did not change and nothing was recomputed.
	pub fn set_focus(
		&mut self,
		focus: Option<&str>,
		nodes: &[TermNode],
		edges: &[RelationEdge],
	) -> bool {
		if self.focused.as_deref() == focus {
			return false;
		}
		self.focused = focus.map(str::to_string);
		self.styles = compute_highlight(focus, nodes, edges);
		true
	}

	pub fn focused(&self) -> Option<&str> {
		self.focused.as_deref()
	}

	pub fn styles(&self) -> &HighlightStyles {
		&self.styles
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn nodes(ids: &[&str]) -> Vec<TermNode> {
		ids.iter()
			.map(|id| TermNode {
				id: id.to_string(),
				label: id.to_string(),
				is_center: false,
			})
			.collect()
	}

	fn edges(links: &[(&str, &str)]) -> Vec<RelationEdge> {
		links
			.iter()
			.map(|(s, t)| RelationEdge {
				id: format!("{s}-{t}"),
				source: s.to_string(),
				target: t.to_string(),
				label: "has".into(),
			})
			.collect()
	}

	#[test]
	fn no_focus_is_all_base() {
		let n = nodes(&["a", "b", "c"]);
		let e = edges(&[("a", "b"), ("b", "c")]);
		let styles = compute_highlight(None, &n, &e);
		assert_eq!(styles.nodes.len(), 3);
		assert!(styles.nodes.values().all(|h| !h));
		assert_eq!(styles.edges.len(), 2);
		assert!(styles.edges.values().all(|h| !h.connected && h.emphasis == Emphasis::Base));
	}

	#[test]
	fn focus_lights_up_neighbors_both_directions() {
		let n = nodes(&["a", "b", "c", "d"]);
		let e = edges(&[("a", "b"), ("c", "a"), ("b", "d")]);
		let styles = compute_highlight(Some("a"), &n, &e);

		assert!(styles.is_node_highlighted("a"));
		assert!(styles.is_node_highlighted("b"));
		assert!(styles.is_node_highlighted("c"));
		assert!(!styles.is_node_highlighted("d"));

		assert!(styles.edge("a-b").connected);
		assert!(styles.edge("c-a").connected);
		assert_eq!(styles.edge("c-a").emphasis, Emphasis::Connected);
		assert!(!styles.edge("b-d").connected);
		assert_eq!(styles.edge("b-d").emphasis, Emphasis::Muted);
	}

	#[test]
	fn two_term_scenario() {
		let n = nodes(&["a", "b"]);
		let e = edges(&[("a", "b")]);
		let styles = compute_highlight(Some("a"), &n, &e);
		assert_eq!(
			styles.nodes,
			HashMap::from([("a".to_string(), true), ("b".to_string(), true)])
		);
		assert!(styles.edge("a-b").connected);
	}

	#[test]
	fn unknown_focus_matches_nothing() {
		let n = nodes(&["a", "b"]);
		let e = edges(&[("a", "b")]);
		let styles = compute_highlight(Some("nonexistent"), &n, &e);
		assert!(styles.nodes.values().all(|h| !h));
		assert!(styles.edges.values().all(|h| !h.connected));
	}

	#[test]
	fn dangling_edge_does_not_break_highlight() {
		let n = nodes(&["a"]);
		let e = edges(&[("a", "c")]);
		let styles = compute_highlight(Some("a"), &n, &e);
		assert!(styles.is_node_highlighted("a"));
		assert!(!styles.nodes.contains_key("c"));
		assert!(styles.edge("a-c").connected);

		let styles = compute_highlight(Some("c"), &n, &e);
		assert!(!styles.is_node_highlighted("a"));
		assert!(!styles.edge("a-c").connected);
	}

	#[test]
	fn focus_on_dangling_target_is_no_focus() {
		let n = nodes(&["a", "b"]);
		let e = edges(&[("a", "ghost"), ("a", "b")]);
		let styles = compute_highlight(Some("ghost"), &n, &e);
		assert_eq!(styles, compute_highlight(None, &n, &e));
		assert!(styles.nodes.values().all(|h| !h));
		assert!(styles.edges.values().all(|h| !h.connected && h.emphasis == Emphasis::Base));
	}

	#[test]
	fn connected_set_is_empty_without_focus() {
		let e = edges(&[("a", "b")]);
		assert!(connected_set(None, &e).is_empty());
		let set = connected_set(Some("b"), &e);
		assert_eq!(set, HashSet::from(["a", "b"]));
	}

	#[test]
	fn leaving_reverts_fully() {
		let n = nodes(&["a", "b", "c"]);
		let e = edges(&[("a", "b"), ("b", "c")]);
		let mut state = HighlightState::new(&n, &e);
		let base = state.styles().clone();

		assert!(state.set_focus(Some("b"), &n, &e));
		assert_eq!(state.focused(), Some("b"));
		assert!(state.styles().is_node_highlighted("c"));

		assert!(state.set_focus(Some("a"), &n, &e));
		assert!(!state.styles().is_node_highlighted("c"));

		assert!(state.set_focus(None, &n, &e));
		assert_eq!(state.styles(), &base);
	}

	#[test]
	fn same_focus_is_a_no_op() {
		let n = nodes(&["a", "b"]);
		let e = edges(&[("a", "b")]);
		let mut state = HighlightState::new(&n, &e);
		assert!(!state.set_focus(None, &n, &e));
		assert!(state.set_focus(Some("a"), &n, &e));
		assert!(!state.set_focus(Some("a"), &n, &e));
	}
}
