//! Layered top-to-bottom layout.
//!
//! Nodes are ranked into horizontal bands so that most edges point downwards,
//! ordered inside each band to reduce crossings, then placed on a fixed grid of
//! equally sized boxes. The pipeline runs in four phases:
//!
//! 1. Cycle breaking: DFS back edges (visited in input order) are reversed.
//! 2. Ranking: longest path from the sources over a topological order.
//! 3. Ordering: input order, refined by barycenter sweeps.
//! 4. Placement: fixed box size and separations, each band centered on the widest.
//!
//! Everything is keyed by the node's position in the input, so repeated calls
//! with the same node and edge sequence produce identical coordinates.

use std::collections::{HashMap, HashSet};

use log::debug;
use petgraph::Direction;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::Deserialize;

use super::types::{PositionedNode, TermGraph};

/// Fixed box size and spacing for the layered layout.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayoutConfig {
	/// Width of every node box in world units.
	pub node_width: f64,
	/// Height of every node box in world units.
	pub node_height: f64,
	/// Vertical gap between rank bands.
	pub rank_sep: f64,
	/// Horizontal gap between boxes in a band.
	pub node_sep: f64,
	/// Number of down+up barycenter sweeps.
	pub ordering_passes: usize,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self {
			node_width: 200.0,
			node_height: 50.0,
			rank_sep: 100.0,
			node_sep: 150.0,
			ordering_passes: 4,
		}
	}
}

/// Axis-aligned box around laid-out content, in world units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
	pub min_x: f64,
	pub min_y: f64,
	pub max_x: f64,
	pub max_y: f64,
}

impl Bounds {
	pub fn width(&self) -> f64 {
		self.max_x - self.min_x
	}

	pub fn height(&self) -> f64 {
		self.max_y - self.min_y
	}

	pub fn center(&self) -> (f64, f64) {
		(
			(self.min_x + self.max_x) / 2.0,
			(self.min_y + self.max_y) / 2.0,
		)
	}
}

/// Assigns every node a top-left position. Never fails: isolated nodes,
/// dangling edges, self-loops and cycles all still yield one slot per node.
pub fn layout(graph: &TermGraph, config: &LayoutConfig) -> Vec<PositionedNode> {
	if graph.nodes.is_empty() {
		return Vec::new();
	}

	let dag = ranking_graph(graph);
	let ranks = assign_ranks(&dag);
	let layers = order_layers(&dag, &ranks, config.ordering_passes);
	let positions = place(&layers, graph.nodes.len(), config);

	debug!(
		"term-graph: layout placed {} nodes in {} ranks",
		graph.nodes.len(),
		layers.len()
	);

	graph
		.nodes
		.iter()
		.zip(positions)
		.map(|(node, (x, y))| PositionedNode {
			node: node.clone(),
			x,
			y,
		})
		.collect()
}

/// Bounding box of positioned nodes, or `None` when there are none.
pub fn bounds(nodes: &[PositionedNode], config: &LayoutConfig) -> Option<Bounds> {
	let first = nodes.first()?;
	let init = Bounds {
		min_x: first.x,
		min_y: first.y,
		max_x: first.x + config.node_width,
		max_y: first.y + config.node_height,
	};
	Some(nodes.iter().fold(init, |b, n| Bounds {
		min_x: b.min_x.min(n.x),
		min_y: b.min_y.min(n.y),
		max_x: b.max_x.max(n.x + config.node_width),
		max_y: b.max_y.max(n.y + config.node_height),
	}))
}

/// Builds an acyclic graph over node positions. Dangling edges and self-loops
/// carry no ranking information and are left out; back edges are reversed.
fn ranking_graph(graph: &TermGraph) -> DiGraph<(), ()> {
	let mut index: HashMap<&str, usize> = HashMap::new();
	for (i, node) in graph.nodes.iter().enumerate() {
		index.entry(node.id.as_str()).or_insert(i);
	}

	let links: Vec<(usize, usize)> = graph
		.edges
		.iter()
		.filter_map(|edge| {
			let src = *index.get(edge.source.as_str())?;
			let tgt = *index.get(edge.target.as_str())?;
			(src != tgt).then_some((src, tgt))
		})
		.collect();
	let reversed = back_edges(graph.nodes.len(), &links);

	let mut dag = DiGraph::with_capacity(graph.nodes.len(), links.len());
	for _ in &graph.nodes {
		dag.add_node(());
	}
	for (i, &(src, tgt)) in links.iter().enumerate() {
		let (from, to) = if reversed.contains(&i) {
			(tgt, src)
		} else {
			(src, tgt)
		};
		dag.add_edge(NodeIndex::new(from), NodeIndex::new(to), ());
	}
	dag
}

/// Indices of links that close a cycle during an input-order DFS.
fn back_edges(node_count: usize, links: &[(usize, usize)]) -> HashSet<usize> {
	#[derive(Clone, Copy, PartialEq)]
	enum Mark {
		Unvisited,
		OnStack,
		Finished,
	}

	let mut adjacency = vec![Vec::new(); node_count];
	for (i, &(src, tgt)) in links.iter().enumerate() {
		adjacency[src].push((i, tgt));
	}

	let mut marks = vec![Mark::Unvisited; node_count];
	let mut back = HashSet::new();

	for root in 0..node_count {
		if marks[root] != Mark::Unvisited {
			continue;
		}
		marks[root] = Mark::OnStack;
		let mut stack = vec![(root, 0usize)];

		while let Some((node, cursor)) = stack.last_mut() {
			let node = *node;
			if let Some(&(link, target)) = adjacency[node].get(*cursor) {
				*cursor += 1;
				match marks[target] {
					Mark::OnStack => {
						back.insert(link);
					}
					Mark::Unvisited => {
						marks[target] = Mark::OnStack;
						stack.push((target, 0));
					}
					Mark::Finished => {}
				}
			} else {
				marks[node] = Mark::Finished;
				stack.pop();
			}
		}
	}

	back
}

/// Longest-path ranking: sources sit on rank 0, every other node one rank
/// below its deepest predecessor.
fn assign_ranks(dag: &DiGraph<(), ()>) -> Vec<usize> {
	// The ranking graph is acyclic by construction; input order is a safe fallback.
	let topo = toposort(dag, None).unwrap_or_else(|_| dag.node_indices().collect());
	let mut ranks = vec![0usize; dag.node_count()];
	for idx in topo {
		let next = ranks[idx.index()] + 1;
		for succ in dag.neighbors_directed(idx, Direction::Outgoing) {
			let rank = &mut ranks[succ.index()];
			*rank = (*rank).max(next);
		}
	}
	ranks
}

/// Groups nodes into bands and orders each band with barycenter sweeps.
fn order_layers(dag: &DiGraph<(), ()>, ranks: &[usize], passes: usize) -> Vec<Vec<usize>> {
	let depth = ranks.iter().copied().max().unwrap_or(0) + 1;
	let mut layers: Vec<Vec<usize>> = vec![Vec::new(); depth];
	for (node, &rank) in ranks.iter().enumerate() {
		layers[rank].push(node);
	}

	let mut slot = vec![0usize; ranks.len()];
	for layer in &layers {
		reindex(layer, &mut slot);
	}

	for _ in 0..passes {
		for r in 1..layers.len() {
			sort_by_barycenter(dag, &mut layers[r], &slot, ranks, r - 1, Direction::Incoming);
			reindex(&layers[r], &mut slot);
		}
		for r in (0..layers.len().saturating_sub(1)).rev() {
			sort_by_barycenter(dag, &mut layers[r], &slot, ranks, r + 1, Direction::Outgoing);
			reindex(&layers[r], &mut slot);
		}
	}

	layers
}

fn reindex(layer: &[usize], slot: &mut [usize]) {
	for (i, &node) in layer.iter().enumerate() {
		slot[node] = i;
	}
}

/// Stable sort of one band by the mean slot of its neighbors in the adjacent
/// band. Nodes without such neighbors keep their current slot as the key.
fn sort_by_barycenter(
	dag: &DiGraph<(), ()>,
	layer: &mut [usize],
	slot: &[usize],
	ranks: &[usize],
	adjacent_rank: usize,
	direction: Direction,
) {
	let mut keyed: Vec<(usize, f64)> = layer
		.iter()
		.map(|&node| {
			let (sum, count) = dag
				.neighbors_directed(NodeIndex::new(node), direction)
				.filter(|n| ranks[n.index()] == adjacent_rank)
				.fold((0.0, 0usize), |(sum, count), n| {
					(sum + slot[n.index()] as f64, count + 1)
				});
			let key = if count == 0 {
				slot[node] as f64
			} else {
				sum / count as f64
			};
			(node, key)
		})
		.collect();
	keyed.sort_by(|a, b| a.1.total_cmp(&b.1));
	for (dst, (node, _)) in layer.iter_mut().zip(keyed) {
		*dst = node;
	}
}

/// Top-left corner per node, indexed by input position.
fn place(layers: &[Vec<usize>], node_count: usize, config: &LayoutConfig) -> Vec<(f64, f64)> {
	let (w, h) = (config.node_width.max(0.0), config.node_height.max(0.0));
	let step_x = (w + config.node_sep).max(1.0);
	let step_y = (h + config.rank_sep).max(1.0);

	let band_width = |len: usize| len as f64 * step_x - (step_x - w);
	let widest = layers.iter().map(Vec::len).max().unwrap_or(0);
	let full_width = band_width(widest);

	let mut positions = vec![(0.0, 0.0); node_count];
	for (rank, layer) in layers.iter().enumerate() {
		let offset = (full_width - band_width(layer.len())) / 2.0;
		for (i, &node) in layer.iter().enumerate() {
			let center_x = offset + i as f64 * step_x + w / 2.0;
			let center_y = rank as f64 * step_y + h / 2.0;
			positions[node] = (center_x - w / 2.0, center_y - h / 2.0);
		}
	}
	positions
}
