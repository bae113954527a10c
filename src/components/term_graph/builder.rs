//! Converts flat term records into the node/edge graph model.

use std::collections::HashSet;

use log::{debug, warn};

use super::types::{GraphConfig, RelationEdge, TermGraph, TermNode, TermRecord};

/// Builds one node per distinct term and one edge per relation.
///
/// Records with a missing or blank `id`/`term` are skipped together with their
/// relations. When ids repeat, the first record wins and later ones are
/// skipped. Edge targets are not validated; dangling edges are kept in order.
pub fn build_graph(terms: &[TermRecord], config: &GraphConfig) -> TermGraph {
	let mut seen: HashSet<&str> = HashSet::new();
	let mut issued: HashSet<String> = HashSet::new();
	let mut nodes = Vec::with_capacity(terms.len());
	let mut edges = Vec::new();

	for (index, record) in terms.iter().enumerate() {
		let (Some(id), Some(label)) = (non_blank(&record.id), non_blank(&record.term)) else {
			warn!("term-graph: skipping malformed term record at index {index}");
			continue;
		};
		if !seen.insert(id) {
			warn!("term-graph: duplicate term id {id:?} at index {index}, keeping first");
			continue;
		}

		nodes.push(TermNode {
			id: id.to_string(),
			label: label.to_string(),
			is_center: id == config.center_id,
		});

		for relation in &record.relations {
			let target = relation.target_term_id.as_str();
			edges.push(RelationEdge {
				id: edge_id(&mut issued, id, target),
				source: id.to_string(),
				target: target.to_string(),
				label: relation.relation_type.clone(),
			});
		}
	}

	let dangling = edges
		.iter()
		.filter(|edge| !seen.contains(edge.target.as_str()))
		.count();
	if dangling > 0 {
		warn!("term-graph: {dangling} relation(s) point at unknown terms");
	}
	debug!(
		"term-graph: built {} nodes, {} edges from {} records",
		nodes.len(),
		edges.len(),
		terms.len()
	);

	TermGraph { nodes, edges }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
	value.as_deref().filter(|s| !s.trim().is_empty())
}

/// `source-target`, or the first free `source-target#n` when that string was
/// already issued. Distinct pairs can format alike (`a` + `b-c`, `a-b` + `c`),
/// so uniqueness is checked on the formatted id.
fn edge_id(issued: &mut HashSet<String>, source: &str, target: &str) -> String {
	let base = format!("{source}-{target}");
	let mut id = base.clone();
	let mut occurrence = 1;
	while issued.contains(&id) {
		occurrence += 1;
		id = format!("{base}#{occurrence}");
	}
	issued.insert(id.clone());
	id
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::term_graph::highlight::compute_highlight;
	use crate::components::term_graph::types::Relation;

	fn relation(target: &str, kind: &str) -> Relation {
		Relation {
			target_term_id: target.into(),
			relation_type: kind.into(),
			description: None,
		}
	}

	fn term(id: &str, label: &str, relations: Vec<Relation>) -> TermRecord {
		TermRecord {
			id: Some(id.into()),
			term: Some(label.into()),
			relations,
			..Default::default()
		}
	}

	fn config(center: &str) -> GraphConfig {
		GraphConfig {
			center_id: center.into(),
			..Default::default()
		}
	}

	#[test]
	fn two_terms_one_relation() {
		let terms = vec![
			term("a", "A", vec![relation("b", "has")]),
			term("b", "B", vec![]),
		];
		let graph = build_graph(&terms, &config("none"));
		let ids: Vec<_> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
		assert_eq!(ids, ["a", "b"]);
		assert_eq!(graph.nodes[0].label, "A");
		assert_eq!(graph.edges.len(), 1);
		let edge = &graph.edges[0];
		assert_eq!((edge.source.as_str(), edge.target.as_str()), ("a", "b"));
		assert_eq!(edge.id, "a-b");
		assert_eq!(edge.label, "has");
	}

	#[test]
	fn edge_count_matches_relation_count_in_order() {
		let terms = vec![
			term("a", "A", vec![relation("c", "x"), relation("b", "y")]),
			term("b", "B", vec![relation("a", "z")]),
			term("c", "C", vec![]),
		];
		let graph = build_graph(&terms, &config("a"));
		let total: usize = terms.iter().map(|t| t.relations.len()).sum();
		assert_eq!(graph.edges.len(), total);
		let labels: Vec<_> = graph.edges.iter().map(|e| e.label.as_str()).collect();
		assert_eq!(labels, ["x", "y", "z"]);
	}

	#[test]
	fn marks_exactly_one_center_when_present() {
		let terms = vec![term("root", "Root", vec![]), term("leaf", "Leaf", vec![])];
		let graph = build_graph(&terms, &config("root"));
		assert_eq!(graph.nodes.iter().filter(|n| n.is_center).count(), 1);
		assert!(graph.nodes[0].is_center);

		let graph = build_graph(&terms, &config("missing"));
		assert!(graph.nodes.iter().all(|n| !n.is_center));
	}

	#[test]
	fn keeps_dangling_edges() {
		let terms = vec![term("a", "A", vec![relation("c", "has")])];
		let graph = build_graph(&terms, &config("a"));
		assert_eq!(graph.nodes.len(), 1);
		assert_eq!(graph.edges.len(), 1);
		assert_eq!(graph.dangling_edges().count(), 1);
	}

	#[test]
	fn skips_malformed_records_and_their_relations() {
		let mut no_id = term("x", "X", vec![relation("a", "has")]);
		no_id.id = None;
		let mut blank_term = term("y", " ", vec![relation("a", "has")]);
		blank_term.term = Some("   ".into());
		let terms = vec![no_id, blank_term, term("a", "A", vec![])];

		let graph = build_graph(&terms, &config("a"));
		assert_eq!(graph.nodes.len(), 1);
		assert_eq!(graph.nodes[0].id, "a");
		assert!(graph.edges.is_empty());
	}

	#[test]
	fn first_duplicate_wins() {
		let terms = vec![
			term("a", "First", vec![relation("b", "has")]),
			term("b", "B", vec![]),
			term("a", "Second", vec![relation("b", "uses")]),
		];
		let graph = build_graph(&terms, &config("a"));
		assert_eq!(graph.nodes.len(), 2);
		assert_eq!(graph.nodes[0].label, "First");
		assert_eq!(graph.edges.len(), 1);
		assert_eq!(graph.edges[0].label, "has");
	}

	#[test]
	fn repeated_pairs_get_distinct_ids() {
		let terms = vec![
			term("a", "A", vec![relation("b", "has"), relation("b", "uses"), relation("b", "creates")]),
			term("b", "B", vec![]),
		];
		let graph = build_graph(&terms, &config("a"));
		let ids: Vec<_> = graph.edges.iter().map(|e| e.id.as_str()).collect();
		assert_eq!(ids, ["a-b", "a-b#2", "a-b#3"]);
	}

	#[test]
	fn hyphenated_ids_do_not_collide_across_pairs() {
		let terms = vec![
			term("a", "A", vec![relation("b-c", "has")]),
			term("a-b", "AB", vec![relation("c", "has")]),
			term("b-c", "BC", vec![]),
			term("c", "C", vec![]),
		];
		let graph = build_graph(&terms, &config("a"));
		let ids: Vec<_> = graph.edges.iter().map(|e| e.id.as_str()).collect();
		assert_eq!(ids, ["a-b-c", "a-b-c#2"]);

		let styles = compute_highlight(Some("a"), &graph.nodes, &graph.edges);
		assert_eq!(styles.edges.len(), graph.edges.len());
		assert!(styles.edge("a-b-c").connected);
		assert!(!styles.edge("a-b-c#2").connected);
	}

	#[test]
	fn empty_input_builds_empty_graph() {
		let graph = build_graph(&[], &GraphConfig::default());
		assert!(graph.is_empty());
		assert!(graph.edges.is_empty());
	}
}
