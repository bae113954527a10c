//! Term data as delivered by the glossary source, and the graph model built from it.

use serde::{Deserialize, Serialize};
use serde_json::Map;

use super::layout::LayoutConfig;

/// A directed, labeled relation from the owning term to another term.
#[derive(Clone, Debug, Deserialize)]
pub struct Relation {
	/// Id of the term this relation points at. May not exist in the dataset.
	pub target_term_id: String,
	/// Human readable relation label (e.g. "is part of").
	pub relation_type: String,
	#[serde(default)]
	pub description: Option<String>,
}

/// A single glossary term with its outgoing relations.
///
/// `id` and `term` are optional so that a malformed record does not fail the
/// whole payload; the builder skips such records.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct TermRecord {
	#[serde(default)]
	pub id: Option<String>,
	/// Display label.
	#[serde(default)]
	pub term: Option<String>,
	#[serde(default)]
	pub definition: String,
	#[serde(default)]
	pub category: Option<String>,
	#[serde(default)]
	pub relations: Vec<Relation>,
}

/// Paged API response shape: `{ items: [...], total: n }`.
///
/// Items stay raw so one bad record does not reject the whole page.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct TermCollection {
	pub items: Vec<serde_json::Value>,
	#[serde(default)]
	pub total: Option<usize>,
}

/// Static bundle shape: `{ terms: { "<id>": {...}, ... } }`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct TermBundle {
	pub terms: Map<String, serde_json::Value>,
}

/// Either payload shape accepted by the loader.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum TermPayload {
	Collection(TermCollection),
	Bundle(TermBundle),
}

impl TermPayload {
	/// Flatten into term records, keeping source order.
	///
	/// Entries that do not deserialize as a record are dropped with a
	/// warning; a bundle entry without an `id` inherits its map key.
	pub fn into_records(self) -> Vec<TermRecord> {
		match self {
			TermPayload::Collection(collection) => collection
				.items
				.into_iter()
				.enumerate()
				.filter_map(|(index, value)| record_from(value, &format!("item {index}")))
				.collect(),
			TermPayload::Bundle(bundle) => bundle
				.terms
				.into_iter()
				.filter_map(|(key, value)| {
					let mut record = record_from(value, &format!("bundle entry {key:?}"))?;
					if record.id.is_none() {
						record.id = Some(key);
					}
					Some(record)
				})
				.collect(),
		}
	}
}

fn record_from(value: serde_json::Value, location: &str) -> Option<TermRecord> {
	serde_json::from_value(value)
		.map_err(|e| log::warn!("term-graph: dropping {location}: {e}"))
		.ok()
}

/// Graph configuration, optionally read from a `graph-config` script element.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
	/// Term id rendered as the root concept.
	pub center_id: String,
	/// Static bundle path, relative to the document base.
	pub data_url: String,
	/// API origin. When set, terms are requested from `{api_base}/api/terms`.
	pub api_base: Option<String>,
	/// Theme name, see `Theme::named`.
	pub theme: String,
	pub layout: LayoutConfig,
}

impl Default for GraphConfig {
	fn default() -> Self {
		Self {
			center_id: "gof_patterns".to_string(),
			data_url: "data/glossary.json".to_string(),
			api_base: None,
			theme: "default".to_string(),
			layout: LayoutConfig::default(),
		}
	}
}

/// One node per distinct term.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TermNode {
	pub id: String,
	pub label: String,
	pub is_center: bool,
}

/// One directed edge per relation entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelationEdge {
	/// `"{source}-{target}"`, suffixed `#n` for repeated pairs.
	pub id: String,
	pub source: String,
	pub target: String,
	/// Relation type shown on the edge.
	pub label: String,
}

/// A node with its top-left anchor from the layout engine.
#[derive(Clone, Debug, PartialEq)]
pub struct PositionedNode {
	pub node: TermNode,
	pub x: f64,
	pub y: f64,
}

/// Nodes and edges produced by the builder, in construction order.
#[derive(Clone, Debug, Default)]
pub struct TermGraph {
	pub nodes: Vec<TermNode>,
	pub edges: Vec<RelationEdge>,
}

impl TermGraph {
	/// Edges whose target has no node.
	pub fn dangling_edges(&self) -> impl Iterator<Item = &RelationEdge> {
		self.edges
			.iter()
			.filter(|edge| !self.nodes.iter().any(|node| node.id == edge.target))
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}
}

/// Node record handed to the render surface.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeView {
	pub id: String,
	pub label: String,
	pub is_center: bool,
	pub is_highlighted: bool,
	pub x: f64,
	pub y: f64,
}

/// Edge record handed to the render surface.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EdgeView {
	pub id: String,
	pub source: String,
	pub target: String,
	pub label: String,
	pub connected: bool,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_paged_collection() {
		let json = r#"{
			"total": 2,
			"items": [
				{"id": "a", "term": "A", "definition": "first", "relations": [
					{"target_term_id": "b", "relation_type": "has"}
				]},
				{"id": "b", "term": "B", "definition": "second", "category": "x", "relations": []}
			]
		}"#;
		let records = serde_json::from_str::<TermPayload>(json)
			.unwrap()
			.into_records();
		assert_eq!(records.len(), 2);
		assert_eq!(records[0].relations[0].target_term_id, "b");
		assert_eq!(records[0].relations[0].description, None);
		assert_eq!(records[1].category.as_deref(), Some("x"));
	}

	#[test]
	fn parses_static_bundle_in_file_order() {
		let json = r#"{"terms": {
			"zeta": {"id": "zeta", "term": "Zeta", "definition": "", "relations": []},
			"alpha": {"term": "Alpha", "definition": "", "relations": []}
		}}"#;
		let records = serde_json::from_str::<TermPayload>(json)
			.unwrap()
			.into_records();
		let ids: Vec<_> = records.iter().map(|r| r.id.as_deref()).collect();
		assert_eq!(ids, vec![Some("zeta"), Some("alpha")]);
	}

	#[test]
	fn bad_collection_item_is_dropped_not_fatal() {
		let json = r#"{"items": [
			{"id": "a", "term": 5},
			{"id": "b", "term": "B", "relations": [{"target_term_id": "a"}]},
			{"id": "c", "term": "C"}
		]}"#;
		let records = serde_json::from_str::<TermPayload>(json)
			.unwrap()
			.into_records();
		let ids: Vec<_> = records.iter().map(|r| r.id.as_deref()).collect();
		assert_eq!(ids, vec![Some("c")]);
	}

	#[test]
	fn record_missing_term_still_parses() {
		let record: TermRecord = serde_json::from_str(r#"{"id": "orphan"}"#).unwrap();
		assert_eq!(record.id.as_deref(), Some("orphan"));
		assert!(record.term.is_none());
		assert!(record.relations.is_empty());
	}

	#[test]
	fn config_fills_missing_fields_from_default() {
		let config: GraphConfig = serde_json::from_str(r#"{"center_id": "root"}"#).unwrap();
		assert_eq!(config.center_id, "root");
		assert_eq!(config.data_url, "data/glossary.json");
		assert_eq!(config.layout.node_width, 200.0);
	}

	#[test]
	fn node_view_serializes_camel_case() {
		let view = NodeView {
			id: "a".into(),
			label: "A".into(),
			is_center: true,
			is_highlighted: false,
			x: 1.0,
			y: 2.0,
		};
		let value = serde_json::to_value(&view).unwrap();
		assert_eq!(value["isCenter"], true);
		assert_eq!(value["isHighlighted"], false);
	}
}
