//! Term relation graph visualization component.
//!
//! Turns a flat list of glossary terms into an interactive directed graph:
//! - One node per term, one edge per relation ([`build_graph`])
//! - Layered top-to-bottom layout with fixed-size boxes ([`layout`])
//! - Hover highlighting of the focused node's direct neighborhood ([`compute_highlight`])
//! - Pan, zoom and fit-to-content on an HTML canvas ([`TermGraphCanvas`])
//!
//! # Example
//!
//! ```ignore
//! use term_graph::{build_graph, GraphConfig, TermGraphCanvas, TermRecord};
//!
//! let config = GraphConfig::default();
//! let graph = build_graph(&records, &config);
//!
//! view! { <TermGraphCanvas graph=graph config=config fullscreen=true /> }
//! ```

mod builder;
mod component;
mod highlight;
mod layout;
mod loader;
mod render;
pub mod scale;
mod state;
pub mod theme;
mod types;

pub use builder::build_graph;
pub use component::TermGraphCanvas;
pub use highlight::{
	EdgeHighlight, Emphasis, HighlightState, HighlightStyles, compute_highlight, connected_set,
};
pub use layout::{Bounds, LayoutConfig, bounds, layout};
pub use loader::{LoadError, load_config, load_terms, parse_terms};
pub use state::{TermGraphState, ViewTransform};
pub use theme::Theme;
pub use types::{
	EdgeView, GraphConfig, NodeView, PositionedNode, Relation, RelationEdge, TermCollection,
	TermGraph, TermNode, TermPayload, TermRecord,
};
