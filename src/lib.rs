//! term-graph: Interactive layered graph of glossary terms and their relations.
//!
//! This crate provides a WASM-based graph visualization that lays out terms
//! top-to-bottom by their relations, with pan/zoom and neighborhood
//! highlighting on hover.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};

pub mod components;

pub use components::term_graph::{
	GraphConfig, LoadError, TermGraph, TermGraphCanvas, TermRecord, build_graph, compute_highlight,
	layout, load_config, load_terms,
};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("term-graph: logging initialized");
}

/// Main application component.
/// Loads the term dataset, then builds and renders the graph. Shows a loading
/// state until the data arrives and a failure state if it cannot be loaded.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let config = load_config();
	let fetch_config = config.clone();
	let terms = LocalResource::new(move || {
		let config = fetch_config.clone();
		async move { load_terms(&config).await }
	});

	let graph_view = move || match terms.get() {
		None => view! { <p class="graph-status">"Loading graph..."</p> }.into_any(),
		Some(Err(e)) => {
			warn!("term-graph: failed to load terms: {e}");
			view! { <p class="graph-status graph-error">{format!("Could not load terms: {e}")}</p> }
				.into_any()
		}
		Some(Ok(records)) => {
			let graph = build_graph(&records, &config);
			info!(
				"term-graph: built graph with {} nodes, {} edges",
				graph.nodes.len(),
				graph.edges.len()
			);
			let graph_signal = Signal::derive(move || graph.clone());
			view! { <TermGraphCanvas graph=graph_signal config=config.clone() fullscreen=true /> }
				.into_any()
		}
	};

	view! {
		<Html attr:lang="en" attr:dir="ltr" />
		<Title text="Term Relation Graph" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-graph">
			{graph_view}
			<div class="graph-overlay">
				<h1>"Term Relations"</h1>
				<p class="subtitle">"Hover a term to highlight its relations. Scroll to zoom. Drag background to pan."</p>
			</div>
		</div>
	}
}
