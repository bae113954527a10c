//! Term data and configuration loading.
//!
//! Terms come from, in order of preference: an inline `<script id="term-data">`
//! element, the glossary API when `api_base` is configured, or the static
//! JSON bundle. An API failure falls back to the static bundle.

use log::{info, warn};
use thiserror::Error;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlScriptElement, Request, RequestInit, RequestMode, Response};

use super::types::{GraphConfig, TermPayload, TermRecord};

/// Element id of the inline term payload.
pub const TERM_DATA_ID: &str = "term-data";

/// Element id of the inline configuration.
pub const GRAPH_CONFIG_ID: &str = "graph-config";

/// Page size requested from the API.
const API_PAGE_LIMIT: usize = 100;

/// Why the term dataset could not be loaded.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum LoadError {
	#[error("browser window is not available")]
	NoWindow,
	#[error("request failed: {0}")]
	Request(String),
	#[error("server responded with HTTP {0}")]
	Status(u16),
	#[error("malformed term data: {0}")]
	Parse(String),
}

/// Parses either payload shape into term records.
pub fn parse_terms(text: &str) -> Result<Vec<TermRecord>, LoadError> {
	serde_json::from_str::<TermPayload>(text)
		.map(TermPayload::into_records)
		.map_err(|e| LoadError::Parse(e.to_string()))
}

/// Parses inline configuration, falling back to defaults on error.
pub fn parse_config(text: &str) -> GraphConfig {
	serde_json::from_str(text).unwrap_or_else(|e| {
		warn!("term-graph: ignoring malformed graph config: {e}");
		GraphConfig::default()
	})
}

/// Terms endpoint for an API origin.
pub fn api_url(base: &str) -> String {
	format!(
		"{}/api/terms?skip=0&limit={}",
		base.trim_end_matches('/'),
		API_PAGE_LIMIT
	)
}

/// Text content of a `<script>` element by id.
fn script_text(id: &str) -> Option<String> {
	let document = web_sys::window()?.document()?;
	let script: HtmlScriptElement = document.get_element_by_id(id)?.dyn_into().ok()?;
	script.text().ok()
}

/// Reads configuration from the page, or defaults.
pub fn load_config() -> GraphConfig {
	match script_text(GRAPH_CONFIG_ID) {
		Some(text) => parse_config(&text),
		None => GraphConfig::default(),
	}
}

/// Loads the term dataset. This is the only suspension point before the
/// graph is built.
pub async fn load_terms(config: &GraphConfig) -> Result<Vec<TermRecord>, LoadError> {
	if let Some(text) = script_text(TERM_DATA_ID) {
		let terms = parse_terms(&text)?;
		info!("term-graph: loaded {} inline terms", terms.len());
		return Ok(terms);
	}

	if let Some(base) = &config.api_base {
		let url = api_url(base);
		match fetch_text(&url).await.and_then(|text| parse_terms(&text)) {
			Ok(terms) => {
				info!("term-graph: loaded {} terms from {url}", terms.len());
				return Ok(terms);
			}
			Err(e) => warn!("term-graph: API failed, falling back to static data: {e}"),
		}
	}

	let terms = parse_terms(&fetch_text(&config.data_url).await?)?;
	info!(
		"term-graph: loaded {} terms from {}",
		terms.len(),
		config.data_url
	);
	Ok(terms)
}

async fn fetch_text(url: &str) -> Result<String, LoadError> {
	let opts = RequestInit::new();
	opts.set_method("GET");
	opts.set_mode(RequestMode::Cors);

	let request = Request::new_with_str_and_init(url, &opts)
		.map_err(|e| LoadError::Request(format!("{e:?}")))?;

	let window = web_sys::window().ok_or(LoadError::NoWindow)?;
	let resp_value = JsFuture::from(window.fetch_with_request(&request))
		.await
		.map_err(|e| LoadError::Request(format!("{e:?}")))?;
	let resp: Response = resp_value
		.dyn_into()
		.map_err(|_| LoadError::Request("response is not a Response".into()))?;

	if !resp.ok() {
		return Err(LoadError::Status(resp.status()));
	}

	let text = JsFuture::from(
		resp.text()
			.map_err(|e| LoadError::Request(format!("{e:?}")))?,
	)
	.await
	.map_err(|e| LoadError::Request(format!("{e:?}")))?;

	text.as_string()
		.ok_or_else(|| LoadError::Parse("response body is not text".into()))
}
