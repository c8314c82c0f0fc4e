//! Client for the content API: graph export and related content.

use log::debug;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

use crate::graph::{GraphExport, RawContentRecord};

/// Where the backend lives and how much related content to ask for.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
	/// Backend origin, e.g. `http://127.0.0.1:8090`.
	pub base_url: String,
	/// Related items requested per selected node.
	pub related_limit: usize,
	/// Seconds between export refreshes; `0` disables polling.
	pub refresh_secs: u64,
}

impl Default for ApiConfig {
	fn default() -> Self {
		Self {
			base_url: "http://127.0.0.1:8090".into(),
			related_limit: 10,
			refresh_secs: 60,
		}
	}
}

impl ApiConfig {
	fn url(&self, path: &str) -> String {
		format!("{}{}", self.base_url.trim_end_matches('/'), path)
	}
}

/// Why a request produced no usable data.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FetchError {
	/// The request never got a response.
	#[error("request to {url} failed: {message}")]
	Network {
		/// Requested URL.
		url: String,
		/// What the browser reported.
		message: String,
	},
	/// The backend answered with a non-2xx status.
	#[error("{url} answered with HTTP {status}")]
	Status {
		/// HTTP status code.
		status: u16,
		/// Requested URL.
		url: String,
	},
	/// The body was not the expected JSON.
	#[error("could not decode response from {url}: {message}")]
	Decode {
		/// Requested URL.
		url: String,
		/// The decoder's complaint.
		message: String,
	},
}

#[derive(Deserialize)]
struct RelatedResponse {
	#[serde(default)]
	related_content: Vec<RawContentRecord>,
}

fn js_message(value: wasm_bindgen::JsValue) -> String {
	value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

async fn get_json<T: DeserializeOwned>(url: String) -> Result<T, FetchError> {
	let network = |message: String| FetchError::Network {
		url: url.clone(),
		message,
	};
	let window = web_sys::window().ok_or_else(|| network("no window".into()))?;
	let response: Response = JsFuture::from(window.fetch_with_str(&url))
		.await
		.map_err(|e| network(js_message(e)))?
		.dyn_into()
		.map_err(|e| network(js_message(e)))?;

	if !response.ok() {
		return Err(FetchError::Status {
			status: response.status(),
			url,
		});
	}

	let text = JsFuture::from(response.text().map_err(|e| network(js_message(e)))?)
		.await
		.map_err(|e| network(js_message(e)))?
		.as_string()
		.unwrap_or_default();
	debug!("GET {} -> {} bytes", url, text.len());
	decode(url, &text)
}

fn decode<T: DeserializeOwned>(url: String, body: &str) -> Result<T, FetchError> {
	serde_json::from_str(body).map_err(|e| FetchError::Decode {
		url,
		message: e.to_string(),
	})
}

/// `GET /api/knowledge-graph/export`.
pub async fn fetch_graph_export(config: &ApiConfig) -> Result<GraphExport, FetchError> {
	get_json(config.url("/api/knowledge-graph/export")).await
}

/// `GET /api/related/{id}?limit=`, used by the detail panel only.
pub async fn fetch_related_content(
	config: &ApiConfig,
	id: &str,
	limit: usize,
) -> Result<Vec<RawContentRecord>, FetchError> {
	let url = config.url(&format!("/api/related/{}?limit={}", id, limit));
	let body: RelatedResponse = get_json(url).await?;
	Ok(body.related_content)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::{GraphSession, SnapshotUpdate};

	#[test]
	fn urls_join_without_double_slashes() {
		let config = ApiConfig {
			base_url: "http://localhost:8090/".into(),
			..ApiConfig::default()
		};
		assert_eq!(
			config.url("/api/knowledge-graph/export"),
			"http://localhost:8090/api/knowledge-graph/export"
		);
	}

	#[test]
	fn related_payload_decodes() {
		let body: RelatedResponse = serde_json::from_str(
			r#"{"related_content": [{"id": 3, "title": "t", "similarity": 0.8}], "total": 1, "source_id": 1}"#,
		)
		.unwrap();
		assert_eq!(body.related_content.len(), 1);
		assert_eq!(body.related_content[0].valid_id().map(|id| id.as_str()), Some("3"));
	}

	#[test]
	fn empty_failure_body_keeps_the_last_graph() {
		let url = "http://127.0.0.1:8090/api/knowledge-graph/export".to_string();
		let good: GraphExport =
			decode(url.clone(), r#"{"nodes": [{"id": "a"}, {"id": "b"}], "edges": []}"#).unwrap();
		let mut session = GraphSession::default();
		session.apply_export(Ok(good));
		session.on_node_select("a").unwrap();

		let failed = decode::<GraphExport>(url, "{}");
		assert!(matches!(failed, Err(FetchError::Decode { .. })));
		assert_eq!(session.apply_export(failed), SnapshotUpdate::Retained);
		assert_eq!(session.snapshot().nodes().len(), 2);
		assert_eq!(session.interaction().selected().map(|id| id.as_str()), Some("a"));
	}

	#[test]
	fn errors_render_context() {
		let err = FetchError::Status {
			status: 500,
			url: "http://x/api".into(),
		};
		assert_eq!(err.to_string(), "http://x/api answered with HTTP 500");
	}
}
