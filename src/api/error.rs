use thiserror::Error;
use wasm_bindgen::JsValue;

/// Everything that can go wrong talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
	/// The backend answered with a non-2xx status.
	#[error("API Error {status}: {body}")]
	#[allow(missing_docs)]
	Status { status: u16, body: String },

	/// The request never produced a response (offline, CORS, DNS...).
	#[error("network request failed: {0}")]
	Transport(#[from] gloo_net::Error),

	/// A 2xx response whose body is not the JSON we expected.
	#[error("invalid response body: {0}")]
	Decode(#[from] serde_json::Error),

	/// The browser refused to build the request (e.g. `FormData` construction).
	#[error("failed to build request: {0}")]
	Request(String),
}

impl ApiError {
	pub(crate) fn from_js(value: JsValue) -> Self {
		Self::Request(value.as_string().unwrap_or_else(|| format!("{value:?}")))
	}
}
