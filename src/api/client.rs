use std::sync::Arc;

use gloo_net::http::{Method, Request, RequestBuilder};
use log::{debug, error};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use web_sys::{File, FormData};

use super::endpoints::Endpoint;
use super::error::ApiError;
use super::types::{AnalysisResult, GraphPayload, ProjectSubmission};
use crate::config::AppConfig;

/// Export format the dashboard asks for.
pub const DEFAULT_EXPORT_FORMAT: &str = "json";

/// Thin fetch wrapper around the analysis backend.
///
/// Requests are sent once: no retries, no caching, no timeout beyond the
/// browser's own, and no authentication headers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiClient {
	base_url: Arc<str>,
}

impl ApiClient {
	/// Client for `base_url`; a trailing slash is ignored.
	pub fn new(base_url: impl AsRef<str>) -> Self {
		Self {
			base_url: base_url.as_ref().trim_end_matches('/').into(),
		}
	}

	/// Client for the configured backend.
	pub fn from_config(config: &AppConfig) -> Self {
		Self::new(&config.api_base_url)
	}

	/// Backend base URL without a trailing slash.
	pub fn base_url(&self) -> &str {
		&self.base_url
	}

	fn url(&self, path: &str) -> String {
		format!("{}{}", self.base_url, path)
	}

	/// Submit a project for analysis as `multipart/form-data`.
	///
	/// The browser sets the multipart boundary, so no content type is set here.
	pub async fn analyze_project_insights(
		&self,
		submission: &ProjectSubmission,
		files: &[File],
	) -> Result<AnalysisResult, ApiError> {
		let url = self.url(&Endpoint::ProjectInsights.path());
		debug!(
			"Submitting {:?}: {} chars of text, {} file(s)",
			submission.project_name,
			submission.text_content.len(),
			files.len()
		);
		let request = build_form(submission, files)
			.and_then(|form| Request::post(&url).body(form).map_err(ApiError::from));
		self.execute("Project insights analysis", request).await
	}

	/// Predict the success probability of a single project descriptor.
	pub async fn predict_project_success<B>(&self, project: &B) -> Result<Value, ApiError>
	where
		B: Serialize + ?Sized,
	{
		let url = self.url(&Endpoint::PredictSuccess.path());
		let request = Request::post(&url).json(project).map_err(ApiError::from);
		self.execute("Project success prediction", request).await
	}

	/// Predict success for several projects in one request.
	pub async fn predict_batch<B>(&self, projects: &[B]) -> Result<Value, ApiError>
	where
		B: Serialize,
	{
		let url = self.url(&Endpoint::PredictBatch.path());
		let request = Request::post(&url).json(projects).map_err(ApiError::from);
		self.execute("Batch prediction", request).await
	}

	/// Fetch a stored analysis by project id.
	pub async fn project_analysis(&self, project_id: &str) -> Result<AnalysisResult, ApiError> {
		let url = self.url(&Endpoint::ProjectAnalysis(project_id).path());
		self.execute("Project analysis retrieval", Request::get(&url).build().map_err(ApiError::from))
			.await
	}

	/// Fetch the knowledge graph of a project.
	pub async fn graph(&self, project_id: &str) -> Result<GraphPayload, ApiError> {
		let url = self.url(&Endpoint::Graph(project_id).path());
		self.execute("Graph data retrieval", Request::get(&url).build().map_err(ApiError::from))
			.await
	}

	/// Fetch the graph prepared for interactive display.
	pub async fn interactive_graph(&self, project_id: &str) -> Result<GraphPayload, ApiError> {
		let url = self.url(&Endpoint::InteractiveGraph(project_id).path());
		self.execute(
			"Interactive graph retrieval",
			Request::get(&url).build().map_err(ApiError::from),
		)
		.await
	}

	/// Ask the backend to send emails based on an analysis.
	pub async fn send_emails<B>(&self, emails: &B) -> Result<Value, ApiError>
	where
		B: Serialize + ?Sized,
	{
		let url = self.url(&Endpoint::SendEmails.path());
		let request = Request::post(&url).json(emails).map_err(ApiError::from);
		self.execute("Email sending", request).await
	}

	/// Export an analysis in the given format (`json` by default on the dashboard).
	pub async fn export_analysis(&self, project_id: &str, format: &str) -> Result<Value, ApiError> {
		let url = self.url(
			&Endpoint::ExportAnalysis {
				project_id,
				format,
			}
			.path(),
		);
		self.execute("Export analysis", Request::get(&url).build().map_err(ApiError::from))
			.await
	}

	/// Backend liveness check.
	pub async fn health(&self) -> Result<Value, ApiError> {
		let url = self.url(&Endpoint::Health.path());
		self.execute("Health check", Request::get(&url).build().map_err(ApiError::from))
			.await
	}

	/// Call any backend path. A JSON body is attached only for non-GET methods.
	pub async fn call(
		&self,
		method: Method,
		path: &str,
		body: Option<&Value>,
	) -> Result<Value, ApiError> {
		let url = self.url(path);
		let attach_body = method != Method::GET;
		let builder = RequestBuilder::new(&url)
			.method(method)
			.header("Content-Type", "application/json");
		let request = match body {
			Some(body) if attach_body => builder.json(body),
			_ => builder.build(),
		}
		.map_err(ApiError::from);

		let operation = format!("API call to {path}");
		self.execute(&operation, request).await
	}

	async fn execute<T>(
		&self,
		operation: &str,
		request: Result<Request, ApiError>,
	) -> Result<T, ApiError>
	where
		T: DeserializeOwned,
	{
		let result = send(request).await;
		if let Err(err) = &result {
			error!("{operation} failed: {err}");
		}
		result
	}
}

async fn send<T>(request: Result<Request, ApiError>) -> Result<T, ApiError>
where
	T: DeserializeOwned,
{
	let response = request?.send().await?;
	let status = response.status();
	let body = response.text().await?;
	decode_response(status, &body)
}

fn build_form(submission: &ProjectSubmission, files: &[File]) -> Result<FormData, ApiError> {
	let form = FormData::new().map_err(ApiError::from_js)?;
	form.append_with_str("project_name", &submission.project_name)
		.map_err(ApiError::from_js)?;
	form.append_with_str("text_content", &submission.text_content)
		.map_err(ApiError::from_js)?;
	for file in files {
		form.append_with_blob_and_filename("files", file, &file.name())
			.map_err(ApiError::from_js)?;
	}
	Ok(form)
}

/// Turn a status and raw body into a parsed value or an [`ApiError`].
///
/// Any non-2xx status is an error carrying the untouched body text. An empty
/// 2xx body parses as JSON `null`.
pub(crate) fn decode_response<T>(status: u16, body: &str) -> Result<T, ApiError>
where
	T: DeserializeOwned,
{
	if !(200..300).contains(&status) {
		return Err(ApiError::Status {
			status,
			body: body.to_string(),
		});
	}
	let body = if body.trim().is_empty() { "null" } else { body };
	Ok(serde_json::from_str(body)?)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn server_error_carries_status_and_body() {
		let result: Result<Value, _> = decode_response(500, "server error");
		let err = result.unwrap_err();
		assert!(matches!(err, ApiError::Status { status: 500, .. }));
		let message = err.to_string();
		assert!(message.contains("500"));
		assert!(message.contains("server error"));
	}

	#[test]
	fn client_errors_are_not_parsed_even_with_json_bodies() {
		let result: Result<Value, _> = decode_response(404, r#"{"detail":"Not Found"}"#);
		assert_eq!(
			result.unwrap_err().to_string(),
			r#"API Error 404: {"detail":"Not Found"}"#
		);
	}

	#[test]
	fn success_bodies_are_parsed() {
		let result: AnalysisResult =
			decode_response(200, r#"{"project_id":"p-9","project_name":"Atlas"}"#).unwrap();
		assert_eq!(result.project_id, "p-9");
		assert_eq!(result.project_name, "Atlas");
	}

	#[test]
	fn empty_success_body_is_null() {
		let value: Value = decode_response(204, "").unwrap();
		assert!(value.is_null());
	}

	#[test]
	fn malformed_success_body_is_a_decode_error() {
		let result: Result<AnalysisResult, _> = decode_response(200, "<html>");
		assert!(matches!(result, Err(ApiError::Decode(_))));
	}

	#[test]
	fn base_url_is_normalized() {
		let client = ApiClient::new("http://localhost:8000/");
		assert_eq!(client.base_url(), "http://localhost:8000");
		assert_eq!(
			client.url(&Endpoint::Graph("7").path()),
			"http://localhost:8000/graph/7"
		);
	}
}
