//! Client for the ProInsight analysis backend.

mod client;
mod endpoints;
mod error;
mod types;

pub use client::{ApiClient, DEFAULT_EXPORT_FORMAT};
pub use endpoints::Endpoint;
pub use error::ApiError;
pub use types::{
	AnalysisResult, EntitySummary, GraphPayload, Insight, InsightKind, KeyMetrics,
	ProjectSubmission, RawEdge, RawNode,
};
