//! Wire shapes exchanged with the analysis backend.
//!
//! The backend is lenient about which fields it sends, so every field
//! defaults and identifiers accept either JSON strings or numbers.

use serde::{Deserialize, Deserializer, Serialize};

/// Text fields of a `/project_insights` submission; files travel alongside.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ProjectSubmission {
	/// Required, already trimmed.
	pub project_name: String,
	/// May be empty when files carry the content.
	pub text_content: String,
}

/// Full payload returned by `/project_insights` and `/project_analysis/{id}`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisResult {
	/// Identifier later used for `/project_analysis/{id}` and friends.
	#[serde(deserialize_with = "string_or_number")]
	pub project_id: String,
	/// Name the project was submitted under.
	pub project_name: String,
	/// Predicted probability of success in `0.0..=1.0`.
	pub success_probability: f64,
	/// Human readable explanation of the probability.
	pub success_rate_description: Option<String>,
	/// Headline counts.
	pub key_metrics: KeyMetrics,
	/// Risks and opportunities, in backend order.
	pub ai_insights: Vec<Insight>,
	/// Extracted entities, in backend order.
	pub entity_summary: Vec<EntitySummary>,
	/// Stakeholder/task graph, when the backend built one inline.
	pub knowledge_graph: Option<GraphPayload>,
}

/// Headline counts shown on the dashboard. Missing values are zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct KeyMetrics {
	pub stakeholders: u64,
	pub documents: u64,
	pub days_left: i64,
	pub risks: u64,
	pub total_entities: u64,
	pub total_connections: u64,
}

/// Insight category as sent by the backend.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
	/// Something threatening delivery.
	Risk,
	/// Something worth pursuing.
	Opportunity,
	/// Any type this client does not know.
	#[default]
	#[serde(other)]
	Other,
}

/// One AI-generated observation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Insight {
	/// Wire field `type`.
	#[serde(rename = "type")]
	pub kind: InsightKind,
	/// One-line headline.
	pub title: String,
	/// Longer explanation.
	pub description: String,
	/// Model confidence in `0.0..=1.0`, if reported.
	pub confidence: Option<f64>,
}

/// One extracted entity.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntitySummary {
	/// Short identifier shown in the entity avatar.
	#[serde(deserialize_with = "string_or_number")]
	pub id: String,
	/// Display name.
	pub name: String,
	/// Wire field `type`, e.g. `person`.
	#[serde(rename = "type")]
	pub kind: String,
	/// Free-form status such as `active` or `critical`.
	pub status: String,
	/// Number of graph edges touching this entity.
	pub connections: u64,
	/// Optional note.
	pub description: Option<String>,
}

/// Knowledge graph as the backend sends it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphPayload {
	/// Graph vertices; `id` is the unique key.
	pub nodes: Vec<RawNode>,
	/// Directed edges between node ids.
	pub edges: Vec<RawEdge>,
}

/// Graph vertex; every field except `id` is optional.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct RawNode {
	#[serde(deserialize_with = "string_or_number")]
	pub id: String,
	pub name: Option<String>,
	#[serde(rename = "type")]
	pub kind: Option<String>,
	pub status: Option<String>,
	pub connections: Option<u32>,
	pub description: Option<String>,
}

/// Edge `from -> to`, labelled by `label` or `relationship`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct RawEdge {
	#[serde(deserialize_with = "string_or_number")]
	pub from: String,
	#[serde(deserialize_with = "string_or_number")]
	pub to: String,
	pub label: Option<String>,
	pub relationship: Option<String>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
	D: Deserializer<'de>,
{
	#[derive(Deserialize)]
	#[serde(untagged)]
	enum Id {
		Text(String),
		Number(serde_json::Number),
		Null(()),
	}

	Ok(match Id::deserialize(deserializer)? {
		Id::Text(text) => text,
		Id::Number(number) => number.to_string(),
		Id::Null(()) => String::new(),
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn parses_a_full_analysis_payload() {
		let payload = json!({
			"project_id": 42,
			"project_name": "Apollo",
			"success_probability": 0.815,
			"success_rate_description": "Healthy cadence",
			"key_metrics": {"stakeholders": 4, "documents": 2, "days_left": 30, "risks": 1},
			"ai_insights": [
				{"type": "risk", "title": "Scope creep", "description": "d", "confidence": 0.9},
				{"type": "milestone", "title": "Kickoff", "description": "d"}
			],
			"entity_summary": [
				{"id": "E1", "name": "Dana", "type": "person", "status": "active", "connections": 3}
			],
			"knowledge_graph": {
				"nodes": [{"id": "A", "type": "task", "status": "active"}],
				"edges": [{"from": "A", "to": "A", "label": "self"}]
			}
		});

		let result: AnalysisResult = serde_json::from_value(payload).unwrap();
		assert_eq!(result.project_id, "42");
		assert_eq!(result.key_metrics.total_entities, 0);
		assert_eq!(result.key_metrics.days_left, 30);
		assert_eq!(result.ai_insights[0].kind, InsightKind::Risk);
		assert_eq!(result.ai_insights[1].kind, InsightKind::Other);
		assert_eq!(result.entity_summary[0].description, None);
		let graph = result.knowledge_graph.unwrap();
		assert_eq!(graph.nodes[0].connections, None);
		assert_eq!(graph.edges[0].label.as_deref(), Some("self"));
	}

	#[test]
	fn tolerates_an_empty_object() {
		let result: AnalysisResult = serde_json::from_str("{}").unwrap();
		assert_eq!(result, AnalysisResult::default());
		assert!(result.knowledge_graph.is_none());
	}

	#[test]
	fn null_identifiers_become_empty() {
		let edge: RawEdge = serde_json::from_value(json!({"from": null, "to": 7})).unwrap();
		assert_eq!(edge.from, "");
		assert_eq!(edge.to, "7");
	}
}
