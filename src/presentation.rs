//! Dashboard view model and the fixed styling tables it uses.

use crate::api::{AnalysisResult, EntitySummary, InsightKind, KeyMetrics};

const DEFAULT_PROJECT_NAME: &str = "Project Analysis";
const DEFAULT_DESCRIPTION: &str = "Based on analyzed communications";

/// Entities listed in the summary card before "View All".
pub const SUMMARY_ENTITY_LIMIT: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
	High,
	Medium,
	Low,
}

impl Severity {
	pub fn text_class(self) -> &'static str {
		match self {
			Self::High => "text-destructive",
			Self::Medium => "text-accent",
			Self::Low => "text-primary",
		}
	}
}

impl From<InsightKind> for Severity {
	fn from(kind: InsightKind) -> Self {
		match kind {
			InsightKind::Risk => Self::High,
			InsightKind::Opportunity => Self::Medium,
			InsightKind::Other => Self::Low,
		}
	}
}

impl InsightKind {
	pub fn icon(self) -> &'static str {
		match self {
			Self::Risk => "⚠",
			Self::Opportunity => "↗",
			Self::Other => "✔",
		}
	}
}

/// Status badge scheme for the entity lists.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityStatus {
	Active,
	Critical,
	Pending,
	Review,
	Other,
}

impl EntityStatus {
	pub fn parse(status: &str) -> Self {
		match status {
			"active" => Self::Active,
			"critical" => Self::Critical,
			"pending" => Self::Pending,
			"review" => Self::Review,
			_ => Self::Other,
		}
	}

	pub fn badge_class(self) -> &'static str {
		match self {
			Self::Active => "badge badge-primary",
			Self::Critical => "badge badge-destructive",
			Self::Pending => "badge badge-accent",
			Self::Review => "badge badge-secondary",
			Self::Other => "badge badge-muted",
		}
	}
}

/// `probability` as a whole percentage in `0..=100`.
pub fn success_percent(probability: f64) -> u32 {
	if !probability.is_finite() {
		return 0;
	}
	(probability * 100.0).round().clamp(0.0, 100.0) as u32
}

#[derive(Clone, Debug, PartialEq)]
pub struct InsightCard {
	pub kind: InsightKind,
	pub severity: Severity,
	pub title: String,
	pub description: String,
	pub confidence: Option<u32>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EntityRow {
	pub id: String,
	pub name: String,
	pub kind: String,
	pub status: String,
	pub badge: EntityStatus,
	pub connections: u64,
	pub description: String,
}

impl EntityRow {
	/// Avatar chip text: the id, or the name's initial when the backend sent none.
	pub fn avatar(&self) -> String {
		if !self.id.is_empty() {
			return self.id.clone();
		}
		self.name
			.chars()
			.next()
			.map(|c| c.to_uppercase().collect())
			.unwrap_or_else(|| "?".into())
	}
}

impl From<&EntitySummary> for EntityRow {
	fn from(entity: &EntitySummary) -> Self {
		Self {
			id: entity.id.clone(),
			name: entity.name.clone(),
			kind: entity.kind.clone(),
			status: entity.status.clone(),
			badge: EntityStatus::parse(&entity.status),
			connections: entity.connections,
			description: entity
				.description
				.clone()
				.filter(|d| !d.is_empty())
				.unwrap_or_else(|| "in network".into()),
		}
	}
}

/// Everything the dashboard renders, derived once from an analysis.
///
/// Without an analysis every number is zero; that is the dashboard's empty
/// state, not an error.
#[derive(Clone, Debug, PartialEq)]
pub struct DashboardModel {
	pub project_name: String,
	pub success_percent: u32,
	pub success_description: String,
	pub metrics: KeyMetrics,
	pub insights: Vec<InsightCard>,
	pub entities: Vec<EntityRow>,
}

impl DashboardModel {
	pub fn new(analysis: Option<&AnalysisResult>) -> Self {
		let Some(analysis) = analysis else {
			return Self {
				project_name: DEFAULT_PROJECT_NAME.into(),
				success_percent: 0,
				success_description: DEFAULT_DESCRIPTION.into(),
				metrics: KeyMetrics::default(),
				insights: Vec::new(),
				entities: Vec::new(),
			};
		};

		let project_name = if analysis.project_name.trim().is_empty() {
			DEFAULT_PROJECT_NAME.into()
		} else {
			analysis.project_name.clone()
		};
		let success_description = analysis
			.success_rate_description
			.clone()
			.filter(|d| !d.is_empty())
			.unwrap_or_else(|| DEFAULT_DESCRIPTION.into());
		let insights = analysis
			.ai_insights
			.iter()
			.map(|insight| InsightCard {
				kind: insight.kind,
				severity: insight.kind.into(),
				title: insight.title.clone(),
				description: insight.description.clone(),
				confidence: insight.confidence.map(success_percent),
			})
			.collect();

		Self {
			project_name,
			success_percent: success_percent(analysis.success_probability),
			success_description,
			metrics: analysis.key_metrics,
			insights,
			entities: analysis.entity_summary.iter().map(EntityRow::from).collect(),
		}
	}

	/// Rows for the summary card, all of them when `expanded`.
	pub fn summary_entities(&self, expanded: bool) -> &[EntityRow] {
		if expanded {
			&self.entities
		} else {
			&self.entities[..self.entities.len().min(SUMMARY_ENTITY_LIMIT)]
		}
	}

	/// More rows than the summary card shows collapsed.
	pub fn has_more_entities(&self) -> bool {
		self.entities.len() > SUMMARY_ENTITY_LIMIT
	}

	/// Rows keyed by position as well as id; ids are optional and may repeat.
	pub fn keyed_entities(&self) -> Vec<((usize, String), EntityRow)> {
		self.entities
			.iter()
			.enumerate()
			.map(|(index, row)| ((index, row.id.clone()), row.clone()))
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::api::Insight;

	fn entity(id: &str, status: &str) -> EntitySummary {
		EntitySummary {
			id: id.into(),
			name: format!("Entity {id}"),
			kind: "person".into(),
			status: status.into(),
			connections: 2,
			description: None,
		}
	}

	#[test]
	fn missing_analysis_renders_zeroed_placeholders() {
		let model = DashboardModel::new(None);
		assert_eq!(model.project_name, "Project Analysis");
		assert_eq!(model.success_percent, 0);
		assert_eq!(model.metrics, KeyMetrics::default());
		assert!(model.insights.is_empty());
		assert!(model.entities.is_empty());
	}

	#[test]
	fn percent_rounds_and_clamps() {
		assert_eq!(success_percent(0.784), 78);
		assert_eq!(success_percent(0.785), 79);
		assert_eq!(success_percent(1.7), 100);
		assert_eq!(success_percent(-0.2), 0);
		assert_eq!(success_percent(f64::NAN), 0);
	}

	#[test]
	fn insight_kinds_map_to_severities() {
		assert_eq!(Severity::from(InsightKind::Risk), Severity::High);
		assert_eq!(Severity::from(InsightKind::Opportunity), Severity::Medium);
		assert_eq!(Severity::from(InsightKind::Other), Severity::Low);
		assert_eq!(Severity::High.text_class(), "text-destructive");
	}

	#[test]
	fn entity_statuses_map_to_badges() {
		assert_eq!(EntityStatus::parse("critical"), EntityStatus::Critical);
		assert_eq!(EntityStatus::parse("Active"), EntityStatus::Other);
		assert_eq!(EntityStatus::parse("review").badge_class(), "badge badge-secondary");
	}

	#[test]
	fn model_reflects_analysis_without_mutating_it() {
		let analysis = AnalysisResult {
			project_id: "p1".into(),
			project_name: "Apollo".into(),
			success_probability: 0.62,
			ai_insights: vec![Insight {
				kind: InsightKind::Risk,
				title: "Budget".into(),
				description: "Over by 10%".into(),
				confidence: Some(0.875),
			}],
			entity_summary: (0..5).map(|i| entity(&i.to_string(), "pending")).collect(),
			..Default::default()
		};
		let before = analysis.clone();

		let model = DashboardModel::new(Some(&analysis));
		assert_eq!(analysis, before);
		assert_eq!(model.project_name, "Apollo");
		assert_eq!(model.success_percent, 62);
		assert_eq!(model.success_description, "Based on analyzed communications");
		assert_eq!(model.insights[0].severity, Severity::High);
		assert_eq!(model.insights[0].confidence, Some(88));
		assert_eq!(model.entities[0].description, "in network");
		assert_eq!(model.entities[0].badge, EntityStatus::Pending);
		assert_eq!(model.summary_entities(false).len(), SUMMARY_ENTITY_LIMIT);
		assert_eq!(model.summary_entities(true).len(), 5);
		assert!(model.has_more_entities());
	}

	#[test]
	fn short_entity_lists_have_no_view_all() {
		let analysis = AnalysisResult {
			entity_summary: (0..SUMMARY_ENTITY_LIMIT)
				.map(|i| entity(&i.to_string(), "active"))
				.collect(),
			..Default::default()
		};
		let model = DashboardModel::new(Some(&analysis));
		assert!(!model.has_more_entities());
		assert!(!DashboardModel::new(None).has_more_entities());
	}

	#[test]
	fn entities_without_ids_get_distinct_keys() {
		let analysis: AnalysisResult =
			serde_json::from_str(r#"{"entity_summary":[{"name":"Dana"},{"name":"Eli"}]}"#).unwrap();
		let model = DashboardModel::new(Some(&analysis));
		let keys: Vec<_> = model.keyed_entities().into_iter().map(|(key, _)| key).collect();
		assert_eq!(keys, vec![(0, String::new()), (1, String::new())]);
		assert_ne!(keys[0], keys[1]);
	}

	#[test]
	fn avatar_falls_back_to_the_initial() {
		let mut row = EntityRow::from(&entity("7", "active"));
		assert_eq!(row.avatar(), "7");
		row.id.clear();
		row.name = "dana".into();
		assert_eq!(row.avatar(), "D");
		row.name.clear();
		assert_eq!(row.avatar(), "?");
	}
}
