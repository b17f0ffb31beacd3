/// Backend routes this client knows about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum Endpoint<'a> {
	Health,
	ProjectInsights,
	PredictSuccess,
	PredictBatch,
	ProjectAnalysis(&'a str),
	Graph(&'a str),
	InteractiveGraph(&'a str),
	SendEmails,
	ExportAnalysis { project_id: &'a str, format: &'a str },
}

impl Endpoint<'_> {
	/// Path relative to the backend base URL, including any query string.
	pub fn path(&self) -> String {
		match self {
			Self::Health => "/health".into(),
			Self::ProjectInsights => "/project_insights".into(),
			Self::PredictSuccess => "/predict_project_success".into(),
			Self::PredictBatch => "/predict_batch".into(),
			Self::ProjectAnalysis(id) => format!("/project_analysis/{id}"),
			Self::Graph(id) => format!("/graph/{id}"),
			Self::InteractiveGraph(id) => format!("/interactive_graph/{id}"),
			Self::SendEmails => "/emails".into(),
			Self::ExportAnalysis { project_id, format } => {
				format!("/export_analysis/{project_id}?format={format}")
			}
		}
	}
}
