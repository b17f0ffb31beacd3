use std::sync::Arc;

use leptos::prelude::*;
use log::info;

use crate::api::AnalysisResult;

/// The analysis handed from the upload page to the dashboard.
#[derive(Clone, Debug, PartialEq)]
pub struct AnalysisSnapshot {
	pub project_id: String,
	pub result: Arc<AnalysisResult>,
}

impl AnalysisSnapshot {
	pub fn new(result: AnalysisResult) -> Self {
		Self {
			project_id: result.project_id.clone(),
			result: Arc::new(result),
		}
	}
}

/// App-wide state shared through context. Lives only as long as the page.
#[derive(Clone, Copy, Debug)]
pub struct AppState {
	analysis: RwSignal<Option<AnalysisSnapshot>>,
}

impl AppState {
	pub fn provide() -> Self {
		let state = Self {
			analysis: RwSignal::new(None),
		};
		provide_context(state);
		state
	}

	pub fn analysis(&self) -> Signal<Option<AnalysisSnapshot>> {
		self.analysis.into()
	}

	pub fn set_analysis(&self, snapshot: AnalysisSnapshot) {
		info!(
			"Storing analysis for project {:?} ({})",
			snapshot.result.project_name, snapshot.project_id
		);
		self.analysis.set(Some(snapshot));
	}
}

pub fn use_app_state() -> AppState {
	expect_context::<AppState>()
}
