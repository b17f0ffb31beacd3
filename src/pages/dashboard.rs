use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{debug, error, info};
use serde_json::Value;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

use crate::api::{ApiClient, DEFAULT_EXPORT_FORMAT, GraphPayload};
use crate::components::knowledge_graph::InteractiveGraph;
use crate::components::toast::use_toaster;
use crate::presentation::{DashboardModel, EntityRow};
use crate::state::{AnalysisSnapshot, use_app_state};

/// Project whose graph has to be fetched separately, if any.
///
/// Older analyses come without an embedded graph.
fn graph_to_fetch(snapshot: Option<&AnalysisSnapshot>) -> Option<String> {
	snapshot
		.filter(|s| s.result.knowledge_graph.is_none())
		.map(|s| s.project_id.clone())
}

fn export_file_name(project_id: &str) -> String {
	format!("{project_id}-analysis.json")
}

/// Save `value` as a JSON file through a temporary object URL.
fn download_json(file_name: &str, value: &Value) -> Result<(), JsValue> {
	let body =
		serde_json::to_string_pretty(value).map_err(|err| JsValue::from_str(&err.to_string()))?;
	let options = BlobPropertyBag::new();
	options.set_type("application/json");
	let blob = Blob::new_with_str_sequence_and_options(
		&js_sys::Array::of1(&JsValue::from_str(&body)),
		&options,
	)?;
	let url = Url::create_object_url_with_blob(&blob)?;

	let document = web_sys::window()
		.and_then(|w| w.document())
		.ok_or_else(|| JsValue::from_str("no document"))?;
	let anchor: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
	anchor.set_href(&url);
	anchor.set_download(file_name);
	anchor.click();
	Url::revoke_object_url(&url)
}

/// Analysis results for the snapshot in [`AppState`](crate::state::AppState).
#[component]
pub fn Dashboard() -> impl IntoView {
	let api = StoredValue::new(expect_context::<ApiClient>());
	let app_state = use_app_state();
	let toaster = use_toaster();

	let snapshot = app_state.analysis();
	let model = Memo::new(move |_| {
		snapshot.with(|snapshot| DashboardModel::new(snapshot.as_ref().map(|s| &*s.result)))
	});
	let has_snapshot = move || snapshot.with(Option::is_some);

	let refreshing = RwSignal::new(false);
	let exporting = RwSignal::new(false);
	let fetched_graph = RwSignal::new(None::<GraphPayload>);
	let graph_loading = RwSignal::new(false);
	let graph_request = StoredValue::new(0u64);

	// Fetch the graph once per snapshot; a newer snapshot supersedes the request.
	Effect::new(move |_| {
		let target = snapshot.with(|s| graph_to_fetch(s.as_ref()));
		let ticket = graph_request.get_value() + 1;
		graph_request.set_value(ticket);
		fetched_graph.set(None);
		graph_loading.set(target.is_some());
		let Some(project_id) = target else {
			return;
		};
		debug!("Snapshot {project_id} has no graph, fetching it");
		let api = api.get_value();
		spawn_local(async move {
			let result = api.interactive_graph(&project_id).await;
			if graph_request.try_get_value() != Some(ticket) {
				debug!("Dropping stale graph for {project_id}");
				return;
			}
			match result {
				Ok(graph) => {
					fetched_graph.try_set(Some(graph));
				}
				Err(err) => toaster.error("Graph unavailable", err.to_string()),
			}
			graph_loading.try_set(false);
		});
	});

	let graph = Signal::derive(move || {
		snapshot
			.with(|s| s.as_ref().and_then(|s| s.result.knowledge_graph.clone()))
			.or_else(|| fetched_graph.get())
	});

	let refresh = move |_| {
		let Some(current) = snapshot.get_untracked() else {
			return;
		};
		refreshing.set(true);
		let api = api.get_value();
		spawn_local(async move {
			match api.project_analysis(&current.project_id).await {
				Ok(mut result) => {
					if result.project_id.is_empty() {
						result.project_id = current.project_id.clone();
					}
					toaster.success(
						"Analysis refreshed",
						format!("Loaded the latest results for \"{}\".", result.project_name),
					);
					app_state.set_analysis(AnalysisSnapshot::new(result));
				}
				Err(err) => toaster.error("Refresh failed", err.to_string()),
			}
			refreshing.try_set(false);
		});
	};

	let export = move |_| {
		let Some(current) = snapshot.get_untracked() else {
			return;
		};
		exporting.set(true);
		let api = api.get_value();
		spawn_local(async move {
			match api
				.export_analysis(&current.project_id, DEFAULT_EXPORT_FORMAT)
				.await
			{
				Ok(value) => {
					let file_name = export_file_name(&current.project_id);
					match download_json(&file_name, &value) {
						Ok(()) => {
							info!("Exported analysis to {file_name}");
							toaster.info("Export ready", format!("Downloaded {file_name}."));
						}
						Err(err) => {
							error!("Export download failed: {err:?}");
							toaster.error("Export failed", "The browser refused the download.");
						}
					}
				}
				Err(err) => toaster.error("Export failed", err.to_string()),
			}
			exporting.try_set(false);
		});
	};

	view! {
		<section class="container page">
			<header class="page-header dashboard-header">
				<div>
					<h1>{move || model.with(|m| m.project_name.clone())}</h1>
					<p class="muted">"AI-powered project analysis results"</p>
				</div>
				<div class="header-actions">
					<button
						class="button button-outline"
						disabled=move || !has_snapshot() || refreshing.get()
						on:click=refresh
					>
						{move || if refreshing.get() { "Refreshing..." } else { "⟳ Refresh" }}
					</button>
					<button
						class="button button-outline"
						disabled=move || !has_snapshot() || exporting.get()
						on:click=export
					>
						{move || if exporting.get() { "Exporting..." } else { "⇩ Export" }}
					</button>
				</div>
			</header>

			<div class="dashboard-top">
				<SuccessCard model=model />
				<MetricGrid model=model />
			</div>

			<div class="two-column">
				<InsightList model=model />
				<EntitySummaryCard model=model />
			</div>

			<div class="card">
				<h2 class="card-title">"🕸 Knowledge Graph"</h2>
				<p class="card-description">
					"Explore how people, tasks and projects connect. Click a node for details."
				</p>
				<InteractiveGraph graph=graph loading=graph_loading />
			</div>

			<EntityTable model=model />
		</section>
	}
}

#[component]
fn SuccessCard(model: Memo<DashboardModel>) -> impl IntoView {
	let percent = move || model.with(|m| m.success_percent);

	view! {
		<div class="card success-card">
			<h2 class="card-title">"Success Probability"</h2>
			<div class="success-ring" style=move || format!("--percent: {};", percent())>
				<span class="success-value">{move || format!("{}%", percent())}</span>
			</div>
			<p class="muted centered">{move || model.with(|m| m.success_description.clone())}</p>
		</div>
	}
}

#[component]
fn MetricGrid(model: Memo<DashboardModel>) -> impl IntoView {
	let metrics = move || {
		let m = model.with(|m| m.metrics);
		[
			("👥", "Stakeholders", m.stakeholders.to_string()),
			("📄", "Documents", m.documents.to_string()),
			("⏱", "Days Left", m.days_left.to_string()),
			("⚠", "Risks", m.risks.to_string()),
		]
	};

	view! {
		<div class="metric-grid">
			{move || {
				metrics()
					.into_iter()
					.map(|(icon, label, value)| {
						view! {
							<div class="card metric-card">
								<span class="metric-icon">{icon}</span>
								<span class="metric-value">{value}</span>
								<span class="muted small">{label}</span>
							</div>
						}
					})
					.collect_view()
			}}
		</div>
	}
}

#[component]
fn InsightList(model: Memo<DashboardModel>) -> impl IntoView {
	view! {
		<div class="card">
			<h2 class="card-title">"💡 AI Insights"</h2>
			{move || {
				let insights = model.with(|m| m.insights.clone());
				if insights.is_empty() {
					return view! { <p class="muted empty-state">"No insights available yet"</p> }
						.into_any();
				}
				insights
					.into_iter()
					.map(|insight| {
						let confidence = insight
							.confidence
							.map(|c| view! { <span class="muted small">{format!("{c}% confidence")}</span> });
						view! {
							<div class="insight">
								<span class=format!("insight-icon {}", insight.severity.text_class())>
									{insight.kind.icon()}
								</span>
								<div>
									<h3 class="insight-title">{insight.title}</h3>
									<p class="muted">{insight.description}</p>
									{confidence}
								</div>
							</div>
						}
					})
					.collect_view()
					.into_any()
			}}
		</div>
	}
}

fn entity_line(row: EntityRow) -> impl IntoView {
	let avatar = row.avatar();
	view! {
		<li class="entity-line">
			<div class="entity-who">
				<span class="avatar">{avatar}</span>
				<div>
					<span class="entity-name">{row.name}</span>
					<span class="muted small">
						{format!("{} · {} connections", row.kind, row.connections)}
					</span>
				</div>
			</div>
			<span class=row.badge.badge_class()>{row.status}</span>
		</li>
	}
}

#[component]
fn EntitySummaryCard(model: Memo<DashboardModel>) -> impl IntoView {
	let expanded = RwSignal::new(false);
	let total = move || model.with(|m| m.entities.len());
	let has_entities = move || model.with(|m| !m.entities.is_empty());
	let has_more = move || model.with(DashboardModel::has_more_entities);

	view! {
		<div class="card">
			<h2 class="card-title">"🧩 Entity Summary"</h2>
			<div class="entity-totals">
				<div>
					<span class="metric-value">
						{move || model.with(|m| m.metrics.total_entities)}
					</span>
					<span class="muted small">"Entities"</span>
				</div>
				<div>
					<span class="metric-value">
						{move || model.with(|m| m.metrics.total_connections)}
					</span>
					<span class="muted small">"Connections"</span>
				</div>
			</div>
			<Show
				when=has_entities
				fallback=|| view! { <p class="muted empty-state">"No entities extracted yet"</p> }
			>
				<ul class="entity-list">
					{move || {
						model
							.with(|m| m.summary_entities(expanded.get()).to_vec())
							.into_iter()
							.map(entity_line)
							.collect_view()
					}}
				</ul>
				<Show when=has_more>
					<button
						class="button button-ghost button-block"
						on:click=move |_| expanded.update(|e| *e = !*e)
					>
						{move || {
							if expanded.get() {
								"Show Less".to_string()
							} else {
								format!("View All {} Entities", total())
							}
						}}
					</button>
				</Show>
			</Show>
		</div>
	}
}

#[component]
fn EntityTable(model: Memo<DashboardModel>) -> impl IntoView {
	view! {
		<Show when=move || model.with(|m| !m.entities.is_empty())>
			<div class="card">
				<h2 class="card-title">"All Entities"</h2>
				<table class="table">
					<thead>
						<tr>
							<th>"Name"</th>
							<th>"Type"</th>
							<th>"Status"</th>
							<th>"Connections"</th>
							<th>"Description"</th>
						</tr>
					</thead>
					<tbody>
						<For
							each=move || model.with(DashboardModel::keyed_entities)
							key=|(key, _)| key.clone()
							children=|(_, row)| {
								let avatar = row.avatar();
								view! {
									<tr>
										<td>
											<div class="entity-who">
												<span class="avatar">{avatar}</span>
												{row.name}
											</div>
										</td>
										<td>{row.kind}</td>
										<td>
											<span class=row.badge.badge_class()>{row.status}</span>
										</td>
										<td>{row.connections}</td>
										<td class="muted">{row.description}</td>
									</tr>
								}
							}
						/>
					</tbody>
				</table>
			</div>
		</Show>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	use crate::api::AnalysisResult;

	#[test]
	fn export_file_is_named_after_the_project() {
		assert_eq!(export_file_name("42"), "42-analysis.json");
	}

	#[test]
	fn only_snapshots_without_a_graph_trigger_a_fetch() {
		let bare = AnalysisSnapshot::new(AnalysisResult {
			project_id: "p1".into(),
			..Default::default()
		});
		let embedded = AnalysisSnapshot::new(AnalysisResult {
			project_id: "p2".into(),
			knowledge_graph: Some(GraphPayload::default()),
			..Default::default()
		});
		assert_eq!(graph_to_fetch(None), None);
		assert_eq!(graph_to_fetch(Some(&bare)).as_deref(), Some("p1"));
		assert_eq!(graph_to_fetch(Some(&embedded)), None);
	}
}
