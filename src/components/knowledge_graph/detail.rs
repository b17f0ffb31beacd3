use leptos::prelude::*;

use super::model::GraphView;

/// Side panel describing the selected node and its neighbours.
#[component]
pub fn NodeDetail(
	#[prop(into)] graph: Signal<GraphView>,
	selected: RwSignal<Option<String>>,
) -> impl IntoView {
	move || {
		let id = selected.get()?;
		graph.with(|graph| {
			let node = graph.node(&id)?;
			let neighbors = graph
				.neighbors(&id)
				.into_iter()
				.map(|n| {
					view! {
						<li class="neighbor">
							<span>{n.node.name.clone()}</span>
							<span class="muted small">{n.relationship.to_string()}</span>
						</li>
					}
				})
				.collect_view();

			Some(view! {
				<aside class="detail-panel" role="dialog" aria-label="Node details">
					<header class="detail-header">
						<h3>
							<span class="detail-icon">{node.kind.icon()}</span>
							{node.name.clone()}
						</h3>
						<button
							class="button button-ghost button-sm"
							aria-label="Close"
							on:click=move |_| selected.set(None)
						>
							"×"
						</button>
					</header>
					<p class="muted">{format!("Detailed information about this {}", node.kind.as_str())}</p>

					<h4>"Details"</h4>
					<dl class="detail-grid">
						<dt>"Type:"</dt>
						<dd><span class="badge badge-secondary">{node.kind.as_str().to_string()}</span></dd>
						<dt>"Status:"</dt>
						<dd><span class=node.status.badge_class()>{node.status.as_str().to_string()}</span></dd>
						<dt>"Connections:"</dt>
						<dd>{node.connections}</dd>
					</dl>

					{node.description.clone().map(|description| view! {
						<h4>"Description"</h4>
						<p class="muted small">{description}</p>
					})}

					<h4>"Connected To"</h4>
					<ul class="neighbor-list">{neighbors}</ul>
				</aside>
			})
		})
	}
}
