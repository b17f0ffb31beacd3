use leptos::prelude::*;
use leptos::task::spawn_local;
use log::info;

use crate::api::ApiClient;

const FEATURES: [(&str, &str, &str); 4] = [
	(
		"🧠",
		"AI-Powered Analysis",
		"Advanced algorithms extract insights from unstructured email and document data.",
	),
	(
		"📊",
		"Visual Analytics",
		"Interactive dashboards and knowledge graphs reveal hidden patterns and relationships.",
	),
	(
		"📈",
		"Success Prediction",
		"Get probability scores and risk assessments for better project decision-making.",
	),
	(
		"📄",
		"Multi-Format Support",
		"Upload emails, CSV files, text documents, and more for comprehensive analysis.",
	),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BackendStatus {
	Checking,
	Online,
	Offline,
}

/// Landing page
#[component]
pub fn Home() -> impl IntoView {
	let api = expect_context::<ApiClient>();
	let backend = RwSignal::new(BackendStatus::Checking);

	spawn_local(async move {
		let status = match api.health().await {
			Ok(_) => BackendStatus::Online,
			Err(_) => BackendStatus::Offline,
		};
		info!("Backend at {} is {:?}", api.base_url(), status);
		backend.try_set(status);
	});

	let status_badge = move || match backend.get() {
		BackendStatus::Checking => ("badge badge-muted", "Checking backend..."),
		BackendStatus::Online => ("badge badge-primary", "Backend online"),
		BackendStatus::Offline => ("badge badge-destructive", "Backend unreachable"),
	};

	view! {
		<section class="hero">
			<div class="container hero-inner">
				<h1 class="hero-title">
					"Turn Emails into " <span class="gradient-text">"Project Insights"</span>
				</h1>
				<p class="hero-subtitle">
					"Harness the power of AI to analyze your project communications and unlock actionable insights for better decision-making."
				</p>
				<div class="hero-actions">
					<a href="/upload" class="button button-hero">
						"Start Analysis →"
					</a>
					<span class=move || status_badge().0>{move || status_badge().1}</span>
				</div>
			</div>
		</section>

		<section class="features">
			<div class="container">
				<h2 class="section-title">"Powerful Features for Deep Insights"</h2>
				<p class="section-subtitle">
					"Transform your project data into strategic intelligence with our comprehensive analysis suite."
				</p>
				<div class="feature-grid">
					{FEATURES
						.into_iter()
						.map(|(icon, title, description)| {
							view! {
								<div class="card feature-card">
									<div class="feature-icon">{icon}</div>
									<h3>{title}</h3>
									<p class="muted">{description}</p>
								</div>
							}
						})
						.collect_view()}
				</div>
			</div>
		</section>

		<section class="cta">
			<div class="container">
				<h2 class="section-title">"Ready to Transform Your Project Data?"</h2>
				<p class="section-subtitle">
					"Upload your communications and get a success forecast in minutes."
				</p>
				<a href="/upload" class="button button-hero">
					"Get Started Today"
				</a>
			</div>
		</section>
	}
}
