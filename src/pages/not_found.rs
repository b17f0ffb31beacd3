use leptos::prelude::*;

/// 404 - Not Found
#[component]
pub fn NotFound() -> impl IntoView {
	view! {
		<section class="container empty-page">
			<h1>"Page not found"</h1>
			<p class="muted">"The page you are looking for does not exist."</p>
			<a href="/" class="button button-outline">
				"Back to Home"
			</a>
		</section>
	}
}
