use leptos::prelude::*;
use leptos_router::hooks::use_location;

const NAV_ITEMS: [(&str, &str, &str); 2] = [("/", "Home", "⌂"), ("/upload", "Upload", "⇪")];

/// Active route highlighting uses exact path equality.
fn is_active(current: &str, href: &str) -> bool {
	current == href
}

#[component]
pub fn Navigation() -> impl IntoView {
	let pathname = use_location().pathname;

	view! {
		<nav class="navbar">
			<div class="container navbar-inner">
				<a href="/" class="brand">
					<span class="brand-mark">"▮▮"</span>
					<span class="brand-name">"ProInsight"</span>
				</a>
				<div class="nav-links">
					{NAV_ITEMS
						.into_iter()
						.map(|(href, label, icon)| {
							let class = move || {
								if is_active(&pathname.get(), href) {
									"nav-link nav-link-active"
								} else {
									"nav-link"
								}
							};
							view! {
								<a href=href class=class>
									<span class="nav-icon">{icon}</span>
									<span>{label}</span>
								</a>
							}
						})
						.collect_view()}
				</div>
			</div>
		</nav>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn only_exact_paths_are_active() {
		assert!(is_active("/", "/"));
		assert!(is_active("/upload", "/upload"));
		assert!(!is_active("/upload", "/"));
		assert!(!is_active("/upload/", "/upload"));
	}
}
