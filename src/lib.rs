//! ProInsight: Leptos client-side front end for the project analysis backend.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

// Modules
pub mod api;
mod components;
pub mod config;
mod pages;
mod presentation;
mod state;
mod upload;

// Top-Level pages
use crate::api::ApiClient;
use crate::components::navigation::Navigation;
use crate::components::toast::{ToastStack, Toaster};
use crate::config::AppConfig;
use crate::pages::dashboard::Dashboard;
use crate::pages::home::Home;
use crate::pages::not_found::NotFound;
use crate::pages::upload::Upload;
use crate::state::AppState;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging(level: Level) {
	let _ = console_log::init_with_level(level);
	console_error_panic_hook::set_once();
	info!("Logging initialized at {level}");
}

/// Root component: shared context, navigation shell and the route table.
#[component]
pub fn App() -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();

	let config = AppConfig::from_build_env();
	info!("Using backend {}", config.api_base_url);
	provide_context(ApiClient::from_config(&config));
	AppState::provide();
	Toaster::provide();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />

		// sets the document title
		<Title text="ProInsight" />

		// injects metadata in the <head> of the page
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Navigation />
			<main>
				<Routes fallback=|| view! { <NotFound /> }>
					<Route path=path!("/") view=Home />
					<Route path=path!("/upload") view=Upload />
					<Route path=path!("/dashboard") view=Dashboard />
				</Routes>
			</main>
			<ToastStack />
		</Router>
	}
}
