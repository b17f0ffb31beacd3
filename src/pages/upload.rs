use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;
use log::{debug, error, info};
use web_sys::{File, HtmlInputElement};

use crate::api::ApiClient;
use crate::components::toast::use_toaster;
use crate::state::{AnalysisSnapshot, use_app_state};
use crate::upload::{
	ACCEPTED_EXTENSIONS, SubmitError, UploadPhase, ValidationError, format_kb, preview_text,
};

/// Project submission form
#[component]
pub fn Upload() -> impl IntoView {
	let api = expect_context::<ApiClient>();
	let app_state = use_app_state();
	let toaster = use_toaster();
	let navigate = use_navigate();

	let project_name = RwSignal::new(String::new());
	let text_input = RwSignal::new(String::new());
	let files = RwSignal::new_local(Vec::<File>::new());
	let phase = RwSignal::new(UploadPhase::Idle);
	let validation = RwSignal::new(None::<ValidationError>);

	let has_content = move || {
		!project_name.with(String::is_empty)
			|| !text_input.with(String::is_empty)
			|| !files.with(Vec::is_empty)
	};
	let submitting = move || phase.with(UploadPhase::is_submitting);

	// Drop the inline message as soon as the field it points at is filled in.
	Effect::new(move |_| {
		let Some(err) = validation.get() else {
			return;
		};
		let file_count = files.with(Vec::len);
		let persists = project_name
			.with(|name| text_input.with(|text| err.persists(name, text, file_count)));
		if !persists {
			validation.set(None);
		}
	});

	let on_files = move |ev: web_sys::Event| {
		let input: HtmlInputElement = event_target(&ev);
		let Some(list) = input.files() else {
			return;
		};
		let picked: Vec<File> = (0..list.length()).filter_map(|i| list.get(i)).collect();
		// so picking the same file again still fires `change`
		input.set_value("");
		if picked.is_empty() {
			return;
		}
		toaster.success(
			"Files uploaded",
			format!("{} file(s) uploaded successfully.", picked.len()),
		);
		files.update(|current| current.extend(picked));
	};

	let remove_file = move |index: usize| {
		files.update(|current| {
			if index < current.len() {
				current.remove(index);
			}
		});
	};

	let run_analysis = move |_| {
		let selected = files.get_untracked();
		let started = phase.try_update(|phase| {
			phase.begin(
				&project_name.get_untracked(),
				&text_input.get_untracked(),
				selected.len(),
			)
		});
		let submission = match started {
			Some(Ok(submission)) => submission,
			Some(Err(SubmitError::Invalid(err))) => {
				debug!("Upload blocked: {err}");
				toaster.error(err.title(), err.to_string());
				validation.set(Some(err));
				return;
			}
			Some(Err(SubmitError::InFlight)) | None => return,
		};
		validation.set(None);

		let (api, navigate) = (api.clone(), navigate.clone());
		spawn_local(async move {
			match api.analyze_project_insights(&submission, &selected).await {
				Ok(result) => {
					if phase.try_update(UploadPhase::succeed).is_none() {
						debug!("Upload page is gone, dropping analysis result");
						return;
					}
					info!("Analysis result for project {}", result.project_id);
					toaster.success(
						"Analysis complete",
						format!("Project \"{}\" analyzed successfully!", result.project_name),
					);
					app_state.set_analysis(AnalysisSnapshot::new(result));
					navigate("/dashboard", Default::default());
				}
				Err(err) => {
					error!("Analysis error: {err}");
					let message = err.to_string();
					toaster.error("Analysis failed", message.clone());
					phase.try_update(|phase| phase.fail(message));
				}
			}
		});
	};

	let file_rows = move || {
		files.with(|current| {
			current
				.iter()
				.enumerate()
				.map(|(index, file)| {
					view! {
						<li class="file-row">
							<span class="file-name">"📄 " {file.name()}</span>
							<span class="muted small">{format!("({})", format_kb(file.size()))}</span>
							<button class="link-destructive" on:click=move |_| remove_file(index)>
								"Remove"
							</button>
						</li>
					}
				})
				.collect_view()
		})
	};

	let preview = move || {
		if !has_content() {
			return view! {
				<div class="empty-state">
					<p>"No content added yet."</p>
					<p class="muted small">"Start by filling in the fields on the left."</p>
				</div>
			}
			.into_any();
		}
		let name = project_name.get();
		let text = text_input.get();
		let names: Vec<String> = files.with(|current| current.iter().map(File::name).collect());

		view! {
			<div class="preview">
				{(!name.is_empty()).then(|| view! {
					<div>
						<label class="preview-label">"PROJECT NAME"</label>
						<p class="preview-value">{name}</p>
					</div>
				})}
				{(!text.is_empty()).then(|| view! {
					<div>
						<label class="preview-label">
							{format!("TEXT CONTENT ({} characters)", text.chars().count())}
						</label>
						<p class="preview-text">{preview_text(&text)}</p>
					</div>
				})}
				{(!names.is_empty()).then(|| view! {
					<div>
						<label class="preview-label">{format!("FILES ({})", names.len())}</label>
						<ul class="preview-files">
							{names.into_iter().map(|n| view! { <li>"📄 " {n}</li> }).collect_view()}
						</ul>
					</div>
				})}
			</div>
		}
		.into_any()
	};

	view! {
		<section class="container page">
			<header class="page-header centered">
				<h1>"Upload Your Project Data"</h1>
				<p class="muted">
					"Choose your preferred input method below. You can combine multiple sources for more comprehensive analysis."
				</p>
			</header>

			<div class="two-column">
				<div class="stack">
					<div class="card">
						<h2 class="card-title">"📁 Project Name"</h2>
						<p class="card-description">
							"Give your project a descriptive name for easy identification."
						</p>
						<label for="project-name">"Project Name"</label>
						<input
							id="project-name"
							class="input"
							placeholder="e.g., Q4 Marketing Campaign Analysis"
							prop:value=move || project_name.get()
							on:input=move |ev| project_name.set(event_target_value(&ev))
						/>
						<Show when=move || validation.get() == Some(ValidationError::MissingProjectName)>
							<p class="field-error">{ValidationError::MissingProjectName.to_string()}</p>
						</Show>
					</div>

					<div class="card">
						<h2 class="card-title">"✎ Text Input"</h2>
						<p class="card-description">
							"Paste email content, meeting notes, or any project-related text."
						</p>
						<label for="text-input">"Text Content"</label>
						<textarea
							id="text-input"
							class="textarea"
							placeholder="Paste your email content, meeting notes, or project documents here..."
							prop:value=move || text_input.get()
							on:input=move |ev| text_input.set(event_target_value(&ev))
						></textarea>
						<Show when=move || validation.get() == Some(ValidationError::MissingContent)>
							<p class="field-error">{ValidationError::MissingContent.to_string()}</p>
						</Show>
					</div>

					<div class="card">
						<h2 class="card-title">"⇪ File Upload"</h2>
						<p class="card-description">
							"Upload CSV, TXT, EML files, or other document formats."
						</p>
						<label for="file-upload" class="dropzone">
							<span class="dropzone-icon">"⇪"</span>
							<span class="muted">"Click to upload files"</span>
							<span class="muted small">"Supports CSV, TXT, EML, DOCX, PDF"</span>
						</label>
						<input
							id="file-upload"
							class="hidden"
							type="file"
							multiple=true
							accept=ACCEPTED_EXTENSIONS
							on:change=on_files
						/>
						<Show when=move || !files.with(Vec::is_empty)>
							<label>"Uploaded Files"</label>
							<ul class="file-list">{file_rows}</ul>
						</Show>
					</div>
				</div>

				<div class="stack">
					<div class="card">
						<h2 class="card-title">"👁 Input Preview"</h2>
						<p class="card-description">"Review your inputs before running the analysis."</p>
						{preview}
					</div>

					<div class="card">
						<button
							class="button button-hero button-block"
							disabled=move || !has_content() || submitting()
							on:click=run_analysis
						>
							{move || if submitting() { "Analyzing..." } else { "▶ Run Analysis" }}
						</button>
						<Show when=move || !has_content()>
							<p class="muted small centered">"Add content above to enable analysis"</p>
						</Show>
						{move || {
							phase
								.with(|phase| phase.error().map(str::to_string))
								.map(|message| view! { <p class="field-error centered">{message}</p> })
						}}
					</div>
				</div>
			</div>
		</section>
	}
}
