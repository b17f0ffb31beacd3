use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

const AUTO_DISMISS_MS: u32 = 5_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
	Info,
	Success,
	Error,
}

impl ToastKind {
	fn class(self) -> &'static str {
		match self {
			Self::Info => "toast toast-info",
			Self::Success => "toast toast-success",
			Self::Error => "toast toast-error",
		}
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
	id: u64,
	kind: ToastKind,
	title: String,
	description: String,
}

/// Handle for raising notifications. Errors stay until dismissed, the rest
/// fade out on their own.
#[derive(Clone, Copy, Debug)]
pub struct Toaster {
	toasts: RwSignal<Vec<Toast>>,
	next_id: StoredValue<u64>,
}

impl Toaster {
	pub fn provide() -> Self {
		let toaster = Self {
			toasts: RwSignal::new(Vec::new()),
			next_id: StoredValue::new(0),
		};
		provide_context(toaster);
		toaster
	}

	pub fn info(&self, title: impl Into<String>, description: impl Into<String>) {
		self.push(ToastKind::Info, title.into(), description.into());
	}

	pub fn success(&self, title: impl Into<String>, description: impl Into<String>) {
		self.push(ToastKind::Success, title.into(), description.into());
	}

	pub fn error(&self, title: impl Into<String>, description: impl Into<String>) {
		self.push(ToastKind::Error, title.into(), description.into());
	}

	fn push(&self, kind: ToastKind, title: String, description: String) {
		let id = self.next_id.get_value();
		self.next_id.set_value(id + 1);
		self.toasts.update(|toasts| {
			toasts.push(Toast {
				id,
				kind,
				title,
				description,
			})
		});

		if kind != ToastKind::Error {
			let toasts = self.toasts;
			spawn_local(async move {
				TimeoutFuture::new(AUTO_DISMISS_MS).await;
				toasts.try_update(|toasts| toasts.retain(|t| t.id != id));
			});
		}
	}

	pub fn dismiss(&self, id: u64) {
		self.toasts.update(|toasts| toasts.retain(|t| t.id != id));
	}
}

pub fn use_toaster() -> Toaster {
	expect_context::<Toaster>()
}

#[component]
pub fn ToastStack() -> impl IntoView {
	let toaster = use_toaster();

	view! {
		<div class="toast-stack" role="status" aria-live="polite">
			<For
				each=move || toaster.toasts.get()
				key=|toast| toast.id
				children=move |toast| {
					let id = toast.id;
					view! {
						<div class=toast.kind.class()>
							<div class="toast-body">
								<strong>{toast.title}</strong>
								<p>{toast.description}</p>
							</div>
							<button
								class="toast-close"
								aria-label="Dismiss"
								on:click=move |_| toaster.dismiss(id)
							>
								"×"
							</button>
						</div>
					}
				}
			/>
		</div>
	}
}
