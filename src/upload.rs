//! Upload form validation and submission lifecycle.

use thiserror::Error;

use crate::api::ProjectSubmission;

/// Advisory `accept` list for the file picker. Not enforced.
pub const ACCEPTED_EXTENSIONS: &str = ".csv,.txt,.eml,.docx,.pdf";

/// Characters of text shown in the input preview before truncating.
pub const PREVIEW_CHARS: usize = 200;

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
	#[error("Please provide a project name to continue.")]
	MissingProjectName,
	#[error("Please provide text content or upload files for analysis.")]
	MissingContent,
}

impl ValidationError {
	/// Toast headline.
	pub fn title(self) -> &'static str {
		match self {
			Self::MissingProjectName => "Project name required",
			Self::MissingContent => "Additional input required",
		}
	}
	/// Whether the form still has the gap this error points at.
	pub fn persists(self, project_name: &str, text_content: &str, file_count: usize) -> bool {
		match self {
			Self::MissingProjectName => project_name.trim().is_empty(),
			Self::MissingContent => text_content.trim().is_empty() && file_count == 0,
		}
	}
}

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
	#[error(transparent)]
	Invalid(#[from] ValidationError),
	#[error("an analysis is already running")]
	InFlight,
}

/// Check the form and produce the trimmed text fields to send.
pub fn validate(
	project_name: &str,
	text_content: &str,
	file_count: usize,
) -> Result<ProjectSubmission, ValidationError> {
	let project_name = project_name.trim();
	if project_name.is_empty() {
		return Err(ValidationError::MissingProjectName);
	}
	let text_content = text_content.trim();
	if text_content.is_empty() && file_count == 0 {
		return Err(ValidationError::MissingContent);
	}
	Ok(ProjectSubmission {
		project_name: project_name.to_string(),
		text_content: text_content.to_string(),
	})
}

/// Where the upload page is in its submit cycle.
///
/// `Failed` keeps the last error for display but otherwise behaves like
/// `Idle`: the form is untouched and can be resubmitted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum UploadPhase {
	#[default]
	Idle,
	Submitting,
	Succeeded,
	Failed(String),
}

impl UploadPhase {
	/// Move to `Submitting` if the form is valid and nothing is in flight.
	///
	/// On error the phase is left unchanged and no request must be sent.
	pub fn begin(
		&mut self,
		project_name: &str,
		text_content: &str,
		file_count: usize,
	) -> Result<ProjectSubmission, SubmitError> {
		if self.is_submitting() {
			return Err(SubmitError::InFlight);
		}
		let submission = validate(project_name, text_content, file_count)?;
		*self = Self::Submitting;
		Ok(submission)
	}

	pub fn succeed(&mut self) {
		if self.is_submitting() {
			*self = Self::Succeeded;
		}
	}

	pub fn fail(&mut self, message: impl Into<String>) {
		if self.is_submitting() {
			*self = Self::Failed(message.into());
		}
	}

	pub fn is_submitting(&self) -> bool {
		matches!(self, Self::Submitting)
	}

	pub fn error(&self) -> Option<&str> {
		match self {
			Self::Failed(message) => Some(message),
			_ => None,
		}
	}
}

/// Text for the preview card, cut at [`PREVIEW_CHARS`] characters.
pub fn preview_text(text: &str) -> String {
	match text.char_indices().nth(PREVIEW_CHARS) {
		Some((cut, _)) => format!("{}...", &text[..cut]),
		None => text.to_string(),
	}
}

/// File size the way the upload list shows it.
pub fn format_kb(bytes: f64) -> String {
	format!("{:.1} KB", bytes / 1024.0)
}
