//! Error types for the navigation engine.
//!
//! Every collaborator port has its own error type; [`NavigationError`] is the
//! umbrella a failed navigation resolves to. None of these are returned to the
//! caller of [`Navigator::nav`](crate::Navigator::nav): they are surfaced on
//! the error banner and carried in [`NavOutcome::Failed`](crate::NavOutcome).

use crate::intent::CrudMode;
use crate::routes::Route;
use indexmap::IndexMap;
use thiserror::Error;

/// Field-scoped validation messages returned by the API (HTTP 400).
///
/// Keys are field names, values the messages for that field. Messages that
/// are not tied to a field use the `non_field_errors` key.
pub type ValidationErrors = IndexMap<String, Vec<String>>;

/// Error type for render-action collaborators.
#[derive(Debug, Error)]
pub enum RenderError {
	/// The API rejected submitted data.
	///
	/// The network collaborator has already rendered these into the modal's
	/// validation slots, so the orchestrator does not show the banner.
	#[error("Validation failed: {}", format_validation(.0))]
	Validation(ValidationErrors),

	/// The API answered with a non-success status.
	#[error("API request failed with status {status}: {message}")]
	Api {
		/// HTTP status code.
		status: u16,
		/// Status text or server message.
		message: String,
	},

	/// Any other collaborator failure.
	#[error(transparent)]
	Failed(#[from] anyhow::Error),
}

impl RenderError {
	/// Returns whether this is a validation failure.
	pub fn is_validation(&self) -> bool {
		matches!(self, Self::Validation(_))
	}
}

fn format_validation(errors: &ValidationErrors) -> String {
	errors
		.iter()
		.map(|(field, messages)| format!("{} - {}", field, messages.join(", ")))
		.collect::<Vec<_>>()
		.join("; ")
}

/// Error type for the authentication collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
	/// The identity provider could not be reached.
	#[error("Identity provider unavailable: {0}")]
	Unavailable(String),

	/// The stored session could not be read or removed.
	#[error("Session storage error: {0}")]
	Storage(String),
}

/// Error type for DOM operations performed by the [`Document`](crate::Document) port.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
	/// A required element is missing from the page.
	#[error("Element not found: #{0}")]
	ElementNotFound(String),

	/// Mounting the rendered content failed.
	#[error("Failed to mount content: {0}")]
	Mount(String),
}

/// Error type for the browser History API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
	/// `pushState` was rejected by the browser.
	#[error("pushState rejected for '{url}': {reason}")]
	PushRejected {
		/// URL that was being pushed.
		url: String,
		/// Browser-provided reason.
		reason: String,
	},
}

/// Error a single navigation attempt can end with.
#[derive(Debug, Error)]
pub enum NavigationError {
	/// More than one of `create`/`read`/`update`/`delete` was requested.
	#[error("Ambiguous CRUD intent: {0:?} requested together")]
	AmbiguousCrudIntent(Vec<CrudMode>),

	/// The authentication collaborator failed.
	#[error("Authentication failed: {0}")]
	Auth(#[from] AuthError),

	/// The route's render action failed.
	#[error("Rendering '{route}' failed: {source}")]
	Render {
		/// Route being rendered.
		route: Route,
		/// Collaborator error.
		#[source]
		source: RenderError,
	},

	/// The rendered content could not be mounted.
	#[error(transparent)]
	Mount(#[from] DocumentError),

	/// The history entry could not be recorded.
	#[error(transparent)]
	History(#[from] HistoryError),
}

impl NavigationError {
	/// Returns whether this failure is a validation failure that must not be
	/// shown on the generic error banner.
	pub fn is_validation(&self) -> bool {
		matches!(self, Self::Render { source, .. } if source.is_validation())
	}
}

/// Error type for loading [`NavigationSettings`](crate::NavigationSettings).
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum SettingsError {
	/// The settings file could not be read.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	/// The settings file is not valid TOML for this schema.
	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),

	/// A setting has an unusable value.
	#[error("Invalid value for '{key}': {message}")]
	InvalidValue {
		/// Setting name.
		key: String,
		/// What is wrong with it.
		message: String,
	},
}

/// Error type for [`NavigatorBuilder::build`](crate::NavigatorBuilder::build).
#[derive(Debug, Error)]
pub enum BuildError {
	/// A required collaborator was not supplied.
	#[error("Navigator is missing its {0}")]
	MissingComponent(&'static str),

	/// The supplied settings are invalid.
	#[error(transparent)]
	Settings(#[from] SettingsError),
}
