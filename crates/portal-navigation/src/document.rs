//! The page the engine renders into.

use crate::error::DocumentError;
use crate::modal::ModalContainer;
use crate::routes::NavItem;
use std::sync::Arc;

/// Rendered markup for a route's main area.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Content {
	markup: String,
}

impl Content {
	/// Wraps rendered markup.
	pub fn new(markup: impl Into<String>) -> Self {
		Self {
			markup: markup.into(),
		}
	}

	/// The markup.
	pub fn markup(&self) -> &str {
		&self.markup
	}

	/// Consumes the content, returning the markup.
	pub fn into_markup(self) -> String {
		self.markup
	}
}

impl From<String> for Content {
	fn from(markup: String) -> Self {
		Self::new(markup)
	}
}

impl From<&str> for Content {
	fn from(markup: &str) -> Self {
		Self::new(markup)
	}
}

/// Navigation chrome mounted alongside the content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chrome {
	/// Nav bar entries, with the rendered route marked active.
	pub nav_items: Vec<NavItem>,
}

/// DOM operations performed by the navigator.
pub trait Document: Send + Sync {
	/// Replaces the mounted content and nav chrome in one step. Nothing of
	/// the previous content survives.
	fn mount(&self, content: Content, chrome: &Chrome) -> Result<(), DocumentError>;

	/// Finds a modal container in the mounted content.
	fn modal_container(&self, element_id: &str) -> Option<Arc<dyn ModalContainer>>;

	/// Shows the error banner.
	fn show_error(&self, message: &str, detail: &str);

	/// Clears validation messages rendered into the modal's field slots.
	fn clear_validation_errors(&self);
}
