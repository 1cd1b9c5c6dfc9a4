//! Authentication port.
//!
//! Token refresh and the identity provider protocol live behind this trait.
//! The navigator only asks whether a session exists, starts an interactive
//! sign-in when it does not, and ends the session on sign-out.

use crate::error::AuthError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// An authenticated user session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
	/// Identity of the signed-in user.
	pub subject: String,
}

impl Session {
	/// Creates a session for `subject`.
	pub fn new(subject: impl Into<String>) -> Self {
		Self {
			subject: subject.into(),
		}
	}
}

/// The authentication collaborator.
#[async_trait]
pub trait Authenticator: Send + Sync {
	/// Returns the current session, if any.
	async fn session(&self) -> Result<Option<Session>, AuthError>;

	/// Starts an interactive sign-in. Usually navigates away from the page,
	/// in which case the returned future never matters.
	async fn begin_sign_in(&self) -> Result<(), AuthError>;

	/// Removes the stored session.
	async fn end_session(&self) -> Result<(), AuthError>;
}
