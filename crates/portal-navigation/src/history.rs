//! History synchronizer.
//!
//! A navigation records a history entry only when it actually moved the
//! application: the resolved `(route, params)` after the transition is
//! compared against the location captured when it began. Re-rendering the
//! current view (reloads, back/forward replays) therefore never grows the
//! stack.

use crate::error::HistoryError;
use crate::location::{Location, LocationCodec, NavigationState, QueryParams};
use crate::routes::Route;
use std::sync::Arc;

/// Listener for the browser's back/forward notification.
pub type PopStateListener = Box<dyn Fn() + Send + Sync>;

/// The browser History API and page location.
pub trait BrowserHistory: Send + Sync {
	/// The current `pathname` and `search`.
	fn location(&self) -> Location;

	/// Appends a history entry for `url` and makes it current.
	fn push_state(&self, url: &str) -> Result<(), HistoryError>;

	/// Leaves the application for `url` (full page load).
	fn redirect(&self, url: &str);

	/// Registers `listener` for back/forward notifications.
	fn subscribe_pop_state(&self, listener: PopStateListener);
}

/// Compares navigation states and pushes history entries.
#[derive(Clone)]
pub struct HistorySynchronizer {
	history: Arc<dyn BrowserHistory>,
	codec: LocationCodec,
}

impl std::fmt::Debug for HistorySynchronizer {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("HistorySynchronizer")
			.field("codec", &self.codec)
			.finish_non_exhaustive()
	}
}

impl HistorySynchronizer {
	/// Creates a synchronizer over `history`.
	pub fn new(history: Arc<dyn BrowserHistory>, codec: LocationCodec) -> Self {
		Self { history, codec }
	}

	/// The codec used to resolve and encode locations.
	pub fn codec(&self) -> &LocationCodec {
		&self.codec
	}

	/// The underlying browser history.
	pub fn history(&self) -> &Arc<dyn BrowserHistory> {
		&self.history
	}

	/// Resolves the current browser location.
	pub fn current(&self) -> NavigationState {
		self.codec.resolve_location(&self.history.location())
	}

	/// Encodes `route` and `params` into a URL.
	pub fn encode(&self, route: Route, params: &QueryParams) -> String {
		self.codec.encode(route, params)
	}

	/// Pushes `after` iff it differs from `before`. Returns whether an entry
	/// was pushed.
	pub fn record(
		&self,
		before: &NavigationState,
		after: &NavigationState,
	) -> Result<bool, HistoryError> {
		if before == after {
			tracing::trace!(route = %after.route, "location unchanged, history not pushed");
			return Ok(false);
		}
		let url = self.encode(after.route, &after.params);
		self.history.push_state(&url)?;
		tracing::debug!(%url, "history entry pushed");
		Ok(true)
	}

	/// Sends the page to `url`.
	pub fn redirect(&self, url: &str) {
		tracing::info!(%url, "redirecting");
		self.history.redirect(url);
	}
}
