//! Navigation orchestrator.
//!
//! [`Navigator::nav`] is the single entry point every view change goes
//! through: link clicks, back/forward, reloads, post-submit refreshes and
//! redirects issued by render actions themselves.
//!
//! ## Lifecycle of one navigation
//!
//! 1. The loading overlay is acquired for the whole call.
//! 2. A generation is taken and the current location captured.
//! 3. A session is ensured; without one the user is sent to sign in.
//! 4. The route's render action runs.
//! 5. If a newer navigation started meanwhile the result is dropped.
//! 6. The content is mounted with fresh nav chrome.
//! 7. The route's CRUD modal is rebound and opened if the URL asks for it.
//! 8. A history entry is pushed if the location changed.
//!
//! Failures never escape `nav`: they are shown on the error banner (except
//! validation failures, already shown next to their fields) and reported in
//! the returned [`NavOutcome`].

use crate::auth::Authenticator;
use crate::document::{Chrome, Document};
use crate::error::{BuildError, NavigationError};
use crate::history::{BrowserHistory, HistorySynchronizer};
use crate::intent::{CrudIntent, without_crud_flags};
use crate::location::{LocationCodec, NavigationState, QueryParams};
use crate::modal::ModalManager;
use crate::overlay::{LoadingOverlay, OverlaySurface};
use crate::render::{RenderActions, RenderContext};
use crate::routes::{Route, nav_items};
use crate::session::NavigationSession;
use crate::settings::NavigationSettings;
use std::sync::{Arc, Weak};

/// How a navigation ended.
#[derive(Debug)]
pub enum NavOutcome {
	/// New content was mounted.
	Mounted {
		/// Whether a history entry was pushed.
		history_pushed: bool,
	},
	/// The render action returned no content. Nothing was mounted.
	NothingToMount,
	/// A navigation started later took over; this one's result was dropped.
	Superseded,
	/// No session; the user was sent to sign in.
	Redirected,
	/// The navigation failed. The banner was shown unless this is a
	/// validation failure.
	Failed(NavigationError),
}

impl NavOutcome {
	/// Whether new content was mounted.
	pub fn is_mounted(&self) -> bool {
		matches!(self, Self::Mounted { .. })
	}

	/// Whether a history entry was pushed.
	pub fn history_pushed(&self) -> bool {
		matches!(
			self,
			Self::Mounted {
				history_pushed: true
			}
		)
	}

	/// The failure, if the navigation failed.
	pub fn error(&self) -> Option<&NavigationError> {
		match self {
			Self::Failed(error) => Some(error),
			_ => None,
		}
	}
}

struct NavigatorInner {
	settings: NavigationSettings,
	session: Arc<NavigationSession>,
	history: HistorySynchronizer,
	document: Arc<dyn Document>,
	authenticator: Arc<dyn Authenticator>,
	actions: RenderActions,
}

/// Drives navigation for one portal client.
///
/// Cloning yields another handle to the same navigator.
#[derive(Clone)]
pub struct Navigator {
	inner: Arc<NavigatorInner>,
}

impl std::fmt::Debug for Navigator {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Navigator")
			.field("settings", &self.inner.settings)
			.field("generation", &self.inner.session.current_generation())
			.finish_non_exhaustive()
	}
}

impl Navigator {
	/// Starts building a navigator.
	pub fn builder() -> NavigatorBuilder {
		NavigatorBuilder::new()
	}

	/// The settings in use.
	pub fn settings(&self) -> &NavigationSettings {
		&self.inner.settings
	}

	/// Shared session state.
	pub fn session(&self) -> &Arc<NavigationSession> {
		&self.inner.session
	}

	/// The modal manager.
	pub fn modal(&self) -> &ModalManager {
		self.inner.session.modal()
	}

	/// The location codec.
	pub fn codec(&self) -> &LocationCodec {
		self.inner.history.codec()
	}

	/// Resolves the current browser location.
	pub fn current(&self) -> NavigationState {
		self.inner.history.current()
	}

	/// Navigates to `route`.
	///
	/// With `params` the target parameters are exactly `params`. Without,
	/// `append` is merged over the current location's parameters, or the
	/// target has no parameters when `append` is also absent.
	pub async fn nav(
		&self,
		route: Route,
		params: Option<QueryParams>,
		append: Option<QueryParams>,
	) -> NavOutcome {
		let _overlay = self.inner.session.overlay().acquire();
		let generation = self.inner.session.begin_generation();
		tracing::debug!(%route, generation, "navigation started");

		match self.run(route, params, append, generation).await {
			Ok(outcome) => {
				tracing::debug!(%route, generation, ?outcome, "navigation finished");
				outcome
			}
			Err(error) => {
				self.surface_failure(route, &error);
				NavOutcome::Failed(error)
			}
		}
	}

	/// Navigates to `route` with exactly `params`.
	pub async fn navigate(&self, route: Route, params: QueryParams) -> NavOutcome {
		self.nav(route, Some(params), None).await
	}

	/// Navigates to `route` keeping the current parameters, overridden and
	/// extended by `extra`.
	pub async fn navigate_appending(&self, route: Route, extra: QueryParams) -> NavOutcome {
		self.nav(route, None, Some(extra)).await
	}

	/// Navigates to the route named `key`. Unknown keys go to the default
	/// route.
	pub async fn navigate_key(&self, key: &str, params: QueryParams) -> NavOutcome {
		let route = self.codec().route_or_default(key);
		self.nav(route, Some(params), None).await
	}

	/// Renders the view the browser is currently on.
	pub async fn start(&self) -> NavOutcome {
		let state = self.current();
		tracing::info!(route = %state.route, "starting portal navigation");
		self.nav(state.route, Some(state.params), None).await
	}

	/// Re-renders the current view, discarding modal validation messages and
	/// closing an open modal first.
	pub async fn reload(&self) -> NavOutcome {
		self.inner.document.clear_validation_errors();
		self.modal().close();
		let state = self.current();
		self.nav(state.route, Some(state.params), None).await
	}

	/// Re-renders the current view and re-opens its modal on the new content.
	pub async fn reload_modal(&self) -> NavOutcome {
		self.modal().close();
		let state = self.current();
		let outcome = self.nav(state.route, Some(state.params), None).await;
		if outcome.is_mounted() && !self.modal().open() {
			tracing::warn!(route = %state.route, "no modal to re-open after reload");
		}
		outcome
	}

	/// Leaves the CRUD dialog: drops the CRUD flags from the URL, closes the
	/// modal and re-renders the same route.
	pub async fn return_from_crud(&self) -> NavOutcome {
		let state = self.current();
		let params = without_crud_flags(state.params);
		self.modal().close();
		self.nav(state.route, Some(params), None).await
	}

	/// Signs out and leaves the application.
	///
	/// Back/forward notifications received afterwards are ignored.
	pub async fn sign_out(&self) {
		self.inner.session.mark_signing_out();
		if let Err(error) = self.inner.authenticator.end_session().await {
			tracing::warn!(%error, "failed to end session, redirecting anyway");
		}
		self.inner.history.redirect(&self.inner.settings.logout_url);
	}

	/// Handles a back/forward notification. Returns `None` while signing out.
	pub async fn on_pop_state(&self) -> Option<NavOutcome> {
		if self.inner.session.is_signing_out() {
			tracing::debug!("pop state during sign-out ignored");
			return None;
		}
		Some(self.reload().await)
	}

	/// Subscribes to back/forward notifications.
	///
	/// Each notification spawns [`on_pop_state`](Self::on_pop_state) on the
	/// current tokio runtime. The subscription does not keep the navigator
	/// alive. Only the first call subscribes; later calls, from any clone of
	/// this navigator, are no-ops.
	pub fn listen(&self) {
		if self.inner.session.mark_listening() {
			tracing::debug!("already listening for pop state");
			return;
		}
		let weak: Weak<NavigatorInner> = Arc::downgrade(&self.inner);
		self.inner
			.history
			.history()
			.subscribe_pop_state(Box::new(move || {
				let Some(inner) = weak.upgrade() else {
					return;
				};
				let Ok(runtime) = tokio::runtime::Handle::try_current() else {
					tracing::warn!("pop state outside an async runtime ignored");
					return;
				};
				let navigator = Navigator { inner };
				runtime.spawn(async move {
					navigator.on_pop_state().await;
				});
			}));
	}

	async fn run(
		&self,
		route: Route,
		params: Option<QueryParams>,
		append: Option<QueryParams>,
		generation: u64,
	) -> Result<NavOutcome, NavigationError> {
		let before = self.current();
		let params = match (params, append) {
			(Some(params), _) => params,
			(None, Some(extra)) => before.params.clone().merged(&extra),
			(None, None) => QueryParams::new(),
		};
		let intent = CrudIntent::from_params(&params)?;

		if !self.ensure_session().await? {
			return Ok(NavOutcome::Redirected);
		}

		let action = self.inner.actions.for_route(route);
		let cx = RenderContext::new(self.clone(), route, params.clone());
		let rendered = action.render(cx).await;

		if !self.inner.session.is_current(generation) {
			if let Err(error) = &rendered {
				tracing::debug!(%route, generation, %error, "superseded navigation failed");
			}
			return Ok(NavOutcome::Superseded);
		}
		let rendered = rendered.map_err(|source| NavigationError::Render { route, source })?;
		let Some(content) = rendered else {
			tracing::debug!(%route, "render action returned no content");
			return Ok(NavOutcome::NothingToMount);
		};

		let chrome = Chrome {
			nav_items: nav_items(route, &self.inner.settings.route_prefix),
		};
		self.inner.document.mount(content, &chrome)?;

		let container = self.inner.document.modal_container(&route.modal_element_id());
		self.modal().rebind(route, container);
		if let Some(intent) = intent {
			if self.modal().open() {
				tracing::debug!(%route, mode = ?intent.mode, id = ?intent.id, "crud modal opened");
			} else {
				tracing::warn!(%route, mode = ?intent.mode, "crud intent but route has no modal");
			}
		}

		let after = NavigationState::new(route, params);
		let history_pushed = self.inner.history.record(&before, &after)?;
		Ok(NavOutcome::Mounted { history_pushed })
	}

	async fn ensure_session(&self) -> Result<bool, NavigationError> {
		let auth = &self.inner.authenticator;
		if auth.session().await?.is_some() {
			return Ok(true);
		}
		tracing::info!("no session, starting sign-in");
		auth.begin_sign_in().await?;
		Ok(auth.session().await?.is_some())
	}

	fn surface_failure(&self, route: Route, error: &NavigationError) {
		if error.is_validation() {
			tracing::warn!(%route, %error, "navigation rejected by validation");
			return;
		}
		tracing::error!(%route, %error, "navigation failed");
		self.inner
			.document
			.show_error(&self.inner.settings.error_message, &error.to_string());
	}
}

/// Builder for [`Navigator`].
#[derive(Default)]
pub struct NavigatorBuilder {
	settings: Option<NavigationSettings>,
	history: Option<Arc<dyn BrowserHistory>>,
	document: Option<Arc<dyn Document>>,
	overlay_surface: Option<Arc<dyn OverlaySurface>>,
	authenticator: Option<Arc<dyn Authenticator>>,
	actions: Option<RenderActions>,
}

impl NavigatorBuilder {
	/// Creates an empty builder. Settings default to
	/// [`NavigationSettings::default`].
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the settings.
	pub fn settings(mut self, settings: NavigationSettings) -> Self {
		self.settings = Some(settings);
		self
	}

	/// Sets the browser history.
	pub fn history(mut self, history: Arc<dyn BrowserHistory>) -> Self {
		self.history = Some(history);
		self
	}

	/// Sets the document.
	pub fn document(mut self, document: Arc<dyn Document>) -> Self {
		self.document = Some(document);
		self
	}

	/// Sets the overlay surface.
	pub fn overlay_surface(mut self, surface: Arc<dyn OverlaySurface>) -> Self {
		self.overlay_surface = Some(surface);
		self
	}

	/// Sets the authenticator.
	pub fn authenticator(mut self, authenticator: Arc<dyn Authenticator>) -> Self {
		self.authenticator = Some(authenticator);
		self
	}

	/// Sets the render actions.
	pub fn render_actions(mut self, actions: RenderActions) -> Self {
		self.actions = Some(actions);
		self
	}

	/// Builds the navigator.
	pub fn build(self) -> Result<Navigator, BuildError> {
		let settings = self.settings.unwrap_or_default();
		settings.validate()?;

		let history = self.history.ok_or(BuildError::MissingComponent("history"))?;
		let document = self
			.document
			.ok_or(BuildError::MissingComponent("document"))?;
		let surface = self
			.overlay_surface
			.ok_or(BuildError::MissingComponent("overlay surface"))?;
		let authenticator = self
			.authenticator
			.ok_or(BuildError::MissingComponent("authenticator"))?;
		let actions = self
			.actions
			.ok_or(BuildError::MissingComponent("render actions"))?;

		let overlay = LoadingOverlay::new(
			surface,
			settings.escape_hatch_delay(),
			settings.escape_hatch_focus_delay(),
		);
		let codec = LocationCodec::new(settings.route_prefix.clone(), settings.default_route);

		Ok(Navigator {
			inner: Arc::new(NavigatorInner {
				session: Arc::new(NavigationSession::new(overlay)),
				history: HistorySynchronizer::new(history, codec),
				document,
				authenticator,
				actions,
				settings,
			}),
		})
	}
}
