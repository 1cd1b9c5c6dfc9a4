//! Render-action port.
//!
//! A render action fetches whatever its route needs and returns the markup
//! to mount. Returning `Ok(None)` means there is nothing to mount, typically
//! because the action redirected by navigating somewhere else through
//! [`RenderContext::navigator`].

use crate::document::Content;
use crate::error::RenderError;
use crate::location::QueryParams;
use crate::navigator::Navigator;
use crate::routes::Route;
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;

/// Result of a render action.
pub type RenderResult = Result<Option<Content>, RenderError>;

/// What a render action is asked to render.
#[derive(Debug, Clone)]
pub struct RenderContext {
	/// Navigator running this render, for redirects.
	pub navigator: Navigator,
	/// Route being rendered.
	pub route: Route,
	/// Its parameters.
	pub params: QueryParams,
}

impl RenderContext {
	/// Creates a render context.
	pub fn new(navigator: Navigator, route: Route, params: QueryParams) -> Self {
		Self {
			navigator,
			route,
			params,
		}
	}
}

/// Produces the content of one route.
#[async_trait]
pub trait RenderAction: Send + Sync {
	/// Renders `cx.route`.
	async fn render(&self, cx: RenderContext) -> RenderResult;
}

/// A [`RenderAction`] backed by an async closure. See [`render_fn`].
pub struct FnRenderAction<F> {
	f: F,
}

#[async_trait]
impl<F, Fut> RenderAction for FnRenderAction<F>
where
	F: Fn(RenderContext) -> Fut + Send + Sync,
	Fut: Future<Output = RenderResult> + Send + 'static,
{
	async fn render(&self, cx: RenderContext) -> RenderResult {
		(self.f)(cx).await
	}
}

/// Wraps an async closure as a shared [`RenderAction`].
///
/// ```ignore
/// let action = render_fn(|cx| async move {
///     Ok(Some(Content::new(format!("<h1>{}</h1>", cx.route))))
/// });
/// ```
pub fn render_fn<F, Fut>(f: F) -> Arc<dyn RenderAction>
where
	F: Fn(RenderContext) -> Fut + Send + Sync + 'static,
	Fut: Future<Output = RenderResult> + Send + 'static,
{
	Arc::new(FnRenderAction { f })
}

/// One render action per route.
///
/// Field names follow [`Route`]; [`RenderActions::for_route`] is an
/// exhaustive match, so adding a route without an action does not compile.
#[derive(Clone)]
pub struct RenderActions {
	/// Renders [`Route::Organizations`].
	pub organizations: Arc<dyn RenderAction>,
	/// Renders [`Route::Patients`].
	pub patients: Arc<dyn RenderAction>,
	/// Renders [`Route::Studies`].
	pub studies: Arc<dyn RenderAction>,
	/// Renders [`Route::Observations`].
	pub observations: Arc<dyn RenderAction>,
	/// Renders [`Route::DataSources`].
	pub data_sources: Arc<dyn RenderAction>,
	/// Renders [`Route::Debug`].
	pub debug: Arc<dyn RenderAction>,
}

impl RenderActions {
	/// Builds the table by asking `f` for each route's action.
	pub fn from_fn(mut f: impl FnMut(Route) -> Arc<dyn RenderAction>) -> Self {
		Self {
			organizations: f(Route::Organizations),
			patients: f(Route::Patients),
			studies: f(Route::Studies),
			observations: f(Route::Observations),
			data_sources: f(Route::DataSources),
			debug: f(Route::Debug),
		}
	}

	/// The action for `route`.
	pub fn for_route(&self, route: Route) -> &Arc<dyn RenderAction> {
		match route {
			Route::Organizations => &self.organizations,
			Route::Patients => &self.patients,
			Route::Studies => &self.studies,
			Route::Observations => &self.observations,
			Route::DataSources => &self.data_sources,
			Route::Debug => &self.debug,
		}
	}

	/// Replaces the action for `route`.
	pub fn with(mut self, route: Route, action: Arc<dyn RenderAction>) -> Self {
		let slot = match route {
			Route::Organizations => &mut self.organizations,
			Route::Patients => &mut self.patients,
			Route::Studies => &mut self.studies,
			Route::Observations => &mut self.observations,
			Route::DataSources => &mut self.data_sources,
			Route::Debug => &mut self.debug,
		};
		*slot = action;
		self
	}
}

impl std::fmt::Debug for RenderActions {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_list()
			.entries(Route::ALL.iter().map(|route| route.descriptor().action))
			.finish()
	}
}
