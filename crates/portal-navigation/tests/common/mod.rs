//! Shared harness for navigator integration tests.

#![allow(dead_code)]

use portal_navigation::testing::{
	MemoryDocument, MemoryHistory, MemoryOverlaySurface, StaticAuthenticator,
};
use portal_navigation::{
	Content, NavigationSettings, Navigator, RenderAction, RenderActions, Route, render_fn,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Routes whose page carries a CRUD modal.
pub const ROUTES_WITH_MODAL: [Route; 4] = [
	Route::Organizations,
	Route::Patients,
	Route::Studies,
	Route::DataSources,
];

pub struct Harness {
	pub navigator: Navigator,
	pub history: Arc<MemoryHistory>,
	pub document: Arc<MemoryDocument>,
	pub surface: Arc<MemoryOverlaySurface>,
	pub auth: Arc<StaticAuthenticator>,
}

/// Markup of `route`'s page, with its modal container when it has one.
pub fn page(route: Route) -> Content {
	let mut markup = format!("<section data-route=\"{}\"><h1>{}</h1>", route, route.descriptor().label);
	if ROUTES_WITH_MODAL.contains(&route) {
		markup.push_str(&format!("<div class=\"modal\" id=\"{}\"></div>", route.modal_element_id()));
	}
	markup.push_str("</section>");
	Content::new(markup)
}

/// A render action that mounts `page(route)`.
pub fn static_page(route: Route) -> Arc<dyn RenderAction> {
	render_fn(move |_cx| async move { Ok(Some(page(route))) })
}

/// A render action that mounts `page(route)` and counts its calls.
pub fn counting_page(route: Route, calls: Arc<AtomicUsize>) -> Arc<dyn RenderAction> {
	render_fn(move |_cx| {
		calls.fetch_add(1, Ordering::SeqCst);
		async move { Ok(Some(page(route))) }
	})
}

pub fn static_actions() -> RenderActions {
	RenderActions::from_fn(static_page)
}

pub fn harness(url: &str, actions: RenderActions) -> Harness {
	harness_with(url, actions, StaticAuthenticator::signed_in("admin@example.org"))
}

pub fn harness_with(url: &str, actions: RenderActions, auth: StaticAuthenticator) -> Harness {
	let history = Arc::new(MemoryHistory::new(url));
	let document = Arc::new(MemoryDocument::new());
	let surface = Arc::new(MemoryOverlaySurface::default());
	let auth = Arc::new(auth);

	let navigator = Navigator::builder()
		.settings(NavigationSettings::default())
		.history(history.clone())
		.document(document.clone())
		.overlay_surface(surface.clone())
		.authenticator(auth.clone())
		.render_actions(actions)
		.build()
		.unwrap();

	Harness {
		navigator,
		history,
		document,
		surface,
		auth,
	}
}

impl Harness {
	/// `data-route` of the mounted page.
	pub fn mounted_route(&self) -> Option<String> {
		let markup = self.document.mounted_markup()?;
		let start = markup.find("data-route=\"")? + "data-route=\"".len();
		let end = markup[start..].find('"')? + start;
		Some(markup[start..end].to_string())
	}

	/// Whether the mounted page's modal is open.
	pub fn modal_open(&self, route: Route) -> bool {
		self.document
			.container(&route.modal_element_id())
			.is_some_and(|container| container.is_shown())
	}

	pub fn overlay_released(&self) -> bool {
		self.navigator.session().overlay().count() == 0 && !self.surface.overlay_visible()
	}
}

/// Yields until `condition` holds, giving spawned tasks a chance to run.
pub async fn settle(mut condition: impl FnMut() -> bool) {
	for _ in 0..100 {
		if condition() {
			return;
		}
		tokio::task::yield_now().await;
	}
}
