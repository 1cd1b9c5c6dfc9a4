//! Modal lifecycle manager.
//!
//! Each route may render a CRUD modal container (`#{route}-crudModal`).
//! After every mount the manager drops the previous [`ModalHandle`] and, if
//! the new content has a container, builds a fresh widget bound to it. A
//! handle never outlives the content it was built for.
//!
//! Render actions that need to fill the dialog after it opens (options that
//! depend on data fetched after templating) register a per-route shown hook
//! with [`ModalManager::register_shown_hook`].

use crate::routes::Route;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;

/// Marker set on a container once its shown listener is attached.
pub const SHOWN_HOOK_MARKER: &str = "shown-hook-bound";

/// Listener invoked by a container each time its dialog has opened.
///
/// The container passes itself, so a listener outlives any one handle on
/// the element.
pub type ShownListener = Box<dyn Fn(&dyn ModalContainer) + Send + Sync>;

/// Per-route initializer run after the route's dialog has opened.
pub type ShownHook = Arc<dyn Fn(&dyn ModalContainer) + Send + Sync>;

/// A modal container element in the mounted content.
pub trait ModalContainer: Send + Sync {
	/// The element id.
	fn element_id(&self) -> String;

	/// Whether the element carries `marker` (a `data-*` flag).
	fn has_marker(&self, marker: &str) -> bool;

	/// Sets `marker` on the element.
	fn set_marker(&self, marker: &str);

	/// Attaches a listener for the dialog's "shown" event.
	///
	/// Listeners belong to the element: every handle on the same element
	/// sees them.
	fn on_shown(&self, listener: ShownListener);

	/// Builds a new dialog widget bound to this element.
	fn create_widget(&self) -> Arc<dyn ModalWidget>;
}

/// A dialog widget instance.
pub trait ModalWidget: Send + Sync {
	/// Opens the dialog.
	fn show(&self);

	/// Closes the dialog.
	fn hide(&self);

	/// Whether the dialog is open.
	fn is_shown(&self) -> bool;
}

/// The live dialog of the mounted route.
pub struct ModalHandle {
	route: Route,
	container: Arc<dyn ModalContainer>,
	widget: Arc<dyn ModalWidget>,
}

impl ModalHandle {
	/// Route whose content holds the container.
	pub fn route(&self) -> Route {
		self.route
	}

	/// The bound container.
	pub fn container(&self) -> &Arc<dyn ModalContainer> {
		&self.container
	}
}

impl std::fmt::Debug for ModalHandle {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ModalHandle")
			.field("route", &self.route)
			.field("element_id", &self.container.element_id())
			.field("shown", &self.widget.is_shown())
			.finish()
	}
}

/// Owns at most one [`ModalHandle`] and the shown-hook table.
#[derive(Default)]
pub struct ModalManager {
	current: Mutex<Option<ModalHandle>>,
	hooks: Arc<RwLock<HashMap<Route, ShownHook>>>,
}

impl std::fmt::Debug for ModalManager {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ModalManager")
			.field("current", &*self.current.lock())
			.field("hooks", &self.hooks.read().keys().collect::<Vec<_>>())
			.finish()
	}
}

impl ModalManager {
	/// Creates a manager with nothing bound.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers the shown hook for `route`, replacing an earlier one.
	///
	/// Hooks are looked up when the dialog opens, so registering after the
	/// container was bound still takes effect.
	pub fn register_shown_hook<F>(&self, route: Route, hook: F)
	where
		F: Fn(&dyn ModalContainer) + Send + Sync + 'static,
	{
		self.hooks.write().insert(route, Arc::new(hook));
	}

	/// Whether `route` has a shown hook.
	pub fn has_shown_hook(&self, route: Route) -> bool {
		self.hooks.read().contains_key(&route)
	}

	/// Replaces the live handle after a mount.
	///
	/// The previous handle is dropped in every case. With a container, its
	/// shown listener is attached (once per element) and a new widget built.
	pub fn rebind(&self, route: Route, container: Option<Arc<dyn ModalContainer>>) {
		let next = container.map(|container| {
			self.bind_shown_listener(route, &container);
			let widget = container.create_widget();
			ModalHandle {
				route,
				container,
				widget,
			}
		});

		tracing::debug!(%route, bound = next.is_some(), "modal rebound");
		let previous = std::mem::replace(&mut *self.current.lock(), next);
		drop(previous);
	}

	/// Opens the live dialog. Returns `false` when none is bound.
	pub fn open(&self) -> bool {
		match self.widget() {
			Some(widget) => {
				widget.show();
				true
			}
			None => false,
		}
	}

	/// Closes the live dialog if it is open.
	pub fn close(&self) {
		if let Some(widget) = self.widget()
			&& widget.is_shown()
		{
			widget.hide();
		}
	}

	/// Whether the live dialog is open.
	pub fn is_open(&self) -> bool {
		self.widget().is_some_and(|widget| widget.is_shown())
	}

	/// Route of the live handle, if any.
	pub fn bound_route(&self) -> Option<Route> {
		self.current.lock().as_ref().map(ModalHandle::route)
	}

	/// Element id of the live handle's container, if any.
	pub fn bound_element_id(&self) -> Option<String> {
		self.current
			.lock()
			.as_ref()
			.map(|handle| handle.container.element_id())
	}

	// Widget calls happen outside the lock: a shown hook may call back in.
	fn widget(&self) -> Option<Arc<dyn ModalWidget>> {
		self.current
			.lock()
			.as_ref()
			.map(|handle| Arc::clone(&handle.widget))
	}

	fn bind_shown_listener(&self, route: Route, container: &Arc<dyn ModalContainer>) {
		if container.has_marker(SHOWN_HOOK_MARKER) {
			return;
		}
		container.set_marker(SHOWN_HOOK_MARKER);

		let hooks = Arc::clone(&self.hooks);
		container.on_shown(Box::new(move |element: &dyn ModalContainer| {
			let hook = hooks.read().get(&route).cloned();
			if let Some(hook) = hook {
				hook(element);
			}
		}));
	}
}
