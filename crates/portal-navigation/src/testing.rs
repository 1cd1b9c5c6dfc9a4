//! In-memory implementations of every port.
//!
//! Used by this crate's tests and available to render-action authors who
//! want to exercise their actions against a real [`Navigator`](crate::Navigator)
//! without a browser.

use crate::auth::{Authenticator, Session};
use crate::document::{Chrome, Content, Document};
use crate::error::{AuthError, DocumentError, HistoryError};
use crate::history::{BrowserHistory, PopStateListener};
use crate::location::Location;
use crate::modal::{ModalContainer, ModalWidget, ShownListener};
use crate::overlay::OverlaySurface;
use crate::routes::Route;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Records what the overlay controller asked the page to do.
#[derive(Debug, Default)]
pub struct MemoryOverlaySurface {
	overlay_visible: AtomicBool,
	escape_hatch_visible: AtomicBool,
	focus_count: AtomicUsize,
	overlay_shows: AtomicUsize,
}

impl MemoryOverlaySurface {
	/// Whether the overlay is currently shown.
	pub fn overlay_visible(&self) -> bool {
		self.overlay_visible.load(Ordering::SeqCst)
	}

	/// Whether the escape hatch is currently shown.
	pub fn escape_hatch_visible(&self) -> bool {
		self.escape_hatch_visible.load(Ordering::SeqCst)
	}

	/// How many times the escape hatch was focused.
	pub fn focus_count(&self) -> usize {
		self.focus_count.load(Ordering::SeqCst)
	}

	/// How many times the overlay was asked to become visible.
	pub fn overlay_shows(&self) -> usize {
		self.overlay_shows.load(Ordering::SeqCst)
	}
}

impl OverlaySurface for MemoryOverlaySurface {
	fn set_overlay_visible(&self, visible: bool) {
		if visible {
			self.overlay_shows.fetch_add(1, Ordering::SeqCst);
		}
		self.overlay_visible.store(visible, Ordering::SeqCst);
	}

	fn set_escape_hatch_visible(&self, visible: bool) {
		self.escape_hatch_visible.store(visible, Ordering::SeqCst);
	}

	fn focus_escape_hatch(&self) {
		self.focus_count.fetch_add(1, Ordering::SeqCst);
	}
}

type SharedListener = Arc<dyn Fn() + Send + Sync>;

/// Browser history kept in memory.
pub struct MemoryHistory {
	location: Mutex<Location>,
	pushed: Mutex<Vec<String>>,
	redirects: Mutex<Vec<String>>,
	listeners: Mutex<Vec<SharedListener>>,
	reject_next_push: Mutex<Option<String>>,
}

impl MemoryHistory {
	/// Creates a history whose current location is `url`.
	pub fn new(url: &str) -> Self {
		Self {
			location: Mutex::new(Location::from_url(url)),
			pushed: Mutex::new(Vec::new()),
			redirects: Mutex::new(Vec::new()),
			listeners: Mutex::new(Vec::new()),
			reject_next_push: Mutex::new(None),
		}
	}

	/// URLs pushed so far, oldest first.
	pub fn pushed(&self) -> Vec<String> {
		self.pushed.lock().clone()
	}

	/// URLs the page was redirected to.
	pub fn redirects(&self) -> Vec<String> {
		self.redirects.lock().clone()
	}

	/// The current URL.
	pub fn current_url(&self) -> String {
		let location = self.location.lock();
		if location.search.is_empty() {
			location.pathname.clone()
		} else {
			let search = location.search.trim_start_matches('?');
			format!("{}?{}", location.pathname, search)
		}
	}

	/// Number of pop-state listeners.
	pub fn listener_count(&self) -> usize {
		self.listeners.lock().len()
	}

	/// Makes the next `push_state` fail with `reason`.
	pub fn reject_next_push(&self, reason: &str) {
		*self.reject_next_push.lock() = Some(reason.to_string());
	}

	/// Moves to `url` as back/forward would and notifies the listeners.
	pub fn simulate_pop_state(&self, url: &str) {
		*self.location.lock() = Location::from_url(url);
		let listeners: Vec<SharedListener> = self.listeners.lock().clone();
		for listener in listeners {
			listener();
		}
	}
}

impl BrowserHistory for MemoryHistory {
	fn location(&self) -> Location {
		self.location.lock().clone()
	}

	fn push_state(&self, url: &str) -> Result<(), HistoryError> {
		if let Some(reason) = self.reject_next_push.lock().take() {
			return Err(HistoryError::PushRejected {
				url: url.to_string(),
				reason,
			});
		}
		*self.location.lock() = Location::from_url(url);
		self.pushed.lock().push(url.to_string());
		Ok(())
	}

	fn redirect(&self, url: &str) {
		self.redirects.lock().push(url.to_string());
	}

	fn subscribe_pop_state(&self, listener: PopStateListener) {
		self.listeners.lock().push(Arc::from(listener));
	}
}

type SharedShownListener = Arc<dyn Fn(&dyn ModalContainer) + Send + Sync>;

#[derive(Default)]
struct ModalNode {
	markers: Mutex<HashSet<String>>,
	listeners: Mutex<Vec<SharedShownListener>>,
	widgets: Mutex<Vec<Arc<WidgetState>>>,
}

#[derive(Default)]
struct WidgetState {
	shown: AtomicBool,
	shows: AtomicUsize,
}

/// A handle on a modal container element.
///
/// Markers, listeners and widgets live on the element itself. Handles made
/// with [`rewrap`](Self::rewrap) are distinct objects over the same element,
/// the way a page adapter returns a new wrapper on every id lookup.
pub struct MemoryModalContainer {
	id: String,
	node: Arc<ModalNode>,
}

impl MemoryModalContainer {
	/// Creates a new element with id `id`.
	pub fn new(id: &str) -> Self {
		Self {
			id: id.to_string(),
			node: Arc::new(ModalNode::default()),
		}
	}

	/// A new handle on the same element.
	pub fn rewrap(&self) -> Self {
		Self {
			id: self.id.clone(),
			node: Arc::clone(&self.node),
		}
	}

	/// Number of widgets built on this element.
	pub fn widgets_created(&self) -> usize {
		self.node.widgets.lock().len()
	}

	/// Number of shown listeners attached.
	pub fn listener_count(&self) -> usize {
		self.node.listeners.lock().len()
	}

	/// Whether the most recent widget is open.
	pub fn is_shown(&self) -> bool {
		self.node
			.widgets
			.lock()
			.last()
			.is_some_and(|widget| widget.shown.load(Ordering::SeqCst))
	}

	/// Total number of times any widget on this element was opened.
	pub fn show_count(&self) -> usize {
		self.node
			.widgets
			.lock()
			.iter()
			.map(|widget| widget.shows.load(Ordering::SeqCst))
			.sum()
	}
}

impl ModalContainer for MemoryModalContainer {
	fn element_id(&self) -> String {
		self.id.clone()
	}

	fn has_marker(&self, marker: &str) -> bool {
		self.node.markers.lock().contains(marker)
	}

	fn set_marker(&self, marker: &str) {
		self.node.markers.lock().insert(marker.to_string());
	}

	fn on_shown(&self, listener: ShownListener) {
		self.node.listeners.lock().push(Arc::from(listener));
	}

	fn create_widget(&self) -> Arc<dyn ModalWidget> {
		let state = Arc::new(WidgetState::default());
		self.node.widgets.lock().push(Arc::clone(&state));
		Arc::new(MemoryModalWidget {
			state,
			element: self.rewrap(),
		})
	}
}

/// A dialog widget that fires its element's shown listeners when opened.
pub struct MemoryModalWidget {
	state: Arc<WidgetState>,
	element: MemoryModalContainer,
}

impl ModalWidget for MemoryModalWidget {
	fn show(&self) {
		self.state.shown.store(true, Ordering::SeqCst);
		self.state.shows.fetch_add(1, Ordering::SeqCst);
		let listeners: Vec<SharedShownListener> = self.element.node.listeners.lock().clone();
		let element: &dyn ModalContainer = &self.element;
		for listener in listeners {
			listener(element);
		}
	}

	fn hide(&self) {
		self.state.shown.store(false, Ordering::SeqCst);
	}

	fn is_shown(&self) -> bool {
		self.state.shown.load(Ordering::SeqCst)
	}
}

/// A mounted view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountRecord {
	/// Content markup.
	pub markup: String,
	/// Chrome mounted with it.
	pub chrome: Chrome,
}

/// A page kept in memory.
///
/// Each mount builds fresh modal containers for every `id="{route}-crudModal"`
/// found in the markup, so the containers of earlier mounts are gone. Every
/// [`Document::modal_container`] lookup returns a new handle on the element.
#[derive(Default)]
pub struct MemoryDocument {
	mounts: Mutex<Vec<MountRecord>>,
	containers: Mutex<HashMap<String, Arc<MemoryModalContainer>>>,
	errors: Mutex<Vec<(String, String)>>,
	validation_clears: AtomicUsize,
	fail_next_mount: Mutex<Option<String>>,
}

impl MemoryDocument {
	/// Creates an empty page.
	pub fn new() -> Self {
		Self::default()
	}

	/// Every mount so far, oldest first.
	pub fn mounts(&self) -> Vec<MountRecord> {
		self.mounts.lock().clone()
	}

	/// Number of mounts.
	pub fn mount_count(&self) -> usize {
		self.mounts.lock().len()
	}

	/// Markup of the mounted content.
	pub fn mounted_markup(&self) -> Option<String> {
		self.mounts.lock().last().map(|mount| mount.markup.clone())
	}

	/// Banners shown so far, as `(message, detail)`.
	pub fn errors(&self) -> Vec<(String, String)> {
		self.errors.lock().clone()
	}

	/// How many times validation messages were cleared.
	pub fn validation_clears(&self) -> usize {
		self.validation_clears.load(Ordering::SeqCst)
	}

	/// The container with `element_id` in the mounted content.
	pub fn container(&self, element_id: &str) -> Option<Arc<MemoryModalContainer>> {
		self.containers.lock().get(element_id).cloned()
	}

	/// Makes the next mount fail with `reason`.
	pub fn fail_next_mount(&self, reason: &str) {
		*self.fail_next_mount.lock() = Some(reason.to_string());
	}
}

impl Document for MemoryDocument {
	fn mount(&self, content: Content, chrome: &Chrome) -> Result<(), DocumentError> {
		if let Some(reason) = self.fail_next_mount.lock().take() {
			return Err(DocumentError::Mount(reason));
		}
		let markup = content.into_markup();

		let containers: HashMap<String, Arc<MemoryModalContainer>> = Route::ALL
			.iter()
			.map(|route| route.modal_element_id())
			.filter(|id| markup.contains(&format!("id=\"{}\"", id)))
			.map(|id| {
				let container = Arc::new(MemoryModalContainer::new(&id));
				(id, container)
			})
			.collect();
		*self.containers.lock() = containers;

		self.mounts.lock().push(MountRecord {
			markup,
			chrome: chrome.clone(),
		});
		Ok(())
	}

	fn modal_container(&self, element_id: &str) -> Option<Arc<dyn ModalContainer>> {
		self.container(element_id)
			.map(|container| Arc::new(container.rewrap()) as Arc<dyn ModalContainer>)
	}

	fn show_error(&self, message: &str, detail: &str) {
		self.errors
			.lock()
			.push((message.to_string(), detail.to_string()));
	}

	fn clear_validation_errors(&self) {
		self.validation_clears.fetch_add(1, Ordering::SeqCst);
	}
}

/// An authenticator with a fixed answer.
#[derive(Default)]
pub struct StaticAuthenticator {
	session: Mutex<Option<Session>>,
	granted_on_sign_in: Mutex<Option<Session>>,
	unavailable: Mutex<Option<String>>,
	sign_in_attempts: AtomicUsize,
	sessions_ended: AtomicUsize,
}

impl StaticAuthenticator {
	/// An authenticator with a signed-in `subject`.
	pub fn signed_in(subject: &str) -> Self {
		let auth = Self::default();
		*auth.session.lock() = Some(Session::new(subject));
		auth
	}

	/// An authenticator without a session whose sign-in never completes.
	pub fn signed_out() -> Self {
		Self::default()
	}

	/// Makes interactive sign-in succeed as `subject`.
	pub fn granting(self, subject: &str) -> Self {
		*self.granted_on_sign_in.lock() = Some(Session::new(subject));
		self
	}

	/// Makes every call fail with [`AuthError::Unavailable`].
	pub fn unavailable(self, reason: &str) -> Self {
		*self.unavailable.lock() = Some(reason.to_string());
		self
	}

	/// How many interactive sign-ins were started.
	pub fn sign_in_attempts(&self) -> usize {
		self.sign_in_attempts.load(Ordering::SeqCst)
	}

	/// How many times the session was ended.
	pub fn sessions_ended(&self) -> usize {
		self.sessions_ended.load(Ordering::SeqCst)
	}

	fn check_available(&self) -> Result<(), AuthError> {
		match self.unavailable.lock().as_ref() {
			Some(reason) => Err(AuthError::Unavailable(reason.clone())),
			None => Ok(()),
		}
	}
}

#[async_trait]
impl Authenticator for StaticAuthenticator {
	async fn session(&self) -> Result<Option<Session>, AuthError> {
		self.check_available()?;
		Ok(self.session.lock().clone())
	}

	async fn begin_sign_in(&self) -> Result<(), AuthError> {
		self.check_available()?;
		self.sign_in_attempts.fetch_add(1, Ordering::SeqCst);
		let granted = self.granted_on_sign_in.lock().clone();
		if granted.is_some() {
			*self.session.lock() = granted;
		}
		Ok(())
	}

	async fn end_session(&self) -> Result<(), AuthError> {
		self.check_available()?;
		self.sessions_ended.fetch_add(1, Ordering::SeqCst);
		self.session.lock().take();
		Ok(())
	}
}
