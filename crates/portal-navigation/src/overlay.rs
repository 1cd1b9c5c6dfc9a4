//! Loading overlay controller.
//!
//! The overlay is reference counted: every [`LoadingOverlay::show`] must be
//! paired with one [`LoadingOverlay::hide`], and the overlay stays visible
//! while at least one caller still holds it. Nested or concurrent holders
//! (a navigation and a resource fetch it triggers) therefore never hide the
//! overlay from under each other.
//!
//! When the count goes from zero to one a new *cycle* starts and an
//! escape-hatch timer is scheduled. If the overlay is still up when it
//! fires, the escape-hatch control is revealed and focused. The timer is
//! cancelled as soon as the count returns to zero.
//!
//! [`OverlaySurface`] calls are made after the state lock is released, so a
//! surface may read the overlay from inside its own callbacks.
//!
//! ## Example
//!
//! ```ignore
//! let guard = overlay.acquire();
//! fetch_something().await;
//! drop(guard); // overlay hidden if this was the last holder
//! ```

use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::task::AbortHandle;

/// DOM elements driven by the overlay controller.
pub trait OverlaySurface: Send + Sync {
	/// Shows or hides the full-page loading overlay.
	fn set_overlay_visible(&self, visible: bool);

	/// Shows or hides the escape-hatch ("cancel") control.
	fn set_escape_hatch_visible(&self, visible: bool);

	/// Moves keyboard focus to the escape-hatch control.
	fn focus_escape_hatch(&self);
}

// A scheduled escape-hatch reveal for one cycle.
#[derive(Debug)]
struct EscapeHatchTimer {
	handle: AbortHandle,
}

impl EscapeHatchTimer {
	// No effect once it has fired.
	fn cancel(self) {
		self.handle.abort();
	}
}

#[derive(Debug, Default)]
struct OverlayState {
	count: usize,
	cycle: u64,
	pending: Option<EscapeHatchTimer>,
	escape_hatch_visible: bool,
}

struct OverlayInner {
	surface: Arc<dyn OverlaySurface>,
	state: Mutex<OverlayState>,
	escape_hatch_delay: Duration,
	focus_delay: Duration,
}

/// Reentrant loading overlay with a delayed escape hatch.
///
/// Cloning yields another handle to the same overlay.
#[derive(Clone)]
pub struct LoadingOverlay {
	inner: Arc<OverlayInner>,
}

impl std::fmt::Debug for LoadingOverlay {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let state = self.inner.state.lock();
		f.debug_struct("LoadingOverlay")
			.field("count", &state.count)
			.field("cycle", &state.cycle)
			.field("escape_hatch_visible", &state.escape_hatch_visible)
			.finish()
	}
}

impl LoadingOverlay {
	/// Creates a hidden overlay.
	pub fn new(
		surface: Arc<dyn OverlaySurface>,
		escape_hatch_delay: Duration,
		focus_delay: Duration,
	) -> Self {
		Self {
			inner: Arc::new(OverlayInner {
				surface,
				state: Mutex::new(OverlayState::default()),
				escape_hatch_delay,
				focus_delay,
			}),
		}
	}

	/// Adds a holder and shows the overlay.
	///
	/// The first holder starts a new cycle and schedules the escape hatch.
	/// Outside a tokio runtime the escape hatch is not scheduled.
	pub fn show(&self) {
		{
			let mut state = self.inner.state.lock();
			state.count += 1;
			if state.count == 1 {
				state.cycle += 1;
				if let Some(stale) = state.pending.take() {
					stale.cancel();
				}
				state.pending = self.schedule_escape_hatch(state.cycle);
			}
			tracing::trace!(count = state.count, cycle = state.cycle, "overlay shown");
		}
		self.inner.surface.set_overlay_visible(true);
	}

	/// Removes a holder. The count never goes below zero; when it is zero the
	/// overlay and escape hatch are hidden and the pending timer cancelled.
	pub fn hide(&self) {
		let released = {
			let mut state = self.inner.state.lock();
			if state.count == 0 {
				tracing::debug!("overlay hide without matching show");
			}
			state.count = state.count.saturating_sub(1);

			if state.count == 0 {
				if let Some(timer) = state.pending.take() {
					timer.cancel();
				}
				state.escape_hatch_visible = false;
			}
			tracing::trace!(count = state.count, "overlay hidden");
			state.count == 0
		};

		if released {
			self.inner.surface.set_overlay_visible(false);
			self.inner.surface.set_escape_hatch_visible(false);
		}
	}

	/// Shows the overlay and returns a guard that hides it when dropped.
	pub fn acquire(&self) -> OverlayGuard {
		self.show();
		OverlayGuard {
			overlay: self.clone(),
		}
	}

	/// Number of outstanding holders.
	pub fn count(&self) -> usize {
		self.inner.state.lock().count
	}

	/// Whether the overlay is visible.
	pub fn is_visible(&self) -> bool {
		self.inner.state.lock().count > 0
	}

	/// Whether the escape hatch is showing.
	pub fn is_escape_hatch_visible(&self) -> bool {
		self.inner.state.lock().escape_hatch_visible
	}

	/// Whether an escape-hatch reveal is scheduled.
	pub fn has_pending_timer(&self) -> bool {
		self.inner.state.lock().pending.is_some()
	}

	fn schedule_escape_hatch(&self, cycle: u64) -> Option<EscapeHatchTimer> {
		let Ok(runtime) = tokio::runtime::Handle::try_current() else {
			tracing::warn!("no async runtime, escape hatch disabled for this cycle");
			return None;
		};

		let weak: Weak<OverlayInner> = Arc::downgrade(&self.inner);
		let delay = self.inner.escape_hatch_delay;
		let focus_delay = self.inner.focus_delay;
		let handle = runtime
			.spawn(async move {
				tokio::time::sleep(delay).await;
				let revealed = weak
					.upgrade()
					.is_some_and(|inner| inner.reveal_escape_hatch(cycle));
				if !revealed {
					return;
				}
				tokio::time::sleep(focus_delay).await;
				if let Some(inner) = weak.upgrade() {
					inner.focus_escape_hatch(cycle);
				}
			})
			.abort_handle();

		Some(EscapeHatchTimer { handle })
	}
}

impl OverlayInner {
	fn reveal_escape_hatch(&self, cycle: u64) -> bool {
		{
			let mut state = self.state.lock();
			if state.cycle != cycle || state.count == 0 {
				return false;
			}
			// Fired: drop the handle without aborting our own task.
			state.pending = None;
			state.escape_hatch_visible = true;
		}
		self.surface.set_escape_hatch_visible(true);
		tracing::info!(cycle, "loading is taking long, escape hatch revealed");
		true
	}

	fn focus_escape_hatch(&self, cycle: u64) {
		let current = {
			let state = self.state.lock();
			state.cycle == cycle && state.escape_hatch_visible
		};
		if current {
			self.surface.focus_escape_hatch();
		}
	}
}

/// Holds the overlay up until dropped.
#[must_use = "the overlay is hidden again as soon as the guard is dropped"]
#[derive(Debug)]
pub struct OverlayGuard {
	overlay: LoadingOverlay,
}

impl Drop for OverlayGuard {
	fn drop(&mut self) {
		self.overlay.hide();
	}
}
