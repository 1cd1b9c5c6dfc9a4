//! # JHE Portal
//!
//! Browser-side client engine of the JHE admin portal (organizations,
//! patients, studies, observations and data sources).
//!
//! Per-resource glue (fetching lists, templating, submitting forms) lives in
//! render actions supplied by the application. This crate provides the
//! engine those actions plug into.
//!
//! ## Feature Flags
//!
//! - `navigation` (default) - Navigation & view-lifecycle engine
//!
//! ## Quick Example
//!
//! ```rust,ignore
//! use jhe_portal::navigation::{Content, NavigationSettings, Navigator, RenderActions, render_fn};
//!
//! let actions = RenderActions::from_fn(|route| {
//!     render_fn(move |cx| async move {
//!         Ok(Some(Content::new(format!("<h1>{}</h1>", route.descriptor().label))))
//!     })
//! });
//!
//! let navigator = Navigator::builder()
//!     .settings(NavigationSettings::from_env()?)
//!     .history(history)
//!     .document(document)
//!     .overlay_surface(overlay)
//!     .authenticator(authenticator)
//!     .render_actions(actions)
//!     .build()?;
//!
//! navigator.listen();
//! navigator.start().await;
//! ```

#[cfg(feature = "navigation")]
pub mod navigation;

#[cfg(feature = "navigation")]
pub use portal_navigation::{NavOutcome, NavigationSettings, Navigator, Route};
