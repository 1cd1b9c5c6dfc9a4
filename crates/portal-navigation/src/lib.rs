//! Portal Navigation - view lifecycle engine for the JHE admin portal client
//!
//! Maps browser locations to portal routes, runs each route's render action
//! under a reentrant loading overlay, keeps one CRUD modal bound to the
//! mounted view and decides when browser history entries are recorded.
//!
//! ## Architecture
//!
//! - [`routes`]: Closed route set and its registry
//! - [`location`]: Location codec and query parameters
//! - [`intent`]: CRUD intent flags carried in the URL
//! - [`overlay`]: Reentrant loading overlay with a delayed escape hatch
//! - [`modal`]: Modal lifecycle manager
//! - [`history`]: History synchronizer
//! - [`session`]: State shared across navigations
//! - [`navigator`]: The navigation orchestrator
//! - [`auth`], [`render`], [`document`]: Collaborator ports
//! - [`settings`]: Configuration (TOML and `PORTAL_NAV_*` environment)
//! - [`testing`]: In-memory ports
//!
//! ## Example
//!
//! ```ignore
//! use portal_navigation::{Content, Navigator, RenderActions, render_fn};
//!
//! let actions = RenderActions::from_fn(|route| {
//!     render_fn(move |cx| async move {
//!         let markup = templates::render(route, &cx.params).await?;
//!         Ok(Some(Content::new(markup)))
//!     })
//! });
//!
//! let navigator = Navigator::builder()
//!     .settings(NavigationSettings::from_env()?)
//!     .history(browser_history)
//!     .document(document)
//!     .overlay_surface(overlay)
//!     .authenticator(authenticator)
//!     .render_actions(actions)
//!     .build()?;
//!
//! navigator.listen();
//! navigator.start().await;
//! ```

#![warn(missing_docs)]

pub mod auth;
pub mod document;
pub mod error;
pub mod history;
pub mod intent;
pub mod location;
pub mod modal;
pub mod navigator;
pub mod overlay;
pub mod render;
pub mod routes;
pub mod session;
pub mod settings;
pub mod testing;

pub use auth::{Authenticator, Session};
pub use document::{Chrome, Content, Document};
pub use error::{
	AuthError, BuildError, DocumentError, HistoryError, NavigationError, RenderError,
	SettingsError, ValidationErrors,
};
pub use history::{BrowserHistory, HistorySynchronizer};
pub use intent::{CrudIntent, CrudMode};
pub use location::{Location, LocationCodec, NavigationState, QueryParams};
pub use modal::{ModalContainer, ModalManager, ModalWidget};
pub use navigator::{NavOutcome, Navigator, NavigatorBuilder};
pub use overlay::{LoadingOverlay, OverlayGuard, OverlaySurface};
pub use render::{RenderAction, RenderActions, RenderContext, RenderResult, render_fn};
pub use routes::{NavItem, Route, RouteDescriptor};
pub use session::NavigationSession;
pub use settings::NavigationSettings;
