//! Navigation & view-lifecycle engine
//!
//! This module provides access to portal-navigation, which maps browser
//! locations to portal routes and drives each view change.
//!
//! ## Architecture
//!
//! - **Navigator**: Runs render actions under the loading overlay
//! - **Location Codec**: `/portal/{route}?{params}` to route and back
//! - **Modal Manager**: One CRUD dialog bound to the mounted view
//! - **History Synchronizer**: Pushes entries only when the location changes
//!
//! ## Example
//!
//! ```rust,ignore
//! use jhe_portal::navigation::{QueryParams, Route};
//!
//! navigator
//!     .navigate(Route::Patients, QueryParams::from([("organizationId", "5")]))
//!     .await;
//! ```

// Re-export all portal-navigation functionality
pub use portal_navigation::*;
