//! Route registry.
//!
//! Routes form a closed set: each [`Route`] variant has exactly one
//! [`RouteDescriptor`] and exactly one render action (see
//! [`RenderActions`](crate::RenderActions)), so a route lookup can never miss.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A navigable portal view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Route {
	/// Organization tree.
	Organizations,
	/// Patients of an organization or study.
	Patients,
	/// Studies of an organization.
	Studies,
	/// Observations uploaded by patients.
	Observations,
	/// Registered data sources (devices, apps).
	DataSources,
	/// Developer tools.
	Debug,
}

impl Route {
	/// All routes, in nav-bar order.
	pub const ALL: [Route; 6] = [
		Route::Organizations,
		Route::Patients,
		Route::Studies,
		Route::Observations,
		Route::DataSources,
		Route::Debug,
	];

	/// Returns the key used in the URL path.
	pub const fn key(self) -> &'static str {
		match self {
			Route::Organizations => "organizations",
			Route::Patients => "patients",
			Route::Studies => "studies",
			Route::Observations => "observations",
			Route::DataSources => "dataSources",
			Route::Debug => "debug",
		}
	}

	/// Looks a route up by its URL key.
	pub fn from_key(key: &str) -> Option<Route> {
		Route::ALL.into_iter().find(|route| route.key() == key)
	}

	/// Returns the registry entry for this route.
	pub fn descriptor(self) -> &'static RouteDescriptor {
		&REGISTRY[self as usize]
	}

	/// Returns the DOM id of this route's CRUD modal container.
	pub fn modal_element_id(self) -> String {
		format!("{}-crudModal", self.key())
	}
}

impl fmt::Display for Route {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.key())
	}
}

/// Static display metadata for a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteDescriptor {
	/// The route this entry describes.
	pub route: Route,
	/// Nav-bar label.
	pub label: &'static str,
	/// Icon class shown next to the label.
	pub icon: &'static str,
	/// Identifier of the render action, used in logs.
	pub action: &'static str,
}

/// The route registry, indexed by `Route as usize`.
pub static REGISTRY: [RouteDescriptor; 6] = [
	RouteDescriptor {
		route: Route::Organizations,
		label: "Organizations",
		icon: "bi-diagram-3",
		action: "render_organizations",
	},
	RouteDescriptor {
		route: Route::Patients,
		label: "Patients",
		icon: "bi-person-vcard",
		action: "render_patients",
	},
	RouteDescriptor {
		route: Route::Studies,
		label: "Studies",
		icon: "bi-journals",
		action: "render_studies",
	},
	RouteDescriptor {
		route: Route::Observations,
		label: "Observations",
		icon: "bi-database",
		action: "render_observations",
	},
	RouteDescriptor {
		route: Route::DataSources,
		label: "Data Sources",
		icon: "bi-phone",
		action: "render_data_sources",
	},
	RouteDescriptor {
		route: Route::Debug,
		label: "Debug",
		icon: "bi-bug",
		action: "render_debug",
	},
];

/// One entry of the rendered nav bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavItem {
	/// Target route.
	pub route: Route,
	/// Display label.
	pub label: &'static str,
	/// Icon class.
	pub icon: &'static str,
	/// Link target.
	pub href: String,
	/// Whether this is the route being rendered.
	pub active: bool,
}

/// Builds the nav bar for a render of `active`.
pub fn nav_items(active: Route, route_prefix: &str) -> Vec<NavItem> {
	REGISTRY
		.iter()
		.map(|descriptor| NavItem {
			route: descriptor.route,
			label: descriptor.label,
			icon: descriptor.icon,
			href: format!("{}{}", route_prefix, descriptor.route.key()),
			active: descriptor.route == active,
		})
		.collect()
}
