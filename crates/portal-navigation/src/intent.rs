//! CRUD intent carried in the URL.
//!
//! `create`, `read`, `update` and `delete` are flags: a flag is set when its
//! parameter is present with a non-empty value. `id` names the target record.

use crate::error::NavigationError;
use crate::location::QueryParams;
use serde::Serialize;

/// Which dialog mode a navigation asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CrudMode {
	/// New record form.
	Create,
	/// Read-only record view.
	Read,
	/// Edit form.
	Update,
	/// Delete confirmation.
	Delete,
}

impl CrudMode {
	/// All modes, in flag-check order.
	pub const ALL: [CrudMode; 4] = [
		CrudMode::Create,
		CrudMode::Read,
		CrudMode::Update,
		CrudMode::Delete,
	];

	/// Returns the query parameter name of this flag.
	pub const fn param(self) -> &'static str {
		match self {
			CrudMode::Create => "create",
			CrudMode::Read => "read",
			CrudMode::Update => "update",
			CrudMode::Delete => "delete",
		}
	}

	fn is_set(self, params: &QueryParams) -> bool {
		params.get(self.param()).is_some_and(|value| !value.is_empty())
	}
}

/// A validated CRUD intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrudIntent {
	/// Requested mode.
	pub mode: CrudMode,
	/// Target record, when the URL names one.
	pub id: Option<String>,
}

impl CrudIntent {
	/// Extracts the intent from `params`.
	///
	/// Returns `Ok(None)` when no flag is set and
	/// [`NavigationError::AmbiguousCrudIntent`] when more than one is.
	pub fn from_params(params: &QueryParams) -> Result<Option<CrudIntent>, NavigationError> {
		let modes: Vec<CrudMode> = CrudMode::ALL
			.into_iter()
			.filter(|mode| mode.is_set(params))
			.collect();

		match modes.as_slice() {
			[] => Ok(None),
			[mode] => Ok(Some(CrudIntent {
				mode: *mode,
				id: params.get("id").map(str::to_string),
			})),
			_ => Err(NavigationError::AmbiguousCrudIntent(modes)),
		}
	}
}

/// Returns `params` without the four CRUD flags. `id` and resource filters
/// are kept.
pub fn without_crud_flags(mut params: QueryParams) -> QueryParams {
	for mode in CrudMode::ALL {
		params.remove(mode.param());
	}
	params
}
