//! Location codec.
//!
//! Converts a browser location (path + query string) into a
//! [`NavigationState`] and back into a URL. Everything here is pure: no DOM,
//! no network, no logging side effects beyond a warning on undecodable input.

use crate::routes::Route;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered string-to-string parameter bag taken from the query string.
///
/// Insertion order is kept for encoding. Equality ignores order: two bags are
/// equal iff they have the same keys and the same value for every key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryParams(IndexMap<String, String>);

impl QueryParams {
	/// Creates an empty parameter bag.
	pub fn new() -> Self {
		Self(IndexMap::new())
	}

	/// Parses a form-urlencoded query string. A leading `?` is ignored and a
	/// repeated key keeps its first position with its last value.
	pub fn parse(query: &str) -> Self {
		let query = query.strip_prefix('?').unwrap_or(query);
		match serde_urlencoded::from_str::<Vec<(String, String)>>(query) {
			Ok(pairs) => pairs.into_iter().collect(),
			Err(error) => {
				tracing::warn!(%error, query, "undecodable query string, using empty params");
				Self::new()
			}
		}
	}

	/// Serializes to a form-urlencoded string without the leading `?`.
	pub fn to_query_string(&self) -> String {
		let pairs: Vec<(&str, &str)> = self.iter().collect();
		serde_urlencoded::to_string(pairs).unwrap_or_default()
	}

	/// Sets `key` to `value`, returning the previous value.
	pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
		self.0.insert(key.into(), value.into())
	}

	/// Builder-style [`insert`](Self::insert).
	pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.insert(key, value);
		self
	}

	/// Returns the value for `key`.
	pub fn get(&self, key: &str) -> Option<&str> {
		self.0.get(key).map(String::as_str)
	}

	/// Removes `key`, keeping the order of the remaining entries.
	pub fn remove(&mut self, key: &str) -> Option<String> {
		self.0.shift_remove(key)
	}

	/// Returns whether `key` is present.
	pub fn contains_key(&self, key: &str) -> bool {
		self.0.contains_key(key)
	}

	/// Number of parameters.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns whether there are no parameters.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Iterates over `(key, value)` pairs in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}

	/// Shallow-merges `overrides` over `self`: keys in `overrides` replace
	/// existing values, new keys are appended.
	pub fn merged(mut self, overrides: &QueryParams) -> Self {
		for (key, value) in overrides.iter() {
			self.insert(key, value);
		}
		self
	}
}

impl<K, V> FromIterator<(K, V)> for QueryParams
where
	K: Into<String>,
	V: Into<String>,
{
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		let mut params = QueryParams::new();
		for (key, value) in iter {
			params.insert(key, value);
		}
		params
	}
}

impl<K, V, const N: usize> From<[(K, V); N]> for QueryParams
where
	K: Into<String>,
	V: Into<String>,
{
	fn from(pairs: [(K, V); N]) -> Self {
		pairs.into_iter().collect()
	}
}

impl fmt::Display for QueryParams {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.to_query_string())
	}
}

/// The raw browser location.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
	/// `location.pathname`.
	pub pathname: String,
	/// `location.search`, with or without the leading `?`.
	pub search: String,
}

impl Location {
	/// Creates a location from its parts.
	pub fn new(pathname: impl Into<String>, search: impl Into<String>) -> Self {
		Self {
			pathname: pathname.into(),
			search: search.into(),
		}
	}

	/// Splits a URL such as `/portal/patients?organizationId=5`.
	pub fn from_url(url: &str) -> Self {
		match url.split_once('?') {
			Some((path, query)) => Self::new(path, query),
			None => Self::new(url, ""),
		}
	}
}

/// Where the application is: a route plus its parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationState {
	/// Resolved route, always registered.
	pub route: Route,
	/// Query parameters.
	pub params: QueryParams,
}

impl NavigationState {
	/// Creates a navigation state.
	pub fn new(route: Route, params: QueryParams) -> Self {
		Self { route, params }
	}
}

/// Converts between browser locations and [`NavigationState`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationCodec {
	prefix: String,
	default_route: Route,
}

impl LocationCodec {
	/// Creates a codec for routes mounted under `prefix` (e.g. `/portal/`).
	pub fn new(prefix: impl Into<String>, default_route: Route) -> Self {
		Self {
			prefix: prefix.into(),
			default_route,
		}
	}

	/// Returns the path prefix.
	pub fn prefix(&self) -> &str {
		&self.prefix
	}

	/// Returns the fallback route.
	pub fn default_route(&self) -> Route {
		self.default_route
	}

	/// Resolves a route key, falling back to the default route.
	pub fn route_or_default(&self, key: &str) -> Route {
		Route::from_key(key).unwrap_or(self.default_route)
	}

	/// Resolves a path and query string.
	///
	/// Paths outside the prefix and unknown route keys resolve to the default
	/// route; the query parameters are kept either way.
	pub fn resolve(&self, path: &str, query: &str) -> NavigationState {
		let key = path.strip_prefix(self.prefix.as_str()).unwrap_or("");
		let key = key.strip_suffix('/').unwrap_or(key);
		NavigationState::new(self.route_or_default(key), QueryParams::parse(query))
	}

	/// Resolves a [`Location`].
	pub fn resolve_location(&self, location: &Location) -> NavigationState {
		self.resolve(&location.pathname, &location.search)
	}

	/// Encodes a route and its parameters into a URL.
	pub fn encode(&self, route: Route, params: &QueryParams) -> String {
		let mut url = format!("{}{}", self.prefix, route.key());
		if !params.is_empty() {
			url.push('?');
			url.push_str(&params.to_query_string());
		}
		url
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::{fixture, rstest};

	#[fixture]
	fn codec() -> LocationCodec {
		LocationCodec::new("/portal/", Route::Organizations)
	}

	#[rstest]
	fn test_resolve_route_and_params(codec: LocationCodec) {
		let state = codec.resolve("/portal/patients", "?organizationId=5");

		assert_eq!(state.route, Route::Patients);
		assert_eq!(state.params, QueryParams::from([("organizationId", "5")]));
	}

	#[rstest]
	#[case("/portal/studies/", Route::Studies)]
	#[case("/portal/dataSources", Route::DataSources)]
	#[case("/portal/", Route::Organizations)]
	#[case("/portal/unknown", Route::Organizations)]
	#[case("/elsewhere/patients", Route::Organizations)]
	#[case("", Route::Organizations)]
	fn test_resolve_path_variants(codec: LocationCodec, #[case] path: &str, #[case] expected: Route) {
		assert_eq!(codec.resolve(path, "").route, expected);
	}

	#[rstest]
	fn test_unknown_route_keeps_params(codec: LocationCodec) {
		let state = codec.resolve("/portal/nope", "studyId=3&read=true");

		assert_eq!(state.route, Route::Organizations);
		assert_eq!(state.params.get("studyId"), Some("3"));
		assert_eq!(state.params.get("read"), Some("true"));
	}

	#[rstest]
	fn test_repeated_key_last_wins(codec: LocationCodec) {
		let state = codec.resolve("/portal/patients", "a=1&b=2&a=3");

		assert_eq!(state.params.get("a"), Some("3"));
		let keys: Vec<_> = state.params.iter().map(|(k, _)| k).collect();
		assert_eq!(keys, vec!["a", "b"]);
	}

	#[rstest]
	fn test_percent_and_plus_decoding(codec: LocationCodec) {
		let state = codec.resolve("/portal/patients", "lookedUpEmail=a%40b.org&name=Jane+Doe");

		assert_eq!(state.params.get("lookedUpEmail"), Some("a@b.org"));
		assert_eq!(state.params.get("name"), Some("Jane Doe"));
	}

	#[rstest]
	fn test_encode_preserves_insertion_order(codec: LocationCodec) {
		let params = QueryParams::new()
			.with("create", "true")
			.with("organizationId", "5");

		assert_eq!(
			codec.encode(Route::Patients, &params),
			"/portal/patients?create=true&organizationId=5"
		);
	}

	#[rstest]
	fn test_encode_without_params(codec: LocationCodec) {
		assert_eq!(
			codec.encode(Route::Studies, &QueryParams::new()),
			"/portal/studies"
		);
	}

	#[rstest]
	fn test_encode_escapes_values(codec: LocationCodec) {
		let params = QueryParams::from([("q", "a b&c")]);
		assert_eq!(codec.encode(Route::Patients, &params), "/portal/patients?q=a+b%26c");
	}

	#[rstest]
	fn test_params_equality_ignores_order() {
		let a = QueryParams::from([("x", "1"), ("y", "2")]);
		let b = QueryParams::from([("y", "2"), ("x", "1")]);
		let c = QueryParams::from([("x", "1"), ("y", "3")]);
		let d = QueryParams::from([("x", "1")]);

		assert_eq!(a, b);
		assert_ne!(a, c);
		assert_ne!(a, d);
		assert_ne!(d, a);
	}

	#[rstest]
	fn test_merged_overrides_and_appends() {
		let current = QueryParams::from([("organizationId", "5"), ("studyId", "2")]);
		let merged = current.merged(&QueryParams::from([("studyId", "9"), ("read", "true")]));

		assert_eq!(
			merged.to_query_string(),
			"organizationId=5&studyId=9&read=true"
		);
	}

	#[rstest]
	fn test_remove_keeps_order() {
		let mut params = QueryParams::from([("a", "1"), ("b", "2"), ("c", "3")]);
		params.remove("a");
		assert_eq!(params.to_query_string(), "b=2&c=3");
	}

	#[rstest]
	fn test_location_from_url() {
		assert_eq!(
			Location::from_url("/portal/patients?organizationId=5"),
			Location::new("/portal/patients", "organizationId=5")
		);
		assert_eq!(
			Location::from_url("/portal/studies"),
			Location::new("/portal/studies", "")
		);
	}
}
