//! Property-based tests for the location codec and the loading overlay
//!
//! Uses proptest to verify properties that should hold for all inputs.

use portal_navigation::testing::MemoryOverlaySurface;
use portal_navigation::{LoadingOverlay, LocationCodec, QueryParams, Route};
use proptest::prelude::*;
use proptest::proptest;
use std::sync::Arc;
use std::time::Duration;

fn codec() -> LocationCodec {
	LocationCodec::new("/portal/", Route::Organizations)
}

fn route() -> impl Strategy<Value = Route> {
	prop::sample::select(Route::ALL.to_vec())
}

fn params() -> impl Strategy<Value = Vec<(String, String)>> {
	prop::collection::vec((r"[a-zA-Z][a-zA-Z0-9]{0,10}", r"[ -~]{0,20}"), 0..6)
}

proptest! {
	/// Property: any path resolves to a registered route
	#[test]
	fn prop_resolve_always_yields_registered_route(path in r"[ -~]{0,40}", query in r"[ -~]{0,40}") {
		let state = codec().resolve(&path, &query);
		prop_assert!(Route::ALL.contains(&state.route));
	}

	/// Property: keys outside the registry fall back to the default route
	#[test]
	fn prop_unknown_key_uses_default(key in r"[a-z]{1,12}") {
		prop_assume!(Route::from_key(&key).is_none());

		let state = codec().resolve(&format!("/portal/{}", key), "");
		prop_assert_eq!(state.route, Route::Organizations);
	}

	/// Property: an encoded state resolves back to itself
	#[test]
	fn prop_encode_then_resolve(route in route(), pairs in params()) {
		let params: QueryParams = pairs.into_iter().collect();
		let url = codec().encode(route, &params);
		let (path, query) = url.split_once('?').unwrap_or((url.as_str(), ""));

		let state = codec().resolve(path, query);
		prop_assert_eq!(state.route, route);
		prop_assert_eq!(state.params, params);
	}

	/// Property: parameter equality does not depend on insertion order
	#[test]
	fn prop_params_equality_ignores_order(pairs in params()) {
		let forward: QueryParams = pairs.iter().cloned().collect();
		let mut reversed: QueryParams = QueryParams::new();
		for (key, _) in pairs.iter().rev() {
			if !reversed.contains_key(key) {
				reversed.insert(key.clone(), forward.get(key).unwrap_or_default().to_string());
			}
		}
		prop_assert_eq!(forward, reversed);
	}

	/// Property: the overlay count never goes negative and the overlay is
	/// visible exactly while it is positive
	#[test]
	fn prop_overlay_counter_clamps(ops in prop::collection::vec(any::<bool>(), 0..50)) {
		let surface = Arc::new(MemoryOverlaySurface::default());
		let overlay = LoadingOverlay::new(
			surface.clone(),
			Duration::from_secs(10),
			Duration::from_millis(50),
		);

		let mut expected = 0_usize;
		for show in ops {
			if show {
				overlay.show();
				expected += 1;
			} else {
				overlay.hide();
				expected = expected.saturating_sub(1);
			}
			prop_assert_eq!(overlay.count(), expected);
			prop_assert_eq!(surface.overlay_visible(), expected > 0);
		}
	}
}
