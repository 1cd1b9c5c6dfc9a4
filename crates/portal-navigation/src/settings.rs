//! Engine settings.
//!
//! Settings are layered: built-in defaults, then an optional TOML document,
//! then `PORTAL_NAV_*` environment variables.
//!
//! ```toml
//! route_prefix = "/portal/"
//! default_route = "organizations"
//! escape_hatch_delay_ms = 10000
//! escape_hatch_focus_delay_ms = 50
//! logout_url = "/accounts/logout"
//! ```

use crate::error::SettingsError;
use crate::routes::Route;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Prefix of the environment variables read by [`NavigationSettings::from_env`].
pub const ENV_PREFIX: &str = "PORTAL_NAV_";

/// Banner text shown for any failed navigation.
pub const DEFAULT_ERROR_MESSAGE: &str =
	"An error has occurred. Please click your browser Refresh button and try again.";

/// Navigation engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationSettings {
	/// Path prefix every route lives under. Must start and end with `/`.
	pub route_prefix: String,
	/// Route used for unknown or missing route keys.
	pub default_route: Route,
	/// How long the overlay must stay up before the escape hatch appears.
	pub escape_hatch_delay_ms: u64,
	/// Delay between revealing the escape hatch and focusing it.
	pub escape_hatch_focus_delay_ms: u64,
	/// Where the page goes after sign-out.
	pub logout_url: String,
	/// Generic text of the error banner.
	pub error_message: String,
}

impl Default for NavigationSettings {
	fn default() -> Self {
		Self {
			route_prefix: "/portal/".to_string(),
			default_route: Route::Organizations,
			escape_hatch_delay_ms: 10_000,
			escape_hatch_focus_delay_ms: 50,
			logout_url: "/accounts/logout".to_string(),
			error_message: DEFAULT_ERROR_MESSAGE.to_string(),
		}
	}
}

impl NavigationSettings {
	/// Parses settings from a TOML document. Missing keys keep their defaults.
	pub fn from_toml_str(source: &str) -> Result<Self, SettingsError> {
		let settings: Self = toml::from_str(source)?;
		settings.validate()?;
		Ok(settings)
	}

	/// Reads settings from a TOML file.
	pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
		let source = std::fs::read_to_string(path)?;
		Self::from_toml_str(&source)
	}

	/// Defaults overridden by the process environment.
	pub fn from_env() -> Result<Self, SettingsError> {
		Self::default().apply_env(std::env::vars())
	}

	/// Applies `PORTAL_NAV_*` overrides from `vars`; other variables are
	/// ignored.
	pub fn apply_env<I>(mut self, vars: I) -> Result<Self, SettingsError>
	where
		I: IntoIterator<Item = (String, String)>,
	{
		for (key, value) in vars {
			let Some(name) = key.strip_prefix(ENV_PREFIX) else {
				continue;
			};
			match name.to_ascii_lowercase().as_str() {
				"route_prefix" => self.route_prefix = value,
				"default_route" => {
					self.default_route =
						Route::from_key(&value).ok_or_else(|| SettingsError::InvalidValue {
							key: key.clone(),
							message: format!("unknown route '{}'", value),
						})?
				}
				"escape_hatch_delay_ms" => self.escape_hatch_delay_ms = parse_millis(&key, &value)?,
				"escape_hatch_focus_delay_ms" => {
					self.escape_hatch_focus_delay_ms = parse_millis(&key, &value)?
				}
				"logout_url" => self.logout_url = value,
				"error_message" => self.error_message = value,
				_ => tracing::debug!(variable = %key, "ignoring unknown navigation setting"),
			}
		}
		self.validate()?;
		Ok(self)
	}

	/// Checks that the settings are usable.
	pub fn validate(&self) -> Result<(), SettingsError> {
		if !self.route_prefix.starts_with('/') || !self.route_prefix.ends_with('/') {
			return Err(SettingsError::InvalidValue {
				key: "route_prefix".to_string(),
				message: format!("'{}' must start and end with '/'", self.route_prefix),
			});
		}
		if self.escape_hatch_delay_ms == 0 {
			return Err(SettingsError::InvalidValue {
				key: "escape_hatch_delay_ms".to_string(),
				message: "must be greater than zero".to_string(),
			});
		}
		Ok(())
	}

	/// Escape-hatch delay as a [`Duration`].
	pub fn escape_hatch_delay(&self) -> Duration {
		Duration::from_millis(self.escape_hatch_delay_ms)
	}

	/// Escape-hatch focus delay as a [`Duration`].
	pub fn escape_hatch_focus_delay(&self) -> Duration {
		Duration::from_millis(self.escape_hatch_focus_delay_ms)
	}
}

fn parse_millis(key: &str, value: &str) -> Result<u64, SettingsError> {
	value
		.trim()
		.parse::<u64>()
		.map_err(|e| SettingsError::InvalidValue {
			key: key.to_string(),
			message: e.to_string(),
		})
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::io::Write;

	fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
		pairs
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect()
	}

	#[rstest]
	fn test_defaults_are_valid() {
		let settings = NavigationSettings::default();
		assert!(settings.validate().is_ok());
		assert_eq!(settings.escape_hatch_delay(), Duration::from_secs(10));
		assert_eq!(settings.escape_hatch_focus_delay(), Duration::from_millis(50));
	}

	#[rstest]
	fn test_partial_toml_keeps_defaults() {
		let settings = NavigationSettings::from_toml_str(
			r#"
			default_route = "studies"
			escape_hatch_delay_ms = 2500
			"#,
		)
		.unwrap();

		assert_eq!(settings.default_route, Route::Studies);
		assert_eq!(settings.escape_hatch_delay_ms, 2500);
		assert_eq!(settings.route_prefix, "/portal/");
		assert_eq!(settings.logout_url, "/accounts/logout");
	}

	#[rstest]
	fn test_toml_unknown_route_rejected() {
		let result = NavigationSettings::from_toml_str(r#"default_route = "billing""#);
		assert!(matches!(result, Err(SettingsError::Toml(_))));
	}

	#[rstest]
	#[case("portal/")]
	#[case("/portal")]
	fn test_invalid_prefix_rejected(#[case] prefix: &str) {
		let source = format!("route_prefix = \"{}\"", prefix);
		let result = NavigationSettings::from_toml_str(&source);
		assert!(matches!(
			result,
			Err(SettingsError::InvalidValue { ref key, .. }) if key == "route_prefix"
		));
	}

	#[rstest]
	fn test_zero_delay_rejected() {
		let result = NavigationSettings::from_toml_str("escape_hatch_delay_ms = 0");
		assert!(matches!(result, Err(SettingsError::InvalidValue { .. })));
	}

	#[rstest]
	fn test_env_overrides() {
		let settings = NavigationSettings::default()
			.apply_env(vars(&[
				("PORTAL_NAV_DEFAULT_ROUTE", "dataSources"),
				("PORTAL_NAV_ESCAPE_HATCH_DELAY_MS", " 3000 "),
				("PORTAL_NAV_LOGOUT_URL", "/logout"),
				("HOME", "/root"),
			]))
			.unwrap();

		assert_eq!(settings.default_route, Route::DataSources);
		assert_eq!(settings.escape_hatch_delay_ms, 3000);
		assert_eq!(settings.logout_url, "/logout");
	}

	#[rstest]
	#[case("PORTAL_NAV_DEFAULT_ROUTE", "billing")]
	#[case("PORTAL_NAV_ESCAPE_HATCH_FOCUS_DELAY_MS", "soon")]
	fn test_env_invalid_values(#[case] key: &str, #[case] value: &str) {
		let result = NavigationSettings::default().apply_env(vars(&[(key, value)]));
		assert!(matches!(
			result,
			Err(SettingsError::InvalidValue { key: ref k, .. }) if k == key
		));
	}

	#[rstest]
	fn test_from_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "route_prefix = \"/admin/\"").unwrap();

		let settings = NavigationSettings::from_file(file.path()).unwrap();
		assert_eq!(settings.route_prefix, "/admin/");
	}

	#[rstest]
	fn test_from_missing_file() {
		let result = NavigationSettings::from_file("/nonexistent/portal-nav.toml");
		assert!(matches!(result, Err(SettingsError::Io(_))));
	}
}
