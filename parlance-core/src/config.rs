use crate::{
	dictionary::Dictionary,
	error::{Error, Result},
	formats::Formats,
};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fs, path::Path};
use unic_langid::LanguageIdentifier;

/// Serializable store configuration, as passed to `Intl::init`.
///
/// The warning handler and the locale data loader are not part of this
/// record; they are installed on the store or in [`InitOptions`](crate::InitOptions).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct IntlOptions {
	/// Active locale such as `en-US`. Required by `init`.
	pub current_locale: Option<String>,
	/// Consulted when a key is missing from the current locale.
	pub fallback_locale: Option<String>,
	/// Locale → dictionary, e.g. `{"en-US": {"key1": "value1"}}`.
	pub locales: BTreeMap<String, Dictionary>,
	/// Query parameter carrying the locale (`?lang=en-US` → `lang`).
	pub url_locale_key: Option<String>,
	/// Cookie carrying the locale (`lang=en-US` → `lang`).
	pub cookie_locale_key: Option<String>,
	/// Language prefix → locale data bundle URL.
	pub common_locale_data_urls: BTreeMap<String, String>,
	/// Escape markup-like string variables before interpolation. On when unset.
	pub escape_html: Option<bool>,
	pub formats: Formats,
	/// Return `PARLANCE_KEY=<key>` instead of `""` for missing keys, so a
	/// translation tool can spot them in rendered output. Off when unset.
	pub diagnostic_echo: Option<bool>,
}

impl IntlOptions {
	pub fn new(current_locale: impl Into<String>) -> Self {
		Self { current_locale: Some(current_locale.into()), ..Self::default() }
	}

	pub fn with_fallback(mut self, locale: impl Into<String>) -> Self {
		self.fallback_locale = Some(locale.into());
		self
	}

	pub fn with_locale(mut self, locale: impl Into<String>, dict: Dictionary) -> Self {
		self.locales.entry(locale.into()).or_default().merge(dict);
		self
	}

	pub fn with_escape_html(mut self, on: bool) -> Self {
		self.escape_html = Some(on);
		self
	}

	pub fn with_diagnostic_echo(mut self, on: bool) -> Self {
		self.diagnostic_echo = Some(on);
		self
	}

	pub fn escapes_html(&self) -> bool { self.escape_html.unwrap_or(true) }

	pub fn echoes_missing_keys(&self) -> bool { self.diagnostic_echo.unwrap_or(false) }

	/// Apply `other` on top of `self`: fields set in `other` replace ours,
	/// maps are merged entry by entry and dictionaries deep-merged.
	pub fn overlay(&mut self, other: IntlOptions) {
		fn set<T>(slot: &mut Option<T>, v: Option<T>) {
			if v.is_some() {
				*slot = v;
			}
		}
		set(&mut self.current_locale, other.current_locale);
		set(&mut self.fallback_locale, other.fallback_locale);
		set(&mut self.url_locale_key, other.url_locale_key);
		set(&mut self.cookie_locale_key, other.cookie_locale_key);
		set(&mut self.escape_html, other.escape_html);
		set(&mut self.diagnostic_echo, other.diagnostic_echo);
		for (tag, dict) in other.locales {
			self.locales.entry(tag).or_default().merge(dict);
		}
		self.common_locale_data_urls.extend(other.common_locale_data_urls);
		self.formats.merge(other.formats);
	}

	/// Read options from a `.toml` or `.json` file and validate them.
	pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let data = fs::read_to_string(path)?;
		let cfg: Self = match path.extension().and_then(|e| e.to_str()) {
			Some("json") => serde_json::from_str(&data)?,
			Some("toml") => toml::from_str(&data)?,
			other => return Err(Error::config(format!("unsupported config format: {}", other.unwrap_or("<none>")))),
		};
		cfg.validate()?;
		Ok(cfg)
	}

	/// Overlay `PARLANCE_LOCALE`, `PARLANCE_FALLBACK_LOCALE` and
	/// `PARLANCE_ESCAPE_HTML` onto `self`.
	pub fn with_env_overrides(mut self) -> Result<Self> {
		if let Ok(v) = std::env::var("PARLANCE_LOCALE") {
			self.current_locale = Some(v);
		}
		if let Ok(v) = std::env::var("PARLANCE_FALLBACK_LOCALE") {
			self.fallback_locale = Some(v);
		}
		if let Ok(v) = std::env::var("PARLANCE_ESCAPE_HTML") {
			self.escape_html = Some(!(v == "0" || v.eq_ignore_ascii_case("false")));
		}
		self.validate()?;
		Ok(self)
	}

	pub fn from_env() -> Result<Self> { Self::default().with_env_overrides() }

	/// Locale identifiers, when present, must be non-empty BCP 47 tags.
	pub fn validate(&self) -> Result<()> {
		let named = self.current_locale.iter().chain(self.fallback_locale.iter()).chain(self.locales.keys());
		for tag in named {
			check_tag(tag)?;
		}
		Ok(())
	}
}

fn check_tag(tag: &str) -> Result<()> {
	if tag.trim().is_empty() {
		return Err(Error::config("empty locale identifier"));
	}
	tag.replace('_', "-")
		.parse::<LanguageIdentifier>()
		.map(|_| ())
		.map_err(|e| Error::config(format!("invalid locale '{tag}': {e}")))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_escape_html_and_have_no_locale() {
		let o = IntlOptions::default();
		assert!(o.escapes_html());
		assert!(!o.echoes_missing_keys());
		assert_eq!(o.current_locale, None);
		assert!(o.validate().is_ok());
	}

	#[test]
	fn json_config_with_nested_locales() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("intl.json");
		fs::write(
			&path,
			r#"{
				"currentLocale": "en-US",
				"fallbackLocale": "en",
				"escapeHtml": false,
				"locales": { "en-US": { "nav": { "home": "Home" } } },
				"commonLocaleDataUrls": { "en": "https://cdn.test/en.js" }
			}"#,
		)
		.unwrap();
		let o = IntlOptions::load_from_file(&path).unwrap();
		assert_eq!(o.current_locale.as_deref(), Some("en-US"));
		assert!(!o.escapes_html());
		assert_eq!(o.locales["en-US"].lookup("nav.home"), Some("Home"));
		assert_eq!(o.common_locale_data_urls["en"], "https://cdn.test/en.js");
	}

	#[test]
	fn toml_config_and_invalid_locale() {
		let dir = tempfile::tempdir().unwrap();
		let good = dir.path().join("intl.toml");
		fs::write(&good, "currentLocale = \"fr_FR\"\n[locales.fr_FR]\ngreeting = \"Bonjour\"\n").unwrap();
		let o = IntlOptions::load_from_file(&good).unwrap();
		assert_eq!(o.locales["fr_FR"].lookup("greeting"), Some("Bonjour"));

		let bad = dir.path().join("bad.toml");
		fs::write(&bad, "currentLocale = \"not a locale!\"\n").unwrap();
		let err = IntlOptions::load_from_file(&bad).unwrap_err();
		assert!(err.to_string().contains("invalid locale"));

		let broken = dir.path().join("broken.toml");
		fs::write(&broken, "currentLocale = \n").unwrap();
		assert!(matches!(IntlOptions::load_from_file(&broken), Err(Error::Toml(_))));
	}

	#[test]
	fn builder_merges_locale_dictionaries() {
		let a: Dictionary = [("a", "A")].into_iter().collect();
		let b: Dictionary = [("b", "B")].into_iter().collect();
		let o = IntlOptions::new("en").with_locale("en", a).with_locale("en", b).with_fallback("de");
		assert_eq!(o.locales["en"].len(), 2);
		assert_eq!(o.fallback_locale.as_deref(), Some("de"));
	}

	#[test]
	fn overlay_keeps_unset_fields() {
		let mut base = IntlOptions::new("en").with_fallback("en").with_diagnostic_echo(true).with_escape_html(false);
		base.url_locale_key = Some("lang".into());
		base.common_locale_data_urls.insert("en".into(), "https://cdn.test/en.js".into());

		let mut next = IntlOptions::new("de").with_locale("de", [("a", "A")].into_iter().collect());
		next.common_locale_data_urls.insert("de".into(), "https://cdn.test/de.js".into());
		base.overlay(next);

		assert_eq!(base.current_locale.as_deref(), Some("de"));
		assert_eq!(base.fallback_locale.as_deref(), Some("en"));
		assert_eq!(base.url_locale_key.as_deref(), Some("lang"));
		assert!(base.echoes_missing_keys());
		assert!(!base.escapes_html());
		assert_eq!(base.common_locale_data_urls.len(), 2);
		assert_eq!(base.locales["de"].lookup("a"), Some("A"));
	}

	#[test]
	fn env_overrides_and_validation() {
		// Restore the process environment afterwards.
		let vars = ["PARLANCE_LOCALE", "PARLANCE_FALLBACK_LOCALE", "PARLANCE_ESCAPE_HTML"];
		let saved: Vec<_> = vars.iter().map(|k| std::env::var(k).ok()).collect();

		std::env::set_var("PARLANCE_LOCALE", "fr-FR");
		std::env::set_var("PARLANCE_FALLBACK_LOCALE", "en");
		std::env::set_var("PARLANCE_ESCAPE_HTML", "false");
		let o = IntlOptions::from_env().unwrap();
		assert_eq!(o.current_locale.as_deref(), Some("fr-FR"));
		assert_eq!(o.fallback_locale.as_deref(), Some("en"));
		assert!(!o.escapes_html());

		let o = IntlOptions::new("de").with_escape_html(false);
		std::env::set_var("PARLANCE_ESCAPE_HTML", "1");
		assert!(o.with_env_overrides().unwrap().escapes_html());

		std::env::set_var("PARLANCE_LOCALE", "not a locale!");
		let err = IntlOptions::from_env().unwrap_err();
		assert!(matches!(err, Error::Config(_)));

		for (k, v) in vars.iter().zip(saved) {
			match v {
				Some(v) => std::env::set_var(k, v),
				None => std::env::remove_var(k),
			}
		}
	}
}
