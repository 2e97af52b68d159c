//! The locale store: configuration, key resolution and message formatting.
//!
//! # Invariants
//!
//! 1. **Lookups never fail on data**: a missing locale, a missing key or a
//!    broken template yields one warning and a degraded result (`""` or the
//!    raw template). Only an empty key or an `init` without a current locale
//!    return `Err`.
//!
//! 2. **One warning per failed lookup**: a key missing from both the current
//!    and the fallback locale reports a single `KeyNotFound`.
//!
//! 3. **Loads accumulate**: `load` deep-merges into the existing dictionaries;
//!    overlapping keys take the most recent value.

use std::{collections::BTreeMap, fmt, path::Path, sync::Arc};

use crate::{
	config::IntlOptions,
	detect::{self, DetectOptions, Environment},
	dictionary::Dictionary,
	error::{Error, Result},
	escape,
	formats::Formats,
	loader::{self, LocaleDataLoader},
	message::{MessageFormat, Variables},
	rich::{with_default, MessageDescriptor, RichContent},
	warning::{self, Warning, WarningHandler},
};

/// Prefix of the placeholder returned for missing keys when
/// [`IntlOptions::diagnostic_echo`] is on.
pub const DIAGNOSTIC_KEY_PREFIX: &str = "PARLANCE_KEY=";

/// Everything `init` accepts: the serializable options plus the optional
/// warning handler and locale data loader.
#[derive(Default, Clone)]
pub struct InitOptions {
	pub options: IntlOptions,
	pub warning_handler: Option<WarningHandler>,
	pub loader: Option<Arc<dyn LocaleDataLoader>>,
}

impl InitOptions {
	pub fn warning_handler(mut self, handler: WarningHandler) -> Self {
		self.warning_handler = Some(handler);
		self
	}

	pub fn loader(mut self, loader: Arc<dyn LocaleDataLoader>) -> Self {
		self.loader = Some(loader);
		self
	}
}

impl From<IntlOptions> for InitOptions {
	fn from(options: IntlOptions) -> Self { Self { options, ..Self::default() } }
}

/// Outcome of a key lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<'a> {
	Found { template: &'a str, locale: &'a str },
	NotFound,
}

impl<'a> Resolution<'a> {
	pub fn template(&self) -> Option<&'a str> {
		match self {
			Self::Found { template, .. } => Some(template),
			Self::NotFound => None,
		}
	}
}

pub struct Intl {
	options: IntlOptions,
	warning_handler: WarningHandler,
	loader: Option<Arc<dyn LocaleDataLoader>>,
}

impl Default for Intl {
	fn default() -> Self { Self::new() }
}

impl fmt::Debug for Intl {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Intl")
			.field("options", &self.options)
			.field("loader", &self.loader.is_some())
			.finish_non_exhaustive()
	}
}

impl Intl {
	/// An empty store that logs warnings through `tracing`.
	pub fn new() -> Self {
		let options = IntlOptions { formats: Formats::defaults().clone(), ..IntlOptions::default() };
		Self { options, warning_handler: warning::tracing_handler(), loader: None }
	}

	pub fn with_warning_handler(mut self, handler: WarningHandler) -> Self {
		self.warning_handler = handler;
		self
	}

	pub fn with_loader(mut self, loader: Arc<dyn LocaleDataLoader>) -> Self {
		self.loader = Some(loader);
		self
	}

	/// Apply `init` options and run the locale data load step.
	///
	/// Options are overlaid on the store's: unset fields keep their current
	/// value and dictionaries are deep-merged. Bundle load problems are
	/// reported as warnings; the returned future resolves either way.
	pub async fn init(&mut self, init: impl Into<InitOptions>) -> Result<()> {
		let InitOptions { options, warning_handler, loader } = init.into();
		let Some(locale) = options.current_locale.clone().filter(|l| !l.is_empty()) else {
			return Err(Error::invalid_argument("options.current_locale is required"));
		};

		self.options.overlay(options);
		if let Some(h) = warning_handler {
			self.warning_handler = h;
		}
		if loader.is_some() {
			self.loader = loader;
		}
		tracing::debug!(locale = locale.as_str(), locales = self.options.locales.len(), "intl initialized");

		if let Some(w) = loader::load_locale_data(self.loader.as_deref(), &self.options.common_locale_data_urls, &locale).await {
			self.warn(w);
		}
		Ok(())
	}

	/// Deep-merge more dictionaries into the store.
	pub fn load(&mut self, locales: BTreeMap<String, Dictionary>) {
		for (tag, dict) in locales {
			tracing::debug!(locale = tag.as_str(), messages = dict.len(), "loading locale");
			self.options.locales.entry(tag).or_default().merge(dict);
		}
	}

	pub fn load_locale(&mut self, locale: impl Into<String>, dict: Dictionary) {
		self.load(BTreeMap::from([(locale.into(), dict)]));
	}

	/// Load a `.json` / `.toml` dictionary file for `locale`.
	pub fn load_file(&mut self, locale: impl Into<String>, path: impl AsRef<Path>) -> Result<()> {
		let dict = Dictionary::load_from_file(path)?;
		self.load_locale(locale, dict);
		Ok(())
	}

	pub fn set_current_locale(&mut self, locale: impl Into<String>) {
		let locale = locale.into();
		tracing::debug!(locale = locale.as_str(), "switching current locale");
		self.options.current_locale = Some(locale);
	}

	pub fn current_locale(&self) -> Option<&str> { self.options.current_locale.as_deref() }

	/// Options as they stand after `init` and subsequent loads.
	pub fn options(&self) -> &IntlOptions { &self.options }

	/// Identifiers of every locale with a dictionary.
	pub fn locales(&self) -> impl Iterator<Item = &str> { self.options.locales.keys().map(String::as_str) }

	/// Find the template for `key` in the current locale, then the fallback.
	pub fn resolve(&self, key: &str) -> Result<Resolution<'_>> {
		if key.is_empty() {
			return Err(Error::invalid_argument("key is required"));
		}
		let current = self.options.current_locale.as_deref().unwrap_or("");
		let Some(dict) = self.options.locales.get(current) else {
			self.warn(Warning::LocaleNotLoaded { locale: current.to_string() });
			return Ok(Resolution::NotFound);
		};
		if let Some(template) = dict.lookup(key) {
			return Ok(Resolution::Found { template, locale: current });
		}

		let fallback = self.options.fallback_locale.as_deref();
		if let Some((fb, dict)) = fallback.and_then(|fb| self.options.locales.get_key_value(fb)) {
			if let Some(template) = dict.lookup(key) {
				return Ok(Resolution::Found { template, locale: fb.as_str() });
			}
		}
		self.warn(Warning::KeyNotFound { key: key.to_string(), locale: current.to_string(), fallback: fallback.map(str::to_string) });
		Ok(Resolution::NotFound)
	}

	/// Resolve and format `key`. Missing keys yield `""` (or the diagnostic
	/// echo); templates the engine rejects are returned raw.
	pub fn get(&self, key: &str, vars: Option<&Variables>) -> Result<String> {
		match self.resolve(key)? {
			Resolution::Found { template, locale } => Ok(self.format(key, template, locale, vars)),
			Resolution::NotFound if self.options.echoes_missing_keys() => Ok(format!("{DIAGNOSTIC_KEY_PREFIX}{key}")),
			Resolution::NotFound => Ok(String::new()),
		}
	}

	/// Like [`get`](Self::get), wrapped for HTML rendering.
	pub fn get_html(&self, key: &str, vars: Option<&Variables>) -> Result<RichContent> {
		self.get(key, vars).map(RichContent::from_html)
	}

	/// [`get`](Self::get) by descriptor id, falling back to its default message.
	///
	/// A missing key always yields the default message, with or without the
	/// diagnostic echo.
	pub fn format_message(&self, desc: &MessageDescriptor, vars: Option<&Variables>) -> Result<String> {
		Ok(match self.resolve(&desc.id)? {
			Resolution::Found { template, locale } => with_default(self.format(&desc.id, template, locale, vars), &desc.default_message),
			Resolution::NotFound => desc.default_message.clone(),
		})
	}

	pub fn format_html_message(&self, desc: &MessageDescriptor, vars: Option<&Variables>) -> Result<RichContent> {
		Ok(match self.resolve(&desc.id)? {
			Resolution::Found { template, locale } => {
				RichContent::from_html(self.format(&desc.id, template, locale, vars)).default_message(&desc.default_message)
			}
			Resolution::NotFound => RichContent::from_html(desc.default_message.as_str()),
		})
	}

	/// Detect a locale from `env` using the configured query and cookie keys.
	pub fn determine_locale(&self, env: &dyn Environment) -> Option<String> {
		let opts = DetectOptions {
			url_locale_key: self.options.url_locale_key.clone(),
			cookie_locale_key: self.options.cookie_locale_key.clone(),
		};
		detect::determine_locale(env, &opts)
	}

	/// Without variables the template is returned as stored.
	fn format(&self, key: &str, template: &str, locale: &str, vars: Option<&Variables>) -> String {
		let Some(vars) = vars else {
			return template.to_string();
		};
		let vars = if self.options.escapes_html() {
			let mut v = vars.clone();
			escape::escape_variables(&mut v);
			v
		} else {
			vars.clone()
		};
		let formatted = MessageFormat::new(template, locale, &self.options.formats).and_then(|mf| mf.format(&vars));
		match formatted {
			Ok(s) => s,
			Err(e) => {
				self.warn(Warning::FormatFailure { key: key.to_string(), reason: e.to_string() });
				template.to_string()
			}
		}
	}

	fn warn(&self, w: Warning) { (self.warning_handler)(&w); }
}
