//! Locale data bundle loading run by `Intl::init`.
//!
//! Browser hosts fetch a per-language bundle (CLDR data, polyfills) before
//! messages are formatted. The fetch itself belongs to the host, which
//! provides a [`LocaleDataLoader`]; hosts that ship their data up front
//! install none and the step is skipped.

use async_trait::async_trait;
use std::{
	collections::BTreeMap,
	sync::{Arc, Mutex},
};

use crate::warning::Warning;

#[async_trait]
pub trait LocaleDataLoader: Send + Sync {
	/// Fetch and install the bundle at `url`. Errors are reported as a
	/// warning; they never fail initialization.
	async fn load(&self, url: &str) -> Result<(), String>;
}

/// Language prefix used to select a bundle: `zh-Hant_TW` → `zh`.
pub fn language_prefix(locale: &str) -> &str {
	let lang = locale.split('-').next().unwrap_or(locale);
	lang.split('_').next().unwrap_or(lang)
}

/// Run the load step for `locale`, returning the warning to report, if any.
pub(crate) async fn load_locale_data(
	loader: Option<&dyn LocaleDataLoader>,
	urls: &BTreeMap<String, String>,
	locale: &str,
) -> Option<Warning> {
	let Some(loader) = loader else {
		tracing::debug!(locale, "no locale data loader installed; skipping bundle load");
		return None;
	};
	let Some(url) = urls.get(language_prefix(locale)) else {
		return Some(Warning::UnsupportedLanguage { locale: locale.to_string() });
	};
	match loader.load(url).await {
		Ok(()) => {
			tracing::debug!(locale, url = url.as_str(), "locale data loaded");
			None
		}
		Err(reason) => Some(Warning::RemoteLoadFailure { locale: locale.to_string(), url: url.clone(), reason }),
	}
}

/// Loader that records requested URLs and succeeds unless the URL is listed
/// as failing. Useful for hosts under test.
#[derive(Debug, Default, Clone)]
pub struct RecordingLoader {
	requested: Arc<Mutex<Vec<String>>>,
	failing: Vec<String>,
}

impl RecordingLoader {
	pub fn new() -> Self { Self::default() }

	pub fn failing_on(mut self, url: impl Into<String>) -> Self {
		self.failing.push(url.into());
		self
	}

	pub fn requested(&self) -> Vec<String> {
		self.requested.lock().map(|v| v.clone()).unwrap_or_default()
	}
}

#[async_trait]
impl LocaleDataLoader for RecordingLoader {
	async fn load(&self, url: &str) -> Result<(), String> {
		if let Ok(mut v) = self.requested.lock() {
			v.push(url.to_string());
		}
		if self.failing.iter().any(|f| f == url) {
			return Err(format!("failed to fetch {url}"));
		}
		Ok(())
	}
}
