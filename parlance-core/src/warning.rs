//! Recoverable conditions reported through the store's warning handler.

use std::{fmt, sync::Arc};

/// Callback receiving every recoverable lookup, format and load failure.
///
/// Handlers must not panic; the store keeps going after calling them.
pub type WarningHandler = Arc<dyn Fn(&Warning) + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
	/// The requested locale has no dictionary in the store.
	LocaleNotLoaded { locale: String },
	/// The key is absent from the current locale and from the fallback locale (if any).
	KeyNotFound { key: String, locale: String, fallback: Option<String> },
	/// The formatting engine rejected the template or the variables.
	FormatFailure { key: String, reason: String },
	/// The locale data bundle could not be fetched.
	RemoteLoadFailure { locale: String, url: String, reason: String },
	/// No locale data bundle URL is configured for the language.
	UnsupportedLanguage { locale: String },
}

impl Warning {
	/// Short machine-friendly name, used as the `kind` log field.
	pub fn kind(&self) -> &'static str {
		match self {
			Self::LocaleNotLoaded { .. } => "locale_not_loaded",
			Self::KeyNotFound { .. } => "key_not_found",
			Self::FormatFailure { .. } => "format_failure",
			Self::RemoteLoadFailure { .. } => "remote_load_failure",
			Self::UnsupportedLanguage { .. } => "unsupported_language",
		}
	}

	pub fn message(&self) -> String {
		match self {
			Self::LocaleNotLoaded { locale } => format!("locale data \"{locale}\" does not exist"),
			Self::KeyNotFound { key, locale, fallback: None } => {
				format!("key \"{key}\" not defined in {locale}")
			}
			Self::KeyNotFound { key, locale, fallback: Some(fb) } => {
				format!("key \"{key}\" not defined in {locale} or the fallback locale, {fb}")
			}
			Self::FormatFailure { key, .. } => format!("format message failed for key='{key}'"),
			Self::RemoteLoadFailure { locale, url, .. } => {
				format!("locale data for \"{locale}\" was not loaded from {url}")
			}
			Self::UnsupportedLanguage { locale } => format!("language \"{locale}\" is not supported"),
		}
	}

	/// Underlying cause, when there is one.
	pub fn detail(&self) -> Option<&str> {
		match self {
			Self::FormatFailure { reason, .. } | Self::RemoteLoadFailure { reason, .. } => Some(reason),
			_ => None,
		}
	}
}

impl fmt::Display for Warning {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.message())?;
		if let Some(detail) = self.detail() {
			write!(f, ": {detail}")?;
		}
		Ok(())
	}
}

/// Handler installed when the caller provides none: one `warn!` event per warning.
pub fn tracing_handler() -> WarningHandler {
	Arc::new(|w: &Warning| {
		tracing::warn!(kind = w.kind(), detail = w.detail().unwrap_or(""), "{}", w.message());
	})
}
