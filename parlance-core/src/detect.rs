//! Locale detection from the host environment.
//!
//! Three signals are consulted, in priority order: a URL query parameter,
//! a cookie, and the host's preferred language. The host is reached only
//! through [`Environment`], so detection runs the same in a browser shell,
//! a server request handler or a test.

use cookie::Cookie;
use serde::{Deserialize, Serialize};
use url::Url;

/// Read-only view of the host a locale is detected from.
pub trait Environment {
	/// Current URL, absolute (`https://host/p?lang=fr`) or just a query (`?lang=fr`).
	fn current_url(&self) -> Option<String>;
	/// Raw `Cookie` header value (`a=1; lang=fr-FR`).
	fn current_cookies(&self) -> Option<String>;
	/// The host's preferred language tag.
	fn preferred_language(&self) -> Option<String>;
}

/// Which query parameter and cookie carry the locale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectOptions {
	pub url_locale_key: Option<String>,
	pub cookie_locale_key: Option<String>,
}

impl DetectOptions {
	pub fn new() -> Self { Self::default() }

	pub fn url_key(mut self, key: impl Into<String>) -> Self {
		self.url_locale_key = Some(key.into());
		self
	}

	pub fn cookie_key(mut self, key: impl Into<String>) -> Self {
		self.cookie_locale_key = Some(key.into());
		self
	}
}

/// Value of query parameter `param` in the current URL.
pub fn locale_from_query(env: &dyn Environment, param: &str) -> Option<String> {
	let raw = env.current_url()?;
	if let Ok(url) = Url::parse(&raw) {
		return url.query_pairs().find(|(k, _)| k == param).map(|(_, v)| v.into_owned());
	}
	let (_, query) = raw.split_once('?')?;
	let query = query.split('#').next().unwrap_or("");
	url::form_urlencoded::parse(query.as_bytes()).find(|(k, _)| k == param).map(|(_, v)| v.into_owned())
}

/// Value of cookie `name` in the current cookie header, percent-decoded.
pub fn locale_from_cookie(env: &dyn Environment, name: &str) -> Option<String> {
	let header = env.current_cookies()?;
	Cookie::split_parse_encoded(header.as_str())
		.filter_map(Result::ok)
		.find(|c| c.name() == name)
		.map(|c| c.value().to_string())
}

pub fn locale_from_environment(env: &dyn Environment) -> Option<String> { env.preferred_language() }

/// First non-empty of: query parameter, cookie, host language.
pub fn determine_locale(env: &dyn Environment, opts: &DetectOptions) -> Option<String> {
	let from_query = || opts.url_locale_key.as_deref().and_then(|k| locale_from_query(env, k));
	let from_cookie = || opts.cookie_locale_key.as_deref().and_then(|k| locale_from_cookie(env, k));
	let detected = non_empty(from_query())
		.or_else(|| non_empty(from_cookie()))
		.or_else(|| non_empty(locale_from_environment(env)));
	tracing::debug!(locale = detected.as_deref().unwrap_or(""), "determined locale");
	detected
}

fn non_empty(v: Option<String>) -> Option<String> { v.filter(|s| !s.is_empty()) }

/// Fixed environment, for tests and for server handlers that already hold
/// the request's URL and cookie header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticEnvironment {
	pub url: Option<String>,
	pub cookies: Option<String>,
	pub language: Option<String>,
}

impl StaticEnvironment {
	pub fn new() -> Self { Self::default() }

	pub fn with_url(mut self, url: impl Into<String>) -> Self {
		self.url = Some(url.into());
		self
	}

	pub fn with_cookies(mut self, cookies: impl Into<String>) -> Self {
		self.cookies = Some(cookies.into());
		self
	}

	pub fn with_language(mut self, language: impl Into<String>) -> Self {
		self.language = Some(language.into());
		self
	}
}

impl Environment for StaticEnvironment {
	fn current_url(&self) -> Option<String> { self.url.clone() }
	fn current_cookies(&self) -> Option<String> { self.cookies.clone() }
	fn preferred_language(&self) -> Option<String> { self.language.clone() }
}

/// The running process: CGI-style `QUERY_STRING` / `HTTP_COOKIE`, and the
/// POSIX locale variables (`LC_ALL`, `LC_MESSAGES`, `LANG`).
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
	fn current_url(&self) -> Option<String> {
		std::env::var("QUERY_STRING").ok().map(|q| format!("?{q}"))
	}

	fn current_cookies(&self) -> Option<String> { std::env::var("HTTP_COOKIE").ok() }

	fn preferred_language(&self) -> Option<String> {
		["LC_ALL", "LC_MESSAGES", "LANG"]
			.iter()
			.filter_map(|var| std::env::var(var).ok())
			.find_map(|v| normalize_posix_locale(&v))
	}
}

/// `en_US.UTF-8` → `en-US`; `C` and `POSIX` carry no language.
pub fn normalize_posix_locale(raw: &str) -> Option<String> {
	let base = raw.split(['.', '@']).next().unwrap_or("").trim();
	if base.is_empty() || base == "C" || base == "POSIX" {
		return None;
	}
	let mut parts = base.split(['_', '-']);
	let lang = parts.next()?.to_ascii_lowercase();
	Some(match parts.next() {
		Some(region) if !region.is_empty() => format!("{lang}-{}", region.to_ascii_uppercase()),
		_ => lang,
	})
}
