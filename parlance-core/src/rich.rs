//! Rich (HTML) message results and default-message chaining.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Explicit message descriptor: a key plus the text to use when it is missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDescriptor {
	pub id: String,
	#[serde(default)]
	pub default_message: String,
}

impl MessageDescriptor {
	pub fn new(id: impl Into<String>, default_message: impl Into<String>) -> Self {
		Self { id: id.into(), default_message: default_message.into() }
	}
}

/// `value` unless it is empty, otherwise `fallback`.
pub fn with_default(value: impl Into<String>, fallback: &str) -> String {
	let value = value.into();
	if value.is_empty() { fallback.to_string() } else { value }
}

/// A formatted message meant to be rendered as HTML.
///
/// The composed string is trusted as-is: only interpolated variables were
/// escaped, the template itself is emitted raw. [`Display`](fmt::Display)
/// wraps it in a `<span>`; [`RichContent::as_html`] yields the inner markup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RichContent {
	html: String,
}

impl RichContent {
	pub fn from_html(html: impl Into<String>) -> Self { Self { html: html.into() } }

	pub fn empty() -> Self { Self::default() }

	pub fn as_html(&self) -> &str { &self.html }

	pub fn into_html(self) -> String { self.html }

	pub fn is_empty(&self) -> bool { self.html.is_empty() }

	/// Keep `self` when it has content, otherwise use `fallback` as raw HTML.
	pub fn default_message(self, fallback: &str) -> Self {
		if self.is_empty() { Self::from_html(fallback) } else { self }
	}
}

impl fmt::Display for RichContent {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.html.is_empty() {
			return Ok(());
		}
		write!(f, "<span>{}</span>", self.html)
	}
}
