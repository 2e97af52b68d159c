//! HTML escaping for interpolated variables.

use crate::message::{Value, Variables};

/// Escape `&`, `<`, `>`, `"` and `'` for safe inclusion in HTML text or
/// attribute values.
pub fn escape_html(input: &str) -> String {
	let mut out = String::with_capacity(input.len() + input.len() / 8);
	for c in input.chars() {
		match c {
			'&' => out.push_str("&amp;"),
			'<' => out.push_str("&lt;"),
			'>' => out.push_str("&gt;"),
			'"' => out.push_str("&quot;"),
			'\'' => out.push_str("&#39;"),
			_ => out.push(c),
		}
	}
	out
}

/// Heuristic: a value is treated as markup when it contains both `<` and `>`.
pub fn looks_like_html(value: &str) -> bool { value.contains('<') && value.contains('>') }

/// Escape, in place, every string variable that looks like markup.
pub fn escape_variables(vars: &mut Variables) {
	for (_, value) in vars.iter_mut() {
		if let Value::String(s) = value {
			if looks_like_html(s) {
				*s = escape_html(s);
			}
		}
	}
}
