//! ICU MessageFormat engine.
//!
//! A [`MessageFormat`] is built per call from a template, a locale and the
//! store's format presets, then rendered against a [`Variables`] map.
//! Plural categories come from CLDR data via `intl_pluralrules`.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Syntax | Unbalanced braces, unknown argument type, no `other` branch | `FormatError::Syntax` from `new` |
//! | Missing variable | `{name}` with no `name` value | `FormatError::MissingArgument` |
//! | Wrong type | `{d, date}` given a bool | `FormatError::InvalidArgumentType` |
//! | Unknown preset | `{n, number, nope}` | `FormatError::UnknownStyle` |
//! | Nesting too deep | More than [`MAX_NESTING`] nested plural/select branches | `FormatError::Syntax` from `new` |

mod datetime;
mod number;
mod parser;
mod value;

pub use parser::{Part, Selector, MAX_NESTING};
pub use value::{Value, Variables};

use crate::formats::{Formats, NumberFormat};
use icu::locale::{locale, Locale};
use intl_pluralrules::{PluralCategory, PluralRuleType, PluralRules};
use thiserror::Error;
use unic_langid::LanguageIdentifier;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
	#[error("syntax error at offset {offset}: {reason}")]
	Syntax { offset: usize, reason: String },
	#[error("a value must be provided for: {0}")]
	MissingArgument(String),
	#[error("value for '{name}' cannot be formatted as {expected}")]
	InvalidArgumentType { name: String, expected: &'static str },
	#[error("unknown {kind} style '{style}'")]
	UnknownStyle { kind: &'static str, style: String },
	#[error("invalid style: {0}")]
	InvalidStyle(String),
	#[error("locale data unavailable: {0}")]
	LocaleData(String),
}

/// Primary language subtag, lowercased: `"pt_BR"` → `"pt"`.
pub(crate) fn lang_code(locale: &str) -> String {
	locale.split(['-', '_']).next().unwrap_or("").to_ascii_lowercase()
}

/// ICU locale for a tag, then its bare language, then `en`.
pub(crate) fn icu_locale(tag: &str) -> Locale {
	tag.replace('_', "-").parse().or_else(|_| lang_code(tag).parse()).unwrap_or(locale!("en"))
}

#[derive(Debug, Clone)]
pub struct MessageFormat<'f> {
	parts: Vec<Part>,
	locale: String,
	formats: &'f Formats,
}

impl<'f> MessageFormat<'f> {
	pub fn new(template: &str, locale: &str, formats: &'f Formats) -> Result<Self, FormatError> {
		Ok(Self { parts: parser::parse(template)?, locale: locale.to_string(), formats })
	}

	pub fn parts(&self) -> &[Part] { &self.parts }

	pub fn format(&self, vars: &Variables) -> Result<String, FormatError> {
		let mut out = String::new();
		self.render(&self.parts, vars, None, &mut out)?;
		Ok(out)
	}

	fn render(&self, parts: &[Part], vars: &Variables, pound: Option<f64>, out: &mut String) -> Result<(), FormatError> {
		for part in parts {
			match part {
				Part::Literal(s) => out.push_str(s),
				Part::Argument(name) => match arg(vars, name)? {
					Value::Number(n) => out.push_str(&number::format_number(*n, &self.locale, &NumberFormat::default())?),
					other => out.push_str(&other.to_string()),
				},
				Part::Number { name, style } => {
					let n = arg(vars, name)?.as_number().ok_or_else(|| type_error(name, "a number"))?;
					let preset = match style.as_deref() {
						None => NumberFormat::default(),
						Some(s) => self.formats.number.get(s).cloned().ok_or_else(|| unknown("number", s))?,
					};
					out.push_str(&number::format_number(n, &self.locale, &preset)?);
				}
				Part::Date { name, style } | Part::Time { name, style } => {
					let (kind, presets) = match part {
						Part::Date { .. } => ("date", &self.formats.date),
						_ => ("time", &self.formats.time),
					};
					let at = arg(vars, name)?.as_datetime().ok_or_else(|| type_error(name, "a date"))?;
					let style = style.as_deref().unwrap_or("medium");
					let preset = presets.get(style).ok_or_else(|| unknown(kind, style))?;
					out.push_str(&datetime::format_datetime(&at, &self.locale, preset)?);
				}
				Part::Plural { name, offset, ordinal, branches } => {
					let n = arg(vars, name)?.as_number().ok_or_else(|| type_error(name, "a number"))?;
					let exact = branches.iter().find(|(sel, _)| matches!(sel, Selector::Exact(v) if *v == n));
					let branch = match exact {
						Some((_, body)) => body,
						None => {
							let category = self.plural_category(n - offset, *ordinal);
							pick(branches, |sel| matches!(sel, Selector::Category(c) if c == category))
								.or_else(|| pick(branches, |sel| matches!(sel, Selector::Category(c) if c == "other")))
								.ok_or_else(|| FormatError::Syntax { offset: 0, reason: "plural argument requires an 'other' branch".into() })?
						}
					};
					self.render(branch, vars, Some(n - offset), out)?;
				}
				Part::Select { name, branches } => {
					let key = match arg(vars, name)? {
						Value::String(s) => s.clone(),
						other => other.to_string(),
					};
					let body = branches
						.iter()
						.find(|(k, _)| *k == key)
						.or_else(|| branches.iter().find(|(k, _)| k == "other"))
						.map(|(_, b)| b)
						.ok_or_else(|| FormatError::Syntax { offset: 0, reason: "select argument requires an 'other' branch".into() })?;
					self.render(body, vars, pound, out)?;
				}
				Part::Pound => match pound {
					Some(n) => out.push_str(&number::format_number(n, &self.locale, &NumberFormat::default())?),
					None => out.push('#'),
				},
			}
		}
		Ok(())
	}

	fn plural_category(&self, n: f64, ordinal: bool) -> &'static str {
		let Some(rules) = plural_rules(&self.locale, ordinal) else { return "other" };
		match rules.select(n) {
			Ok(PluralCategory::ZERO) => "zero",
			Ok(PluralCategory::ONE) => "one",
			Ok(PluralCategory::TWO) => "two",
			Ok(PluralCategory::FEW) => "few",
			Ok(PluralCategory::MANY) => "many",
			Ok(PluralCategory::OTHER) | Err(_) => "other",
		}
	}
}

/// Rules for the full tag, then the bare language, then English.
fn plural_rules(locale: &str, ordinal: bool) -> Option<PluralRules> {
	let candidates = [locale.replace('_', "-"), lang_code(locale), "en".to_string()];
	candidates.iter().filter_map(|tag| tag.parse::<LanguageIdentifier>().ok()).find_map(|id| {
		let kind = if ordinal { PluralRuleType::ORDINAL } else { PluralRuleType::CARDINAL };
		PluralRules::create(id, kind).ok()
	})
}

fn pick<'a>(branches: &'a [(Selector, Vec<Part>)], pred: impl Fn(&Selector) -> bool) -> Option<&'a Vec<Part>> {
	branches.iter().find(|(s, _)| pred(s)).map(|(_, b)| b)
}

fn arg<'v>(vars: &'v Variables, name: &str) -> Result<&'v Value, FormatError> {
	vars.get(name).ok_or_else(|| FormatError::MissingArgument(name.to_string()))
}

fn type_error(name: &str, expected: &'static str) -> FormatError {
	FormatError::InvalidArgumentType { name: name.to_string(), expected }
}

fn unknown(kind: &'static str, style: &str) -> FormatError {
	FormatError::UnknownStyle { kind, style: style.to_string() }
}
