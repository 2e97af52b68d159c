//! Named number/date/time presets referenced from message templates,
//! e.g. `{price, number, currency}` or `{when, date, long}`.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumberStyle {
	#[default]
	Decimal,
	Percent,
	Currency,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NumberFormat {
	pub style: NumberStyle,
	/// ISO 4217 code, required by the currency style.
	pub currency: Option<String>,
	pub minimum_fraction_digits: Option<usize>,
	pub maximum_fraction_digits: Option<usize>,
	pub use_grouping: bool,
}

impl Default for NumberFormat {
	fn default() -> Self {
		Self { style: NumberStyle::Decimal, currency: None, minimum_fraction_digits: None, maximum_fraction_digits: None, use_grouping: true }
	}
}

impl NumberFormat {
	pub fn with_style(style: NumberStyle) -> Self { Self { style, ..Self::default() } }

	pub fn currency(code: impl Into<String>) -> Self {
		Self { style: NumberStyle::Currency, currency: Some(code.into()), ..Self::default() }
	}

	/// (min, max) fraction digits after applying the style's defaults.
	pub fn fraction_digits(&self) -> (usize, usize) {
		let (min, max) = match self.style {
			NumberStyle::Decimal => (0, 3),
			NumberStyle::Percent => (0, 0),
			NumberStyle::Currency => {
				let d = self.currency.as_deref().map(currency_digits).unwrap_or(2);
				(d, d)
			}
		};
		let min = self.minimum_fraction_digits.unwrap_or(min);
		let max = self.maximum_fraction_digits.unwrap_or(max).max(min);
		(min, max)
	}
}

fn currency_digits(code: &str) -> usize {
	match code.to_ascii_uppercase().as_str() {
		"JPY" | "KRW" | "VND" | "CLP" | "ISK" => 0,
		"BHD" | "KWD" | "OMR" | "TND" => 3,
		_ => 2,
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Digits {
	#[serde(rename = "numeric")]
	Numeric,
	#[serde(rename = "2-digit")]
	TwoDigit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MonthStyle {
	#[serde(rename = "numeric")]
	Numeric,
	#[serde(rename = "2-digit")]
	TwoDigit,
	#[serde(rename = "short")]
	Short,
	#[serde(rename = "long")]
	Long,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameStyle {
	Short,
	Long,
}

/// Component selection for a date or time preset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DateTimeFormat {
	pub weekday: Option<NameStyle>,
	pub year: Option<Digits>,
	pub month: Option<MonthStyle>,
	pub day: Option<Digits>,
	pub hour: Option<Digits>,
	pub minute: Option<Digits>,
	pub second: Option<Digits>,
	pub time_zone_name: Option<NameStyle>,
}

impl DateTimeFormat {
	pub fn has_date(&self) -> bool {
		self.weekday.is_some() || self.year.is_some() || self.month.is_some() || self.day.is_some()
	}

	pub fn has_time(&self) -> bool {
		self.hour.is_some() || self.minute.is_some() || self.second.is_some()
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Formats {
	pub number: BTreeMap<String, NumberFormat>,
	pub date: BTreeMap<String, DateTimeFormat>,
	pub time: BTreeMap<String, DateTimeFormat>,
}

static DEFAULT_FORMATS: Lazy<Formats> = Lazy::new(|| {
	use Digits::*;
	let mut f = Formats::default();
	f.number.insert("integer".into(), NumberFormat { maximum_fraction_digits: Some(0), ..NumberFormat::default() });
	f.number.insert("currency".into(), NumberFormat::with_style(NumberStyle::Currency));
	f.number.insert("percent".into(), NumberFormat::with_style(NumberStyle::Percent));

	f.date.insert("short".into(), DateTimeFormat { month: Some(MonthStyle::Numeric), day: Some(Numeric), year: Some(TwoDigit), ..Default::default() });
	f.date.insert("medium".into(), DateTimeFormat { month: Some(MonthStyle::Short), day: Some(Numeric), year: Some(Numeric), ..Default::default() });
	f.date.insert("long".into(), DateTimeFormat { month: Some(MonthStyle::Long), day: Some(Numeric), year: Some(Numeric), ..Default::default() });
	f.date.insert(
		"full".into(),
		DateTimeFormat { weekday: Some(NameStyle::Long), month: Some(MonthStyle::Long), day: Some(Numeric), year: Some(Numeric), ..Default::default() },
	);

	f.time.insert("short".into(), DateTimeFormat { hour: Some(Numeric), minute: Some(Numeric), ..Default::default() });
	f.time.insert("medium".into(), DateTimeFormat { hour: Some(Numeric), minute: Some(Numeric), second: Some(Numeric), ..Default::default() });
	let long = DateTimeFormat { hour: Some(Numeric), minute: Some(Numeric), second: Some(Numeric), time_zone_name: Some(NameStyle::Short), ..Default::default() };
	f.time.insert("long".into(), long.clone());
	f.time.insert("full".into(), long);
	f
});

impl Formats {
	/// Built-in presets: `integer`, `currency`, `percent` for numbers and
	/// `short`, `medium`, `long`, `full` for dates and times.
	pub fn defaults() -> &'static Formats { &DEFAULT_FORMATS }

	/// Overlay `other` onto `self`, preset by preset.
	pub fn merge(&mut self, other: Formats) {
		self.number.extend(other.number);
		self.date.extend(other.date);
		self.time.extend(other.time);
	}

	/// The built-in presets with `self` layered on top.
	pub fn with_defaults(self) -> Formats {
		let mut merged = Formats::defaults().clone();
		merged.merge(self);
		merged
	}
}
