//! Locale-aware number rendering for `{x, number, ...}` and plural `#`.
//!
//! Digits, grouping and separators come from ICU4X CLDR data. Percent and
//! currency affixes are placed here.

use fixed_decimal::{Decimal, FloatPrecision};
use icu::decimal::{
	options::{DecimalFormatterOptions, GroupingStrategy},
	DecimalFormatter,
};

use super::{icu_locale, lang_code, FormatError};
use crate::formats::{NumberFormat, NumberStyle};

/// Languages whose CLDR percent and currency patterns put a no-break space
/// before the sign and the currency symbol after the amount.
const TRAILING_AFFIX: &[&str] = &["cs", "da", "de", "el", "es", "fi", "fr", "hu", "it", "nb", "no", "pl", "pt", "ru", "sk", "sv", "uk"];

fn trailing_affix(locale: &str) -> bool {
	let lang = lang_code(locale);
	TRAILING_AFFIX.contains(&lang.as_str()) && locale.replace('_', "-") != "pt-BR"
}

fn currency_symbol(code: &str) -> String {
	match code.to_ascii_uppercase().as_str() {
		"USD" => "$".into(),
		"EUR" => "€".into(),
		"GBP" => "£".into(),
		"JPY" | "CNY" => "¥".into(),
		"KRW" => "₩".into(),
		"INR" => "₹".into(),
		other => other.to_string(),
	}
}

/// Render `value` with the given preset for `locale`.
pub fn format_number(value: f64, locale: &str, preset: &NumberFormat) -> Result<String, FormatError> {
	if value.is_nan() {
		return Ok("NaN".into());
	}
	let scaled = if preset.style == NumberStyle::Percent { value * 100.0 } else { value };
	let digits = if scaled.is_infinite() {
		if scaled < 0.0 { "-∞".to_string() } else { "∞".to_string() }
	} else {
		let (min, max) = preset.fraction_digits();
		render_digits(scaled, locale, min, max, preset.use_grouping)?
	};
	let trailing = trailing_affix(locale);
	Ok(match preset.style {
		NumberStyle::Decimal => digits,
		NumberStyle::Percent if trailing => format!("{digits}\u{a0}%"),
		NumberStyle::Percent => format!("{digits}%"),
		NumberStyle::Currency => {
			let code = preset.currency.as_deref().ok_or_else(|| FormatError::InvalidStyle("currency code is required with currency style".into()))?;
			let symbol = currency_symbol(code);
			let (sign, amount) = match digits.strip_prefix('-') {
				Some(rest) => ("-", rest),
				None => ("", digits.as_str()),
			};
			if trailing {
				format!("{sign}{amount}\u{a0}{symbol}")
			} else if symbol.chars().count() > 1 {
				format!("{sign}{symbol}\u{a0}{amount}")
			} else {
				format!("{sign}{symbol}{amount}")
			}
		}
	})
}

fn render_digits(value: f64, locale: &str, min: usize, max: usize, grouping: bool) -> Result<String, FormatError> {
	let mut decimal = Decimal::try_from_f64(value, FloatPrecision::RoundTrip).map_err(|e| FormatError::InvalidStyle(format!("unrepresentable number {value}: {e:?}")))?;
	let limit = -(max as i16);
	if *decimal.magnitude_range().start() < limit {
		decimal.round(limit);
	}
	decimal.trim_end();
	decimal.pad_end(-(min as i16));

	let mut options = DecimalFormatterOptions::default();
	if !grouping {
		options.grouping_strategy = Some(GroupingStrategy::Never);
	}
	let formatter = DecimalFormatter::try_new(icu_locale(locale).into(), options).map_err(|e| FormatError::LocaleData(e.to_string()))?;
	Ok(formatter.format(&decimal).to_string())
}
