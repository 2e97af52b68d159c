//! Date and time rendering for `{x, date, ...}` and `{x, time, ...}`.
//!
//! Instants are rendered in UTC through ICU4X semantic field sets. A preset
//! picks the field set; the locale's CLDR patterns decide order, names and
//! the hour cycle.

use chrono::{DateTime, Datelike, Timelike, Utc};
use icu::{
	calendar::{Date, Iso},
	datetime::{
		fieldsets::{
			self,
			enums::{DateAndTimeFieldSet, DateFieldSet, TimeFieldSet},
		},
		input::{self, Time},
		options::Length,
		DateTimeFormatter,
	},
};

use super::{icu_locale, FormatError};
use crate::formats::{DateTimeFormat, MonthStyle};

/// Named months read as long, abbreviated as medium, numeric as short.
fn date_length(p: &DateTimeFormat) -> Length {
	match p.month {
		Some(MonthStyle::Long) => Length::Long,
		Some(MonthStyle::Short) => Length::Medium,
		_ => Length::Short,
	}
}

fn to_icu(at: &DateTime<Utc>) -> Result<input::DateTime<Iso>, FormatError> {
	let invalid = || FormatError::InvalidStyle(format!("date out of range: {at}"));
	let date = Date::try_new_iso(at.year(), at.month() as u8, at.day() as u8).map_err(|_| invalid())?;
	let time = Time::try_new(at.hour() as u8, at.minute() as u8, at.second() as u8, at.nanosecond() % 1_000_000_000).map_err(|_| invalid())?;
	Ok(input::DateTime { date, time })
}

fn locale_error(e: impl std::fmt::Display) -> FormatError { FormatError::LocaleData(e.to_string()) }

pub fn format_datetime(at: &DateTime<Utc>, locale: &str, preset: &DateTimeFormat) -> Result<String, FormatError> {
	let value = to_icu(at)?;
	let prefs = icu_locale(locale);
	let len = date_length(preset);
	let mut out = match (preset.has_date(), preset.has_time()) {
		(true, true) => {
			let ymd = fieldsets::YMD::for_length(len);
			let set = if preset.second.is_some() { ymd.with_time_hms() } else { ymd.with_time_hm() };
			let fmt = DateTimeFormatter::<DateAndTimeFieldSet>::try_new(prefs.into(), DateAndTimeFieldSet::YMDT(set)).map_err(locale_error)?;
			fmt.format(&value).to_string()
		}
		(true, false) => {
			let set = if preset.weekday.is_some() {
				DateFieldSet::YMDE(fieldsets::YMDE::for_length(len))
			} else {
				DateFieldSet::YMD(fieldsets::YMD::for_length(len))
			};
			let fmt = DateTimeFormatter::<DateFieldSet>::try_new(prefs.into(), set).map_err(locale_error)?;
			fmt.format(&value).to_string()
		}
		(false, true) => {
			let t = if preset.second.is_some() { fieldsets::T::hms() } else { fieldsets::T::hm() };
			let fmt = DateTimeFormatter::<TimeFieldSet>::try_new(prefs.into(), TimeFieldSet::T(t.with_length(Length::Medium))).map_err(locale_error)?;
			fmt.format(&value).to_string()
		}
		(false, false) => String::new(),
	};
	if preset.has_time() && preset.time_zone_name.is_some() {
		out.push_str(" UTC");
	}
	Ok(out)
}
