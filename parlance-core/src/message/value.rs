use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt};

/// A value substituted into a message placeholder.
///
/// Deserialization is untagged: RFC 3339 strings become [`Value::DateTime`],
/// other strings stay [`Value::String`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
	Bool(bool),
	Number(f64),
	DateTime(DateTime<Utc>),
	String(String),
}

impl Value {
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::String(s) => Some(s),
			_ => None,
		}
	}

	/// Numeric view: numbers as-is, strings when they parse as a number.
	pub fn as_number(&self) -> Option<f64> {
		match self {
			Self::Number(n) => Some(*n),
			Self::String(s) => s.trim().parse().ok(),
			_ => None,
		}
	}

	/// Instant view: datetimes as-is, numbers as milliseconds since the epoch,
	/// strings when they parse as RFC 3339.
	pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
		match self {
			Self::DateTime(d) => Some(*d),
			Self::Number(ms) if ms.is_finite() => DateTime::from_timestamp_millis(*ms as i64),
			Self::String(s) => DateTime::parse_from_rfc3339(s.trim()).ok().map(|d| d.with_timezone(&Utc)),
			_ => None,
		}
	}
}

impl fmt::Display for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Bool(b) => write!(f, "{b}"),
			Self::Number(n) => write!(f, "{n}"),
			Self::String(s) => f.write_str(s),
			Self::DateTime(d) => f.write_str(&d.to_rfc3339()),
		}
	}
}

impl From<&str> for Value {
	fn from(v: &str) -> Self { Self::String(v.to_string()) }
}

impl From<String> for Value {
	fn from(v: String) -> Self { Self::String(v) }
}

impl From<bool> for Value {
	fn from(v: bool) -> Self { Self::Bool(v) }
}

impl From<DateTime<Utc>> for Value {
	fn from(v: DateTime<Utc>) -> Self { Self::DateTime(v) }
}

macro_rules! number_from {
	($($t:ty),*) => {
		$(impl From<$t> for Value {
			fn from(v: $t) -> Self { Self::Number(v as f64) }
		})*
	};
}

number_from!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize, f32, f64);

/// Placeholder name → value mapping for a single formatting call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Variables(BTreeMap<String, Value>);

impl Variables {
	pub fn new() -> Self { Self::default() }

	/// Builder-style insert.
	pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
		self.insert(name, value);
		self
	}

	pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
		self.0.insert(name.into(), value.into());
	}

	pub fn get(&self, name: &str) -> Option<&Value> { self.0.get(name) }

	pub fn is_empty(&self) -> bool { self.0.is_empty() }

	pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
		self.0.iter().map(|(k, v)| (k.as_str(), v))
	}

	pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut Value)> {
		self.0.iter_mut().map(|(k, v)| (k.as_str(), v))
	}
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Variables {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
	}
}
