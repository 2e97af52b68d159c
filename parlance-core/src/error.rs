use thiserror::Error;

pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Failures that are returned to the caller.
///
/// Lookup and formatting problems are not errors: they are reported as
/// [`Warning`](crate::warning::Warning)s and degrade to an empty or raw
/// result. Only a missing required argument aborts a call.
#[derive(Debug, Error)]
pub enum Error {
	#[error("invalid argument: {0}")]
	InvalidArgument(String),
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	#[error("json: {0}")]
	Json(#[from] serde_json::Error),
	#[error("toml: {0}")]
	Toml(#[from] toml::de::Error),
	#[error("config: {0}")]
	Config(String),
}

impl Error {
	pub fn invalid_argument(msg: impl Into<String>) -> Self { Self::InvalidArgument(msg.into()) }
	pub fn config(msg: impl Into<String>) -> Self { Self::Config(msg.into()) }
}
