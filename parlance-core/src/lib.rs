#![forbid(unsafe_code)]

//! Parlance: locale-aware message lookup and formatting.
//!
//! An [`Intl`] store holds per-locale [`Dictionary`] trees, resolves dotted
//! keys against the current locale with a single fallback locale, and
//! formats templates in ICU MessageFormat syntax (arguments, `plural`,
//! `selectordinal`, `select`, and `number`/`date`/`time` presets). String
//! variables that look like markup are HTML-escaped before interpolation
//! unless the store is told otherwise.
//!
//! ```
//! use parlance_core::{Dictionary, Intl, IntlOptions, Variables};
//!
//! let dict: Dictionary = [("hello", "Hello, {name}")].into_iter().collect();
//! let mut intl = Intl::new();
//! futures::executor::block_on(intl.init(IntlOptions::new("en-US").with_locale("en-US", dict))).unwrap();
//! let vars = Variables::new().with("name", "Ada");
//! assert_eq!(intl.get("hello", Some(&vars)).unwrap(), "Hello, Ada");
//! ```

pub mod config;
pub mod detect;
pub mod dictionary;
pub mod error;
pub mod escape;
pub mod formats;
pub mod intl;
pub mod loader;
pub mod logging;
pub mod message;
pub mod rich;
pub mod warning;

pub use config::IntlOptions;
pub use detect::{determine_locale, DetectOptions, Environment, ProcessEnvironment, StaticEnvironment};
pub use dictionary::{Dictionary, Entry};
pub use error::{Error, Result};
pub use formats::{DateTimeFormat, Formats, NumberFormat, NumberStyle};
pub use intl::{InitOptions, Intl, Resolution};
pub use loader::{LocaleDataLoader, RecordingLoader};
pub use message::{FormatError, MessageFormat, Value, Variables};
pub use rich::{with_default, MessageDescriptor, RichContent};
pub use warning::{Warning, WarningHandler};
