//! Per-locale message dictionaries.
//!
//! A dictionary is a tree: leaves are message templates, inner nodes are
//! groups. Keys address leaves with `.`-separated paths. A flat key that
//! itself contains dots (`"menu.file.open": "..."`) wins over the nested
//! path with the same spelling.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fs, path::Path};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Entry {
	Message(String),
	Group(BTreeMap<String, Entry>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dictionary {
	entries: BTreeMap<String, Entry>,
}

impl Dictionary {
	pub fn new() -> Self { Self::default() }

	/// Insert a message under a flat key. Dots in `key` are kept verbatim.
	pub fn insert(&mut self, key: impl Into<String>, template: impl Into<String>) -> &mut Self {
		self.entries.insert(key.into(), Entry::Message(template.into()));
		self
	}

	/// Insert a nested group under `key`.
	pub fn insert_group(&mut self, key: impl Into<String>, group: Dictionary) -> &mut Self {
		self.entries.insert(key.into(), Entry::Group(group.entries));
		self
	}

	/// Resolve `key` to a template: the flat key first, then descent on `.`.
	///
	/// Groups are never returned; a path that ends on a group is a miss.
	pub fn lookup(&self, key: &str) -> Option<&str> {
		if let Some(Entry::Message(m)) = self.entries.get(key) {
			return Some(m);
		}
		let mut segments = key.split('.');
		let mut node = self.entries.get(segments.next()?)?;
		for seg in segments {
			node = match node {
				Entry::Group(children) => children.get(seg)?,
				Entry::Message(_) => return None,
			};
		}
		match node {
			Entry::Message(m) => Some(m),
			Entry::Group(_) => None,
		}
	}

	/// Deep-merge `other` into `self`. Groups merge recursively; any other
	/// overlap is replaced by the incoming entry.
	pub fn merge(&mut self, other: Dictionary) {
		merge_entries(&mut self.entries, other.entries);
	}

	/// Number of messages, counting nested ones.
	pub fn len(&self) -> usize { count(&self.entries) }

	pub fn is_empty(&self) -> bool { self.len() == 0 }

	/// All message keys as dot paths, in sorted order.
	pub fn keys(&self) -> Vec<String> {
		let mut out = Vec::new();
		collect_keys(&self.entries, "", &mut out);
		out
	}

	/// Read a dictionary from a `.json` or `.toml` file.
	pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let data = fs::read_to_string(path)?;
		match path.extension().and_then(|e| e.to_str()) {
			Some("json") => Ok(serde_json::from_str(&data)?),
			Some("toml") => Ok(toml::from_str(&data)?),
			other => Err(Error::config(format!("unsupported dictionary format: {}", other.unwrap_or("<none>")))),
		}
	}
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Dictionary {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		let mut d = Dictionary::new();
		for (k, v) in iter {
			d.insert(k, v);
		}
		d
	}
}

fn merge_entries(into: &mut BTreeMap<String, Entry>, from: BTreeMap<String, Entry>) {
	for (key, incoming) in from {
		match (into.get_mut(&key), incoming) {
			(Some(Entry::Group(existing)), Entry::Group(children)) => merge_entries(existing, children),
			(_, incoming) => {
				into.insert(key, incoming);
			}
		}
	}
}

fn count(entries: &BTreeMap<String, Entry>) -> usize {
	entries
		.values()
		.map(|e| match e {
			Entry::Message(_) => 1,
			Entry::Group(children) => count(children),
		})
		.sum()
}

fn collect_keys(entries: &BTreeMap<String, Entry>, prefix: &str, out: &mut Vec<String>) {
	for (k, e) in entries {
		let path = if prefix.is_empty() { k.clone() } else { format!("{prefix}.{k}") };
		match e {
			Entry::Message(_) => out.push(path),
			Entry::Group(children) => collect_keys(children, &path, out),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	fn sample() -> Dictionary {
		serde_json::from_str(
			r#"{
				"title": "Home",
				"menu": { "file": { "open": "Open", "close": "Close" } },
				"menu.file.open": "Open…"
			}"#,
		)
		.unwrap()
	}

	#[test]
	fn flat_key_wins_over_nested_path() {
		let d = sample();
		assert_eq!(d.lookup("menu.file.open"), Some("Open…"));
		assert_eq!(d.lookup("menu.file.close"), Some("Close"));
		assert_eq!(d.lookup("title"), Some("Home"));
	}

	#[test]
	fn groups_and_overlong_paths_miss() {
		let d = sample();
		assert_eq!(d.lookup("menu.file"), None);
		assert_eq!(d.lookup("title.sub"), None);
		assert_eq!(d.lookup("nope"), None);
		assert_eq!(d.lookup(""), None);
	}

	#[test]
	fn empty_message_is_found() {
		let mut d = Dictionary::new();
		d.insert("blank", "");
		assert_eq!(d.lookup("blank"), Some(""));
	}

	#[test]
	fn merge_is_deep_and_last_write_wins() {
		let mut d = sample();
		let incoming: Dictionary = serde_json::from_str(r#"{ "menu": { "file": { "close": "Close all", "save": "Save" } }, "title": "Start" }"#).unwrap();
		d.merge(incoming);
		assert_eq!(d.lookup("menu.file.close"), Some("Close all"));
		assert_eq!(d.lookup("menu.file.save"), Some("Save"));
		assert_eq!(d.lookup("menu.file.open"), Some("Open…"));
		assert_eq!(d.lookup("title"), Some("Start"));
		assert_eq!(d.len(), 5);
	}

	#[test]
	fn keys_are_dot_paths() {
		let keys = sample().keys();
		assert_eq!(keys, vec!["menu.file.close", "menu.file.open", "menu.file.open", "title"]);
	}

	#[test]
	fn loads_toml_and_rejects_unknown_extension() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("fr-FR.toml");
		fs::write(&path, "greeting = \"Bonjour\"\n[cart]\nitems = \"{n} articles\"\n").unwrap();
		let d = Dictionary::load_from_file(&path).unwrap();
		assert_eq!(d.lookup("greeting"), Some("Bonjour"));
		assert_eq!(d.lookup("cart.items"), Some("{n} articles"));

		let bad = dir.path().join("fr-FR.yaml");
		fs::write(&bad, "greeting: Bonjour").unwrap();
		assert!(matches!(Dictionary::load_from_file(&bad), Err(Error::Config(_))));
	}

	proptest! {
		#[test]
		fn nested_paths_resolve(segments in prop::collection::vec("[a-z]{1,6}", 1..5), value in "[^{}']{0,12}") {
			let mut leaf = Dictionary::new();
			leaf.insert(segments[segments.len() - 1].clone(), value.clone());
			let dict = segments[..segments.len() - 1].iter().rev().fold(leaf, |inner, seg| {
				let mut outer = Dictionary::new();
				outer.insert_group(seg.clone(), inner);
				outer
			});
			prop_assert_eq!(dict.lookup(&segments.join(".")), Some(value.as_str()));
		}
	}
}
