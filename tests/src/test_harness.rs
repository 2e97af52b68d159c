// Test harness for Parlance integration tests
//
// Provides infrastructure for:
// - Locale dictionaries written to a temporary directory
// - Recording warnings raised by the store
// - Locale data loaders with simulated latency and failures

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use parlance_core::{InitOptions, Intl, IntlOptions, LocaleDataLoader, Warning, WarningHandler};
use tempfile::TempDir;
use tracing::{debug, info};

/// Test result type alias
pub type TestResult<T> = Result<T>;

/// A locale dictionary to write into the fixture directory.
#[derive(Debug, Clone)]
pub struct LocaleFixture {
    pub locale: String,
    /// File name including extension (`en-US.json`, `fr.toml`).
    pub file_name: String,
    pub contents: String,
}

impl LocaleFixture {
    pub fn json(locale: &str, value: serde_json::Value) -> Self {
        Self { locale: locale.into(), file_name: format!("{locale}.json"), contents: value.to_string() }
    }

    pub fn toml(locale: &str, contents: &str) -> Self {
        Self { locale: locale.into(), file_name: format!("{locale}.toml"), contents: contents.into() }
    }
}

/// Collects every warning the store reports.
#[derive(Debug, Clone, Default)]
pub struct WarningRecorder {
    seen: Arc<Mutex<Vec<Warning>>>,
}

impl WarningRecorder {
    pub fn handler(&self) -> WarningHandler {
        let seen = self.seen.clone();
        Arc::new(move |w: &Warning| {
            debug!(kind = w.kind(), "warning recorded");
            if let Ok(mut v) = seen.lock() {
                v.push(w.clone());
            }
        })
    }

    pub fn warnings(&self) -> Vec<Warning> {
        self.seen.lock().map(|v| v.clone()).unwrap_or_default()
    }

    pub fn kinds(&self) -> Vec<&'static str> {
        self.warnings().iter().map(Warning::kind).collect()
    }

    pub fn clear(&self) {
        if let Ok(mut v) = self.seen.lock() {
            v.clear();
        }
    }
}

/// Loader that sleeps before answering and fails for URLs containing `fail_marker`.
#[derive(Debug, Clone)]
pub struct DelayedLoader {
    pub latency: Duration,
    pub fail_marker: Option<String>,
    fetched: Arc<Mutex<Vec<String>>>,
}

impl DelayedLoader {
    pub fn new(latency: Duration) -> Self {
        Self { latency, fail_marker: None, fetched: Arc::default() }
    }

    pub fn failing_when(mut self, marker: &str) -> Self {
        self.fail_marker = Some(marker.into());
        self
    }

    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().map(|v| v.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl LocaleDataLoader for DelayedLoader {
    async fn load(&self, url: &str) -> std::result::Result<(), String> {
        tokio::time::sleep(self.latency).await;
        if let Ok(mut v) = self.fetched.lock() {
            v.push(url.to_string());
        }
        match &self.fail_marker {
            Some(m) if url.contains(m.as_str()) => Err(format!("HTTP 404 for {url}")),
            _ => Ok(()),
        }
    }
}

/// Owns the fixture directory and the warning recorder for one test.
pub struct TestHarness {
    dir: TempDir,
    fixtures: Vec<LocaleFixture>,
    pub recorder: WarningRecorder,
}

impl TestHarness {
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir().context("create fixture dir")?;
        Ok(Self { dir, fixtures: Vec::new(), recorder: WarningRecorder::default() })
    }

    pub fn root(&self) -> &Path { self.dir.path() }

    /// Write a fixture to disk and remember it for [`TestHarness::build`].
    pub fn add_locale(&mut self, fixture: LocaleFixture) -> Result<PathBuf> {
        let path = self.dir.path().join(&fixture.file_name);
        std::fs::write(&path, &fixture.contents).with_context(|| format!("write {}", path.display()))?;
        info!(locale = fixture.locale.as_str(), path = %path.display(), "fixture written");
        self.fixtures.push(fixture);
        Ok(path)
    }

    /// Load every fixture from disk into a fresh store and run `init`.
    pub async fn build(&self, options: IntlOptions, loader: Option<Arc<dyn LocaleDataLoader>>) -> Result<Intl> {
        let mut intl = Intl::new();
        for f in &self.fixtures {
            intl.load_file(f.locale.clone(), self.dir.path().join(&f.file_name))
                .with_context(|| format!("load {}", f.file_name))?;
        }
        let mut init = InitOptions::from(options).warning_handler(self.recorder.handler());
        if let Some(loader) = loader {
            init = init.loader(loader);
        }
        intl.init(init).await.context("init store")?;
        Ok(intl)
    }
}
