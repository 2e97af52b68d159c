// End-to-end locale flow
//
// Fixture dictionaries on disk → init with a slow loader → detect the locale
// from a request → look up and format messages, with warnings recorded.

use std::sync::Arc;
use std::time::Duration;

use parlance_core::{IntlOptions, MessageDescriptor, StaticEnvironment, Variables, Warning};
use parlance_integration_tests::{DelayedLoader, LocaleFixture, TestHarness, TestResult};
use serde_json::json;

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().with_max_level(tracing::Level::DEBUG).try_init();
}

fn fixtures(harness: &mut TestHarness) -> TestResult<()> {
    harness.add_locale(LocaleFixture::json(
        "en-US",
        json!({
            "welcome": "Welcome back, {user}!",
            "inbox": "{count, plural, =0 {Your inbox is empty} one {# new message} other {# new messages}}",
            "cart": { "total": "Total: {amount, number, EUR}" },
            "only_en": "English only"
        }),
    ))?;
    harness.add_locale(LocaleFixture::toml(
        "de-DE",
        "welcome = \"Willkommen zurück, {user}!\"\ninbox = \"{count, plural, one {# neue Nachricht} other {# neue Nachrichten}}\"\n\n[cart]\ntotal = \"Summe: {amount, number, EUR}\"\n",
    ))?;
    Ok(())
}

fn options() -> IntlOptions {
    let mut opts = IntlOptions::new("en-US").with_fallback("en-US");
    opts.url_locale_key = Some("lang".into());
    opts.cookie_locale_key = Some("lang".into());
    opts.common_locale_data_urls.insert("en".into(), "https://cdn.test/locale-data/en.js".into());
    opts.common_locale_data_urls.insert("de".into(), "https://cdn.test/locale-data/de-missing.js".into());
    opts.formats.number.insert("EUR".into(), parlance_core::NumberFormat::currency("EUR"));
    opts
}

#[tokio::test]
async fn request_driven_locale_switch() -> TestResult<()> {
    init_tracing();
    let mut harness = TestHarness::new()?;
    fixtures(&mut harness)?;

    let loader = Arc::new(DelayedLoader::new(Duration::from_millis(20)));
    let mut intl = harness.build(options(), Some(loader.clone())).await?;
    assert_eq!(loader.fetched(), vec!["https://cdn.test/locale-data/en.js"]);
    assert!(harness.recorder.warnings().is_empty());

    let vars = Variables::new().with("user", "Mia");
    assert_eq!(intl.get("welcome", Some(&vars))?, "Welcome back, Mia!");

    let request = StaticEnvironment::new().with_url("https://shop.test/cart?lang=de-DE").with_language("en-US");
    let locale = intl.determine_locale(&request).unwrap_or_else(|| "en-US".into());
    intl.set_current_locale(locale);

    assert_eq!(intl.get("welcome", Some(&vars))?, "Willkommen zurück, Mia!");
    assert_eq!(intl.get("inbox", Some(&Variables::new().with("count", 3)))?, "3 neue Nachrichten");
    assert_eq!(intl.get("cart.total", Some(&Variables::new().with("amount", 1234.5)))?, "Summe: 1.234,50\u{a0}€");
    assert_eq!(intl.get("only_en", None)?, "English only");
    assert!(harness.recorder.warnings().is_empty());
    Ok(())
}

#[tokio::test]
async fn failed_bundle_load_still_initializes() -> TestResult<()> {
    init_tracing();
    let mut harness = TestHarness::new()?;
    fixtures(&mut harness)?;

    let loader = Arc::new(DelayedLoader::new(Duration::from_millis(5)).failing_when("missing"));
    let mut opts = options();
    opts.current_locale = Some("de-DE".into());
    let intl = harness.build(opts, Some(loader)).await?;

    assert_eq!(harness.recorder.kinds(), vec!["remote_load_failure"]);
    assert_eq!(intl.get("inbox", Some(&Variables::new().with("count", 1)))?, "1 neue Nachricht");
    Ok(())
}

#[tokio::test]
async fn missing_keys_and_defaults() -> TestResult<()> {
    init_tracing();
    let mut harness = TestHarness::new()?;
    fixtures(&mut harness)?;
    let mut intl = harness.build(options(), None).await?;
    harness.recorder.clear();

    assert_eq!(intl.get("nope", None)?, "");
    let desc = MessageDescriptor::new("nope", "Default text");
    assert_eq!(intl.format_message(&desc, None)?, "Default text");
    assert_eq!(harness.recorder.warnings().len(), 2);
    assert_eq!(
        harness.recorder.warnings()[0],
        Warning::KeyNotFound { key: "nope".into(), locale: "en-US".into(), fallback: Some("en-US".into()) }
    );

    intl.set_current_locale("pt-BR");
    harness.recorder.clear();
    assert_eq!(intl.get("welcome", None)?, "");
    assert_eq!(harness.recorder.kinds(), vec!["locale_not_loaded"]);
    Ok(())
}

#[tokio::test]
async fn markup_variables_are_escaped_in_html_output() -> TestResult<()> {
    init_tracing();
    let mut harness = TestHarness::new()?;
    fixtures(&mut harness)?;
    let intl = harness.build(options(), None).await?;

    let vars = Variables::new().with("user", "<img src=x onerror=alert(1)>");
    let html = intl.get_html("welcome", Some(&vars))?;
    assert_eq!(html.as_html(), "Welcome back, &lt;img src=x onerror=alert(1)&gt;!");
    assert!(harness.root().join("en-US.json").exists());
    Ok(())
}
