// Integration test support for Parlance end-to-end tests
//
// Provides fixture locale directories on disk, a warning recorder and a
// loader with simulated latency so the full init → detect → lookup flow can
// be driven the way a host application would.

pub mod test_harness;

pub use test_harness::{DelayedLoader, LocaleFixture, TestHarness, TestResult, WarningRecorder};
