//! Registry of all suites, and the process-wide run entry points

use crate::context::TestContext;
use crate::error::{RunError, RunResult};
use crate::registration::{Registration, TestDescriptor};
use crate::reporter::{try_default_reporter, Reporter};
use crate::suite::Suite;
use std::sync::{Mutex, MutexGuard, OnceLock, TryLockError};
use tracing::{debug, info};

/// Suites in registration order
#[derive(Debug, Clone, Default)]
pub struct Registry {
    suites: Vec<Suite>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from static registrations.
    ///
    /// Registrations are sorted by source file, then line, so tests keep
    /// their declaration order within a file and files run in path order.
    /// A suite's position is that of its first test.
    pub fn from_registrations<'a>(registrations: impl IntoIterator<Item = &'a Registration>) -> Self {
        let mut registrations: Vec<&Registration> = registrations.into_iter().collect();
        registrations.sort_by(|a, b| a.file.cmp(b.file).then(a.line.cmp(&b.line)));

        let mut registry = Self::new();
        for registration in registrations {
            registry.add(registration.suite, registration.descriptor());
        }
        registry
    }

    /// The process-wide registry holding every `test_case!` declaration
    pub fn global() -> &'static Mutex<Registry> {
        static GLOBAL: OnceLock<Mutex<Registry>> = OnceLock::new();
        GLOBAL.get_or_init(|| {
            let registry = Registry::from_registrations(inventory::iter::<Registration>);
            debug!(
                suites = registry.suites.len(),
                tests = registry.test_count(),
                "test registry built"
            );
            Mutex::new(registry)
        })
    }

    /// Add a test, creating its suite on first use
    pub fn add(&mut self, suite_name: &str, descriptor: TestDescriptor) {
        match self.suites.iter_mut().find(|s| s.name() == suite_name) {
            Some(suite) => suite.add(descriptor),
            None => {
                let mut suite = Suite::new(suite_name);
                suite.add(descriptor);
                self.suites.push(suite);
            }
        }
    }

    pub fn suite(&self, name: &str) -> Option<&Suite> {
        self.suites.iter().find(|s| s.name() == name)
    }

    pub fn suites(&self) -> &[Suite] {
        &self.suites
    }

    pub fn test_count(&self) -> usize {
        self.suites.iter().map(Suite::len).sum()
    }

    /// Enable or disable a suite; unknown names are ignored
    pub fn set_enabled(&mut self, name: &str, enabled: bool) {
        if let Some(suite) = self.suites.iter_mut().find(|s| s.name() == name) {
            suite.enable(enabled);
        }
    }

    /// Run one suite by name, even if it is disabled, and return the
    /// number of failed tests reported by `reporter.summary()`
    pub fn run(
        &self,
        suite_name: &str,
        reporter: &mut dyn Reporter,
        max_time_ms: u64,
    ) -> RunResult<u32> {
        let suite = self
            .suite(suite_name)
            .ok_or_else(|| RunError::SuiteNotFound(suite_name.to_string()))?;

        info!(suite = suite_name, max_time_ms, "running suite");
        {
            let ctx = TestContext::new(&mut *reporter);
            suite.execute(&ctx, max_time_ms, true);
        }
        Ok(reporter.summary())
    }

    /// Run every suite in registration order
    pub fn run_all(&self, reporter: &mut dyn Reporter, max_time_ms: u64) -> u32 {
        info!(
            suites = self.suites.len(),
            tests = self.test_count(),
            max_time_ms,
            "running all suites"
        );
        {
            let ctx = TestContext::new(&mut *reporter);
            for suite in &self.suites {
                suite.run_tests(&ctx, max_time_ms);
            }
        }
        reporter.summary()
    }
}

/// Lock the global registry for one run.
///
/// Runs are not reentrant: a test that tries to start another run gets
/// [`RunError::RunInProgress`].
pub(crate) fn lock_global() -> RunResult<MutexGuard<'static, Registry>> {
    match Registry::global().try_lock() {
        Ok(guard) => Ok(guard),
        Err(TryLockError::Poisoned(poisoned)) => Ok(poisoned.into_inner()),
        Err(TryLockError::WouldBlock) => Err(RunError::RunInProgress),
    }
}

/// Run all registered tests with the default console reporter.
///
/// The registry is locked before the reporter, so a nested call from a
/// test fails with [`RunError::RunInProgress`] instead of waiting forever.
/// The reporter's counts start from zero on every call.
pub fn run_all_tests() -> RunResult<u32> {
    let registry = lock_global()?;
    let mut reporter = try_default_reporter()?;
    reporter.clear();
    Ok(registry.run_all(&mut *reporter, 0))
}

pub fn run_all_tests_with(reporter: &mut dyn Reporter, max_time_ms: u64) -> RunResult<u32> {
    let registry = lock_global()?;
    Ok(registry.run_all(reporter, max_time_ms))
}

/// Run one registered suite with the default console reporter
pub fn run_suite(suite_name: &str) -> RunResult<u32> {
    let registry = lock_global()?;
    let mut reporter = try_default_reporter()?;
    reporter.clear();
    registry.run(suite_name, &mut *reporter, 0)
}

pub fn run_suite_with(
    suite_name: &str,
    reporter: &mut dyn Reporter,
    max_time_ms: u64,
) -> RunResult<u32> {
    let registry = lock_global()?;
    registry.run(suite_name, reporter, max_time_ms)
}

pub fn enable_suite(suite_name: &str) -> RunResult<()> {
    lock_global()?.set_enabled(suite_name, true);
    Ok(())
}

pub fn disable_suite(suite_name: &str) -> RunResult<()> {
    lock_global()?.set_enabled(suite_name, false);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::failure::{Abort, TestResult};
    use crate::reporter::{DeferredReporter, SilentReporter};
    use crate::test::{self, BoxedCase};
    use rstest::rstest;

    fn ok_body(_t: &TestContext<'_>) -> TestResult {
        Ok(())
    }

    fn failing_body(t: &TestContext<'_>) -> TestResult {
        t.report_failure("reg.rs", 1, "nope");
        Ok(())
    }

    fn ok_case() -> Result<BoxedCase, Abort> {
        test::plain(ok_body)
    }

    fn failing_case() -> Result<BoxedCase, Abort> {
        test::plain(failing_body)
    }

    fn sample() -> Registry {
        let registrations = [
            Registration::new("Beta", "b2", "b.rs", 20, failing_case),
            Registration::new("Alpha", "a2", "a.rs", 30, ok_case),
            Registration::new("Beta", "b1", "b.rs", 10, ok_case),
            Registration::new("Alpha", "a1", "a.rs", 5, ok_case),
        ];
        Registry::from_registrations(registrations.iter())
    }

    #[test]
    fn test_registrations_ordered_by_location() {
        let registry = sample();
        let order: Vec<(&str, Vec<&str>)> = registry
            .suites()
            .iter()
            .map(|s| (s.name(), s.tests().iter().map(|t| t.name.as_str()).collect()))
            .collect();
        assert_eq!(
            order,
            vec![("Alpha", vec!["a1", "a2"]), ("Beta", vec!["b1", "b2"])]
        );
        assert_eq!(registry.test_count(), 4);
    }

    #[test]
    fn test_run_all_returns_failed_count() {
        let registry = sample();
        let mut reporter = SilentReporter::default();
        assert_eq!(registry.run_all(&mut reporter, 0), 1);
        assert_eq!(reporter.counters().suites, 2);
        assert_eq!(reporter.counters().total_tests, 4);
    }

    #[test]
    fn test_unknown_suite_is_an_error() {
        let registry = sample();
        let mut reporter = SilentReporter::default();
        let err = registry.run("Gamma", &mut reporter, 0).unwrap_err();
        assert!(matches!(err, RunError::SuiteNotFound(ref name) if name == "Gamma"));
        assert_eq!(reporter.counters().suites, 0);
    }

    #[rstest]
    #[case::enabled(true)]
    #[case::disabled(false)]
    fn test_run_by_name_ignores_enabled_flag(#[case] enabled: bool) {
        let mut registry = sample();
        registry.set_enabled("Beta", enabled);
        let mut reporter = DeferredReporter::new();
        assert_eq!(registry.run("Beta", &mut reporter, 0).unwrap(), 1);
        assert_eq!(reporter.counters().total_tests, 2);
    }

    #[test]
    fn test_run_all_skips_disabled_suites() {
        let mut registry = sample();
        registry.set_enabled("Beta", false);
        registry.set_enabled("NoSuchSuite", false);

        let mut reporter = DeferredReporter::new();
        assert_eq!(registry.run_all(&mut reporter, 0), 0);
        assert_eq!(reporter.counters().suites, 2);
        assert_eq!(reporter.counters().total_tests, 2);
    }
}
