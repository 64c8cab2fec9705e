//! Test context port

/// Port through which a failed execution reports to the test framework.
///
/// A failure marks the enclosing scenario as failed; it never stops other
/// scenarios.
pub trait TestContext {
    /// Reports the combined failure message of one execution.
    fn fail(&mut self, message: &str);
}

/// Context that panics with the failure message, failing the current `#[test]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PanicContext;

impl TestContext for PanicContext {
    #[allow(clippy::panic)]
    fn fail(&mut self, message: &str) {
        panic!("{message}");
    }
}

/// Context that collects failure messages instead of failing the test.
#[derive(Debug, Clone, Default)]
pub struct RecordingContext {
    failures: Vec<String>,
}

impl RecordingContext {
    /// Creates an empty context.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            failures: Vec::new(),
        }
    }

    /// Returns every reported message.
    #[must_use]
    pub fn failures(&self) -> &[String] {
        &self.failures
    }

    /// Returns true if anything was reported.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn is_failed(&self) -> bool {
        !self.failures.is_empty()
    }
}

impl TestContext for RecordingContext {
    fn fail(&mut self, message: &str) {
        self.failures.push(message.to_string());
    }
}
