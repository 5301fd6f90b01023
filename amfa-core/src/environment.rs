//! Dependency injection primitives shared across service environments.

use chrono::{DateTime, Utc};

/// Abstracts time so reducers and scoring logic are deterministic under test.
///
/// Production code uses [`SystemClock`]; tests use a fixed clock so that
/// boundary behaviors (e.g. the odd-hour rule) are exercised exactly.
pub trait Clock: Send + Sync {
    /// The current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Clock backed by the operating system's wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
