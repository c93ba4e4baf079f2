//! Progress reporting for conversion runs.
//!
//! The pipeline reports a monotonically non-decreasing fraction in `[0, 1]`
//! together with a human-readable status string: a small fixed allowance for
//! summary generation, another for document analysis, then a proportional
//! share per selected page, finishing at exactly 1.0 after final assembly.
//!
//! Callbacks are informational only. The pipeline never blocks on them and
//! never bases control flow on what a reporter does; a reporter that panics
//! is the caller's bug, not the library's.

/// Receives progress events as the pipeline advances.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Implementations must be `Send + Sync`.
pub trait ProgressReporter: Send + Sync {
    /// Called with the current overall fraction (`0.0..=1.0`) and a status
    /// line describing what the pipeline is doing right now.
    ///
    /// Successive fractions within one run never decrease; the same fraction
    /// may be reported several times with different status text while a
    /// single page moves through its stages.
    fn report(&self, progress: f32, status: &str) {
        let _ = (progress, status);
    }
}

/// A no-op reporter for callers that don't need progress events.
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {}
