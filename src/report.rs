//! report
//!
//! Structured build reporting.
//!
//! # Design
//!
//! The original logging collaborator had four call shapes (info, warn,
//! error-with-exception, error-message-only). Here they collapse into one
//! structured [`StepEvent`] carrying a severity, a step name, an optional
//! elapsed duration, and an optional error rendering. The pipeline emits
//! events through the [`ReportSink`] trait and stays decoupled from any
//! concrete sink.
//!
//! [`ConsoleSink`] is the production sink; it respects the verbosity derived
//! from `--quiet`/`--debug`. [`MemorySink`] records events for tests.

use std::fmt::Write as _;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

/// Event severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warn,
    Error,
}

/// One structured report event.
#[derive(Debug, Clone, PartialEq)]
pub struct StepEvent {
    /// Event severity.
    pub severity: Severity,
    /// Step name or message.
    pub step: String,
    /// Elapsed seconds for the step, when timed.
    pub elapsed_secs: Option<f64>,
    /// Rendered error, for error events that carry one.
    pub error: Option<String>,
    /// Wall-clock time of the event.
    pub at: DateTime<Utc>,
}

impl StepEvent {
    fn new(severity: Severity, step: impl Into<String>) -> Self {
        Self {
            severity,
            step: step.into(),
            elapsed_secs: None,
            error: None,
            at: Utc::now(),
        }
    }

    /// An informational event.
    pub fn info(step: impl Into<String>) -> Self {
        Self::new(Severity::Info, step)
    }

    /// A warning event.
    pub fn warn(step: impl Into<String>) -> Self {
        Self::new(Severity::Warn, step)
    }

    /// An error event without an underlying error value.
    pub fn error(step: impl Into<String>) -> Self {
        Self::new(Severity::Error, step)
    }

    /// An error event wrapping an underlying error.
    pub fn error_with(step: impl Into<String>, error: &dyn std::fmt::Display) -> Self {
        let mut event = Self::new(Severity::Error, step);
        event.error = Some(error.to_string());
        event
    }

    /// Attach an elapsed duration.
    pub fn with_elapsed(mut self, elapsed: std::time::Duration) -> Self {
        self.elapsed_secs = Some(elapsed.as_secs_f64());
        self
    }

    /// Render the event as a single line.
    pub fn render(&self) -> String {
        let mut line = self.step.clone();
        if let Some(secs) = self.elapsed_secs {
            // Matches the step-timing format of the build report,
            // nanosecond precision.
            let _ = write!(line, " ({:.9}s)", secs);
        }
        if let Some(error) = &self.error {
            let _ = write!(line, ": {}", error);
        }
        line
    }
}

/// Sink for report events.
pub trait ReportSink {
    /// Emit one event.
    fn emit(&self, event: StepEvent);
}

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Quiet mode - warnings and errors only
    Quiet,
    /// Normal mode - standard output
    Normal,
    /// Debug mode - verbose output
    Debug,
}

impl Verbosity {
    /// Create verbosity from flags.
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if debug {
            Verbosity::Debug
        } else {
            Verbosity::Normal
        }
    }
}

/// Console sink: info to stdout, warnings and errors to stderr.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleSink {
    verbosity: Verbosity,
}

impl ConsoleSink {
    /// Create a console sink with the given verbosity.
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }
}

impl ReportSink for ConsoleSink {
    fn emit(&self, event: StepEvent) {
        match event.severity {
            Severity::Info => {
                if self.verbosity != Verbosity::Quiet {
                    println!("{}", event.render());
                }
            }
            Severity::Warn => eprintln!("warning: {}", event.render()),
            Severity::Error => eprintln!("error: {}", event.render()),
        }
    }
}

/// In-memory sink recording every event, for tests.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share state.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    events: Arc<Mutex<Vec<StepEvent>>>,
}

impl MemorySink {
    /// Create an empty memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded events, in emission order.
    pub fn events(&self) -> Vec<StepEvent> {
        self.events.lock().expect("report sink lock poisoned").clone()
    }

    /// Rendered lines of all recorded events.
    pub fn lines(&self) -> Vec<String> {
        self.events().iter().map(StepEvent::render).collect()
    }

    /// Whether any recorded event's step contains the needle.
    pub fn contains(&self, needle: &str) -> bool {
        self.events().iter().any(|e| e.step.contains(needle))
    }

    /// Events of one severity.
    pub fn with_severity(&self, severity: Severity) -> Vec<StepEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.severity == severity)
            .collect()
    }
}

impl ReportSink for MemorySink {
    fn emit(&self, event: StepEvent) {
        self.events
            .lock()
            .expect("report sink lock poisoned")
            .push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn render_includes_elapsed_with_nanosecond_precision() {
        let event = StepEvent::info("Finished step").with_elapsed(Duration::from_millis(1500));
        assert_eq!(event.render(), "Finished step (1.500000000s)");
    }

    #[test]
    fn plain_error_renders_without_a_cause() {
        let event = StepEvent::error("FATAL: Failure trying to perform build");
        assert_eq!(event.severity, Severity::Error);
        assert_eq!(event.render(), "FATAL: Failure trying to perform build");
    }

    #[test]
    fn render_includes_error() {
        let err = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let event = StepEvent::error_with("Error writing metadata", &err);
        assert_eq!(event.render(), "Error writing metadata: disk full");
    }

    #[test]
    fn memory_sink_records_in_order() {
        let sink = MemorySink::new();
        sink.emit(StepEvent::info("first"));
        sink.emit(StepEvent::warn("second"));

        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].step, "first");
        assert_eq!(events[1].severity, Severity::Warn);
    }

    #[test]
    fn memory_sink_clones_share_state() {
        let sink = MemorySink::new();
        let clone = sink.clone();
        clone.emit(StepEvent::info("shared"));
        assert!(sink.contains("shared"));
    }

    #[test]
    fn verbosity_from_flags() {
        assert_eq!(Verbosity::from_flags(true, false), Verbosity::Quiet);
        assert_eq!(Verbosity::from_flags(false, true), Verbosity::Debug);
        assert_eq!(Verbosity::from_flags(false, false), Verbosity::Normal);
        // Quiet wins when both are set.
        assert_eq!(Verbosity::from_flags(true, true), Verbosity::Quiet);
    }
}
