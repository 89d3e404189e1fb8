//! Diagnostic output for CLI display
//!
//! Warnings are always shown; everything else is gated by verbosity.
//! The no-match warning emitted by the bulk operations is deliberately
//! not suppressible, so scripted runs still see silently-empty patterns.

use std::cell::RefCell;

use colored::Colorize;

/// How much diagnostic output to emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Results and warnings only
    #[default]
    Normal,
    /// Also print per-entry progress notices
    Verbose,
}

/// Sink for diagnostics
///
/// In capturing mode (tests) warnings are recorded instead of printed.
#[derive(Debug, Default)]
pub struct Reporter {
    verbosity: Verbosity,
    captured: Option<RefCell<Vec<String>>>,
}

impl Reporter {
    #[must_use]
    pub fn new(verbose: bool) -> Self {
        Self {
            verbosity: if verbose {
                Verbosity::Verbose
            } else {
                Verbosity::Normal
            },
            captured: None,
        }
    }

    /// A reporter that records warnings instead of printing them.
    #[must_use]
    pub fn capturing() -> Self {
        Self {
            verbosity: Verbosity::Normal,
            captured: Some(RefCell::new(Vec::new())),
        }
    }

    /// Emit a warning. Never suppressed.
    pub fn warn(&self, message: &str) {
        if let Some(captured) = &self.captured {
            captured.borrow_mut().push(message.to_string());
        } else {
            eprintln!("{} {message}", "warning:".yellow().bold());
        }
    }

    /// Emit a progress notice, shown only in verbose mode.
    pub fn info(&self, message: &str) {
        if self.verbosity == Verbosity::Verbose && self.captured.is_none() {
            eprintln!("{message}");
        }
    }

    /// Warnings recorded by a capturing reporter, in emission order.
    #[must_use]
    pub fn warnings(&self) -> Vec<String> {
        self.captured
            .as_ref()
            .map(|c| c.borrow().clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capturing_reporter_records_warnings_in_order() {
        let reporter = Reporter::capturing();
        reporter.warn("first");
        reporter.warn("second");
        assert_eq!(reporter.warnings(), vec!["first", "second"]);
    }

    #[test]
    fn non_capturing_reporter_records_nothing() {
        let reporter = Reporter::new(false);
        assert!(reporter.warnings().is_empty());
    }
}
