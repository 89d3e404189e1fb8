//! Confirmation prompt abstraction
//!
//! Destructive bulk actions can ask the operator before each removal.
//! The prompt sits behind a trait so the engine stays testable: the CLI
//! wires in [`Interactive`] (dialoguer), non-interactive runs use
//! [`AcceptAll`], and tests script answers with [`Scripted`].

use std::cell::RefCell;
use std::collections::VecDeque;

use dialoguer::Confirm;

use crate::TrawlError;

/// Yes/no confirmation for a destructive action on one entry
pub trait ConfirmPrompt {
    /// Ask whether to `operation` the `kind` at `path`. `Ok(false)` is a
    /// normal decline, not an error.
    fn confirm(&self, operation: &str, kind: &str, path: &str) -> Result<bool, TrawlError>;
}

/// Terminal prompt; re-asks until a yes/no answer is given
#[derive(Debug, Default)]
pub struct Interactive;

impl ConfirmPrompt for Interactive {
    fn confirm(&self, operation: &str, kind: &str, path: &str) -> Result<bool, TrawlError> {
        Confirm::new()
            .with_prompt(format!("OK to {operation} {kind} {path}?"))
            .default(false)
            .interact()
            .map_err(|e| TrawlError::InvalidInput(format!("confirmation prompt failed: {e}")))
    }
}

/// Non-interactive default: every action proceeds
#[derive(Debug, Default)]
pub struct AcceptAll;

impl ConfirmPrompt for AcceptAll {
    fn confirm(&self, _operation: &str, _kind: &str, _path: &str) -> Result<bool, TrawlError> {
        Ok(true)
    }
}

/// Predetermined answers for tests, consumed in order
#[derive(Debug, Default)]
pub struct Scripted {
    answers: RefCell<VecDeque<bool>>,
}

impl Scripted {
    #[must_use]
    pub fn new(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            answers: RefCell::new(answers.into_iter().collect()),
        }
    }
}

impl ConfirmPrompt for Scripted {
    fn confirm(&self, _operation: &str, _kind: &str, _path: &str) -> Result<bool, TrawlError> {
        Ok(self.answers.borrow_mut().pop_front().unwrap_or(false))
    }
}
