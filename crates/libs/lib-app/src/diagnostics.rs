//! Diagnostic sink
//!
//! Every remote-facing controller operation reports its failures here instead of
//! surfacing them as UI errors.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use lib_core::error::AppError;
use tracing::warn;

/// Controller operation that produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    AutoConnect,
    Connect,
    FetchRecord,
    InitializeRecord,
    AppendColor,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::AutoConnect => write!(f, "auto-connect"),
            Operation::Connect => write!(f, "connect"),
            Operation::FetchRecord => write!(f, "fetch-record"),
            Operation::InitializeRecord => write!(f, "initialize-record"),
            Operation::AppendColor => write!(f, "append-color"),
        }
    }
}

/// One recorded failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub operation: Operation,
    pub error: AppError,
}

pub trait DiagnosticSink {
    fn record(&self, operation: Operation, error: &AppError);
}

/// Forwards diagnostics to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn record(&self, operation: Operation, error: &AppError) {
        warn!(code = error.code(), "{} failed: {}", operation, error);
    }
}

/// Keeps the most recent diagnostics in memory (ring buffer).
///
/// Clones share the same buffer, so the front-end can hand one clone to the
/// controller and render from another.
#[derive(Debug, Clone)]
pub struct RecordingSink {
    entries: Rc<RefCell<VecDeque<Diagnostic>>>,
    capacity: usize,
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::with_capacity(100)
    }
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Rc::new(RefCell::new(VecDeque::with_capacity(capacity))),
            capacity: capacity.max(1),
        }
    }

    /// Recorded diagnostics, oldest first.
    pub fn entries(&self) -> Vec<Diagnostic> {
        self.entries.borrow().iter().cloned().collect()
    }

    pub fn last(&self) -> Option<Diagnostic> {
        self.entries.borrow().back().cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl DiagnosticSink for RecordingSink {
    fn record(&self, operation: Operation, error: &AppError) {
        // Also keep the log trail
        TracingSink.record(operation, error);

        let mut entries = self.entries.borrow_mut();
        if entries.len() >= self.capacity {
            entries.pop_front();
        }
        entries.push_back(Diagnostic {
            operation,
            error: error.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_sink_is_bounded() {
        let sink = RecordingSink::with_capacity(2);
        sink.record(Operation::Connect, &AppError::NoWalletFound);
        sink.record(Operation::FetchRecord, &AppError::RecordNotFound("gone".to_string()));
        sink.record(Operation::AppendColor, &AppError::SubmissionFailed("boom".to_string()));

        let entries = sink.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].operation, Operation::FetchRecord);
        assert_eq!(sink.last().unwrap().error, AppError::SubmissionFailed("boom".to_string()));
    }

    #[test]
    fn test_clones_share_the_buffer() {
        let sink = RecordingSink::new();
        let observer = sink.clone();
        sink.record(Operation::InitializeRecord, &AppError::NoSession);

        assert_eq!(observer.len(), 1);
    }
}
