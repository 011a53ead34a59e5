//! # Application Library
//!
//! The submission controller driving the rainbow page, and the diagnostic sink
//! it reports failures to.

pub mod controller;
pub mod diagnostics;

pub use controller::{ActionKind, ControllerState, ControllerView, SubmissionController};
pub use diagnostics::{Diagnostic, DiagnosticSink, Operation, RecordingSink, TracingSink};
