//! # Core Library
//!
//! Core models, configuration, and error types shared by the Solana client
//! layer, the submission controller, and the web front-end.

pub mod config;
pub mod error;
pub mod model;

// Re-export commonly used types
pub use config::{Cluster, Commitment, DeploymentDescriptor, NetworkConfig};
pub use error::{AppError, Result};
pub use model::{ColorEntry, RecordState, Session};
