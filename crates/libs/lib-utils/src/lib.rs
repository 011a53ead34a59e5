//! # Utilities Library
//!
//! Shared utility functions for base64 wire encoding and input validation.

pub mod b64;
pub mod validation;

// Re-export commonly used functions
pub use b64::{b64_encode, b64_decode};
pub use validation::{validate_not_empty, validate_color_code, is_color_code};
