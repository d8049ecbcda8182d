//! Core business rules free of I/O

pub mod progress;
pub mod validation;

pub use progress::{rounded_percentage, truncated_percentage};
