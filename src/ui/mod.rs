//! Terminal and JSON output for the binary.

pub mod error;
pub mod json;
pub mod logging;
