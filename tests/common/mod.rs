//! Common test utilities for ledgerpack scenario and contract tests.
//!
//! This module provides:
//! - `SetsFixture`: an isolated sets root in a temp directory
//! - `TestEnv`-style helpers to run the `ledgerpack` binary
//! - Fixtures: reusable configuration set content

#![allow(dead_code)]

pub mod env;
pub mod fixtures;

pub use env::*;
pub use fixtures::*;
