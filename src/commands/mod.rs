//! Command entry points for the `ledgerpack` binary.

mod active;
mod check;
mod compile;
mod diff;
mod pin;
mod select;

pub use active::cmd_active;
pub use check::cmd_check;
pub use compile::{cmd_compile, cmd_fingerprint};
pub use diff::cmd_diff;
pub use pin::cmd_pin;
pub use select::{cmd_select, SelectArgs};

use ledgerpack::config::Config;
use ledgerpack::CompilePipeline;

/// Pipeline using the guard identifiers from tool configuration.
fn pipeline(config: &Config) -> CompilePipeline {
    CompilePipeline::new().with_vocabulary(config.guard_vocabulary())
}
