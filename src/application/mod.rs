//! Application Layer
//!
//! Use cases that orchestrate the business flow.
//! This layer:
//! - Depends on Domain layer (entities, services, ports)
//! - Does NOT contain business rules (those are in Domain)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Use Cases
//!
//! - `ActiveConfigService` - Resolve, compile, verify and audit the set governing a legal entity on a date
//! - `CompilePipeline` - Assemble, validate and compile one set directory

pub mod active;
pub mod pipeline;

pub use active::{ActiveConfigOptions, ActiveConfigService};
pub use pipeline::{compile_set_dir, CompilePipeline};
