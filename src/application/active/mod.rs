//! Active Configuration Module
//!
//! ## Structure
//!
//! - `options` - Configuration types (`ActiveConfigOptions`)
//! - `use_case` - Core use case logic (`ActiveConfigService`)
//!
//! ## Usage
//!
//! ```ignore
//! use ledgerpack::application::{ActiveConfigOptions, ActiveConfigService};
//! use ledgerpack::infrastructure::{FsPinStore, FsSetCatalog};
//!
//! let service = ActiveConfigService::new(FsSetCatalog::new(), FsPinStore::new(), ActiveConfigOptions::new("sets"));
//! let pack = service.get_active_config("ACME", as_of, None)?;
//! ```

mod options;
mod use_case;

pub use options::ActiveConfigOptions;
pub use use_case::ActiveConfigService;
