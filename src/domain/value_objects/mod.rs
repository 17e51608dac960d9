//! Domain Value Objects
//!
//! Immutable value types that represent domain concepts.

mod attribute;
mod hash;
mod scope;
mod status;
mod window;

pub use attribute::{AttrValue, AttributeSource, EventAttributes, Number, NumberError, MAX_SCALE};
pub use hash::{preview, Checksum, Fingerprint, PREVIEW_LEN};
pub use scope::{Dimension, Scope, ScopeQuery, WILDCARD};
pub use status::ConfigStatus;
pub use window::{format_date, parse_date, EffectiveWindow, DATE_FORMAT};
