//! Flags - typed properties attached to regions
//!
//! [`FlagDef`] describes one flag and parses its textual form,
//! [`FlagRegistry`] is the table of known flags and [`FlagResolver`] reads
//! and writes flag values through the region hierarchy.

mod definition;
mod registry;
mod resolver;
mod value;

pub use definition::{FlagDef, FlagKind, ParseContext, RegionGroup, SetElement, StateValue};
pub use registry::{normalize_flag_name, FlagRegistry};
pub use resolver::FlagResolver;
pub use value::FlagValue;
