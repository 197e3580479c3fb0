//! Cross-tool launch-flag precedence resolution.
//!
//! Different agent CLIs expose overlapping but non-identical
//! autonomy/sandbox/approval flags. This crate collects every user- or
//! config-supplied flag mention as a [`FlagOccurrence`], then resolves
//! them per target tool into a concrete argument list plus human-readable
//! warnings about what was dropped or overridden.

pub mod occurrence;
pub mod resolvers;

pub use occurrence::{FlagOccurrence, FlagScan, FlagSource, FlagValue, ForwardResolution};
pub use resolvers::resolve_for_tool;
