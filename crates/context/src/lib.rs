//! Tool-activity extraction, summarization, and handoff rendering.
//!
//! Turns a normalized [`baton_core::SessionRecord`] into a bounded
//! [`baton_core::SessionHandoff`]: classify every tool invocation, capture
//! size-capped structured samples, and render a deterministic Markdown
//! document for injection into a different agent tool.

pub mod classify;
pub mod collector;
pub mod diffs;
pub mod extract;
pub mod render;
pub mod textutil;

pub use classify::classify;
pub use collector::SummaryCollector;
pub use extract::extract_handoff;
pub use render::RenderMode;
