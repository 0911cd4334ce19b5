// Layout engine: font metrics, greedy text flow, and the shared layout tree
// both painters consume. Everything here is pure and synchronous.

pub mod flow;
pub mod font_metrics;
pub mod tree;

// Re-export the public API consumed by the painters and the pipeline.
pub use flow::{wrap_measured, wrap_tokens, WrapCaps, ITEM_SEPARATOR};
pub use font_metrics::{FontCatalog, FontMetrics, FontRole};
pub use tree::{build_layout_tree, ContactItem, Header, LayoutTree, Section, SectionBlock};
