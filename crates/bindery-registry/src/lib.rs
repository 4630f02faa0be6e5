//! Bindery registry crate.
//!
//! Holds the namespace tree the renderer binds attributes into, the
//! rendered object model (class table, base chains, instantiation), and
//! the placeholder translation table the patcher rewrites through.

pub mod model;
pub mod namespace_tree;
pub mod translation;

pub use model::{ClassEntry, ClassKind, ObjectModel};
pub use namespace_tree::{Contains, NamespaceData, NamespaceTree};
pub use translation::TranslationTable;
