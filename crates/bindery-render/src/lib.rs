//! Bindery render crate.
//!
//! Turns an engine's self-describing document into live classes,
//! functions, and globals in the object model: class and function
//! rendering, namespace patching, engine configuration, and shutdown
//! teardown.

pub mod class_builder;
pub mod config;
pub mod finalize;
pub mod function_renderer;
pub mod object_renderer;
pub mod patcher;
pub mod render;
pub mod type_renderer;

pub use class_builder::ClassBuilder;
pub use config::Config;
pub use finalize::ShutdownHooks;
pub use function_renderer::{make_callback, render_function};
pub use object_renderer::{declare_object, render_object};
pub use patcher::patch_namespaces;
pub use render::{RenderOptions, Rendered, render_document};
pub use type_renderer::{RenderedType, render_type};
