//! Bindery: render a native engine's self-describing document into live
//! classes, functions, and globals in a host object model.
//!
//! An engine hands over a [`Document`]: named type descriptors with their
//! method tables, global objects and free functions, and a scalar report.
//! Rendering replaces any pre-declared placeholder stubs with live
//! counterparts, patches existing namespaces that still reference the
//! stubs, and configures the engine with the resulting type mappings.
//!
//! The crates split the work the obvious way: `bindery-core` holds the
//! value and document model, `bindery-registry` the namespace tree and
//! object model, `bindery-render` the rendering pipeline itself.

pub use bindery_core as core;
pub use bindery_registry as registry;
pub use bindery_render as render;

pub mod prelude {
    pub use bindery_core::{
        CallArgs, Definition, Document, EngineBridge, ErrorKind, HostFn, NativeObject, Param,
        ParamKind, Property, QualifiedName, RenderError, ReturnSpec, Scalar, ScalarEntry,
        Signature, TypeDescriptor, TypeHash, Value,
    };
    pub use bindery_registry::{ClassEntry, ClassKind, NamespaceTree, ObjectModel, TranslationTable};
    pub use bindery_render::{
        ClassBuilder, Config, RenderOptions, Rendered, ShutdownHooks, render_document,
    };
}
