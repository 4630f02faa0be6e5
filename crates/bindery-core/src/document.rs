//! Rendering input.
//!
//! A [`Document`] is the self-description a native engine emits: an
//! ordered list of named definitions (types with their method tables, and
//! global objects including free functions), the engine's scalar report,
//! and a handle back to the engine for configuration and teardown.

use std::rc::Rc;

use crate::bridge::EngineBridge;
use crate::host_fn::HostFn;
use crate::scalar::ScalarEntry;
use crate::type_hash::TypeHash;
use crate::value::Value;

/// One named definition in a document.
#[derive(Clone)]
pub enum Definition {
    /// A native class and its method table.
    Type(TypeDescriptor),
    /// A global object or free function.
    Object(Value),
}

impl std::fmt::Debug for Definition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Type(t) => f.debug_tuple("Type").field(&t.methods.len()).finish(),
            Self::Object(v) => f.debug_tuple("Object").field(v).finish(),
        }
    }
}

/// A native class declaration: its methods plus the engine types it
/// stands for.
#[derive(Debug, Clone, Default)]
pub struct TypeDescriptor {
    /// Method table in declaration order. Keys may be operator tokens,
    /// `.`-prefixed member accessors, or plain method names.
    pub methods: Vec<(String, HostFn)>,
    /// Engine types this class represents, each with an optional
    /// qualifier string.
    pub metadata: Vec<(TypeHash, Option<String>)>,
}

impl TypeDescriptor {
    pub fn new(methods: Vec<(String, HostFn)>, metadata: Vec<(TypeHash, Option<String>)>) -> Self {
        Self { methods, metadata }
    }

    /// Look up a declared method by name, without consuming it.
    pub fn method(&self, name: &str) -> Option<&HostFn> {
        self.methods.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }
}

/// A full engine self-description.
#[derive(Clone)]
pub struct Document {
    /// Named definitions in declaration order.
    pub contents: Vec<(String, Definition)>,
    /// The engine's primitive-type report.
    pub scalars: Vec<ScalarEntry>,
    /// Common base class every rendered type inherits from.
    pub variable_base: TypeHash,
    /// Handle back to the emitting engine.
    pub engine: Rc<dyn EngineBridge>,
}

impl Document {
    pub fn new(engine: Rc<dyn EngineBridge>, variable_base: TypeHash) -> Self {
        Self {
            contents: Vec::new(),
            scalars: Vec::new(),
            variable_base,
            engine,
        }
    }

    /// Append a type definition.
    pub fn with_type(mut self, name: impl Into<String>, descriptor: TypeDescriptor) -> Self {
        self.contents
            .push((name.into(), Definition::Type(descriptor)));
        self
    }

    /// Append a global object or free function.
    pub fn with_object(mut self, name: impl Into<String>, value: Value) -> Self {
        self.contents.push((name.into(), Definition::Object(value)));
        self
    }

    /// Append to the scalar report.
    pub fn with_scalars(mut self, entries: Vec<ScalarEntry>) -> Self {
        self.scalars = entries;
        self
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("contents", &self.contents)
            .field("scalars", &self.scalars.len())
            .field("variable_base", &self.variable_base)
            .finish_non_exhaustive()
    }
}
