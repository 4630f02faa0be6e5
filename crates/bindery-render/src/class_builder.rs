//! ClassBuilder: fluent assembly of classes in the object model.
//!
//! Placeholder stubs are declared up front with `ClassBuilder::declare`;
//! the type renderer assembles live classes with `ClassBuilder::rendered`.
//! Either way the builder collects bases, methods, accessors, member
//! annotations, and engine metadata, then installs the finished entry.
//!
//! # Example
//!
//! ```ignore
//! ClassBuilder::declare("sim.Vector3")
//!     .base(variable)
//!     .method("normalize", normalize_stub)
//!     .annotate("x", scalar_cls)
//!     .install(&mut model)?;
//! ```

use bindery_core::{HostFn, Property, QualifiedName, RenderError, TypeHash, Value};
use bindery_registry::{ClassEntry, ClassKind, ObjectModel};

/// Builder for one class entry.
pub struct ClassBuilder {
    qname: QualifiedName,
    kind: ClassKind,
    hash: TypeHash,
    bases: Vec<TypeHash>,
    attrs: Vec<(String, Value)>,
    annotations: Vec<(String, TypeHash)>,
    metadata: Vec<(TypeHash, Option<String>)>,
    origin: Option<TypeHash>,
}

impl ClassBuilder {
    fn new(dotted: &str, kind: ClassKind) -> Self {
        Self {
            qname: QualifiedName::from_dotted(dotted),
            kind,
            hash: TypeHash::unique_for(dotted),
            bases: Vec::new(),
            attrs: Vec::new(),
            annotations: Vec::new(),
            metadata: Vec::new(),
            origin: None,
        }
    }

    /// Start a placeholder stub at a dotted path.
    pub fn declare(dotted: &str) -> Self {
        Self::new(dotted, ClassKind::Placeholder)
    }

    /// Start a live rendered class at a dotted path.
    pub fn rendered(dotted: &str) -> Self {
        Self::new(dotted, ClassKind::Rendered)
    }

    /// Start the common native base class.
    pub fn base_class(dotted: &str) -> Self {
        Self::new(dotted, ClassKind::Base)
    }

    /// Use a fixed identity instead of a fresh one.
    pub fn with_hash(mut self, hash: TypeHash) -> Self {
        self.hash = hash;
        self
    }

    /// Add a direct base, most general last.
    pub fn base(mut self, base: TypeHash) -> Self {
        self.bases.push(base);
        self
    }

    /// Add a method.
    pub fn method(mut self, name: impl Into<String>, f: HostFn) -> Self {
        self.attrs.push((name.into(), Value::Function(f)));
        self
    }

    /// Add an accessor pair.
    pub fn property(mut self, name: impl Into<String>, p: Property) -> Self {
        self.attrs.push((name.into(), Value::Property(p)));
        self
    }

    /// Add an arbitrary attribute.
    pub fn attr(mut self, name: impl Into<String>, value: Value) -> Self {
        self.attrs.push((name.into(), value));
        self
    }

    /// Declare a member's type, consulted when its accessor is rendered.
    pub fn annotate(mut self, member: impl Into<String>, class: TypeHash) -> Self {
        self.annotations.push((member.into(), class));
        self
    }

    /// Record an engine type this class stands for.
    pub fn metadata(mut self, tag: TypeHash, qualifier: Option<String>) -> Self {
        self.metadata.push((tag, qualifier));
        self
    }

    /// Mark this class as a stub for another.
    pub fn origin(mut self, origin: TypeHash) -> Self {
        self.origin = Some(origin);
        self
    }

    /// Assemble the entry without installing it.
    pub fn build(self) -> ClassEntry {
        let mut entry = ClassEntry::new(self.qname, self.hash, self.kind).with_bases(self.bases);
        for (name, value) in self.attrs {
            entry.attrs.insert(name, value);
        }
        for (member, class) in self.annotations {
            entry.annotations.insert(member, class);
        }
        entry.metadata = self.metadata;
        entry.origin = self.origin;
        entry
    }

    /// Assemble and install, returning the class identity.
    pub fn install(self, model: &mut ObjectModel) -> Result<TypeHash, RenderError> {
        model.install_class(self.build())
    }
}
