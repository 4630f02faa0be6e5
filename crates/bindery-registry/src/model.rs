//! The rendered object model.
//!
//! Classes live in a flat table keyed by [`TypeHash`] and are bound into
//! the [`NamespaceTree`] by name. Placeholder classes come from
//! pre-declared stubs, rendered classes replace them during rendering, and
//! instances are [`NativeObject`]s tagged with their class hash. Method
//! lookup walks the base chain most-specific-first.

use bindery_core::{
    CallArgs, INIT, NativeObject, QualifiedName, RenderError, TypeHash, Value,
};
use petgraph::graph::NodeIndex;
use rustc_hash::FxHashMap;

use crate::namespace_tree::NamespaceTree;

/// How a class entered the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    /// The common native base every rendered class inherits from.
    Base,
    /// A pre-declared stub awaiting rendering.
    Placeholder,
    /// A live class produced by rendering.
    Rendered,
}

/// One class in the model.
#[derive(Debug, Clone)]
pub struct ClassEntry {
    /// Simple name.
    pub name: String,
    /// Fully qualified, dotted name.
    pub qname: QualifiedName,
    /// Identity of this class.
    pub hash: TypeHash,
    /// How the class entered the model.
    pub kind: ClassKind,
    /// Direct bases, most general last.
    pub bases: Vec<TypeHash>,
    /// Methods, properties, and other attributes by simple name.
    pub attrs: FxHashMap<String, Value>,
    /// Declared member types by member name, consulted when rendering
    /// `.`-prefixed accessors.
    pub annotations: FxHashMap<String, TypeHash>,
    /// Engine types this class stands for, each with an optional
    /// qualifier.
    pub metadata: Vec<(TypeHash, Option<String>)>,
    /// For generated stubs: the class this stub stands in for.
    pub origin: Option<TypeHash>,
}

impl ClassEntry {
    pub fn new(qname: QualifiedName, hash: TypeHash, kind: ClassKind) -> Self {
        Self {
            name: qname.simple_name().to_string(),
            qname,
            hash,
            kind,
            bases: Vec::new(),
            attrs: FxHashMap::default(),
            annotations: FxHashMap::default(),
            metadata: Vec::new(),
            origin: None,
        }
    }

    pub fn with_bases(mut self, bases: Vec<TypeHash>) -> Self {
        self.bases = bases;
        self
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: Value) -> Self {
        self.attrs.insert(name.into(), value);
        self
    }

    pub fn with_annotation(mut self, member: impl Into<String>, class: TypeHash) -> Self {
        self.annotations.insert(member.into(), class);
        self
    }

    pub fn with_origin(mut self, origin: TypeHash) -> Self {
        self.origin = Some(origin);
        self
    }
}

/// Flat class table plus the namespace tree the classes are bound into.
pub struct ObjectModel {
    tree: NamespaceTree,
    classes: FxHashMap<TypeHash, ClassEntry>,
}

impl Default for ObjectModel {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectModel {
    pub fn new() -> Self {
        Self {
            tree: NamespaceTree::new(),
            classes: FxHashMap::default(),
        }
    }

    pub fn tree(&self) -> &NamespaceTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut NamespaceTree {
        &mut self.tree
    }

    /// Install a class and bind it into its namespace.
    ///
    /// Installing over an existing hash is an error; rendered classes get
    /// fresh identities, so a collision means the same class was rendered
    /// twice.
    pub fn install_class(&mut self, entry: ClassEntry) -> Result<TypeHash, RenderError> {
        let hash = entry.hash;
        if self.classes.contains_key(&hash) {
            return Err(RenderError::DuplicateClass(entry.qname.to_string()));
        }
        let ns = self.tree.get_or_create_path(entry.qname.namespace_path());
        self.tree
            .set_attr(ns, &entry.name, Value::Class(hash));
        self.classes.insert(hash, entry);
        Ok(hash)
    }

    pub fn class(&self, hash: TypeHash) -> Option<&ClassEntry> {
        self.classes.get(&hash)
    }

    pub fn class_mut(&mut self, hash: TypeHash) -> Option<&mut ClassEntry> {
        self.classes.get_mut(&hash)
    }

    /// Look up a class bound at a dotted path.
    pub fn class_at(&self, qname: &QualifiedName) -> Option<TypeHash> {
        let ns = self.tree.get_path(qname.namespace_path())?;
        match self.tree.get_attr(ns, qname.simple_name()) {
            Some(Value::Class(hash)) => Some(*hash),
            _ => None,
        }
    }

    /// The namespace node a class is bound in, if any.
    pub fn class_namespace(&self, hash: TypeHash) -> Option<NodeIndex> {
        let entry = self.classes.get(&hash)?;
        self.tree.get_path(entry.qname.namespace_path())
    }

    /// Follow a stub to the class it stands in for.
    pub fn unwrap(&self, hash: TypeHash) -> TypeHash {
        match self.classes.get(&hash).and_then(|e| e.origin) {
            Some(origin) => origin,
            None => hash,
        }
    }

    /// The full inheritance chain of a class, most general first, the
    /// class itself last. Bases missing from the model are skipped.
    pub fn base_chain(&self, hash: TypeHash) -> Vec<TypeHash> {
        let mut chain = Vec::new();
        self.collect_chain(hash, &mut chain);
        chain
    }

    fn collect_chain(&self, hash: TypeHash, chain: &mut Vec<TypeHash>) {
        if chain.contains(&hash) {
            return;
        }
        if let Some(entry) = self.classes.get(&hash) {
            for base in &entry.bases {
                self.collect_chain(*base, chain);
            }
            chain.push(hash);
        }
    }

    /// Resolve an attribute most-specific-first along the base chain.
    pub fn attr(&self, hash: TypeHash, name: &str) -> Option<&Value> {
        for class in self.base_chain(hash).iter().rev() {
            if let Some(value) = self.classes.get(class).and_then(|e| e.attrs.get(name)) {
                return Some(value);
            }
        }
        None
    }

    /// Construct an instance of a class.
    ///
    /// A fresh untagged object is allocated and the class initializer runs
    /// with it as receiver. A class whose chain declares no initializer
    /// cannot be constructed.
    pub fn instantiate(&self, hash: TypeHash, args: CallArgs) -> Result<Value, RenderError> {
        let entry = self
            .classes
            .get(&hash)
            .ok_or_else(|| RenderError::ClassNotFound(format!("{hash}")))?;
        if self.attr(hash, INIT).is_none() {
            return Err(RenderError::NoConstructor(entry.qname.to_string()));
        }
        let instance = Value::Native(NativeObject::bare(hash));
        self.call_method(hash, INIT, args.prepend(instance.clone()))?;
        Ok(instance)
    }

    /// Call a method on a class, receiver already in the argument list.
    pub fn call_method(
        &self,
        hash: TypeHash,
        name: &str,
        args: CallArgs,
    ) -> Result<Value, RenderError> {
        let class = self
            .classes
            .get(&hash)
            .ok_or_else(|| RenderError::ClassNotFound(format!("{hash}")))?;
        let attr = self
            .attr(hash, name)
            .ok_or_else(|| RenderError::MemberNotFound {
                class: class.qname.to_string(),
                member: name.to_string(),
            })?;
        match attr {
            Value::Function(f) => f.call(args),
            Value::Property(p) => p.getter.call(args),
            other => Err(RenderError::NotCallable(format!(
                "{}.{} is a {}",
                class.qname,
                name,
                other.type_name()
            ))),
        }
    }
}
