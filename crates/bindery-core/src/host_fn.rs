//! Type-erased host callables.
//!
//! [`HostFn`] wraps any closure behind a uniform calling convention so
//! native allocators, document functions, rendered adapters, and default
//! methods can all be stored in namespace attribute tables. Each callable
//! carries a fresh identity assigned at creation, an optional doc string,
//! and an optional declared [`Signature`].

use std::fmt;
use std::rc::Rc;


use crate::error::RenderError;
use crate::signature::Signature;
use crate::type_hash::TypeHash;
use crate::value::Value;

/// Arguments for a host call: positional values plus keyword pairs.
#[derive(Debug, Clone, Default)]
pub struct CallArgs {
    /// Positional arguments, in call order.
    pub positional: Vec<Value>,
    /// Keyword arguments, in call order.
    pub keywords: Vec<(String, Value)>,
}

impl CallArgs {
    /// Empty argument list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Positional-only arguments.
    pub fn positional(values: Vec<Value>) -> Self {
        Self {
            positional: values,
            keywords: Vec::new(),
        }
    }

    /// Append a keyword argument.
    pub fn with_keyword(mut self, name: impl Into<String>, value: Value) -> Self {
        self.keywords.push((name.into(), value));
        self
    }

    /// Prepend a positional argument (used to insert the receiver).
    pub fn prepend(mut self, value: Value) -> Self {
        self.positional.insert(0, value);
        self
    }

    /// Look up a keyword argument by name.
    pub fn keyword(&self, name: &str) -> Option<&Value> {
        self.keywords
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
    }
}

type HostBody = dyn Fn(CallArgs) -> Result<Value, RenderError>;

/// A type-erased host callable.
///
/// Cloning shares the underlying closure and identity.
pub struct HostFn {
    id: TypeHash,
    name: String,
    doc: Option<String>,
    sig: Option<Rc<Signature>>,
    inner: Rc<HostBody>,
}

impl HostFn {
    /// Create a callable with a fresh identity.
    pub fn new<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(CallArgs) -> Result<Value, RenderError> + 'static,
    {
        let name = name.into();
        Self {
            id: TypeHash::unique_for(&name),
            name,
            doc: None,
            sig: None,
            inner: Rc::new(f),
        }
    }

    /// Attach a declared signature.
    pub fn with_signature(mut self, sig: Signature) -> Self {
        self.sig = Some(Rc::new(sig));
        self
    }

    /// Attach a doc string.
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Replace the declared name, keeping the identity.
    pub fn renamed(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// This callable's identity.
    pub fn id(&self) -> TypeHash {
        self.id
    }

    /// Declared name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Doc string, if any.
    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    /// Declared signature, if any.
    pub fn signature(&self) -> Option<&Rc<Signature>> {
        self.sig.as_ref()
    }

    /// Whether this callable was produced by the function renderer.
    pub fn is_wrapped(&self) -> bool {
        self.sig.as_ref().is_some_and(|s| s.wrapped)
    }

    /// Invoke the callable.
    pub fn call(&self, args: CallArgs) -> Result<Value, RenderError> {
        (self.inner)(args)
    }
}

impl Clone for HostFn {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            name: self.name.clone(),
            doc: self.doc.clone(),
            sig: self.sig.clone(),
            inner: Rc::clone(&self.inner),
        }
    }
}

impl fmt::Debug for HostFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostFn")
            .field("name", &self.name)
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

/// A data-member accessor pair installed on a rendered class.
#[derive(Clone, Debug)]
pub struct Property {
    /// Getter: `(self) -> member value`.
    pub getter: HostFn,
    /// Setter: `(self, other)`, absent on read-only accessors.
    pub setter: Option<HostFn>,
    /// Doc string.
    pub doc: Option<String>,
}

impl Property {
    /// Create an accessor pair.
    pub fn new(getter: HostFn, setter: Option<HostFn>, doc: Option<String>) -> Self {
        Self { getter, setter, doc }
    }
}
