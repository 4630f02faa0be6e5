//! Dynamic host values and the native value protocol.
//!
//! [`Value`] is the unified runtime representation for everything a
//! namespace attribute can hold: primitives, native engine objects, host
//! callables, properties, and class references. Class and function values
//! carry hash identities rather than embedded structure, so redirecting a
//! reference is a single attribute write.
//!
//! [`NativeObject`] models the protocol every engine-owned value supports:
//! `cast` (conversion, failing on incompatibility), `move_from` (destructive
//! adoption, used by constructors), `copy_from` (in-place assignment, used
//! by setters and `copy`), and `bind_lifetime` (tying a derived reference's
//! validity to its producing object).

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashSet;

use crate::error::RenderError;
use crate::host_fn::{HostFn, Property};
use crate::type_hash::{TypeHash, bool_type, float_type, int_type, str_type};

/// Identity of a value for translation-table keying.
///
/// Only classes and functions have identities; every other value is opaque
/// to the patcher and skipped silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Identity {
    /// A class (placeholder or rendered).
    Type(TypeHash),
    /// A host callable.
    Function(TypeHash),
}

/// A dynamic value in the host object model.
pub enum Value {
    /// No value.
    Absent,
    /// Sentinel returned by default comparisons on mismatched dynamic types.
    NotSupported,
    /// Boolean.
    Bool(bool),
    /// Integer.
    Int(i64),
    /// Float.
    Float(f64),
    /// String (owned).
    Str(String),
    /// Handle to an engine-owned object.
    Native(NativeObject),
    /// Host callable.
    Function(HostFn),
    /// Data-member accessor pair.
    Property(Property),
    /// Reference to a class by identity.
    Class(TypeHash),
}

impl Value {
    /// Human-readable name of this value's shape, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Absent => "absent",
            Value::NotSupported => "not-supported",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::Native(_) => "native",
            Value::Function(_) => "function",
            Value::Property(_) => "property",
            Value::Class(_) => "class",
        }
    }

    /// Identity of this value as a translation-table key, if it has one.
    pub fn identity(&self) -> Option<Identity> {
        match self {
            Value::Class(h) => Some(Identity::Type(*h)),
            Value::Function(f) => Some(Identity::Function(f.id())),
            _ => None,
        }
    }

    /// Check whether this value can be invoked.
    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Function(_))
    }

    /// Check for the absent sentinel.
    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    /// The dynamic type used by default comparisons: the native tag for
    /// engine objects, otherwise the variant itself.
    pub fn dynamic_type(&self) -> Option<TypeHash> {
        match self {
            Value::Native(n) => Some(n.tag()),
            Value::Bool(_) => Some(bool_type()),
            Value::Int(_) => Some(int_type()),
            Value::Float(_) => Some(float_type()),
            Value::Str(_) => Some(str_type()),
            Value::Class(h) => Some(*h),
            _ => None,
        }
    }
}

impl Clone for Value {
    fn clone(&self) -> Self {
        match self {
            Value::Absent => Value::Absent,
            Value::NotSupported => Value::NotSupported,
            Value::Bool(b) => Value::Bool(*b),
            Value::Int(i) => Value::Int(*i),
            Value::Float(x) => Value::Float(*x),
            Value::Str(s) => Value::Str(s.clone()),
            Value::Native(n) => Value::Native(n.clone()),
            Value::Function(f) => Value::Function(f.clone()),
            Value::Property(p) => Value::Property(p.clone()),
            Value::Class(h) => Value::Class(*h),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Absent => write!(f, "Absent"),
            Value::NotSupported => write!(f, "NotSupported"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Int(i) => write!(f, "Int({i})"),
            Value::Float(x) => write!(f, "Float({x})"),
            Value::Str(s) => write!(f, "Str({s:?})"),
            Value::Native(n) => write!(f, "Native({})", n.tag()),
            Value::Function(fun) => write!(f, "Function({:?})", fun.name()),
            Value::Property(_) => write!(f, "Property"),
            Value::Class(h) => write!(f, "Class({h})"),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Absent, Value::Absent) => true,
            (Value::NotSupported, Value::NotSupported) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Native(a), Value::Native(b)) => a.same_object(b),
            (Value::Function(a), Value::Function(b)) => a.id() == b.id(),
            (Value::Class(a), Value::Class(b)) => a == b,
            _ => false,
        }
    }
}

// ============================================================================
// NativeObject
// ============================================================================

struct ObjectState {
    /// Engine payload; shared between handles produced by `cast`.
    payload: Rc<dyn Any>,
    /// Dynamic type tag.
    tag: TypeHash,
    /// Targets the native side accepts conversions to.
    convertible: FxHashSet<TypeHash>,
    /// Lifetime owner of this reference, if any.
    ward: Option<Value>,
    /// Number of `copy_from` assignments into this object.
    copies: u32,
    /// Set once the contents were adopted by `move_from`.
    moved: bool,
}

/// Shared handle to an engine-owned value.
///
/// Handles are cheap to clone; clones refer to the same object. `cast`
/// produces a new handle over the same payload with a different tag.
pub struct NativeObject {
    inner: Rc<RefCell<ObjectState>>,
}

impl NativeObject {
    /// Create a native object with a payload.
    pub fn new<T: Any>(tag: TypeHash, payload: T) -> Self {
        Self::from_state(Rc::new(payload), tag, FxHashSet::default())
    }

    /// Create a bare instance with a unit payload, used by `copy` and by
    /// host-side construction before `move_from` adopts real contents.
    pub fn bare(tag: TypeHash) -> Self {
        Self::new(tag, ())
    }

    fn from_state(payload: Rc<dyn Any>, tag: TypeHash, convertible: FxHashSet<TypeHash>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ObjectState {
                payload,
                tag,
                convertible,
                ward: None,
                copies: 0,
                moved: false,
            })),
        }
    }

    /// Declare that the native side accepts casting this object to `target`.
    pub fn allow_cast(&self, target: TypeHash) {
        self.inner.borrow_mut().convertible.insert(target);
    }

    /// Builder form of [`allow_cast`](Self::allow_cast).
    pub fn with_cast(self, target: TypeHash) -> Self {
        self.allow_cast(target);
        self
    }

    /// Current dynamic type tag.
    pub fn tag(&self) -> TypeHash {
        self.inner.borrow().tag
    }

    /// Whether the contents were adopted elsewhere.
    pub fn is_moved(&self) -> bool {
        self.inner.borrow().moved
    }

    /// Number of `copy_from` assignments performed into this object.
    pub fn copy_count(&self) -> u32 {
        self.inner.borrow().copies
    }

    /// The lifetime owner, if one was bound.
    pub fn ward(&self) -> Option<Value> {
        self.inner.borrow().ward.clone()
    }

    /// Downcast the payload.
    pub fn payload<T: Any>(&self) -> Option<Rc<T>> {
        self.inner.borrow().payload.clone().downcast::<T>().ok()
    }

    /// Whether two handles refer to the same object.
    pub fn same_object(&self, other: &NativeObject) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Fail if the contents were adopted elsewhere.
    pub fn ensure_live(&self) -> Result<(), RenderError> {
        if self.inner.borrow().moved {
            Err(RenderError::ValueMoved(self.tag().to_string()))
        } else {
            Ok(())
        }
    }

    /// Cast this object to `target`.
    ///
    /// Succeeds when the tag already matches or the native side listed the
    /// target as convertible. Builtin targets extract the payload into the
    /// matching primitive variant; any other target yields a retagged handle
    /// sharing the payload.
    pub fn cast(&self, target: TypeHash) -> Result<Value, RenderError> {
        self.ensure_live()?;
        let st = self.inner.borrow();
        if st.tag != target && !st.convertible.contains(&target) {
            return Err(RenderError::CastFailed {
                from: st.tag.to_string(),
                to: target.to_string(),
            });
        }
        if target == bool_type() {
            if let Some(b) = st.payload.downcast_ref::<bool>() {
                return Ok(Value::Bool(*b));
            }
        } else if target == int_type() {
            if let Some(i) = st.payload.downcast_ref::<i64>() {
                return Ok(Value::Int(*i));
            }
        } else if target == float_type() {
            if let Some(x) = st.payload.downcast_ref::<f64>() {
                return Ok(Value::Float(*x));
            }
        } else if target == str_type() {
            if let Some(s) = st.payload.downcast_ref::<String>() {
                return Ok(Value::Str(s.clone()));
            }
        }
        let out = Self::from_state(st.payload.clone(), target, st.convertible.clone());
        out.inner.borrow_mut().ward = st.ward.clone();
        Ok(Value::Native(out))
    }

    /// Destructively adopt `other`'s contents. `other` is marked moved and
    /// fails on further protocol use.
    pub fn move_from(&self, other: &NativeObject) -> Result<(), RenderError> {
        if self.same_object(other) {
            return Ok(());
        }
        other.ensure_live()?;
        let mut src = other.inner.borrow_mut();
        let mut dst = self.inner.borrow_mut();
        dst.payload = src.payload.clone();
        dst.tag = src.tag;
        dst.convertible = std::mem::take(&mut src.convertible);
        dst.ward = src.ward.take();
        src.moved = true;
        Ok(())
    }

    /// Assign `other`'s contents into this object in place; `other` stays
    /// valid.
    pub fn copy_from(&self, other: &NativeObject) -> Result<(), RenderError> {
        other.ensure_live()?;
        if self.same_object(other) {
            self.inner.borrow_mut().copies += 1;
            return Ok(());
        }
        let src = other.inner.borrow();
        let mut dst = self.inner.borrow_mut();
        dst.payload = src.payload.clone();
        dst.tag = src.tag;
        dst.convertible = src.convertible.clone();
        dst.copies += 1;
        Ok(())
    }

    /// Tie this reference's validity to `owner`.
    pub fn bind_lifetime(&self, owner: &Value) {
        self.inner.borrow_mut().ward = Some(owner.clone());
    }
}

impl Clone for NativeObject {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl fmt::Debug for NativeObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeObject")
            .field("tag", &self.tag())
            .field("moved", &self.is_moved())
            .finish_non_exhaustive()
    }
}

/// Cast any value to a declared type tag.
///
/// Native objects go through the native protocol; primitives match their
/// builtin tags directly; everything else fails with a conversion error.
pub fn cast_value(value: &Value, target: TypeHash) -> Result<Value, RenderError> {
    let failed = |from: &str| RenderError::CastFailed {
        from: from.to_string(),
        to: target.to_string(),
    };
    match value {
        Value::Native(n) => n.cast(target),
        Value::Bool(_) if target == bool_type() => Ok(value.clone()),
        Value::Int(_) if target == int_type() => Ok(value.clone()),
        Value::Float(_) if target == float_type() => Ok(value.clone()),
        Value::Str(_) if target == str_type() => Ok(value.clone()),
        Value::Class(h) if *h == target => Ok(value.clone()),
        other => Err(failed(other.type_name())),
    }
}
