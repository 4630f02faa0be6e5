//! Core vocabulary for the bindery renderer.
//!
//! This crate holds the types shared by the registry and the renderer:
//! dynamic host values and the native value protocol, hash-based identity,
//! qualified names, parameter descriptors and the argument binder, the
//! document model, scalar encodings, the special-method name table, and the
//! unified error type.

mod bridge;
mod document;
mod error;
mod host_fn;
mod qualified_name;
mod scalar;
mod signature;
mod special;
mod type_hash;
mod value;

pub use bridge::EngineBridge;
pub use document::{Definition, Document, TypeDescriptor};
pub use error::{ErrorKind, RenderError};
pub use host_fn::{CallArgs, HostFn, Property};
pub use qualified_name::QualifiedName;
pub use scalar::{Scalar, ScalarEntry, find_scalars, scalar_names};
pub use signature::{
    Bound, Param, ParamKind, PASSTHROUGH_PARAM, RESERVED_KEYWORDS, ReturnSpec, Signature,
    strip_reserved,
};
pub use special::{COPY, INIT, MEMBER_PREFIX, NEW, canonical, default_method};
pub use type_hash::{
    TypeHash, bool_type, conversion_error_type, float_type, int_type, str_type,
};
pub use value::{Identity, NativeObject, Value, cast_value};
