//! Scalar classification.
//!
//! Native code reports its primitive types as `(category, type, width)`
//! triples. Rendering resolves each well-known scalar name to the type the
//! running engine actually uses for it, so declared APIs can refer to
//! `float64` or `int32` without knowing the engine's concrete types.

use num_enum::TryFromPrimitive;
use rustc_hash::FxHashMap;

use crate::error::RenderError;
use crate::type_hash::TypeHash;

/// Primitive category reported by native code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive)]
#[repr(u8)]
pub enum Scalar {
    Bool = 0,
    Char = 1,
    SignedChar = 2,
    UnsignedChar = 3,
    Unsigned = 4,
    Signed = 5,
    Float = 6,
    Pointer = 7,
}

/// One scalar report: category, bit width, and the engine type behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScalarEntry {
    pub kind: Scalar,
    pub width: u32,
    pub tag: TypeHash,
}

impl ScalarEntry {
    pub fn new(kind: Scalar, width: u32, tag: TypeHash) -> Self {
        Self { kind, width, tag }
    }
}

/// The well-known scalar names and the `(category, width)` each resolves
/// through.
pub fn scalar_names() -> [(&'static str, Scalar, u32); 8] {
    [
        ("float32", Scalar::Float, 32),
        ("float64", Scalar::Float, 64),
        ("uint16", Scalar::Unsigned, 16),
        ("uint32", Scalar::Unsigned, 32),
        ("uint64", Scalar::Unsigned, 64),
        ("int16", Scalar::Signed, 16),
        ("int32", Scalar::Signed, 32),
        ("int64", Scalar::Signed, 64),
    ]
}

/// Resolve every well-known scalar name against the reported entries.
///
/// Each name must be satisfied by exactly the first entry matching its
/// category and width; a name with no matching entry is an error naming
/// the unsatisfied scalar.
pub fn find_scalars(
    entries: &[ScalarEntry],
) -> Result<FxHashMap<&'static str, TypeHash>, RenderError> {
    let mut out = FxHashMap::default();
    for (name, kind, width) in scalar_names() {
        let tag = entries
            .iter()
            .find(|e| e.kind == kind && e.width == width)
            .map(|e| e.tag)
            .ok_or(RenderError::MissingScalar(name))?;
        out.insert(name, tag);
    }
    Ok(out)
}
