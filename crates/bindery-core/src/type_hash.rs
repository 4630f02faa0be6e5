//! Deterministic hash-based identity for types and functions.
//!
//! A [`TypeHash`] is a 64-bit hash identifying a class or a host callable.
//! Hashes are computed from names with xxh64 plus a domain-mixing constant,
//! so the same qualified name always produces the same hash. Because a
//! placeholder and the rendered class that replaces it share one qualified
//! name but must remain distinct keys in the translation table,
//! [`TypeHash::unique_for`] additionally mixes a process-wide counter.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use xxhash_rust::xxh64::xxh64;

/// Domain-mixing constants, one per entity kind, so a type and a function
/// with the same name never collide.
mod mix {
    /// Marker for type identities.
    pub const TYPE: u64 = 0x6b1f_92ce_0d84_a573;

    /// Marker for function identities.
    pub const FUNCTION: u64 = 0xc45a_3e81_f067_2b9d;

    /// Marker mixed with the process counter for unique identities.
    pub const UNIQUE: u64 = 0x1d93_7cb5_e2a8_460f;
}

static NEXT_UNIQUE: AtomicU64 = AtomicU64::new(1);

/// A 64-bit identity for a type or callable in the host object model.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TypeHash(pub u64);

impl TypeHash {
    /// Empty/invalid hash constant.
    pub const EMPTY: TypeHash = TypeHash(0);

    /// Hash a qualified type name. Deterministic: the same name always
    /// produces the same hash.
    #[inline]
    pub fn from_name(name: &str) -> Self {
        TypeHash(mix::TYPE ^ xxh64(name.as_bytes(), 0))
    }

    /// Hash a function name.
    #[inline]
    pub fn from_function(name: &str) -> Self {
        TypeHash(mix::FUNCTION ^ xxh64(name.as_bytes(), 0))
    }

    /// A fresh identity seeded from `name`.
    ///
    /// Two calls with the same name return different hashes; use this for
    /// entities whose qualified name is not unique over their lifetime
    /// (a placeholder and its rendered replacement, or successive wrappers
    /// of one function).
    pub fn unique_for(name: &str) -> Self {
        let n = NEXT_UNIQUE.fetch_add(1, Ordering::Relaxed);
        TypeHash(mix::UNIQUE
            .wrapping_mul(n)
            .rotate_left(17)
            ^ xxh64(name.as_bytes(), n))
    }

    /// Check whether this is the empty hash.
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeHash({:#018x})", self.0)
    }
}

impl fmt::Display for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

// Well-known identities for host builtins. Casting a native value to one of
// these extracts the payload into the matching `Value` variant.

/// Identity of the host boolean type.
pub fn bool_type() -> TypeHash {
    TypeHash::from_name("bool")
}

/// Identity of the host integer type.
pub fn int_type() -> TypeHash {
    TypeHash::from_name("int")
}

/// Identity of the host float type.
pub fn float_type() -> TypeHash {
    TypeHash::from_name("float")
}

/// Identity of the host string type.
pub fn str_type() -> TypeHash {
    TypeHash::from_name("str")
}

/// Identity of the error type registered with the native engine for
/// conversion failures.
pub fn conversion_error_type() -> TypeHash {
    TypeHash::from_name("ConversionError")
}
