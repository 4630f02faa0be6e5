//! Special method names.
//!
//! Declared APIs spell operators with their source-language tokens (`+`,
//! `[]`, `==`, ...). [`canonical`] maps each token to the method name the
//! object model actually installs, and [`default_method`] supplies the
//! declared fallback every rendered class uses when its placeholder does
//! not provide one. Fallbacks are placeholders like any other: their
//! signatures drive rendering, and only the delegating comparison bodies
//! ever run.

use crate::error::RenderError;
use crate::host_fn::{CallArgs, HostFn};
use crate::signature::{PASSTHROUGH_PARAM, Param, ReturnSpec, Signature};
use crate::type_hash::{bool_type, int_type, str_type};
use crate::value::Value;

/// Initializer method consulted when constructing an instance.
pub const INIT: &str = "op_init";

/// Raw-allocation entry; discarded during rendering.
pub const NEW: &str = "op_new";

/// Copy-assignment method name.
pub const COPY: &str = "copy";

/// Declared member accessors are prefixed with this character.
pub const MEMBER_PREFIX: char = '.';

/// Canonical method name for an operator token, if the token is one.
pub fn canonical(token: &str) -> Option<&'static str> {
    Some(match token {
        "{}" => "to_string",
        "bool" => "to_bool",
        "[]" => "op_index",
        "()" => "op_call",
        "~" => "op_invert",
        "^" => "op_xor",
        "+" => "op_add",
        "-" => "op_sub",
        "*" => "op_mul",
        "/" => "op_div",
        "==" => "op_eq",
        "!=" => "op_ne",
        "<" => "op_lt",
        ">" => "op_gt",
        "<=" => "op_le",
        ">=" => "op_ge",
        _ => return None,
    })
}

/// A declared conversion: empty body, the return cast carries the
/// behavior in direct mode.
fn default_cast(name: &'static str, target: crate::type_hash::TypeHash) -> HostFn {
    let sig = Signature::new(vec![Param::positional("self")], ReturnSpec::Cast(target));
    HostFn::new(name, |_| Ok(Value::Absent)).with_signature(sig)
}

/// A declared comparison: drives the native operation itself, so values
/// of different dynamic types can be reported as incomparable with
/// [`Value::NotSupported`] before native code ever runs.
fn default_logical(name: &'static str) -> HostFn {
    let sig = Signature::new(
        vec![
            Param::positional("self"),
            Param::positional("other"),
            Param::passthrough(),
        ],
        ReturnSpec::Unspecified,
    );
    HostFn::new(name, move |args| {
        let lhs = args.positional.first().cloned().ok_or_else(|| {
            RenderError::MissingArgument {
                function: name.to_string(),
                parameter: "self".to_string(),
            }
        })?;
        let rhs = args.positional.get(1).cloned().ok_or_else(|| {
            RenderError::MissingArgument {
                function: name.to_string(),
                parameter: "other".to_string(),
            }
        })?;
        if lhs.dynamic_type() != rhs.dynamic_type() {
            return Ok(Value::NotSupported);
        }
        let native = match args.keyword(PASSTHROUGH_PARAM) {
            Some(Value::Function(f)) => f.clone(),
            _ => {
                return Err(RenderError::MissingArgument {
                    function: name.to_string(),
                    parameter: PASSTHROUGH_PARAM.to_string(),
                });
            }
        };
        let out = native.call(CallArgs::positional(vec![lhs, rhs]))?;
        crate::value::cast_value(&out, bool_type())
    })
    .with_signature(sig)
}

/// The declared fallback for `name`, if one exists.
pub fn default_method(name: &str) -> Option<Value> {
    let f = match name {
        "to_string" => default_cast("to_string", str_type()),
        "to_repr" => default_cast("to_repr", str_type()),
        "to_bool" => default_cast("to_bool", bool_type()),
        "to_int" => default_cast("to_int", int_type()),
        "to_index" => default_cast("to_index", int_type()),
        "op_len" => default_cast("op_len", int_type()),
        "op_hash" => default_cast("op_hash", int_type()),
        "op_contains" => default_logical("op_contains"),
        "op_eq" => default_logical("op_eq"),
        "op_ne" => default_logical("op_ne"),
        "op_lt" => default_logical("op_lt"),
        "op_gt" => default_logical("op_gt"),
        "op_le" => default_logical("op_le"),
        "op_ge" => default_logical("op_ge"),
        _ => return None,
    };
    Some(Value::Function(f))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::NativeObject;

    #[test]
    fn operator_tokens_resolve() {
        assert_eq!(canonical("+"), Some("op_add"));
        assert_eq!(canonical("{}"), Some("to_string"));
        assert_eq!(canonical("bool"), Some("to_bool"));
        assert_eq!(canonical("frobnicate"), None);
    }

    #[test]
    fn conversion_defaults_declare_a_return_cast() {
        let f = match default_method("to_string") {
            Some(Value::Function(f)) => f,
            other => panic!("expected function, got {other:?}"),
        };
        let sig = f.signature().unwrap();
        assert_eq!(sig.ret, ReturnSpec::Cast(str_type()));
        assert!(sig.passthrough_name().is_none());
    }

    #[test]
    fn comparison_defaults_delegate_to_native() {
        let f = match default_method("op_eq") {
            Some(Value::Function(f)) => f,
            other => panic!("expected function, got {other:?}"),
        };
        assert_eq!(f.signature().unwrap().passthrough_name(), Some(PASSTHROUGH_PARAM));

        let native = HostFn::new("native_eq", |_| {
            Ok(Value::Native(NativeObject::new(bool_type(), true)))
        });
        let args = CallArgs::positional(vec![Value::Int(1), Value::Int(1)])
            .with_keyword(PASSTHROUGH_PARAM, Value::Function(native));
        assert_eq!(f.call(args).unwrap(), Value::Bool(true));
    }

    #[test]
    fn mismatched_types_short_circuit_before_native() {
        let f = match default_method("op_eq") {
            Some(Value::Function(f)) => f,
            other => panic!("expected function, got {other:?}"),
        };
        let native = HostFn::new("native_eq", |_| {
            Err(RenderError::NotCallable("should not run".into()))
        });
        let args = CallArgs::positional(vec![Value::Int(1), Value::Str("1".into())])
            .with_keyword(PASSTHROUGH_PARAM, Value::Function(native));
        assert_eq!(f.call(args).unwrap(), Value::NotSupported);
    }

    #[test]
    fn repr_and_index_defaults_declare_their_casts() {
        let repr = match default_method("to_repr") {
            Some(Value::Function(f)) => f,
            other => panic!("expected function, got {other:?}"),
        };
        assert_eq!(repr.signature().unwrap().ret, ReturnSpec::Cast(str_type()));

        // `to_index` is the integer-coercion hook; the `[]` operator maps
        // to `op_index` and has no default.
        let index = match default_method("to_index") {
            Some(Value::Function(f)) => f,
            other => panic!("expected function, got {other:?}"),
        };
        assert_eq!(index.signature().unwrap().ret, ReturnSpec::Cast(int_type()));
        assert!(default_method("op_index").is_none());
    }

    #[test]
    fn no_default_for_plain_names() {
        assert!(default_method("normalize").is_none());
    }
}
