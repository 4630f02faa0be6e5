//! Explicit parameter descriptors and the argument binder.
//!
//! Instead of introspecting callables at run time, every declared function
//! carries a [`Signature`]: an ordered parameter-descriptor list consulted
//! by a small binder. A descriptor records the parameter's name, kind,
//! default, and, for callback slots, the element types native code will
//! deliver raw arguments for.
//!
//! Two parameter conventions are reserved:
//!
//! - A [`ParamKind::Passthrough`] parameter marks the slot through which a
//!   rendered adapter hands the original native callable back to the
//!   declared function (delegating mode). It never binds caller arguments.
//! - [`RESERVED_KEYWORDS`] are engine-tuning keywords: always accepted on
//!   any call, never forwarded anywhere.

use crate::error::RenderError;
use crate::host_fn::CallArgs;
use crate::type_hash::TypeHash;
use crate::value::Value;

/// Conventional name for the pass-through slot on declared functions that
/// want to drive the native callable themselves.
pub const PASSTHROUGH_PARAM: &str = "_impl_";

/// Engine-tuning keywords: accepted on every call, never forwarded.
pub const RESERVED_KEYWORDS: [&str; 2] = ["unlocked", "signature"];

/// How a parameter binds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Ordinary parameter: binds positionally or by keyword.
    Positional,
    /// Reserved pass-through slot; excluded from caller binding.
    Passthrough,
    /// Collects surplus positional arguments.
    VarPositional,
    /// Collects surplus keyword arguments.
    VarKeyword,
}

/// One parameter descriptor.
#[derive(Debug, Clone)]
pub struct Param {
    /// Parameter name.
    pub name: String,
    /// Binding kind.
    pub kind: ParamKind,
    /// Default value applied when no argument binds.
    pub default: Option<Value>,
    /// Element types of a callback slot, if this parameter is one.
    pub callback: Option<Vec<TypeHash>>,
}

impl Param {
    /// An ordinary positional parameter.
    pub fn positional(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ParamKind::Positional,
            default: None,
            callback: None,
        }
    }

    /// The reserved pass-through slot.
    pub fn passthrough() -> Self {
        Self {
            name: PASSTHROUGH_PARAM.into(),
            kind: ParamKind::Passthrough,
            default: None,
            callback: None,
        }
    }

    /// A `*args`-style collector.
    pub fn var_positional(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ParamKind::VarPositional,
            default: None,
            callback: None,
        }
    }

    /// A `**kwargs`-style collector.
    pub fn var_keyword(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ParamKind::VarKeyword,
            default: None,
            callback: None,
        }
    }

    /// Attach a default value.
    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    /// Mark this parameter as a callback slot with the given element types.
    pub fn with_callback(mut self, element_types: Vec<TypeHash>) -> Self {
        self.callback = Some(element_types);
        self
    }
}

/// Declared return interpretation for direct-mode rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReturnSpec {
    /// No annotation: the native result is returned unmodified.
    #[default]
    Unspecified,
    /// Result discarded; the call returns nothing.
    Discard,
    /// Result must be present and is cast to the given type.
    Cast(TypeHash),
}

/// Result of binding caller arguments against a signature.
#[derive(Debug, Clone, Default)]
pub struct Bound {
    /// One value per bindable parameter, in declaration order.
    pub values: Vec<Value>,
    /// Surplus positional arguments (var-positional collector).
    pub extras: Vec<Value>,
    /// Surplus keyword arguments (var-keyword collector).
    pub extra_keywords: Vec<(String, Value)>,
}

/// A declared function signature: ordered parameter descriptors plus the
/// return interpretation.
#[derive(Debug, Clone, Default)]
pub struct Signature {
    /// Parameter descriptors in declaration order.
    pub params: Vec<Param>,
    /// Return interpretation.
    pub ret: ReturnSpec,
    /// Set on signatures produced by the function renderer; rendering such
    /// a function again is a configuration error.
    pub wrapped: bool,
}

impl Signature {
    /// Create a signature.
    pub fn new(params: Vec<Param>, ret: ReturnSpec) -> Self {
        Self {
            params,
            ret,
            wrapped: false,
        }
    }

    /// Mark this signature as renderer-produced.
    pub fn mark_wrapped(mut self) -> Self {
        self.wrapped = true;
        self
    }

    /// Name of the pass-through slot, if the signature declares one.
    pub fn passthrough_name(&self) -> Option<&str> {
        self.params
            .iter()
            .find(|p| p.kind == ParamKind::Passthrough)
            .map(|p| p.name.as_str())
    }

    /// Name of the first variadic parameter, if any.
    pub fn variadic_name(&self) -> Option<&str> {
        self.params
            .iter()
            .find(|p| matches!(p.kind, ParamKind::VarPositional | ParamKind::VarKeyword))
            .map(|p| p.name.as_str())
    }

    /// The ordinary parameters, in declaration order.
    pub fn bindable(&self) -> impl Iterator<Item = &Param> {
        self.params
            .iter()
            .filter(|p| p.kind == ParamKind::Positional)
    }

    /// Bind caller arguments against this signature.
    ///
    /// Positional arguments fill ordinary parameters in declaration order;
    /// keywords match by name; defaults fill the rest. Surplus arguments
    /// land in the variadic collectors when declared and are errors
    /// otherwise. The pass-through slot never binds. `function` names the
    /// callable in error messages.
    pub fn bind(&self, args: &CallArgs, function: &str) -> Result<Bound, RenderError> {
        let bindable: Vec<&Param> = self.bindable().collect();
        let mut slots: Vec<Option<Value>> = vec![None; bindable.len()];
        let mut extras = Vec::new();
        let mut extra_keywords = Vec::new();

        for (i, v) in args.positional.iter().enumerate() {
            if i < slots.len() {
                slots[i] = Some(v.clone());
            } else if self
                .params
                .iter()
                .any(|p| p.kind == ParamKind::VarPositional)
            {
                extras.push(v.clone());
            } else {
                return Err(RenderError::TooManyArguments {
                    function: function.to_string(),
                    expected: slots.len(),
                    given: args.positional.len(),
                });
            }
        }

        let has_var_keyword = self.params.iter().any(|p| p.kind == ParamKind::VarKeyword);
        for (name, v) in &args.keywords {
            match bindable.iter().position(|p| &p.name == name) {
                Some(i) => {
                    if slots[i].is_some() {
                        return Err(RenderError::DuplicateArgument {
                            function: function.to_string(),
                            parameter: name.clone(),
                        });
                    }
                    slots[i] = Some(v.clone());
                }
                None if has_var_keyword => extra_keywords.push((name.clone(), v.clone())),
                None => {
                    return Err(RenderError::UnexpectedKeyword {
                        function: function.to_string(),
                        keyword: name.clone(),
                    });
                }
            }
        }

        let mut values = Vec::with_capacity(slots.len());
        for (slot, param) in slots.into_iter().zip(&bindable) {
            match slot.or_else(|| param.default.clone()) {
                Some(v) => values.push(v),
                None => {
                    return Err(RenderError::MissingArgument {
                        function: function.to_string(),
                        parameter: param.name.clone(),
                    });
                }
            }
        }

        Ok(Bound {
            values,
            extras,
            extra_keywords,
        })
    }
}

/// Drop the reserved engine-tuning keywords from an argument list.
pub fn strip_reserved(mut args: CallArgs) -> CallArgs {
    args.keywords
        .retain(|(k, _)| !RESERVED_KEYWORDS.contains(&k.as_str()));
    args
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sig(params: Vec<Param>) -> Signature {
        Signature::new(params, ReturnSpec::Unspecified)
    }

    #[test]
    fn positional_then_keyword_then_default() {
        let s = sig(vec![
            Param::positional("a"),
            Param::positional("b"),
            Param::positional("c").with_default(Value::Int(9)),
        ]);
        let args = CallArgs::positional(vec![Value::Int(1)]).with_keyword("b", Value::Int(2));
        let bound = s.bind(&args, "f").unwrap();
        assert_eq!(bound.values, vec![Value::Int(1), Value::Int(2), Value::Int(9)]);
    }

    #[test]
    fn missing_argument_errors() {
        let s = sig(vec![Param::positional("a")]);
        let err = s.bind(&CallArgs::new(), "f").unwrap_err();
        assert!(matches!(err, RenderError::MissingArgument { .. }));
    }

    #[test]
    fn duplicate_argument_errors() {
        let s = sig(vec![Param::positional("a")]);
        let args = CallArgs::positional(vec![Value::Int(1)]).with_keyword("a", Value::Int(2));
        let err = s.bind(&args, "f").unwrap_err();
        assert!(matches!(err, RenderError::DuplicateArgument { .. }));
    }

    #[test]
    fn unexpected_keyword_errors_without_collector() {
        let s = sig(vec![Param::positional("a")]);
        let args = CallArgs::positional(vec![Value::Int(1)]).with_keyword("z", Value::Int(2));
        assert!(matches!(
            s.bind(&args, "f").unwrap_err(),
            RenderError::UnexpectedKeyword { .. }
        ));
    }

    #[test]
    fn variadic_collectors_take_surplus() {
        let s = sig(vec![
            Param::positional("a"),
            Param::var_positional("rest"),
            Param::var_keyword("kw"),
        ]);
        let args = CallArgs::positional(vec![Value::Int(1), Value::Int(2), Value::Int(3)])
            .with_keyword("z", Value::Int(4));
        let bound = s.bind(&args, "f").unwrap();
        assert_eq!(bound.values, vec![Value::Int(1)]);
        assert_eq!(bound.extras, vec![Value::Int(2), Value::Int(3)]);
        assert_eq!(bound.extra_keywords, vec![("z".to_string(), Value::Int(4))]);
    }

    #[test]
    fn too_many_positional_errors() {
        let s = sig(vec![Param::positional("a")]);
        let args = CallArgs::positional(vec![Value::Int(1), Value::Int(2)]);
        assert!(matches!(
            s.bind(&args, "f").unwrap_err(),
            RenderError::TooManyArguments { .. }
        ));
    }

    #[test]
    fn passthrough_never_binds() {
        let s = sig(vec![Param::positional("a"), Param::passthrough()]);
        assert_eq!(s.passthrough_name(), Some(PASSTHROUGH_PARAM));
        let bound = s
            .bind(&CallArgs::positional(vec![Value::Int(1)]), "f")
            .unwrap();
        assert_eq!(bound.values.len(), 1);
    }

    #[test]
    fn reserved_keywords_stripped() {
        let args = CallArgs::new()
            .with_keyword("unlocked", Value::Bool(true))
            .with_keyword("signature", Value::Absent)
            .with_keyword("axis", Value::Int(0));
        let args = strip_reserved(args);
        assert_eq!(args.keywords.len(), 1);
        assert_eq!(args.keywords[0].0, "axis");
    }
}
