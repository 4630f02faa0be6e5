//! Function rendering: wrapping native callables behind declared
//! placeholders.
//!
//! A native function from a document is never exposed directly. It is
//! wrapped according to the placeholder it replaces:
//!
//! - no placeholder: a transparent pass-through adapter;
//! - a placeholder with a pass-through slot (delegating mode): caller
//!   arguments are bound against the placeholder's signature and the
//!   placeholder body runs, receiving the native callable through the
//!   slot;
//! - a plain placeholder (direct mode): arguments are bound, callback
//!   parameters are adapted, the native callable runs, and the declared
//!   return specification is applied to its result.
//!
//! Both modes strip the reserved engine-tuning keywords before binding.

use std::rc::Rc;

use bindery_core::{
    CallArgs, HostFn, Param, Property, RenderError, ReturnSpec, Signature, TypeHash, Value,
    cast_value, strip_reserved,
};
use log::debug;

/// Adapt a callable so native code can feed it raw arguments.
///
/// Each incoming argument is cast to the corresponding element type before
/// the original callable runs. Surplus arguments on either side are
/// dropped. Non-callable values pass through unchanged.
pub fn make_callback(origin: &Value, types: &[TypeHash]) -> Value {
    let Value::Function(f) = origin else {
        return origin.clone();
    };
    let f = f.clone();
    let name = f.name().to_string();
    let types = types.to_vec();
    let wrapped = HostFn::new(name, move |args| {
        let cast: Vec<Value> = args
            .positional
            .iter()
            .zip(&types)
            .map(|(a, t)| cast_value(a, *t))
            .collect::<Result<_, _>>()?;
        f.call(CallArgs::positional(cast))
    });
    Value::Function(wrapped)
}

fn convert_bound(values: Vec<Value>, callbacks: &[Option<Vec<TypeHash>>]) -> Vec<Value> {
    values
        .into_iter()
        .enumerate()
        .map(|(i, v)| match callbacks.get(i).and_then(|c| c.as_ref()) {
            Some(types) if !v.is_absent() => make_callback(&v, types),
            _ => v,
        })
        .collect()
}

/// A transparent adapter for a native callable with no placeholder.
///
/// The adapter carries a wrapped variadic signature so a later attempt to
/// render through it is caught as double wrapping.
fn passthrough_adapter(fun: &HostFn) -> HostFn {
    let sig = Signature::new(
        vec![Param::var_positional("args")],
        ReturnSpec::Unspecified,
    )
    .mark_wrapped();
    let inner = fun.clone();
    let mut adapter = HostFn::new(fun.name(), move |args| inner.call(args)).with_signature(sig);
    if let Some(doc) = fun.doc() {
        adapter = adapter.with_doc(doc);
    }
    adapter
}

/// Render a native callable against its placeholder.
pub fn render_function(fun: &HostFn, old: Option<&Value>) -> Result<Value, RenderError> {
    let declared = match old {
        None => return Ok(Value::Function(passthrough_adapter(fun))),
        Some(Value::Property(p)) => {
            // Only the getter is rendered; assignment goes through member
            // accessors, not through property placeholders.
            let getter = match render_function(fun, Some(&Value::Function(p.getter.clone())))? {
                Value::Function(g) => g,
                other => {
                    return Err(RenderError::ExpectedCallable {
                        name: fun.name().to_string(),
                        found: other.type_name().to_string(),
                    });
                }
            };
            return Ok(Value::Property(Property::new(getter, None, p.doc.clone())));
        }
        Some(Value::Function(f)) => f,
        Some(other) => {
            return Err(RenderError::ExpectedCallable {
                name: fun.name().to_string(),
                found: other.type_name().to_string(),
            });
        }
    };

    let Some(sig) = declared.signature().cloned() else {
        let mut adapter = passthrough_adapter(fun).renamed(declared.name());
        if let Some(doc) = declared.doc() {
            adapter = adapter.with_doc(doc);
        }
        return Ok(Value::Function(adapter));
    };

    if sig.wrapped {
        return Err(RenderError::AlreadyWrapped(declared.name().to_string()));
    }

    let callbacks: Vec<Option<Vec<TypeHash>>> =
        sig.bindable().map(|p| p.callback.clone()).collect();

    let wrapper = if let Some(slot) = sig.passthrough_name() {
        debug!("wrapping '{}' in delegating mode", declared.name());
        let slot = slot.to_string();
        let declared_fn = declared.clone();
        let native = fun.clone();
        let bind_sig = Rc::clone(&sig);
        let inner = move |args: CallArgs| {
            let args = strip_reserved(args);
            let bound = bind_sig.bind(&args, declared_fn.name())?;
            let mut call = CallArgs::positional(convert_bound(bound.values, &callbacks));
            for extra in bound.extras {
                call.positional.push(extra);
            }
            for (k, v) in bound.extra_keywords {
                call = call.with_keyword(k, v);
            }
            call = call.with_keyword(slot.clone(), Value::Function(native.clone()));
            declared_fn.call(call)
        };
        HostFn::new(declared.name(), inner)
    } else {
        if let Some(parameter) = sig.variadic_name() {
            return Err(RenderError::VariadicParameter {
                function: declared.name().to_string(),
                parameter: parameter.to_string(),
            });
        }
        debug!("wrapping '{}' in direct mode", declared.name());
        let declared_fn = declared.clone();
        let native = fun.clone();
        let bind_sig = Rc::clone(&sig);
        let inner = move |args: CallArgs| {
            let args = strip_reserved(args);
            let bound = bind_sig.bind(&args, declared_fn.name())?;
            let out = native.call(CallArgs::positional(convert_bound(
                bound.values,
                &callbacks,
            )))?;
            match bind_sig.ret {
                ReturnSpec::Unspecified => Ok(out),
                ReturnSpec::Discard => Ok(Value::Absent),
                ReturnSpec::Cast(target) => {
                    if out.is_absent() {
                        return Err(RenderError::MissingReturn {
                            function: declared_fn.name().to_string(),
                            expected: format!("{target}"),
                        });
                    }
                    cast_value(&out, target)
                }
            }
        };
        HostFn::new(declared.name(), inner)
    };

    let mut wrapper = wrapper.with_signature((*sig).clone().mark_wrapped());
    if let Some(doc) = declared.doc() {
        wrapper = wrapper.with_doc(doc);
    }
    Ok(Value::Function(wrapper))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bindery_core::{NativeObject, PASSTHROUGH_PARAM, bool_type, float_type, int_type};

    fn native_add() -> HostFn {
        HostFn::new("add", |args| {
            let mut total = 0;
            for v in &args.positional {
                match v {
                    Value::Int(n) => total += n,
                    other => {
                        return Err(RenderError::CastFailed {
                            from: other.type_name().to_string(),
                            to: "int".to_string(),
                        });
                    }
                }
            }
            Ok(Value::Int(total))
        })
    }

    fn declared(params: Vec<Param>, ret: ReturnSpec) -> Value {
        Value::Function(
            HostFn::new("add", |_| Ok(Value::Absent)).with_signature(Signature::new(params, ret)),
        )
    }

    #[test]
    fn no_placeholder_passes_arguments_through() {
        let rendered = render_function(&native_add(), None).unwrap();
        let Value::Function(f) = rendered else {
            panic!("expected function");
        };
        let out = f
            .call(CallArgs::positional(vec![Value::Int(2), Value::Int(3)]))
            .unwrap();
        assert_eq!(out, Value::Int(5));
        assert!(f.is_wrapped());
    }

    #[test]
    fn direct_mode_binds_keywords_and_defaults() {
        let old = declared(
            vec![
                Param::positional("a"),
                Param::positional("b").with_default(Value::Int(10)),
            ],
            ReturnSpec::Unspecified,
        );
        let rendered = render_function(&native_add(), Some(&old)).unwrap();
        let Value::Function(f) = rendered else {
            panic!("expected function");
        };
        let out = f
            .call(CallArgs::new().with_keyword("a", Value::Int(1)))
            .unwrap();
        assert_eq!(out, Value::Int(11));
    }

    #[test]
    fn reserved_keywords_are_stripped_before_binding() {
        let old = declared(vec![Param::positional("a")], ReturnSpec::Unspecified);
        let rendered = render_function(&native_add(), Some(&old)).unwrap();
        let Value::Function(f) = rendered else {
            panic!("expected function");
        };
        let out = f
            .call(
                CallArgs::positional(vec![Value::Int(4)])
                    .with_keyword("unlocked", Value::Bool(true)),
            )
            .unwrap();
        assert_eq!(out, Value::Int(4));
    }

    #[test]
    fn discard_return_yields_nothing() {
        let old = declared(vec![Param::positional("a")], ReturnSpec::Discard);
        let rendered = render_function(&native_add(), Some(&old)).unwrap();
        let Value::Function(f) = rendered else {
            panic!("expected function");
        };
        let out = f.call(CallArgs::positional(vec![Value::Int(4)])).unwrap();
        assert!(out.is_absent());
    }

    #[test]
    fn cast_return_requires_a_value() {
        let silent = HostFn::new("noop", |_| Ok(Value::Absent));
        let old = declared(vec![Param::positional("a")], ReturnSpec::Cast(int_type()));
        let rendered = render_function(&silent, Some(&old)).unwrap();
        let Value::Function(f) = rendered else {
            panic!("expected function");
        };
        let err = f
            .call(CallArgs::positional(vec![Value::Int(1)]))
            .unwrap_err();
        assert!(matches!(err, RenderError::MissingReturn { .. }));
    }

    #[test]
    fn cast_return_converts_native_results() {
        let truthy = HostFn::new("flag", |_| {
            Ok(Value::Native(NativeObject::new(bool_type(), true)))
        });
        let old = declared(vec![], ReturnSpec::Cast(bool_type()));
        let rendered = render_function(&truthy, Some(&old)).unwrap();
        let Value::Function(f) = rendered else {
            panic!("expected function");
        };
        assert_eq!(f.call(CallArgs::new()).unwrap(), Value::Bool(true));
    }

    #[test]
    fn delegating_mode_hands_native_through_the_slot() {
        let body = HostFn::new("wrapper_body", |args| {
            let native = match args.keyword(PASSTHROUGH_PARAM) {
                Some(Value::Function(f)) => f.clone(),
                other => panic!("expected native in slot, got {other:?}"),
            };
            let doubled: Vec<Value> = args.positional.clone();
            let once = native.call(CallArgs::positional(doubled))?;
            match once {
                Value::Int(n) => Ok(Value::Int(n * 2)),
                other => Ok(other),
            }
        })
        .with_signature(Signature::new(
            vec![Param::positional("a"), Param::passthrough()],
            ReturnSpec::Unspecified,
        ));

        let rendered =
            render_function(&native_add(), Some(&Value::Function(body))).unwrap();
        let Value::Function(f) = rendered else {
            panic!("expected function");
        };
        let out = f.call(CallArgs::positional(vec![Value::Int(3)])).unwrap();
        assert_eq!(out, Value::Int(6));
    }

    #[test]
    fn double_wrapping_is_rejected() {
        let old = declared(vec![Param::positional("a")], ReturnSpec::Unspecified);
        let once = render_function(&native_add(), Some(&old)).unwrap();
        let err = render_function(&native_add(), Some(&once)).unwrap_err();
        assert!(matches!(err, RenderError::AlreadyWrapped(_)));
    }

    #[test]
    fn variadic_placeholders_are_rejected_in_direct_mode() {
        let old = declared(
            vec![Param::positional("a"), Param::var_positional("rest")],
            ReturnSpec::Unspecified,
        );
        let err = render_function(&native_add(), Some(&old)).unwrap_err();
        assert!(matches!(err, RenderError::VariadicParameter { .. }));
    }

    #[test]
    fn callback_parameters_are_adapted() {
        // Native side calls the callback with raw (native) arguments.
        let native = HostFn::new("apply", |args| {
            let Some(Value::Function(cb)) = args.positional.first() else {
                panic!("expected callback");
            };
            cb.call(CallArgs::positional(vec![Value::Native(NativeObject::new(
                int_type(),
                21_i64,
            ))]))
        });
        let old = declared(
            vec![Param::positional("f").with_callback(vec![int_type()])],
            ReturnSpec::Unspecified,
        );
        let rendered = render_function(&native, Some(&old)).unwrap();
        let Value::Function(f) = rendered else {
            panic!("expected function");
        };

        // The caller's callback only understands unwrapped ints.
        let user_cb = HostFn::new("double", |args| match args.positional.first() {
            Some(Value::Int(n)) => Ok(Value::Int(n * 2)),
            other => panic!("callback argument was not cast: {other:?}"),
        });
        let out = f
            .call(CallArgs::positional(vec![Value::Function(user_cb)]))
            .unwrap();
        assert_eq!(out, Value::Int(42));
    }

    #[test]
    fn callback_casts_each_element_to_its_own_type() {
        // Two element types; the native side delivers both raw.
        let native = HostFn::new("apply", |args| {
            let Some(Value::Function(cb)) = args.positional.first() else {
                panic!("expected callback");
            };
            cb.call(CallArgs::positional(vec![
                Value::Native(NativeObject::new(int_type(), 7_i64)),
                Value::Native(NativeObject::new(float_type(), 2.5_f64)),
            ]))
        });
        let old = declared(
            vec![Param::positional("f").with_callback(vec![int_type(), float_type()])],
            ReturnSpec::Unspecified,
        );
        let rendered = render_function(&native, Some(&old)).unwrap();
        let Value::Function(f) = rendered else {
            panic!("expected function");
        };

        let user_cb = HostFn::new("pair", |args| {
            assert_eq!(
                args.positional,
                vec![Value::Int(7), Value::Float(2.5)],
                "arguments were not cast per element type, in order"
            );
            Ok(Value::Absent)
        });
        f.call(CallArgs::positional(vec![Value::Function(user_cb)]))
            .unwrap();
    }

    #[test]
    fn property_placeholder_renders_its_getter() {
        let getter = HostFn::new("value", |_| Ok(Value::Absent)).with_signature(Signature::new(
            vec![Param::positional("self")],
            ReturnSpec::Unspecified,
        ));
        let old = Value::Property(Property::new(getter, None, Some("native field".into())));
        let native = HostFn::new("value", |_| Ok(Value::Int(7)));
        let rendered = render_function(&native, Some(&old)).unwrap();
        match rendered {
            Value::Property(p) => {
                let out = p
                    .getter
                    .call(CallArgs::positional(vec![Value::Int(0)]))
                    .unwrap();
                assert_eq!(out, Value::Int(7));
                assert_eq!(p.doc.as_deref(), Some("native field"));
            }
            other => panic!("expected property, got {other:?}"),
        }
    }

    #[test]
    fn non_callable_placeholder_is_an_error() {
        let err = render_function(&native_add(), Some(&Value::Int(3))).unwrap_err();
        assert!(matches!(err, RenderError::ExpectedCallable { .. }));
    }
}
