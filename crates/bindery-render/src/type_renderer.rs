//! Type rendering: turning a document's type descriptor into a live class.
//!
//! A rendered class starts from whatever placeholder stub was pre-declared
//! at the same dotted path: the stub's whole inheritance chain is
//! flattened into the new class, general bases first, so stub-provided
//! helpers survive unless the document overrides them. Each declared
//! method is then rendered against the matching stub attribute (or the
//! built-in fallback for special names), member accessors are derived from
//! the stub's annotations, and a `copy` method is supplied when nothing
//! declared one.

use bindery_core::{
    CallArgs, COPY, HostFn, INIT, MEMBER_PREFIX, NEW, NativeObject, Property, QualifiedName,
    RenderError, TypeDescriptor, TypeHash, Value, canonical, default_method, strip_reserved,
};
use bindery_registry::{ClassEntry, ClassKind, ObjectModel, TranslationTable};
use log::{info, warn};
use petgraph::graph::NodeIndex;
use rustc_hash::FxHashMap;

/// Result of rendering one type.
pub struct RenderedType {
    /// Namespace the class was bound into.
    pub namespace: NodeIndex,
    /// Identity of the new class.
    pub hash: TypeHash,
}

/// The rendered initializer.
///
/// Construction allocates a blank instance and runs this with it as
/// receiver; the declared constructor produces the real contents, which
/// the receiver adopts. With no declared constructor the initializer
/// always fails.
fn render_init(class: String, ctor: Option<HostFn>) -> HostFn {
    match ctor {
        Some(ctor) => HostFn::new(INIT, move |args| {
            let args = strip_reserved(args);
            let mut positional = args.positional;
            if positional.is_empty() {
                return Err(RenderError::MissingArgument {
                    function: INIT.to_string(),
                    parameter: "self".to_string(),
                });
            }
            let receiver = positional.remove(0);
            let Value::Native(this) = receiver else {
                return Err(RenderError::CastFailed {
                    from: receiver.type_name().to_string(),
                    to: "native instance".to_string(),
                });
            };
            let mut call = CallArgs::positional(positional);
            call.keywords = args.keywords;
            let produced = ctor.call(call)?;
            let Value::Native(contents) = produced else {
                return Err(RenderError::CastFailed {
                    from: produced.type_name().to_string(),
                    to: "native instance".to_string(),
                });
            };
            this.move_from(&contents)?;
            Ok(Value::Absent)
        }),
        None => HostFn::new(INIT, move |_| Err(RenderError::NoConstructor(class.clone()))),
    }
}

/// Derive the accessor pair for a declared data member.
///
/// The getter calls the native accessor and ties the returned reference's
/// lifetime to the instance; when the member's type is annotated on the
/// stub, the result is additionally cast to it. The setter copy-assigns
/// through the same native accessor.
fn render_member(
    member: &str,
    accessor: &HostFn,
    cast: Option<TypeHash>,
    cast_name: Option<String>,
) -> Property {
    let getter_accessor = accessor.clone();
    let getter = HostFn::new(member, move |args| {
        let this = args
            .positional
            .first()
            .cloned()
            .ok_or_else(|| RenderError::MissingArgument {
                function: "getter".to_string(),
                parameter: "self".to_string(),
            })?;
        let out = getter_accessor.call(CallArgs::positional(vec![this.clone()]))?;
        if let Value::Native(obj) = &out {
            obj.bind_lifetime(&this);
        }
        match cast {
            Some(target) => bindery_core::cast_value(&out, target),
            None => Ok(out),
        }
    });

    let setter_accessor = accessor.clone();
    let setter = HostFn::new(member, move |args| {
        let (this, other) = match (args.positional.first(), args.positional.get(1)) {
            (Some(a), Some(b)) => (a.clone(), b.clone()),
            _ => {
                return Err(RenderError::MissingArgument {
                    function: "setter".to_string(),
                    parameter: "other".to_string(),
                });
            }
        };
        let slot = setter_accessor.call(CallArgs::positional(vec![this]))?;
        let Value::Native(slot) = slot else {
            return Err(RenderError::CastFailed {
                from: slot.type_name().to_string(),
                to: "native member".to_string(),
            });
        };
        let Value::Native(other) = other else {
            return Err(RenderError::CastFailed {
                from: other.type_name().to_string(),
                to: "native member".to_string(),
            });
        };
        slot.copy_from(&other)?;
        Ok(Value::Absent)
    });

    let doc = match cast_name {
        Some(name) => format!("Member of type `{name}`"),
        None => "Native member variable".to_string(),
    };
    Property::new(getter, Some(setter), Some(doc))
}

/// The default `copy` method: a fresh instance copy-assigned from self.
fn render_copy(class: TypeHash) -> HostFn {
    HostFn::new(COPY, move |args| {
        let this = match args.positional.first() {
            Some(Value::Native(obj)) => obj.clone(),
            Some(other) => {
                return Err(RenderError::CastFailed {
                    from: other.type_name().to_string(),
                    to: "native instance".to_string(),
                });
            }
            None => {
                return Err(RenderError::MissingArgument {
                    function: COPY.to_string(),
                    parameter: "self".to_string(),
                });
            }
        };
        let fresh = NativeObject::bare(class);
        fresh.copy_from(&this)?;
        Ok(Value::Native(fresh))
    })
    .with_doc("Make a copy of self using the native copy constructor")
}

/// Render one type descriptor into a live class at `pkg.name`.
pub fn render_type(
    model: &mut ObjectModel,
    translate: &mut TranslationTable,
    pkg: &str,
    variable_base: TypeHash,
    name: &str,
    descriptor: &TypeDescriptor,
) -> Result<RenderedType, RenderError> {
    let dotted = format!("{pkg}.{name}");
    let qname = QualifiedName::from_dotted(&dotted);
    let namespace = model.tree_mut().get_or_create_path(qname.namespace_path());

    // Flatten the stub's inheritance chain, general first.
    let old_hash = model.class_at(&qname).map(|h| model.unwrap(h));
    let mut props: FxHashMap<String, Value> = FxHashMap::default();
    let mut annotations: FxHashMap<String, TypeHash> = FxHashMap::default();
    if let Some(old) = old_hash {
        for class in model.base_chain(old) {
            if let Some(entry) = model.class(class) {
                props.extend(entry.attrs.iter().map(|(k, v)| (k.clone(), v.clone())));
                annotations.extend(entry.annotations.iter().map(|(k, v)| (k.clone(), *v)));
            }
        }
    }

    if props.remove(NEW).is_some_and(|v| v.is_callable()) {
        warn!("{dotted}.{NEW} will not be rendered");
    }

    let hash = TypeHash::unique_for(&dotted);

    let ctor = descriptor.method("new").cloned();
    let mut methods: Vec<(String, HostFn)> = descriptor
        .methods
        .iter()
        .filter(|(k, _)| k != "new")
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    methods.push((INIT.to_string(), render_init(dotted.clone(), ctor)));

    let mut attrs = props.clone();
    for (key, native) in methods {
        let key = canonical(&key).map(str::to_string).unwrap_or(key);
        if let Some(member) = key.strip_prefix(MEMBER_PREFIX) {
            let member_class = annotations.get(member).map(|h| model.unwrap(*h));
            let cast_name =
                member_class.and_then(|h| model.class(h).map(|e| e.qname.to_string()));
            info!("deriving member '{dotted}.{member}' from {cast_name:?}");
            let prop = render_member(member, &native, member_class, cast_name);
            attrs.insert(member.to_string(), Value::Property(prop));
        } else {
            let old_val = props.get(&key).cloned().or_else(|| default_method(&key));
            info!("deriving method '{dotted}.{key}'");
            let rendered = crate::function_renderer::render_function(&native, old_val.as_ref())?;
            translate.record(old_val.as_ref().and_then(Value::identity), rendered.clone());
            attrs.insert(key, rendered);
        }
    }

    attrs.entry(COPY.to_string())
        .or_insert_with(|| Value::Function(render_copy(hash)));

    translate.record(old_hash.map(bindery_core::Identity::Type), Value::Class(hash));

    let mut entry = ClassEntry::new(qname, hash, ClassKind::Rendered)
        .with_bases(vec![variable_base]);
    entry.attrs = attrs;
    entry.annotations = annotations;
    entry.metadata = descriptor.metadata.clone();
    model.install_class(entry)?;
    info!("rendered class '{dotted}'");

    Ok(RenderedType { namespace, hash })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class_builder::ClassBuilder;
    use bindery_core::{Param, ReturnSpec, Signature, float_type, int_type};

    fn vector_descriptor() -> TypeDescriptor {
        let ctor = HostFn::new("new", |args| {
            let len = args.positional.len() as i64;
            Ok(Value::Native(
                NativeObject::new(TypeHash::from_name("native.Vector3"), len)
                    .with_cast(int_type()),
            ))
        });
        let norm = HostFn::new("norm", |_| Ok(Value::Float(1.0)));
        TypeDescriptor::new(
            vec![("new".into(), ctor), ("norm".into(), norm)],
            vec![(TypeHash::from_name("native.Vector3"), None)],
        )
    }

    #[test]
    fn declared_constructor_drives_instantiation() {
        let mut model = ObjectModel::new();
        let mut translate = TranslationTable::new();
        let base = ClassBuilder::base_class("Variable")
            .install(&mut model)
            .unwrap();

        let rendered = render_type(
            &mut model,
            &mut translate,
            "sim",
            base,
            "Vector3",
            &vector_descriptor(),
        )
        .unwrap();

        let instance = model
            .instantiate(rendered.hash, CallArgs::positional(vec![Value::Int(0)]))
            .unwrap();
        let Value::Native(obj) = instance else {
            panic!("expected native instance");
        };
        // Contents were adopted from the constructor's product.
        assert_eq!(obj.tag(), TypeHash::from_name("native.Vector3"));
    }

    #[test]
    fn missing_constructor_fails_at_call_time() {
        let mut model = ObjectModel::new();
        let mut translate = TranslationTable::new();
        let base = ClassBuilder::base_class("Variable")
            .install(&mut model)
            .unwrap();

        let descriptor = TypeDescriptor::new(
            vec![("norm".into(), HostFn::new("norm", |_| Ok(Value::Float(1.0))))],
            vec![],
        );
        let rendered =
            render_type(&mut model, &mut translate, "sim", base, "Opaque", &descriptor).unwrap();

        let err = model
            .instantiate(rendered.hash, CallArgs::new())
            .unwrap_err();
        assert!(matches!(err, RenderError::NoConstructor(_)));
    }

    #[test]
    fn operator_tokens_install_canonical_names() {
        let mut model = ObjectModel::new();
        let mut translate = TranslationTable::new();
        let base = ClassBuilder::base_class("Variable")
            .install(&mut model)
            .unwrap();

        let descriptor = TypeDescriptor::new(
            vec![("+".into(), HostFn::new("+", |_| Ok(Value::Int(3))))],
            vec![],
        );
        let rendered =
            render_type(&mut model, &mut translate, "sim", base, "Adder", &descriptor).unwrap();

        assert!(model.attr(rendered.hash, "op_add").is_some());
        assert!(model.attr(rendered.hash, "+").is_none());
    }

    #[test]
    fn allocator_override_on_the_stub_is_discarded() {
        let mut model = ObjectModel::new();
        let mut translate = TranslationTable::new();
        let base = ClassBuilder::base_class("Variable")
            .install(&mut model)
            .unwrap();

        ClassBuilder::declare("sim.Vector3")
            .base(base)
            .method(NEW, HostFn::new(NEW, |_| Ok(Value::Absent)))
            .install(&mut model)
            .unwrap();

        let rendered = render_type(
            &mut model,
            &mut translate,
            "sim",
            base,
            "Vector3",
            &vector_descriptor(),
        )
        .unwrap();

        // The stub's allocator never reaches the rendered class.
        assert!(model.attr(rendered.hash, NEW).is_none());
    }

    #[test]
    fn stub_methods_drive_rendering_and_translation() {
        let mut model = ObjectModel::new();
        let mut translate = TranslationTable::new();
        let base = ClassBuilder::base_class("Variable")
            .install(&mut model)
            .unwrap();

        let stub_norm = HostFn::new("norm", |_| Ok(Value::Absent)).with_signature(
            Signature::new(
                vec![Param::positional("self")],
                ReturnSpec::Cast(float_type()),
            ),
        );
        let stub_id = stub_norm.id();
        let stub_class = ClassBuilder::declare("sim.Vector3")
            .base(base)
            .method("norm", stub_norm)
            .install(&mut model)
            .unwrap();

        let native = HostFn::new("norm", |_| {
            Ok(Value::Native(
                NativeObject::new(float_type(), 2.0_f64).with_cast(float_type()),
            ))
        });
        let descriptor = TypeDescriptor::new(vec![("norm".into(), native)], vec![]);
        let rendered =
            render_type(&mut model, &mut translate, "sim", base, "Vector3", &descriptor).unwrap();

        // The stub's declared return cast is applied by the rendered method.
        let out = model
            .call_method(
                rendered.hash,
                "norm",
                CallArgs::positional(vec![Value::Int(0)]),
            )
            .unwrap();
        assert_eq!(out, Value::Float(2.0));

        // The stub function and the stub class are both recorded.
        assert!(
            translate
                .lookup(bindery_core::Identity::Function(stub_id))
                .is_some()
        );
        assert_eq!(
            translate.lookup(bindery_core::Identity::Type(stub_class)),
            Some(&Value::Class(rendered.hash))
        );

        // The namespace binding now points at the rendered class.
        assert_eq!(
            model.class_at(&QualifiedName::from_dotted("sim.Vector3")),
            Some(rendered.hash)
        );
    }

    #[test]
    fn copy_is_supplied_when_not_declared() {
        let mut model = ObjectModel::new();
        let mut translate = TranslationTable::new();
        let base = ClassBuilder::base_class("Variable")
            .install(&mut model)
            .unwrap();

        let rendered = render_type(
            &mut model,
            &mut translate,
            "sim",
            base,
            "Vector3",
            &vector_descriptor(),
        )
        .unwrap();

        let instance = model
            .instantiate(rendered.hash, CallArgs::new())
            .unwrap();
        let copy = model
            .call_method(rendered.hash, COPY, CallArgs::positional(vec![instance.clone()]))
            .unwrap();
        let (Value::Native(a), Value::Native(b)) = (&instance, &copy) else {
            panic!("expected native values");
        };
        assert!(!a.same_object(b));
        assert_eq!(b.copy_count(), 1);
    }
}
