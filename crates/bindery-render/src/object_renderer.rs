//! Object rendering: binding globals and free functions into namespaces.
//!
//! Unlike types, objects never create namespaces: the dotted prefix must
//! already exist, either created by a rendered type or requested up
//! front. The pre-declared attribute at the target path, when present,
//! shapes the result: a callable placeholder makes the value a rendered
//! function, a class placeholder casts the value to it, and anything else
//! is a declaration error.

use bindery_core::{HostFn, QualifiedName, RenderError, Value, cast_value};
use bindery_registry::{ObjectModel, TranslationTable};
use log::info;

/// Render one global definition at `pkg.key`.
pub fn render_object(
    model: &mut ObjectModel,
    translate: &mut TranslationTable,
    pkg: &str,
    key: &str,
    value: &Value,
) -> Result<Value, RenderError> {
    let dotted = format!("{pkg}.{key}");
    let qname = QualifiedName::from_dotted(&dotted);
    let namespace = model
        .tree()
        .get_path(qname.namespace_path())
        .ok_or_else(|| RenderError::NamespaceNotFound(qname.namespace_path().join(".")))?;

    let old = model
        .tree()
        .get_attr(namespace, qname.simple_name())
        .cloned();

    let new = match (&old, value) {
        (None, _) => value.clone(),
        (Some(old), Value::Function(f)) => {
            info!("deriving function '{dotted}'");
            if !old.is_callable() {
                return Err(RenderError::ExpectedCallable {
                    name: dotted.clone(),
                    found: old.type_name().to_string(),
                });
            }
            crate::function_renderer::render_function(f, Some(old))?
        }
        (Some(Value::Class(target)), _) => {
            info!("deriving object '{dotted}'");
            let target = model.unwrap(*target);
            cast_value(value, target)?
        }
        (Some(other), _) => {
            return Err(RenderError::PlaceholderMismatch {
                name: dotted.clone(),
                found: other.type_name().to_string(),
            });
        }
    };

    let old_identity = old.as_ref().and_then(Value::identity);
    translate.record(old_identity, new.clone());
    model
        .tree_mut()
        .set_attr(namespace, qname.simple_name(), new.clone());
    info!("rendered object '{dotted}'");
    Ok(new)
}

/// Convenience used by tests and hosts for pre-declaring a callable stub.
pub fn declare_object(model: &mut ObjectModel, dotted: &str, stub: HostFn) {
    let qname = QualifiedName::from_dotted(dotted);
    let ns = model.tree_mut().get_or_create_path(qname.namespace_path());
    model
        .tree_mut()
        .set_attr(ns, qname.simple_name(), Value::Function(stub));
}
