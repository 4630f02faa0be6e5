//! Top-level document rendering.
//!
//! `render_document` drives the whole pipeline: types first (so their
//! namespaces exist), then type-name reporting, then globals and free
//! functions in declaration order, scalar resolution, and finally the
//! namespace patch. Any failure rolls the engine back by clearing its
//! globals; on success the engine is registered for teardown at host
//! shutdown.

use bindery_core::{Document, RenderError, TypeHash, Value, conversion_error_type, find_scalars};
use bindery_registry::{ObjectModel, TranslationTable};
use log::info;
use rustc_hash::FxHashMap;

use crate::class_builder::ClassBuilder;
use crate::config::Config;
use crate::finalize::ShutdownHooks;
use crate::object_renderer::render_object;
use crate::patcher::patch_namespaces;
use crate::type_renderer::render_type;

/// Knobs for one render.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Report the chosen class names back to the engine.
    pub set_type_names: bool,
    /// Additional dotted namespaces to include in the patch pass.
    pub extra_namespaces: Vec<String>,
}

/// What a successful render produced.
#[derive(Debug)]
pub struct Rendered {
    /// Rendered classes by declared name, in declaration order.
    pub types: Vec<(String, TypeHash)>,
    /// Bound globals by declared name, in declaration order.
    pub objects: Vec<(String, Value)>,
    /// Engine types for the well-known scalar names.
    pub scalars: FxHashMap<&'static str, TypeHash>,
}

/// Render a document into the object model under the `pkg` namespace.
///
/// On failure the engine's globals are cleared before the error
/// propagates, so a partial render never leaks engine-held state. The
/// engine is registered for shutdown teardown only after a successful
/// render.
pub fn render_document(
    model: &mut ObjectModel,
    hooks: &ShutdownHooks,
    pkg: &str,
    doc: &Document,
    options: &RenderOptions,
) -> Result<Rendered, RenderError> {
    match render_inner(model, pkg, doc, options) {
        Ok(rendered) => {
            hooks.register(doc.engine.clone());
            Ok(rendered)
        }
        Err(err) => {
            doc.engine.clear_global_objects();
            Err(err)
        }
    }
}

fn render_inner(
    model: &mut ObjectModel,
    pkg: &str,
    doc: &Document,
    options: &RenderOptions,
) -> Result<Rendered, RenderError> {
    info!("rendering document into namespace '{pkg}'");
    let config = Config::new(doc.engine.clone());
    config.set_type_error(conversion_error_type());

    let pkg_path: Vec<&str> = pkg.split('.').filter(|s| !s.is_empty()).collect();
    let pkg_node = model.tree_mut().get_or_create_path(&pkg_path);

    if model.class(doc.variable_base).is_none() {
        ClassBuilder::base_class("Variable")
            .with_hash(doc.variable_base)
            .install(model)?;
    }

    let mut translate = TranslationTable::new();
    let mut seeds = vec![pkg_node];
    for extra in &options.extra_namespaces {
        let path: Vec<&str> = extra.split('.').filter(|s| !s.is_empty()).collect();
        seeds.push(model.tree_mut().get_or_create_path(&path));
    }

    let mut types = Vec::new();
    let mut classes = Vec::new();
    for (name, def) in &doc.contents {
        let bindery_core::Definition::Type(descriptor) = def else {
            continue;
        };
        let rendered = render_type(
            model,
            &mut translate,
            pkg,
            doc.variable_base,
            name,
            descriptor,
        )?;
        for (tag, _) in &descriptor.metadata {
            config.set_type(*tag, rendered.hash);
        }
        seeds.push(rendered.namespace);
        classes.push(rendered.hash);
        types.push((name.clone(), rendered.hash));
    }

    if options.set_type_names {
        let mut names = Vec::new();
        for (name, hash) in &types {
            if let Some(entry) = model.class(*hash) {
                for (tag, _) in &entry.metadata {
                    names.push((*tag, name.clone()));
                }
            }
        }
        config.set_type_names(&names);
    }

    let mut objects = Vec::new();
    for (name, def) in &doc.contents {
        let bindery_core::Definition::Object(value) = def else {
            continue;
        };
        let bound = render_object(model, &mut translate, pkg, name, value)?;
        objects.push((name.clone(), bound));
    }

    let scalars = find_scalars(&doc.scalars)?;

    patch_namespaces(model, &mut translate, &seeds, &classes, &config);

    info!("finished rendering document into namespace '{pkg}'");
    Ok(Rendered {
        types,
        objects,
        scalars,
    })
}
