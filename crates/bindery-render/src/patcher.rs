//! Best-effort namespace patching.
//!
//! After rendering, pre-existing namespaces may still hold references to
//! placeholders that were just replaced. The patcher walks every affected
//! namespace (the ones rendering touched, their ancestors, any extras the
//! caller requested, and the rendered classes themselves) and rewrites
//! each attribute through the translation table. Attributes with no
//! identity, or identities the table does not know, are skipped silently;
//! patching never fails.

use bindery_core::TypeHash;
use bindery_registry::{ObjectModel, TranslationTable};
use log::info;
use petgraph::graph::NodeIndex;

use crate::config::Config;

/// Rewrite placeholder references across namespaces and rendered classes,
/// then report class-to-class pairs to the engine.
///
/// The sentinel for absent placeholders is dropped first, so values
/// recorded without one never match anything.
pub fn patch_namespaces(
    model: &mut ObjectModel,
    translate: &mut TranslationTable,
    seeds: &[NodeIndex],
    rendered: &[TypeHash],
    config: &Config,
) {
    translate.drop_sentinel();

    // Every seed plus its ancestors, deduplicated.
    let mut namespaces: Vec<NodeIndex> = Vec::new();
    for &seed in seeds {
        let mut current = Some(seed);
        while let Some(node) = current {
            if !namespaces.contains(&node) {
                namespaces.push(node);
            }
            current = model.tree().find_parent(node);
        }
    }

    for node in namespaces {
        let attrs: Vec<(String, bindery_core::Value)> = match model.tree().get_namespace(node) {
            Some(data) => data
                .attrs
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            None => continue,
        };
        for (name, value) in attrs {
            if let Some(replacement) = translate.lookup_value(&value) {
                info!(
                    "patching namespace attribute '{}'",
                    model.tree().qualified_name(node, &name)
                );
                let replacement = replacement.clone();
                model.tree_mut().set_attr(node, &name, replacement);
            }
        }
    }

    for &class in rendered {
        let updates: Vec<(String, bindery_core::Value)> = match model.class(class) {
            Some(entry) => entry
                .attrs
                .iter()
                .filter_map(|(k, v)| {
                    translate.lookup_value(v).map(|nv| (k.clone(), nv.clone()))
                })
                .collect(),
            None => continue,
        };
        if let Some(entry) = model.class_mut(class) {
            for (name, value) in updates {
                info!("patching class attribute '{}.{}'", entry.qname, name);
                entry.attrs.insert(name, value);
            }
        }
    }

    for (old, new) in translate.type_pairs() {
        config.set_translation(old, new);
    }
}
