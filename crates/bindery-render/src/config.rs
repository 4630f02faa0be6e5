//! Engine configuration handle used during rendering.

use std::rc::Rc;

use bindery_core::{EngineBridge, HostFn, TypeHash};

/// Thin handle over the engine's configuration surface.
///
/// One is created per render and dropped when rendering finishes; the
/// engine itself outlives it.
#[derive(Clone)]
pub struct Config {
    engine: Rc<dyn EngineBridge>,
}

impl Config {
    pub fn new(engine: Rc<dyn EngineBridge>) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &Rc<dyn EngineBridge> {
        &self.engine
    }

    pub fn set_debug(&self, enabled: bool) {
        self.engine.set_debug(enabled);
    }

    pub fn debug(&self) -> bool {
        self.engine.debug()
    }

    pub fn set_type_error(&self, tag: TypeHash) {
        self.engine.set_type_error(tag);
    }

    pub fn set_type(&self, native: TypeHash, rendered: TypeHash) {
        self.engine.set_type(native, rendered);
    }

    pub fn set_type_names(&self, names: &[(TypeHash, String)]) {
        self.engine.set_type_names(names);
    }

    pub fn set_output_conversion(&self, tag: TypeHash, conversion: HostFn) {
        self.engine.set_output_conversion(tag, conversion);
    }

    pub fn set_input_conversion(&self, tag: TypeHash, conversion: HostFn) {
        self.engine.set_input_conversion(tag, conversion);
    }

    pub fn set_translation(&self, from: TypeHash, to: TypeHash) {
        self.engine.set_translation(from, to);
    }

    pub fn clear_global_objects(&self) {
        self.engine.clear_global_objects();
    }
}
