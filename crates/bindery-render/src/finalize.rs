//! Engine teardown at host shutdown.
//!
//! Each engine whose document rendered successfully is registered here;
//! running the hooks releases every engine-held global exactly once.
//! Hooks run at most once no matter how often `run` is called, and a
//! panicking engine never prevents the others from being cleared.

use std::cell::{Cell, RefCell};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::rc::Rc;

use bindery_core::EngineBridge;
use log::{info, warn};

/// Registered engine teardowns.
#[derive(Default)]
pub struct ShutdownHooks {
    engines: RefCell<Vec<Rc<dyn EngineBridge>>>,
    ran: Cell<bool>,
}

impl ShutdownHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an engine for teardown. Registering the same engine again
    /// is a no-op.
    pub fn register(&self, engine: Rc<dyn EngineBridge>) {
        let mut engines = self.engines.borrow_mut();
        if engines.iter().any(|e| Rc::ptr_eq(e, &engine)) {
            return;
        }
        engines.push(engine);
    }

    /// Number of registered engines.
    pub fn len(&self) -> usize {
        self.engines.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.engines.borrow().is_empty()
    }

    /// Clear every registered engine's globals. Idempotent.
    pub fn run(&self) {
        if self.ran.replace(true) {
            return;
        }
        info!("cleaning up native engine resources");
        for engine in self.engines.borrow().iter() {
            if catch_unwind(AssertUnwindSafe(|| engine.clear_global_objects())).is_err() {
                warn!("an engine panicked during teardown");
            }
        }
    }
}

impl Drop for ShutdownHooks {
    fn drop(&mut self) {
        self.run();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bindery_core::{HostFn, TypeHash};
    use std::cell::Cell;

    #[derive(Default)]
    struct CountingEngine {
        clears: Cell<u32>,
        panics: bool,
    }

    impl EngineBridge for CountingEngine {
        fn set_debug(&self, _enabled: bool) {}
        fn debug(&self) -> bool {
            false
        }
        fn set_type_error(&self, _tag: TypeHash) {}
        fn set_type(&self, _native: TypeHash, _rendered: TypeHash) {}
        fn set_type_names(&self, _names: &[(TypeHash, String)]) {}
        fn set_output_conversion(&self, _tag: TypeHash, _conversion: HostFn) {}
        fn set_input_conversion(&self, _tag: TypeHash, _conversion: HostFn) {}
        fn set_translation(&self, _from: TypeHash, _to: TypeHash) {}
        fn clear_global_objects(&self) {
            if self.panics {
                panic!("engine teardown failure");
            }
            self.clears.set(self.clears.get() + 1);
        }
    }

    #[test]
    fn runs_each_engine_once() {
        let hooks = ShutdownHooks::new();
        let engine = Rc::new(CountingEngine::default());
        hooks.register(engine.clone());
        hooks.register(engine.clone());
        assert_eq!(hooks.len(), 1);

        hooks.run();
        hooks.run();
        assert_eq!(engine.clears.get(), 1);
    }

    #[test]
    fn a_panicking_engine_does_not_block_others() {
        let hooks = ShutdownHooks::new();
        let bad = Rc::new(CountingEngine {
            clears: Cell::new(0),
            panics: true,
        });
        let good = Rc::new(CountingEngine::default());
        hooks.register(bad);
        hooks.register(good.clone());

        hooks.run();
        assert_eq!(good.clears.get(), 1);
    }

    #[test]
    fn drop_runs_the_hooks() {
        let engine = Rc::new(CountingEngine::default());
        {
            let hooks = ShutdownHooks::new();
            hooks.register(engine.clone());
        }
        assert_eq!(engine.clears.get(), 1);
    }
}
