//! Engine configuration surface.
//!
//! The native engine that produced a document also accepts configuration
//! back from the renderer: which rendered class stands for which native
//! type, how values translate at the boundary, and a global teardown.
//! [`EngineBridge`] is that surface; rendering drives it but never depends
//! on a concrete engine.

use crate::host_fn::HostFn;
use crate::type_hash::TypeHash;

/// Configuration methods exposed by a native engine.
///
/// Implementations are engine-specific. All methods are best-effort from
/// the renderer's point of view; an engine that does not support a given
/// knob may ignore the call.
pub trait EngineBridge {
    /// Toggle engine-side diagnostic output.
    fn set_debug(&self, enabled: bool);

    /// Whether engine-side diagnostics are on.
    fn debug(&self) -> bool;

    /// The type raised by the engine on conversion failures.
    fn set_type_error(&self, tag: TypeHash);

    /// Associate a native type with the rendered class standing for it.
    fn set_type(&self, native: TypeHash, rendered: TypeHash);

    /// Report the qualified names chosen for native types.
    fn set_type_names(&self, names: &[(TypeHash, String)]);

    /// Install a conversion applied to values leaving the engine as `tag`.
    fn set_output_conversion(&self, tag: TypeHash, conversion: HostFn);

    /// Install a conversion applied to values entering the engine as `tag`.
    fn set_input_conversion(&self, tag: TypeHash, conversion: HostFn);

    /// Record that values of one type should be presented as another.
    fn set_translation(&self, from: TypeHash, to: TypeHash);

    /// Release every global owned by the engine. Called on render failure
    /// and at shutdown.
    fn clear_global_objects(&self);
}
