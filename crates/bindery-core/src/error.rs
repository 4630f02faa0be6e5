//! Unified error type for the rendering pipeline.
//!
//! Every failure in the renderer is a [`RenderError`]; variants fall into
//! four groups, exposed through [`RenderError::kind`]:
//!
//! - **Conversion**: a native cast failed, a moved-out value was used, or a
//!   required return value was absent.
//! - **Configuration**: duplicate wrapping, a variadic signature in direct
//!   mode, a placeholder of the wrong shape, a missing constructor invoked,
//!   or a duplicate class registration.
//! - **Lookup**: unresolved namespace prefix, member, class, or scalar.
//! - **Binding**: caller arguments did not match a declared signature.
//!
//! Errors propagate unmodified to the top-level render entry point; nothing
//! in the pipeline wraps or swallows them, apart from the patcher's
//! documented best-effort skips.

use thiserror::Error;

/// Coarse classification of a [`RenderError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Native cast or return-value failure.
    Conversion,
    /// The document or the pre-declared host surface is misconfigured.
    Configuration,
    /// A referenced namespace, member, class, or scalar does not exist.
    Lookup,
    /// Caller arguments did not match a declared signature.
    Binding,
}

/// Errors raised while rendering a document into the host object model.
#[derive(Debug, Clone, Error)]
pub enum RenderError {
    // === Conversion ===
    /// A native value could not be cast to the requested type.
    #[error("cannot cast {from} to {to}")]
    CastFailed { from: String, to: String },

    /// A value was used after its contents were adopted elsewhere.
    #[error("value of type {0} was moved out")]
    ValueMoved(String),

    /// A declared return type requires a value, but the native call
    /// returned none.
    #[error("'{function}' declares return type {expected} but returned no value")]
    MissingReturn { function: String, expected: String },

    // === Configuration ===
    /// The old callable was already produced by the renderer.
    #[error("function '{0}' was already wrapped")]
    AlreadyWrapped(String),

    /// Direct-mode rendering rejects variadic parameters.
    #[error("parameter '{parameter}' of '{function}' cannot be variadic")]
    VariadicParameter { function: String, parameter: String },

    /// The descriptor declared no constructor; the rendered constructor
    /// always fails.
    #[error("no constructor was declared for '{0}'")]
    NoConstructor(String),

    /// A placeholder existed but was neither callable nor a type.
    #[error("expected placeholder '{name}' to be a type, found {found}")]
    PlaceholderMismatch { name: String, found: String },

    /// A callable placeholder requires a callable replacement.
    #[error("expected a callable for '{name}', found {found}")]
    ExpectedCallable { name: String, found: String },

    /// A value that must be callable is not.
    #[error("value '{0}' is not callable")]
    NotCallable(String),

    /// A class with this identity is already registered.
    #[error("duplicate class: {0}")]
    DuplicateClass(String),

    // === Lookup ===
    /// A namespace prefix could not be resolved.
    #[error("unresolved namespace '{0}'")]
    NamespaceNotFound(String),

    /// A referenced member does not exist on the class.
    #[error("unresolved member '{member}' of '{class}'")]
    MemberNotFound { class: String, member: String },

    /// No class is registered under this identity.
    #[error("unknown class '{0}'")]
    ClassNotFound(String),

    /// The document's scalar table is missing a required encoding.
    #[error("document declares no scalar matching '{0}'")]
    MissingScalar(&'static str),

    // === Binding ===
    /// A required parameter received no argument.
    #[error("'{function}' missing argument for parameter '{parameter}'")]
    MissingArgument { function: String, parameter: String },

    /// A keyword argument matched no declared parameter.
    #[error("'{function}' got an unexpected keyword '{keyword}'")]
    UnexpectedKeyword { function: String, keyword: String },

    /// More positional arguments than declared parameters.
    #[error("'{function}' takes {expected} positional arguments but {given} were given")]
    TooManyArguments {
        function: String,
        expected: usize,
        given: usize,
    },

    /// A parameter received both a positional and a keyword argument.
    #[error("'{function}' got multiple values for parameter '{parameter}'")]
    DuplicateArgument { function: String, parameter: String },
}

impl RenderError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        use RenderError::*;
        match self {
            CastFailed { .. } | ValueMoved(_) | MissingReturn { .. } => ErrorKind::Conversion,
            AlreadyWrapped(_)
            | VariadicParameter { .. }
            | NoConstructor(_)
            | PlaceholderMismatch { .. }
            | ExpectedCallable { .. }
            | NotCallable(_)
            | DuplicateClass(_) => ErrorKind::Configuration,
            NamespaceNotFound(_) | MemberNotFound { .. } | ClassNotFound(_)
            | MissingScalar(_) => ErrorKind::Lookup,
            MissingArgument { .. }
            | UnexpectedKeyword { .. }
            | TooManyArguments { .. }
            | DuplicateArgument { .. } => ErrorKind::Binding,
        }
    }
}
