//! # Mirror Error Types
//!
//! All errors that can occur while registering or driving reflected types.

use thiserror::Error;

/// Errors that can occur in the reflection registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MirrorError {
    /// A type was registered twice.
    #[error("type '{0}' is already registered for reflection")]
    AlreadyRegistered(&'static str),

    /// A type was queried before being registered.
    #[error("type '{0}' is not registered for reflection")]
    NotRegistered(String),

    /// A property name does not exist on the descriptor.
    #[error("type '{type_name}' has no property named '{property}'")]
    UnknownProperty {
        /// The reflected type.
        type_name: &'static str,
        /// The requested property.
        property: String,
    },

    /// An object or value of the wrong type was passed to an accessor.
    #[error("type mismatch on '{type_name}.{property}'")]
    TypeMismatch {
        /// The reflected type.
        type_name: &'static str,
        /// The property being accessed.
        property: &'static str,
    },
}

/// Result type for reflection operations.
pub type MirrorResult<T> = Result<T, MirrorError>;
