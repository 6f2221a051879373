//! # Core Error Types
//!
//! All errors that can occur in entity and component bookkeeping.
//!
//! Lookup misses are not errors: they surface as [`Instance::INVALID`] or
//! `None`. The variants below cover programmer mistakes that the `try_*`
//! operations report explicitly.
//!
//! [`Instance::INVALID`]: crate::ecs::Instance::INVALID

use ember_mirror::MirrorError;
use thiserror::Error;

use crate::ecs::{Entity, Instance};

/// Errors that can occur in the core.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EmberError {
    /// The entity handle is dead, stale, or was never issued by this manager.
    #[error("entity {0} is not alive")]
    StaleEntity(Entity),

    /// The entity already owns a row in this component definition.
    #[error("entity {0} is already assigned to this component")]
    AlreadyAssigned(Entity),

    /// The entity has no row in this component definition.
    #[error("entity {0} is not assigned to this component")]
    NotAssigned(Entity),

    /// The instance no longer refers to the row it was issued for.
    #[error("instance {0} is stale or invalid")]
    StaleInstance(Instance),

    /// The configuration could not be read or is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Reflection failure.
    #[error(transparent)]
    Mirror(#[from] MirrorError),
}

/// Result type for core operations.
pub type EmberResult<T> = Result<T, EmberError>;
