//! # Entity Component Storage
//!
//! Entities are bare handles; all data lives in per-type component stores.
//!
//! ## Design Philosophy
//!
//! - Entity handles are index + generation, checked on every use
//! - Component fields are stored column by column in dense arrays
//! - Removal is swap-and-pop, so columns never have holes
//! - Despawning fans out to every component store through one callback each

mod component;
mod definition;
mod entity;
mod entity_mgr;
mod inspect;
mod instance;
mod storage;
mod uuid;

pub use component::{register_reflection, ScriptComponent, TransformComponent};
pub use definition::ComponentDefinition;
pub use entity::Entity;
pub use entity_mgr::{DestructorCallback, EntityMgr, RegistrationHandle};
pub use inspect::{Capability, ComponentKind, EntityComposite, Inspect};
pub use instance::Instance;
pub use storage::{Field, Row};
pub use uuid::UuidMgr;
