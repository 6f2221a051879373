//! # EMBER Mirror
//!
//! Minimal reflection for EMBER components and value types.
//!
//! ## Design
//!
//! 1. **No macros** - every type describes itself through [`Reflect::describe`]
//! 2. **Built once** - descriptors are produced by a [`TypeBuilder`] at startup
//! 3. **Keyed by identity** - the [`TypeRegistry`] maps `TypeId` to descriptor
//!
//! ## Example
//!
//! ```rust
//! use ember_mirror::{Reflect, TypeBuilder, TypeRegistry};
//!
//! #[derive(Default)]
//! struct Health {
//!     points: u32,
//! }
//!
//! impl Reflect for Health {
//!     const TYPE_NAME: &'static str = "Health";
//!
//!     fn describe(builder: TypeBuilder<Self>) -> TypeBuilder<Self> {
//!         builder.property("points", |h| &h.points, |h, v| h.points = v)
//!     }
//! }
//!
//! let registry = TypeRegistry::new();
//! let descriptor = registry.register::<Health>().unwrap();
//! assert_eq!(descriptor.name(), "Health");
//! assert!(descriptor.property("points").is_some());
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

mod descriptor;
mod error;
mod registry;

pub use descriptor::{PropertyDescriptor, Reflect, TypeBuilder, TypeDescriptor};
pub use error::{MirrorError, MirrorResult};
pub use registry::TypeRegistry;
