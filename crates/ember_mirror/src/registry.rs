//! # Type Registry
//!
//! Maps type identity to its [`TypeDescriptor`]. Registration happens once per
//! type, normally at startup; lookups afterwards are read-only and cheap.
//!
//! A process-wide instance is available through [`TypeRegistry::global`].
//! Tests and tools that need isolation construct their own with
//! [`TypeRegistry::new`].

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;

use crate::descriptor::{Reflect, TypeBuilder, TypeDescriptor};
use crate::error::{MirrorError, MirrorResult};

/// Registry of reflected types.
#[derive(Default)]
pub struct TypeRegistry {
    types: RwLock<HashMap<TypeId, Arc<TypeDescriptor>>>,
}

static GLOBAL: OnceLock<TypeRegistry> = OnceLock::new();

impl TypeRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the process-wide registry.
    pub fn global() -> &'static Self {
        GLOBAL.get_or_init(Self::new)
    }

    /// Registers `T`, building its descriptor through [`Reflect::describe`].
    ///
    /// # Errors
    ///
    /// Returns [`MirrorError::AlreadyRegistered`] if `T` is already present.
    pub fn register<T: Reflect>(&self) -> MirrorResult<Arc<TypeDescriptor>> {
        let mut types = self.types.write();
        if types.contains_key(&TypeId::of::<T>()) {
            return Err(MirrorError::AlreadyRegistered(T::TYPE_NAME));
        }

        let descriptor = Arc::new(T::describe(TypeBuilder::new(T::TYPE_NAME)).build());
        tracing::debug!(
            name = T::TYPE_NAME,
            properties = descriptor.properties().len(),
            "registered type for reflection"
        );
        types.insert(TypeId::of::<T>(), Arc::clone(&descriptor));
        Ok(descriptor)
    }

    /// Returns the descriptor of `T`, registering it first if needed.
    pub fn get_or_register<T: Reflect>(&self) -> Arc<TypeDescriptor> {
        if let Some(descriptor) = self.get::<T>() {
            return descriptor;
        }
        // Another caller may win the race between the read and this write.
        match self.register::<T>() {
            Ok(descriptor) => descriptor,
            Err(_) => self
                .get::<T>()
                .unwrap_or_else(|| Arc::new(T::describe(TypeBuilder::new(T::TYPE_NAME)).build())),
        }
    }

    /// Returns the descriptor of `T`, if registered.
    #[must_use]
    pub fn get<T: 'static>(&self) -> Option<Arc<TypeDescriptor>> {
        self.get_by_id(TypeId::of::<T>())
    }

    /// Returns the descriptor for a `TypeId`, if registered.
    #[must_use]
    pub fn get_by_id(&self, id: TypeId) -> Option<Arc<TypeDescriptor>> {
        self.types.read().get(&id).cloned()
    }

    /// Returns the descriptor registered under a display name.
    #[must_use]
    pub fn get_by_name(&self, name: &str) -> Option<Arc<TypeDescriptor>> {
        self.types
            .read()
            .values()
            .find(|descriptor| descriptor.name() == name)
            .cloned()
    }

    /// Returns the descriptor of `T`, failing if it is not registered.
    ///
    /// # Errors
    ///
    /// Returns [`MirrorError::NotRegistered`] if `T` has not been registered.
    pub fn require<T: Reflect>(&self) -> MirrorResult<Arc<TypeDescriptor>> {
        self.get::<T>()
            .ok_or_else(|| MirrorError::NotRegistered(T::TYPE_NAME.to_owned()))
    }

    /// Checks whether `T` is registered.
    #[must_use]
    pub fn is_registered<T: 'static>(&self) -> bool {
        self.types.read().contains_key(&TypeId::of::<T>())
    }

    /// Returns the number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.read().len()
    }

    /// Checks if no type is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.read().is_empty()
    }

    /// Removes every registration.
    ///
    /// Descriptors already handed out stay valid; they are reference counted.
    pub fn clear(&self) {
        self.types.write().clear();
    }
}
