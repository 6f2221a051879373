//! # Type Descriptors
//!
//! A [`TypeDescriptor`] is the reflected shape of one Rust type: its name, the
//! capability types it declares, and a list of named properties. Each property
//! carries a getter/setter pair erased behind `dyn Any`, so tooling can read and
//! write fields without knowing the concrete type at compile time.

use std::any::{type_name, Any, TypeId};
use std::fmt;

use crate::error::{MirrorError, MirrorResult};

/// A type that can describe itself to the reflection registry.
///
/// Implementors provide a stable display name and, optionally, a list of
/// properties and declared base types through [`Reflect::describe`].
pub trait Reflect: Any + Sized {
    /// Name under which the type is registered.
    const TYPE_NAME: &'static str;

    /// Adds properties and bases to the builder.
    ///
    /// The default implementation registers the bare type with no properties.
    fn describe(builder: TypeBuilder<Self>) -> TypeBuilder<Self> {
        builder
    }
}

/// Type-erased access to one field of one type.
trait ErasedAccess: Send + Sync {
    fn get<'a>(&self, object: &'a dyn Any) -> Option<&'a dyn Any>;

    fn set(&self, object: &mut dyn Any, value: Box<dyn Any>) -> bool;
}

struct TypedAccess<T, F> {
    getter: fn(&T) -> &F,
    setter: fn(&mut T, F),
}

impl<T: Any, F: Any> ErasedAccess for TypedAccess<T, F> {
    fn get<'a>(&self, object: &'a dyn Any) -> Option<&'a dyn Any> {
        object
            .downcast_ref::<T>()
            .map(|object| (self.getter)(object) as &dyn Any)
    }

    fn set(&self, object: &mut dyn Any, value: Box<dyn Any>) -> bool {
        let Some(object) = object.downcast_mut::<T>() else {
            return false;
        };
        match value.downcast::<F>() {
            Ok(value) => {
                (self.setter)(object, *value);
                true
            }
            Err(_) => false,
        }
    }
}

/// A single reflected property: a name plus an accessor pair.
pub struct PropertyDescriptor {
    name: &'static str,
    owner: &'static str,
    value_type: TypeId,
    value_type_name: &'static str,
    access: Box<dyn ErasedAccess>,
}

impl PropertyDescriptor {
    /// Returns the property name.
    #[inline]
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the `TypeId` of the property value.
    #[inline]
    #[must_use]
    pub const fn value_type(&self) -> TypeId {
        self.value_type
    }

    /// Returns the Rust type name of the property value.
    #[inline]
    #[must_use]
    pub const fn value_type_name(&self) -> &'static str {
        self.value_type_name
    }

    /// Reads the property from an object.
    ///
    /// Returns `None` if `object` is not of the owning type.
    #[must_use]
    pub fn get<'a>(&self, object: &'a dyn Any) -> Option<&'a dyn Any> {
        self.access.get(object)
    }

    /// Reads the property and downcasts it to `F`.
    #[must_use]
    pub fn get_as<'a, F: Any>(&self, object: &'a dyn Any) -> Option<&'a F> {
        self.get(object)?.downcast_ref::<F>()
    }

    /// Writes the property on an object.
    ///
    /// # Errors
    ///
    /// Returns [`MirrorError::TypeMismatch`] if `object` is not of the owning
    /// type or `value` is not of the property's type.
    pub fn set(&self, object: &mut dyn Any, value: Box<dyn Any>) -> MirrorResult<()> {
        if self.access.set(object, value) {
            Ok(())
        } else {
            Err(MirrorError::TypeMismatch {
                type_name: self.owner,
                property: self.name,
            })
        }
    }
}

impl fmt::Debug for PropertyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyDescriptor")
            .field("name", &self.name)
            .field("value_type", &self.value_type_name)
            .finish_non_exhaustive()
    }
}

/// Reflected description of one type.
#[derive(Debug)]
pub struct TypeDescriptor {
    name: &'static str,
    rust_name: &'static str,
    type_id: TypeId,
    bases: Vec<(TypeId, &'static str)>,
    properties: Vec<PropertyDescriptor>,
}

impl TypeDescriptor {
    /// Returns the registered display name.
    #[inline]
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the fully qualified Rust type name.
    #[inline]
    #[must_use]
    pub const fn rust_name(&self) -> &'static str {
        self.rust_name
    }

    /// Returns the `TypeId` of the described type.
    #[inline]
    #[must_use]
    pub const fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns the properties in declaration order.
    #[inline]
    #[must_use]
    pub fn properties(&self) -> &[PropertyDescriptor] {
        &self.properties
    }

    /// Finds a property by name.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Finds a property by name, failing with a descriptive error.
    ///
    /// # Errors
    ///
    /// Returns [`MirrorError::UnknownProperty`] if no property has that name.
    pub fn require_property(&self, name: &str) -> MirrorResult<&PropertyDescriptor> {
        self.property(name).ok_or_else(|| MirrorError::UnknownProperty {
            type_name: self.name,
            property: name.to_owned(),
        })
    }

    /// Returns the declared base/capability type names.
    pub fn bases(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.bases.iter().map(|(_, name)| *name)
    }

    /// Checks whether the type is `id` or declares `id` as a base.
    #[must_use]
    pub fn is_a(&self, id: TypeId) -> bool {
        self.type_id == id || self.bases.iter().any(|(base, _)| *base == id)
    }
}

/// Builder used by [`Reflect::describe`] to assemble a [`TypeDescriptor`].
pub struct TypeBuilder<T> {
    descriptor: TypeDescriptor,
    _owner: std::marker::PhantomData<fn() -> T>,
}

impl<T: Any> TypeBuilder<T> {
    /// Starts a descriptor for `T` under the given display name.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            descriptor: TypeDescriptor {
                name,
                rust_name: type_name::<T>(),
                type_id: TypeId::of::<T>(),
                bases: Vec::new(),
                properties: Vec::new(),
            },
            _owner: std::marker::PhantomData,
        }
    }

    /// Declares a named property with its accessor pair.
    #[must_use]
    pub fn property<F: Any>(
        mut self,
        name: &'static str,
        getter: fn(&T) -> &F,
        setter: fn(&mut T, F),
    ) -> Self {
        debug_assert!(
            self.descriptor.property(name).is_none(),
            "property declared twice"
        );
        self.descriptor.properties.push(PropertyDescriptor {
            name,
            owner: self.descriptor.name,
            value_type: TypeId::of::<F>(),
            value_type_name: type_name::<F>(),
            access: Box::new(TypedAccess { getter, setter }),
        });
        self
    }

    /// Declares `B` as a base type (capability) of `T`.
    #[must_use]
    pub fn base<B: Any>(mut self) -> Self {
        self.descriptor.bases.push((TypeId::of::<B>(), type_name::<B>()));
        self
    }

    /// Finishes the descriptor.
    #[must_use]
    pub fn build(self) -> TypeDescriptor {
        self.descriptor
    }
}
