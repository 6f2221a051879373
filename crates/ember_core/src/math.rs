//! # Math Values
//!
//! Plain-old-data vectors and rotations stored in component columns.
//! Both are `Pod`, so a whole column can be handed to a GPU upload or a
//! snapshot as raw bytes.

use bytemuck::{Pod, Zeroable};
use ember_mirror::{Reflect, TypeBuilder};

/// A 3D vector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Vec3 {
    /// X component.
    pub x: f32,
    /// Y component.
    pub y: f32,
    /// Z component.
    pub z: f32,
}

impl Vec3 {
    /// The zero vector.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Creates a new vector.
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Creates a vector with all three components set to `value`.
    #[inline]
    #[must_use]
    pub const fn splat(value: f32) -> Self {
        Self::new(value, value, value)
    }

    /// Returns the squared length.
    #[inline]
    #[must_use]
    pub fn length_squared(self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }
}

impl Reflect for Vec3 {
    const TYPE_NAME: &'static str = "Vec3";

    fn describe(builder: TypeBuilder<Self>) -> TypeBuilder<Self> {
        builder
            .property("x", |v| &v.x, |v, x| v.x = x)
            .property("y", |v| &v.y, |v, y| v.y = y)
            .property("z", |v| &v.z, |v, z| v.z = z)
    }
}

/// A rotation quaternion. Defaults to the identity.
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Quat {
    /// X (imaginary i) component.
    pub x: f32,
    /// Y (imaginary j) component.
    pub y: f32,
    /// Z (imaginary k) component.
    pub z: f32,
    /// W (real) component.
    pub w: f32,
}

impl Quat {
    /// The identity rotation.
    pub const IDENTITY: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    /// Creates a quaternion from raw components. No normalization.
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Reflect for Quat {
    const TYPE_NAME: &'static str = "Quat";

    fn describe(builder: TypeBuilder<Self>) -> TypeBuilder<Self> {
        builder
            .property("x", |q| &q.x, |q, x| q.x = x)
            .property("y", |q| &q.y, |q, y| q.y = y)
            .property("z", |q| &q.z, |q, z| q.z = z)
            .property("w", |q| &q.w, |q, w| q.w = w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_mirror::TypeRegistry;

    #[test]
    fn test_defaults() {
        assert_eq!(Vec3::default(), Vec3::ZERO);
        assert_eq!(Quat::default(), Quat::IDENTITY);
        assert_eq!(Vec3::splat(2.0).length_squared(), 12.0);
    }

    #[test]
    fn test_layout_is_packed() {
        assert_eq!(std::mem::size_of::<Vec3>(), 12);
        assert_eq!(std::mem::size_of::<Quat>(), 16);
        let v = Vec3::new(1.0, 0.0, 0.0);
        let bytes = bytemuck::bytes_of(&v);
        assert_eq!(&bytes[..4], &1.0_f32.to_ne_bytes());
    }

    #[test]
    fn test_quat_reflection() {
        let registry = TypeRegistry::new();
        let descriptor = registry.register::<Quat>().unwrap();
        let names: Vec<_> = descriptor.properties().iter().map(|p| p.name()).collect();
        assert_eq!(names, ["x", "y", "z", "w"]);

        let mut q = Quat::IDENTITY;
        let w = descriptor.property("w").unwrap();
        assert_eq!(w.get_as::<f32>(&q), Some(&1.0));
        w.set(&mut q, Box::new(0.5_f32)).unwrap();
        assert_eq!(q.w, 0.5);
    }
}
