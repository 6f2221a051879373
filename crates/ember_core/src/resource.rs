//! # Resource References
//!
//! Components never own loaded assets. They hold a [`ResourceRef`], an opaque
//! path the IO layer resolves later.

use std::fmt;

use ember_mirror::{Reflect, TypeBuilder};

/// Path to an external resource (script, mesh, texture).
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ResourceRef {
    path: String,
}

impl ResourceRef {
    /// Creates a reference to `path`.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the referenced path.
    #[inline]
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Points the reference somewhere else.
    pub fn set_path(&mut self, path: impl Into<String>) {
        self.path = path.into();
    }

    /// Returns the directory part of the path, including the trailing `/`.
    ///
    /// Empty when the path has no `/`.
    #[must_use]
    pub fn directory(&self) -> &str {
        self.path
            .rfind('/')
            .map_or("", |slash| &self.path[..=slash])
    }

    /// Checks if no path is set.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

impl From<&str> for ResourceRef {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl Reflect for ResourceRef {
    const TYPE_NAME: &'static str = "ResourceReference";

    fn describe(builder: TypeBuilder<Self>) -> TypeBuilder<Self> {
        builder.property("path", |r| &r.path, |r, path| r.path = path)
    }
}
