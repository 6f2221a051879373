//! # Configuration
//!
//! Tuning knobs for the entity manager and the component definitions bound to
//! it. Loaded once at startup, usually from a TOML file:
//!
//! ```toml
//! entity_capacity = 4096
//! component_capacity = 1024
//! strict_handles = true
//! ```
//!
//! Every key is optional; missing keys take their [`Default`] value.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{EmberError, EmberResult};

/// Configuration shared by an [`EntityMgr`](crate::ecs::EntityMgr) and its
/// component definitions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EmberConfig {
    /// Entity slots reserved up front.
    pub entity_capacity: usize,
    /// Dense rows reserved up front by each component definition.
    pub component_capacity: usize,
    /// Panic on programmer errors (stale despawn, double assign) instead of
    /// logging a warning and returning a failure indicator.
    pub strict_handles: bool,
}

impl Default for EmberConfig {
    fn default() -> Self {
        Self {
            entity_capacity: 1024,
            component_capacity: 256,
            strict_handles: false,
        }
    }
}

impl EmberConfig {
    /// Parses and validates a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`EmberError::InvalidConfig`] on a parse failure or if
    /// [`validate`](Self::validate) rejects the values.
    pub fn from_toml_str(text: &str) -> EmberResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| EmberError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`EmberError::InvalidConfig`] if the file cannot be read or
    /// its contents are invalid.
    pub fn from_file(path: impl AsRef<Path>) -> EmberResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| EmberError::InvalidConfig(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Serializes the configuration back to TOML.
    ///
    /// # Errors
    ///
    /// Returns [`EmberError::InvalidConfig`] if serialization fails.
    pub fn to_toml_string(&self) -> EmberResult<String> {
        toml::to_string(self).map_err(|e| EmberError::InvalidConfig(e.to_string()))
    }

    /// Checks that both capacities are addressable by 32-bit indices.
    ///
    /// # Errors
    ///
    /// Returns [`EmberError::InvalidConfig`] naming the offending field.
    pub fn validate(&self) -> EmberResult<()> {
        // u32::MAX is reserved for the sentinel handles.
        let limit = u32::MAX as usize;
        if self.entity_capacity >= limit {
            return Err(EmberError::InvalidConfig(format!(
                "entity_capacity must be below {limit}, got {}",
                self.entity_capacity
            )));
        }
        if self.component_capacity >= limit {
            return Err(EmberError::InvalidConfig(format!(
                "component_capacity must be below {limit}, got {}",
                self.component_capacity
            )));
        }
        Ok(())
    }
}
