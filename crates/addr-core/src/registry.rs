//! String-keyed constructor registries.

use std::collections::BTreeMap;
use std::fmt;

use crate::config::ServiceConfig;
use crate::error::{RegistryError, Result};

pub type Constructor<C> = Box<dyn Fn(&ServiceConfig) -> Result<C> + Send + Sync>;

/// Maps keys to constructors for one kind of component.
pub struct Registry<C> {
    kind: &'static str,
    constructors: BTreeMap<String, Constructor<C>>,
}

impl<C> fmt::Debug for Registry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("kind", &self.kind)
            .field("keys", &self.available())
            .finish()
    }
}

impl<C> Registry<C> {
    /// Empty registry; `kind` names the components in error messages.
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            constructors: BTreeMap::new(),
        }
    }

    /// # Errors
    ///
    /// [`RegistryError::Duplicate`] when `key` is taken.
    pub fn register<F>(
        &mut self,
        key: impl Into<String>,
        constructor: F,
    ) -> std::result::Result<(), RegistryError>
    where
        F: Fn(&ServiceConfig) -> Result<C> + Send + Sync + 'static,
    {
        let key = key.into();
        if self.constructors.contains_key(&key) {
            return Err(RegistryError::Duplicate {
                kind: self.kind,
                key,
            });
        }
        tracing::trace!(kind = self.kind, %key, "registered constructor");
        self.constructors.insert(key, Box::new(constructor));
        Ok(())
    }

    /// # Errors
    ///
    /// [`RegistryError::Unknown`] for an unregistered key, or whatever the
    /// constructor returns.
    pub fn create(&self, key: &str, config: &ServiceConfig) -> Result<C> {
        let constructor = self.constructors.get(key).ok_or_else(|| RegistryError::Unknown {
            kind: self.kind,
            key: key.to_string(),
            available: self.available().into_iter().map(str::to_string).collect(),
        })?;
        constructor(config)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.constructors.contains_key(key)
    }

    /// Registered keys, sorted.
    pub fn available(&self) -> Vec<&str> {
        self.constructors.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;

    #[test]
    fn duplicate_keys_are_rejected() {
        let mut registry: Registry<u8> = Registry::new("number");
        registry.register("one", |_| Ok(1)).unwrap();
        let err = registry.register("one", |_| Ok(2)).unwrap_err();
        assert_eq!(
            err,
            RegistryError::Duplicate {
                kind: "number",
                key: "one".to_string()
            }
        );
        assert_eq!(registry.create("one", &ServiceConfig::default()).unwrap(), 1);
    }

    #[test]
    fn unknown_keys_list_what_is_available() {
        let mut registry: Registry<u8> = Registry::new("number");
        registry.register("two", |_| Ok(2)).unwrap();
        registry.register("one", |_| Ok(1)).unwrap();
        assert_eq!(registry.available(), ["one", "two"]);

        let err = registry.create("three", &ServiceConfig::default()).unwrap_err();
        assert!(matches!(err, ServiceError::Registry(RegistryError::Unknown { .. })));
        assert_eq!(err.to_string(), "unknown number `three` (available: one, two)");
    }
}
