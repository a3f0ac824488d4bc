//! Shared type registry with a compute-once cache of resolved
//! creators.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use json_bind_creators::{resolve, ResolveOptions, ResolvedCreator, TypeDef};

use crate::error::MapError;

/// Inner state: registered defs plus the resolution cache.
#[derive(Debug, Default)]
pub struct TypeRegistryInner {
    pub defs: HashMap<String, Arc<TypeDef>>,
    pub resolved: HashMap<String, Arc<ResolvedCreator>>,
}

/// A namespace of registered types.
///
/// Wraps `TypeRegistryInner` in an `Arc<RwLock<>>` for shared
/// ownership. Resolution runs outside the lock; publication is
/// first-insert-wins, so concurrent resolvers of one type all end up
/// holding the same `Arc`.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    inner: Arc<RwLock<TypeRegistryInner>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a type definition. The definition is validated by a
    /// full resolution pass: definition errors abort registration and
    /// nothing is retained. Names are unique.
    pub fn register(&self, def: TypeDef, opts: &ResolveOptions) -> Result<(), MapError> {
        {
            let inner = self.inner.read().unwrap();
            if inner.defs.contains_key(&def.name) {
                return Err(MapError::DuplicateType(def.name.clone()));
            }
        }
        resolve(&def, opts)?;
        let mut inner = self.inner.write().unwrap();
        if inner.defs.contains_key(&def.name) {
            return Err(MapError::DuplicateType(def.name.clone()));
        }
        inner.defs.insert(def.name.clone(), Arc::new(def));
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        let inner = self.inner.read().unwrap();
        inner.defs.contains_key(name)
    }

    pub fn def(&self, name: &str) -> Option<Arc<TypeDef>> {
        let inner = self.inner.read().unwrap();
        inner.defs.get(name).cloned()
    }

    /// Registered type names, sorted.
    pub fn type_names(&self) -> Vec<String> {
        let inner = self.inner.read().unwrap();
        let mut names: Vec<String> = inner.defs.keys().cloned().collect();
        names.sort();
        names
    }

    /// Resolved creators for a registered type, from the cache when
    /// warm. A cold entry is computed outside the lock and published
    /// first-insert-wins; losers of the race adopt the winner's value.
    pub fn resolved(
        &self,
        name: &str,
        opts: &ResolveOptions,
    ) -> Result<Arc<ResolvedCreator>, MapError> {
        let def = {
            let inner = self.inner.read().unwrap();
            if let Some(hit) = inner.resolved.get(name) {
                return Ok(hit.clone());
            }
            inner
                .defs
                .get(name)
                .cloned()
                .ok_or_else(|| MapError::UnknownType(name.to_string()))?
        };
        let computed = Arc::new(resolve(&def, opts)?);
        let mut inner = self.inner.write().unwrap();
        let published = inner
            .resolved
            .entry(name.to_string())
            .or_insert(computed)
            .clone();
        Ok(published)
    }
}
