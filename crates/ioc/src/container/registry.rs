use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::container::binding::Binding;
use crate::container::descriptor::{ConstructorDescriptor, ServiceId};
use crate::container::scope::ServiceScope;
use crate::errors::IocError;

/// Registry mapping each bound type to its binding
///
/// Structural changes take the write lock; lookups take the read lock only
/// long enough to clone the binding handle.
#[derive(Debug, Default)]
pub struct BindingRegistry {
    bindings: RwLock<HashMap<ServiceId, Arc<Binding>>>,
}

impl BindingRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a constructor under the type it produces
    ///
    /// The constructor is not invoked. Fails with `InvalidConstructorShape` if
    /// the descriptor is not a single-output function and with
    /// `DuplicateBinding` if the produced type is already bound; in both cases
    /// the registry is left untouched.
    pub fn register(
        &self,
        descriptor: ConstructorDescriptor,
        scope: ServiceScope,
    ) -> Result<ServiceId, IocError> {
        let mut bindings = self
            .bindings
            .write()
            .map_err(|_| IocError::lock("binding_registry"))?;

        let id = descriptor.validate()?;
        if bindings.contains_key(&id) {
            return Err(IocError::duplicate(id.type_name));
        }

        let ConstructorDescriptor {
            dependencies,
            factory,
            ..
        } = descriptor;
        let factory = factory.ok_or_else(|| IocError::invalid_shape(id.type_name, "must be a function"))?;

        tracing::debug!(
            service = %id,
            scope = %scope,
            dependencies = dependencies.len(),
            "binding registered"
        );

        bindings.insert(id, Arc::new(Binding::new(id, scope, dependencies, factory)));
        Ok(id)
    }

    /// Find the binding for a type
    pub fn lookup(&self, id: &ServiceId) -> Result<Arc<Binding>, IocError> {
        let bindings = self
            .bindings
            .read()
            .map_err(|_| IocError::lock("binding_registry"))?;

        bindings
            .get(id)
            .cloned()
            .ok_or_else(|| IocError::unbound(id.type_name))
    }

    /// Check if a type is bound
    pub fn contains(&self, id: &ServiceId) -> bool {
        self.bindings
            .read()
            .map(|bindings| bindings.contains_key(id))
            .unwrap_or(false)
    }

    /// Get the number of bindings
    pub fn len(&self) -> usize {
        self.bindings
            .read()
            .map(|bindings| bindings.len())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get all bound type identities
    pub fn service_ids(&self) -> Vec<ServiceId> {
        self.bindings
            .read()
            .map(|bindings| bindings.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Declared dependencies of a bound type, `None` if unbound
    pub fn dependencies_of(&self, id: &ServiceId) -> Option<Vec<ServiceId>> {
        self.bindings
            .read()
            .ok()?
            .get(id)
            .map(|binding| binding.dependencies().to_vec())
    }

    /// Declared dependencies of every binding reachable from `root`, read
    /// under a single lock
    ///
    /// Singletons that already hold an instance are recorded as leaves since
    /// they are never constructed again. Unbound types are left out.
    pub(crate) fn reachable_dependencies(
        &self,
        root: &ServiceId,
    ) -> Result<HashMap<ServiceId, Vec<ServiceId>>, IocError> {
        let bindings = self
            .bindings
            .read()
            .map_err(|_| IocError::lock("binding_registry"))?;

        let mut nodes = HashMap::new();
        let mut pending = vec![*root];

        while let Some(id) = pending.pop() {
            if nodes.contains_key(&id) {
                continue;
            }
            let Some(binding) = bindings.get(&id) else {
                continue;
            };
            let dependencies = if binding.is_cached() {
                Vec::new()
            } else {
                binding.dependencies().to_vec()
            };
            pending.extend(dependencies.iter().copied());
            nodes.insert(id, dependencies);
        }

        Ok(nodes)
    }

    /// Flag the given bindings as having an acyclic, fully bound graph
    pub(crate) fn mark_verified_acyclic<'i>(&self, ids: impl IntoIterator<Item = &'i ServiceId>) {
        if let Ok(bindings) = self.bindings.read() {
            for id in ids {
                if let Some(binding) = bindings.get(id) {
                    binding.mark_verified_acyclic();
                }
            }
        }
    }

    /// Snapshot of every binding's declared dependencies
    pub(crate) fn dependency_map(&self) -> Result<HashMap<ServiceId, Vec<ServiceId>>, IocError> {
        let bindings = self
            .bindings
            .read()
            .map_err(|_| IocError::lock("binding_registry"))?;

        Ok(bindings
            .iter()
            .map(|(id, binding)| (*id, binding.dependencies().to_vec()))
            .collect())
    }
}
