use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, OnceLock};

use crate::container::descriptor::{ErasedFactory, Instance, ServiceId};
use crate::container::scope::ServiceScope;
use crate::errors::IocError;

/// Shared instance of a singleton binding
///
/// `instance` is only ever set while `init_guard` is held, and only with a
/// fully constructed value.
#[derive(Default)]
struct SingletonCell {
    instance: OnceLock<Instance>,
    init_guard: Mutex<()>,
}

/// One registered recipe for producing instances of a type
pub struct Binding {
    id: ServiceId,
    scope: ServiceScope,
    dependencies: Vec<ServiceId>,
    factory: ErasedFactory,
    cell: Option<SingletonCell>,
    /// Set once every type reachable from this binding is bound and no cycle
    /// was found; declared dependencies never change after registration.
    acyclic: AtomicBool,
}

impl Binding {
    pub(crate) fn new(
        id: ServiceId,
        scope: ServiceScope,
        dependencies: Vec<ServiceId>,
        factory: ErasedFactory,
    ) -> Self {
        Self {
            id,
            scope,
            dependencies,
            factory,
            cell: scope.is_singleton().then(SingletonCell::default),
            acyclic: AtomicBool::new(false),
        }
    }

    pub fn id(&self) -> ServiceId {
        self.id
    }

    pub fn scope(&self) -> ServiceScope {
        self.scope
    }

    /// Declared parameter types of the constructor
    pub fn dependencies(&self) -> &[ServiceId] {
        &self.dependencies
    }

    /// The shared instance, if this is a singleton that has been resolved
    pub fn cached(&self) -> Option<Instance> {
        self.cell.as_ref()?.instance.get().cloned()
    }

    pub fn is_cached(&self) -> bool {
        self.cached().is_some()
    }

    /// Whether the dependency graph below this binding is known to be acyclic
    pub fn is_verified_acyclic(&self) -> bool {
        self.acyclic.load(Ordering::Acquire)
    }

    pub(crate) fn mark_verified_acyclic(&self) {
        self.acyclic.store(true, Ordering::Release);
    }

    /// Call the constructor with already resolved arguments
    pub(crate) fn construct(&self, arguments: Vec<Instance>) -> Result<Instance, IocError> {
        (self.factory)(arguments)
    }

    /// Return the shared instance, running `init` at most once across all threads
    ///
    /// Transient bindings have no cell and always run `init`.
    pub(crate) fn get_or_init<F>(&self, init: F) -> Result<Instance, IocError>
    where
        F: FnOnce() -> Result<Instance, IocError>,
    {
        let Some(cell) = &self.cell else {
            return init();
        };

        if let Some(instance) = cell.instance.get() {
            return Ok(instance.clone());
        }

        // The guard protects no data, so a constructor that panicked earlier
        // leaves nothing inconsistent behind.
        let _guard = cell
            .init_guard
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(instance) = cell.instance.get() {
            return Ok(instance.clone());
        }

        let instance = init()?;
        tracing::debug!(service = %self.id, "singleton instance created");
        Ok(cell.instance.get_or_init(|| instance).clone())
    }
}

impl std::fmt::Debug for Binding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Binding")
            .field("id", &self.id)
            .field("scope", &self.scope)
            .field("dependencies", &self.dependencies)
            .field("cached", &self.is_cached())
            .field("acyclic", &self.is_verified_acyclic())
            .finish()
    }
}
