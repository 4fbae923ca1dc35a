use std::collections::{HashMap, HashSet};

use crate::config::ContainerConfig;
use crate::container::binding::Binding;
use crate::container::descriptor::{Instance, ServiceId};
use crate::container::registry::BindingRegistry;
use crate::container::scope::ServiceScope;
use crate::errors::IocError;

/// Chain of services currently under construction, outermost first
#[derive(Debug, Clone, Default)]
pub struct ResolutionPath {
    pub services: Vec<ServiceId>,
}

impl ResolutionPath {
    /// Create a new resolution path
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a service to the resolution path
    pub fn push(&mut self, service_id: ServiceId) {
        self.services.push(service_id);
    }

    /// Remove the last service from the resolution path
    pub fn pop(&mut self) -> Option<ServiceId> {
        self.services.pop()
    }

    /// Check if the path contains a service (for cycle detection)
    pub fn contains(&self, service_id: &ServiceId) -> bool {
        self.services.contains(service_id)
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Get the path as a string for error messages
    pub fn path_string(&self) -> String {
        self.services
            .iter()
            .map(|id| id.type_name())
            .collect::<Vec<_>>()
            .join(" -> ")
    }

    fn cycle_error(&self, service_id: &ServiceId) -> IocError {
        let mut path = self.clone();
        path.push(*service_id);
        IocError::CircularDependency {
            path: path.path_string(),
            cycle_service: service_id.type_name().to_string(),
        }
    }
}

/// Declared dependency edges between bindings
#[derive(Debug, Default)]
pub struct DependencyGraph {
    nodes: HashMap<ServiceId, Vec<ServiceId>>,
}

impl DependencyGraph {
    /// Build the graph of every binding in the registry
    pub fn from_registry(registry: &BindingRegistry) -> Result<Self, IocError> {
        Ok(Self {
            nodes: registry.dependency_map()?,
        })
    }

    /// Build the graph of bindings reachable from `root`
    ///
    /// Unbound types are left out; resolving them reports `UnboundType`.
    /// Singletons already holding an instance are leaves.
    pub fn reachable_from(registry: &BindingRegistry, root: &ServiceId) -> Result<Self, IocError> {
        Ok(Self {
            nodes: registry.reachable_dependencies(root)?,
        })
    }

    /// Check that every declared dependency in the graph has a node
    pub fn is_complete(&self) -> bool {
        self.nodes
            .values()
            .flatten()
            .all(|dependency| self.nodes.contains_key(dependency))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get dependencies for a service
    pub fn get_dependencies(&self, service_id: &ServiceId) -> Option<&[ServiceId]> {
        self.nodes.get(service_id).map(Vec::as_slice)
    }

    /// Detect circular dependencies anywhere in the graph
    pub fn detect_cycles(&self) -> Result<(), IocError> {
        let mut visited = HashSet::new();
        for service_id in self.sorted_ids() {
            let mut path = ResolutionPath::new();
            self.detect_cycle_dfs(&service_id, &mut visited, &mut path)?;
        }
        Ok(())
    }

    /// Detect circular dependencies reachable from one service
    pub fn detect_cycles_from(&self, root: &ServiceId) -> Result<(), IocError> {
        let mut visited = HashSet::new();
        let mut path = ResolutionPath::new();
        self.detect_cycle_dfs(root, &mut visited, &mut path)
    }

    /// Check that every declared dependency has a binding
    pub fn validate_dependencies(&self) -> Result<(), IocError> {
        for service_id in self.sorted_ids() {
            for dependency in &self.nodes[&service_id] {
                if !self.nodes.contains_key(dependency) {
                    return Err(IocError::unbound(dependency.type_name()));
                }
            }
        }
        Ok(())
    }

    fn detect_cycle_dfs(
        &self,
        service_id: &ServiceId,
        visited: &mut HashSet<ServiceId>,
        path: &mut ResolutionPath,
    ) -> Result<(), IocError> {
        if path.contains(service_id) {
            return Err(path.cycle_error(service_id));
        }

        if visited.contains(service_id) {
            return Ok(());
        }

        path.push(*service_id);
        if let Some(dependencies) = self.nodes.get(service_id) {
            for dependency in dependencies {
                self.detect_cycle_dfs(dependency, visited, path)?;
            }
        }
        path.pop();
        visited.insert(*service_id);

        Ok(())
    }

    // HashMap order is random; sort so errors are reproducible.
    fn sorted_ids(&self) -> Vec<ServiceId> {
        let mut ids: Vec<ServiceId> = self.nodes.keys().copied().collect();
        ids.sort_by_key(|id| id.type_name());
        ids
    }
}

/// Resolves one top-level request against a registry
///
/// A resolver is created per top-level call; the dependency graph it walks
/// exists only for that call.
#[derive(Debug)]
pub struct Resolver<'a> {
    registry: &'a BindingRegistry,
    config: &'a ContainerConfig,
    path: ResolutionPath,
}

impl<'a> Resolver<'a> {
    pub fn new(registry: &'a BindingRegistry, config: &'a ContainerConfig) -> Self {
        Self {
            registry,
            config,
            path: ResolutionPath::new(),
        }
    }

    /// Produce an instance of `service_id`, constructing its dependencies first
    pub fn resolve(&mut self, service_id: &ServiceId) -> Result<Instance, IocError> {
        let binding = self.registry.lookup(service_id).map_err(|err| {
            tracing::warn!(
                service = %service_id,
                path = %self.path.path_string(),
                "resolution failed: {}",
                err
            );
            err
        })?;

        if let Some(instance) = binding.cached() {
            tracing::trace!(service = %service_id, "singleton cache hit");
            return Ok(instance);
        }

        if self.path.contains(service_id) {
            let err = self.path.cycle_error(service_id);
            tracing::warn!(service = %service_id, "{}", err);
            return Err(err);
        }

        if !binding.is_verified_acyclic() {
            self.verify_acyclic(service_id)?;
        }

        if self.path.len() >= self.config.max_depth {
            return Err(IocError::ResolutionDepthExceeded {
                service_type: service_id.type_name().to_string(),
                depth: self.config.max_depth,
            });
        }

        tracing::trace!(
            service = %service_id,
            scope = %binding.scope(),
            depth = self.path.len(),
            "resolving service"
        );

        match binding.scope() {
            ServiceScope::Transient => self.invoke(&binding),
            ServiceScope::Singleton => binding.get_or_init(|| self.invoke(&binding)),
        }
    }

    /// Walk the declared graph below `service_id` before any of it is
    /// constructed, so no init guard is ever taken inside a cycle
    ///
    /// A fully bound, acyclic graph cannot change afterwards, so its bindings
    /// are flagged and skipped next time.
    fn verify_acyclic(&self, service_id: &ServiceId) -> Result<(), IocError> {
        let graph = DependencyGraph::reachable_from(self.registry, service_id)?;
        graph
            .detect_cycles_from(service_id)
            .inspect_err(|err| tracing::warn!(service = %service_id, "{}", err))?;

        if graph.is_complete() {
            self.registry.mark_verified_acyclic(graph.nodes.keys());
        }
        Ok(())
    }

    /// Resolve the binding's parameters left to right, then call its constructor
    pub fn invoke(&mut self, binding: &Binding) -> Result<Instance, IocError> {
        self.path.push(binding.id());

        let result = binding
            .dependencies()
            .iter()
            .map(|dependency| self.resolve(dependency))
            .collect::<Result<Vec<_>, _>>()
            .and_then(|arguments| binding.construct(arguments));

        self.path.pop();
        result
    }
}
