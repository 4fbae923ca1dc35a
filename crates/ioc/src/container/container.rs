use crate::config::ContainerConfig;
use crate::container::constructor::Constructor;
use crate::container::descriptor::{ConstructorDescriptor, Instance, ServiceId};
use crate::container::handler::Handler;
use crate::container::registry::BindingRegistry;
use crate::container::resolver::{DependencyGraph, Resolver};
use crate::container::scope::ServiceScope;
use crate::errors::IocError;

/// Dependency injection container
///
/// Each container owns its own registry; two containers never share bindings
/// or singleton instances. All methods take `&self`, so a container can be
/// shared between threads behind an `Arc`.
pub struct Container {
    registry: BindingRegistry,
    config: ContainerConfig,
}

impl Container {
    /// Create an empty container with default configuration
    pub fn new() -> Self {
        Self {
            registry: BindingRegistry::new(),
            config: ContainerConfig::default(),
        }
    }

    /// Create an empty container with the given configuration
    pub fn with_config(config: ContainerConfig) -> Result<Self, IocError> {
        config.validate()?;
        Ok(Self {
            registry: BindingRegistry::new(),
            config,
        })
    }

    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    /// Register a constructor descriptor with an explicit scope
    pub fn register(
        &self,
        descriptor: ConstructorDescriptor,
        scope: ServiceScope,
    ) -> Result<ServiceId, IocError> {
        self.registry.register(descriptor, scope)
    }

    /// Register a constructor whose result is created once and shared
    pub fn register_singleton<F, Args>(&self, constructor: F) -> Result<ServiceId, IocError>
    where
        F: Constructor<Args>,
    {
        self.register(constructor.into_descriptor(), ServiceScope::Singleton)
    }

    /// Register a constructor that runs on every resolution
    pub fn register_transient<F, Args>(&self, constructor: F) -> Result<ServiceId, IocError>
    where
        F: Constructor<Args>,
    {
        self.register(constructor.into_descriptor(), ServiceScope::Transient)
    }

    /// Resolve a service by type
    ///
    /// A binding that produced something other than `T` is reported as
    /// `WrongInstanceType`.
    pub fn resolve<T>(&self) -> Result<T, IocError>
    where
        T: Clone + Send + Sync + 'static,
    {
        let service_id = ServiceId::of::<T>();
        let instance = self.resolve_by_id(&service_id)?;

        instance
            .downcast_ref::<T>()
            .cloned()
            .ok_or_else(|| IocError::WrongInstanceType {
                service_type: service_id.type_name().to_string(),
            })
    }

    /// Resolve a service by its identity, without narrowing the result
    pub fn resolve_by_id(&self, service_id: &ServiceId) -> Result<Instance, IocError> {
        Resolver::new(&self.registry, &self.config).resolve(service_id)
    }

    /// Resolve a handler and pass it the request
    pub fn dispatch<H, Req>(&self, request: Req) -> Result<H::Output, IocError>
    where
        H: Handler<Req> + Clone + Send + Sync + 'static,
    {
        let handler = self.resolve::<H>()?;
        Ok(handler.handle(request))
    }

    /// Check if a service is registered
    pub fn contains<T: ?Sized + 'static>(&self) -> bool {
        self.registry.contains(&ServiceId::of::<T>())
    }

    /// Get the number of registered services
    pub fn service_count(&self) -> usize {
        self.registry.len()
    }

    /// Get a list of all registered service types
    pub fn registered_services(&self) -> Vec<ServiceId> {
        self.registry.service_ids()
    }

    pub fn registry(&self) -> &BindingRegistry {
        &self.registry
    }

    /// Check that every declared dependency is bound and, when
    /// `detect_cycles` is set, that no binding depends on itself, without
    /// invoking any constructor
    pub fn validate(&self) -> Result<(), IocError> {
        let graph = DependencyGraph::from_registry(&self.registry)?;
        graph.validate_dependencies()?;
        if self.config.detect_cycles {
            graph.detect_cycles()?;
        }
        Ok(())
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("service_count", &self.service_count())
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    trait Greeter: Send + Sync {
        fn greet(&self, name: &str) -> String;
    }

    struct English;

    impl Greeter for English {
        fn greet(&self, name: &str) -> String {
            format!("Hello, {}", name)
        }
    }

    struct GreetingHandler {
        greeter: Arc<dyn Greeter>,
    }

    impl Handler<String> for GreetingHandler {
        type Output = String;

        fn handle(&self, request: String) -> String {
            self.greeter.greet(&request)
        }
    }

    #[test]
    fn test_resolve_trait_object() {
        let container = Container::new();
        container
            .register_singleton(|| Arc::new(English) as Arc<dyn Greeter>)
            .unwrap();

        let greeter = container.resolve::<Arc<dyn Greeter>>().unwrap();
        assert_eq!(greeter.greet("elif"), "Hello, elif");
        assert!(container.contains::<Arc<dyn Greeter>>());
        assert!(!container.contains::<English>());
    }

    #[test]
    fn test_dispatch_resolves_fresh_handler() {
        let container = Container::new();
        let created = Arc::new(AtomicUsize::new(0));
        let counter = created.clone();

        container
            .register_singleton(|| Arc::new(English) as Arc<dyn Greeter>)
            .unwrap();
        container
            .register_transient(move |greeter: Arc<dyn Greeter>| {
                counter.fetch_add(1, Ordering::SeqCst);
                Arc::new(GreetingHandler { greeter })
            })
            .unwrap();

        let first = container
            .dispatch::<Arc<GreetingHandler>, _>("Ada".to_string())
            .unwrap();
        let second = container
            .dispatch::<Arc<GreetingHandler>, _>("Grace".to_string())
            .unwrap();

        assert_eq!(first, "Hello, Ada");
        assert_eq!(second, "Hello, Grace");
        assert_eq!(created.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_dispatch_unbound_handler() {
        let container = Container::new();
        let err = container
            .dispatch::<Arc<GreetingHandler>, _>("Ada".to_string())
            .unwrap_err();
        assert!(err.is_unbound());
    }

    #[test]
    fn test_resolve_reports_mismatched_factory() {
        let container = Container::new();
        let descriptor = ConstructorDescriptor::builder()
            .produces::<u32>()
            .factory(|_| Ok(Arc::new("not a number") as Instance))
            .build();
        container.register(descriptor, ServiceScope::Transient).unwrap();

        let err = container.resolve::<u32>().unwrap_err();
        assert!(matches!(err, IocError::WrongInstanceType { .. }));
        assert_eq!(
            err.to_string(),
            "Binding for 'u32' produced a value of a different type"
        );
        assert_eq!(err.service_type(), Some("u32"));
    }

    #[test]
    fn test_validate() {
        let container = Container::new();
        container.register_transient(|n: u8| n as u32).unwrap();
        assert!(container.validate().unwrap_err().is_unbound());

        container.register_transient(|| 1u8).unwrap();
        assert!(container.validate().is_ok());
        assert_eq!(container.service_count(), 2);
    }

    #[test]
    fn test_validate_cycle_check_follows_config() {
        #[derive(Clone, Debug)]
        struct Ping;
        #[derive(Clone)]
        struct Pong;

        let lenient =
            Container::with_config(ContainerConfig::default().with_cycle_detection(false)).unwrap();
        lenient.register_singleton(|_p: Pong| Ping).unwrap();
        lenient.register_singleton(|_p: Ping| Pong).unwrap();
        assert!(lenient.validate().is_ok());
        assert!(lenient.resolve::<Ping>().unwrap_err().is_circular());

        let strict = Container::new();
        strict.register_singleton(|_p: Pong| Ping).unwrap();
        strict.register_singleton(|_p: Ping| Pong).unwrap();
        assert!(strict.validate().unwrap_err().is_circular());
    }

    #[test]
    fn test_with_config_rejects_invalid() {
        let config = ContainerConfig::default().with_max_depth(0);
        assert!(matches!(
            Container::with_config(config),
            Err(IocError::Config(_))
        ));
    }
}
