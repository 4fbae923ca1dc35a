use crate::config::ContainerConfig;
use crate::container::constructor::Constructor;
use crate::container::container::Container;
use crate::container::descriptor::ConstructorDescriptor;
use crate::container::scope::ServiceScope;
use crate::errors::IocError;

/// Builder for a container with fluent API
#[derive(Debug, Default)]
pub struct ContainerBuilder {
    config: ContainerConfig,
    bindings: Vec<(ConstructorDescriptor, ServiceScope)>,
}

impl ContainerBuilder {
    /// Create a new container builder
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: ContainerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn singleton<F, Args>(self, constructor: F) -> Self
    where
        F: Constructor<Args>,
    {
        self.descriptor(constructor.into_descriptor(), ServiceScope::Singleton)
    }

    pub fn transient<F, Args>(self, constructor: F) -> Self
    where
        F: Constructor<Args>,
    {
        self.descriptor(constructor.into_descriptor(), ServiceScope::Transient)
    }

    pub fn descriptor(mut self, descriptor: ConstructorDescriptor, scope: ServiceScope) -> Self {
        self.bindings.push((descriptor, scope));
        self
    }

    /// Register every binding in order, stopping at the first error
    pub fn build(self) -> Result<Container, IocError> {
        let validate = self.config.validate_on_build;
        let container = Container::with_config(self.config)?;

        for (descriptor, scope) in self.bindings {
            container.register(descriptor, scope)?;
        }

        if validate {
            container.validate()?;
        }

        Ok(container)
    }
}
