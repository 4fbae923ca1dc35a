use std::any::{Any, TypeId};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::errors::IocError;

/// Erased form of one resolved value
pub type Instance = Arc<dyn Any + Send + Sync>;

/// Factory receiving the resolved dependencies, in declaration order
pub type ErasedFactory = Arc<dyn Fn(Vec<Instance>) -> Result<Instance, IocError> + Send + Sync>;

/// Stable identity of a bindable type
///
/// Equality and hashing only look at the `TypeId`; the name is kept for
/// error messages and logs.
#[derive(Debug, Clone, Copy)]
pub struct ServiceId {
    pub type_id: TypeId,
    pub type_name: &'static str,
}

impl ServiceId {
    /// Create a service ID for a type
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Create the service ID of a value's type
    pub fn of_val<T: ?Sized + 'static>(_value: &T) -> Self {
        Self::of::<T>()
    }

    /// Get the type name as a string
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl PartialEq for ServiceId {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for ServiceId {}

impl Hash for ServiceId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl std::fmt::Display for ServiceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.type_name)
    }
}

/// Runtime description of a constructor: what it produces, what it needs,
/// and how to call it
#[derive(Clone)]
pub struct ConstructorDescriptor {
    /// Types produced by the constructor; a well-formed constructor has exactly one
    pub outputs: Vec<ServiceId>,
    /// Declared parameter types, in declaration order
    pub dependencies: Vec<ServiceId>,
    /// The callable; `None` when no function was supplied
    pub factory: Option<ErasedFactory>,
}

impl ConstructorDescriptor {
    /// Start describing a constructor by hand
    pub fn builder() -> ConstructorDescriptorBuilder {
        ConstructorDescriptorBuilder::new()
    }

    /// Check that the descriptor is callable and produces exactly one type,
    /// returning that type's identity
    pub fn validate(&self) -> Result<ServiceId, IocError> {
        let service_type = self.display_outputs();

        if self.factory.is_none() {
            return Err(IocError::invalid_shape(service_type, "must be a function"));
        }

        match self.outputs.as_slice() {
            [output] => Ok(*output),
            _ => Err(IocError::invalid_shape(service_type, "must return a single value")),
        }
    }

    fn display_outputs(&self) -> String {
        match self.outputs.as_slice() {
            [] => "<none>".to_string(),
            [output] => output.type_name.to_string(),
            outputs => format!(
                "({})",
                outputs.iter().map(|id| id.type_name).collect::<Vec<_>>().join(", ")
            ),
        }
    }
}

impl std::fmt::Debug for ConstructorDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConstructorDescriptor")
            .field("outputs", &self.outputs)
            .field("dependencies", &self.dependencies)
            .field("factory", &self.factory.as_ref().map(|_| "<factory_fn>"))
            .finish()
    }
}

/// Builder for hand-written constructor descriptors
#[derive(Default)]
pub struct ConstructorDescriptorBuilder {
    outputs: Vec<ServiceId>,
    dependencies: Vec<ServiceId>,
    factory: Option<ErasedFactory>,
}

impl ConstructorDescriptorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a produced type
    pub fn produces<T: ?Sized + 'static>(self) -> Self {
        self.produces_id(ServiceId::of::<T>())
    }

    pub fn produces_id(mut self, id: ServiceId) -> Self {
        self.outputs.push(id);
        self
    }

    /// Add a dependency
    pub fn depends_on<T: ?Sized + 'static>(self) -> Self {
        self.depends_on_id(ServiceId::of::<T>())
    }

    pub fn depends_on_id(mut self, id: ServiceId) -> Self {
        self.dependencies.push(id);
        self
    }

    /// Set the factory invoked with the resolved dependencies
    pub fn factory<F>(mut self, factory: F) -> Self
    where
        F: Fn(Vec<Instance>) -> Result<Instance, IocError> + Send + Sync + 'static,
    {
        self.factory = Some(Arc::new(factory));
        self
    }

    pub fn build(self) -> ConstructorDescriptor {
        ConstructorDescriptor {
            outputs: self.outputs,
            dependencies: self.dependencies,
            factory: self.factory,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Greeter: Send + Sync {}
    struct English;
    impl Greeter for English {}

    #[test]
    fn test_service_id_from_type_and_value() {
        let value: Arc<dyn Greeter> = Arc::new(English);
        assert_eq!(ServiceId::of_val(&value), ServiceId::of::<Arc<dyn Greeter>>());
        assert_ne!(ServiceId::of::<u32>(), ServiceId::of::<u64>());
        assert_eq!(ServiceId::of::<String>().to_string(), "alloc::string::String");
    }

    #[test]
    fn test_validate_requires_factory() {
        let descriptor = ConstructorDescriptor::builder().produces::<u32>().build();
        let err = descriptor.validate().unwrap_err();
        assert!(err.is_invalid_shape());
        assert!(err.to_string().contains("must be a function"));
    }

    #[test]
    fn test_validate_requires_single_output() {
        let none = ConstructorDescriptor::builder()
            .factory(|_| Ok(Arc::new(1u32) as Instance))
            .build();
        assert!(none
            .validate()
            .unwrap_err()
            .to_string()
            .contains("must return a single value"));

        let two = ConstructorDescriptor::builder()
            .produces::<u32>()
            .produces::<String>()
            .factory(|_| Ok(Arc::new(1u32) as Instance))
            .build();
        let err = two.validate().unwrap_err();
        assert!(err.is_invalid_shape());
        assert_eq!(err.service_type(), Some("(u32, alloc::string::String)"));
    }

    #[test]
    fn test_validate_returns_output_id() {
        let descriptor = ConstructorDescriptor::builder()
            .produces::<u32>()
            .depends_on::<String>()
            .factory(|_| Ok(Arc::new(1u32) as Instance))
            .build();
        assert_eq!(descriptor.validate().unwrap(), ServiceId::of::<u32>());
        assert_eq!(descriptor.dependencies, vec![ServiceId::of::<String>()]);
    }
}
