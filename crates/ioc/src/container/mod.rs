#[allow(clippy::module_inception)]
pub mod container;
pub mod binding;
pub mod builder;
pub mod constructor;
pub mod descriptor;
pub mod handler;
pub mod registry;
pub mod resolver;
pub mod scope;

pub use binding::Binding;
pub use builder::ContainerBuilder;
pub use constructor::Constructor;
pub use container::Container;
pub use descriptor::{ConstructorDescriptor, ConstructorDescriptorBuilder, ErasedFactory, Instance, ServiceId};
pub use handler::Handler;
pub use registry::BindingRegistry;
pub use resolver::{DependencyGraph, ResolutionPath, Resolver};
pub use scope::ServiceScope;
