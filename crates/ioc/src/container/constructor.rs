use std::sync::Arc;

use crate::container::descriptor::{ConstructorDescriptor, Instance, ServiceId};
use crate::errors::IocError;

/// A function usable as a constructor
///
/// Implemented for every `Fn(A1, .., An) -> R` with up to eight parameters.
/// The parameter types become the declared dependency list and `R` becomes
/// the bound type. Parameters and result are cloned out of the container, so
/// shared services are usually expressed as `Arc<T>` or `Arc<dyn Trait>`.
pub trait Constructor<Args>: Send + Sync + 'static {
    /// The type this constructor binds
    type Output: Clone + Send + Sync + 'static;

    /// Declared parameter types, in declaration order
    fn dependencies(&self) -> Vec<ServiceId>;

    /// Erase the constructor into a descriptor the registry can store
    fn into_descriptor(self) -> ConstructorDescriptor;
}

fn take_argument<A>(argument: Option<Instance>, service: ServiceId) -> Result<A, IocError>
where
    A: Clone + 'static,
{
    argument
        .as_deref()
        .and_then(|value| value.downcast_ref::<A>())
        .cloned()
        .ok_or_else(|| IocError::TypeMismatch {
            service_type: service.type_name.to_string(),
            expected: std::any::type_name::<A>().to_string(),
        })
}

macro_rules! impl_constructor {
    ($($arg:ident),*) => {
        impl<Func, Out, $($arg,)*> Constructor<($($arg,)*)> for Func
        where
            Func: Fn($($arg),*) -> Out + Send + Sync + 'static,
            Out: Clone + Send + Sync + 'static,
            $($arg: Clone + Send + Sync + 'static,)*
        {
            type Output = Out;

            fn dependencies(&self) -> Vec<ServiceId> {
                vec![$(ServiceId::of::<$arg>()),*]
            }

            #[allow(non_snake_case, unused_mut, unused_variables)]
            fn into_descriptor(self) -> ConstructorDescriptor {
                let output = ServiceId::of::<Out>();
                let dependencies = self.dependencies();
                ConstructorDescriptor {
                    outputs: vec![output],
                    dependencies,
                    factory: Some(Arc::new(move |arguments: Vec<Instance>| -> Result<Instance, IocError> {
                        let mut arguments = arguments.into_iter();
                        $(let $arg = take_argument::<$arg>(arguments.next(), output)?;)*
                        Ok(Arc::new((self)($($arg),*)) as Instance)
                    })),
                }
            }
        }
    };
}

impl_constructor!();
impl_constructor!(A1);
impl_constructor!(A1, A2);
impl_constructor!(A1, A2, A3);
impl_constructor!(A1, A2, A3, A4);
impl_constructor!(A1, A2, A3, A4, A5);
impl_constructor!(A1, A2, A3, A4, A5, A6);
impl_constructor!(A1, A2, A3, A4, A5, A6, A7);
impl_constructor!(A1, A2, A3, A4, A5, A6, A7, A8);
