//! Process-wide default container
//!
//! A convenience for applications that want one container for their whole
//! lifetime. Libraries and tests should own a [`Container`] instead.

use std::sync::OnceLock;

use crate::container::{Constructor, Container, ServiceId};
use crate::errors::IocError;

static GLOBAL: OnceLock<Container> = OnceLock::new();

/// The process-wide container, created with default configuration on first use
pub fn container() -> &'static Container {
    GLOBAL.get_or_init(Container::new)
}

pub fn bind_singleton<F, Args>(constructor: F) -> Result<ServiceId, IocError>
where
    F: Constructor<Args>,
{
    container().register_singleton(constructor)
}

pub fn bind_transient<F, Args>(constructor: F) -> Result<ServiceId, IocError>
where
    F: Constructor<Args>,
{
    container().register_transient(constructor)
}

pub fn resolve<T>() -> Result<T, IocError>
where
    T: Clone + Send + Sync + 'static,
{
    container().resolve::<T>()
}
