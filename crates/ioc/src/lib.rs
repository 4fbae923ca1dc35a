//! Minimal inversion-of-control container
//!
//! Constructors are registered against the type they produce, with a
//! [`ServiceScope`] deciding whether the result is shared or rebuilt on each
//! resolution. Resolving a type resolves the constructor's parameters first,
//! depth first and left to right.
//!
//! ```
//! use std::sync::Arc;
//! use elif_ioc::Container;
//!
//! struct Database;
//! struct UserRepository {
//!     db: Arc<Database>,
//! }
//!
//! let container = Container::new();
//! container.register_singleton(|| Arc::new(Database)).unwrap();
//! container
//!     .register_transient(|db: Arc<Database>| Arc::new(UserRepository { db }))
//!     .unwrap();
//!
//! let first = container.resolve::<Arc<UserRepository>>().unwrap();
//! let second = container.resolve::<Arc<UserRepository>>().unwrap();
//! assert!(!Arc::ptr_eq(&first, &second));
//! assert!(Arc::ptr_eq(&first.db, &second.db));
//! ```

pub mod config;
pub mod container;
pub mod errors;
pub mod global;

pub use config::{ConfigError, ContainerConfig};
pub use container::{
    Binding, BindingRegistry, ConstructorDescriptor, Constructor, Container, ContainerBuilder,
    Handler, Instance, ServiceId, ServiceScope,
};
pub use errors::IocError;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get crate version
pub fn version() -> &'static str {
    VERSION
}
