pub mod container_config;
pub mod validation;

pub use container_config::*;
pub use validation::*;
