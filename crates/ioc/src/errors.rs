use crate::config::ConfigError;
use thiserror::Error;

/// Error type for registration and resolution
///
/// Every variant is a wiring or configuration mistake, never a transient
/// condition. Variants that concern a particular binding carry the fully
/// qualified type name so callers can tell which piece of wiring is wrong.
#[derive(Debug, Error)]
pub enum IocError {
    #[error("Invalid constructor for '{service_type}': constructor {reason}")]
    InvalidConstructorShape {
        service_type: String,
        reason: String,
    },

    #[error("Type already bound: {service_type}")]
    DuplicateBinding { service_type: String },

    #[error("Unbound type: {service_type}")]
    UnboundType { service_type: String },

    #[error("Circular dependency detected: {path} (cycle at: {cycle_service})")]
    CircularDependency { path: String, cycle_service: String },

    #[error("Resolution of '{service_type}' exceeded the maximum depth of {depth}")]
    ResolutionDepthExceeded { service_type: String, depth: usize },

    #[error("Type mismatch for '{service_type}': expected an instance of {expected}")]
    TypeMismatch {
        service_type: String,
        expected: String,
    },

    #[error("Binding for '{service_type}' produced a value of a different type")]
    WrongInstanceType { service_type: String },

    #[error("Invalid service scope: {scope}")]
    InvalidServiceScope { scope: String },

    #[error("Lock error on resource: {resource}")]
    LockError { resource: String },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl IocError {
    /// Create an invalid constructor shape error
    pub fn invalid_shape(service_type: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConstructorShape {
            service_type: service_type.into(),
            reason: reason.into(),
        }
    }

    /// Create a duplicate binding error
    pub fn duplicate(service_type: impl Into<String>) -> Self {
        Self::DuplicateBinding {
            service_type: service_type.into(),
        }
    }

    /// Create an unbound type error
    pub fn unbound(service_type: impl Into<String>) -> Self {
        Self::UnboundType {
            service_type: service_type.into(),
        }
    }

    pub(crate) fn lock(resource: impl Into<String>) -> Self {
        Self::LockError {
            resource: resource.into(),
        }
    }

    /// Check if the error is an unbound type error
    pub fn is_unbound(&self) -> bool {
        matches!(self, Self::UnboundType { .. })
    }

    /// Check if the error is a duplicate binding error
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::DuplicateBinding { .. })
    }

    /// Check if the error is an invalid constructor shape error
    pub fn is_invalid_shape(&self) -> bool {
        matches!(self, Self::InvalidConstructorShape { .. })
    }

    /// Check if the error is a circular dependency error
    pub fn is_circular(&self) -> bool {
        matches!(self, Self::CircularDependency { .. })
    }

    /// The type name the error is about, if any
    pub fn service_type(&self) -> Option<&str> {
        match self {
            Self::InvalidConstructorShape { service_type, .. }
            | Self::DuplicateBinding { service_type }
            | Self::UnboundType { service_type }
            | Self::ResolutionDepthExceeded { service_type, .. }
            | Self::TypeMismatch { service_type, .. }
            | Self::WrongInstanceType { service_type } => Some(service_type),
            Self::CircularDependency { cycle_service, .. } => Some(cycle_service),
            Self::InvalidServiceScope { .. } | Self::LockError { .. } | Self::Config(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_type() {
        let err = IocError::unbound("app::Mailer");
        assert_eq!(err.to_string(), "Unbound type: app::Mailer");

        let err = IocError::duplicate("app::Mailer");
        assert_eq!(err.to_string(), "Type already bound: app::Mailer");

        let err = IocError::invalid_shape("app::Mailer", "must be a function");
        assert_eq!(
            err.to_string(),
            "Invalid constructor for 'app::Mailer': constructor must be a function"
        );
    }

    #[test]
    fn test_error_predicates() {
        assert!(IocError::unbound("A").is_unbound());
        assert!(IocError::duplicate("A").is_duplicate());
        assert!(IocError::invalid_shape("A", "x").is_invalid_shape());
        assert!(!IocError::unbound("A").is_duplicate());

        let cycle = IocError::CircularDependency {
            path: "A -> B -> A".to_string(),
            cycle_service: "A".to_string(),
        };
        assert!(cycle.is_circular());
        assert_eq!(cycle.service_type(), Some("A"));
        assert_eq!(IocError::lock("bindings").service_type(), None);
    }
}
