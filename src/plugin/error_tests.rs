//! Tests for error chaining and classification with thiserror

#[cfg(test)]
mod tests {
    use super::super::error::*;
    use crate::core::error_handling::ContextualError;
    use std::error::Error;
    use std::io;

    #[test]
    fn test_method_invocation_keeps_original_cause() {
        let cause: MethodError = "division by zero".into();
        let error = PluginError::MethodInvocation {
            interface: "math".to_string(),
            method: "divide".to_string(),
            source: cause,
        };

        assert_eq!(error.to_string(), "Method 'math.divide' failed: division by zero");
        let source = error.source().expect("source should be kept");
        assert_eq!(source.to_string(), "division by zero");
        assert!(!error.is_user_actionable());
        assert_eq!(error.user_message(), None);
    }

    #[test]
    fn test_io_error_source_chain() {
        let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let error = PluginError::Io {
            operation: "write".to_string(),
            path: "/etc/plugmesh.toml".to_string(),
            source: io_error,
        };

        let mut depth = 0;
        let mut current: Option<&dyn Error> = Some(&error);
        while let Some(err) = current {
            depth += 1;
            current = err.source();
        }
        assert_eq!(depth, 2);
        assert!(error.to_string().contains("/etc/plugmesh.toml"));
    }

    #[test]
    fn test_cycle_error_conversion() {
        let cycle = CycleError::new(vec!["a".into(), "b".into(), "a".into()]);
        assert_eq!(cycle.to_string(), "Dependency cycle detected: a -> b -> a");
        assert!(cycle.involves("b"));
        assert!(!cycle.involves("c"));

        let error: PluginError = cycle.into();
        assert_eq!(error.to_string(), "Dependency cycle detected: a -> b -> a");
        assert_eq!(
            error.cycle_path(),
            Some(&["a".to_string(), "b".to_string(), "a".to_string()][..])
        );
        assert!(error.is_user_actionable());
    }

    #[test]
    fn test_lookup_errors_are_user_actionable() {
        let unknown = PluginError::UnknownInterface {
            name: "storage".to_string(),
        };
        assert_eq!(unknown.to_string(), "Unknown interface: storage");
        assert_eq!(
            unknown.user_message().as_deref(),
            Some("Unknown interface: storage")
        );

        let method = PluginError::UnknownMethod {
            interface: "math".to_string(),
            method: "pow".to_string(),
        };
        assert_eq!(method.to_string(), "Unknown method 'pow' on interface 'math'");
        assert!(method.cycle_path().is_none());
    }

    #[test]
    fn test_dependency_and_transition_messages() {
        use crate::plugin::types::PluginStatus;

        let unsatisfied = PluginError::DependencyUnsatisfied {
            plugin_id: "audit".to_string(),
            errors: vec![
                "missing required dependency: math".to_string(),
                "conflicting plugin is active: legacy-audit".to_string(),
            ],
        };
        assert_eq!(
            unsatisfied.to_string(),
            "Dependencies not satisfied for plugin 'audit': missing required dependency: math; conflicting plugin is active: legacy-audit"
        );

        let transition = PluginError::InvalidTransition {
            plugin_id: "text".to_string(),
            from: PluginStatus::Disabled,
            to: PluginStatus::Active,
        };
        assert_eq!(
            transition.to_string(),
            "Invalid status transition for plugin 'text': disabled -> active"
        );
    }

    #[test]
    fn test_system_errors_hide_details() {
        let error = PluginError::ExecutionError {
            plugin_name: "text".to_string(),
            operation: "cleanup".to_string(),
            cause: "handle closed".to_string(),
        };
        assert!(!error.is_user_actionable());
        assert!(error.to_string().contains("handle closed"));
    }
}
