//! Error types for structural tree operations and configuration.

use crate::tree::ElementId;
use thiserror::Error;

/// Error returned by structural mutations of the [`ElementTree`](crate::ElementTree).
///
/// Behavioural operations (hover, click, navigation) never fail; only edits to the
/// tree shape can be rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// The element id is not (or no longer) part of the tree
    #[error("unknown element {0}")]
    UnknownElement(ElementId),
    /// Linking `child` under `parent` would make `child` its own ancestor
    #[error("attaching {child} under {parent} would create a cycle")]
    Cycle {
        /// Element being attached
        child: ElementId,
        /// Requested parent
        parent: ElementId,
    },
}

/// Error returned when loading or saving a [`MenuConfig`](crate::MenuConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// TOML could not be parsed
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Config could not be serialized
    #[error("serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// File could not be read or written
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// A value parsed but is not acceptable
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_error_display() {
        let err = TreeError::UnknownElement(ElementId::new(7));
        assert_eq!(err.to_string(), "unknown element #7");

        let err = TreeError::Cycle {
            child: ElementId::new(1),
            parent: ElementId::new(2),
        };
        assert_eq!(
            err.to_string(),
            "attaching #1 under #2 would create a cycle"
        );
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidValue("separator_style_key is empty".to_string());
        assert_eq!(err.to_string(), "invalid value: separator_style_key is empty");
    }

    #[test]
    fn test_config_error_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: ConfigError = io.into();
        assert!(matches!(err, ConfigError::Io(_)));
        assert!(err.to_string().starts_with("IO error"));
    }
}
