use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    /// A required collaborator (backend, host) was never supplied.
    #[error("missing collaborator: {0}")]
    MissingCollaborator(&'static str),

    #[error("invalid scene config: {0}")]
    InvalidConfig(String),

    #[error("backend error: {0}")]
    Backend(String),

    /// Some items of a processor could not be updated this pass.
    /// The remaining items were still processed.
    #[error("{processor}: {count} item(s) faulted, first: {first}")]
    ItemFaults {
        processor: &'static str,
        count: usize,
        first: String,
    },

    #[error("engine already disposed")]
    Disposed,
}

#[derive(Debug, thiserror::Error)]
pub enum OrreryError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::FileNotFound(PathBuf::from("/tmp/missing.toml"));
        assert_eq!(err.to_string(), "config file not found: /tmp/missing.toml");

        let err = ConfigError::ParseError("unexpected token".into());
        assert_eq!(err.to_string(), "config parse error: unexpected token");

        let err = ConfigError::ValidationError("layers[0].id is empty".into());
        assert_eq!(
            err.to_string(),
            "config validation error: layers[0].id is empty"
        );
    }

    #[test]
    fn engine_error_display() {
        let err = EngineError::MissingCollaborator("backend");
        assert_eq!(err.to_string(), "missing collaborator: backend");

        let err = EngineError::ItemFaults {
            processor: "orbit",
            count: 2,
            first: "layer-3: non-finite position".into(),
        };
        assert_eq!(
            err.to_string(),
            "orbit: 2 item(s) faulted, first: layer-3: non-finite position"
        );

        assert_eq!(EngineError::Disposed.to_string(), "engine already disposed");
    }

    #[test]
    fn orrery_error_from_config() {
        let err: OrreryError = ConfigError::ParseError("bad toml".into()).into();
        assert!(matches!(err, OrreryError::Config(_)));
        assert!(err.to_string().contains("bad toml"));
    }

    #[test]
    fn orrery_error_from_engine() {
        let err: OrreryError = EngineError::InvalidConfig("duplicate id".into()).into();
        assert!(matches!(err, OrreryError::Engine(_)));
        assert!(err.to_string().contains("duplicate id"));
    }

    #[test]
    fn orrery_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: OrreryError = io_err.into();
        assert!(matches!(err, OrreryError::Io(_)));
        assert!(err.to_string().contains("file missing"));
    }
}
