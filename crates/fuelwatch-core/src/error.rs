use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read provider config {path}: {source}")]
    ConfigFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse provider config: {0}")]
    ConfigFileParse(#[from] serde_yaml::Error),

    #[error("invalid provider config: {0}")]
    Validation(String),

    #[error("unknown fuel type: {0}")]
    UnknownFuelType(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeoError {
    /// `GeoCursor::to` was called on a cursor without an origin.
    #[error("no origin coordinate set; set one with `from_origin` first")]
    OriginNotSet,
}
