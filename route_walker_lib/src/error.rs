use thiserror::Error;

/// A route descriptor that cannot be walked.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RouteError {
    #[error("route {key}: max distance must be a positive number of km, got {value}")]
    InvalidMaxDistance { key: String, value: f64 },

    #[error("route {key}: coordinates must be finite")]
    InvalidCoordinate { key: String },

    #[error("route {key}: media source is empty")]
    MissingMedia { key: String },
}

/// Unknown region/route combinations and broken catalog files.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    #[error("unknown region: {0}")]
    UnknownRegion(String),

    #[error("unknown route {key} in region {region}")]
    UnknownRoute { region: String, key: String },

    #[error("failed to parse catalog: {0}")]
    Parse(String),

    #[error(transparent)]
    InvalidRoute(#[from] RouteError),
}

/// Failures reported by a platform media implementation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MediaError {
    #[error("media cannot be decoded on this platform: {0}")]
    Unsupported(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlaybackError {
    #[error("media unsupported: {0}")]
    MediaUnsupported(String),
}

impl From<MediaError> for PlaybackError {
    fn from(value: MediaError) -> Self {
        match value {
            MediaError::Unsupported(reason) => PlaybackError::MediaUnsupported(reason),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Playback(#[from] PlaybackError),

    #[error("no route is active")]
    NoActiveRoute,

    #[error("unknown action: {0}")]
    UnknownAction(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("config value {name} must be positive, got {value}")]
    NotPositive { name: &'static str, value: f64 },
}
