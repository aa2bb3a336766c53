use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("not authenticated: run 'tracker auth set --cookie <cookie>'")]
    NotAuthenticated,

    #[error("work item not found: {0}")]
    WorkItemNotFound(String),

    #[error("project not found: {0}")]
    ProjectNotFound(String),

    #[error("tracker API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("home directory not found: set HOME environment variable")]
    HomeNotFound,

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TrackerError>;
