use std::fmt;

/// Resource categories held by the daemon snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Containers,
    Images,
    Info,
    Networks,
    Volumes,
}

impl Category {
    /// All categories, in the order a full initialization refreshes them
    pub const ALL: [Category; 5] = [
        Category::Containers,
        Category::Images,
        Category::Info,
        Category::Networks,
        Category::Volumes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Containers => "containers",
            Category::Images => "images",
            Category::Info => "info",
            Category::Networks => "networks",
            Category::Volumes => "volumes",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of a single call against the remote daemon
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Docker API error: {0}")]
    Docker(#[from] bollard::errors::Error),
    #[error("Daemon rejected request: {0}")]
    Rejected(String),
}

/// Errors surfaced by the daemon state cache and volume operations
#[derive(Debug, thiserror::Error)]
pub enum DaemonError {
    #[error("Failed to connect to Docker daemon: {0}")]
    Connection(#[source] ClientError),
    #[error("Failed to refresh {category}: {source}")]
    Refresh {
        category: Category,
        #[source]
        source: ClientError,
    },
    #[error("Invalid {field} entry '{entry}': expected key=value")]
    Parse { field: String, entry: String },
    #[error("Failed to create volume '{name}': {source}")]
    Create {
        name: String,
        #[source]
        source: ClientError,
    },
    #[error("Failed to remove volume '{name}': {source}")]
    Remove {
        name: String,
        #[source]
        source: ClientError,
    },
    #[error("No volume {0} found")]
    NotFound(String),
}

impl DaemonError {
    /// The category whose refresh failed, if this is a refresh error
    pub fn category(&self) -> Option<Category> {
        match self {
            DaemonError::Refresh { category, .. } => Some(*category),
            _ => None,
        }
    }
}
