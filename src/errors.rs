use thiserror::Error;

/// Caller-visible failures of the lookup service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// Malformed input: short names, oversized batches, unknown procedures
    #[error("{0}")]
    BadRequest(String),
    /// No matching creature or kind; the message carries any suggestions
    #[error("{0}")]
    NotFound(String),
    /// Fixed-window quota exhausted for the operation
    #[error("Too many requests for '{operation}', try again later")]
    RateLimited { operation: String },
    /// Anything unexpected. Details are logged, never returned.
    #[error("An internal error occurred")]
    Internal,
}

impl LookupError {
    /// Stable wire code for the RPC envelope.
    pub fn code(&self) -> &'static str {
        match self {
            LookupError::BadRequest(_) => "BAD_REQUEST",
            LookupError::NotFound(_) => "NOT_FOUND",
            LookupError::RateLimited { .. } => "TOO_MANY_REQUESTS",
            LookupError::Internal => "INTERNAL_SERVER_ERROR",
        }
    }
}

/// Errors raised by a catalog backend or while populating it
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The underlying database rejected or failed a query
    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),
    /// A creature with this name already exists
    #[error("Creature '{0}' already exists")]
    DuplicateCreature(String),
    /// The same kind was listed twice for one creature
    #[error("Creature '{creature}' lists kind '{kind}' more than once")]
    DuplicateAffiliation { creature: String, kind: String },
    /// Every creature needs at least one kind
    #[error("Creature '{0}' has no kinds")]
    MissingKinds(String),
    /// More kinds than affiliation slots
    #[error("Creature '{creature}' lists {count} kinds, at most {max} allowed")]
    TooManyKinds {
        creature: String,
        count: usize,
        max: usize,
    },
    /// The seed file could not be read or parsed
    #[error("Seed error: {0}")]
    Seed(String),
}

impl From<std::io::Error> for CatalogError {
    fn from(err: std::io::Error) -> Self {
        CatalogError::Seed(err.to_string())
    }
}

impl From<ron::error::SpannedError> for CatalogError {
    fn from(err: ron::error::SpannedError) -> Self {
        CatalogError::Seed(err.to_string())
    }
}

/// Errors raised while reading configuration from the environment
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Invalid value '{value}' for {var}: expected {expected}")]
    InvalidValue {
        var: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Type alias for Results using LookupError
pub type LookupResult<T> = Result<T, LookupError>;

/// Type alias for Results using CatalogError
pub type CatalogResult<T> = Result<T, CatalogError>;
