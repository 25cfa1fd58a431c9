use structure_core_types::RequestId;
use thiserror::Error;

/// Result type alias for the pure domain operations
pub type Result<T> = std::result::Result<T, StructureError>;

/// Canonical error kind taxonomy
///
/// Every failure that crosses a crate boundary is classified by one of these
/// kinds. The kind maps to a stable code used in logs and assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Structural/Validation
    InvalidInput,
    InvalidName,
    NotFound,
    AlreadyExists,
    /// A skeleton or set was referenced that is not present in its mapping
    MissingMapping,
    /// A user-data row has no creation timestamp
    MissingTimestamp,

    // Seed / schema
    InvalidSeed,
    SchemaMismatch,

    // Integration/IO
    Io,
    Serialization,
    Persistence,
    Config,
    Concurrency,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::InvalidName => "ERR_INVALID_NAME",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::AlreadyExists => "ERR_ALREADY_EXISTS",
            ExErrorKind::MissingMapping => "ERR_MISSING_MAPPING",
            ExErrorKind::MissingTimestamp => "ERR_MISSING_TIMESTAMP",
            ExErrorKind::InvalidSeed => "ERR_INVALID_SEED",
            ExErrorKind::SchemaMismatch => "ERR_SCHEMA_MISMATCH",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Config => "ERR_CONFIG",
            ExErrorKind::Concurrency => "ERR_CONCURRENCY",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification plus optional context (operation, entity,
/// request correlation) for logging and programmatic handling.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    request_id: Option<RequestId>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            request_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity context (routine name, workout id, movement id, ...)
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Wrap a lower-level error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        if let Some(source) = &self.source {
            write!(f, " caused by {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Domain errors raised by the pure core (drafts, set logs, history)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StructureError {
    /// Routine or workout name is empty or whitespace-only
    #[error("Invalid name: {reason}")]
    InvalidName { reason: String },

    /// Skeleton referenced but absent from a draft workout's mapping
    #[error("Movement skeleton not in draft workout: {skeleton}")]
    MissingSkeleton { skeleton: String },

    /// No set log entry for the given movement/set
    #[error("No set {set_index} logged for movement {movement_id}")]
    MissingSet { movement_id: i64, set_index: u32 },

    /// User-data row without a creation timestamp
    #[error("Movement user data {id} has no creation timestamp")]
    MissingTimestamp { id: i64 },

    /// A screen required a selection that the session does not hold
    #[error("Nothing selected: {what}")]
    NotSelected { what: String },

}

impl From<StructureError> for ExError {
    fn from(err: StructureError) -> Self {
        match err {
            StructureError::InvalidName { reason } => ExError::new(ExErrorKind::InvalidName)
                .with_message(format!("Invalid name: {}", reason)),

            StructureError::MissingSkeleton { skeleton } => {
                ExError::new(ExErrorKind::MissingMapping)
                    .with_entity_id(skeleton)
                    .with_message("Skeleton is not part of the draft workout")
            }

            StructureError::MissingSet {
                movement_id,
                set_index,
            } => ExError::new(ExErrorKind::MissingMapping)
                .with_entity_id(movement_id.to_string())
                .with_message(format!("No set {} logged for movement", set_index)),

            StructureError::MissingTimestamp { id } => ExError::new(ExErrorKind::MissingTimestamp)
                .with_entity_id(id.to_string())
                .with_message("User data row has no creation timestamp"),

            StructureError::NotSelected { what } => ExError::new(ExErrorKind::NotFound)
                .with_message(format!("No {} selected", what)),
        }
    }
}
