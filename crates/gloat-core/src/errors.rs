use thiserror::Error;

/// Result type alias using GloatError
pub type Result<T> = std::result::Result<T, GloatError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that callers (the CLI, log
/// consumers, tests) can match on without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Collaborators
    SourceUnavailable,
    StoreUnavailable,

    // Transactional protocol
    Connection,
    Execution,
    Irreversible,
    Commit,
    Rollback,
    Cancelled,

    // Lookup / construction
    NotDeclared,
    InvalidVersion,
    InvalidInput,

    // Integration
    Io,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::SourceUnavailable => "ERR_SOURCE_UNAVAILABLE",
            ExErrorKind::StoreUnavailable => "ERR_STORE_UNAVAILABLE",
            ExErrorKind::Connection => "ERR_CONNECTION",
            ExErrorKind::Execution => "ERR_EXECUTION",
            ExErrorKind::Irreversible => "ERR_IRREVERSIBLE",
            ExErrorKind::Commit => "ERR_COMMIT",
            ExErrorKind::Rollback => "ERR_ROLLBACK",
            ExErrorKind::Cancelled => "ERR_CANCELLED",
            ExErrorKind::NotDeclared => "ERR_NOT_DECLARED",
            ExErrorKind::InvalidVersion => "ERR_INVALID_VERSION",
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::Io => "ERR_IO",
        }
    }
}

/// Canonical structured error type
///
/// A flattened view of a [`GloatError`] with classification fields for
/// programmatic handling and the operation/version context for debugging.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    version: Option<i64>,
    path: Option<String>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            version: None,
            path: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add migration version context
    pub fn with_version(mut self, version: i64) -> Self {
        self.version = Some(version);
        self
    }

    /// Add path context
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
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

    pub fn version(&self) -> Option<i64> {
        self.version
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any (the primary cause of a rollback failure)
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
        if let Some(version) = self.version {
            write!(f, " (version: {})", version)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path)?;
        }
        if let Some(source) = &self.source {
            write!(f, " caused by {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Error taxonomy for reconciliation and execution
///
/// Collaborator failures (`Source`, `Store`, `Connection`, `Execution`,
/// `Commit`) carry the driver's message unchanged.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GloatError {
    /// The declared migration set could not be collected
    #[error("Source unavailable: {message}")]
    Source { message: String },

    /// The applied migration set could not be read or written
    #[error("Store unavailable: {message}")]
    Store { message: String },

    /// A transaction could not be started
    #[error("Cannot begin transaction: {message}")]
    Connection { message: String },

    /// An up or down script failed
    #[error("Execution failed: {message}")]
    Execution { message: String },

    /// Revert requested on a migration without down content
    #[error("cannot reverse migration {version}")]
    Irreversible { version: i64 },

    /// The commit itself failed; the end state is whatever the database left
    #[error("Commit failed: {message}")]
    Commit { message: String },

    /// Rolling back after `cause` failed as well
    #[error("{cause} (rollback also failed: {rollback})")]
    Rollback {
        cause: Box<GloatError>,
        rollback: String,
    },

    /// The operation was aborted by a cancel token or deadline
    #[error("Migration {version} cancelled")]
    Cancelled { version: i64 },

    /// An applied migration has no declared counterpart to take content from
    #[error("Migration {version} is not declared in the source")]
    NotDeclared { version: i64 },

    /// A migration locator does not start with a numeric version
    #[error("cannot extract version from {path}")]
    InvalidVersion { path: String },

    /// Caller supplied input that cannot be used (names, table identifiers)
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    /// Filesystem failure while reading or writing migrations
    #[error("I/O error at {path}: {message}")]
    Io { path: String, message: String },
}

impl GloatError {
    /// Attach a failed rollback to a primary error
    pub fn with_rollback_failure(self, rollback: impl Into<String>) -> Self {
        GloatError::Rollback {
            cause: Box::new(self),
            rollback: rollback.into(),
        }
    }
}

/// Conversion from GloatError to ExError
impl From<GloatError> for ExError {
    fn from(err: GloatError) -> Self {
        match err {
            GloatError::Source { message } => ExError::new(ExErrorKind::SourceUnavailable)
                .with_op("source_collect")
                .with_message(message),

            GloatError::Store { message } => ExError::new(ExErrorKind::StoreUnavailable)
                .with_op("store")
                .with_message(message),

            GloatError::Connection { message } => ExError::new(ExErrorKind::Connection)
                .with_op("begin")
                .with_message(message),

            GloatError::Execution { message } => ExError::new(ExErrorKind::Execution)
                .with_op("execute")
                .with_message(message),

            GloatError::Irreversible { version } => ExError::new(ExErrorKind::Irreversible)
                .with_op("revert")
                .with_version(version)
                .with_message("Migration has no down content"),

            GloatError::Commit { message } => ExError::new(ExErrorKind::Commit)
                .with_op("commit")
                .with_message(message),

            GloatError::Rollback { cause, rollback } => ExError::new(ExErrorKind::Rollback)
                .with_op("rollback")
                .with_message(rollback)
                .with_source(ExError::from(*cause)),

            GloatError::Cancelled { version } => ExError::new(ExErrorKind::Cancelled)
                .with_version(version)
                .with_message("Operation cancelled before commit"),

            GloatError::NotDeclared { version } => ExError::new(ExErrorKind::NotDeclared)
                .with_op("lookup")
                .with_version(version)
                .with_message("Migration is not declared in the source"),

            GloatError::InvalidVersion { path } => ExError::new(ExErrorKind::InvalidVersion)
                .with_path(path)
                .with_message("Cannot extract version"),

            GloatError::InvalidInput { reason } => {
                ExError::new(ExErrorKind::InvalidInput).with_message(reason)
            }

            GloatError::Io { path, message } => ExError::new(ExErrorKind::Io)
                .with_path(path)
                .with_message(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_irreversible_message_names_version() {
        let err = GloatError::Irreversible { version: 100 };
        assert_eq!(err.to_string(), "cannot reverse migration 100");
    }

    #[test]
    fn test_rollback_failure_keeps_primary_cause() {
        let err = GloatError::Execution {
            message: "syntax error".to_string(),
        }
        .with_rollback_failure("disk I/O error");

        match &err {
            GloatError::Rollback { cause, rollback } => {
                assert_eq!(
                    **cause,
                    GloatError::Execution {
                        message: "syntax error".to_string()
                    }
                );
                assert_eq!(rollback, "disk I/O error");
            }
            other => panic!("expected Rollback, got {:?}", other),
        }
        assert!(err.to_string().contains("syntax error"));
        assert!(err.to_string().contains("disk I/O error"));
    }

    #[test]
    fn test_ex_error_display_includes_code_and_version() {
        let ex: ExError = GloatError::Irreversible { version: 7 }.into();
        let rendered = ex.to_string();
        assert!(rendered.starts_with("[ERR_IRREVERSIBLE]"));
        assert!(rendered.contains("(version: 7)"));
    }
}
