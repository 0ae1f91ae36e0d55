use thiserror::Error;

/// The custom error type for the domain API core.
///
/// Payloads are rendered strings so a single error type can travel through
/// controllers of any process type.
#[derive(Debug, Error)]
pub enum Error {
    /// A CANCELLED input was observed in the batch.
    #[error("Process was cancelled: {requirement}")]
    ProcessWasCancelled { requirement: String },

    /// An input referenced a requirement that is not currently missing.
    #[error("Invalid requirement result for process {process_id}: {requirement}")]
    InvalidRequirementResult {
        process_id: String,
        requirement: String,
    },

    /// A controller was invoked for a value in a state it does not handle.
    #[error("Invalid process state: expected {expected}, found {actual}")]
    InvalidProcessState { expected: String, actual: String },

    /// An input carried a result code this layer does not accept.
    #[error("Unsupported hurdle result code {code} for {requirement}")]
    UnsupportedHurdleResultCode { requirement: String, code: String },

    /// No controller is registered for the state of the value.
    #[error("No controller for state: {state}")]
    NoController { state: String },

    /// The state machine does not declare the requested edge.
    #[error("Illegal transition from {from} to {to}")]
    IllegalTransition { from: String, to: String },

    /// Auto-advancement exceeded the configured number of hops.
    #[error("Auto-advance limit of {limit} exceeded for process {process_id}")]
    AutoAdvanceLimitExceeded { process_id: String, limit: usize },

    /// A failure raised by a domain implementation of a controller operation.
    #[error("Domain error: {0}")]
    Domain(String),

    /// A configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// An internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A type alias for `Result<T, Error>` to simplify function signatures.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Creates an [`Error::Domain`] from anything displayable.
    pub fn domain(message: impl Into<String>) -> Self {
        Self::Domain(message.into())
    }

    /// Stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Error::ProcessWasCancelled { .. } => "PROCESS_CANCELLED",
            Error::InvalidRequirementResult { .. } => "INVALID_REQUIREMENT_RESULT",
            Error::InvalidProcessState { .. } => "INVALID_PROCESS_STATE",
            Error::UnsupportedHurdleResultCode { .. } => "UNSUPPORTED_RESULT_CODE",
            Error::NoController { .. } => "NO_CONTROLLER",
            Error::IllegalTransition { .. } => "ILLEGAL_TRANSITION",
            Error::AutoAdvanceLimitExceeded { .. } => "AUTO_ADVANCE_LIMIT",
            Error::Domain(_) => "DOMAIN_ERROR",
            Error::Config(_) => "CONFIG_ERROR",
            Error::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns true for errors caused by the client's inputs rather than by
    /// routing or domain failures.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::ProcessWasCancelled { .. }
                | Error::InvalidRequirementResult { .. }
                | Error::UnsupportedHurdleResultCode { .. }
        )
    }

    /// Converts the error into the JSON body the API layer returns to clients.
    pub fn to_body(&self) -> serde_json::Value {
        let message = match self {
            // Configuration details stay server-side
            Error::Config(_) => "Configuration error".to_string(),
            other => other.to_string(),
        };

        serde_json::json!({
            "error": message,
            "code": self.code(),
        })
    }
}
