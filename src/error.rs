use thiserror::Error;

pub const EXIT_INVALID_CREDENTIALS: i32 = 200;
pub const EXIT_BAD_REQUEST: i32 = 201;
pub const EXIT_INVALID_INPUT: i32 = 202;
pub const EXIT_UNKNOWN_ERROR: i32 = 249;
pub const EXIT_FAILURE: i32 = 1;

#[derive(Debug, Error)]
pub enum TicketError {
    /// ClickUp answered 401.
    #[error("ClickUp permissions error: check that the token is correct and has access to {target}")]
    InvalidCredentials { target: String },

    /// ClickUp answered 400.
    #[error("ClickUp responded with Bad Request: {body}")]
    BadRequest { body: String },

    /// Any other non-200 answer.
    #[error("Unknown HTTP status {status} from ClickUp: {body}")]
    UnknownError { status: u16, body: String },

    #[error("Invalid date '{0}': expected month/day/year, e.g. 03/14/2025")]
    InvalidDateFormat(String),

    #[error("Malformed value for {flag}: {reason}")]
    MalformedLiteral { flag: String, reason: String },

    #[error("Invalid task id '{0}': it must be a single path component")]
    InvalidTaskId(String),

    #[error("Invalid file name pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TicketError {
    pub fn malformed(flag: &str, reason: impl Into<String>) -> Self {
        TicketError::MalformedLiteral {
            flag: flag.to_string(),
            reason: reason.into(),
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            TicketError::InvalidCredentials { .. } => EXIT_INVALID_CREDENTIALS,
            TicketError::BadRequest { .. } => EXIT_BAD_REQUEST,
            TicketError::UnknownError { .. } => EXIT_UNKNOWN_ERROR,
            TicketError::InvalidDateFormat(_)
            | TicketError::MalformedLiteral { .. }
            | TicketError::InvalidPattern { .. }
            | TicketError::InvalidTaskId(_) => EXIT_INVALID_INPUT,
            TicketError::Http(_) | TicketError::Io(_) | TicketError::Json(_) => EXIT_FAILURE,
        }
    }
}

/// Exit code for an error bubbled up through `anyhow`.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<TicketError>())
        .map(TicketError::exit_code)
        .unwrap_or(EXIT_FAILURE)
}
