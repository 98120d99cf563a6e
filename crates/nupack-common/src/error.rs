use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NupackError {
    /// Missing or malformed request fields. Raised before any tool is spawned.
    #[error("Invalid input: {0}")]
    Input(String),

    /// The tool's prompt sequence did not match the script, or a bounded wait expired.
    #[error("Interaction with {tool} failed: {reason}")]
    Interaction {
        tool: String,
        reason: String,
        timed_out: bool,
        /// Unconsumed tool output at the time of failure.
        transcript: String,
    },

    /// The harvested payload was not valid JSON.
    #[error("Could not parse {tool} output as JSON: {source}")]
    Parse {
        tool: String,
        #[source]
        source: serde_json::Error,
        raw: String,
    },

    /// Spawn failure, signal termination, nonzero exit, or a tool that would not exit.
    #[error("{tool} terminated abnormally: {reason}")]
    Process { tool: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl NupackError {
    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input(msg.into())
    }

    /// Stable machine-readable name used in error response bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Input(_) => "input_error",
            Self::Interaction { .. } => "interaction_error",
            Self::Parse { .. } => "parse_error",
            Self::Process { .. } => "process_error",
            Self::Config(_) => "config_error",
            Self::Io(_) => "io_error",
        }
    }
}

pub type Result<T> = std::result::Result<T, NupackError>;

/// HTTP-facing error. Every variant renders as `{"error": <kind>, "message": <text>}`.
#[derive(Debug)]
pub enum ApiError {
    BadRequest { kind: &'static str, message: String },
    GatewayTimeout { kind: &'static str, message: String },
    BadGateway { kind: &'static str, message: String },
    Internal { kind: &'static str, message: String },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::GatewayTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            Self::BadGateway { .. } => StatusCode::BAD_GATEWAY,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn parts(&self) -> (&'static str, &str) {
        match self {
            Self::BadRequest { kind, message }
            | Self::GatewayTimeout { kind, message }
            | Self::BadGateway { kind, message }
            | Self::Internal { kind, message } => (kind, message),
        }
    }
}

impl From<NupackError> for ApiError {
    fn from(err: NupackError) -> Self {
        let kind = err.kind();
        let message = err.to_string();
        match &err {
            NupackError::Input(_) => Self::BadRequest { kind, message },
            NupackError::Interaction { timed_out: true, .. } => Self::GatewayTimeout { kind, message },
            NupackError::Interaction { .. }
            | NupackError::Parse { .. }
            | NupackError::Process { .. } => Self::BadGateway { kind, message },
            NupackError::Config(_) | NupackError::Io(_) => Self::Internal { kind, message },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (kind, message) = self.parts();
        if status.is_server_error() {
            tracing::warn!(%status, kind, "request failed: {}", message);
        }
        let body = serde_json::json!({ "error": kind, "message": message });
        (status, Json(body)).into_response()
    }
}
