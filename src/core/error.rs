use thiserror::Error;

/// Failures surfaced by the scheduling client.
///
/// `Configuration` is fatal and never retried. `Backend`, `Http` and
/// `Json` come from the network boundary and are propagated by the CRUD
/// operations but reported as a failed lookup by the advisory
/// staff/date/slot queries. `Format` covers payloads that decode but
/// don't make sense (bad base64, bad duration).
#[derive(Error, Debug)]
pub enum SchedulingError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Backend returned {status}: {body}")]
    Backend { status: u16, body: String },

    #[error("Format error: {0}")]
    Format(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl SchedulingError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

pub type Result<T, E = SchedulingError> = std::result::Result<T, E>;
