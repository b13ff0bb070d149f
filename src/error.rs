use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `arthur-console`.
///
/// Each subsystem defines its own error variant. Library callers can match on
/// these to decide what to show; the binary continues to use
/// `anyhow::Result` for ad-hoc context chains.
#[derive(Debug, Error)]
pub enum ConsoleError {
    // ── Config ───────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── Governance API ──────────────────────────────────────────────────
    #[error(transparent)]
    Api(#[from] ApiError),

    // ── Form input ──────────────────────────────────────────────────────
    #[error(transparent)]
    Form(#[from] FormError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("ARTHUR_BASE_URL is required (set it in config.toml, the environment, or --base-url)")]
    MissingBaseUrl,

    #[error("an Arthur API key is required (set ARTHUR_API_KEY, pass --api-key, or run `connect`)")]
    MissingCredential,

    #[error("invalid base url {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("failed to load config: {0}")]
    Load(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Governance API errors ──────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced an HTTP response.
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status. `body` is the raw text.
    #[error("Arthur API Error: {status} - {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode {endpoint} response: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("expected JSON from {endpoint} but received a text body")]
    UnexpectedText { endpoint: String },
}

impl ApiError {
    /// HTTP status carried by the failure, if the server responded at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport { source, .. } => source.status().map(|s| s.as_u16()),
            Self::Decode { .. } | Self::UnexpectedText { .. } => None,
        }
    }

    /// Raw response body for status failures.
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Status { body, .. } => Some(body),
            _ => None,
        }
    }
}

// ─── Form input errors ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("{0}")]
    Required(&'static str),

    #[error("Invalid examples JSON format")]
    InvalidExamplesJson,

    #[error("invalid number for {field}: {value}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("unknown rule type: {0}")]
    UnknownRuleType(String),
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, ConsoleError>;
