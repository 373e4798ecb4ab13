use thiserror::Error;

/// Input contract violations raised while normalizing list parameters.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("search must be at most {max} characters after trimming (got {len})")]
    SearchTooLong { len: usize, max: usize },

    #[error("limit {value} is out of range, expected {min}..={max}")]
    LimitOutOfRange { value: u32, min: u32, max: u32 },

    #[error("base url '{value}' is not a valid absolute url")]
    InvalidBaseUrl { value: String },
}

/// Broad failure family used for retry and presentation decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Configuration,
    Validation,
    Transport,
    ResponseShape,
    Abort,
}

/// Every way a ticker page fetch can end without a page.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TickerError {
    #[error(
        "Polygon API key is not configured. Set TICKERDECK_POLYGON_API_KEY or POLYGON_API_KEY in your environment."
    )]
    MissingCredential,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    #[error("Invalid API key")]
    Unauthorized,

    #[error("Access forbidden. Check your API key permissions.")]
    Forbidden,

    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Unexpected response from Polygon: {message}")]
    InvalidResponse { message: String },

    #[error("{message}")]
    ApiStatus { message: String },

    #[error("request was aborted")]
    Aborted,
}

impl TickerError {
    /// Maps a non-success HTTP status to its error kind.
    ///
    /// `upstream_message` is only used for statuses without a dedicated kind.
    pub fn from_status(status: u16, upstream_message: Option<String>) -> Self {
        match status {
            429 => Self::RateLimited,
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            _ => Self::Api {
                status,
                message: upstream_message
                    .unwrap_or_else(|| format!("API request failed: {status}")),
            },
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }

    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::MissingCredential => ErrorClass::Configuration,
            Self::Validation(_) => ErrorClass::Validation,
            Self::RateLimited
            | Self::Unauthorized
            | Self::Forbidden
            | Self::Api { .. }
            | Self::Network { .. } => ErrorClass::Transport,
            Self::InvalidResponse { .. } | Self::ApiStatus { .. } => ErrorClass::ResponseShape,
            Self::Aborted => ErrorClass::Abort,
        }
    }

    /// Transport failures may be retried, except rate limiting.
    pub const fn retryable(&self) -> bool {
        matches!(self.class(), ErrorClass::Transport) && !matches!(self, Self::RateLimited)
    }

    pub const fn is_abort(&self) -> bool {
        matches!(self, Self::Aborted)
    }

    /// HTTP status associated with the failure, when one is known.
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::RateLimited => Some(429),
            Self::Unauthorized => Some(401),
            Self::Forbidden => Some(403),
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub const fn code(&self) -> &'static str {
        match self {
            Self::MissingCredential => "config.missing_credential",
            Self::Validation(_) => "request.invalid",
            Self::RateLimited => "upstream.rate_limited",
            Self::Unauthorized => "upstream.unauthorized",
            Self::Forbidden => "upstream.forbidden",
            Self::Api { .. } => "upstream.api_error",
            Self::Network { .. } => "transport.network",
            Self::InvalidResponse { .. } => "response.invalid",
            Self::ApiStatus { .. } => "response.status",
            Self::Aborted => "request.aborted",
        }
    }
}
