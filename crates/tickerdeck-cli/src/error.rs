use thiserror::Error;

use tickerdeck_core::{ErrorClass, TickerError};

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] tickerdeck_core::ValidationError),

    #[error("command error: {0}")]
    Command(String),

    #[error(transparent)]
    Ticker(#[from] TickerError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) | Self::Command(_) => 2,
            Self::Ticker(error) => ticker_exit_code(error),
            Self::Serialization(_) => 5,
            Self::Io(_) => 10,
        }
    }
}

/// Exit code for a fetch failure surfaced after output was rendered.
pub const fn ticker_exit_code(error: &TickerError) -> u8 {
    match error.class() {
        ErrorClass::Validation => 2,
        ErrorClass::Configuration => 3,
        ErrorClass::Transport | ErrorClass::ResponseShape => 4,
        ErrorClass::Abort => 130,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_error_class() {
        assert_eq!(CliError::from(TickerError::MissingCredential).exit_code(), 3);
        assert_eq!(CliError::from(TickerError::RateLimited).exit_code(), 4);
        assert_eq!(
            CliError::from(TickerError::invalid_response("results: expected array")).exit_code(),
            4
        );
        assert_eq!(CliError::Command(String::from("bad")).exit_code(), 2);
        assert_eq!(
            CliError::from(tickerdeck_core::ValidationError::LimitOutOfRange {
                value: 0,
                min: 1,
                max: 1000
            })
            .exit_code(),
            2
        );
    }
}
