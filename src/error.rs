//! Domain errors, split by which side of the cache they occur on.

use thiserror::Error;

/// Errors raised while fetching a rate table from the provider. These are
/// confined to the refresh path: a failed fetch is logged and the previous
/// snapshot keeps serving, so callers of the conversion API never see them.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error talking to rate provider: {0}")]
    Network(String),

    #[error("rate provider returned status {status}: {message}")]
    Provider { status: u16, message: String },

    #[error("could not parse provider response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            FetchError::Provider {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            // Timeouts and transport failures are indistinguishable to the
            // cache: both retain the old snapshot.
            FetchError::Network(err.to_string())
        }
    }
}

/// Errors propagated to conversion and lookup callers.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("unknown currency code: {0}")]
    UnknownCurrency(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(f64),

    #[error("no exchange rates available yet; first fetch has not succeeded")]
    RatesUnavailable,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ConvertError::UnknownCurrency("XXX".to_string());
        assert_eq!(err.to_string(), "unknown currency code: XXX");

        let err = FetchError::Provider {
            status: 401,
            message: "invalid app_id".to_string(),
        };
        assert!(err.to_string().contains("401"));
    }
}
