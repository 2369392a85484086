//! Errors from the coach bridge.

/// Message shown to users when the coach's credentials are unusable.
pub const CREDENTIAL_MESSAGE: &str = "Coach API key is missing or invalid.";
/// Message shown to users for every other coach failure.
pub const CONNECTION_LOST_MESSAGE: &str = "Connection to the coach was lost. Try again.";

#[derive(Debug, thiserror::Error)]
pub enum CoachError {
    /// No API key was configured.
    #[error("GEMINI_API_KEY is not set")]
    MissingApiKey,

    /// The configured key cannot be a Gemini key (e.g. an OpenAI `sk-` key).
    #[error("GEMINI_API_KEY does not look like a Gemini API key")]
    InvalidApiKey,

    /// The user's message was rejected before reaching the provider.
    #[error("Invalid message: {0}")]
    InvalidMessage(String),

    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider returned a non-2xx status code or an error payload.
    #[error("Coach API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The provider answered without any candidate reply.
    #[error("Coach returned no candidates")]
    EmptyResponse,

    /// The provider's response body could not be decoded.
    #[error("Failed to parse coach response: {0}")]
    Parse(String),
}

impl CoachError {
    /// Whether the failure is a key problem rather than a transient one.
    pub fn is_credential_error(&self) -> bool {
        match self {
            Self::MissingApiKey | Self::InvalidApiKey => true,
            Self::Api { status, message } => {
                matches!(status, 401 | 403) || message.contains("API key")
            }
            _ => false,
        }
    }

    /// Whether the failure came from talking to the provider, as opposed to
    /// rejecting the user's input.
    pub fn is_provider_failure(&self) -> bool {
        !matches!(self, Self::InvalidMessage(_))
    }

    /// Retry-able message safe to show to the user.
    pub fn user_message(&self) -> &'static str {
        if self.is_credential_error() {
            CREDENTIAL_MESSAGE
        } else {
            CONNECTION_LOST_MESSAGE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_problems_are_credential_errors() {
        assert!(CoachError::MissingApiKey.is_credential_error());
        assert!(CoachError::InvalidApiKey.is_credential_error());
        assert_eq!(CoachError::MissingApiKey.user_message(), CREDENTIAL_MESSAGE);
    }

    #[test]
    fn api_errors_classified_by_status_and_message() {
        let forbidden = CoachError::Api {
            status: 403,
            message: "denied".into(),
        };
        assert!(forbidden.is_credential_error());

        let bad_key = CoachError::Api {
            status: 400,
            message: "API key not valid. Please pass a valid API key.".into(),
        };
        assert!(bad_key.is_credential_error());

        let overloaded = CoachError::Api {
            status: 503,
            message: "The model is overloaded".into(),
        };
        assert!(!overloaded.is_credential_error());
        assert_eq!(overloaded.user_message(), CONNECTION_LOST_MESSAGE);
    }

    #[test]
    fn invalid_message_is_not_a_provider_failure() {
        assert!(!CoachError::InvalidMessage("empty".into()).is_provider_failure());
        assert!(CoachError::EmptyResponse.is_provider_failure());
    }
}
