//! Errors raised by the weather service client.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Weather service returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Failed to decode weather service response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// Short message for the failed-screen view.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(_) => "Network error. Check your connection.".to_string(),
            Self::Status { message, .. } => message.clone(),
            Self::Decode(_) => "Unexpected response from the weather service.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_user_message_is_service_message() {
        let err = ApiError::Status { status: 400, message: "No matching location found.".into() };
        assert_eq!(err.user_message(), "No matching location found.");
        assert!(err.to_string().contains("400"));
    }
}
