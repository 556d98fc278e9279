use thiserror::Error;

/// Uniform failure for Slack Web API calls.
///
/// Carries the capability that failed ("list channels", "add reaction", ...)
/// and the underlying remote or transport message. Calls are never retried;
/// the caller decides how to surface the failure.
#[derive(Debug, Clone, Error)]
#[error("Failed to {capability}: {message}")]
pub struct GatewayError {
    capability: &'static str,
    message: String,
}

impl GatewayError {
    pub(crate) fn new(capability: &'static str, message: impl Into<String>) -> Self {
        Self {
            capability,
            message: message.into(),
        }
    }

    pub fn capability(&self) -> &'static str {
        self.capability
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
