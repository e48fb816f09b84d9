//! Message bus errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BusError {
    /// The destination context navigated away or was closed.
    #[error("Context not found: {0}")]
    ContextGone(String),

    #[error("Send failed: {0}")]
    SendFailed(String),

    #[error("Bus closed")]
    Closed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_gone_display() {
        let err = BusError::ContextGone("tab-7".to_string());
        assert!(err.to_string().contains("tab-7"));
        assert!(err.to_string().contains("not found"));
    }
}
