use thiserror::Error;

pub const FETCH_EVENTS_FALLBACK: &str = "Failed to fetch events";
pub const UPDATE_STATUS_FALLBACK: &str = "Failed to update delivery status";
pub const LOOKUP_USER_FALLBACK: &str = "Failed to fetch user information";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServiceError {
    #[error("server returned {status}{}", .detail.as_ref().map(|d| format!(": {d}")).unwrap_or_default())]
    Api { status: u16, detail: Option<String> },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("invalid response: {0}")]
    Decode(String),
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("api token is not a valid header value")]
    InvalidToken,
    #[error("tls setup failed: {0}")]
    Tls(String),
    #[error("no server configured")]
    Offline,
}

impl ServiceError {
    /// The message the service itself reported, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ServiceError::Api {
                detail: Some(d), ..
            } if !d.trim().is_empty() => Some(d),
            _ => None,
        }
    }

    pub fn user_message(&self, fallback: &str) -> String {
        self.detail().unwrap_or(fallback).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_preferred_over_fallback() {
        let e = ServiceError::Api {
            status: 400,
            detail: Some("Event is locked".into()),
        };
        assert_eq!(e.user_message(UPDATE_STATUS_FALLBACK), "Event is locked");
        assert_eq!(e.to_string(), "server returned 400: Event is locked");
    }

    #[test]
    fn test_fallback_when_no_detail() {
        let e = ServiceError::Transport("connection refused".into());
        assert_eq!(e.user_message(FETCH_EVENTS_FALLBACK), FETCH_EVENTS_FALLBACK);
        let blank = ServiceError::Api {
            status: 500,
            detail: Some("  ".into()),
        };
        assert_eq!(blank.user_message(LOOKUP_USER_FALLBACK), LOOKUP_USER_FALLBACK);
    }
}
