//! crates/floripedia_core/src/envelope.rs
//!
//! The result envelope returned by every boundary call, and the error taxonomy
//! callers match on. Message text is for display only.

use crate::ports::PortError;

/// What went wrong, independent of how it is worded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// No connectivity, host unresolvable or timeout.
    Network,
    /// 5xx from the remote.
    ServerError,
    /// 404 from the remote.
    NotFound,
    /// 401 or 403 from the remote.
    Unauthorized,
    /// Image search identified a plant but its record could not be retrieved.
    PartialRecognition { name: String },
    /// Anything else; the message is passed through.
    Unknown,
}

/// The failure half of an [`Envelope`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct Failure {
    pub kind: ErrorKind,
    pub message: String,
}

/// `Ok` is the success case, `Err` carries a classified [`Failure`].
pub type Envelope<T> = Result<T, Failure>;

impl Failure {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unknown, message)
    }

    pub fn partial_recognition(name: impl Into<String>) -> Self {
        let name = name.into();
        let message = format!("Details could not be loaded. The plant is {}", name);
        Self::new(ErrorKind::PartialRecognition { name }, message)
    }

    /// Classifies a non-2xx HTTP status.
    pub fn from_status(code: u16) -> Self {
        let kind = match code {
            401 | 403 => ErrorKind::Unauthorized,
            404 => ErrorKind::NotFound,
            500..=599 => ErrorKind::ServerError,
            _ => ErrorKind::Unknown,
        };
        Self::new(kind, format!("Request failed with status {}", code))
    }

    /// The name recovered from a partial recognition, if this is one.
    pub fn recognized_name(&self) -> Option<&str> {
        match &self.kind {
            ErrorKind::PartialRecognition { name } => Some(name),
            _ => None,
        }
    }

    /// Human-readable text shown to the user for this failure.
    pub fn user_message(&self) -> String {
        match &self.kind {
            ErrorKind::Network => "Check your internet connection".to_string(),
            ErrorKind::ServerError => {
                "A server error occurred. Please try again shortly".to_string()
            }
            ErrorKind::NotFound => "The requested information could not be found".to_string(),
            ErrorKind::Unauthorized => "Login required".to_string(),
            ErrorKind::PartialRecognition { .. } | ErrorKind::Unknown => self.message.clone(),
        }
    }
}

impl From<PortError> for Failure {
    fn from(err: PortError) -> Self {
        match err {
            PortError::Network(msg) => Self::new(ErrorKind::Network, msg),
            PortError::Status { code, .. } => Self::from_status(code),
            PortError::Decode(msg) | PortError::Storage(msg) | PortError::InvalidRequest(msg) => {
                Self::unknown(msg)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_map_to_kinds() {
        assert_eq!(Failure::from_status(401).kind, ErrorKind::Unauthorized);
        assert_eq!(Failure::from_status(403).kind, ErrorKind::Unauthorized);
        assert_eq!(Failure::from_status(404).kind, ErrorKind::NotFound);
        assert_eq!(Failure::from_status(500).kind, ErrorKind::ServerError);
        assert_eq!(Failure::from_status(503).kind, ErrorKind::ServerError);
        assert_eq!(Failure::from_status(400).kind, ErrorKind::Unknown);
        assert_eq!(Failure::from_status(422).kind, ErrorKind::Unknown);
    }

    #[test]
    fn port_errors_convert() {
        let f: Failure = PortError::Network("timed out".into()).into();
        assert_eq!(f.kind, ErrorKind::Network);

        let f: Failure = PortError::Status {
            code: 502,
            body: "bad gateway".into(),
        }
        .into();
        assert_eq!(f.kind, ErrorKind::ServerError);

        let f: Failure = PortError::Decode("missing field `name`".into()).into();
        assert_eq!(f.kind, ErrorKind::Unknown);
        assert_eq!(f.message, "missing field `name`");
    }

    #[test]
    fn unknown_passes_message_through() {
        let f = Failure::unknown("custom error");
        assert_eq!(f.user_message(), "custom error");
    }

    #[test]
    fn partial_recognition_shows_the_name() {
        let f = Failure::partial_recognition("Echeveria");
        assert_eq!(f.recognized_name(), Some("Echeveria"));
        assert!(f.user_message().contains("Echeveria"));
    }

    #[test]
    fn fixed_kinds_have_fixed_messages() {
        assert!(Failure::from_status(500).user_message().contains("server error"));
        assert!(Failure::from_status(404).user_message().contains("could not be found"));
        assert_eq!(Failure::from_status(401).user_message(), "Login required");
        let net = Failure::new(ErrorKind::Network, "dns failure");
        assert!(net.user_message().contains("internet connection"));
    }
}
