//! services/client/src/services/auth_gate.rs
//!
//! Decides what a failure means for the session: re-authenticate, tell the user
//! and let them retry, or just tell the user. Also keeps repeated identical
//! messages from piling up when several requests fail for the same reason.

use chrono::{DateTime, Duration, Utc};
use floripedia_core::envelope::{ErrorKind, Failure};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info};

use crate::services::token::TokenStore;

/// Default window during which an identical message is shown only once.
pub const DEFAULT_DEBOUNCE_MS: i64 = 5_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Credentials are missing or rejected.
    RequiresLogin,
    /// Connectivity or server trouble; retrying may help.
    Transient,
    /// Shown as-is.
    Terminal,
}

/// Signals for the rendering/navigation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Toast(String),
    NavigateToLogin,
    /// Image search named a plant without loading its record.
    Recognized { name: String },
}

pub fn classify(failure: &Failure) -> Disposition {
    match failure.kind {
        ErrorKind::Unauthorized => Disposition::RequiresLogin,
        ErrorKind::Network | ErrorKind::ServerError => Disposition::Transient,
        ErrorKind::NotFound | ErrorKind::Unknown | ErrorKind::PartialRecognition { .. } => {
            Disposition::Terminal
        }
    }
}

/// Remembers the last message shown and when.
#[derive(Debug)]
pub struct MessageDebouncer {
    window: Duration,
    last: Option<(String, DateTime<Utc>)>,
}

impl MessageDebouncer {
    pub fn new(window: Duration) -> Self {
        Self { window, last: None }
    }

    /// `true` if `message` should be shown at `now`; records it when so.
    pub fn should_present(&mut self, message: &str, now: DateTime<Utc>) -> bool {
        if let Some((last_message, shown_at)) = &self.last {
            if last_message == message && now - *shown_at < self.window {
                debug!(
                    "Suppressing duplicate message ({}ms after the last one): {}",
                    (now - *shown_at).num_milliseconds(),
                    message
                );
                return false;
            }
        }
        self.last = Some((message.to_string(), now));
        true
    }
}

pub struct AuthGate {
    tokens: Arc<TokenStore>,
    events: mpsc::UnboundedSender<UiEvent>,
    debouncer: Mutex<MessageDebouncer>,
}

impl AuthGate {
    pub fn new(
        tokens: Arc<TokenStore>,
        events: mpsc::UnboundedSender<UiEvent>,
        debounce_window: Duration,
    ) -> Self {
        Self {
            tokens,
            events,
            debouncer: Mutex::new(MessageDebouncer::new(debounce_window)),
        }
    }

    /// Classifies `failure` and carries out what its class calls for.
    pub async fn handle(&self, failure: &Failure) -> Disposition {
        self.handle_at(failure, Utc::now()).await
    }

    pub async fn handle_at(&self, failure: &Failure, now: DateTime<Utc>) -> Disposition {
        let disposition = classify(failure);
        match (&failure.kind, disposition) {
            (_, Disposition::RequiresLogin) => self.on_requires_login_at(now).await,
            (ErrorKind::PartialRecognition { name }, _) => {
                self.emit(UiEvent::Recognized { name: name.clone() });
            }
            _ => {
                let message = failure.user_message();
                if self.debouncer.lock().await.should_present(&message, now) {
                    self.emit(UiEvent::Toast(message));
                }
            }
        }
        disposition
    }

    /// Tears down the token and sends the user to the login entry point.
    pub async fn on_requires_login(&self) {
        self.on_requires_login_at(Utc::now()).await
    }

    async fn on_requires_login_at(&self, now: DateTime<Utc>) {
        self.tokens.clear().await;
        let message = Failure::from_status(401).user_message();
        if self.debouncer.lock().await.should_present(&message, now) {
            info!("Credentials rejected; sending the user to login");
            self.emit(UiEvent::Toast(message));
            self.emit(UiEvent::NavigateToLogin);
        }
    }

    fn emit(&self, event: UiEvent) {
        if self.events.send(event).is_err() {
            debug!("No UI listener for events");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryStore;
    use floripedia_core::domain::Token;
    use floripedia_core::ports::AuthProvider;

    fn at(ms: i64) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap() + Duration::milliseconds(ms)
    }

    async fn gate() -> (AuthGate, Arc<TokenStore>, mpsc::UnboundedReceiver<UiEvent>) {
        let tokens = Arc::new(TokenStore::restore(Arc::new(MemoryStore::new())));
        tokens.set(Token::new("valid")).await;
        let (tx, rx) = mpsc::unbounded_channel();
        let gate = AuthGate::new(
            tokens.clone(),
            tx,
            Duration::milliseconds(DEFAULT_DEBOUNCE_MS),
        );
        (gate, tokens, rx)
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<UiEvent>) -> Vec<UiEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[test]
    fn classification_table() {
        assert_eq!(classify(&Failure::from_status(401)), Disposition::RequiresLogin);
        assert_eq!(classify(&Failure::from_status(403)), Disposition::RequiresLogin);
        assert_eq!(classify(&Failure::from_status(502)), Disposition::Transient);
        assert_eq!(
            classify(&Failure::new(ErrorKind::Network, "offline")),
            Disposition::Transient
        );
        assert_eq!(classify(&Failure::from_status(404)), Disposition::Terminal);
        assert_eq!(classify(&Failure::unknown("x")), Disposition::Terminal);
        assert_eq!(
            classify(&Failure::partial_recognition("Rose")),
            Disposition::Terminal
        );
    }

    #[test]
    fn debouncer_window() {
        let mut debouncer = MessageDebouncer::new(Duration::seconds(5));
        assert!(debouncer.should_present("offline", at(0)));
        assert!(!debouncer.should_present("offline", at(4_999)));
        assert!(debouncer.should_present("offline", at(5_000)));
        assert!(debouncer.should_present("server down", at(5_001)));
        assert!(debouncer.should_present("offline", at(5_002)));
    }

    #[tokio::test]
    async fn unauthorized_clears_token_and_toasts_once() {
        let (gate, tokens, mut rx) = gate().await;

        let first = gate.handle_at(&Failure::from_status(401), at(0)).await;
        assert_eq!(first, Disposition::RequiresLogin);
        assert_eq!(tokens.current_token().await, None);
        assert_eq!(
            drain(&mut rx),
            vec![
                UiEvent::Toast("Login required".into()),
                UiEvent::NavigateToLogin
            ]
        );

        let second = gate.handle_at(&Failure::from_status(401), at(2_000)).await;
        assert_eq!(second, Disposition::RequiresLogin);
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn transient_failures_are_debounced() {
        let (gate, tokens, mut rx) = gate().await;
        let failure = Failure::new(ErrorKind::Network, "connect timeout");

        gate.handle_at(&failure, at(0)).await;
        gate.handle_at(&failure, at(1_000)).await;
        gate.handle_at(&failure, at(6_000)).await;

        let events = drain(&mut rx);
        assert_eq!(events.len(), 2);
        assert!(matches!(&events[0], UiEvent::Toast(m) if m.contains("internet connection")));
        // Only Unauthorized tears the token down.
        assert!(tokens.is_logged_in().await);
    }

    #[tokio::test]
    async fn partial_recognition_is_not_an_error_toast() {
        let (gate, _tokens, mut rx) = gate().await;
        let disposition = gate
            .handle_at(&Failure::partial_recognition("Echeveria"), at(0))
            .await;
        assert_eq!(disposition, Disposition::Terminal);
        assert_eq!(
            drain(&mut rx),
            vec![UiEvent::Recognized {
                name: "Echeveria".into()
            }]
        );
    }

    #[tokio::test]
    async fn works_without_a_listener() {
        let (gate, _tokens, rx) = gate().await;
        drop(rx);
        let disposition = gate.handle(&Failure::unknown("boom")).await;
        assert_eq!(disposition, Disposition::Terminal);
    }
}
