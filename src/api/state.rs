//! Application state for the Gratuity Tracker API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::auth::Authenticator;
use crate::config::MailConfig;
use crate::notify::ReportMailer;
use crate::tracker::Tracker;

/// Shared application state.
///
/// Holds the tracker plus the optional capabilities injected at startup:
/// a mailer for report emails and an authenticator guarding every route.
#[derive(Clone)]
pub struct AppState {
    tracker: Arc<Tracker>,
    mail: Option<(Arc<dyn ReportMailer>, Arc<MailConfig>)>,
    authenticator: Option<Arc<dyn Authenticator>>,
}

impl AppState {
    /// Creates state with no mailer and no authentication.
    pub fn new(tracker: Tracker) -> Self {
        Self {
            tracker: Arc::new(tracker),
            mail: None,
            authenticator: None,
        }
    }

    /// Enables report emails.
    pub fn with_mailer(mut self, mailer: Arc<dyn ReportMailer>, config: MailConfig) -> Self {
        self.mail = Some((mailer, Arc::new(config)));
        self
    }

    /// Requires every request to authenticate.
    pub fn with_authenticator(mut self, authenticator: Arc<dyn Authenticator>) -> Self {
        self.authenticator = Some(authenticator);
        self
    }

    /// Returns the tracker.
    pub fn tracker(&self) -> &Arc<Tracker> {
        &self.tracker
    }

    /// Returns the mailer and its settings, if report emails are enabled.
    pub fn mail(&self) -> Option<(&Arc<dyn ReportMailer>, &Arc<MailConfig>)> {
        self.mail.as_ref().map(|(mailer, config)| (mailer, config))
    }

    /// Returns the authenticator, if authentication is required.
    pub fn authenticator(&self) -> Option<&Arc<dyn Authenticator>> {
        self.authenticator.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryRecordStore;
    use rust_decimal::Decimal;

    #[test]
    fn test_app_state_is_clone() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[test]
    fn test_capabilities_default_to_disabled() {
        let tracker = Tracker::new(Arc::new(MemoryRecordStore::new()), Decimal::new(5, 0));
        let state = AppState::new(tracker);
        assert!(state.mail().is_none());
        assert!(state.authenticator().is_none());
    }
}
