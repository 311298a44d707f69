use tokio::sync::watch;

/// Login state as observed by embedding UIs
///
/// Authentication itself lives in the remote backend; this type only mirrors
/// whether a user is currently signed in on this client.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthState {
    #[default]
    SignedOut,
    SignedIn {
        user: String,
    },
}

impl AuthState {
    pub fn is_signed_in(&self) -> bool {
        matches!(self, AuthState::SignedIn { .. })
    }
}

/// Publish/subscribe channel for login-state changes.
///
/// Publishers call [`signed_in`](SessionEvents::signed_in) and
/// [`signed_out`](SessionEvents::signed_out) at the point the state actually
/// changes; subscribers are woken on every transition. Re-publishing the
/// current state is a no-op, so subscribers never see spurious wakeups.
#[derive(Debug, Clone)]
pub struct SessionEvents {
    tx: watch::Sender<AuthState>,
}

impl Default for SessionEvents {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionEvents {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(AuthState::SignedOut);
        Self { tx }
    }

    /// Publishes a successful login
    pub fn signed_in(&self, user: impl Into<String>) {
        let next = AuthState::SignedIn { user: user.into() };
        self.publish(next);
    }

    /// Publishes a logout
    pub fn signed_out(&self) {
        self.publish(AuthState::SignedOut);
    }

    fn publish(&self, next: AuthState) {
        self.tx.send_if_modified(|state| {
            if *state == next {
                return false;
            }
            tracing::info!(signed_in = next.is_signed_in(), "Login state changed");
            *state = next;
            true
        });
    }

    /// Current state without subscribing
    pub fn current(&self) -> AuthState {
        self.tx.borrow().clone()
    }

    /// Subscribes to state transitions
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::assert_ok;

    #[tokio::test]
    async fn test_subscriber_observes_login_transition() {
        let events = SessionEvents::new();
        let mut rx = events.subscribe();

        events.signed_in("mina");

        assert_ok!(rx.changed().await);
        assert_eq!(
            *rx.borrow(),
            AuthState::SignedIn {
                user: "mina".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_subscriber_observes_logout_transition() {
        let events = SessionEvents::new();
        events.signed_in("mina");

        let mut rx = events.subscribe();
        rx.mark_unchanged();
        events.signed_out();

        assert_ok!(rx.changed().await);
        assert_eq!(*rx.borrow(), AuthState::SignedOut);
    }

    #[tokio::test]
    async fn test_republishing_same_state_is_silent() {
        let events = SessionEvents::new();
        events.signed_in("mina");

        let mut rx = events.subscribe();
        rx.mark_unchanged();
        events.signed_in("mina");

        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_current_reflects_latest_state() {
        let events = SessionEvents::new();
        assert!(!events.current().is_signed_in());

        events.signed_in("mina");
        assert!(events.current().is_signed_in());
    }

    #[tokio::test]
    async fn test_late_subscriber_sees_current_state_without_polling() {
        let events = SessionEvents::new();
        events.signed_in("mina");

        let rx = events.subscribe();
        assert!(rx.borrow().is_signed_in());
    }
}
