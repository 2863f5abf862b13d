use std::sync::{Arc, Mutex};

use crate::domain::entities::user::UserAccount;
use crate::usecase::ports::identity::{AuthError, IdentityProvider};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn(UserAccount),
    SignedOut,
}

type AuthCallback = Box<dyn Fn(&AuthEvent) + Send>;

/// Handle for one auth listener registration. Dropping it unregisters the
/// listener.
pub struct AuthSubscription {
    listeners: Arc<Mutex<Vec<(u64, AuthCallback)>>>,
    id: u64,
}

impl Drop for AuthSubscription {
    fn drop(&mut self) {
        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.retain(|(id, _)| *id != self.id);
        }
    }
}

impl AuthSubscription {
    pub fn cancel(self) {}
}

/// Explicit session state: wraps the identity provider, tracks the current
/// account, and fans sign-in/sign-out events out to registered listeners.
/// Passed by reference into whichever component needs identity instead of
/// living in ambient globals.
pub struct Session {
    identity: Arc<dyn IdentityProvider>,
    current: Mutex<Option<UserAccount>>,
    listeners: Arc<Mutex<Vec<(u64, AuthCallback)>>>,
    next_listener_id: Mutex<u64>,
}

impl Session {
    pub fn new(identity: Arc<dyn IdentityProvider>) -> Self {
        Self {
            identity,
            current: Mutex::new(None),
            listeners: Arc::new(Mutex::new(Vec::new())),
            next_listener_id: Mutex::new(0),
        }
    }

    pub fn current_user(&self) -> Option<UserAccount> {
        self.current.lock().ok().and_then(|current| current.clone())
    }

    pub fn subscribe(&self, callback: impl Fn(&AuthEvent) + Send + 'static) -> AuthSubscription {
        let id = {
            let mut next = self
                .next_listener_id
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            *next += 1;
            *next
        };
        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.push((id, Box::new(callback)));
        }
        AuthSubscription {
            listeners: self.listeners.clone(),
            id,
        }
    }

    pub fn sign_up(&self, email: &str, password: &str) -> Result<UserAccount, AuthError> {
        let account = self.identity.sign_up(email, password)?;
        self.set_current(Some(account.clone()));
        Ok(account)
    }

    pub fn sign_in(&self, email: &str, password: &str) -> Result<UserAccount, AuthError> {
        let account = self.identity.sign_in(email, password)?;
        self.set_current(Some(account.clone()));
        Ok(account)
    }

    pub fn sign_out(&self) {
        self.set_current(None);
    }

    fn set_current(&self, account: Option<UserAccount>) {
        if let Ok(mut current) = self.current.lock() {
            *current = account.clone();
        }
        let event = match account {
            Some(account) => AuthEvent::SignedIn(account),
            None => AuthEvent::SignedOut,
        };
        self.emit(&event);
    }

    fn emit(&self, event: &AuthEvent) {
        if let Ok(listeners) = self.listeners.lock() {
            for (_, callback) in listeners.iter() {
                callback(event);
            }
        }
    }
}
