//! Session service: the single owner of "who is logged in".

use std::sync::{Arc, RwLock, RwLockWriteGuard};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::store::{EMPLOYEE_KEY, KeyValueStore, SESSION_KEYS, TOKEN_KEY, USER_KEY};
use crate::api::HrBackend;
use crate::error::{AppError, Result};
use crate::models::{LoginRequest, Role, StoredEmployee, StoredUser};

/// Authenticated actor.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: StoredUser,
    pub employee: StoredEmployee,
}

impl Session {
    pub fn role(&self) -> Option<Role> {
        self.employee.role()
    }

    /// Employee id of the actor.
    pub fn actor_id(&self) -> i64 {
        self.employee.id
    }
}

/// Why a session was cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearReason {
    Logout,
    Unauthorized,
}

/// Change notifications for views and the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    LoggedIn(Option<Role>),
    LoggedOut,
    /// The server answered 401 somewhere.
    Expired,
    /// Another window changed the stored session.
    ExternalChange,
}

const EVENT_CAPACITY: usize = 32;

pub struct SessionService {
    store: Arc<dyn KeyValueStore>,
    current: RwLock<Option<Session>>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionService {
    /// Create the service and restore any session persisted by a previous run.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let current = read_session(store.as_ref());
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            store,
            current: RwLock::new(current),
            events,
        }
    }

    pub fn current(&self) -> Option<Session> {
        self.current.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn token(&self) -> Option<String> {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .map(|s| s.token.clone())
    }

    /// Role of the logged-in actor, `None` when logged out or unrecognised.
    pub fn current_role(&self) -> Option<Role> {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .and_then(Session::role)
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.read().unwrap_or_else(|e| e.into_inner()).is_some()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    fn write_current(&self) -> RwLockWriteGuard<'_, Option<Session>> {
        self.current.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Persist all three keys and make `session` current.
    ///
    /// If any key fails to write, the keys already written are put back to
    /// their previous values so the store never holds a mixed session.
    pub fn set(&self, session: Session) -> Result<()> {
        let user = serde_json::to_string(&session.user)?;
        let employee = serde_json::to_string(&session.employee)?;

        // Store writes and the in-memory swap happen under one guard so the
        // watcher cannot interleave with them.
        let mut current = self.write_current();
        let mut previous = Vec::with_capacity(SESSION_KEYS.len());
        for key in SESSION_KEYS {
            previous.push((key, self.store.get(key)?));
        }

        for (key, value) in [
            (TOKEN_KEY, session.token.as_str()),
            (USER_KEY, user.as_str()),
            (EMPLOYEE_KEY, employee.as_str()),
        ] {
            if let Err(e) = self.store.set(key, value) {
                warn!("Failed to store session key '{key}', restoring previous values: {e}");
                self.restore(&previous);
                return Err(e);
            }
        }

        *current = Some(session);
        Ok(())
    }

    fn restore(&self, previous: &[(&str, Option<String>)]) {
        for (key, value) in previous {
            let result = match value {
                Some(value) => self.store.set(key, value),
                None => self.store.remove(key),
            };
            if let Err(e) = result {
                warn!("Failed to restore session key '{key}': {e}");
            }
        }
    }

    /// Remove all three keys. Never fails: storage errors are logged and the
    /// in-memory session is dropped regardless.
    pub fn clear(&self, reason: ClearReason) {
        let mut current = self.write_current();
        for key in SESSION_KEYS {
            if let Err(e) = self.store.remove(key) {
                warn!("Failed to remove session key '{key}': {e}");
            }
        }
        *current = None;
        drop(current);

        let event = match reason {
            ClearReason::Logout => SessionEvent::LoggedOut,
            ClearReason::Unauthorized => SessionEvent::Expired,
        };
        let _ = self.events.send(event);
    }

    /// Authenticate and persist the session.
    ///
    /// On any failure the stored keys are left exactly as they were.
    pub async fn login(&self, backend: &dyn HrBackend, email: &str, password: &str) -> Result<Session> {
        let email = email.trim();
        if email.is_empty() {
            return Err(AppError::validation("Email is required"));
        }
        if password.is_empty() {
            return Err(AppError::validation("Password is required"));
        }

        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = backend.login(&request).await.inspect_err(|e| {
            warn!("Login failed for {email}: {e}");
        })?;

        if response.token.trim().is_empty() {
            return Err(AppError::Decode("Login response did not include a token".to_string()));
        }

        let session = Session {
            token: response.token,
            user: response.user,
            employee: response.employee,
        };
        let role = session.role();
        self.set(session.clone())?;

        info!("Logged in as employee {} ({})", session.actor_id(), role.map_or("no role", |r| r.as_str()));
        let _ = self.events.send(SessionEvent::LoggedIn(role));
        Ok(session)
    }

    /// Best-effort remote logout followed by an unconditional local clear.
    pub async fn logout(&self, backend: &dyn HrBackend) {
        if let Err(e) = backend.logout().await {
            warn!("Remote logout failed, clearing local session anyway: {e}");
        }
        self.clear(ClearReason::Logout);
        info!("Logged out");
    }

    /// Called by the API client on any 401 response.
    pub fn handle_unauthorized(&self) {
        warn!("Server rejected the session token, logging out");
        self.clear(ClearReason::Unauthorized);
    }

    /// Pick up changes another window wrote to the store.
    ///
    /// Returns `true` and emits [`SessionEvent::ExternalChange`] when the
    /// stored session differs from the one held in memory.
    pub fn reload_from_store(&self) -> bool {
        let mut current = self.write_current();
        let stored = read_session(self.store.as_ref());
        if *current == stored {
            return false;
        }
        info!(
            "Session changed in another window ({})",
            if stored.is_some() { "logged in" } else { "logged out" }
        );
        *current = stored;
        drop(current);
        let _ = self.events.send(SessionEvent::ExternalChange);
        true
    }

    /// Poll the store on `handle` every `interval`.
    pub fn spawn_watcher(self: &Arc<Self>, handle: &Handle, interval: Duration) -> JoinHandle<()> {
        let service = Arc::clone(self);
        handle.spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                service.reload_from_store();
            }
        })
    }
}

/// Read a complete session; anything partial or unparsable counts as logged out.
fn read_session(store: &dyn KeyValueStore) -> Option<Session> {
    let read = |key: &str| match store.get(key) {
        Ok(value) => value.filter(|v| !v.trim().is_empty()),
        Err(e) => {
            warn!("Failed to read session key '{key}': {e}");
            None
        }
    };

    let token = read(TOKEN_KEY)?;
    let user = read(USER_KEY)?;
    let employee = read(EMPLOYEE_KEY)?;

    let user: StoredUser = serde_json::from_str(&user)
        .inspect_err(|e| warn!("Stored user is not valid JSON: {e}"))
        .ok()?;
    let employee: StoredEmployee = serde_json::from_str(&employee)
        .inspect_err(|e| warn!("Stored employee is not valid JSON: {e}"))
        .ok()?;

    Some(Session { token, user, employee })
}
