use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, OnceLock};
use std::thread::JoinHandle;
use std::time::Duration;

use super::store::{EMPLOYEE_KEY, TOKEN_KEY, USER_KEY};
use super::*;
use crate::error::AppError;
use crate::models::Role;
use crate::testing::{Fail, FakeBackend};

fn service_with(store: Arc<dyn KeyValueStore>) -> SessionService {
    SessionService::new(store)
}

#[tokio::test]
async fn test_login_stores_all_keys() {
    let store = Arc::new(MemoryStore::new());
    let service = service_with(store.clone());
    let backend = FakeBackend::new().with_role("RM");
    let mut events = service.subscribe();

    let session = service.login(&backend, " rm@example.com ", "secret").await.unwrap();

    assert_eq!(session.role(), Some(Role::Rm));
    assert_eq!(session.user.email, "rm@example.com");
    assert_eq!(store.get(TOKEN_KEY).unwrap().as_deref(), Some("token-123"));
    assert!(store.get(USER_KEY).unwrap().is_some());
    assert!(store.get(EMPLOYEE_KEY).unwrap().unwrap().contains("RoleName"));
    assert_eq!(service.current_role(), Some(Role::Rm));
    assert_eq!(events.try_recv().unwrap(), SessionEvent::LoggedIn(Some(Role::Rm)));
}

#[tokio::test]
async fn test_empty_credentials_skip_network() {
    let service = service_with(Arc::new(MemoryStore::new()));
    let backend = FakeBackend::new();

    let err = service.login(&backend, "", "secret").await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    let err = service.login(&backend, "a@example.com", "").await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    assert_eq!(backend.call_count("login"), 0);
}

#[tokio::test]
async fn test_failed_login_leaves_previous_session() {
    let store = Arc::new(MemoryStore::new());
    let service = service_with(store.clone());
    let backend = FakeBackend::new().with_role("Employee");
    service.login(&backend, "lan@example.com", "secret").await.unwrap();
    let before = store.get(EMPLOYEE_KEY).unwrap();

    backend.fail("login", Fail::Status(401));
    let result = service.login(&backend, "lan@example.com", "wrong").await;

    assert!(result.is_err());
    assert!(service.is_authenticated());
    assert_eq!(store.get(TOKEN_KEY).unwrap().as_deref(), Some("token-123"));
    assert_eq!(store.get(EMPLOYEE_KEY).unwrap(), before);
}

#[tokio::test]
async fn test_failed_login_from_logged_out_stores_nothing() {
    let store = Arc::new(MemoryStore::new());
    let service = service_with(store.clone());
    let backend = FakeBackend::new();
    backend.fail("login", Fail::Network);

    let err = service.login(&backend, "lan@example.com", "secret").await.unwrap_err();

    assert!(err.is_network());
    assert!(!service.is_authenticated());
    assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
    assert_eq!(store.get(USER_KEY).unwrap(), None);
}

#[tokio::test]
async fn test_logout_clears_even_when_remote_fails() {
    let store = Arc::new(MemoryStore::new());
    let service = service_with(store.clone());
    let backend = FakeBackend::new();
    service.login(&backend, "lan@example.com", "secret").await.unwrap();
    let mut events = service.subscribe();

    backend.fail("logout", Fail::Status(500));
    service.logout(&backend).await;

    assert_eq!(backend.call_count("logout"), 1);
    assert!(!service.is_authenticated());
    for key in [TOKEN_KEY, USER_KEY, EMPLOYEE_KEY] {
        assert_eq!(store.get(key).unwrap(), None);
    }
    assert_eq!(events.try_recv().unwrap(), SessionEvent::LoggedOut);
}

#[tokio::test]
async fn test_unauthorized_expires_session() {
    let service = service_with(Arc::new(MemoryStore::new()));
    let backend = FakeBackend::new().with_role("HR");
    service.login(&backend, "hr@example.com", "secret").await.unwrap();
    let mut events = service.subscribe();

    service.handle_unauthorized();

    assert!(service.token().is_none());
    assert_eq!(service.current_role(), None);
    assert_eq!(events.try_recv().unwrap(), SessionEvent::Expired);
}

#[tokio::test]
async fn test_session_restored_on_startup() {
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(dir.path()).unwrap());
    let first = service_with(store.clone());
    first
        .login(&FakeBackend::new().with_role("Admin"), "admin@example.com", "secret")
        .await
        .unwrap();

    let second = service_with(Arc::new(FileStore::open(dir.path()).unwrap()));
    assert_eq!(second.current_role(), Some(Role::Admin));
    assert_eq!(second.current(), first.current());
}

#[tokio::test]
async fn test_partial_session_counts_as_logged_out() {
    let store = Arc::new(MemoryStore::new());
    store.set(TOKEN_KEY, "abc").unwrap();
    store.set(USER_KEY, r#"{"UserID": 1, "Email": "a@example.com"}"#).unwrap();

    let service = service_with(store.clone());
    assert!(!service.is_authenticated());

    store.set(EMPLOYEE_KEY, "not json").unwrap();
    assert!(!service.reload_from_store());
    assert!(!service.is_authenticated());
}

#[tokio::test]
async fn test_logout_in_other_window_is_observed() {
    let dir = tempfile::tempdir().unwrap();
    let window_a = service_with(Arc::new(FileStore::open(dir.path()).unwrap()));
    let window_b = service_with(Arc::new(FileStore::open(dir.path()).unwrap()));
    let backend = FakeBackend::new();

    window_a.login(&backend, "lan@example.com", "secret").await.unwrap();
    assert!(window_b.reload_from_store());
    assert!(window_b.is_authenticated());
    assert!(!window_b.reload_from_store());

    let mut events = window_b.subscribe();
    window_a.logout(&backend).await;
    assert!(window_b.reload_from_store());
    assert!(!window_b.is_authenticated());
    assert_eq!(events.try_recv().unwrap(), SessionEvent::ExternalChange);
}

#[tokio::test]
async fn test_watcher_picks_up_external_login() {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let watched = Arc::new(service_with(store.clone()));
    let writer = service_with(store);
    let mut events = watched.subscribe();

    let handle = watched.spawn_watcher(&tokio::runtime::Handle::current(), Duration::from_millis(20));
    writer.login(&FakeBackend::new(), "lan@example.com", "secret").await.unwrap();

    let event = tokio::time::timeout(Duration::from_secs(2), events.recv()).await.unwrap().unwrap();
    assert_eq!(event, SessionEvent::ExternalChange);
    assert!(watched.is_authenticated());
    handle.abort();
}

/// Store whose writes to one key fail once `failing` is set.
struct FailingStore {
    inner: MemoryStore,
    fail_key: &'static str,
    failing: AtomicBool,
}

impl FailingStore {
    fn new(fail_key: &'static str) -> Self {
        Self {
            inner: MemoryStore::new(),
            fail_key,
            failing: AtomicBool::new(false),
        }
    }
}

impl KeyValueStore for FailingStore {
    fn get(&self, key: &str) -> crate::Result<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> crate::Result<()> {
        if key == self.fail_key && self.failing.load(Ordering::SeqCst) {
            return Err(std::io::Error::other("disk full").into());
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> crate::Result<()> {
        self.inner.remove(key)
    }
}

#[tokio::test]
async fn test_failed_write_restores_previous_session() {
    let store = Arc::new(FailingStore::new(EMPLOYEE_KEY));
    let service = service_with(store.clone());
    let session = service
        .login(&FakeBackend::new(), "lan@example.com", "secret")
        .await
        .unwrap();
    let user_before = store.get(USER_KEY).unwrap();

    store.failing.store(true, Ordering::SeqCst);
    let mut replacement = session.clone();
    replacement.token = "token-456".to_string();
    replacement.user.email = "other@example.com".to_string();
    let err = service.set(replacement).unwrap_err();

    assert!(matches!(err, AppError::Storage(_)));
    assert_eq!(store.get(TOKEN_KEY).unwrap().as_deref(), Some("token-123"));
    assert_eq!(store.get(USER_KEY).unwrap(), user_before);
    assert_eq!(service.current(), Some(session));
}

#[tokio::test]
async fn test_failed_write_on_first_login_stores_nothing() {
    let store = Arc::new(FailingStore::new(USER_KEY));
    store.failing.store(true, Ordering::SeqCst);
    let service = service_with(store.clone());

    let result = service.login(&FakeBackend::new(), "lan@example.com", "secret").await;

    assert!(matches!(result, Err(AppError::Storage(_))));
    assert!(!service.is_authenticated());
    for key in [TOKEN_KEY, USER_KEY, EMPLOYEE_KEY] {
        assert_eq!(store.get(key).unwrap(), None);
    }
}

/// Store that starts a logout on another thread while the watcher is
/// halfway through reading the session.
struct LogoutDuringRead {
    inner: MemoryStore,
    service: OnceLock<Arc<SessionService>>,
    armed: AtomicBool,
    logout: Mutex<Option<JoinHandle<()>>>,
}

impl KeyValueStore for LogoutDuringRead {
    fn get(&self, key: &str) -> crate::Result<Option<String>> {
        let value = self.inner.get(key)?;
        if key == EMPLOYEE_KEY
            && self.armed.swap(false, Ordering::SeqCst)
            && let Some(service) = self.service.get().cloned()
        {
            let handle = std::thread::spawn(move || service.clear(ClearReason::Logout));
            // Give the logout a chance to finish before the read returns.
            std::thread::sleep(Duration::from_millis(100));
            *self.logout.lock().unwrap() = Some(handle);
        }
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> crate::Result<()> {
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> crate::Result<()> {
        self.inner.remove(key)
    }
}

#[tokio::test]
async fn test_logout_during_reload_stays_logged_out() {
    let store = Arc::new(LogoutDuringRead {
        inner: MemoryStore::new(),
        service: OnceLock::new(),
        armed: AtomicBool::new(false),
        logout: Mutex::new(None),
    });
    let service = Arc::new(service_with(store.clone()));
    let _ = store.service.set(service.clone());
    service
        .login(&FakeBackend::new(), "lan@example.com", "secret")
        .await
        .unwrap();

    store.armed.store(true, Ordering::SeqCst);
    service.reload_from_store();
    let logout = store.logout.lock().unwrap().take().unwrap();
    logout.join().unwrap();

    assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
    assert!(!service.is_authenticated());
    assert!(!service.reload_from_store());
}
