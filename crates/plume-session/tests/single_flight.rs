//! Renewal coalescing across tasks on a multi-threaded runtime.

use async_trait::async_trait;
use plume_core::{AccessToken, Credentials, Did, Handle, RefreshToken, Result, Session, SessionService};
use plume_session::{RefreshOutcome, SessionConfig, SessionManager, SessionState};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Notify;

struct SlowService {
    calls: AtomicUsize,
    release: Notify,
}

#[async_trait]
impl SessionService for SlowService {
    async fn create_session(&self, _credentials: &Credentials) -> Result<Session> {
        Ok(session("initial"))
    }

    async fn refresh_session(&self, _refresh_token: &RefreshToken) -> Result<Session> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.release.notified().await;
        Ok(session("renewed"))
    }
}

fn session(access: &str) -> Session {
    Session::new(
        AccessToken::new(access),
        RefreshToken::new("refresh"),
        Did::new("did:plc:test123").unwrap(),
        Handle::new("alice.test").unwrap(),
    )
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_many_triggers_one_call() {
    let service = Arc::new(SlowService {
        calls: AtomicUsize::new(0),
        release: Notify::new(),
    });
    let manager = SessionManager::new(service.clone(), SessionConfig::default());
    manager.set_session(session("initial")).unwrap();

    let first = tokio::spawn({
        let manager = manager.clone();
        async move { manager.refresh_now().await }
    });

    while service.calls.load(Ordering::SeqCst) == 0 {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    assert_eq!(manager.state(), SessionState::Renewing);
    // Reads are not blocked by the call in flight.
    assert_eq!(manager.current_auth_header().as_deref(), Some("Bearer initial"));

    let others: Vec<_> = (0..16)
        .map(|_| {
            let manager = manager.clone();
            tokio::spawn(async move { manager.refresh_now().await })
        })
        .collect();
    for handle in others {
        assert_eq!(handle.await.unwrap().unwrap(), RefreshOutcome::Coalesced);
    }

    service.release.notify_one();
    assert!(matches!(
        first.await.unwrap().unwrap(),
        RefreshOutcome::Renewed(_)
    ));

    assert_eq!(service.calls.load(Ordering::SeqCst), 1);
    assert_eq!(manager.state(), SessionState::Authenticated);
    assert_eq!(manager.current_auth_header().as_deref(), Some("Bearer renewed"));
}

#[tokio::test]
async fn test_subscribers_see_renewed_session() {
    let service = Arc::new(SlowService {
        calls: AtomicUsize::new(0),
        release: Notify::new(),
    });
    service.release.notify_one();

    let manager = SessionManager::with_session(
        service.clone(),
        SessionConfig::default(),
        session("initial"),
    );
    let mut updates = manager.subscribe();

    manager.refresh_now().await.unwrap();
    updates.changed().await.unwrap();
    let seen = updates.borrow().clone().unwrap();
    assert_eq!(seen.access_token.as_str(), "renewed");

    manager.clear_session();
    updates.changed().await.unwrap();
    assert!(updates.borrow().is_none());
}
