use super::*;

fn inspector() -> Identity { Identity::new(1, "insp", Role::Inspector) }

#[test]
fn starts_unknown_and_not_loading() {
    let store = IdentityStore::new();
    let snap = store.snapshot();
    assert_eq!(snap.auth, AuthState::Unknown);
    assert!(!snap.loading);
    assert!(!snap.auth.is_resolved());
    assert!(store.current_identity().is_none());
}

#[test]
fn authenticated_then_anonymous_discards_identity() {
    let store = IdentityStore::new();
    let held = store.set_authenticated(inspector());
    assert_eq!(store.current_identity().as_deref(), Some(&*held));
    assert_eq!(store.auth_state().role(), Some(Role::Inspector));

    store.set_anonymous();
    assert_eq!(store.auth_state(), AuthState::Anonymous);
    assert!(store.current_identity().is_none());
}

#[test]
fn clones_share_state() {
    let a = IdentityStore::new();
    let b = a.clone();
    a.set_anonymous();
    assert_eq!(b.auth_state(), AuthState::Anonymous);
}

#[tokio::test]
async fn set_anonymous_is_idempotent_for_subscribers() {
    let store = IdentityStore::new();
    let mut rx = store.subscribe();

    store.set_anonymous();
    assert!(rx.has_changed().unwrap());
    rx.borrow_and_update();

    store.set_anonymous();
    assert!(!rx.has_changed().unwrap(), "second set_anonymous must not notify");
}

#[tokio::test]
async fn set_authenticated_always_notifies() {
    let store = IdentityStore::new();
    let mut rx = store.subscribe();
    store.set_authenticated(inspector());
    rx.borrow_and_update();
    store.set_authenticated(inspector());
    assert!(rx.has_changed().unwrap());
}

#[tokio::test]
async fn loading_flag_is_independent_of_auth_state() {
    let store = IdentityStore::new();
    let mut rx = store.subscribe();

    store.set_loading(true);
    assert!(rx.has_changed().unwrap());
    let snap = rx.borrow_and_update().clone();
    assert!(snap.loading);
    assert_eq!(snap.auth, AuthState::Unknown);

    store.set_loading(true);
    assert!(!rx.has_changed().unwrap());

    store.set_loading(false);
    assert!(!store.is_loading());
}

#[test]
fn try_begin_loading_gates_second_caller() {
    let store = IdentityStore::new();
    assert!(store.try_begin_loading());
    assert!(!store.try_begin_loading());
    store.set_loading(false);
    assert!(store.try_begin_loading());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_begin_loading_admits_exactly_one() {
    let store = IdentityStore::new();
    let mut handles = Vec::new();
    for _ in 0..16 {
        let s = store.clone();
        handles.push(tokio::spawn(async move { s.try_begin_loading() }));
    }
    let mut admitted = 0;
    for h in handles {
        if h.await.unwrap() { admitted += 1; }
    }
    assert_eq!(admitted, 1);
}

#[tokio::test]
async fn subscriber_sees_whole_snapshot() {
    let store = IdentityStore::new();
    let mut rx = store.subscribe();
    let s2 = store.clone();
    let writer = tokio::spawn(async move {
        s2.set_authenticated(Identity::new(9, "nine", Role::Inspector));
    });
    rx.changed().await.unwrap();
    let snap = rx.borrow_and_update().clone();
    let id = snap.auth.identity().expect("authenticated");
    assert_eq!(id.id, 9);
    assert_eq!(id.role, Role::Inspector);
    writer.await.unwrap();
}

#[test]
fn resolve_if_unknown_only_leaves_unknown() {
    let store = IdentityStore::new();
    assert!(store.resolve_if_unknown(None));
    assert_eq!(store.auth_state(), AuthState::Anonymous);

    // Already resolved: neither a result nor a different identity lands.
    assert!(!store.resolve_if_unknown(Some(inspector())));
    assert_eq!(store.auth_state(), AuthState::Anonymous);

    let store = IdentityStore::new();
    assert!(store.resolve_if_unknown(Some(inspector())));
    let held = store.current_identity();
    assert!(!store.resolve_if_unknown(None));
    assert_eq!(store.current_identity(), held);
}

#[tokio::test]
async fn resolve_if_unknown_does_not_notify_when_resolved() {
    let store = IdentityStore::new();
    store.set_authenticated(inspector());
    let mut rx = store.subscribe();
    assert!(!store.resolve_if_unknown(None));
    assert!(!rx.has_changed().unwrap());
}
