
use identity_core::{CredentialScheme, IdentityError, User, UserId, UserRepository};
use identity_storage::BcryptScheme;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use test_helpers::{test_user, TestDb};

#[tokio::test]
async fn test_create_and_get_user() {
    let db = TestDb::new().await;
    let store = db.plaintext_store();

    let mut user = test_user("alice");
    user.description = Some("first user".to_string());
    store.create(&user).await.expect("Failed to create user");

    let fetched = store.get(&user.id).await.expect("Failed to get user");
    assert_eq!(fetched, user);
}

#[tokio::test]
async fn test_duplicate_login_is_conflict() {
    let db = TestDb::new().await;
    let store = db.plaintext_store();

    let first = test_user("test");
    let second = test_user("test");
    assert_ne!(first.id, second.id);

    store.create(&first).await.unwrap();
    let result = store.create(&second).await;

    assert!(matches!(result, Err(IdentityError::Conflict(_))));
    assert_eq!(store.list_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_duplicate_id_is_conflict() {
    let db = TestDb::new().await;
    let store = db.plaintext_store();

    let first = test_user("one");
    let mut second = test_user("two");
    second.id = first.id.clone();

    store.create(&first).await.unwrap();
    match store.create(&second).await {
        Err(IdentityError::Conflict(msg)) => assert!(msg.contains(first.id.as_str())),
        other => panic!("expected Conflict, got {other:?}"),
    }
}

#[tokio::test]
async fn test_concurrent_creates_with_same_login() {
    let db = TestDb::new().await;
    let store = db.plaintext_store();

    let a = test_user("race");
    let b = test_user("race");

    let (ra, rb) = tokio::join!(store.create(&a), store.create(&b));

    let successes = [ra.is_ok(), rb.is_ok()].iter().filter(|ok| **ok).count();
    assert_eq!(successes, 1);
    assert!(matches!(ra.err().or(rb.err()), Some(IdentityError::Conflict(_))));
}

#[tokio::test]
async fn test_create_rejects_missing_id_or_name() {
    let db = TestDb::new().await;
    let store = db.plaintext_store();

    let mut without_id = test_user("noid");
    without_id.id = UserId::new("");
    assert!(matches!(
        store.create(&without_id).await,
        Err(IdentityError::Invalid(_))
    ));

    let mut without_name = test_user("noname");
    without_name.name = String::new();
    assert!(matches!(
        store.create(&without_name).await,
        Err(IdentityError::Invalid(_))
    ));

    assert!(store.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_get_nonexistent_user() {
    let db = TestDb::new().await;
    let store = db.plaintext_store();

    let result = store.get(&UserId::new("5ea844b6-8e")).await;
    assert!(matches!(result, Err(IdentityError::NotFound { .. })));
}

#[tokio::test]
async fn test_update_replaces_mutable_fields() {
    let db = TestDb::new().await;
    let store = db.plaintext_store();

    let user = test_user("before");
    store.create(&user).await.unwrap();

    let changed = User {
        id: user.id.clone(),
        name: "renamed".to_string(),
        login: "after".to_string(),
        password: "new-secret".to_string(),
        description: Some("updated".to_string()),
    };
    store.update(&changed).await.unwrap();

    assert_eq!(store.get(&user.id).await.unwrap(), changed);
}

#[tokio::test]
async fn test_update_nonexistent_user_does_not_insert() {
    let db = TestDb::new().await;
    let store = db.plaintext_store();

    let ghost = test_user("ghost");
    let result = store.update(&ghost).await;

    assert!(matches!(result, Err(IdentityError::NotFound { .. })));
    assert!(store.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_update_into_taken_login_is_conflict() {
    let db = TestDb::new().await;
    let store = db.plaintext_store();

    let a = test_user("a");
    let b = test_user("b");
    store.create(&a).await.unwrap();
    store.create(&b).await.unwrap();

    let mut clash = b.clone();
    clash.login = "a".to_string();
    assert!(matches!(
        store.update(&clash).await,
        Err(IdentityError::Conflict(_))
    ));
}

#[tokio::test]
async fn test_delete_user() {
    let db = TestDb::new().await;
    let store = db.plaintext_store();

    let user = test_user("doomed");
    store.create(&user).await.unwrap();
    store.delete(&user.id).await.unwrap();

    assert!(matches!(
        store.get(&user.id).await,
        Err(IdentityError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_delete_empty_or_unknown_id_is_not_found() {
    let db = TestDb::new().await;
    let store = db.plaintext_store();

    let survivor = test_user("survivor");
    store.create(&survivor).await.unwrap();

    assert!(matches!(
        store.delete(&UserId::new("")).await,
        Err(IdentityError::NotFound { .. })
    ));
    assert!(matches!(
        store.delete(&UserId::generate()).await,
        Err(IdentityError::NotFound { .. })
    ));
    assert_eq!(store.list_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_list_all_is_sorted_by_name() {
    let db = TestDb::new().await;
    let store = db.plaintext_store();

    for (name, login) in [("Charlie", "c"), ("Alice", "a"), ("Bob", "b")] {
        let mut user = test_user(login);
        user.name = name.to_string();
        store.create(&user).await.unwrap();
    }

    let names: Vec<String> = store
        .list_all()
        .await
        .unwrap()
        .into_iter()
        .map(|u| u.name)
        .collect();
    assert_eq!(names, vec!["Alice", "Bob", "Charlie"]);
}

#[tokio::test]
async fn test_check_credentials_plaintext() {
    let db = TestDb::new().await;
    let store = db.plaintext_store();

    let user = test_user("test");
    store.create(&user).await.unwrap();

    let matched = store.check_credentials("test", "test").await.unwrap();
    assert_eq!(matched.id, user.id);

    assert!(matches!(
        store.check_credentials("test", "wrong").await,
        Err(IdentityError::Unauthorized(_))
    ));
    assert!(matches!(
        store.check_credentials("nobody", "test").await,
        Err(IdentityError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_bcrypt_store_never_persists_plaintext() {
    let db = TestDb::new().await;
    let store = db.store_with(Arc::new(BcryptScheme::new(4)));

    let user = test_user("hashed");
    store.create(&user).await.unwrap();

    let stored = store.get(&user.id).await.unwrap();
    assert_ne!(stored.password, "test");
    assert!(stored.password.starts_with("$2"));

    let matched = store.check_credentials("hashed", "test").await.unwrap();
    assert_eq!(matched.id, user.id);
    assert!(store.check_credentials("hashed", "nope").await.is_err());
}

/// Plain equality that counts how often a password is checked
#[derive(Default)]
struct CountingScheme {
    verifications: AtomicUsize,
}

impl CredentialScheme for CountingScheme {
    fn name(&self) -> &'static str {
        "counting"
    }

    fn seal(&self, password: &str) -> identity_core::Result<String> {
        Ok(password.to_string())
    }

    fn verify(&self, password: &str, stored: &str) -> identity_core::Result<bool> {
        self.verifications.fetch_add(1, Ordering::SeqCst);
        Ok(password == stored)
    }
}

#[tokio::test]
async fn test_unknown_login_costs_one_verification() {
    let db = TestDb::new().await;
    let scheme = Arc::new(CountingScheme::default());
    let store = db.store_with(scheme.clone());

    store.create(&test_user("known")).await.unwrap();

    assert!(store.check_credentials("known", "wrong").await.is_err());
    assert_eq!(scheme.verifications.load(Ordering::SeqCst), 1);

    // Unknown logins still pay for a check, and the decoy never matches a user
    for _ in 0..2 {
        assert!(matches!(
            store.check_credentials("nobody", "identity-storage-decoy").await,
            Err(IdentityError::NotFound { .. })
        ));
    }
    assert_eq!(scheme.verifications.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_unknown_login_under_bcrypt_is_not_found() {
    let db = TestDb::new().await;
    let store = db.store_with(Arc::new(BcryptScheme::new(4)));

    assert!(matches!(
        store.check_credentials("nobody", "test").await,
        Err(IdentityError::NotFound { .. })
    ));
}
