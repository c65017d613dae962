//! Pad authorization

use std::sync::Arc;

use chrono::Utc;
use pws_application::AccessControlGuard;
use pws_domain::value_objects::RealmAccess;
use pws_domain::{Claims, Error, Identity, ResourceAccessDescriptor};
use pws_providers::InMemoryResourceDirectory;
use uuid::Uuid;

fn identity(sub: &str) -> Identity {
    Identity::from_claims(Claims {
        sub: sub.to_string(),
        exp: Utc::now().timestamp() + 300,
        iat: None,
        iss: None,
        email: String::new(),
        email_verified: false,
        preferred_username: sub.to_string(),
        name: String::new(),
        given_name: None,
        family_name: None,
        realm_access: RealmAccess::default(),
    })
}

fn guard_with_pad() -> (AccessControlGuard, Uuid) {
    let directory = InMemoryResourceDirectory::new();
    let pad = Uuid::new_v4();
    directory.insert(ResourceAccessDescriptor::new(pad, "alice").shared_with("bob"));
    (AccessControlGuard::new(Arc::new(directory)), pad)
}

#[tokio::test]
async fn test_owner_has_full_access() {
    let (guard, pad) = guard_with_pad();

    guard.authorize(&pad, &identity("alice"), false).await.unwrap();
    let descriptor = guard.authorize(&pad, &identity("alice"), true).await.unwrap();
    assert_eq!(descriptor.owner_id, "alice");
}

#[tokio::test]
async fn test_shared_user_cannot_do_owner_operations() {
    let (guard, pad) = guard_with_pad();

    guard.authorize(&pad, &identity("bob"), false).await.unwrap();
    let err = guard.authorize(&pad, &identity("bob"), true).await.unwrap_err();
    assert!(matches!(err, Error::Forbidden { .. }));
}

#[tokio::test]
async fn test_stranger_is_forbidden() {
    let (guard, pad) = guard_with_pad();

    let err = guard.authorize(&pad, &identity("mallory"), false).await.unwrap_err();
    assert!(matches!(err, Error::Forbidden { .. }));
}

#[tokio::test]
async fn test_missing_pad_is_not_found() {
    let (guard, _) = guard_with_pad();

    let err = guard
        .authorize(&Uuid::new_v4(), &identity("alice"), false)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
}
