use std::sync::Arc;

use mockall::predicate::eq;

use super::*;
use crate::domain::ports::{CacheKey, MockEntityCache, MockUserRepository, NoopCache};
use crate::domain::test_support::{email, fixture_clock, user_with_role};
use crate::domain::{ErrorCode, UserRole, UserStatus};

fn service(users: MockUserRepository) -> IdentityService {
    IdentityService::new(Arc::new(users), Arc::new(NoopCache), fixture_clock())
}

fn draft(raw_email: &str) -> UserDraft {
    UserDraft {
        email: email(raw_email),
        first_name: "Mary".to_owned(),
        last_name: "Shelley".to_owned(),
        role: UserRole::Creator,
    }
}

#[tokio::test]
async fn register_rejects_duplicate_emails() {
    let mut users = MockUserRepository::new();
    users
        .expect_exists_by_email()
        .with(eq(email("mary@example.com")))
        .return_once(|_| Ok(true));
    users.expect_save().times(0);

    let err = service(users)
        .register(draft("mary@example.com"))
        .await
        .expect_err("duplicate email");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.message(), "Email already registered");
}

#[tokio::test]
async fn register_persists_a_new_active_user() {
    let mut users = MockUserRepository::new();
    users.expect_exists_by_email().return_once(|_| Ok(false));
    users.expect_save().times(1).return_once(|_| Ok(()));

    let user = service(users)
        .register(draft("Mary@Example.COM"))
        .await
        .expect("registration succeeds");
    assert_eq!(user.email().as_ref(), "mary@example.com");
    assert_eq!(user.status(), UserStatus::Active);
}

#[tokio::test]
async fn find_by_email_populates_the_cache_on_a_miss() {
    let mary = user_with_role("mary@example.com", UserRole::Creator);
    let key = CacheKey::user_email(mary.email());

    let mut users = MockUserRepository::new();
    let stored = mary.clone();
    users
        .expect_find_by_email()
        .times(1)
        .return_once(move |_| Ok(Some(stored)));

    let mut cache = MockEntityCache::<User>::new();
    cache.expect_get().with(eq(key.clone())).return_once(|_| None);
    cache
        .expect_put()
        .withf(move |k, u: &User| *k == key && u.email().as_ref() == "mary@example.com")
        .times(1)
        .return_once(|_, _| ());

    let service = IdentityService::new(Arc::new(users), Arc::new(cache), fixture_clock());
    let found = service
        .find_by_email(mary.email())
        .await
        .expect("user resolves");
    assert_eq!(found.id(), mary.id());
}

#[tokio::test]
async fn find_by_email_serves_cache_hits_without_the_repository() {
    let mary = user_with_role("mary@example.com", UserRole::Creator);

    let mut users = MockUserRepository::new();
    users.expect_find_by_email().times(0);

    let mut cache = MockEntityCache::<User>::new();
    let cached = mary.clone();
    cache.expect_get().return_once(move |_| Some(cached));

    let service = IdentityService::new(Arc::new(users), Arc::new(cache), fixture_clock());
    let found = service
        .find_by_email(mary.email())
        .await
        .expect("cache satisfies the lookup");
    assert_eq!(found.id(), mary.id());
}

#[tokio::test]
async fn unknown_emails_are_not_found() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().return_once(|_| Ok(None));

    let err = service(users)
        .find_by_email(&email("ghost@example.com"))
        .await
        .expect_err("unknown email");
    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.message(), "User not found");
}

#[tokio::test]
async fn update_profile_invalidates_the_email_cache_entry() {
    let mary = user_with_role("mary@example.com", UserRole::Creator);
    let key = CacheKey::user_email(mary.email());

    let mut users = MockUserRepository::new();
    let stored = mary.clone();
    users
        .expect_find_by_email()
        .return_once(move |_| Ok(Some(stored)));
    users.expect_save().times(1).return_once(|_| Ok(()));

    let mut cache = MockEntityCache::<User>::new();
    cache
        .expect_invalidate()
        .with(eq(key))
        .times(1)
        .return_once(|_| ());

    let service = IdentityService::new(Arc::new(users), Arc::new(cache), fixture_clock());
    let patch = UserPatch {
        first_name: Some("Maria".to_owned()),
        ..UserPatch::default()
    };
    let updated = service
        .update_profile(mary.email(), patch)
        .await
        .expect("profile updates");
    assert_eq!(updated.first_name(), "Maria");
}

#[tokio::test]
async fn deactivate_flips_the_account_inactive() {
    let mary = user_with_role("mary@example.com", UserRole::Creator);

    let mut users = MockUserRepository::new();
    let stored = mary.clone();
    users
        .expect_find_by_email()
        .return_once(move |_| Ok(Some(stored)));
    users
        .expect_save()
        .withf(|user: &User| user.status() == UserStatus::Inactive)
        .times(1)
        .return_once(|_| Ok(()));

    service(users)
        .deactivate(mary.email())
        .await
        .expect("deactivation succeeds");
}
