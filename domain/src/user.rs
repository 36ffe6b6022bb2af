//! The user directory: reconciles an identity provider profile with the stored user
//! record for the same email.

use std::sync::Arc;

use async_trait::async_trait;
use log::*;
use sea_orm::DatabaseConnection;

use crate::error::{DomainErrorKind, EntityErrorKind, Error, InternalErrorKind};
use crate::gateway::ProviderProfile;
use crate::users;

pub use entity_api::user::Profile;

/// Persistence operations the directory needs, keyed by email.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn exists_by_email(&self, email: &str) -> Result<bool, Error>;

    async fn find_by_email(&self, email: &str) -> Result<users::Model, Error>;

    async fn create(&self, profile: Profile) -> Result<users::Model, Error>;

    /// Rewrites every profile field of the user owning `profile.email`.
    async fn update(&self, profile: Profile) -> Result<users::Model, Error>;
}

/// `UserStore` over the `users` table.
pub struct DbUserStore {
    db: Arc<DatabaseConnection>,
}

impl DbUserStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for DbUserStore {
    async fn exists_by_email(&self, email: &str) -> Result<bool, Error> {
        Ok(entity_api::user::exists_by_email(self.db.as_ref(), email).await?)
    }

    async fn find_by_email(&self, email: &str) -> Result<users::Model, Error> {
        entity_api::user::find_by_email(self.db.as_ref(), email)
            .await?
            .ok_or_else(|| {
                Error::new(DomainErrorKind::Internal(InternalErrorKind::Entity(
                    EntityErrorKind::NotFound,
                )))
            })
    }

    async fn create(&self, profile: Profile) -> Result<users::Model, Error> {
        Ok(entity_api::user::create(self.db.as_ref(), profile).await?)
    }

    async fn update(&self, profile: Profile) -> Result<users::Model, Error> {
        Ok(entity_api::user::update_profile(self.db.as_ref(), profile).await?)
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

impl From<&ProviderProfile> for Profile {
    fn from(profile: &ProviderProfile) -> Self {
        Profile {
            email: profile.email.clone(),
            name: non_empty(&profile.name),
            given_name: non_empty(&profile.given_name),
            family_name: non_empty(&profile.family_name),
            picture: non_empty(&profile.picture),
            locale: non_empty(&profile.locale),
            email_verified: profile.email_verified,
        }
    }
}

fn directory_error(source: Error) -> Error {
    Error::with_source(
        DomainErrorKind::Internal(InternalErrorKind::Directory),
        source,
    )
}

/// Returns the user for `profile.email`, creating it on first sight.
///
/// A known user has its profile fields refreshed. If that refresh fails the user as it
/// was before the login is returned and the failure is only logged. Failures checking
/// for or creating the user are returned as `InternalErrorKind::Directory`.
///
/// Two concurrent first logins for one email can both reach `create`; the unique
/// constraint on `users.email` fails the later one.
pub async fn find_or_create_with_profile(
    store: &dyn UserStore,
    profile: Profile,
) -> Result<users::Model, Error> {
    let exists = store.exists_by_email(&profile.email).await.map_err(|e| {
        error!("Failed to check for user {}: {e}", profile.email);
        directory_error(e)
    })?;

    if !exists {
        let email = profile.email.clone();
        let user = store.create(profile).await.map_err(|e| {
            error!("Failed to create user {email}: {e}");
            directory_error(e)
        })?;
        info!("Created user {} for {}", user.id, user.email);
        return Ok(user);
    }

    let existing = store.find_by_email(&profile.email).await.map_err(|e| {
        error!("Failed to load user {}: {e}", profile.email);
        directory_error(e)
    })?;

    match store.update(profile).await {
        Ok(updated) => {
            debug!("Refreshed profile of user {}", updated.id);
            Ok(updated)
        }
        Err(e) => {
            warn!(
                "Failed to refresh profile of user {} ({}), continuing with stored values: {e}",
                existing.id, existing.email
            );
            Ok(existing)
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use std::sync::atomic::Ordering;

    fn profile(email: &str, name: &str) -> Profile {
        Profile {
            email: email.to_string(),
            name: Some(name.to_string()),
            given_name: Some("Ada".to_string()),
            family_name: None,
            picture: None,
            locale: Some("en".to_string()),
            email_verified: true,
        }
    }

    #[tokio::test]
    async fn unseen_email_creates_exactly_one_user() {
        let store = FakeUserStore::default();

        let user = find_or_create_with_profile(&store, profile("a@b.com", "Ada"))
            .await
            .unwrap();

        assert_eq!(user.email, "a@b.com");
        assert_eq!(user.name.as_deref(), Some("Ada"));
        assert!(user.email_verified);
        assert_eq!(store.count("a@b.com"), 1);
    }

    #[tokio::test]
    async fn repeated_logins_never_duplicate_and_last_login_wins() {
        let store = FakeUserStore::default();

        let first = find_or_create_with_profile(&store, profile("a@b.com", "Ada"))
            .await
            .unwrap();
        let second = find_or_create_with_profile(&store, profile("a@b.com", "Ada L."))
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.name.as_deref(), Some("Ada L."));
        assert_eq!(store.count("a@b.com"), 1);
        assert_eq!(store.creates.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_refresh_returns_the_pre_update_user() {
        let existing = stored_user("a@b.com", "Old Name");
        let store = FakeUserStore::with_user(existing.clone()).failing_update();

        let user = find_or_create_with_profile(&store, profile("a@b.com", "New Name"))
            .await
            .unwrap();

        assert_eq!(user, existing);
    }

    #[tokio::test]
    async fn failed_create_is_a_directory_error() {
        let store = FakeUserStore::default().failing_create();

        let err = find_or_create_with_profile(&store, profile("a@b.com", "Ada"))
            .await
            .unwrap_err();

        assert_eq!(
            err.error_kind,
            DomainErrorKind::Internal(InternalErrorKind::Directory)
        );
    }

    #[tokio::test]
    async fn failed_existence_check_is_a_directory_error() {
        let store = FakeUserStore::default().failing_exists();

        let err = find_or_create_with_profile(&store, profile("a@b.com", "Ada"))
            .await
            .unwrap_err();

        assert_eq!(
            err.error_kind,
            DomainErrorKind::Internal(InternalErrorKind::Directory)
        );
        assert_eq!(store.count("a@b.com"), 0);
    }

    #[tokio::test]
    async fn losing_a_concurrent_first_login_is_a_directory_error() {
        let winner = stored_user("a@b.com", "Ada");
        let store = FakeUserStore::with_user(winner).racing_insert();

        let err = find_or_create_with_profile(&store, profile("a@b.com", "Ada"))
            .await
            .unwrap_err();

        assert_eq!(
            err.error_kind,
            DomainErrorKind::Internal(InternalErrorKind::Directory)
        );
        assert_eq!(store.count("a@b.com"), 1);
        assert_eq!(store.creates.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn empty_provider_fields_become_unset() {
        let provider = ProviderProfile {
            sub: "1".to_string(),
            email: "a@b.com".to_string(),
            name: "Ada".to_string(),
            ..Default::default()
        };

        let profile = Profile::from(&provider);

        assert_eq!(profile.name.as_deref(), Some("Ada"));
        assert_eq!(profile.given_name, None);
        assert_eq!(profile.picture, None);
        assert_eq!(profile.locale, None);
        assert!(!profile.email_verified);
    }
}
