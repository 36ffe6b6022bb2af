use super::error::{EntityApiErrorKind, Error};
use chrono::Utc;

use entity::users::{ActiveModel, Column, Entity, Model};
use log::*;
use sea_orm::{entity::prelude::*, ActiveValue::Unchanged, ConnectionTrait, Set};

/// The profile fields written on create and refreshed on every later login.
/// `email` is the lookup key and is never rewritten by an update.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Profile {
    pub email: String,
    pub name: Option<String>,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub picture: Option<String>,
    pub locale: Option<String>,
    pub email_verified: bool,
}

pub async fn exists_by_email(db: &impl ConnectionTrait, email: &str) -> Result<bool, Error> {
    let existing = Entity::find()
        .filter(Column::Email.eq(email))
        .one(db)
        .await?;
    Ok(existing.is_some())
}

pub async fn find_by_email(db: &impl ConnectionTrait, email: &str) -> Result<Option<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::Email.eq(email))
        .one(db)
        .await?)
}

pub async fn create(db: &impl ConnectionTrait, profile: Profile) -> Result<Model, Error> {
    debug!("New User Profile to be inserted: {profile:?}");

    let now = Utc::now();
    let user_active_model = ActiveModel {
        email: Set(profile.email),
        name: Set(profile.name),
        given_name: Set(profile.given_name),
        family_name: Set(profile.family_name),
        picture: Set(profile.picture),
        email_verified: Set(profile.email_verified),
        locale: Set(profile.locale),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    Ok(user_active_model.insert(db).await?)
}

/// Overwrites every mutable profile field of the user identified by `profile.email`.
pub async fn update_profile(db: &impl ConnectionTrait, profile: Profile) -> Result<Model, Error> {
    let existing = find_by_email(db, &profile.email).await?;

    match existing {
        Some(user) => {
            debug!("Existing User model to be Updated: {user:?}");

            let active_model = ActiveModel {
                id: Unchanged(user.id),
                email: Unchanged(user.email),
                name: Set(profile.name),
                given_name: Set(profile.given_name),
                family_name: Set(profile.family_name),
                picture: Set(profile.picture),
                email_verified: Set(profile.email_verified),
                locale: Set(profile.locale),
                created_at: Unchanged(user.created_at),
                updated_at: Set(Utc::now().into()),
            };

            Ok(active_model.update(db).await?)
        }
        None => {
            error!("User with email {} not found", profile.email);

            Err(Error {
                source: None,
                error_kind: EntityApiErrorKind::RecordNotFound,
            })
        }
    }
}
