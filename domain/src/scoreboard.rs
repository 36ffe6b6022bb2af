use std::sync::Arc;

use async_trait::async_trait;
use log::*;
use sea_orm::DatabaseConnection;

use crate::error::{DomainErrorKind, EntityErrorKind, Error, InternalErrorKind};
use crate::{scoreboards, Id};

pub const MAX_NAME_LEN: usize = 255;

/// Scoreboard names are 1 to 255 ASCII letters, digits, `-`, `_` or spaces.
pub fn validate_name(name: &str) -> Result<(), Error> {
    let valid = !name.is_empty()
        && name.chars().count() <= MAX_NAME_LEN
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ' '));

    if valid {
        Ok(())
    } else {
        debug!("Rejected scoreboard name {name:?}");
        Err(Error::new(DomainErrorKind::Internal(
            InternalErrorKind::Entity(EntityErrorKind::Invalid),
        )))
    }
}

#[async_trait]
pub trait ScoreboardStore: Send + Sync {
    async fn list(&self) -> Result<Vec<scoreboards::Model>, Error>;

    async fn get(&self, id: Id) -> Result<scoreboards::Model, Error>;

    async fn create(&self, name: String) -> Result<scoreboards::Model, Error>;

    async fn update(&self, id: Id, name: String) -> Result<scoreboards::Model, Error>;

    async fn delete(&self, id: Id) -> Result<(), Error>;
}

/// `ScoreboardStore` over the `scoreboards` table. Names are validated before any write.
pub struct DbScoreboardStore {
    db: Arc<DatabaseConnection>,
}

impl DbScoreboardStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ScoreboardStore for DbScoreboardStore {
    async fn list(&self) -> Result<Vec<scoreboards::Model>, Error> {
        Ok(entity_api::scoreboard::find_all(self.db.as_ref()).await?)
    }

    async fn get(&self, id: Id) -> Result<scoreboards::Model, Error> {
        Ok(entity_api::scoreboard::find_by_id(self.db.as_ref(), id).await?)
    }

    async fn create(&self, name: String) -> Result<scoreboards::Model, Error> {
        validate_name(&name)?;
        Ok(entity_api::scoreboard::create(self.db.as_ref(), Some(name)).await?)
    }

    async fn update(&self, id: Id, name: String) -> Result<scoreboards::Model, Error> {
        validate_name(&name)?;
        Ok(entity_api::scoreboard::update(self.db.as_ref(), id, Some(name)).await?)
    }

    async fn delete(&self, id: Id) -> Result<(), Error> {
        Ok(entity_api::scoreboard::delete_by_id(self.db.as_ref(), id).await?)
    }
}


#[cfg(all(test, feature = "mock"))]
mod mock_tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn create_rejects_invalid_names_without_touching_the_database() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let store = DbScoreboardStore::new(Arc::new(db));

        assert!(store.create("no/slashes".to_string()).await.is_err());
    }

    #[tokio::test]
    async fn create_stores_a_valid_name() {
        let now = Utc::now().fixed_offset();
        let model = scoreboards::Model {
            id: Id::new_v4(),
            name: Some("Finals".to_string()),
            created_at: now,
            updated_at: now,
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![model.clone()]])
            .into_connection();
        let store = DbScoreboardStore::new(Arc::new(db));

        let created = store.create("Finals".to_string()).await.unwrap();

        assert_eq!(created, model);
    }
}
