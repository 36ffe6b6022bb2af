use super::error::{EntityApiErrorKind, Error};
use chrono::Utc;
use entity::scoreboards::{ActiveModel, Column, Entity, Model};
use entity::Id;
use log::*;
use sea_orm::{entity::prelude::*, ActiveValue::Unchanged, ConnectionTrait, QueryOrder, Set};

pub async fn find_all(db: &impl ConnectionTrait) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .order_by_asc(Column::CreatedAt)
        .all(db)
        .await?)
}

pub async fn find_by_id(db: &impl ConnectionTrait, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id).one(db).await?.ok_or_else(|| Error {
        source: None,
        error_kind: EntityApiErrorKind::RecordNotFound,
    })
}

pub async fn create(db: &impl ConnectionTrait, name: Option<String>) -> Result<Model, Error> {
    debug!("New Scoreboard to be inserted with name: {name:?}");

    let now = Utc::now();
    let scoreboard_active_model = ActiveModel {
        name: Set(name),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    Ok(scoreboard_active_model.insert(db).await?)
}

pub async fn update(
    db: &impl ConnectionTrait,
    id: Id,
    name: Option<String>,
) -> Result<Model, Error> {
    let result = Entity::find_by_id(id).one(db).await?;

    match result {
        Some(scoreboard) => {
            debug!("Existing Scoreboard model to be Updated: {scoreboard:?}");

            let active_model = ActiveModel {
                id: Unchanged(scoreboard.id),
                name: Set(name),
                created_at: Unchanged(scoreboard.created_at),
                updated_at: Set(Utc::now().into()),
            };

            Ok(active_model.update(db).await?)
        }
        None => {
            error!("Scoreboard with id {id} not found");

            Err(Error {
                source: None,
                error_kind: EntityApiErrorKind::RecordNotFound,
            })
        }
    }
}

pub async fn delete_by_id(db: &impl ConnectionTrait, id: Id) -> Result<(), Error> {
    let result = Entity::delete_by_id(id).exec(db).await?;

    if result.rows_affected == 0 {
        warn!("Scoreboard with id {id} not found for deletion");
        return Err(Error {
            source: None,
            error_kind: EntityApiErrorKind::RecordNotFound,
        });
    }

    Ok(())
}
