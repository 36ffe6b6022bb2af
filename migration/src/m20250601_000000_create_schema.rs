use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("CREATE SCHEMA IF NOT EXISTS scoreboard_api;")
            .await?;

        // gen_random_uuid() is built in from Postgres 13; older servers need pgcrypto
        manager
            .get_connection()
            .execute_unprepared("CREATE EXTENSION IF NOT EXISTS pgcrypto;")
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // CASCADE removes every table in the schema
        manager
            .get_connection()
            .execute_unprepared("DROP SCHEMA IF EXISTS scoreboard_api CASCADE;")
            .await?;

        Ok(())
    }
}
