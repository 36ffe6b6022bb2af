use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // The UNIQUE constraint on email is what settles two concurrent first logins
        // for the same address: exactly one INSERT wins.
        let create_table_sql = r#"
            CREATE TABLE IF NOT EXISTS scoreboard_api.users (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                email VARCHAR(320) NOT NULL UNIQUE,
                name VARCHAR(255),
                given_name VARCHAR(255),
                family_name VARCHAR(255),
                picture TEXT,
                email_verified BOOLEAN NOT NULL DEFAULT FALSE,
                locale VARCHAR(35),

                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
        "#;

        manager
            .get_connection()
            .execute_unprepared(create_table_sql)
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS scoreboard_api.users")
            .await?;

        Ok(())
    }
}
