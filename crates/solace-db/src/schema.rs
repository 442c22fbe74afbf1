use sea_orm::sea_query::TableCreateStatement;
use sea_orm::{ConnectionTrait, DbErr, EntityTrait, Schema};
use std::error::Error;

use solace_entity::journal::{journal_entry, journal_media};
use solace_entity::user;

/// Creates all application tables if they do not exist yet.
///
/// Table order matters: referenced tables first.
pub async fn setup<C: ConnectionTrait>(conn: &C) -> Result<(), DbErr> {
    create_table(conn, user::Entity).await?;
    create_table(conn, journal_entry::Entity).await?;
    create_table(conn, journal_media::Entity).await?;
    Ok(())
}

async fn create_table<C: ConnectionTrait, E: EntityTrait>(conn: &C, entity: E) -> Result<(), DbErr> {
    let backend = conn.get_database_backend();
    let schema = Schema::new(backend);
    let mut statement: TableCreateStatement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    conn.execute(backend.build(&statement))
        .await
        .map(|_| ())
        .inspect_err(|error| {
            tracing::error!(error = error as &dyn Error, table = %entity.table_name(), "failed to create table");
        })
}
