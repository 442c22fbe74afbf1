use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter};
use solace_entity::journal::journal_media::{self, Entity as JournalMedia, MediaKind, Model as JournalMediaModel};
use std::error::Error;
use uuid::Uuid;

pub struct Query;

impl Query {
    pub async fn get_entry_media<C: ConnectionTrait>(
        conn: &C,
        journal_entry_id: Uuid,
        kind: MediaKind,
        position: i32,
    ) -> Result<Option<JournalMediaModel>, DbErr> {
        JournalMedia::find()
            .filter(journal_media::Column::JournalEntryId.eq(journal_entry_id))
            .filter(journal_media::Column::Kind.eq(kind))
            .filter(journal_media::Column::Position.eq(position))
            .one(conn)
            .await
            .inspect_err(|error| {
                tracing::error!(error = error as &dyn Error, "failed to load journal media");
            })
    }
}
