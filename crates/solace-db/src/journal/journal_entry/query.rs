use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use solace_entity::journal::journal_entry::{self, Entity as JournalEntry, Model as JournalEntryModel};
use solace_entity::journal::journal_media::{Entity as JournalMedia, Model as JournalMediaModel};
use std::error::Error;
use uuid::Uuid;

pub struct Query;

impl Query {
    /// All entries of one user, newest first, each with its attachments.
    pub async fn get_user_journal_entries<C: ConnectionTrait>(
        conn: &C,
        user_id: Uuid,
    ) -> Result<Vec<(JournalEntryModel, Vec<JournalMediaModel>)>, DbErr> {
        JournalEntry::find()
            .filter(journal_entry::Column::UserId.eq(user_id))
            .order_by_desc(journal_entry::Column::CreatedAt)
            .find_with_related(JournalMedia)
            .all(conn)
            .await
            .inspect_err(|error| {
                tracing::error!(error = error as &dyn Error, "failed to load user journal entries");
            })
    }

    /// Looks up an entry without an ownership filter. Callers decide
    /// between not-found and forbidden from the loaded `user_id`.
    pub async fn get_journal_entry<C: ConnectionTrait>(
        conn: &C,
        journal_entry_id: Uuid,
    ) -> Result<Option<JournalEntryModel>, DbErr> {
        JournalEntry::find_by_id(journal_entry_id)
            .one(conn)
            .await
            .inspect_err(|error| {
                tracing::error!(error = error as &dyn Error, "failed to load journal entry");
            })
    }

    pub async fn get_user_journal_entry<C: ConnectionTrait>(
        conn: &C,
        user_id: Uuid,
        journal_entry_id: Uuid,
    ) -> Result<Option<(JournalEntryModel, Vec<JournalMediaModel>)>, DbErr> {
        let entries = JournalEntry::find_by_id(journal_entry_id)
            .filter(journal_entry::Column::UserId.eq(user_id))
            .find_with_related(JournalMedia)
            .all(conn)
            .await
            .inspect_err(|error| {
                tracing::error!(error = error as &dyn Error, "failed to load user journal entry");
            })?;

        Ok(entries.into_iter().next())
    }

    /// Texts of the newest `limit` entries, newest first.
    pub async fn get_recent_texts<C: ConnectionTrait>(
        conn: &C,
        user_id: Uuid,
        limit: u64,
    ) -> Result<Vec<String>, DbErr> {
        JournalEntry::find()
            .select_only()
            .column(journal_entry::Column::TextBody)
            .filter(journal_entry::Column::UserId.eq(user_id))
            .order_by_desc(journal_entry::Column::CreatedAt)
            .limit(limit)
            .into_tuple()
            .all(conn)
            .await
            .inspect_err(|error| {
                tracing::error!(error = error as &dyn Error, "failed to load recent journal texts");
            })
    }
}
