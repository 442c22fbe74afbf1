use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, ConnectionTrait, DbErr};
use solace_entity::journal::journal_media::{ActiveModel, MediaKind, Model as JournalMediaModel};
use uuid::Uuid;

pub struct Mutation;

#[derive(Debug)]
pub struct NewMedia {
    pub kind: MediaKind,
    pub position: i32,
    pub filename: Option<String>,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl Mutation {
    pub async fn create_media<C: ConnectionTrait>(
        conn: &C,
        journal_entry_id: Uuid,
        media: NewMedia,
    ) -> Result<JournalMediaModel, DbErr> {
        let model = ActiveModel {
            id: Set(Uuid::new_v4()),
            journal_entry_id: Set(journal_entry_id),
            kind: Set(media.kind),
            position: Set(media.position),
            filename: Set(media.filename),
            mime_type: Set(media.mime_type),
            bytes: Set(media.bytes),
            created_at: Set(chrono::Utc::now().fixed_offset()),
        };
        model.insert(conn).await
    }
}
