use crate::journal::journal_media::mutation::{Mutation as MediaMutation, NewMedia};
use crate::util::FlattenTransactionResultExt;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, NotSet, QueryFilter, TransactionTrait,
};
use solace_entity::journal::journal_entry::{self, AnalysisState, Model as JournalEntryModel};
use solace_entity::journal::journal_media::Model as JournalMediaModel;
use std::error::Error;
use uuid::Uuid;

pub struct Mutation;

/// Analyzer output to attach to a stored entry. Fields left as `None`
/// stay empty; the entry still flips to `Analyzed`.
#[derive(Debug, Default)]
pub struct AnalysisUpdate {
    pub text_mood: Option<String>,
    pub text_anxiety: Option<f32>,
    pub audio_transcription: Option<String>,
    pub audio_mood: Option<String>,
    pub audio_anxiety: Option<f32>,
    pub vision_objects: Option<serde_json::Value>,
    pub vision_impact: Option<String>,
}

impl Mutation {
    /// First phase of entry creation: persists the raw entry and its
    /// attachments before any analyzer runs.
    pub async fn create_journal_entry(
        db: &DatabaseConnection,
        user_id: Uuid,
        text: String,
        media: Vec<NewMedia>,
    ) -> Result<(JournalEntryModel, Vec<JournalMediaModel>), DbErr> {
        db.transaction::<_, (JournalEntryModel, Vec<JournalMediaModel>), DbErr>(|txn| {
            Box::pin(async move {
                let now = chrono::Utc::now().fixed_offset();
                let entry = journal_entry::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    user_id: Set(user_id),
                    text_body: Set(text),
                    analysis_state: Set(AnalysisState::Pending),
                    text_mood: Set(None),
                    text_anxiety: Set(None),
                    audio_transcription: Set(None),
                    audio_mood: Set(None),
                    audio_anxiety: Set(None),
                    vision_objects: Set(None),
                    vision_impact: Set(None),
                    created_at: Set(now),
                    updated_at: Set(now),
                };
                let entry = entry.insert(txn).await?;

                let mut stored = Vec::with_capacity(media.len());
                for item in media {
                    stored.push(MediaMutation::create_media(txn, entry.id, item).await?);
                }

                Ok((entry, stored))
            })
        })
        .await
        .flatten_res()
        .inspect_err(|error| {
            tracing::error!(error = error as &dyn Error, "failed to create journal entry");
        })
    }

    /// Second phase: writes analyzer results and marks the entry analyzed.
    pub async fn attach_analysis(
        db: &DatabaseConnection,
        journal_entry_id: Uuid,
        update: AnalysisUpdate,
    ) -> Result<(), DbErr> {
        let entry = journal_entry::ActiveModel {
            id: NotSet,
            user_id: NotSet,
            text_body: NotSet,
            analysis_state: Set(AnalysisState::Analyzed),
            text_mood: Set(update.text_mood),
            text_anxiety: Set(update.text_anxiety),
            audio_transcription: Set(update.audio_transcription),
            audio_mood: Set(update.audio_mood),
            audio_anxiety: Set(update.audio_anxiety),
            vision_objects: Set(update.vision_objects),
            vision_impact: Set(update.vision_impact),
            created_at: NotSet,
            updated_at: Set(chrono::Utc::now().fixed_offset()),
        };

        let res = journal_entry::Entity::update_many()
            .set(entry)
            .filter(journal_entry::Column::Id.eq(journal_entry_id))
            .exec(db)
            .await
            .inspect_err(|error| {
                tracing::error!(error = error as &dyn Error, "failed to attach journal analysis");
            })?;
        if res.rows_affected == 0 {
            return Err(DbErr::RecordNotFound("Journal entry not found".to_string()));
        }
        Ok(())
    }
}
