use sea_orm::entity::prelude::*;

/// Whether the AI analyzers have run for this entry. Entries are written
/// once with `Pending` and updated exactly once to `Analyzed`, even when
/// some analyzers failed (partial attachment is allowed).
#[derive(Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Clone, Copy)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum AnalysisState {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "analyzed")]
    Analyzed,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "journal_entry")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub text_body: String,
    pub analysis_state: AnalysisState,
    pub text_mood: Option<String>,
    pub text_anxiety: Option<f32>,
    pub audio_transcription: Option<String>,
    pub audio_mood: Option<String>,
    pub audio_anxiety: Option<f32>,
    pub vision_objects: Option<Json>,
    pub vision_impact: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::user::Entity",
        from = "Column::UserId",
        to = "crate::user::Column::Id"
    )]
    User,
    #[sea_orm(has_many = "super::journal_media::Entity")]
    JournalMedia,
}

impl Related<crate::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::journal_media::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JournalMedia.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
