use sea_orm::ActiveValue::{Set, Unchanged};
use sea_orm::{ActiveModelTrait, ConnectionTrait, DbErr};
use solace_entity::user::{ActiveModel, Model};
use std::error::Error;
use uuid::Uuid;

pub struct Mutation;

impl Mutation {
    pub async fn create_user<C: ConnectionTrait>(
        conn: &C,
        username: String,
        email: String,
        password_hash: String,
    ) -> Result<Model, DbErr> {
        let new_user = ActiveModel {
            id: Set(Uuid::new_v4()),
            username: Set(username),
            email: Set(email),
            password_hash: Set(password_hash),
            profile_image: Set(None),
            profile_image_mime: Set(None),
            created_at: Set(chrono::Utc::now().fixed_offset()),
        };

        new_user.insert(conn).await.inspect_err(|error| {
            tracing::error!(error = error as &dyn Error, "failed to create user");
        })
    }

    pub async fn update_username<C: ConnectionTrait>(
        conn: &C,
        user_id: Uuid,
        username: String,
    ) -> Result<Model, DbErr> {
        let user = ActiveModel {
            id: Unchanged(user_id),
            username: Set(username),
            ..Default::default()
        };
        user.update(conn).await.inspect_err(|error| {
            tracing::error!(error = error as &dyn Error, "failed to update username");
        })
    }

    pub async fn update_profile_image<C: ConnectionTrait>(
        conn: &C,
        user_id: Uuid,
        image: Vec<u8>,
        mime_type: String,
    ) -> Result<Model, DbErr> {
        let user = ActiveModel {
            id: Unchanged(user_id),
            profile_image: Set(Some(image)),
            profile_image_mime: Set(Some(mime_type)),
            ..Default::default()
        };
        user.update(conn).await.inspect_err(|error| {
            tracing::error!(error = error as &dyn Error, "failed to update profile image");
        })
    }
}
