use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter};
use solace_entity::user::{Column, Entity as UserEntity, Model as User};
use uuid::Uuid;

pub struct Query;

impl Query {
    pub async fn find_user_by_id<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<Option<User>, DbErr> {
        UserEntity::find_by_id(id).one(conn).await.inspect_err(|error| {
            tracing::error!(error = error as &dyn std::error::Error, "error loading user");
        })
    }

    pub async fn find_user_by_email<C: ConnectionTrait>(conn: &C, email: &str) -> Result<Option<User>, DbErr> {
        UserEntity::find()
            .filter(Column::Email.eq(email))
            .one(conn)
            .await
            .inspect_err(|error| {
                tracing::error!(error = error as &dyn std::error::Error, "error loading user by email");
            })
    }

    pub async fn find_user_by_username<C: ConnectionTrait>(conn: &C, username: &str) -> Result<Option<User>, DbErr> {
        UserEntity::find()
            .filter(Column::Username.eq(username))
            .one(conn)
            .await
            .inspect_err(|error| {
                tracing::error!(error = error as &dyn std::error::Error, "error loading user by username");
            })
    }
}
