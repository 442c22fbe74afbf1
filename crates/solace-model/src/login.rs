use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::user::User;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Token {
    pub access_token: String,
    pub user: User,
}
