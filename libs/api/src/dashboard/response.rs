use entity::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;

use crate::prompt::response::PromptResp;

#[derive(Serialize, ToSchema)]
pub struct UserResp {
    pub id: String,
    pub email: String,
}

impl From<UserEntity> for UserResp {
    fn from(user: UserEntity) -> Self {
        Self {
            id: user.id,
            email: user.email,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct GetDashboardResponse {
    pub user: UserResp,
    /// Selectable categories, `All` first
    pub categories: Vec<String>,
    pub selected_category: String,
    pub search_query: String,
    pub prompts: Vec<PromptResp>,
    pub total: usize,
    pub is_empty: bool,
}
