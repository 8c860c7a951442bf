use entity::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct PromptResp {
    pub id: String,
    pub title: String,
    pub content: String,
    pub description: Option<String>,
    pub category: String,
    pub ai_provider: String,
    pub image_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<PromptEntity> for PromptResp {
    fn from(prompt: PromptEntity) -> Self {
        Self {
            id: prompt.id,
            title: prompt.title,
            content: prompt.content,
            description: prompt.description,
            category: prompt.category.to_string(),
            ai_provider: prompt.ai_provider.to_string(),
            image_url: prompt.image_url,
            created_at: prompt.created_at.to_rfc3339(),
            updated_at: prompt.updated_at.to_rfc3339(),
        }
    }
}

/// The user's prompts after a change, newest first.
#[derive(Serialize, ToSchema)]
pub struct PromptsResponse {
    pub prompts: Vec<PromptResp>,
}

impl From<Vec<PromptEntity>> for PromptsResponse {
    fn from(prompts: Vec<PromptEntity>) -> Self {
        Self {
            prompts: prompts.into_iter().map(PromptResp::from).collect(),
        }
    }
}
