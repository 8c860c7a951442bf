use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, PartialEq, Clone, Serialize, Deserialize)]
pub struct Prompt {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category: Category,
    #[serde(default)]
    pub ai_provider: AiProvider,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Prompt {
    /// Editable fields of this record.
    pub fn form_data(&self) -> PromptFormData {
        PromptFormData {
            title: self.title.clone(),
            content: self.content.clone(),
            description: self.description.clone(),
            category: self.category,
            ai_provider: self.ai_provider,
            image_url: self.image_url.clone(),
        }
    }

    /// Overwrites the editable fields. `id`, `user_id` and `created_at` are
    /// left as they are.
    pub fn apply(&mut self, data: PromptFormData, updated_at: DateTime<Utc>) {
        self.title = data.title;
        self.content = data.content;
        self.description = data.description;
        self.category = data.category;
        self.ai_provider = data.ai_provider;
        self.image_url = data.image_url;
        self.updated_at = updated_at;
    }
}

/// A record without the fields the backend owns.
#[derive(Debug, Default, PartialEq, Clone, Serialize, Deserialize)]
pub struct PromptFormData {
    pub title: String,
    pub content: String,
    pub description: Option<String>,
    pub category: Category,
    pub ai_provider: AiProvider,
    pub image_url: Option<String>,
}

#[derive(
    Debug,
    Default,
    PartialEq,
    Eq,
    Clone,
    Copy,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
pub enum Category {
    #[default]
    Work,
    Personal,
    Art,
}

impl Category {
    /// Only Art prompts keep an image.
    pub fn allows_image(&self) -> bool {
        matches!(self, Category::Art)
    }
}

#[derive(
    Debug,
    Default,
    PartialEq,
    Eq,
    Clone,
    Copy,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
pub enum AiProvider {
    #[serde(rename = "xAI")]
    #[strum(serialize = "xAI")]
    XAi,
    #[default]
    #[serde(rename = "OpenAI")]
    #[strum(serialize = "OpenAI")]
    OpenAi,
    Gemini,
    Other,
}
