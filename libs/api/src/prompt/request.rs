use std::str::FromStr;

use anyhow::Context;
use entity::prelude::*;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::response::{ApiResponse, IntoApiResponse};

/// Form fields of a prompt. Absent text fields count as empty.
#[derive(Deserialize, ToSchema)]
pub struct PromptRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub description: Option<String>,
    /// `Work`, `Personal` or `Art`; keeps the current category when absent
    pub category: Option<String>,
    /// `xAI`, `OpenAI`, `Gemini` or `Other`; `OpenAI` when absent
    pub ai_provider: Option<String>,
    /// Public URL of an uploaded image, kept for Art prompts only
    pub image_url: Option<String>,
}

impl PromptRequest {
    /// Copies the request into `form`.
    pub fn fill(self, form: &mut PromptForm) -> ApiResponse<()> {
        form.set_title(self.title).into_response("400-003")?;
        form.set_content(self.content).into_response("400-003")?;
        form.set_description(self.description)
            .into_response("400-003")?;

        if let Some(category) = self.category {
            let category = Category::from_str(&category)
                .with_context(|| category.clone())
                .into_response("400-001")?;
            form.set_category(category).into_response("400-003")?;
        }

        let ai_provider = match self.ai_provider {
            Some(ai_provider) => AiProvider::from_str(&ai_provider)
                .with_context(|| ai_provider.clone())
                .into_response("400-002")?,
            None => AiProvider::default(),
        };
        form.set_ai_provider(ai_provider).into_response("400-003")?;

        match self.image_url.filter(|url| !url.is_empty()) {
            Some(url) => form.attach_image(url),
            None => form.clear_image(),
        }
        .into_response("400-003")
    }
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DeletePromptParam {
    /// Must be `true`; nothing is deleted otherwise
    #[serde(default)]
    pub confirm: bool,
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ApiError;

    fn request(category: Option<&str>, image_url: Option<&str>) -> PromptRequest {
        PromptRequest {
            title: "Sunset".to_string(),
            content: "Paint a sunset".to_string(),
            description: None,
            category: category.map(ToString::to_string),
            ai_provider: Some("Gemini".to_string()),
            image_url: image_url.map(ToString::to_string),
        }
    }

    #[test]
    fn test_fill_create_form() {
        // Arrange
        let mut form = PromptForm::create();

        // Act
        request(Some("Art"), Some("https://cdn.test/a.png"))
            .fill(&mut form)
            .map_err(|_| "fill failed")
            .unwrap();
        let data = form.begin_submit().unwrap();

        // Assert
        assert_eq!(data.category, Category::Art);
        assert_eq!(data.ai_provider, AiProvider::Gemini);
        assert_eq!(data.image_url.as_deref(), Some("https://cdn.test/a.png"));
    }

    #[test]
    fn test_fill_keeps_category_when_absent() {
        // Arrange
        let mut form = PromptForm::create();

        // Act
        request(None, None)
            .fill(&mut form)
            .map_err(|_| "fill failed")
            .unwrap();

        // Assert
        assert_eq!(form.category(), Category::Work);
    }

    #[test]
    fn test_fill_unknown_provider() {
        // Arrange
        let mut form = PromptForm::create();
        let mut req = request(Some("Work"), None);
        req.ai_provider = Some("Claude".to_string());

        // Act
        let result = req.fill(&mut form);

        // Assert
        let Err(ApiError::ClientError(message)) = result else {
            panic!("expected a client error");
        };
        assert_eq!(message, "Unknown AI provider: Claude");
    }

    #[test]
    fn test_fill_unknown_category() {
        // Arrange
        let mut form = PromptForm::create();

        // Act
        let result = request(Some("Music"), None).fill(&mut form);

        // Assert
        let Err(ApiError::ClientError(message)) = result else {
            panic!("expected a client error");
        };
        assert_eq!(message, "Unknown category: Music");
    }
}
