use std::fmt::Debug;

use async_trait::async_trait;
use entity::prelude::*;
use serde::Serialize;
use supabase::table::{Order, Table};

use crate::{response::IntoResponse, RepositoryError, Response};

#[async_trait]
pub trait PromptStore: Send + Sync + Debug {
    /// Every prompt owned by `user_id`, newest first.
    async fn find_by_user(
        &self,
        access_token: &str,
        user_id: &str,
    ) -> Response<Vec<PromptEntity>>;

    async fn insert(
        &self,
        access_token: &str,
        user_id: &str,
        data: PromptFormData,
    ) -> Response<PromptEntity>;

    async fn update(
        &self,
        access_token: &str,
        id: &str,
        data: PromptFormData,
    ) -> Response<()>;

    async fn delete(&self, access_token: &str, id: &str) -> Response<()>;
}

#[derive(Clone, Debug)]
pub struct PromptRepository {
    table: Table,
}

impl PromptRepository {
    pub fn new(table: Table) -> Self {
        Self { table }
    }
}

#[derive(Serialize)]
struct NewPrompt<'a> {
    #[serde(flatten)]
    data: &'a PromptFormData,
    user_id: &'a str,
}

#[async_trait]
impl PromptStore for PromptRepository {
    async fn find_by_user(
        &self,
        access_token: &str,
        user_id: &str,
    ) -> Response<Vec<PromptEntity>> {
        self.table
            .select_eq(
                access_token,
                "user_id",
                user_id,
                Some(Order {
                    column: "created_at",
                    ascending: false,
                }),
            )
            .await
            .into_response("in find prompts by user")
    }

    async fn insert(
        &self,
        access_token: &str,
        user_id: &str,
        data: PromptFormData,
    ) -> Response<PromptEntity> {
        self.table
            .insert(
                access_token,
                &NewPrompt {
                    data: &data,
                    user_id,
                },
            )
            .await
            .into_response("in insert prompt")
    }

    async fn update(
        &self,
        access_token: &str,
        id: &str,
        data: PromptFormData,
    ) -> Response<()> {
        let rows: Vec<PromptEntity> = self
            .table
            .update_eq(access_token, "id", id, &data)
            .await
            .into_response("in update prompt")?;

        if rows.is_empty() {
            return Err(RepositoryError::Rejected {
                message: format!("prompt {} was not found", id),
            });
        }

        Ok(())
    }

    async fn delete(&self, access_token: &str, id: &str) -> Response<()> {
        self.table
            .delete_eq(access_token, "id", id)
            .await
            .into_response("in delete prompt")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_new_prompt_row() {
        // Arrange
        let data = PromptFormData {
            title: "Daily standup".to_string(),
            content: "Summarize...".to_string(),
            ..Default::default()
        };

        // Act
        let row = serde_json::to_value(NewPrompt {
            data: &data,
            user_id: "u-1",
        })
        .unwrap();

        // Assert
        assert_eq!(
            row,
            serde_json::json!({
                "title": "Daily standup",
                "content": "Summarize...",
                "description": null,
                "category": "Work",
                "ai_provider": "OpenAI",
                "image_url": null,
                "user_id": "u-1",
            })
        );
    }
}
