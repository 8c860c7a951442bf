use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use entity::prelude::*;
use parking_lot::Mutex;
use repository::{prompt::PromptStore, RepositoryError, Response};

#[derive(Debug, Default)]
struct State {
    rows: Vec<PromptEntity>,
    calls: Vec<String>,
    access_tokens: Vec<String>,
    fail_next: Option<String>,
}

/// Prompt table kept in a vector. Every call is recorded by name, along with
/// the access token it carried.
#[derive(Debug, Default)]
pub struct MemoryPromptStore {
    state: Mutex<State>,
}

impl MemoryPromptStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(self, rows: Vec<PromptEntity>) -> Self {
        self.state.lock().rows = rows;
        self
    }

    pub fn rows(&self) -> Vec<PromptEntity> {
        self.state.lock().rows.clone()
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().calls.clone()
    }

    /// The access token passed with each call, in call order.
    pub fn access_tokens(&self) -> Vec<String> {
        self.state.lock().access_tokens.clone()
    }

    /// The next call fails with `message`.
    pub fn fail_next(&self, message: &str) {
        self.state.lock().fail_next = Some(message.to_string());
    }

    fn begin(state: &mut State, call: &str, access_token: &str) -> Response<()> {
        state.calls.push(call.to_string());
        state.access_tokens.push(access_token.to_string());
        match state.fail_next.take() {
            Some(message) => Err(RepositoryError::Rejected { message }),
            None => Ok(()),
        }
    }

    /// Strictly increasing, so ordering by creation time is stable.
    fn next_timestamp(state: &State) -> DateTime<Utc> {
        let now = Utc::now();
        match state.rows.iter().map(|p| p.created_at).max() {
            Some(latest) if latest >= now => latest + Duration::milliseconds(1),
            _ => now,
        }
    }
}

#[async_trait]
impl PromptStore for MemoryPromptStore {
    async fn find_by_user(
        &self,
        access_token: &str,
        user_id: &str,
    ) -> Response<Vec<PromptEntity>> {
        let mut state = self.state.lock();
        Self::begin(&mut state, "find_by_user", access_token)?;

        let mut prompts: Vec<PromptEntity> = state
            .rows
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        prompts.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(prompts)
    }

    async fn insert(
        &self,
        access_token: &str,
        user_id: &str,
        data: PromptFormData,
    ) -> Response<PromptEntity> {
        let mut state = self.state.lock();
        Self::begin(&mut state, "insert", access_token)?;

        let now = Self::next_timestamp(&state);
        let mut prompt = PromptEntity {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            created_at: now,
            ..Default::default()
        };
        prompt.apply(data, now);
        state.rows.push(prompt.clone());

        Ok(prompt)
    }

    async fn update(
        &self,
        access_token: &str,
        id: &str,
        data: PromptFormData,
    ) -> Response<()> {
        let mut state = self.state.lock();
        Self::begin(&mut state, "update", access_token)?;

        let now = Utc::now();
        let Some(prompt) = state.rows.iter_mut().find(|p| p.id == id) else {
            return Err(RepositoryError::Rejected {
                message: format!("prompt {} was not found", id),
            });
        };
        prompt.apply(data, now);

        Ok(())
    }

    async fn delete(&self, access_token: &str, id: &str) -> Response<()> {
        let mut state = self.state.lock();
        Self::begin(&mut state, "delete", access_token)?;

        state.rows.retain(|p| p.id != id);

        Ok(())
    }
}
