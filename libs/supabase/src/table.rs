use reqwest::{Method, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};

use crate::{response::IntoResponse, Client, SupabaseError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Order<'a> {
    pub column: &'a str,
    pub ascending: bool,
}

impl Order<'_> {
    fn to_param(self) -> String {
        let direction = if self.ascending { "asc" } else { "desc" };
        format!("{}.{}", self.column, direction)
    }
}

/// A PostgREST table.
#[derive(Clone, Debug)]
pub struct Table {
    client: Client,
    name: String,
}

impl Table {
    pub(crate) fn new(client: Client, name: &str) -> Self {
        Self {
            client,
            name: name.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rows whose `column` equals `value`.
    pub async fn select_eq<T: DeserializeOwned>(
        &self,
        access_token: &str,
        column: &str,
        value: &str,
        order: Option<Order<'_>>,
    ) -> Result<Vec<T>, SupabaseError> {
        let mut query = vec![
            ("select".to_string(), "*".to_string()),
            (column.to_string(), format!("eq.{}", value)),
        ];
        if let Some(order) = order {
            query.push(("order".to_string(), order.to_param()));
        }

        let request = self.request(Method::GET, access_token).query(&query);
        let text = self
            .client
            .send(request, &format!("failed to select from {}", self.name))
            .await?;

        serde_json::from_str(&text)
            .into_response(&format!("failed to parse rows of {}", self.name))
    }

    /// Inserts one row and returns it as stored.
    pub async fn insert<B, T>(
        &self,
        access_token: &str,
        row: &B,
    ) -> Result<T, SupabaseError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self
            .request(Method::POST, access_token)
            .header("Prefer", "return=representation")
            .json(&[row]);
        let text = self
            .client
            .send(request, &format!("failed to insert into {}", self.name))
            .await?;

        let rows = serde_json::from_str::<Vec<T>>(&text)
            .into_response(&format!("failed to parse rows of {}", self.name))?;

        rows.into_iter()
            .next()
            .into_response(&format!("no row returned from {}", self.name))
    }

    /// Applies `patch` to the rows whose `column` equals `value` and returns
    /// them as stored.
    pub async fn update_eq<B, T>(
        &self,
        access_token: &str,
        column: &str,
        value: &str,
        patch: &B,
    ) -> Result<Vec<T>, SupabaseError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self
            .request(Method::PATCH, access_token)
            .query(&[(column, format!("eq.{}", value))])
            .header("Prefer", "return=representation")
            .json(patch);
        let text = self
            .client
            .send(request, &format!("failed to update {}", self.name))
            .await?;

        serde_json::from_str(&text)
            .into_response(&format!("failed to parse rows of {}", self.name))
    }

    pub async fn delete_eq(
        &self,
        access_token: &str,
        column: &str,
        value: &str,
    ) -> Result<(), SupabaseError> {
        let request = self
            .request(Method::DELETE, access_token)
            .query(&[(column, format!("eq.{}", value))]);
        self.client
            .send(request, &format!("failed to delete from {}", self.name))
            .await?;

        Ok(())
    }

    fn request(&self, method: Method, access_token: &str) -> RequestBuilder {
        self.client.request(
            method,
            &format!("rest/v1/{}", self.name),
            Some(access_token),
        )
    }
}
