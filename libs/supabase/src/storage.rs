use bytes::Bytes;
use reqwest::Method;

use crate::{Client, SupabaseError};

/// A Storage bucket.
#[derive(Clone, Debug)]
pub struct Bucket {
    client: Client,
    name: String,
}

impl Bucket {
    pub(crate) fn new(client: Client, name: &str) -> Self {
        Self {
            client,
            name: name.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Uploads `body` to `path`. An existing object at `path` is never
    /// overwritten; the call fails instead.
    pub async fn upload(
        &self,
        access_token: &str,
        path: &str,
        body: Bytes,
        content_type: &str,
    ) -> Result<(), SupabaseError> {
        let request = self
            .client
            .request(
                Method::POST,
                &format!("storage/v1/object/{}/{}", self.name, path),
                Some(access_token),
            )
            .header("Content-Type", content_type)
            .header("Cache-Control", "max-age=3600")
            .header("x-upsert", "false")
            .body(body);
        self.client
            .send(request, &format!("failed to upload {}", path))
            .await?;

        Ok(())
    }

    pub fn public_url(&self, path: &str) -> String {
        self.client
            .url(&format!("storage/v1/object/public/{}/{}", self.name, path))
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;
    use wiremock::{
        matchers::{header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    use super::*;

    #[test]
    fn test_public_url() {
        let bucket = Client::new("https://abc.supabase.co", "anon")
            .unwrap()
            .storage("prompt-images");

        assert_eq!(
            bucket.public_url("1714521600000-cat.png"),
            "https://abc.supabase.co/storage/v1/object/public/prompt-images/1714521600000-cat.png"
        );
    }

    #[tokio::test]
    async fn test_upload_without_overwrite() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/storage/v1/object/prompt-images/1-cat.png"))
            .and(header("x-upsert", "false"))
            .and(header("content-type", "image/png"))
            .and(header("authorization", "Bearer token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "Key": "prompt-images/1-cat.png"
            })))
            .expect(1)
            .mount(&server)
            .await;
        let bucket = Client::new(server.uri(), "anon")
            .unwrap()
            .storage("prompt-images");

        // Act
        let result = bucket
            .upload("token", "1-cat.png", Bytes::from_static(b"png"), "image/png")
            .await;

        // Assert
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_upload_conflict() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/storage/v1/object/prompt-images/1-cat.png"))
            .respond_with(ResponseTemplate::new(409).set_body_json(json!({
                "statusCode": "409",
                "error": "Duplicate",
                "message": "The resource already exists"
            })))
            .mount(&server)
            .await;
        let bucket = Client::new(server.uri(), "anon")
            .unwrap()
            .storage("prompt-images");

        let err = bucket
            .upload("token", "1-cat.png", Bytes::from_static(b"png"), "image/png")
            .await
            .unwrap_err();

        assert_eq!(err.message(), "The resource already exists");
    }
}
