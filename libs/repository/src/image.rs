use std::fmt::Debug;

use async_trait::async_trait;
use bytes::Bytes;
use supabase::storage::Bucket;

use crate::{response::IntoResponse, Response};

#[async_trait]
pub trait ImageStore: Send + Sync + Debug {
    /// Stores `body` at `path`, failing if something is already there.
    async fn upload(
        &self,
        access_token: &str,
        path: &str,
        body: Bytes,
        content_type: &str,
    ) -> Response<()>;

    fn public_url(&self, path: &str) -> String;
}

#[derive(Clone, Debug)]
pub struct ImageRepository {
    bucket: Bucket,
}

impl ImageRepository {
    pub fn new(bucket: Bucket) -> Self {
        Self { bucket }
    }
}

#[async_trait]
impl ImageStore for ImageRepository {
    async fn upload(
        &self,
        access_token: &str,
        path: &str,
        body: Bytes,
        content_type: &str,
    ) -> Response<()> {
        self.bucket
            .upload(access_token, path, body, content_type)
            .await
            .into_response("in upload image")
    }

    fn public_url(&self, path: &str) -> String {
        self.bucket.public_url(path)
    }
}
