use std::collections::HashMap;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use repository::{image::ImageStore, RepositoryError, Response};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub body: Bytes,
    pub content_type: String,
}

/// Bucket kept in a map. Uploading to an existing path fails.
#[derive(Debug)]
pub struct MemoryImageStore {
    base_url: String,
    objects: Mutex<HashMap<String, StoredObject>>,
}

impl Default for MemoryImageStore {
    fn default() -> Self {
        Self::new("https://storage.test/prompt-images")
    }
}

impl MemoryImageStore {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            objects: Mutex::new(HashMap::new()),
        }
    }

    pub fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> =
            self.objects.lock().keys().cloned().collect();
        paths.sort();
        paths
    }

    pub fn object(&self, path: &str) -> Option<StoredObject> {
        self.objects.lock().get(path).cloned()
    }
}

#[async_trait]
impl ImageStore for MemoryImageStore {
    async fn upload(
        &self,
        _access_token: &str,
        path: &str,
        body: Bytes,
        content_type: &str,
    ) -> Response<()> {
        let mut objects = self.objects.lock();
        if objects.contains_key(path) {
            return Err(RepositoryError::Rejected {
                message: "The resource already exists".to_string(),
            });
        }
        objects.insert(
            path.to_string(),
            StoredObject {
                body,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}
