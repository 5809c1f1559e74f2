//! File storage behind uploads.
//!
//! Photos only keep a storage key and URL; the bytes live in a
//! [`FileStorage`] so the backend can be swapped without touching the
//! album store.

use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

/// Metadata returned for a stored file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub key: String,
    pub url: String,
    pub name: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub mime_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub mime_type: String,
    pub data: Vec<u8>,
}

pub trait FileStorage: Send + Sync {
    fn name(&self) -> &str;

    fn upload(&self, filename: &str, mime_type: &str, data: Vec<u8>) -> UploadedFile;

    fn get(&self, key: &str) -> Option<StoredFile>;

    /// Returns false if the key was unknown.
    fn delete(&self, key: &str) -> bool;
}

/// Keeps file bytes in memory and serves them through the plugin API.
#[derive(Debug, Default)]
pub struct MemoryFileStorage {
    files: RwLock<HashMap<String, StoredFile>>,
}

impl MemoryFileStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn url_for(key: &str) -> String {
        format!("/api/p/photos/file/{key}")
    }
}

impl FileStorage for MemoryFileStorage {
    fn name(&self) -> &str {
        "memory"
    }

    fn upload(&self, filename: &str, mime_type: &str, data: Vec<u8>) -> UploadedFile {
        let safe_name: String = filename
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' { c } else { '_' })
            .collect();
        let key = format!("{}-{safe_name}", Uuid::new_v4());
        let size = data.len() as u64;

        self.files.write().insert(
            key.clone(),
            StoredFile {
                mime_type: mime_type.to_string(),
                data,
            },
        );

        UploadedFile {
            url: Self::url_for(&key),
            key,
            name: filename.to_string(),
            size,
            mime_type: mime_type.to_string(),
        }
    }

    fn get(&self, key: &str) -> Option<StoredFile> {
        self.files.read().get(key).cloned()
    }

    fn delete(&self, key: &str) -> bool {
        self.files.write().remove(key).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_get_delete() {
        let storage = MemoryFileStorage::new();
        let file = storage.upload("stage shot (1).jpg", "image/jpeg", vec![1, 2, 3]);

        assert!(file.key.ends_with("-stage_shot__1_.jpg"));
        assert_eq!(file.url, format!("/api/p/photos/file/{}", file.key));
        assert_eq!(file.size, 3);
        assert_eq!(storage.get(&file.key).unwrap().data, vec![1, 2, 3]);

        assert!(storage.delete(&file.key));
        assert!(!storage.delete(&file.key));
        assert!(storage.get(&file.key).is_none());
    }
}
