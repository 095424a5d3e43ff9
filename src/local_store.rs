//! Durable key/value persistence for display-session artifacts.
//!
//! Two fixed keys are written wholesale with no schema versioning: the
//! last resolved caption and the last generated summary notes.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use async_trait::async_trait;
use tokio::fs;

/// Key holding the last resolved transcript caption.
pub const CAPTION_KEY: &str = "segment_transcript";

/// Key holding the last array of generated summary notes.
pub const SUMMARY_NOTES_KEY: &str = "summary_notes";

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn put_json(&self, key: &str, value: &serde_json::Value) -> anyhow::Result<()>;
    async fn get_json(&self, key: &str) -> anyhow::Result<Option<serde_json::Value>>;
}

pub async fn put<T: serde::Serialize + Sync>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> anyhow::Result<()> {
    let value = serde_json::to_value(value).context("serialize value")?;
    store.put_json(key, &value).await
}

pub async fn get<T: serde::de::DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> anyhow::Result<Option<T>> {
    let Some(value) = store.get_json(key).await? else {
        return Ok(None);
    };
    let value = serde_json::from_value(value).context("parse stored value")?;
    Ok(Some(value))
}

/// One JSON file per key under a base directory, written atomically.
#[derive(Debug, Clone)]
pub struct LocalFsStore {
    base_dir: PathBuf,
}

impl LocalFsStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{key}.json"))
    }
}

#[async_trait]
impl KeyValueStore for LocalFsStore {
    async fn put_json(&self, key: &str, value: &serde_json::Value) -> anyhow::Result<()> {
        write_json_atomic(&self.key_path(key), value).await
    }

    async fn get_json(&self, key: &str) -> anyhow::Result<Option<serde_json::Value>> {
        let path = self.key_path(key);
        read_json(&path)
            .await
            .with_context(|| format!("read: {}", path.display()))
    }
}

async fn read_json(path: &Path) -> anyhow::Result<Option<serde_json::Value>> {
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    let value = serde_json::from_slice(&bytes).context("parse json")?;
    Ok(Some(value))
}

async fn write_json_atomic(path: &Path, value: &serde_json::Value) -> anyhow::Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| anyhow::anyhow!("path has no parent: {}", path.display()))?;
    fs::create_dir_all(parent)
        .await
        .with_context(|| format!("create parent dir: {}", parent.display()))?;

    let tmp_path = path.with_extension(format!("tmp.{}", uuid::Uuid::new_v4().simple()));
    let data = serde_json::to_vec_pretty(value).context("serialize json")?;
    fs::write(&tmp_path, &data)
        .await
        .with_context(|| format!("write tmp: {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path)
        .await
        .with_context(|| format!("rename tmp to final: {}", path.display()))?;
    Ok(())
}
