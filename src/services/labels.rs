use crate::error::{ClientError, Result};
use crate::storage::StorageError;
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::sync::OnceCell;

pub const IMAGENET_CLASSES_FILE: &str = "imagenet_classes.json";

#[derive(Debug, Clone)]
pub enum LabelSource {
    File(PathBuf),
    Remote(String),
}

/// ImageNet index → label table, loaded on first use and kept for the process lifetime.
///
/// A failed load is not cached, so the next lookup tries again.
#[derive(Debug)]
pub struct ImageNetLabels {
    source: LabelSource,
    http: reqwest::Client,
    labels: OnceCell<HashMap<u32, String>>,
}

impl ImageNetLabels {
    #[must_use]
    pub fn new(source: LabelSource, http: reqwest::Client) -> Self {
        Self { source, http, labels: OnceCell::new() }
    }

    /// Source for a console talking to `base_url`, unless a local file is configured.
    #[must_use]
    pub fn source_for(local: Option<PathBuf>, base_url: &str) -> LabelSource {
        local.map_or_else(
            || LabelSource::Remote(format!("{}/{IMAGENET_CLASSES_FILE}", base_url.trim_end_matches('/'))),
            LabelSource::File,
        )
    }

    /// Loads the table if needed. Returns `false` if it is unavailable.
    pub async fn ensure_loaded(&self) -> bool {
        match self.labels.get_or_try_init(|| self.fetch()).await {
            Ok(labels) => !labels.is_empty(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load ImageNet class labels");
                false
            }
        }
    }

    /// Label for `index`, or `imagenet_class_<index>` if the table is not loaded or lacks it.
    #[must_use]
    pub fn class_name(&self, index: u32) -> String {
        self.labels
            .get()
            .and_then(|labels| labels.get(&index).cloned())
            .unwrap_or_else(|| format!("imagenet_class_{index}"))
    }

    async fn fetch(&self) -> Result<HashMap<u32, String>> {
        let bytes = match &self.source {
            LabelSource::File(path) => tokio::fs::read(path).await.map_err(StorageError::Io)?,
            LabelSource::Remote(url) => {
                let response = self.http.get(url).send().await?.error_for_status()?;
                response.bytes().await?.to_vec()
            }
        };
        let labels = parse_labels(&serde_json::from_slice(&bytes)?)?;
        tracing::debug!(count = labels.len(), "ImageNet class labels loaded");
        Ok(labels)
    }
}

/// Accepts either `{"0": "tench", ...}` or `["tench", ...]`.
fn parse_labels(value: &serde_json::Value) -> Result<HashMap<u32, String>> {
    match value {
        serde_json::Value::Object(map) => Ok(map
            .iter()
            .filter_map(|(k, v)| Some((k.parse::<u32>().ok()?, v.as_str()?.to_string())))
            .collect()),
        serde_json::Value::Array(items) => Ok(items
            .iter()
            .enumerate()
            .filter_map(|(i, v)| Some((u32::try_from(i).ok()?, v.as_str()?.to_string())))
            .collect()),
        _ => Err(ClientError::Rejected("ImageNet class table must be an object or an array".to_string())),
    }
}
