use crate::models::Property;
use crate::repository::traits::PropertyRepository;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Catalog stored as a pretty-printed JSON array on disk
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "catalog.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl PropertyRepository for JsonFileRepository {
    async fn load(&self) -> Result<Vec<Property>> {
        let json = match tokio::fs::read_to_string(&self.path).await {
            Ok(json) => json,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!("No catalog at {}, starting empty", self.path.display());
                return Ok(Vec::new());
            }
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("Failed to read {}", self.path.display()))
            }
        };

        let records: Vec<Property> = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse {}", self.path.display()))?;
        debug!("Loaded {} properties from {}", records.len(), self.path.display());
        Ok(records)
    }

    async fn save(&self, records: &[Property]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(records)?;

        // Write then rename so readers never see a half-written file
        let temp = self.temp_path();
        tokio::fs::write(&temp, json)
            .await
            .with_context(|| format!("Failed to write {}", temp.display()))?;
        tokio::fs::rename(&temp, &self.path)
            .await
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;

        debug!("Saved {} properties to {}", records.len(), self.path.display());
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "json-file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures::listing;

    #[tokio::test]
    async fn missing_file_loads_as_empty_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path().join("none.json"));
        assert!(repo.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn saved_records_load_back_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path().join("nested/catalog.json"));
        let records = vec![listing("b", 2, "Kisumu"), listing("a", 1, "Nairobi")];

        repo.save(&records).await.unwrap();
        assert_eq!(repo.load().await.unwrap(), records);
        assert!(!repo.temp_path().exists());
    }

    #[tokio::test]
    async fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        tokio::fs::write(&path, "{ not json").await.unwrap();

        let err = JsonFileRepository::new(&path).load().await.unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn records_use_camel_case_keys() {
        let json = serde_json::to_value(listing("a", 1, "Nairobi")).unwrap();
        assert!(json.get("providerId").is_some());
        assert!(json.get("createdAt").is_some());
        assert_eq!(json["type"], "apartment");
        assert_eq!(json["features"]["areaUnit"], "sqm");
    }
}
