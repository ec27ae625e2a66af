//! One pretty-printed JSON document per plan, named `<uuid>.json`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use super::{parse_id, PlanRecord, PlanStore};
use crate::error::StoreError;

pub struct FilePlanStore {
    dir: PathBuf,
}

impl FilePlanStore {
    /// The directory is created on first save
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: Uuid) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }
}

#[async_trait]
impl PlanStore for FilePlanStore {
    async fn save(&self, record: &PlanRecord) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let json = serde_json::to_string_pretty(record)?;

        // Write then rename so readers never see a partial document
        let path = self.path_for(record.id);
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &path).await?;

        debug!(id = %record.id, path = %path.display(), "Plan record saved");
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<PlanRecord>, StoreError> {
        let path = self.path_for(parse_id(id)?);
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
