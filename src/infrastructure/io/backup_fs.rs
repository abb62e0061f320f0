use std::path::PathBuf;

use anyhow::Context;
use async_trait::async_trait;

use crate::application::ports::backup_store::BackupStore;
use crate::domain::figures::figure::Figure;

/// Filesystem snapshots: pretty-printed JSON files inside a pre-existing
/// backup directory. The directory is never created implicitly; pointing the
/// service at a missing directory is a configuration mistake to surface, not
/// to paper over.
pub struct FsBackupStore {
    root: PathBuf,
}

impl FsBackupStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, file_name: &str) -> anyhow::Result<PathBuf> {
        if file_name.is_empty()
            || file_name.contains(['/', '\\'])
            || file_name == "."
            || file_name == ".."
        {
            anyhow::bail!("invalid backup file name: {file_name}");
        }
        if !self.root.is_dir() {
            anyhow::bail!("backup directory {} does not exist", self.root.display());
        }
        Ok(self.root.join(file_name))
    }
}

#[async_trait]
impl BackupStore for FsBackupStore {
    async fn export(&self, file_name: &str, figures: &[Figure]) -> anyhow::Result<()> {
        let dest = self.resolve(file_name)?;
        let json = serde_json::to_vec_pretty(figures)?;
        tokio::fs::write(&dest, json)
            .await
            .with_context(|| format!("writing backup {}", dest.display()))?;
        Ok(())
    }

    async fn import(&self, file_name: &str) -> anyhow::Result<Vec<Figure>> {
        let src = self.resolve(file_name)?;
        let json = tokio::fs::read_to_string(&src)
            .await
            .with_context(|| format!("reading backup {}", src.display()))?;
        let figures = serde_json::from_str(&json)?;
        Ok(figures)
    }
}
