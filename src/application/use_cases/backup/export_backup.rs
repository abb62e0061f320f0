use crate::application::ports::backup_store::BackupStore;
use crate::application::ports::figure_repository::FigureRepository;

pub struct ExportBackup<'a, R, S>
where
    R: FigureRepository + ?Sized,
    S: BackupStore + ?Sized,
{
    pub repo: &'a R,
    pub store: &'a S,
}

impl<'a, R, S> ExportBackup<'a, R, S>
where
    R: FigureRepository + ?Sized,
    S: BackupStore + ?Sized,
{
    /// Snapshots the whole catalog into the backup store. Returns how many
    /// figures the snapshot holds.
    pub async fn execute(&self, file_name: &str) -> anyhow::Result<usize> {
        let figures = self.repo.list_all().await?;
        self.store.export(file_name, &figures).await?;
        Ok(figures.len())
    }
}
