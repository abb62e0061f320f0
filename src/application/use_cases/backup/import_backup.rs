use crate::application::ports::backup_store::BackupStore;
use crate::domain::figures::figure::Figure;

pub struct ImportBackup<'a, S: BackupStore + ?Sized> {
    pub store: &'a S,
}

impl<'a, S: BackupStore + ?Sized> ImportBackup<'a, S> {
    /// Reads a snapshot back. The figures are returned to the caller, not
    /// written to the database; re-ingest goes through the seeding path.
    pub async fn execute(&self, file_name: &str) -> anyhow::Result<Vec<Figure>> {
        self.store.import(file_name).await
    }
}
