pub mod export_backup;
pub mod import_backup;
