use std::path::Path;

use anyhow::Context;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::application::use_cases::catalog::seed_catalog::CatalogRecord;
use crate::domain::figures::figure::{FigureDraft, Model};

/// Parses catalog CSV content: a header line followed by
/// `id,name,model,price,release_date` rows. Some exported data files pad the
/// id column with trailing junk, so only its first 36 chars are read.
pub fn parse_catalog(content: &str) -> anyhow::Result<Vec<CatalogRecord>> {
    let mut records = Vec::new();
    for (idx, line) in content.lines().enumerate().skip(1) {
        if line.trim().is_empty() {
            continue;
        }
        let record = parse_line(line).with_context(|| format!("catalog line {}", idx + 1))?;
        records.push(record);
    }
    Ok(records)
}

pub fn load_catalog(path: &Path) -> anyhow::Result<Vec<CatalogRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading catalog file {}", path.display()))?;
    parse_catalog(&content)
}

fn parse_line(line: &str) -> anyhow::Result<CatalogRecord> {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() != 5 {
        anyhow::bail!("expected 5 fields, got {}", fields.len());
    }
    let id_field: String = fields[0].trim().chars().take(36).collect();
    let id = Uuid::parse_str(&id_field).context("id column")?;
    let model = fields[2].parse::<Model>()?;
    let price: f64 = fields[3].trim().parse().context("price column")?;
    let release_date =
        NaiveDate::parse_from_str(fields[4].trim(), "%Y-%m-%d").context("release date column")?;
    Ok(CatalogRecord {
        id,
        draft: FigureDraft {
            name: fields[1].trim().to_string(),
            model,
            price,
            release_date,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "id,name,model,price,release_date\n\
        3b6c6f58-7c6b-434b-82ab-01b2d6e4434a,Doctor Who Tardis,OTHER,26.99,2023-04-12\n\
        5e0a7c91-3d28-46f7-8a64-b97d5c1e2f44,One Piece Luffy,ANIME,11.95,2020-09-01\n";

    #[test]
    fn parses_rows_and_skips_the_header() {
        let records = parse_catalog(SAMPLE).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].draft.name, "Doctor Who Tardis");
        assert_eq!(records[0].draft.model, Model::Other);
        assert_eq!(records[1].draft.price, 11.95);
        assert_eq!(
            records[1].draft.release_date,
            NaiveDate::from_ymd_opt(2020, 9, 1).unwrap()
        );
    }

    #[test]
    fn id_column_is_truncated_to_uuid_length() {
        let padded = "id,name,model,price,release_date\n\
            3b6c6f58-7c6b-434b-82ab-01b2d6e4434aEXTRA,Tardis,OTHER,26.99,2023-04-12\n";
        let records = parse_catalog(padded).unwrap();
        assert_eq!(
            records[0].id,
            Uuid::parse_str("3b6c6f58-7c6b-434b-82ab-01b2d6e4434a").unwrap()
        );
    }

    #[test]
    fn header_only_content_is_empty() {
        assert!(parse_catalog("id,name,model,price,release_date\n")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn malformed_rows_report_their_line() {
        let broken = "id,name,model,price,release_date\n\
            3b6c6f58-7c6b-434b-82ab-01b2d6e4434a,Tardis,OTHER,not-a-price,2023-04-12\n";
        let err = parse_catalog(broken).unwrap_err();
        assert!(format!("{err:#}").contains("line 2"));
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let records = load_catalog(file.path()).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_catalog(Path::new("/nonexistent/catalog.csv")).is_err());
    }
}
