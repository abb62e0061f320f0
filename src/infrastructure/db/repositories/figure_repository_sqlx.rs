use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;
use uuid::Uuid;

use crate::application::ports::figure_repository::FigureRepository;
use crate::domain::figures::figure::{Figure, Model};
use crate::infrastructure::db::DbPool;

pub struct SqlxFigureRepository {
    pub pool: DbPool,
}

impl SqlxFigureRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn figure_from_row(row: &SqliteRow) -> anyhow::Result<Figure> {
    let id: String = row.get("id");
    let model: String = row.get("model");
    Ok(Figure {
        id: Uuid::parse_str(&id)?,
        serial: row.get("serial"),
        name: row.get("name"),
        model: model.parse::<Model>()?,
        price: row.get("price"),
        release_date: row.get::<NaiveDate, _>("release_date"),
        created_at: row.get::<DateTime<Utc>, _>("created_at"),
        updated_at: row.get::<DateTime<Utc>, _>("updated_at"),
    })
}

const SELECT_COLUMNS: &str =
    "id, serial, name, model, price, release_date, created_at, updated_at";

#[async_trait]
impl FigureRepository for SqlxFigureRepository {
    async fn list_all(&self) -> anyhow::Result<Vec<Figure>> {
        let rows = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM figures ORDER BY serial"
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(figure_from_row).collect()
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Figure>> {
        let row = sqlx::query(&format!("SELECT {SELECT_COLUMNS} FROM figures WHERE id = ?"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(figure_from_row).transpose()
    }

    async fn find_by_name(&self, name: &str) -> anyhow::Result<Vec<Figure>> {
        let rows = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM figures WHERE name = ? COLLATE NOCASE ORDER BY serial"
        ))
        .bind(name)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(figure_from_row).collect()
    }

    async fn find_by_model(&self, model: Model) -> anyhow::Result<Vec<Figure>> {
        let rows = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM figures WHERE model = ? ORDER BY serial"
        ))
        .bind(model.as_str())
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(figure_from_row).collect()
    }

    async fn find_by_release_year(&self, year: i32) -> anyhow::Result<Vec<Figure>> {
        // release_date is ISO-8601 TEXT, so the year is a range scan
        let rows = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM figures WHERE release_date >= ? AND release_date <= ? ORDER BY serial"
        ))
        .bind(format!("{year:04}-01-01"))
        .bind(format!("{year:04}-12-31"))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(figure_from_row).collect()
    }

    async fn insert(&self, figure: &Figure) -> anyhow::Result<()> {
        sqlx::query(
            r#"INSERT INTO figures (id, serial, name, model, price, release_date, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(figure.id.to_string())
        .bind(figure.serial)
        .bind(&figure.name)
        .bind(figure.model.as_str())
        .bind(figure.price)
        .bind(figure.release_date)
        .bind(figure.created_at)
        .bind(figure.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update(&self, id: Uuid, figure: &Figure) -> anyhow::Result<Option<Figure>> {
        let res = sqlx::query(
            r#"UPDATE figures SET name = ?, model = ?, price = ?, release_date = ?, updated_at = ?
               WHERE id = ?"#,
        )
        .bind(&figure.name)
        .bind(figure.model.as_str())
        .bind(figure.price)
        .bind(figure.release_date)
        .bind(figure.updated_at)
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;
        if res.rows_affected() == 0 {
            return Ok(None);
        }
        Ok(Some(figure.clone()))
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM figures WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn max_serial(&self) -> anyhow::Result<i64> {
        let max: i64 = sqlx::query_scalar("SELECT COALESCE(MAX(serial), 0) FROM figures")
            .fetch_one(&self.pool)
            .await?;
        Ok(max)
    }
}
