use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;
use sqlx::sqlite::SqliteRow;
use uuid::Uuid;

use crate::application::ports::user_repository::{Role, UserRepository, UserRow};
use crate::infrastructure::db::DbPool;

pub struct SqlxUserRepository {
    pub pool: DbPool,
}

impl SqlxUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn user_from_row(row: &SqliteRow, with_hash: bool) -> anyhow::Result<UserRow> {
    let id: String = row.get("id");
    let role: String = row.get("role");
    Ok(UserRow {
        id: Uuid::parse_str(&id)?,
        username: row.get("username"),
        role: Role::parse(&role).ok_or_else(|| anyhow::anyhow!("unknown role: {role}"))?,
        password_hash: if with_hash {
            row.try_get("password_hash").ok()
        } else {
            None
        },
    })
}

#[async_trait]
impl UserRepository for SqlxUserRepository {
    async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        role: Role,
    ) -> anyhow::Result<UserRow> {
        let id = Uuid::new_v4();
        sqlx::query(
            r#"INSERT INTO users (id, username, password_hash, role, created_at)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(id.to_string())
        .bind(username)
        .bind(password_hash)
        .bind(role.as_str())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(UserRow {
            id,
            username: username.to_string(),
            role,
            password_hash: Some(password_hash.to_string()),
        })
    }

    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<UserRow>> {
        let row =
            sqlx::query("SELECT id, username, password_hash, role FROM users WHERE username = ?")
                .bind(username)
                .fetch_optional(&self.pool)
                .await?;
        row.as_ref().map(|r| user_from_row(r, true)).transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<UserRow>> {
        let row = sqlx::query("SELECT id, username, role FROM users WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(|r| user_from_row(r, false)).transpose()
    }

    async fn count(&self) -> anyhow::Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    use crate::infrastructure::db::{connect_pool, migrate};

    async fn repo(dir: &TempDir) -> SqlxUserRepository {
        let url = format!("sqlite://{}", dir.path().join("users.db").display());
        let pool = connect_pool(&url).await.unwrap();
        migrate(&pool).await.unwrap();
        SqlxUserRepository::new(pool)
    }

    #[tokio::test]
    async fn created_users_can_be_found_both_ways() {
        let dir = TempDir::new().unwrap();
        let repo = repo(&dir).await;
        assert_eq!(repo.count().await.unwrap(), 0);

        let created = repo
            .create_user("madi", "$argon2id$fake-hash", Role::Admin)
            .await
            .unwrap();
        assert_eq!(repo.count().await.unwrap(), 1);

        let by_name = repo.find_by_username("madi").await.unwrap().unwrap();
        assert_eq!(by_name.id, created.id);
        assert_eq!(by_name.role, Role::Admin);
        assert_eq!(by_name.password_hash.as_deref(), Some("$argon2id$fake-hash"));

        // lookups by id never expose the hash
        let by_id = repo.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(by_id.username, "madi");
        assert!(by_id.password_hash.is_none());

        assert!(repo.find_by_username("ghost").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn usernames_are_unique() {
        let dir = TempDir::new().unwrap();
        let repo = repo(&dir).await;
        repo.create_user("madi", "h1", Role::User).await.unwrap();
        assert!(repo.create_user("madi", "h2", Role::User).await.is_err());
    }
}
