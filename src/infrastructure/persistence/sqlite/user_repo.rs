//! SQLite User Repository

use async_trait::async_trait;
use chrono::Utc;

use super::database::map_db_error;
use super::rows::UserRow;
use super::DbPool;
use crate::application::ports::{RepositoryError, UserRecord, UserRepositoryPort};

/// SQLite User Repository
pub struct SqliteUserRepository {
    pool: DbPool,
}

impl SqliteUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepositoryPort for SqliteUserRepository {
    async fn upsert(&self, user: &UserRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, name, image, updated_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                image = excluded.image,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.image)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<UserRecord>, RepositoryError> {
        let row: Option<UserRow> = sqlx::query_as("SELECT id, name, image FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(row.map(UserRecord::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::sqlite::testing::memory_pool;

    #[tokio::test]
    async fn test_upsert_refreshes_profile() {
        let repo = SqliteUserRepository::new(memory_pool().await);

        let mut user = UserRecord {
            id: "github|42".to_string(),
            name: Some("Sancho".to_string()),
            image: None,
        };
        repo.upsert(&user).await.unwrap();

        user.name = Some("Sancho Panza".to_string());
        user.image = Some("https://example.org/sancho.png".to_string());
        repo.upsert(&user).await.unwrap();

        let found = repo.find_by_id("github|42").await.unwrap().unwrap();
        assert_eq!(found, user);
        assert!(repo.find_by_id("nadie").await.unwrap().is_none());
    }
}
