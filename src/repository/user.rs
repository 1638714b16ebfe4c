use async_trait::async_trait;
use sqlx::MySqlPool;

use crate::model::user::UserSummary;
use crate::repository::StoreError;

/// Read-only existence/lookup oracle over the user directory. Attendance
/// logic never writes through this trait.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Resolves an active (non-deleted) user, or `None`.
    async fn find_user(&self, id: u64) -> Result<Option<UserSummary>, StoreError>;
}

#[derive(Clone)]
pub struct SqlUserDirectory {
    pool: MySqlPool,
}

impl SqlUserDirectory {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for SqlUserDirectory {
    async fn find_user(&self, id: u64) -> Result<Option<UserSummary>, StoreError> {
        let user = sqlx::query_as::<_, UserSummary>(
            r#"
            SELECT id, first_name, last_name, email, emp_id
            FROM users
            WHERE id = ? AND is_deleted = FALSE
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }
}
