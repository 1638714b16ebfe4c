use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Display fields the attendance module needs from the user directory.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    #[schema(example = 42)]
    pub id: u64,
    #[schema(example = "John")]
    pub first_name: String,
    #[schema(example = "Doe")]
    pub last_name: Option<String>,
    #[schema(example = "john.doe@company.com", format = "email")]
    pub email: String,
    #[schema(example = "EMP-001")]
    pub emp_id: Option<String>,
}
