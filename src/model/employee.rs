use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(example = json!({
    "id": 1,
    "employee_code": "WT-0001",
    "first_name": "John",
    "last_name": "Doe",
    "email": "john.doe@company.com",
    "role_id": 3,
    "hire_date": "2024-01-01",
    "status": "active"
}))]
pub struct Employee {
    pub id: u64,

    #[schema(example = "WT-0001")]
    pub employee_code: String,

    #[schema(example = "John")]
    pub first_name: String,

    #[schema(example = "Doe")]
    pub last_name: String,

    #[schema(example = "john.doe@company.com")]
    pub email: String,

    /// 1 = admin, 2 = hr, 3 = employee.
    #[schema(example = 3)]
    pub role_id: u8,

    #[schema(example = "2024-01-01", value_type = String, format = "date")]
    pub hire_date: NaiveDate,

    #[schema(example = "active")]
    pub status: String,
}

impl Employee {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
