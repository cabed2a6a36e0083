use async_trait::async_trait;
use chrono::Utc;
use sqlx::MySqlPool;
use tracing::debug;

use super::{EmployeeRepository, StoreError, UserRepository};
use crate::model::{
    employee::{Employee, NewEmployee},
    user::{NewUser, User, UserRow},
};

const EMPLOYEE_COLUMNS: &str =
    "id, full_name, email, position, department, active, created_at, updated_at";
const USER_COLUMNS: &str = "id, name, email, password, role, created_at";

pub struct MySqlEmployeeRepository {
    pool: MySqlPool,
}

impl MySqlEmployeeRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmployeeRepository for MySqlEmployeeRepository {
    async fn create(&self, new: NewEmployee) -> Result<Employee, StoreError> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO employees
            (full_name, email, position, department, active, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&new.full_name)
        .bind(&new.email)
        .bind(&new.position)
        .bind(&new.department)
        .bind(new.active.unwrap_or(true))
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_id();
        debug!(employee_id = id, "Employee inserted");

        self.find(id).await?.ok_or(StoreError::Missing(id))
    }

    async fn list(&self) -> Result<Vec<Employee>, StoreError> {
        let sql = format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees ORDER BY created_at DESC, id DESC"
        );
        let employees = sqlx::query_as::<_, Employee>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(employees)
    }

    async fn find(&self, id: u64) -> Result<Option<Employee>, StoreError> {
        let sql = format!("SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE id = ?");
        let employee = sqlx::query_as::<_, Employee>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(employee)
    }

    async fn update(&self, employee: &Employee) -> Result<Option<Employee>, StoreError> {
        // MySQL reports changed rows, not matched rows, so re-read instead of
        // trusting rows_affected.
        sqlx::query(
            r#"
            UPDATE employees
            SET full_name = ?, email = ?, position = ?, department = ?, active = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&employee.full_name)
        .bind(&employee.email)
        .bind(&employee.position)
        .bind(&employee.department)
        .bind(employee.active)
        .bind(employee.updated_at)
        .bind(employee.id)
        .execute(&self.pool)
        .await?;

        self.find(employee.id).await
    }

    async fn delete(&self, id: u64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM employees WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

pub struct MySqlUserRepository {
    pool: MySqlPool,
}

impl MySqlUserRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

fn into_user(row: UserRow) -> Result<User, StoreError> {
    let id = row.id;
    User::try_from(row).map_err(|e| StoreError::Corrupt(format!("user {id}: {e}")))
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn list(&self) -> Result<Vec<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, UserRow>(&sql)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(into_user)
            .collect()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?");
        sqlx::query_as::<_, UserRow>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?
            .map(into_user)
            .transpose()
    }

    async fn find_by_id(&self, id: u64) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?");
        sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(into_user)
            .transpose()
    }

    async fn create(&self, new: NewUser) -> Result<User, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (name, email, password, role, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&new.name)
        .bind(&new.email)
        .bind(&new.password_hash)
        .bind(new.role.to_string())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_id();
        debug!(user_id = id, role = %new.role, "User inserted");

        self.find_by_id(id).await?.ok_or(StoreError::Missing(id))
    }
}
