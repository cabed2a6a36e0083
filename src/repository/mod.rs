//! Data access behind traits so handlers can be exercised without a database.
//!
//! Handlers receive `web::Data<dyn EmployeeRepository>` / `web::Data<dyn UserRepository>`;
//! production wires the MySQL implementations, tests wire the in-memory ones.

use async_trait::async_trait;
use derive_more::Display;

use crate::model::{
    employee::{Employee, NewEmployee},
    user::{NewUser, User},
};

#[cfg(test)]
pub mod memory;
pub mod mysql;

#[derive(Debug, Display)]
pub enum StoreError {
    #[display(fmt = "a row with this email already exists")]
    Duplicate,
    #[display(fmt = "row {} vanished right after being written", _0)]
    Missing(u64),
    #[display(fmt = "stored row is malformed: {}", _0)]
    Corrupt(String),
    #[display(fmt = "database error: {}", _0)]
    Database(sqlx::Error),
}

impl std::error::Error for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return StoreError::Duplicate;
            }
        }
        StoreError::Database(err)
    }
}

#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    async fn create(&self, new: NewEmployee) -> Result<Employee, StoreError>;

    /// Newest first.
    async fn list(&self) -> Result<Vec<Employee>, StoreError>;

    async fn find(&self, id: u64) -> Result<Option<Employee>, StoreError>;

    /// Persists every mutable field of `employee`; `None` when the row no longer exists.
    async fn update(&self, employee: &Employee) -> Result<Option<Employee>, StoreError>;

    /// `false` when nothing was deleted.
    async fn delete(&self, id: u64) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Newest first.
    async fn list(&self) -> Result<Vec<User>, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn find_by_id(&self, id: u64) -> Result<Option<User>, StoreError>;

    /// Fails with [`StoreError::Duplicate`] when the email is taken.
    async fn create(&self, new: NewUser) -> Result<User, StoreError>;
}
