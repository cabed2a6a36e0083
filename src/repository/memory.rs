use async_trait::async_trait;
use chrono::Utc;
use std::sync::Mutex;

use super::{EmployeeRepository, StoreError, UserRepository};
use crate::model::{
    employee::{Employee, NewEmployee},
    user::{NewUser, User},
};

// Emails compare case-insensitively, like the default MySQL collation.
fn same_email(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

struct Table<T> {
    rows: Vec<T>,
    next_id: u64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            next_id: 0,
        }
    }
}

impl<T> Table<T> {
    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct MemoryEmployeeRepository {
    table: Mutex<Table<Employee>>,
}

#[async_trait]
impl EmployeeRepository for MemoryEmployeeRepository {
    async fn create(&self, new: NewEmployee) -> Result<Employee, StoreError> {
        let mut table = self.table.lock().expect("employee table poisoned");
        if table.rows.iter().any(|e| same_email(&e.email, &new.email)) {
            return Err(StoreError::Duplicate);
        }

        let now = Utc::now();
        let employee = Employee {
            id: table.allocate_id(),
            full_name: new.full_name,
            email: new.email,
            position: new.position,
            department: new.department,
            active: new.active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        };
        table.rows.push(employee.clone());
        Ok(employee)
    }

    async fn list(&self) -> Result<Vec<Employee>, StoreError> {
        let table = self.table.lock().expect("employee table poisoned");
        let mut rows = table.rows.clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn find(&self, id: u64) -> Result<Option<Employee>, StoreError> {
        let table = self.table.lock().expect("employee table poisoned");
        Ok(table.rows.iter().find(|e| e.id == id).cloned())
    }

    async fn update(&self, employee: &Employee) -> Result<Option<Employee>, StoreError> {
        let mut table = self.table.lock().expect("employee table poisoned");
        if table
            .rows
            .iter()
            .any(|e| e.id != employee.id && same_email(&e.email, &employee.email))
        {
            return Err(StoreError::Duplicate);
        }

        let Some(row) = table.rows.iter_mut().find(|e| e.id == employee.id) else {
            return Ok(None);
        };
        row.full_name = employee.full_name.clone();
        row.email = employee.email.clone();
        row.position = employee.position.clone();
        row.department = employee.department.clone();
        row.active = employee.active;
        row.updated_at = employee.updated_at;
        Ok(Some(row.clone()))
    }

    async fn delete(&self, id: u64) -> Result<bool, StoreError> {
        let mut table = self.table.lock().expect("employee table poisoned");
        let before = table.rows.len();
        table.rows.retain(|e| e.id != id);
        Ok(table.rows.len() < before)
    }
}

#[derive(Default)]
pub struct MemoryUserRepository {
    table: Mutex<Table<User>>,
}

impl MemoryUserRepository {
    pub fn count(&self) -> usize {
        self.table.lock().expect("user table poisoned").rows.len()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn list(&self) -> Result<Vec<User>, StoreError> {
        let table = self.table.lock().expect("user table poisoned");
        let mut rows = table.rows.clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let table = self.table.lock().expect("user table poisoned");
        Ok(table.rows.iter().find(|u| same_email(&u.email, email)).cloned())
    }

    async fn find_by_id(&self, id: u64) -> Result<Option<User>, StoreError> {
        let table = self.table.lock().expect("user table poisoned");
        Ok(table.rows.iter().find(|u| u.id == id).cloned())
    }

    async fn create(&self, new: NewUser) -> Result<User, StoreError> {
        let mut table = self.table.lock().expect("user table poisoned");
        if table.rows.iter().any(|u| same_email(&u.email, &new.email)) {
            return Err(StoreError::Duplicate);
        }

        let user = User {
            id: table.allocate_id(),
            name: new.name,
            email: new.email,
            password_hash: new.password_hash,
            role: new.role,
            created_at: Utc::now(),
        };
        table.rows.push(user.clone());
        Ok(user)
    }
}
