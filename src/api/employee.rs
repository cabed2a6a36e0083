use crate::{
    auth::auth::AuthUser,
    error::{ApiError, ApiResult},
    model::employee::{Employee, EmployeePatch, NewEmployee, trimmed},
    repository::EmployeeRepository,
};
use actix_web::{HttpResponse, web};
use chrono::Utc;
use tracing::{debug, info};
use validator::Validate;

fn not_found() -> ApiError {
    ApiError::NotFound("Employee not found".into())
}

/// Create Employee
#[utoipa::path(
    post,
    path = "/employees",
    request_body = NewEmployee,
    responses(
        (status = 201, description = "Employee created", body = Employee),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only"),
        (status = 409, description = "Email already registered", body = Object, example = json!({
            "statusCode": 409,
            "message": "Email already registered",
            "error": "Conflict"
        }))
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_employee(
    auth: AuthUser,
    repo: web::Data<dyn EmployeeRepository>,
    payload: web::Json<NewEmployee>,
) -> ApiResult<HttpResponse> {
    auth.require_admin()?;

    let payload = payload.into_inner();
    payload.validate()?;

    let new = NewEmployee {
        full_name: payload.full_name.trim().to_string(),
        email: payload.email.trim().to_string(),
        position: trimmed(payload.position),
        department: trimmed(payload.department),
        active: payload.active,
    };

    let employee = repo.create(new).await?;
    info!(employee_id = employee.id, by = auth.user_id, "Employee created");

    Ok(HttpResponse::Created().json(employee))
}

/// List Employees, newest first
#[utoipa::path(
    get,
    path = "/employees",
    responses(
        (status = 200, description = "All employees, newest first", body = [Employee]),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_employees(
    _auth: AuthUser,
    repo: web::Data<dyn EmployeeRepository>,
) -> ApiResult<HttpResponse> {
    let employees = repo.list().await?;
    debug!(count = employees.len(), "Fetched employees");

    Ok(HttpResponse::Ok().json(employees))
}

/// Get Employee by ID
#[utoipa::path(
    get,
    path = "/employees/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Employee found", body = Employee),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "statusCode": 404,
            "message": "Employee not found",
            "error": "Not Found"
        }))
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_employee(
    _auth: AuthUser,
    repo: web::Data<dyn EmployeeRepository>,
    path: web::Path<u64>,
) -> ApiResult<HttpResponse> {
    let employee_id = path.into_inner();

    let employee = repo.find(employee_id).await?.ok_or_else(not_found)?;

    Ok(HttpResponse::Ok().json(employee))
}

/// Update Employee, only the supplied fields change
#[utoipa::path(
    patch,
    path = "/employees/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee ID")
    ),
    request_body = EmployeePatch,
    responses(
        (status = 200, description = "Employee updated", body = Employee),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Employee not found"),
        (status = 409, description = "Email already registered")
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_employee(
    auth: AuthUser,
    repo: web::Data<dyn EmployeeRepository>,
    path: web::Path<u64>,
    body: web::Json<EmployeePatch>,
) -> ApiResult<HttpResponse> {
    auth.require_admin()?;

    let employee_id = path.into_inner();
    let patch = body.into_inner();
    patch.validate()?;

    let mut employee = repo.find(employee_id).await?.ok_or_else(not_found)?;
    patch.apply(&mut employee);
    employee.updated_at = Utc::now();

    let updated = repo.update(&employee).await?.ok_or_else(not_found)?;
    info!(employee_id, by = auth.user_id, "Employee updated");

    Ok(HttpResponse::Ok().json(updated))
}

/// Delete Employee
#[utoipa::path(
    delete,
    path = "/employees/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Deleted, the removed record is returned", body = Employee),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Employee not found")
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_employee(
    auth: AuthUser,
    repo: web::Data<dyn EmployeeRepository>,
    path: web::Path<u64>,
) -> ApiResult<HttpResponse> {
    auth.require_admin()?;

    let employee_id = path.into_inner();

    let employee = repo.find(employee_id).await?.ok_or_else(not_found)?;
    if !repo.delete(employee_id).await? {
        // removed concurrently
        return Err(not_found());
    }
    info!(employee_id, by = auth.user_id, "Employee deleted");

    Ok(HttpResponse::Ok().json(employee))
}
