use crate::api::user::{SeedAdminResponse, SeededAdmin};
use crate::auth::auth::AuthUser;
use crate::model::employee::{Employee, EmployeePatch, NewEmployee};
use crate::model::role::Role;
use crate::model::user::{CreateUser, UserResponse};
use crate::models::{LoginReqDto, LoginResponse, SessionUser};
use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Employee Roster API",
        version = "1.0.0",
        description = r#"
## Employee Roster

Backend of the roster dashboard: an authenticated CRUD interface over the
employee roster and the system accounts that may use it.

### Key Features
- **Employees**: create, list, view, partially update and delete roster entries
- **Users**: list and create system accounts, bootstrap the default admin

### Security
Every endpoint except login and health expects a
**JWT Bearer** token from `POST /auth/login`.
- `ADMIN` may read and write everything
- `VIEWER` may only read employees

### Errors
Failures return `{"statusCode", "message", "error"}`.
"#,
    ),
    paths(
        crate::auth::handlers::login,
        crate::auth::handlers::me,

        crate::api::employee::create_employee,
        crate::api::employee::list_employees,
        crate::api::employee::get_employee,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee,

        crate::api::user::seed_admin,
        crate::api::user::list_users,
        crate::api::user::create_user
    ),
    components(
        schemas(
            Employee,
            NewEmployee,
            EmployeePatch,
            Role,
            CreateUser,
            UserResponse,
            SeedAdminResponse,
            SeededAdmin,
            LoginReqDto,
            LoginResponse,
            SessionUser,
            AuthUser
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Login and session APIs"),
        (name = "Employee", description = "Employee management APIs"),
        (name = "User", description = "System account APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route_and_the_bearer_scheme() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        for expected in [
            "/auth/login",
            "/auth/me",
            "/employees",
            "/employees/{employee_id}",
            "/users",
            "/users/seed-admin",
        ] {
            assert!(
                paths.iter().any(|p| p.as_str() == expected),
                "missing {expected} in {paths:?}"
            );
        }

        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
