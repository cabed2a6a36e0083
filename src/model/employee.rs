use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(
    example = json!({
        "id": 1,
        "fullName": "Maria Souza",
        "email": "maria.souza@company.com",
        "position": "Analyst",
        "department": "Finance",
        "active": true,
        "createdAt": "2025-01-01T12:00:00Z",
        "updatedAt": "2025-01-01T12:00:00Z"
    })
)]
pub struct Employee {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "Maria Souza")]
    pub full_name: String,

    #[schema(example = "maria.souza@company.com")]
    pub email: String,

    #[schema(example = "Analyst", nullable = true)]
    pub position: Option<String>,

    #[schema(example = "Finance", nullable = true)]
    pub department: Option<String>,

    #[schema(example = true)]
    pub active: bool,

    #[schema(value_type = String, format = "date-time")]
    pub created_at: DateTime<Utc>,

    #[schema(value_type = String, format = "date-time")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewEmployee {
    #[validate(custom(function = "not_blank", message = "fullName must not be empty"))]
    #[schema(example = "Maria Souza")]
    pub full_name: String,

    #[validate(email(message = "email must be a valid address"))]
    #[schema(example = "maria.souza@company.com", format = "email", value_type = String)]
    pub email: String,

    #[schema(example = "Analyst")]
    pub position: Option<String>,

    #[schema(example = "Finance")]
    pub department: Option<String>,

    /// Defaults to `true`.
    pub active: Option<bool>,
}

/// Partial update, absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeePatch {
    #[validate(custom(function = "not_blank", message = "fullName must not be empty"))]
    pub full_name: Option<String>,

    #[validate(email(message = "email must be a valid address"))]
    pub email: Option<String>,

    /// `null` clears the stored value
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = String, nullable = true)]
    pub position: Option<Option<String>>,

    /// `null` clears the stored value
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = String, nullable = true)]
    pub department: Option<Option<String>>,

    pub active: Option<bool>,
}

/// Tells an explicit `null` (`Some(None)`) apart from a missing key (`None`).
fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

pub(crate) fn trimmed(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string())
}

impl EmployeePatch {
    pub fn apply(self, employee: &mut Employee) {
        if let Some(full_name) = self.full_name {
            employee.full_name = full_name.trim().to_string();
        }
        if let Some(email) = self.email {
            employee.email = email.trim().to_string();
        }
        if let Some(position) = self.position {
            employee.position = trimmed(position);
        }
        if let Some(department) = self.department {
            employee.department = trimmed(department);
        }
        if let Some(active) = self.active {
            employee.active = active;
        }
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored() -> Employee {
        let at = DateTime::parse_from_rfc3339("2025-01-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        Employee {
            id: 7,
            full_name: "Maria Souza".into(),
            email: "maria@company.com".into(),
            position: Some("Analyst".into()),
            department: Some("Finance".into()),
            active: true,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn patch_touches_only_supplied_fields() {
        let mut employee = stored();
        let patch = EmployeePatch {
            department: Some(Some(" Legal ".into())),
            active: Some(false),
            ..Default::default()
        };

        patch.apply(&mut employee);

        assert_eq!(employee.department.as_deref(), Some("Legal"));
        assert!(!employee.active);
        assert_eq!(employee.full_name, "Maria Souza");
        assert_eq!(employee.email, "maria@company.com");
        assert_eq!(employee.position.as_deref(), Some("Analyst"));
    }

    #[test]
    fn explicit_null_clears_but_missing_key_keeps() {
        let mut employee = stored();
        let patch: EmployeePatch = serde_json::from_str(r#"{"position":null}"#).unwrap();
        assert_eq!(patch.position, Some(None));
        assert_eq!(patch.department, None);

        patch.apply(&mut employee);

        assert_eq!(employee.position, None);
        assert_eq!(employee.department.as_deref(), Some("Finance"));
    }

    #[test]
    fn empty_patch_is_a_no_op() {
        let mut employee = stored();
        EmployeePatch::default().apply(&mut employee);
        assert_eq!(employee, stored());
    }

    #[test]
    fn camel_case_payload_deserializes() {
        let patch: EmployeePatch =
            serde_json::from_str(r#"{"fullName":"Ana Lima","position":"Lead"}"#).unwrap();
        assert_eq!(patch.full_name.as_deref(), Some("Ana Lima"));
        assert_eq!(patch.position, Some(Some("Lead".to_string())));
        assert!(patch.email.is_none());
    }

    #[test]
    fn create_payload_rejects_blank_name_and_bad_email() {
        let payload = NewEmployee {
            full_name: "   ".into(),
            email: "not-an-email".into(),
            position: None,
            department: None,
            active: None,
        };
        let errors = payload.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("full_name"));
        assert!(fields.contains_key("email"));
    }
}
