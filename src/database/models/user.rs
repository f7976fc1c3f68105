use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A user as returned to clients. The password hash is never selected into this type.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub org_id: String,
    pub org_name: Option<String>,
    pub display_name: String,
    pub title: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub citizen_id: String,
    pub bod: Option<DateTime<Utc>>,
    pub blood: String,
    pub gender: Option<i64>,
    pub mobile_no: Option<String>,
    pub address: Option<String>,
    pub photo: Option<String>,
    pub username: String,
    pub email: Option<String>,
    pub role_id: String,
    pub role_name: Option<String>,
    pub user_type: Option<i64>,
    pub emp_id: String,
    pub dept_id: String,
    pub comm_id: String,
    pub stn_id: String,
    pub active: bool,
    pub activation_token: Option<String>,
    pub last_activation_request: Option<i64>,
    pub lost_password_request: Option<i64>,
    pub signup_stamp: Option<i64>,
    #[serde(rename = "islogin")]
    #[sqlx(rename = "islogin")]
    pub is_login: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_by: String,
}

/// Body of user create and full update.
/// On update an absent or empty password keeps the stored hash.
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserInput {
    pub display_name: String,
    pub title: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub citizen_id: String,
    pub bod: Option<DateTime<Utc>>,
    pub blood: String,
    pub gender: Option<i64>,
    pub mobile_no: Option<String>,
    pub address: Option<String>,
    pub photo: Option<String>,
    pub username: String,
    pub password: Option<String>,
    pub email: Option<String>,
    pub role_id: String,
    pub user_type: Option<i64>,
    pub emp_id: String,
    pub dept_id: String,
    pub comm_id: String,
    pub stn_id: String,
    pub active: bool,
    pub last_activation_request: Option<i64>,
    pub lost_password_request: Option<i64>,
    pub signup_stamp: Option<i64>,
    #[serde(rename = "islogin")]
    pub is_login: bool,
    pub last_login: Option<DateTime<Utc>>,
}

impl UserInput {
    /// The supplied password, if one was actually given
    pub fn new_password(&self) -> Option<&str> {
        self.password.as_deref().filter(|p| !p.is_empty())
    }
}

// Hand-written so a stray `{:?}` never prints the password
impl std::fmt::Debug for UserInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserInput")
            .field("username", &self.username)
            .field("role_id", &self.role_id)
            .field("active", &self.active)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish_non_exhaustive()
    }
}
