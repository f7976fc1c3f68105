// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// Route prefix: /api/v1/*. Every handler receives the caller's TenantContext
// from the auth middleware and passes it to the service layer unchanged.
// The notification socket authenticates itself from `?token=`.

pub mod forms;
pub mod notification_ws;
pub mod notifications;
pub mod user_contacts;
pub mod user_skills;
pub mod user_socials;
pub mod users;
pub mod workflows;
