pub mod form;
pub mod notification;
pub mod user;
pub mod user_contact;
pub mod user_skill;
pub mod user_social;
pub mod workflow;

/// An opaque JSON object as stored in a document column (form fields, workflow nodes/connections)
pub type Document = serde_json::Map<String, serde_json::Value>;

pub use form::{Form, FormActive, FormByCaseSubtype, FormInput, FormLock, FormPublish, FormRow, FormSummary};
pub use notification::{Notification, NotificationInput};
pub use user::{User, UserInput};
pub use user_contact::{UserContact, UserContactInput, UserContactUpdate};
pub use user_skill::{UserSkill, UserSkillInput, UserSkillUpdate};
pub use user_social::{UserSocial, UserSocialInput, UserSocialUpdate};
pub use workflow::{Workflow, WorkflowInput, WorkflowMetadata, WorkflowRow};
