//! Pure transformations from flat, discriminator-tagged rows into the nested
//! documents the designer UI consumes. No I/O happens here.

pub mod case_subtype;
pub mod form;
pub mod workflow;

pub use case_subtype::{first_form_reference, form_reference};
pub use form::{collect_form, merge_forms};
pub use workflow::{assemble_workflows, Mode, WorkflowAssembler};
