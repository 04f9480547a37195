//! AdminZone Common
//!
//! Types shared by every console crate:
//! - Roles and the capability flags derived from them
//! - Domain entities and request bodies (students, courses, enrollments, ...)
//! - List and error envelopes returned by the backend
//! - Declarative constraint tables and the generic form validator

pub mod constraints;
pub mod envelope;
pub mod model;
pub mod role;
pub mod validation;

pub use envelope::{ErrorResponse, Page, PageRequest, PageResponse};
pub use model::*;
pub use role::{Capabilities, Role, RoleSet};
pub use validation::{
    validate, FieldConstraint, FieldErrors, FieldValue, FormKind, Rule, Validate,
    ValidationContext,
};
