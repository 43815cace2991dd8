#![allow(clippy::must_use_candidate)]

//! Core types shared by every Bulwark crate
//!
//! Holds the failure taxonomy, the wire envelope, the per-request auth
//! context and the validation issue model. Nothing here depends on axum;
//! the server crate turns these into HTTP responses.

mod context;
mod envelope;
mod error;
mod validation;

pub use context::{AuthContext, AuthenticatedUser};
pub use envelope::{ErrorBody, ErrorEnvelope};
pub use error::{ApiError, ErrorKind};
pub use validation::{IssueDetail, PathSegment, ValidationFailure, ValidationIssue};
