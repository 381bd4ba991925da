//! Core command contract: result envelope, error model, and metadata
//!
//! This module defines the value types every command speaks in:
//!
//! - [`result::CommandResult`] -- the tagged success/failure envelope.
//! - [`error::CommandError`] -- structured failure detail with factories
//!   and the [`error::wrap_error`] boundary translator.
//! - [`metadata`] -- immutable attribution/plan/warning/alternative values.
//!
//! # Canonical Import Path
//!
//! ```no_run
//! use toolgate::core::{CommandError, CommandResult};
//! ```

pub mod error;
pub mod metadata;
pub mod result;

pub use error::{
    codes, internal_error, is_command_error, not_found_error, rate_limit_error, timeout_error,
    validation_error, wrap_error, CommandError, ErrorCause, ErrorSource,
};
pub use metadata::{
    update_step_status, Alternative, PlanStep, PlanStepStatus, Source, StepUpdate, Warning,
    WarningSeverity,
};
pub use result::{CommandResult, Failure, Success};
