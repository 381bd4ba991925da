//! Metadata value types attached to command results
//!
//! These are immutable, validated value objects: [`Source`] (attribution),
//! [`PlanStep`] (one unit of an execution plan), [`Warning`] (non-fatal
//! caveat), and [`Alternative`] (rejected or secondary option). They carry
//! no behavior beyond construction-time range validation and the pure
//! [`update_step_status`] overlay.
//!
//! All `Option` fields omit their key from JSON when `None` via
//! `#[serde(skip_serializing_if = "Option::is_none")]`. Enum wire values
//! are snake_case.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, ToolgateError};

/// Attribution of a fact or result to an origin.
///
/// `relevance`, when present, must lie in `[0.0, 1.0]`; construction fails
/// otherwise. Immutable once constructed.
///
/// # Examples
///
/// ```
/// use toolgate::core::Source;
///
/// let source = Source::new("document")
///     .with_id("doc-123")
///     .with_title("Style Guide")
///     .with_relevance(0.92)
///     .unwrap();
/// assert_eq!(source.source_type, "document");
/// assert_eq!(source.relevance, Some(0.92));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    /// Free-form category of the origin (e.g. "document", "api", "database")
    #[serde(rename = "type")]
    pub source_type: String,
    /// Identifier of the origin within its category
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Human-readable title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// URL of the origin
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Location within the origin (e.g. "Chapter 3.2")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// When the origin was consulted (caller-supplied timestamp string)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accessed_at: Option<String>,
    /// How relevant the origin is to the result, in `[0.0, 1.0]`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relevance: Option<f64>,
}

impl Source {
    /// Create a source with only the required category set.
    pub fn new(source_type: impl Into<String>) -> Self {
        Self {
            source_type: source_type.into(),
            id: None,
            title: None,
            url: None,
            location: None,
            accessed_at: None,
            relevance: None,
        }
    }

    /// Set the origin identifier.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the human-readable title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the origin URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the location within the origin.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Set the access timestamp string.
    pub fn with_accessed_at(mut self, accessed_at: impl Into<String>) -> Self {
        self.accessed_at = Some(accessed_at.into());
        self
    }

    /// Set the relevance score.
    ///
    /// # Errors
    ///
    /// Returns [`ToolgateError::Validation`] when `relevance` is outside
    /// `[0.0, 1.0]`.
    pub fn with_relevance(mut self, relevance: f64) -> Result<Self> {
        validate_unit_range("relevance", relevance)?;
        self.relevance = Some(relevance);
        Ok(self)
    }
}

/// Status of a [`PlanStep`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStepStatus {
    /// Not yet started (the default for new steps)
    Pending,
    /// Currently executing
    InProgress,
    /// Finished successfully; `result` may be populated
    Complete,
    /// Finished unsuccessfully; `error` may be populated
    Failed,
    /// Intentionally not executed
    Skipped,
}

impl Default for PlanStepStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl std::fmt::Display for PlanStepStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Complete => "complete",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
        };
        write!(f, "{}", s)
    }
}

/// One unit of a multi-step execution plan.
///
/// `progress`, when present, must lie in `[0, 100]`. Steps are never
/// mutated in place; use [`update_step_status`] to derive an updated value.
///
/// # Examples
///
/// ```
/// use toolgate::core::{PlanStep, PlanStepStatus};
///
/// let step = PlanStep::new("fetch-data", "fetch");
/// assert_eq!(step.status, PlanStepStatus::Pending);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanStep {
    /// Step identifier, unique within a plan
    pub id: String,
    /// The action this step performs
    pub action: String,
    /// Current lifecycle status
    #[serde(default)]
    pub status: PlanStepStatus,
    /// Human-readable description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Ordered ids of steps this one depends on
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depends_on: Option<Vec<String>>,
    /// Completion percentage in `[0, 100]`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
    /// Estimated remaining time in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_time_remaining_ms: Option<u64>,
    /// Opaque result payload, present only when status is `Complete`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Opaque error payload, present only when status is `Failed`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

impl PlanStep {
    /// Create a pending step with the required id and action.
    pub fn new(id: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            action: action.into(),
            status: PlanStepStatus::Pending,
            description: None,
            depends_on: None,
            progress: None,
            estimated_time_remaining_ms: None,
            result: None,
            error: None,
        }
    }

    /// Set the human-readable description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the dependency list.
    pub fn with_depends_on(mut self, depends_on: Vec<String>) -> Self {
        self.depends_on = Some(depends_on);
        self
    }

    /// Set the initial status.
    pub fn with_status(mut self, status: PlanStepStatus) -> Self {
        self.status = status;
        self
    }

    /// Set the completion percentage.
    ///
    /// # Errors
    ///
    /// Returns [`ToolgateError::Validation`] when `progress` exceeds 100.
    pub fn with_progress(mut self, progress: u8) -> Result<Self> {
        validate_progress(progress)?;
        self.progress = Some(progress);
        Ok(self)
    }

    /// Set the estimated remaining time.
    pub fn with_estimated_time_remaining_ms(mut self, ms: u64) -> Self {
        self.estimated_time_remaining_ms = Some(ms);
        self
    }
}

/// Fields that may be overlaid onto a step by [`update_step_status`].
///
/// Unset fields leave the corresponding step field untouched.
#[derive(Debug, Clone, Default)]
pub struct StepUpdate {
    /// New completion percentage
    pub progress: Option<u8>,
    /// New estimated remaining time in milliseconds
    pub estimated_time_remaining_ms: Option<u64>,
    /// Result payload (meaningful with [`PlanStepStatus::Complete`])
    pub result: Option<Value>,
    /// Error payload (meaningful with [`PlanStepStatus::Failed`])
    pub error: Option<Value>,
}

/// Derive a new step with `status` and the `update` fields overlaid.
///
/// This is a pure, non-mutating update: every field not named in `update`
/// is preserved from the input step.
///
/// # Errors
///
/// Returns [`ToolgateError::Validation`] when `update.progress` exceeds 100.
///
/// # Examples
///
/// ```
/// use toolgate::core::{update_step_status, PlanStep, PlanStepStatus, StepUpdate};
///
/// let step = PlanStep::new("fetch", "fetch").with_description("Fetch data");
/// let updated = update_step_status(
///     &step,
///     PlanStepStatus::InProgress,
///     StepUpdate { progress: Some(25), ..Default::default() },
/// )
/// .unwrap();
/// assert_eq!(updated.progress, Some(25));
/// assert_eq!(updated.description.as_deref(), Some("Fetch data"));
/// ```
pub fn update_step_status(
    step: &PlanStep,
    status: PlanStepStatus,
    update: StepUpdate,
) -> Result<PlanStep> {
    if let Some(progress) = update.progress {
        validate_progress(progress)?;
    }
    let mut next = step.clone();
    next.status = status;
    if update.progress.is_some() {
        next.progress = update.progress;
    }
    if update.estimated_time_remaining_ms.is_some() {
        next.estimated_time_remaining_ms = update.estimated_time_remaining_ms;
    }
    if update.result.is_some() {
        next.result = update.result;
    }
    if update.error.is_some() {
        next.error = update.error;
    }
    Ok(next)
}

/// Severity of a [`Warning`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningSeverity {
    /// Informational only
    Info,
    /// Worth noting (the default)
    Warning,
    /// Should be reviewed before relying on the result
    Caution,
}

impl Default for WarningSeverity {
    fn default() -> Self {
        Self::Warning
    }
}

/// A non-fatal risk or caveat attached to a result.
///
/// # Examples
///
/// ```
/// use toolgate::core::{Warning, WarningSeverity};
///
/// let warning = Warning::new("OUTDATED_SOURCE", "Source is 6 months old");
/// assert_eq!(warning.severity, WarningSeverity::Warning);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warning {
    /// Machine-stable warning identifier
    pub code: String,
    /// Human-readable message
    pub message: String,
    /// Severity band
    #[serde(default)]
    pub severity: WarningSeverity,
    /// Opaque key/value context
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Map<String, Value>>,
}

impl Warning {
    /// Create a warning with the default severity.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            severity: WarningSeverity::Warning,
            details: None,
        }
    }

    /// Set the severity band.
    pub fn with_severity(mut self, severity: WarningSeverity) -> Self {
        self.severity = severity;
        self
    }

    /// Attach opaque context.
    pub fn with_details(mut self, details: Map<String, Value>) -> Self {
        self.details = Some(details);
        self
    }
}

/// A rejected or secondary option.
///
/// `confidence`, when present, must lie in `[0.0, 1.0]`.
///
/// # Examples
///
/// ```
/// use toolgate::core::Alternative;
///
/// let alt = Alternative::new("Alternative result", "More concise version");
/// assert_eq!(alt.reason, "More concise version");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alternative<T> {
    /// The alternative payload
    pub data: T,
    /// Human-readable reason the option was set aside
    pub reason: String,
    /// Confidence in the alternative, in `[0.0, 1.0]`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    /// Short display label
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl<T> Alternative<T> {
    /// Create an alternative from the required payload and reason.
    pub fn new(data: T, reason: impl Into<String>) -> Self {
        Self {
            data,
            reason: reason.into(),
            confidence: None,
            label: None,
        }
    }

    /// Set the confidence score.
    ///
    /// # Errors
    ///
    /// Returns [`ToolgateError::Validation`] when `confidence` is outside
    /// `[0.0, 1.0]`.
    pub fn with_confidence(mut self, confidence: f64) -> Result<Self> {
        validate_unit_range("confidence", confidence)?;
        self.confidence = Some(confidence);
        Ok(self)
    }

    /// Set the display label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Check that a score lies in `[0.0, 1.0]`, inclusive at both ends.
pub(crate) fn validate_unit_range(field: &str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ToolgateError::Validation(format!(
            "{} must be within 0.0..=1.0, got {}",
            field, value
        ))
        .into());
    }
    Ok(())
}

fn validate_progress(progress: u8) -> Result<()> {
    if progress > 100 {
        return Err(ToolgateError::Validation(format!(
            "progress must be within 0..=100, got {}",
            progress
        ))
        .into());
    }
    Ok(())
}
