//! The command result envelope
//!
//! [`CommandResult`] is a tagged success/failure union carrying a payload or
//! a [`CommandError`] plus optional trust and explainability metadata
//! (confidence, reasoning, sources, plan, warnings, alternatives).
//!
//! The variant is the sole discriminant: code matches on the enum, never on
//! field presence. On the wire the discriminant is the `success` boolean; a
//! document whose tag contradicts its fields (a "success" carrying `error`,
//! a failure carrying `data`) is rejected at the parse boundary, so internal
//! code only ever sees the canonical shape.
//!
//! Separating "did the operation succeed" (the variant) from "how much
//! should the caller trust this" (the metadata) lets callers make graduated
//! trust decisions instead of binary pass/fail.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::error::CommandError;
use crate::core::metadata::{validate_unit_range, Alternative, PlanStep, Source, Warning};
use crate::error::Result;

/// The success variant: a payload plus optional metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Success<T> {
    /// The command's payload
    pub data: T,
    /// Trust score in `[0.0, 1.0]`
    pub confidence: Option<f64>,
    /// Why the command produced this result
    pub reasoning: Option<String>,
    /// Origins the result is attributed to
    pub sources: Vec<Source>,
    /// Execution plan, when the command reports one
    pub plan: Vec<PlanStep>,
    /// Non-fatal caveats
    pub warnings: Vec<Warning>,
    /// Rejected or secondary options
    pub alternatives: Vec<Alternative<Value>>,
}

/// The failure variant: a structured error plus optional metadata.
///
/// A failure never carries a payload or sources; everything else mirrors
/// [`Success`].
#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    /// What went wrong
    pub error: CommandError,
    /// Trust score in `[0.0, 1.0]`
    pub confidence: Option<f64>,
    /// Why the command failed, beyond the error itself
    pub reasoning: Option<String>,
    /// Execution plan up to the point of failure
    pub plan: Vec<PlanStep>,
    /// Non-fatal caveats gathered before the failure
    pub warnings: Vec<Warning>,
    /// Options that were considered and rejected
    pub alternatives: Vec<Alternative<Value>>,
}

/// Tagged success/failure envelope returned by every command.
///
/// # Examples
///
/// ```
/// use toolgate::core::{CommandError, CommandResult};
///
/// let ok: CommandResult<i32> = CommandResult::success(42)
///     .with_reasoning("computed directly");
/// assert!(ok.is_success());
/// assert_eq!(ok.data(), Some(&42));
///
/// let err: CommandResult<i32> =
///     CommandResult::failure(CommandError::new("NOT_FOUND", "missing"));
/// assert!(!err.is_success());
/// assert!(err.data().is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum CommandResult<T> {
    /// The command succeeded
    Success(Success<T>),
    /// The command failed
    Failure(Failure),
}

impl<T> CommandResult<T> {
    /// Construct a success envelope around `data`.
    pub fn success(data: T) -> Self {
        Self::Success(Success {
            data,
            confidence: None,
            reasoning: None,
            sources: Vec::new(),
            plan: Vec::new(),
            warnings: Vec::new(),
            alternatives: Vec::new(),
        })
    }

    /// Construct a failure envelope around `error`.
    pub fn failure(error: CommandError) -> Self {
        Self::Failure(Failure {
            error,
            confidence: None,
            reasoning: None,
            plan: Vec::new(),
            warnings: Vec::new(),
            alternatives: Vec::new(),
        })
    }

    /// Construct a failure from a code and message.
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::failure(CommandError::new(code, message))
    }

    /// True for the `Success` variant.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// The payload, when successful.
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success(s) => Some(&s.data),
            Self::Failure(_) => None,
        }
    }

    /// Consume the envelope, yielding the payload when successful.
    pub fn into_data(self) -> Option<T> {
        match self {
            Self::Success(s) => Some(s.data),
            Self::Failure(_) => None,
        }
    }

    /// The error, when failed.
    pub fn error_detail(&self) -> Option<&CommandError> {
        match self {
            Self::Success(_) => None,
            Self::Failure(f) => Some(&f.error),
        }
    }

    /// The confidence score, if reported.
    pub fn confidence(&self) -> Option<f64> {
        match self {
            Self::Success(s) => s.confidence,
            Self::Failure(f) => f.confidence,
        }
    }

    /// The reasoning text, if reported.
    pub fn reasoning(&self) -> Option<&str> {
        match self {
            Self::Success(s) => s.reasoning.as_deref(),
            Self::Failure(f) => f.reasoning.as_deref(),
        }
    }

    /// Attributed sources (always empty for a failure).
    pub fn sources(&self) -> &[Source] {
        match self {
            Self::Success(s) => &s.sources,
            Self::Failure(_) => &[],
        }
    }

    /// The reported plan steps.
    pub fn plan(&self) -> &[PlanStep] {
        match self {
            Self::Success(s) => &s.plan,
            Self::Failure(f) => &f.plan,
        }
    }

    /// The reported warnings.
    pub fn warnings(&self) -> &[Warning] {
        match self {
            Self::Success(s) => &s.warnings,
            Self::Failure(f) => &f.warnings,
        }
    }

    /// The reported alternatives.
    pub fn alternatives(&self) -> &[Alternative<Value>] {
        match self {
            Self::Success(s) => &s.alternatives,
            Self::Failure(f) => &f.alternatives,
        }
    }

    /// Set the confidence score.
    ///
    /// # Errors
    ///
    /// Fails fast with a validation error when `confidence` is outside
    /// `[0.0, 1.0]` — range violations are construction-time failures, not
    /// `Failure` results.
    pub fn with_confidence(mut self, confidence: f64) -> Result<Self> {
        validate_unit_range("confidence", confidence)?;
        match &mut self {
            Self::Success(s) => s.confidence = Some(confidence),
            Self::Failure(f) => f.confidence = Some(confidence),
        }
        Ok(self)
    }

    /// Set the reasoning text.
    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        match &mut self {
            Self::Success(s) => s.reasoning = Some(reasoning.into()),
            Self::Failure(f) => f.reasoning = Some(reasoning.into()),
        }
        self
    }

    /// Attach attributed sources. No effect on a failure, which cannot
    /// carry sources.
    pub fn with_sources(mut self, sources: Vec<Source>) -> Self {
        if let Self::Success(s) = &mut self {
            s.sources = sources;
        }
        self
    }

    /// Attach an execution plan.
    pub fn with_plan(mut self, plan: Vec<PlanStep>) -> Self {
        match &mut self {
            Self::Success(s) => s.plan = plan,
            Self::Failure(f) => f.plan = plan,
        }
        self
    }

    /// Attach warnings.
    pub fn with_warnings(mut self, warnings: Vec<Warning>) -> Self {
        match &mut self {
            Self::Success(s) => s.warnings = warnings,
            Self::Failure(f) => f.warnings = warnings,
        }
        self
    }

    /// Attach alternatives.
    pub fn with_alternatives(mut self, alternatives: Vec<Alternative<Value>>) -> Self {
        match &mut self {
            Self::Success(s) => s.alternatives = alternatives,
            Self::Failure(f) => f.alternatives = alternatives,
        }
        self
    }
}

/// Flat wire representation keyed on the `success` boolean.
///
/// Only used at the serde boundary; everything past the parse sees the
/// enum.
#[derive(Serialize, Deserialize)]
struct Wire<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<CommandError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reasoning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sources: Option<Vec<Source>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    plan: Option<Vec<PlanStep>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<Warning>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    alternatives: Option<Vec<Alternative<Value>>>,
}

fn none_if_empty<V>(v: Vec<V>) -> Option<Vec<V>> {
    if v.is_empty() {
        None
    } else {
        Some(v)
    }
}

impl<T: Serialize + Clone> Serialize for CommandResult<T> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let wire = match self.clone() {
            Self::Success(s) => Wire {
                success: true,
                data: Some(s.data),
                error: None,
                confidence: s.confidence,
                reasoning: s.reasoning,
                sources: none_if_empty(s.sources),
                plan: none_if_empty(s.plan),
                warnings: none_if_empty(s.warnings),
                alternatives: none_if_empty(s.alternatives),
            },
            Self::Failure(f) => Wire {
                success: false,
                data: None,
                error: Some(f.error),
                confidence: f.confidence,
                reasoning: f.reasoning,
                sources: None,
                plan: none_if_empty(f.plan),
                warnings: none_if_empty(f.warnings),
                alternatives: none_if_empty(f.alternatives),
            },
        };
        wire.serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for CommandResult<T> {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error as _;

        let wire = Wire::<T>::deserialize(deserializer)?;
        match (wire.success, wire.data, wire.error) {
            (true, Some(data), None) => Ok(Self::Success(Success {
                data,
                confidence: wire.confidence,
                reasoning: wire.reasoning,
                sources: wire.sources.unwrap_or_default(),
                plan: wire.plan.unwrap_or_default(),
                warnings: wire.warnings.unwrap_or_default(),
                alternatives: wire.alternatives.unwrap_or_default(),
            })),
            (false, None, Some(error)) => Ok(Self::Failure(Failure {
                error,
                confidence: wire.confidence,
                reasoning: wire.reasoning,
                plan: wire.plan.unwrap_or_default(),
                warnings: wire.warnings.unwrap_or_default(),
                alternatives: wire.alternatives.unwrap_or_default(),
            })),
            (true, None, _) => Err(D::Error::custom("success result is missing `data`")),
            (true, Some(_), Some(_)) => {
                Err(D::Error::custom("success result must not carry `error`"))
            }
            (false, Some(_), _) => Err(D::Error::custom("failure result must not carry `data`")),
            (false, None, None) => Err(D::Error::custom("failure result is missing `error`")),
        }
    }
}
