use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::DischargePlan;

// ---------------------------------------------------------------------------
// Disposition
// ---------------------------------------------------------------------------

/// How an encounter ended. Set only when the encounter reaches Finished or
/// Cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Disposition {
    Home,
    AdmittedInpatient,
    Transferred,
    Deceased,
    LeftAgainstMedicalAdvice,
}

// ---------------------------------------------------------------------------
// FieldName
// ---------------------------------------------------------------------------

/// A payload field a transition edge can declare mandatory.
///
/// The engine validates presence on every request — it never assumes a
/// client-side confirmation dialog collected the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldName {
    Reason,
    Disposition,
    ResultValue,
    /// A complete four-section discharge plan.
    DischargePlan,
    /// A strictly positive payment amount.
    Amount,
}

impl FieldName {
    pub fn as_code(&self) -> &'static str {
        match self {
            FieldName::Reason => "REASON",
            FieldName::Disposition => "DISPOSITION",
            FieldName::ResultValue => "RESULT_VALUE",
            FieldName::DischargePlan => "DISCHARGE_PLAN",
            FieldName::Amount => "AMOUNT",
        }
    }
}

impl std::fmt::Display for FieldName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_code())
    }
}

// ---------------------------------------------------------------------------
// TransitionPayload
// ---------------------------------------------------------------------------

/// Caller-supplied data accompanying a transition request. Which fields are
/// mandatory depends on the registry edge being taken; everything else is
/// ignored by that edge.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransitionPayload {
    /// Reason string for terminal / hold transitions (cancel, discontinue,
    /// hold, reject). Whitespace-only strings do not count as supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Encounter disposition, required when finishing an encounter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disposition: Option<Disposition>,
    /// Optional resume time for a held medication order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_at: Option<DateTime<Utc>>,
    /// Discharge-plan override for the open-order discharge guard.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discharge_plan: Option<DischargePlan>,
    /// Result value recorded when a lab test completes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_value: Option<String>,
}

impl TransitionPayload {
    /// Payload with only a reason — the common shape for cancel/hold/
    /// discontinue requests.
    pub fn with_reason(reason: impl Into<String>) -> Self {
        Self {
            reason: Some(reason.into()),
            ..Self::default()
        }
    }

    /// True when the named field is present and non-blank.
    pub fn supplies(&self, field: FieldName) -> bool {
        match field {
            FieldName::Reason => self
                .reason
                .as_deref()
                .map(|r| !r.trim().is_empty())
                .unwrap_or(false),
            FieldName::Disposition => self.disposition.is_some(),
            FieldName::ResultValue => self
                .result_value
                .as_deref()
                .map(|r| !r.trim().is_empty())
                .unwrap_or(false),
            FieldName::DischargePlan => self
                .discharge_plan
                .as_ref()
                .map(|p| p.is_complete())
                .unwrap_or(false),
            // Payment amounts travel outside the payload; the billing op
            // validates them directly.
            FieldName::Amount => false,
        }
    }
}
