//! Result types produced by the engine.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::intervention::{InterventionId, PremiumId};

/// Increment contributed by one premium to a resolved rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PremiumIncrement {
    pub premium: PremiumId,
    pub increment: Decimal,
}

/// Resolved incentive rate and the rule that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PercentageResult {
    pub p: Decimal,
    #[serde(rename = "pDesc")]
    pub p_desc: String,
    /// Premium-set increments actually applied (after capping).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub premiums: Vec<PremiumIncrement>,
}

impl PercentageResult {
    pub fn not_admitted(p_desc: impl Into<String>) -> Self {
        PercentageResult {
            p: Decimal::ZERO,
            p_desc: p_desc.into(),
            premiums: Vec::new(),
        }
    }
}

/// Numeric outcome of one intervention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationResult {
    #[serde(rename = "Itot")]
    pub itot: Decimal,
    pub p: Decimal,
    #[serde(rename = "pDesc")]
    pub p_desc: String,
    #[serde(rename = "Imas")]
    pub imas: Decimal,
    #[serde(rename = "MassimaleSoggetto")]
    pub massimale_soggetto: Decimal,
    pub finale: Decimal,
    /// Premium increments folded into `p`, reported per project by the
    /// combined calculation.
    #[serde(skip)]
    pub premiums: Vec<PremiumIncrement>,
}

impl EvaluationResult {
    /// All-zero result carrying a diagnostic description.
    pub fn zero(p_desc: impl Into<String>) -> Self {
        EvaluationResult {
            itot: Decimal::ZERO,
            p: Decimal::ZERO,
            p_desc: p_desc.into(),
            imas: Decimal::ZERO,
            massimale_soggetto: Decimal::ZERO,
            finale: Decimal::ZERO,
            premiums: Vec::new(),
        }
    }
}

/// Outcome of an evaluation together with its narrated derivation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplainResult {
    pub result: Decimal,
    pub variables: BTreeMap<String, Decimal>,
    pub steps: Vec<String>,
}

/// One entry of a combined calculation, in selection order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterventionOutcome {
    /// Key as it appeared in the selection.
    pub key: String,
    /// Parsed id, `None` for unknown keys.
    pub id: Option<InterventionId>,
    pub result: EvaluationResult,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    #[serde(rename = "Itot")]
    pub itot: Decimal,
    pub finale: Decimal,
}

/// Effect of one premium across the combined project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedPremium {
    pub premium: PremiumId,
    pub interventions: Vec<InterventionId>,
    /// Rate increment granted to each entry of `interventions`.
    pub increments: Vec<Decimal>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinedResult {
    pub per_intervention: Vec<InterventionOutcome>,
    pub totals: Totals,
    pub applied_premiums: Vec<AppliedPremium>,
}

impl CombinedResult {
    /// Result for a known intervention, if it was selected.
    pub fn get(&self, id: InterventionId) -> Option<&EvaluationResult> {
        self.per_intervention
            .iter()
            .find(|outcome| outcome.id == Some(id))
            .map(|outcome| &outcome.result)
    }

    /// Result for a selection key, known or not.
    pub fn get_key(&self, key: &str) -> Option<&EvaluationResult> {
        self.per_intervention
            .iter()
            .find(|outcome| outcome.key == key)
            .map(|outcome| &outcome.result)
    }
}
