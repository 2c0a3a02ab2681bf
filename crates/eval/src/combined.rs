//! Combined calculation over a selection of interventions.
//!
//! Every selected intervention sees the same enriched context: the global
//! premiums merged with the context's own, and every known selected id, so
//! pairing premiums ("envelope work with a new generator") fire regardless
//! of the order in which interventions were selected.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, warn};

use crate::interventions;
use crate::numeric::sum;
use crate::types::{
    AppliedPremium, CombinedResult, Context, EvaluationResult, InterventionId, InterventionOutcome,
    InterventionParams, PremiumId, SubjectType, Totals,
};

/// Evaluate every selected intervention and aggregate the results.
///
/// The selection is a set: a repeated intervention, under any spelling of
/// its key, is evaluated once at its first position. Unknown keys yield an
/// all-zero entry and are otherwise skipped. Keys without inputs evaluate
/// with empty inputs of the right family.
pub fn calculate_combined_incentives(
    selected: &[String],
    inputs: &BTreeMap<String, InterventionParams>,
    operator: SubjectType,
    global_premiums: &BTreeSet<PremiumId>,
    ctx: &Context,
) -> CombinedResult {
    let known = distinct(selected);

    let mut enriched = ctx.clone();
    enriched.selected_premiums.extend(global_premiums.iter().copied());
    enriched
        .selected_interventions
        .extend(known.iter().filter_map(|(_, id)| *id));

    let mut per_intervention = Vec::with_capacity(known.len());
    let mut applied: BTreeMap<PremiumId, AppliedPremium> = BTreeMap::new();

    for (key, id) in known {
        let Some(id) = id else {
            warn!(key = %key, "unknown intervention in selection, contributing zero");
            per_intervention.push(InterventionOutcome {
                key: key.clone(),
                id: None,
                result: EvaluationResult::zero(format!("intervento sconosciuto: {}", key)),
            });
            continue;
        };

        let empty;
        let params = match inputs.get(key.as_str()).or_else(|| inputs.get(id.key())) {
            Some(params) => params,
            None => {
                empty = InterventionParams::empty_for(id);
                &empty
            }
        };

        let result = interventions::evaluate(id, params, operator, &enriched);
        for increment in &result.premiums {
            let entry = applied
                .entry(increment.premium)
                .or_insert_with(|| AppliedPremium {
                    premium: increment.premium,
                    interventions: Vec::new(),
                    increments: Vec::new(),
                });
            entry.interventions.push(id);
            entry.increments.push(increment.increment);
        }
        debug!(intervention = %id, finale = %result.finale, "intervention evaluated");

        per_intervention.push(InterventionOutcome {
            key: key.clone(),
            id: Some(id),
            result,
        });
    }

    let totals = Totals {
        itot: sum(per_intervention.iter().map(|o| o.result.itot)),
        finale: sum(per_intervention.iter().map(|o| o.result.finale)),
    };

    CombinedResult {
        per_intervention,
        totals,
        applied_premiums: applied.into_values().collect(),
    }
}

/// Selection keys paired with their ids, first occurrence wins.
fn distinct(selected: &[String]) -> Vec<(&String, Option<InterventionId>)> {
    let mut seen_ids = BTreeSet::new();
    let mut seen_unknown = BTreeSet::new();
    let mut known = Vec::with_capacity(selected.len());
    for key in selected {
        let id = InterventionId::parse(key);
        let first = match id {
            Some(id) => seen_ids.insert(id),
            None => seen_unknown.insert(key.as_str()),
        };
        if first {
            known.push((key, id));
        } else {
            debug!(key = %key, "repeated intervention in selection, ignored");
        }
    }
    known
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
