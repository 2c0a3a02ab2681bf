//! Per-intervention evaluation strategies.
//!
//! Each strategy only aggregates its inputs: it sums the eligible cost
//! (`Itot`) and the eligible-cost ceiling implied by its unit caps. The
//! rest of the computation is shared by [`compute`]:
//!
//! 1. resolve `p` (percentage tiers),
//! 2. `Imas = min(p × cost ceiling, absolute cap)`,
//! 3. resolve `MassimaleSoggetto`,
//! 4. `finale = max(0, min(Itot × p, Imas, MassimaleSoggetto))`.
//!
//! Dispatch is an exhaustive `match` on [`InterventionId`].

mod biomass;
mod charging;
mod heat_pump;
mod opaque;
mod photovoltaic;
mod surface;

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use tracing::warn;

use crate::ceiling::{absolute_cap, resolve_massimale};
use crate::numeric::{apply_rate, clamp_min, money, percent, round_currency};
use crate::percentage::determine_percentage;
use crate::trace::{Explanation, NoTrace, Tracer};
use crate::types::{
    Context, EngineError, EvaluationResult, ExplainResult, InterventionId, InterventionParams,
    SubjectType,
};

/// Output of a strategy's aggregation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct Aggregate {
    /// Eligible cost before rounding.
    pub itot: Decimal,
    /// Eligible-cost ceiling from unit caps, before the rate is applied.
    pub cost_cap: Decimal,
}

fn aggregate<T: Tracer>(id: InterventionId, params: &InterventionParams, trace: &mut T) -> Aggregate {
    match id {
        InterventionId::OpaqueInsulation => opaque::aggregate(params, trace),
        InterventionId::WindowReplacement
        | InterventionId::SolarShading
        | InterventionId::NzebTransformation
        | InterventionId::Lighting
        | InterventionId::BuildingAutomation => surface::aggregate(id, params, trace),
        InterventionId::EvCharging => charging::aggregate(params, trace),
        InterventionId::PhotovoltaicStorage => photovoltaic::aggregate(params, trace),
        InterventionId::HeatPump => heat_pump::aggregate(params, trace),
        InterventionId::Biomass => biomass::aggregate(params, trace),
    }
}

/// Narrate params of the wrong family; they contribute nothing.
pub(crate) fn mismatched<T: Tracer>(
    id: InterventionId,
    params: &InterventionParams,
    trace: &mut T,
) -> Aggregate {
    trace.step(|| {
        format!(
            "parametri di tipo {} non validi per {}: contributo nullo",
            params.family_name(),
            id.label()
        )
    });
    Aggregate::default()
}

/// Evaluate one intervention, recording its derivation into `trace`.
pub fn compute<T: Tracer>(
    id: InterventionId,
    params: &InterventionParams,
    operator: SubjectType,
    ctx: &Context,
    trace: &mut T,
) -> EvaluationResult {
    trace.step(|| format!("Intervento: {} ({}), soggetto {}", id.label(), id.key(), operator));

    let agg = aggregate(id, params, trace);
    let itot = round_currency(agg.itot);
    trace.var("Itot", itot);
    trace.step(|| format!("Itot (costo ammissibile) = {}", money(itot)));

    let rate = determine_percentage(&ctx.selected_premiums, params, operator, ctx, id);
    let p = rate.p;
    trace.var("p", p);
    trace.step(|| format!("p = {} ({})", percent(p), rate.p_desc));

    let by_units = apply_rate(agg.cost_cap, p);
    trace.var("costo_massimo_ammissibile", round_currency(agg.cost_cap));
    trace.var("Imas_unitario", by_units);
    let imas = match absolute_cap(id) {
        Some(cap) => {
            let imas = by_units.min(cap);
            trace.var("Imas_assoluto", cap);
            trace.step(|| {
                format!(
                    "Imas = min(p × {}, {}) = {}",
                    money(agg.cost_cap),
                    money(cap),
                    money(imas)
                )
            });
            imas
        }
        None => {
            trace.step(|| format!("Imas = p × {} = {}", money(agg.cost_cap), money(by_units)));
            by_units
        }
    };
    trace.var("Imas", imas);

    let massimale = resolve_massimale(id, itot, operator, trace);

    let gross = apply_rate(itot, p);
    let finale = clamp_min(&[gross, imas, massimale]);
    trace.var("Itot_x_p", gross);
    trace.var("finale", finale);
    trace.step(|| {
        format!(
            "finale = min(Itot × p = {}, Imas = {}, MassimaleSoggetto = {}) = {}",
            money(gross),
            money(imas),
            money(massimale),
            money(finale)
        )
    });

    EvaluationResult {
        itot,
        p,
        p_desc: rate.p_desc,
        imas,
        massimale_soggetto: massimale,
        finale,
        premiums: rate.premiums,
    }
}

/// Evaluate one intervention.
pub fn evaluate(
    id: InterventionId,
    params: &InterventionParams,
    operator: SubjectType,
    ctx: &Context,
) -> EvaluationResult {
    compute(id, params, operator, ctx, &mut NoTrace)
}

/// Evaluate one intervention and narrate the derivation.
pub fn explain(
    id: InterventionId,
    params: &InterventionParams,
    operator: SubjectType,
    ctx: &Context,
) -> ExplainResult {
    let mut explanation = Explanation::new();
    let result = compute(id, params, operator, ctx, &mut explanation);
    explanation.into_result(result.finale)
}

/// Eligible cost of one intervention, rounded to cents.
pub fn eligible_cost(id: InterventionId, params: &InterventionParams) -> Decimal {
    round_currency(aggregate(id, params, &mut NoTrace).itot)
}

// ──────────────────────────────────────────────
// Registry
// ──────────────────────────────────────────────

/// Key-based access to the strategies.
///
/// `evaluate` degrades to a zero result for unknown keys; `explain` reports
/// them as [`EngineError::UnknownIntervention`], since it cannot narrate a
/// strategy that does not exist.
#[derive(Debug, Clone)]
pub struct InterventionRegistry {
    entries: BTreeMap<&'static str, InterventionId>,
}

impl Default for InterventionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl InterventionRegistry {
    pub fn new() -> Self {
        InterventionRegistry {
            entries: InterventionId::ALL
                .into_iter()
                .map(|id| (id.key(), id))
                .collect(),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.keys().copied()
    }

    pub fn lookup(&self, key: &str) -> Option<InterventionId> {
        self.entries
            .get(key.trim().to_ascii_lowercase().as_str())
            .copied()
    }

    /// Evaluate by key. Missing params evaluate as empty inputs.
    pub fn evaluate(
        &self,
        key: &str,
        params: Option<&InterventionParams>,
        operator: SubjectType,
        ctx: &Context,
    ) -> EvaluationResult {
        let Some(id) = self.lookup(key) else {
            warn!(key, "unknown intervention, evaluating to zero");
            return EvaluationResult::zero(format!("intervento sconosciuto: {}", key));
        };
        match params {
            Some(params) => evaluate(id, params, operator, ctx),
            None => evaluate(id, &InterventionParams::empty_for(id), operator, ctx),
        }
    }

    /// Explain by key.
    pub fn explain(
        &self,
        key: &str,
        params: Option<&InterventionParams>,
        operator: SubjectType,
        ctx: &Context,
    ) -> Result<ExplainResult, EngineError> {
        let id = self
            .lookup(key)
            .ok_or_else(|| EngineError::UnknownIntervention {
                key: key.to_string(),
            })?;
        Ok(match params {
            Some(params) => explain(id, params, operator, ctx),
            None => explain(id, &InterventionParams::empty_for(id), operator, ctx),
        })
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
