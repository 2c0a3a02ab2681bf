//! Interventions priced per m² of treated surface: windows, shading,
//! nZEB transformation, lighting and building automation.

use rust_decimal::Decimal;

use super::{mismatched, Aggregate};
use crate::ceiling::surface_specific_cost;
use crate::numeric::{money, times};
use crate::trace::Tracer;
use crate::types::{InterventionId, InterventionParams};

pub(super) fn aggregate<T: Tracer>(
    id: InterventionId,
    params: &InterventionParams,
    trace: &mut T,
) -> Aggregate {
    let InterventionParams::Surface(params) = params else {
        return mismatched(id, params, trace);
    };

    let itot = params.declared_cost();
    match (params.costo_totale, params.costo_specifico) {
        (Some(total), _) => trace.step(|| format!("costo dichiarato {}", money(total))),
        (None, Some(specific)) => trace.step(|| {
            format!(
                "costo {} m² × {} = {}",
                params.superficie,
                money(specific),
                money(itot)
            )
        }),
        (None, None) => trace.step(|| "costo non dichiarato".to_string()),
    }

    let tabled = surface_specific_cost(id, params.zona).unwrap_or(Decimal::ZERO);
    // A declared specific cost lowers the tabled one, never raises it.
    let specific = match params.costo_specifico {
        Some(declared) => declared.max(Decimal::ZERO).min(tabled),
        None => tabled,
    };
    let cost_cap = if params.superficie > Decimal::ZERO {
        times(params.superficie, specific)
    } else {
        Decimal::ZERO
    };
    trace.var("costo_specifico_massimo", tabled);
    if let Some(declared) = params.costo_specifico {
        trace.var("costo_specifico_dichiarato", declared);
        trace.step(|| {
            format!(
                "costo specifico = min(dichiarato {}, massimo {}) = {}",
                money(declared),
                money(tabled),
                money(specific)
            )
        });
    }
    trace.step(|| {
        let zone = params
            .zona
            .map(|z| format!("zona {}", z))
            .unwrap_or_else(|| "zona non indicata".to_string());
        format!(
            "massimo ammissibile {} m² × {} ({}) = {}",
            params.superficie,
            money(specific),
            zone,
            money(cost_cap)
        )
    });

    Aggregate { itot, cost_cap }
}
