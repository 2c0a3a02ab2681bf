//! Opaque envelope insulation: rows priced per m² by element.

use rust_decimal::Decimal;

use super::{mismatched, Aggregate};
use crate::ceiling::opaque_specific_cost;
use crate::numeric::{money, round_currency, sum, times};
use crate::trace::Tracer;
use crate::types::{InterventionId, InterventionParams, OpaqueElement, OpaqueRow};

/// A row needs an element and a positive surface.
fn valid_element(row: &OpaqueRow) -> Option<OpaqueElement> {
    match row.elemento {
        Some(element) if row.superficie > Decimal::ZERO => Some(element),
        _ => None,
    }
}

pub(super) fn aggregate<T: Tracer>(params: &InterventionParams, trace: &mut T) -> Aggregate {
    let InterventionParams::Opaque(params) = params else {
        return mismatched(InterventionId::OpaqueInsulation, params, trace);
    };

    let mut costs = Vec::with_capacity(params.righe.len());
    let mut caps = Vec::with_capacity(params.righe.len());
    for (index, row) in params.righe.iter().enumerate() {
        let n = index + 1;
        let Some(element) = valid_element(row) else {
            trace.step(|| format!("riga {}: elemento o superficie mancante, esclusa", n));
            trace.var(&format!("riga[{}].costo", n), Decimal::ZERO);
            trace.var(&format!("riga[{}].massimale", n), Decimal::ZERO);
            continue;
        };
        let specific = opaque_specific_cost(element);
        let cap = times(row.superficie, specific);
        trace.var(&format!("riga[{}].costo", n), round_currency(row.costo));
        trace.var(&format!("riga[{}].massimale", n), round_currency(cap));
        trace.step(|| {
            format!(
                "riga {}: {} {} m², costo {}, massimo ammissibile {} m² × {} = {}",
                n,
                element.key(),
                row.superficie,
                money(row.costo),
                row.superficie,
                money(specific),
                money(cap)
            )
        });
        costs.push(row.costo);
        caps.push(cap);
    }

    Aggregate {
        itot: sum(costs),
        cost_cap: sum(caps),
    }
}
