//! EV charging infrastructure: capped per charging point.

use rust_decimal::Decimal;

use super::{mismatched, Aggregate};
use crate::ceiling::{charging_point_cost, MAX_CHARGING_POINTS};
use crate::numeric::{money, times};
use crate::trace::Tracer;
use crate::types::{InterventionId, InterventionParams};

pub(super) fn aggregate<T: Tracer>(params: &InterventionParams, trace: &mut T) -> Aggregate {
    let InterventionParams::Charging(params) = params else {
        return mismatched(InterventionId::EvCharging, params, trace);
    };

    let itot = params.costo_totale;
    trace.step(|| format!("costo dichiarato {}", money(itot)));

    let points = params.punti.min(MAX_CHARGING_POINTS);
    let cost_cap = match params.tipo {
        Some(kind) => {
            let per_point = charging_point_cost(kind);
            let cap = times(Decimal::from(points), per_point);
            trace.var("costo_per_punto", per_point);
            trace.step(|| {
                if params.punti > MAX_CHARGING_POINTS {
                    format!(
                        "massimo ammissibile {} punti (su {} dichiarati) × {} = {}",
                        points,
                        params.punti,
                        money(per_point),
                        money(cap)
                    )
                } else {
                    format!(
                        "massimo ammissibile {} punti × {} = {}",
                        points,
                        money(per_point),
                        money(cap)
                    )
                }
            });
            cap
        }
        None => {
            trace.step(|| "tipo di infrastruttura non indicato: massimo ammissibile 0".to_string());
            Decimal::ZERO
        }
    };
    trace.var("punti", Decimal::from(points));

    Aggregate { itot, cost_cap }
}
