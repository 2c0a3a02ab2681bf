//! PV plant with optional storage.

use rust_decimal::Decimal;

use super::{mismatched, Aggregate};
use crate::ceiling::{pv_cost_per_kw, storage_cost_per_kwh, PV_MAX_POWER_KW};
use crate::numeric::{money, times};
use crate::trace::Tracer;
use crate::types::{InterventionId, InterventionParams};

pub(super) fn aggregate<T: Tracer>(params: &InterventionParams, trace: &mut T) -> Aggregate {
    let InterventionParams::Photovoltaic(params) = params else {
        return mismatched(InterventionId::PhotovoltaicStorage, params, trace);
    };

    let itot = params.costo_totale;
    trace.step(|| format!("costo dichiarato {}", money(itot)));

    let power = params.potenza_kw.max(Decimal::ZERO);
    let eligible_power = power.min(Decimal::from(PV_MAX_POWER_KW));
    let per_kw = pv_cost_per_kw(power);
    let plant = times(eligible_power, per_kw);
    let storage = times(params.accumulo_kwh.max(Decimal::ZERO), storage_cost_per_kwh());
    let cost_cap = plant.saturating_add(storage);

    trace.var("costo_per_kw", per_kw);
    trace.var("massimale_impianto", plant);
    trace.var("massimale_accumulo", storage);
    trace.step(|| {
        format!(
            "massimo ammissibile impianto {} kW × {} = {}",
            eligible_power,
            money(per_kw),
            money(plant)
        )
    });
    if !params.accumulo_kwh.is_zero() {
        trace.step(|| {
            format!(
                "massimo ammissibile accumulo {} kWh × {} = {}",
                params.accumulo_kwh,
                money(storage_cost_per_kwh()),
                money(storage)
            )
        });
    }

    Aggregate { itot, cost_cap }
}
