//! Electric heat pumps: rows priced per kW, validity depends on the
//! typology named in the description.

use rust_decimal::Decimal;

use super::{mismatched, Aggregate};
use crate::ceiling::heat_pump_cost_per_kw;
use crate::numeric::{money, round_currency, sum, times};
use crate::pump::detect_pump_flags;
use crate::trace::Tracer;
use crate::types::{HeatPumpRow, InterventionId, InterventionParams};

/// Why a heat-pump row was excluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rejection {
    NoPower,
    TooLarge,
    MissingCop,
    MissingGwp,
}

impl Rejection {
    fn describe(self) -> &'static str {
        match self {
            Rejection::NoPower => "potenza non positiva",
            Rejection::TooLarge => "potenza oltre 2000 kW",
            Rejection::MissingCop => "COP richiesto ma non dichiarato",
            Rejection::MissingGwp => "GWP richiesto ma non dichiarato",
        }
    }
}

/// Returns the per-kW cap of a valid row.
fn check_row(row: &HeatPumpRow) -> Result<Decimal, Rejection> {
    if row.potenza_kw <= Decimal::ZERO {
        return Err(Rejection::NoPower);
    }
    let per_kw = heat_pump_cost_per_kw(row.potenza_kw).ok_or(Rejection::TooLarge)?;
    let flags = detect_pump_flags(&row.descrizione);
    if flags.needs_cop && row.cop.is_none() {
        return Err(Rejection::MissingCop);
    }
    if flags.needs_gwp && row.gwp.is_none() {
        return Err(Rejection::MissingGwp);
    }
    Ok(per_kw)
}

pub(super) fn aggregate<T: Tracer>(params: &InterventionParams, trace: &mut T) -> Aggregate {
    let InterventionParams::HeatPump(params) = params else {
        return mismatched(InterventionId::HeatPump, params, trace);
    };
    if let Some(zone) = params.zona {
        trace.step(|| format!("zona climatica {}: non incide sul costo unitario dei generatori", zone));
    }

    let mut costs = Vec::with_capacity(params.righe.len());
    let mut caps = Vec::with_capacity(params.righe.len());
    for (index, row) in params.righe.iter().enumerate() {
        let n = index + 1;
        match check_row(row) {
            Ok(per_kw) => {
                let cap = times(row.potenza_kw, per_kw);
                trace.var(&format!("riga[{}].costo", n), round_currency(row.costo));
                trace.var(&format!("riga[{}].massimale", n), round_currency(cap));
                trace.step(|| {
                    format!(
                        "riga {}: \"{}\" {} kW, costo {}, massimo ammissibile {} kW × {} = {}",
                        n,
                        row.descrizione,
                        row.potenza_kw,
                        money(row.costo),
                        row.potenza_kw,
                        money(per_kw),
                        money(cap)
                    )
                });
                costs.push(row.costo);
                caps.push(cap);
            }
            Err(reason) => {
                trace.var(&format!("riga[{}].costo", n), Decimal::ZERO);
                trace.var(&format!("riga[{}].massimale", n), Decimal::ZERO);
                trace.step(|| format!("riga {}: {}, esclusa", n, reason.describe()));
            }
        }
    }

    Aggregate {
        itot: sum(costs),
        cost_cap: sum(caps),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::{Explanation, NoTrace};
    use crate::types::{ClimateZone, HeatPumpParams};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn pump(description: &str, power: &str, cost: &str) -> HeatPumpRow {
        HeatPumpRow {
            descrizione: description.to_string(),
            potenza_kw: dec(power),
            costo: dec(cost),
            cop: None,
            gwp: None,
        }
    }

    #[test]
    fn brackets_apply_per_row() {
        let params = InterventionParams::HeatPump(HeatPumpParams {
            zona: None,
            righe: vec![
                pump("aria/acqua", "12", "15000"),
                pump("aria/acqua", "80", "70000"),
            ],
        });
        let agg = aggregate(&params, &mut NoTrace);
        assert_eq!(agg.itot, dec("85000"));
        // 12 × 1500 + 80 × 1200
        assert_eq!(agg.cost_cap, dec("114000"));
    }

    #[test]
    fn zone_is_narrated_but_leaves_caps_unchanged() {
        let righe = vec![pump("aria/acqua", "20", "18000")];
        let without = InterventionParams::HeatPump(HeatPumpParams {
            zona: None,
            righe: righe.clone(),
        });
        let with = InterventionParams::HeatPump(HeatPumpParams {
            zona: Some(ClimateZone::F),
            righe,
        });
        let mut e = Explanation::new();
        assert_eq!(aggregate(&with, &mut e), aggregate(&without, &mut NoTrace));
        assert!(e.steps()[0].contains("zona climatica F"));
    }

    #[test]
    fn split_without_gwp_is_rejected() {
        let mut split = pump("multisplit", "7", "6000");
        let params = InterventionParams::HeatPump(HeatPumpParams {
            zona: None,
            righe: vec![split.clone()],
        });
        let mut e = Explanation::new();
        assert_eq!(aggregate(&params, &mut e).itot, Decimal::ZERO);
        assert!(e.steps()[0].contains("GWP"));

        split.gwp = Some(dec("675"));
        let params = InterventionParams::HeatPump(HeatPumpParams {
            zona: None,
            righe: vec![split],
        });
        assert_eq!(aggregate(&params, &mut NoTrace).itot, dec("6000"));
    }

    #[test]
    fn fixed_double_duct_requires_cop() {
        let mut row = pump("fisso a doppio condotto", "3", "2500");
        row.gwp = Some(dec("3"));
        assert_eq!(check_row(&row), Err(Rejection::MissingCop));
        row.cop = Some(dec("2.6"));
        assert_eq!(check_row(&row), Ok(dec("1500")));
    }

    #[test]
    fn power_bounds() {
        assert_eq!(check_row(&pump("aria/acqua", "0", "1")), Err(Rejection::NoPower));
        assert_eq!(check_row(&pump("aria/acqua", "2500", "1")), Err(Rejection::TooLarge));
        assert_eq!(check_row(&pump("VRF", "2000", "1")), Ok(dec("1000")));
    }
}
