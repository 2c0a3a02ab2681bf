//! Biomass generators: rows priced per kW, scaled by the emission
//! coefficient Ce.

use rust_decimal::Decimal;

use super::{mismatched, Aggregate};
use crate::ceiling::{
    biomass_cost_per_kw, emission_coefficient, small_generator_limit_kw,
};
use crate::numeric::{money, round_currency, sum, times};
use crate::trace::Tracer;
use crate::types::{BiomassRow, EmissionClass, InterventionId, InterventionParams};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rejection {
    NoGenerator,
    NoPower,
    ClassNotAllowed,
    FourStarsTooLarge,
    PowerOutOfRange,
}

impl Rejection {
    fn describe(self) -> &'static str {
        match self {
            Rejection::NoGenerator => "tipo di generatore mancante",
            Rejection::NoPower => "potenza non positiva",
            Rejection::ClassNotAllowed => "classe ambientale non ammessa (servono 4 o 5 stelle)",
            Rejection::FourStarsTooLarge => "classe 4 stelle ammessa solo fino a 35 kW",
            Rejection::PowerOutOfRange => "potenza fuori dai limiti del generatore",
        }
    }
}

/// Returns the per-kW cap of a valid row, before Ce.
fn check_row(row: &BiomassRow) -> Result<Decimal, Rejection> {
    let generator = row.generatore.ok_or(Rejection::NoGenerator)?;
    if row.potenza_kw <= Decimal::ZERO {
        return Err(Rejection::NoPower);
    }
    match row.emission_class() {
        EmissionClass::FiveStars => {}
        EmissionClass::FourStars if row.potenza_kw <= small_generator_limit_kw() => {}
        EmissionClass::FourStars => return Err(Rejection::FourStarsTooLarge),
        EmissionClass::Other => return Err(Rejection::ClassNotAllowed),
    }
    biomass_cost_per_kw(generator, row.potenza_kw).ok_or(Rejection::PowerOutOfRange)
}

pub(super) fn aggregate<T: Tracer>(params: &InterventionParams, trace: &mut T) -> Aggregate {
    let InterventionParams::Biomass(params) = params else {
        return mismatched(InterventionId::Biomass, params, trace);
    };
    if let Some(zone) = params.zona {
        trace.step(|| format!("zona climatica {}: non incide sul costo unitario dei generatori", zone));
    }

    let mut costs = Vec::with_capacity(params.righe.len());
    let mut caps = Vec::with_capacity(params.righe.len());
    for (index, row) in params.righe.iter().enumerate() {
        let n = index + 1;
        let per_kw = match check_row(row) {
            Ok(per_kw) => per_kw,
            Err(reason) => {
                trace.var(&format!("riga[{}].costo", n), Decimal::ZERO);
                trace.var(&format!("riga[{}].massimale", n), Decimal::ZERO);
                trace.step(|| format!("riga {}: {}, esclusa", n, reason.describe()));
                continue;
            }
        };
        let ce = emission_coefficient(row.riduzione_emissioni);
        let cap = times(times(row.potenza_kw, per_kw), ce);
        trace.var(&format!("riga[{}].costo", n), round_currency(row.costo));
        trace.var(&format!("riga[{}].massimale", n), round_currency(cap));
        trace.step(|| {
            format!(
                "riga {}: {} kW classe {}, costo {}, massimo ammissibile {} kW × {} × Ce {} = {}",
                n,
                row.potenza_kw,
                row.classe.as_deref().unwrap_or("-"),
                money(row.costo),
                row.potenza_kw,
                money(per_kw),
                ce,
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::NoTrace;
    use crate::types::{BiomassGenerator, BiomassParams, EmissionReduction};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn boiler(power: &str, class: &str, cost: &str) -> BiomassRow {
        BiomassRow {
            generatore: Some(BiomassGenerator::Caldaia),
            potenza_kw: dec(power),
            riduzione_emissioni: None,
            classe: Some(class.to_string()),
            costo: dec(cost),
        }
    }

    #[test]
    fn class_rules() {
        assert_eq!(check_row(&boiler("35", "4", "1")), Ok(dec("450")));
        assert_eq!(
            check_row(&boiler("36", "4", "1")),
            Err(Rejection::FourStarsTooLarge)
        );
        assert_eq!(check_row(&boiler("400", "5", "1")), Ok(dec("350")));
        assert_eq!(check_row(&boiler("20", "3", "1")), Err(Rejection::ClassNotAllowed));
        assert_eq!(
            check_row(&boiler("2500", "5", "1")),
            Err(Rejection::PowerOutOfRange)
        );
    }

    #[test]
    fn stoves_are_small_only() {
        let mut stove = boiler("40", "5", "1");
        stove.generatore = Some(BiomassGenerator::Stufa);
        assert_eq!(check_row(&stove), Err(Rejection::PowerOutOfRange));
        stove.potenza_kw = dec("9");
        assert_eq!(check_row(&stove), Ok(dec("350")));
    }

    #[test]
    fn missing_generator_is_rejected() {
        let mut row = boiler("10", "5", "1");
        row.generatore = None;
        assert_eq!(check_row(&row), Err(Rejection::NoGenerator));
    }

    #[test]
    fn coefficient_scales_cap() {
        let mut row = boiler("10", "5", "8000");
        row.riduzione_emissioni = Some(EmissionReduction::Da20A50);
        let params = InterventionParams::Biomass(BiomassParams {
            zona: None,
            righe: vec![row],
        });
        let agg = aggregate(&params, &mut NoTrace);
        assert_eq!(agg.itot, dec("8000"));
        // 10 × 450 × 1.2
        assert_eq!(agg.cost_cap, dec("5400"));
    }
}
