//! Incentive ceilings.
//!
//! Two kinds of ceiling bound every incentive:
//!
//! * `MassimaleSoggetto`, derived from the subject category: the maximum
//!   aid intensity the subject may receive, applied to the eligible cost;
//! * `Imas`, derived from the intervention's unit caps (cost per m², per
//!   charging point, per kW). The tables live here; the evaluators combine
//!   them with the declared quantities.
//!
//! A ceiling of zero marks an ineligible subject/intervention pair.

use rust_decimal::Decimal;

use crate::numeric::{apply_rate, money, percent};
use crate::trace::Tracer;
use crate::types::{
    BiomassGenerator, ChargerType, ClimateZone, Context, EmissionReduction, InterventionFamily,
    InterventionId, InterventionParams, OpaqueElement, SubjectType,
};

// ──────────────────────────────────────────────
// Subject ceiling
// ──────────────────────────────────────────────

/// Maximum aid intensity (share of the eligible cost) for a subject.
pub fn subject_intensity(id: InterventionId, operator: SubjectType) -> Decimal {
    let family = id.family();
    match operator {
        SubjectType::PublicAdministration => Decimal::ONE,
        SubjectType::TertiarySmall => match family {
            InterventionFamily::Envelope => Decimal::new(50, 2),
            InterventionFamily::Generation => Decimal::new(65, 2),
        },
        SubjectType::TertiaryMedium => match family {
            InterventionFamily::Envelope => Decimal::new(40, 2),
            InterventionFamily::Generation => Decimal::new(55, 2),
        },
        SubjectType::TertiaryLarge => match family {
            InterventionFamily::Envelope => Decimal::new(30, 2),
            InterventionFamily::Generation => Decimal::new(45, 2),
        },
        SubjectType::PrivateIndividual => match id {
            InterventionId::EvCharging
            | InterventionId::PhotovoltaicStorage
            | InterventionId::HeatPump
            | InterventionId::Biomass => Decimal::ONE,
            _ => Decimal::ZERO,
        },
    }
}

/// `MassimaleSoggetto` for an already aggregated eligible cost.
pub fn massimale_for_cost(id: InterventionId, itot: Decimal, operator: SubjectType) -> Decimal {
    apply_rate(itot, subject_intensity(id, operator)).max(Decimal::ZERO)
}

/// Same as [`massimale_for_cost`], narrating the step.
pub(crate) fn resolve_massimale<T: Tracer>(
    id: InterventionId,
    itot: Decimal,
    operator: SubjectType,
    trace: &mut T,
) -> Decimal {
    let intensity = subject_intensity(id, operator);
    let massimale = massimale_for_cost(id, itot, operator);
    trace.var("intensita_soggetto", intensity);
    trace.var("MassimaleSoggetto", massimale);
    trace.step(|| {
        if intensity.is_zero() {
            format!(
                "MassimaleSoggetto = 0: soggetto {} non ammesso a {}",
                operator,
                id.label()
            )
        } else {
            format!(
                "MassimaleSoggetto = {} × Itot ({}) = {}",
                percent(intensity),
                operator,
                money(massimale)
            )
        }
    });
    massimale
}

/// Subject ceiling of one intervention, aggregating its inputs first.
pub fn massimale_soggetto(
    id: InterventionId,
    params: &InterventionParams,
    operator: SubjectType,
    _ctx: &Context,
) -> Decimal {
    let itot = crate::interventions::eligible_cost(id, params);
    massimale_for_cost(id, itot, operator)
}

// ──────────────────────────────────────────────
// Unit caps
// ──────────────────────────────────────────────

/// Absolute incentive cap per intervention, `None` when only unit caps apply.
pub fn absolute_cap(id: InterventionId) -> Option<Decimal> {
    match id {
        InterventionId::OpaqueInsulation => Some(Decimal::from(1_000_000)),
        InterventionId::WindowReplacement => Some(Decimal::from(500_000)),
        InterventionId::SolarShading => Some(Decimal::from(90_000)),
        InterventionId::NzebTransformation => Some(Decimal::from(2_500_000)),
        InterventionId::Lighting => Some(Decimal::from(100_000)),
        InterventionId::BuildingAutomation => Some(Decimal::from(100_000)),
        InterventionId::EvCharging
        | InterventionId::PhotovoltaicStorage
        | InterventionId::HeatPump
        | InterventionId::Biomass => None,
    }
}

/// Maximum eligible cost per m² of an opaque element.
pub fn opaque_specific_cost(element: OpaqueElement) -> Decimal {
    let eur = match element {
        OpaqueElement::CoperturaEsterna => 300,
        OpaqueElement::CoperturaInterna => 150,
        OpaqueElement::CoperturaVentilata => 350,
        OpaqueElement::PavimentoEsterno => 170,
        OpaqueElement::PavimentoInterno => 150,
        OpaqueElement::PareteEsterna => 200,
        OpaqueElement::PareteInterna => 100,
        OpaqueElement::PareteVentilata => 250,
    };
    Decimal::from(eur)
}

/// Maximum eligible cost per m² for surface-priced interventions.
///
/// Unknown zones use the lower (warm-zone) value.
pub fn surface_specific_cost(id: InterventionId, zone: Option<ClimateZone>) -> Option<Decimal> {
    let cold = zone.map(|z| z.is_cold()).unwrap_or(false);
    let eur = match id {
        InterventionId::WindowReplacement if cold => 800,
        InterventionId::WindowReplacement => 700,
        InterventionId::SolarShading => 250,
        InterventionId::NzebTransformation if cold => 1_500,
        InterventionId::NzebTransformation => 1_300,
        InterventionId::Lighting => 15,
        InterventionId::BuildingAutomation => 50,
        _ => return None,
    };
    Some(Decimal::from(eur))
}

/// Charging points beyond this count earn no additional cap.
pub const MAX_CHARGING_POINTS: u32 = 50;

/// Maximum eligible cost per charging point.
pub fn charging_point_cost(kind: ChargerType) -> Decimal {
    let eur = match kind {
        ChargerType::Monofase => 2_400,
        ChargerType::Trifase => 8_400,
        ChargerType::AltaPotenza50 => 30_000,
        ChargerType::AltaPotenza100 => 60_000,
    };
    Decimal::from(eur)
}

/// PV power beyond this size earns no additional cap.
pub const PV_MAX_POWER_KW: u32 = 1_000;

/// Maximum eligible cost per kW of PV, by bracket of the declared power.
pub fn pv_cost_per_kw(power_kw: Decimal) -> Decimal {
    let eur = if power_kw <= Decimal::from(20) {
        1_500
    } else if power_kw <= Decimal::from(200) {
        1_200
    } else if power_kw <= Decimal::from(600) {
        1_100
    } else {
        1_050
    };
    Decimal::from(eur)
}

/// Maximum eligible cost per kWh of storage.
pub fn storage_cost_per_kwh() -> Decimal {
    Decimal::from(1_000)
}

/// Maximum eligible cost per kW of a heat pump, `None` above 2 MW.
pub fn heat_pump_cost_per_kw(power_kw: Decimal) -> Option<Decimal> {
    let eur = if power_kw <= Decimal::from(35) {
        1_500
    } else if power_kw <= Decimal::from(100) {
        1_200
    } else if power_kw <= Decimal::from(2_000) {
        1_000
    } else {
        return None;
    };
    Some(Decimal::from(eur))
}

/// Power limit for class-4 generators, stoves and fireplaces.
pub fn small_generator_limit_kw() -> Decimal {
    Decimal::from(35)
}

/// Maximum eligible cost per kW of a biomass generator, `None` when the
/// generator/power combination is not eligible.
pub fn biomass_cost_per_kw(generator: BiomassGenerator, power_kw: Decimal) -> Option<Decimal> {
    let eur = match generator {
        BiomassGenerator::Caldaia => {
            if power_kw <= small_generator_limit_kw() {
                450
            } else if power_kw <= Decimal::from(500) {
                350
            } else if power_kw <= Decimal::from(2_000) {
                250
            } else {
                return None;
            }
        }
        BiomassGenerator::Stufa | BiomassGenerator::Termocamino => {
            if power_kw <= small_generator_limit_kw() {
                350
            } else {
                return None;
            }
        }
    };
    Some(Decimal::from(eur))
}

/// Cap coefficient (Ce) for the declared emission-reduction bracket.
pub fn emission_coefficient(reduction: Option<EmissionReduction>) -> Decimal {
    match reduction {
        None | Some(EmissionReduction::Fino20) => Decimal::ONE,
        Some(EmissionReduction::Da20A50) => Decimal::new(12, 1),
        Some(EmissionReduction::Oltre50) => Decimal::new(15, 1),
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
