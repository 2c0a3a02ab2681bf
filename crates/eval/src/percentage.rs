//! Incentive rate resolution.
//!
//! Rates are resolved in four tiers. The first three are exclusive, the
//! first match wins:
//!
//! 1. special-case overrides (building subcategory, small municipality),
//! 2. climate-zone rules, opaque-envelope insulation only,
//! 3. the base table, intervention × subject.
//!
//! Tier 4 adds premium increments on top of whichever rate fired, capped at
//! the intervention's policy maximum. An override is never reduced by that
//! maximum.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use tracing::debug;

use crate::numeric::{cap_rate, percent};
use crate::types::{
    BuildingSubcategory, ClimateZone, Context, InterventionFamily, InterventionId,
    InterventionParams, PercentageResult, PremiumId, PremiumIncrement, PvRegistry, SubjectType,
};

// ──────────────────────────────────────────────
// Tier 1: overrides
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
enum Scope {
    Only(&'static [InterventionId]),
    Family(InterventionFamily),
}

impl Scope {
    fn contains(&self, id: InterventionId) -> bool {
        match self {
            Scope::Only(ids) => ids.contains(&id),
            Scope::Family(family) => id.family() == *family,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Condition {
    Subcategory(&'static [BuildingSubcategory]),
    SmallMunicipalityBuilding,
}

impl Condition {
    fn holds(&self, ctx: &Context) -> bool {
        match self {
            Condition::Subcategory(allowed) => ctx
                .building_subcategory
                .map(|sub| allowed.contains(&sub))
                .unwrap_or(false),
            Condition::SmallMunicipalityBuilding => ctx.municipality.small_municipality_building(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct OverrideRule {
    scope: Scope,
    condition: Condition,
    rate: Decimal,
    description: &'static str,
}

const OVERRIDES: &[OverrideRule] = &[
    OverrideRule {
        scope: Scope::Only(&[InterventionId::EvCharging]),
        condition: Condition::Subcategory(&[BuildingSubcategory::Scuola]),
        rate: Decimal::ONE,
        description: "edificio scolastico pubblico: ricarica veicoli incentivata al 100%",
    },
    OverrideRule {
        scope: Scope::Only(&[InterventionId::EvCharging, InterventionId::PhotovoltaicStorage]),
        condition: Condition::SmallMunicipalityBuilding,
        rate: Decimal::ONE,
        description: "edificio di piccolo comune: ricarica e fotovoltaico incentivati al 100%",
    },
    OverrideRule {
        scope: Scope::Family(InterventionFamily::Envelope),
        condition: Condition::Subcategory(&[
            BuildingSubcategory::Scuola,
            BuildingSubcategory::Ospedale,
        ]),
        rate: Decimal::ONE,
        description: "edificio scolastico od ospedaliero pubblico: aliquota 100%",
    },
    OverrideRule {
        scope: Scope::Family(InterventionFamily::Envelope),
        condition: Condition::SmallMunicipalityBuilding,
        rate: Decimal::ONE,
        description: "edificio di piccolo comune: aliquota 100%",
    },
];

/// Overrides apply to public administrations only.
fn find_override(id: InterventionId, operator: SubjectType, ctx: &Context) -> Option<OverrideRule> {
    if operator != SubjectType::PublicAdministration {
        return None;
    }
    OVERRIDES
        .iter()
        .find(|rule| rule.scope.contains(id) && rule.condition.holds(ctx))
        .copied()
}

// ──────────────────────────────────────────────
// Tier 2: climate zone
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
struct ZoneRule {
    intervention: InterventionId,
    zones: &'static [ClimateZone],
    rate: Decimal,
}

/// Window replacement is deliberately absent: it never gets the zone bonus.
const ZONE_RULES: &[ZoneRule] = &[ZoneRule {
    intervention: InterventionId::OpaqueInsulation,
    zones: &[ClimateZone::E, ClimateZone::F],
    rate: RATE_50,
}];

fn find_zone_rule(id: InterventionId, zone: Option<ClimateZone>) -> Option<(ZoneRule, ClimateZone)> {
    let zone = zone?;
    ZONE_RULES
        .iter()
        .find(|rule| rule.intervention == id && rule.zones.contains(&zone))
        .map(|rule| (*rule, zone))
}

// ──────────────────────────────────────────────
// Tier 3: base table
// ──────────────────────────────────────────────

const RATE_20: Decimal = Decimal::from_parts(20, 0, 0, false, 2);
const RATE_30: Decimal = Decimal::from_parts(30, 0, 0, false, 2);
const RATE_40: Decimal = Decimal::from_parts(40, 0, 0, false, 2);
const RATE_50: Decimal = Decimal::from_parts(50, 0, 0, false, 2);
const RATE_65: Decimal = Decimal::from_parts(65, 0, 0, false, 2);

/// Base rate, `None` when the subject is not admitted to the intervention.
pub fn base_rate(id: InterventionId, operator: SubjectType) -> Option<Decimal> {
    use InterventionId::*;
    use SubjectType::*;

    match (id, operator) {
        (
            OpaqueInsulation | WindowReplacement | SolarShading | Lighting | BuildingAutomation,
            PrivateIndividual,
        ) => None,
        (
            OpaqueInsulation | WindowReplacement | SolarShading | Lighting | BuildingAutomation,
            _,
        ) => Some(RATE_40),
        (NzebTransformation, PublicAdministration) => Some(RATE_65),
        (NzebTransformation, TertiarySmall | TertiaryMedium | TertiaryLarge) => Some(RATE_50),
        (NzebTransformation, PrivateIndividual) => None,
        (EvCharging, _) => Some(RATE_30),
        (PhotovoltaicStorage, _) => Some(RATE_20),
        (HeatPump | Biomass, _) => Some(RATE_65),
    }
}

// ──────────────────────────────────────────────
// Tier 4: premiums and policy maxima
// ──────────────────────────────────────────────

/// Highest rate reachable through premiums.
pub fn policy_max(id: InterventionId) -> Decimal {
    match id {
        InterventionId::EvCharging => Decimal::from_parts(40, 0, 0, false, 2),
        InterventionId::PhotovoltaicStorage => Decimal::from_parts(35, 0, 0, false, 2),
        _ => RATE_65,
    }
}

/// Nominal increment of `premium` for `id`, `None` when it does not apply.
pub fn premium_increment(premium: PremiumId, id: InterventionId, ctx: &Context) -> Option<Decimal> {
    match premium {
        PremiumId::ComponentiUe => Some(Decimal::from_parts(10, 0, 0, false, 2)),
        PremiumId::AbbinamentoGeneratore => {
            let envelope_work = matches!(
                id,
                InterventionId::OpaqueInsulation | InterventionId::WindowReplacement
            );
            if envelope_work && ctx.includes_generator() {
                Some(Decimal::from_parts(15, 0, 0, false, 2))
            } else {
                None
            }
        }
    }
}

/// Rate bonus for PV modules listed in the technology registry.
pub fn registry_bonus(registry: PvRegistry) -> Decimal {
    match registry {
        PvRegistry::No => Decimal::ZERO,
        PvRegistry::SezioneA => Decimal::from_parts(5, 0, 0, false, 2),
        PvRegistry::SezioneB => Decimal::from_parts(10, 0, 0, false, 2),
        PvRegistry::SezioneC => Decimal::from_parts(15, 0, 0, false, 2),
    }
}

fn registry_label(registry: PvRegistry) -> &'static str {
    match registry {
        PvRegistry::No => "non iscritto",
        PvRegistry::SezioneA => "sezione A",
        PvRegistry::SezioneB => "sezione B",
        PvRegistry::SezioneC => "sezione C",
    }
}

fn premium_label(premium: PremiumId) -> &'static str {
    match premium {
        PremiumId::ComponentiUe => "premio componenti UE",
        PremiumId::AbbinamentoGeneratore => "premio abbinamento generatore",
    }
}

// ──────────────────────────────────────────────
// Resolution
// ──────────────────────────────────────────────

/// Resolve the incentive rate of one intervention.
///
/// Never fails: a subject not admitted to the intervention resolves to a
/// rate of zero, and `p_desc` says so.
pub fn determine_percentage(
    premiums: &BTreeSet<PremiumId>,
    params: &InterventionParams,
    operator: SubjectType,
    ctx: &Context,
    id: InterventionId,
) -> PercentageResult {
    let (rate, mut desc, ceiling) = if let Some(rule) = find_override(id, operator, ctx) {
        debug!(intervention = %id, rate = %rule.rate, "override rule fired");
        (rule.rate, rule.description.to_string(), rule.rate)
    } else {
        let Some(base) = base_rate(id, operator) else {
            debug!(intervention = %id, subject = %operator, "subject not admitted");
            return PercentageResult::not_admitted(format!(
                "intervento {} non ammesso per soggetto {}",
                id.key(),
                operator
            ));
        };
        match find_zone_rule(id, params.zone()) {
            Some((rule, zone)) => {
                debug!(intervention = %id, %zone, rate = %rule.rate, "climate zone rule fired");
                (
                    rule.rate,
                    format!(
                        "zona climatica {}: {} al {}",
                        zone,
                        id.label(),
                        percent(rule.rate)
                    ),
                    policy_max(id),
                )
            }
            None => {
                debug!(intervention = %id, subject = %operator, rate = %base, "base rate");
                (
                    base,
                    format!(
                        "aliquota base {} per {} ({})",
                        percent(base),
                        id.label(),
                        operator
                    ),
                    policy_max(id),
                )
            }
        }
    };

    let ceiling = ceiling.max(rate);
    let mut headroom = cap_rate(ceiling - rate, Decimal::ONE - rate);
    let mut p = rate;

    if let InterventionParams::Photovoltaic(pv) = params {
        if id == InterventionId::PhotovoltaicStorage && pv.registro != PvRegistry::No {
            let bonus = registry_bonus(pv.registro).min(headroom);
            headroom -= bonus;
            p += bonus;
            desc.push_str(&format!(
                " + registro FV {} (+{})",
                registry_label(pv.registro),
                percent(bonus)
            ));
        }
    }

    let mut applied = Vec::new();
    for premium in premiums {
        let Some(nominal) = premium_increment(*premium, id, ctx) else {
            continue;
        };
        let increment = nominal.min(headroom);
        if increment.is_zero() {
            desc.push_str(&format!(
                " ({} assorbito dal massimo {})",
                premium_label(*premium),
                percent(ceiling)
            ));
            continue;
        }
        headroom -= increment;
        p += increment;
        desc.push_str(&format!(
            " + {} (+{})",
            premium_label(*premium),
            percent(increment)
        ));
        applied.push(PremiumIncrement {
            premium: *premium,
            increment,
        });
    }

    PercentageResult {
        p: cap_rate(p, ceiling),
        p_desc: desc,
        premiums: applied,
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
