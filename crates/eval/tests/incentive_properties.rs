//! Property-style sweeps and worked scenarios for the incentive engine.
//!
//! Organized by category:
//!   A. Determinism and explain/evaluate consistency
//!   B. Clamping over a fixed grid of subjects, interventions and inputs
//!   C. Rate precedence (zone asymmetry, overrides)
//!   D. Ceiling-driven results
//!   E. Partial selections
//!   F. Worked scenarios

use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::json;
use termico_eval::types::MunicipalityFlags;
use termico_eval::{
    calculate_combined_incentives, evaluate, explain, Context, InterventionId, InterventionParams,
    PremiumId, SubjectType,
};

// ──────────────────────────────────────────────
// Test helpers
// ──────────────────────────────────────────────

const SUBJECTS: [SubjectType; 5] = [
    SubjectType::PrivateIndividual,
    SubjectType::TertiarySmall,
    SubjectType::TertiaryMedium,
    SubjectType::TertiaryLarge,
    SubjectType::PublicAdministration,
];

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn params(id: InterventionId, value: serde_json::Value) -> InterventionParams {
    InterventionParams::from_json(id, value).unwrap()
}

/// Representative inputs for `id`, scaled by `k`.
fn sample(id: InterventionId, k: u32) -> InterventionParams {
    let value = match id {
        InterventionId::OpaqueInsulation => json!({
            "zona": "D",
            "righe": [
                { "elemento": "parete_esterna", "superficie": 80 * k, "costo": 14000 * k },
                { "elemento": "copertura_esterna", "superficie": 40 * k, "costo": 15000 * k }
            ]
        }),
        InterventionId::WindowReplacement
        | InterventionId::SolarShading
        | InterventionId::NzebTransformation
        | InterventionId::Lighting
        | InterventionId::BuildingAutomation => json!({
            "zona": "C",
            "superficie": 30 * k,
            "costo_totale": 12000 * k
        }),
        InterventionId::EvCharging => json!({
            "tipo": "alta_potenza_50",
            "punti": k,
            "costo_totale": 45000 * k
        }),
        InterventionId::PhotovoltaicStorage => json!({
            "potenza_kw": 15 * k,
            "accumulo_kwh": 10,
            "costo_totale": 30000 * k,
            "registro": "sezione_b"
        }),
        InterventionId::HeatPump => json!({
            "zona": "E",
            "righe": [
                { "descrizione": "aria/acqua", "potenza_kw": 14 * k, "costo": 16000 * k },
                { "descrizione": "multisplit", "potenza_kw": 6, "costo": 5000, "gwp": 675 }
            ]
        }),
        InterventionId::Biomass => json!({
            "zona": "F",
            "righe": [
                { "generatore": "caldaia", "potenza_kw": 30, "classe": "5", "riduzione_emissioni": "oltre_50", "costo": 11000 * k }
            ]
        }),
    };
    params(id, value)
}

fn all_premiums() -> BTreeSet<PremiumId> {
    [PremiumId::ComponentiUe, PremiumId::AbbinamentoGeneratore]
        .into_iter()
        .collect()
}

// ──────────────────────────────────────────────
// A. Determinism and consistency
// ──────────────────────────────────────────────

#[test]
fn a01_evaluation_is_deterministic() {
    let ctx = Context::new().with_premium(PremiumId::ComponentiUe);
    for id in InterventionId::ALL {
        let p = sample(id, 2);
        let first = evaluate(id, &p, SubjectType::TertiarySmall, &ctx);
        let second = evaluate(id, &p, SubjectType::TertiarySmall, &ctx);
        assert_eq!(first, second, "{id}");
    }
}

#[test]
fn a02_explain_result_equals_finale() {
    let ctx = Context::new()
        .with_intervention(InterventionId::HeatPump)
        .with_premium(PremiumId::AbbinamentoGeneratore);
    for subject in SUBJECTS {
        for id in InterventionId::ALL {
            let p = sample(id, 3);
            let evaluated = evaluate(id, &p, subject, &ctx);
            let explained = explain(id, &p, subject, &ctx);
            assert_eq!(explained.result, evaluated.finale, "{id} / {subject}");
            assert_eq!(explained.variables["Itot"], evaluated.itot, "{id} / {subject}");
            assert_eq!(explained.variables["finale"], evaluated.finale, "{id} / {subject}");
        }
    }
}

// ──────────────────────────────────────────────
// B. Clamping grid
// ──────────────────────────────────────────────

#[test]
fn b01_finale_is_bounded_on_grid() {
    let contexts = [
        Context::new(),
        Context::new().with_premium(PremiumId::ComponentiUe),
        Context::new()
            .with_subcategory(termico_eval::types::BuildingSubcategory::Scuola)
            .with_intervention(InterventionId::Biomass),
    ];
    for ctx in &contexts {
        for subject in SUBJECTS {
            for id in InterventionId::ALL {
                for k in [0, 1, 7, 40] {
                    let r = evaluate(id, &sample(id, k), subject, ctx);
                    let label = format!("{id} / {subject} / k={k}");
                    assert!(r.finale >= Decimal::ZERO, "{label}");
                    assert!(r.finale <= r.itot, "{label}");
                    assert!(r.finale <= r.imas, "{label}");
                    assert!(r.finale <= r.massimale_soggetto, "{label}");
                    assert!(r.p >= Decimal::ZERO && r.p <= Decimal::ONE, "{label}");
                }
            }
        }
    }
}

#[test]
fn b02_amounts_have_at_most_two_decimals() {
    let p = params(
        InterventionId::Lighting,
        json!({ "superficie": "333.333", "costo_totale": "4444.445" }),
    );
    let r = evaluate(
        InterventionId::Lighting,
        &p,
        SubjectType::TertiaryMedium,
        &Context::new(),
    );
    for amount in [r.itot, r.imas, r.massimale_soggetto, r.finale] {
        assert!(amount.scale() <= 2, "{amount}");
    }
    assert_eq!(r.itot, dec("4444.44"));
}

#[test]
fn b03_excluded_subject_gets_zero() {
    for id in [
        InterventionId::OpaqueInsulation,
        InterventionId::WindowReplacement,
        InterventionId::NzebTransformation,
    ] {
        let r = evaluate(id, &sample(id, 1), SubjectType::PrivateIndividual, &Context::new());
        assert_eq!(r.finale, Decimal::ZERO, "{id}");
        assert!(r.p_desc.contains("non ammesso"), "{id}");
    }
}

// ──────────────────────────────────────────────
// C. Rate precedence
// ──────────────────────────────────────────────

#[test]
fn c01_zone_e_favours_opaque_over_windows() {
    let opaque = params(
        InterventionId::OpaqueInsulation,
        json!({ "zona": "E", "righe": [] }),
    );
    let windows = params(InterventionId::WindowReplacement, json!({ "zona": "E" }));
    for subject in [
        SubjectType::TertiarySmall,
        SubjectType::TertiaryLarge,
        SubjectType::PublicAdministration,
    ] {
        let o = evaluate(InterventionId::OpaqueInsulation, &opaque, subject, &Context::new());
        let w = evaluate(InterventionId::WindowReplacement, &windows, subject, &Context::new());
        assert!(o.p > w.p, "{subject}");
    }
}

#[test]
fn c02_school_override_beats_everything() {
    let ctx = Context::new()
        .with_subcategory(termico_eval::types::BuildingSubcategory::Scuola)
        .with_municipality(MunicipalityFlags {
            is_comune: true,
            is_edificio_comunale: true,
            is_piccolo_comune: true,
        })
        .with_premium(PremiumId::ComponentiUe);
    let r = evaluate(
        InterventionId::EvCharging,
        &sample(InterventionId::EvCharging, 1),
        SubjectType::PublicAdministration,
        &ctx,
    );
    assert_eq!(r.p, Decimal::ONE);
    assert!(r.p_desc.contains("scolastico"));
}

#[test]
fn c03_premiums_never_exceed_policy_maximum() {
    let ctx = Context::new().with_intervention(InterventionId::Biomass);
    let premiums = all_premiums();
    for id in InterventionId::ALL {
        let r = termico_eval::determine_percentage(
            &premiums,
            &sample(id, 1),
            SubjectType::TertiarySmall,
            &ctx,
            id,
        );
        assert!(r.p <= termico_eval::percentage::policy_max(id), "{id}");
    }
}

// ──────────────────────────────────────────────
// D. Ceiling-driven results
// ──────────────────────────────────────────────

#[test]
fn d01_ev_charging_limited_by_point_cap() {
    let p = params(
        InterventionId::EvCharging,
        json!({ "tipo": "trifase", "punti": 2, "costo_totale": 100000 }),
    );
    let r = evaluate(
        InterventionId::EvCharging,
        &p,
        SubjectType::PublicAdministration,
        &Context::new(),
    );
    // 2 × 8400 × 0.30
    assert_eq!(r.imas, dec("5040"));
    assert!(r.imas < r.itot * r.p);
    assert_eq!(r.finale, r.imas);
}

#[test]
fn d02_subject_ceiling_binds_for_large_tertiary() {
    let p = params(
        InterventionId::HeatPump,
        json!({ "righe": [ { "descrizione": "aria/acqua", "potenza_kw": 10, "costo": 10000 } ] }),
    );
    let r = evaluate(
        InterventionId::HeatPump,
        &p,
        SubjectType::TertiaryLarge,
        &Context::new(),
    );
    // Itot × p = 6500, Imas = 9750, MassimaleSoggetto = 4500
    assert_eq!(r.massimale_soggetto, dec("4500"));
    assert_eq!(r.finale, dec("4500"));
}

#[test]
fn d03_declared_specific_cost_bounds_lighting() {
    let p = params(
        InterventionId::Lighting,
        json!({ "superficie": 100, "costo_totale": 1500, "costo_specifico": 5 }),
    );
    let r = evaluate(
        InterventionId::Lighting,
        &p,
        SubjectType::PublicAdministration,
        &Context::new(),
    );
    // 100 m² × 5 × 0.40, although Itot × p = 600
    assert_eq!(r.itot, dec("1500"));
    assert_eq!(r.imas, dec("200"));
    assert_eq!(r.finale, dec("200"));

    let explained = explain(
        InterventionId::Lighting,
        &p,
        SubjectType::PublicAdministration,
        &Context::new(),
    );
    assert_eq!(explained.result, r.finale);
    assert_eq!(explained.variables["costo_specifico_dichiarato"], dec("5"));
}

// ──────────────────────────────────────────────
// E. Partial selections
// ──────────────────────────────────────────────

#[test]
fn e01_unknown_key_leaves_known_results_unchanged() {
    let mut inputs = BTreeMap::new();
    inputs.insert("biomassa".to_string(), sample(InterventionId::Biomass, 1));
    inputs.insert("pompa_calore".to_string(), sample(InterventionId::HeatPump, 1));

    let known: Vec<String> = vec!["biomassa".into(), "pompa_calore".into()];
    let with_unknown: Vec<String> = vec!["biomassa".into(), "cappotto_magico".into(), "pompa_calore".into()];

    let a = calculate_combined_incentives(
        &known,
        &inputs,
        SubjectType::PrivateIndividual,
        &BTreeSet::new(),
        &Context::new(),
    );
    let b = calculate_combined_incentives(
        &with_unknown,
        &inputs,
        SubjectType::PrivateIndividual,
        &BTreeSet::new(),
        &Context::new(),
    );

    assert_eq!(a.get(InterventionId::Biomass), b.get(InterventionId::Biomass));
    assert_eq!(a.get(InterventionId::HeatPump), b.get(InterventionId::HeatPump));
    assert_eq!(a.totals, b.totals);
    let unknown = b.get_key("cappotto_magico").unwrap();
    assert_eq!(unknown.finale, Decimal::ZERO);
    assert_eq!(unknown.itot, Decimal::ZERO);
    assert_eq!(b.per_intervention.len(), 3);
}

#[test]
fn e02_repeated_keys_are_evaluated_once() {
    let mut inputs = BTreeMap::new();
    inputs.insert("biomassa".to_string(), sample(InterventionId::Biomass, 1));
    inputs.insert("pompa_calore".to_string(), sample(InterventionId::HeatPump, 1));

    let once: Vec<String> = vec!["pompa_calore".into(), "biomassa".into()];
    let repeated: Vec<String> = vec![
        "pompa_calore".into(),
        "biomassa".into(),
        "POMPA_CALORE".into(),
        "biomassa".into(),
    ];

    let a = calculate_combined_incentives(
        &once,
        &inputs,
        SubjectType::PrivateIndividual,
        &all_premiums(),
        &Context::new(),
    );
    let b = calculate_combined_incentives(
        &repeated,
        &inputs,
        SubjectType::PrivateIndividual,
        &all_premiums(),
        &Context::new(),
    );

    assert_eq!(a, b);
    assert_eq!(b.per_intervention.len(), 2);
}

// ──────────────────────────────────────────────
// F. Worked scenarios
// ──────────────────────────────────────────────

#[test]
fn f01_single_insulation_row_zone_a() {
    let p = params(
        InterventionId::OpaqueInsulation,
        json!({
            "zona": "A",
            "righe": [ { "elemento": "copertura_esterna", "superficie": 100, "costo": 100000 } ]
        }),
    );
    let r = evaluate(
        InterventionId::OpaqueInsulation,
        &p,
        SubjectType::PublicAdministration,
        &Context::new(),
    );
    assert_eq!(r.itot, dec("100000"));
    assert_eq!(r.p, dec("0.40"));
    assert!(r.p_desc.contains("aliquota base"));
    // 100 m² × 300 €/m² × 0.40
    assert_eq!(r.imas, dec("12000"));
    assert_eq!(r.massimale_soggetto, dec("100000"));
    let expected = (r.itot * r.p).min(r.imas).min(r.massimale_soggetto);
    assert_eq!(r.finale, expected);
}

#[test]
fn f02_biomass_rows_all_qualify() {
    let p = params(
        InterventionId::Biomass,
        json!({
            "zona": "B",
            "righe": [
                { "generatore": "caldaia", "potenza_kw": 32, "classe": "4", "costo": 12000 },
                { "generatore": "stufa", "potenza_kw": 25, "classe": "5", "costo": 8000 },
                { "generatore": "termocamino", "potenza_kw": 10, "classe": "4", "costo": 5000 }
            ]
        }),
    );
    let ctx = Context::new();
    let r = evaluate(InterventionId::Biomass, &p, SubjectType::PrivateIndividual, &ctx);
    assert_eq!(r.itot, dec("25000"));
    assert_eq!(r.p, dec("0.65"));
    // (32 × 450 + 25 × 350 + 10 × 350) × 0.65
    assert_eq!(r.imas, dec("17322.50"));
    assert_eq!(r.finale, dec("16250"));

    let e = explain(InterventionId::Biomass, &p, SubjectType::PrivateIndividual, &ctx);
    assert!(!e.steps.is_empty());
    for row in ["riga 1", "riga 2", "riga 3"] {
        assert!(e.steps.iter().any(|s| s.starts_with(row)), "{row}");
    }
    assert!(e.steps.iter().all(|s| !s.contains("esclusa")));
    assert_eq!(e.variables["riga[2].costo"], dec("8000"));
    assert_eq!(e.variables["riga[3].massimale"], dec("3500"));
}
