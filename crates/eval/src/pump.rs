//! Heat-pump typology classifier.
//!
//! Decides from a free-text description which performance values a
//! heat-pump row must declare: the COP for fixed double-duct units, the
//! refrigerant GWP for split/multisplit, fixed double-duct and brine-to-air
//! units. VRF/VRV systems require neither.

use serde::Serialize;

/// Which declared values a heat-pump row needs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PumpFlags {
    pub needs_cop: bool,
    pub needs_gwp: bool,
}

const VRF: &[&str] = &["vrf", "vrv"];
const FIXED: &[&str] = &["fisso", "fissa", "fissi", "fixed"];
const DOUBLE_DUCT: &[&str] = &["doppio condotto", "doppio-condotto", "double duct", "double-duct"];
const SPLIT: &[&str] = &["split"];
const BRINE_TO_AIR: &[&str] = &[
    "salamoia/aria",
    "salamoia-aria",
    "salamoia aria",
    "brine-to-air",
    "brine/air",
    "brine to air",
];

fn mentions(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| text.contains(needle))
}

/// Classify a heat-pump description. Matching is case-insensitive.
pub fn detect_pump_flags(description: &str) -> PumpFlags {
    let text = description.to_lowercase();
    if mentions(&text, VRF) {
        return PumpFlags::default();
    }

    let fixed_double_duct = mentions(&text, FIXED) && mentions(&text, DOUBLE_DUCT);
    // "multisplit" contains "split".
    let split = mentions(&text, SPLIT);
    let brine_to_air = mentions(&text, BRINE_TO_AIR);

    PumpFlags {
        needs_cop: fixed_double_duct,
        needs_gwp: split || fixed_double_duct || brine_to_air,
    }
}
