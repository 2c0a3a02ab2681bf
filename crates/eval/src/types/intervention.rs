//! Closed enumerations describing interventions, subjects and the
//! evaluation context.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// One renovation category eligible for the incentive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum InterventionId {
    #[serde(rename = "opache")]
    OpaqueInsulation,
    #[serde(rename = "serramenti")]
    WindowReplacement,
    #[serde(rename = "schermature")]
    SolarShading,
    #[serde(rename = "nzeb")]
    NzebTransformation,
    #[serde(rename = "illuminazione")]
    Lighting,
    #[serde(rename = "building_automation")]
    BuildingAutomation,
    #[serde(rename = "ricarica_veicoli")]
    EvCharging,
    #[serde(rename = "fotovoltaico")]
    PhotovoltaicStorage,
    #[serde(rename = "pompa_calore")]
    HeatPump,
    #[serde(rename = "biomassa")]
    Biomass,
}

/// Policy family an intervention belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterventionFamily {
    /// Energy-efficiency works on the building (Titolo II).
    Envelope,
    /// Thermal generation from renewable sources (Titolo III).
    Generation,
}

impl InterventionId {
    pub const ALL: [InterventionId; 10] = [
        InterventionId::OpaqueInsulation,
        InterventionId::WindowReplacement,
        InterventionId::SolarShading,
        InterventionId::NzebTransformation,
        InterventionId::Lighting,
        InterventionId::BuildingAutomation,
        InterventionId::EvCharging,
        InterventionId::PhotovoltaicStorage,
        InterventionId::HeatPump,
        InterventionId::Biomass,
    ];

    /// Stable key used in project files and by the registry.
    pub fn key(&self) -> &'static str {
        match self {
            InterventionId::OpaqueInsulation => "opache",
            InterventionId::WindowReplacement => "serramenti",
            InterventionId::SolarShading => "schermature",
            InterventionId::NzebTransformation => "nzeb",
            InterventionId::Lighting => "illuminazione",
            InterventionId::BuildingAutomation => "building_automation",
            InterventionId::EvCharging => "ricarica_veicoli",
            InterventionId::PhotovoltaicStorage => "fotovoltaico",
            InterventionId::HeatPump => "pompa_calore",
            InterventionId::Biomass => "biomassa",
        }
    }

    pub fn parse(key: &str) -> Option<Self> {
        let key = key.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|id| id.key() == key)
    }

    pub fn family(&self) -> InterventionFamily {
        match self {
            InterventionId::HeatPump | InterventionId::Biomass => InterventionFamily::Generation,
            _ => InterventionFamily::Envelope,
        }
    }

    /// Human-readable label used in explanation steps.
    pub fn label(&self) -> &'static str {
        match self {
            InterventionId::OpaqueInsulation => "isolamento superfici opache",
            InterventionId::WindowReplacement => "sostituzione chiusure trasparenti",
            InterventionId::SolarShading => "schermature solari",
            InterventionId::NzebTransformation => "trasformazione in NZEB",
            InterventionId::Lighting => "illuminazione efficiente",
            InterventionId::BuildingAutomation => "building automation",
            InterventionId::EvCharging => "infrastrutture di ricarica veicoli elettrici",
            InterventionId::PhotovoltaicStorage => "fotovoltaico con accumulo",
            InterventionId::HeatPump => "pompe di calore",
            InterventionId::Biomass => "generatori a biomassa",
        }
    }
}

impl fmt::Display for InterventionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Category of the subject requesting the incentive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SubjectType {
    #[serde(rename = "privato")]
    PrivateIndividual,
    #[serde(rename = "terziario_piccola")]
    TertiarySmall,
    #[serde(rename = "terziario_media")]
    TertiaryMedium,
    #[serde(rename = "terziario_grande")]
    TertiaryLarge,
    #[serde(rename = "pubblica_amministrazione")]
    PublicAdministration,
}

impl SubjectType {
    pub fn key(&self) -> &'static str {
        match self {
            SubjectType::PrivateIndividual => "privato",
            SubjectType::TertiarySmall => "terziario_piccola",
            SubjectType::TertiaryMedium => "terziario_media",
            SubjectType::TertiaryLarge => "terziario_grande",
            SubjectType::PublicAdministration => "pubblica_amministrazione",
        }
    }
}

impl fmt::Display for SubjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingSubcategory {
    Scuola,
    Ospedale,
    Uffici,
    Residenziale,
    Altro,
}

/// Climate zone classification (A warmest, F coldest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ClimateZone {
    A,
    B,
    C,
    D,
    E,
    F,
}

impl ClimateZone {
    /// Zones D, E and F use the higher specific-cost caps.
    pub fn is_cold(&self) -> bool {
        matches!(self, ClimateZone::D | ClimateZone::E | ClimateZone::F)
    }
}

impl fmt::Display for ClimateZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            ClimateZone::A => "A",
            ClimateZone::B => "B",
            ClimateZone::C => "C",
            ClimateZone::D => "D",
            ClimateZone::E => "E",
            ClimateZone::F => "F",
        };
        write!(f, "{}", letter)
    }
}

/// Additional rate increments a project may claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PremiumId {
    /// Components manufactured in the European Union.
    ComponentiUe,
    /// Envelope works paired with a generator replacement.
    AbbinamentoGeneratore,
}

impl PremiumId {
    pub fn key(&self) -> &'static str {
        match self {
            PremiumId::ComponentiUe => "componenti_ue",
            PremiumId::AbbinamentoGeneratore => "abbinamento_generatore",
        }
    }
}

impl fmt::Display for PremiumId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Municipality attributes of the building owner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MunicipalityFlags {
    #[serde(default)]
    pub is_comune: bool,
    #[serde(default)]
    pub is_edificio_comunale: bool,
    #[serde(default)]
    pub is_piccolo_comune: bool,
}

impl MunicipalityFlags {
    /// Building owned by a small municipality.
    pub fn small_municipality_building(&self) -> bool {
        self.is_comune && self.is_edificio_comunale && self.is_piccolo_comune
    }
}

/// Immutable evaluation context shared by every intervention of a project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    #[serde(default)]
    pub selected_interventions: BTreeSet<InterventionId>,
    #[serde(default)]
    pub selected_premiums: BTreeSet<PremiumId>,
    #[serde(default)]
    pub building_subcategory: Option<BuildingSubcategory>,
    #[serde(default)]
    pub municipality: MunicipalityFlags,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_subcategory(mut self, subcategory: BuildingSubcategory) -> Self {
        self.building_subcategory = Some(subcategory);
        self
    }

    pub fn with_municipality(mut self, municipality: MunicipalityFlags) -> Self {
        self.municipality = municipality;
        self
    }

    pub fn with_intervention(mut self, id: InterventionId) -> Self {
        self.selected_interventions.insert(id);
        self
    }

    pub fn with_premium(mut self, premium: PremiumId) -> Self {
        self.selected_premiums.insert(premium);
        self
    }

    /// True when the project also replaces a heat generator.
    pub fn includes_generator(&self) -> bool {
        self.selected_interventions
            .iter()
            .any(|id| id.family() == InterventionFamily::Generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_every_key() {
        for id in InterventionId::ALL {
            assert_eq!(InterventionId::parse(id.key()), Some(id));
        }
    }

    #[test]
    fn parse_is_case_insensitive_and_trims() {
        assert_eq!(
            InterventionId::parse("  Ricarica_Veicoli "),
            Some(InterventionId::EvCharging)
        );
        assert_eq!(InterventionId::parse("solare_termico"), None);
    }

    #[test]
    fn serde_keys_match_registry_keys() {
        for id in InterventionId::ALL {
            let json = serde_json::to_value(id).unwrap();
            assert_eq!(json, serde_json::json!(id.key()));
        }
    }

    #[test]
    fn generator_detection_uses_family() {
        let ctx = Context::new().with_intervention(InterventionId::OpaqueInsulation);
        assert!(!ctx.includes_generator());
        let ctx = ctx.with_intervention(InterventionId::Biomass);
        assert!(ctx.includes_generator());
    }

    #[test]
    fn small_municipality_requires_all_flags() {
        let mut flags = MunicipalityFlags {
            is_comune: true,
            is_edificio_comunale: true,
            is_piccolo_comune: false,
        };
        assert!(!flags.small_municipality_building());
        flags.is_piccolo_comune = true;
        assert!(flags.small_municipality_building());
    }
}
