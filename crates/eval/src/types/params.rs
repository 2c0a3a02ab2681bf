//! Raw intervention inputs, one closed variant per intervention family.
//!
//! Every field is optional on the wire: absent scalars decode to zero and
//! absent row lists decode to empty, so a partially filled form still
//! evaluates (to a smaller or zero incentive).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::intervention::{ClimateZone, InterventionId};
use super::EngineError;

// ──────────────────────────────────────────────
// Row types
// ──────────────────────────────────────────────

/// Structural element of the opaque envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpaqueElement {
    CoperturaEsterna,
    CoperturaInterna,
    CoperturaVentilata,
    PavimentoEsterno,
    PavimentoInterno,
    PareteEsterna,
    PareteInterna,
    PareteVentilata,
}

impl OpaqueElement {
    pub fn key(&self) -> &'static str {
        match self {
            OpaqueElement::CoperturaEsterna => "copertura_esterna",
            OpaqueElement::CoperturaInterna => "copertura_interna",
            OpaqueElement::CoperturaVentilata => "copertura_ventilata",
            OpaqueElement::PavimentoEsterno => "pavimento_esterno",
            OpaqueElement::PavimentoInterno => "pavimento_interno",
            OpaqueElement::PareteEsterna => "parete_esterna",
            OpaqueElement::PareteInterna => "parete_interna",
            OpaqueElement::PareteVentilata => "parete_ventilata",
        }
    }
}

/// One insulated envelope element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpaqueRow {
    #[serde(default)]
    pub elemento: Option<OpaqueElement>,
    #[serde(default)]
    pub superficie: Decimal,
    #[serde(default)]
    pub costo: Decimal,
}

/// One heat-pump unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeatPumpRow {
    #[serde(default)]
    pub descrizione: String,
    #[serde(default)]
    pub potenza_kw: Decimal,
    #[serde(default)]
    pub costo: Decimal,
    #[serde(default)]
    pub cop: Option<Decimal>,
    #[serde(default)]
    pub gwp: Option<Decimal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiomassGenerator {
    Caldaia,
    Stufa,
    Termocamino,
}

/// Particulate-emission reduction bracket declared for a biomass generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmissionReduction {
    Fino20,
    Da20A50,
    Oltre50,
}

/// Environmental certification class ("stelle") of a biomass generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmissionClass {
    FourStars,
    FiveStars,
    Other,
}

impl EmissionClass {
    /// Parses the declared class: "4", "5", "4 stelle", "5stelle", ...
    pub fn parse(raw: &str) -> Self {
        let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
        match digits.as_str() {
            "4" => EmissionClass::FourStars,
            "5" => EmissionClass::FiveStars,
            _ => EmissionClass::Other,
        }
    }
}

/// One biomass generator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BiomassRow {
    #[serde(default)]
    pub generatore: Option<BiomassGenerator>,
    #[serde(default)]
    pub potenza_kw: Decimal,
    #[serde(default)]
    pub riduzione_emissioni: Option<EmissionReduction>,
    #[serde(default)]
    pub classe: Option<String>,
    #[serde(default)]
    pub costo: Decimal,
}

impl BiomassRow {
    pub fn emission_class(&self) -> EmissionClass {
        self.classe
            .as_deref()
            .map(EmissionClass::parse)
            .unwrap_or(EmissionClass::Other)
    }
}

// ──────────────────────────────────────────────
// Scalar parameter groups
// ──────────────────────────────────────────────

/// Inputs for interventions priced per square metre.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SurfaceParams {
    #[serde(default)]
    pub zona: Option<ClimateZone>,
    #[serde(default)]
    pub superficie: Decimal,
    #[serde(default)]
    pub costo_totale: Option<Decimal>,
    #[serde(default)]
    pub costo_specifico: Option<Decimal>,
}

impl SurfaceParams {
    /// Declared total, or specific cost times surface when no total is given.
    pub fn declared_cost(&self) -> Decimal {
        match (self.costo_totale, self.costo_specifico) {
            (Some(total), _) => total,
            (None, Some(specific)) => specific.saturating_mul(self.superficie),
            (None, None) => Decimal::ZERO,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChargerType {
    Monofase,
    Trifase,
    AltaPotenza50,
    AltaPotenza100,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChargingParams {
    #[serde(default)]
    pub tipo: Option<ChargerType>,
    #[serde(default)]
    pub punti: u32,
    #[serde(default)]
    pub costo_totale: Decimal,
}

/// Registration of the PV modules in the national technology registry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PvRegistry {
    #[default]
    No,
    SezioneA,
    SezioneB,
    SezioneC,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhotovoltaicParams {
    #[serde(default)]
    pub potenza_kw: Decimal,
    #[serde(default)]
    pub accumulo_kwh: Decimal,
    #[serde(default)]
    pub costo_totale: Decimal,
    #[serde(default)]
    pub registro: PvRegistry,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpaqueParams {
    #[serde(default)]
    pub zona: Option<ClimateZone>,
    #[serde(default)]
    pub righe: Vec<OpaqueRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeatPumpParams {
    #[serde(default)]
    pub zona: Option<ClimateZone>,
    #[serde(default)]
    pub righe: Vec<HeatPumpRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BiomassParams {
    #[serde(default)]
    pub zona: Option<ClimateZone>,
    #[serde(default)]
    pub righe: Vec<BiomassRow>,
}

// ──────────────────────────────────────────────
// InterventionParams
// ──────────────────────────────────────────────

/// Input bag for one intervention.
#[derive(Debug, Clone, PartialEq)]
pub enum InterventionParams {
    Opaque(OpaqueParams),
    Surface(SurfaceParams),
    Charging(ChargingParams),
    Photovoltaic(PhotovoltaicParams),
    HeatPump(HeatPumpParams),
    Biomass(BiomassParams),
}

impl InterventionParams {
    /// Empty inputs of the family expected by `id`.
    pub fn empty_for(id: InterventionId) -> Self {
        match id {
            InterventionId::OpaqueInsulation => Self::Opaque(OpaqueParams::default()),
            InterventionId::WindowReplacement
            | InterventionId::SolarShading
            | InterventionId::NzebTransformation
            | InterventionId::Lighting
            | InterventionId::BuildingAutomation => Self::Surface(SurfaceParams::default()),
            InterventionId::EvCharging => Self::Charging(ChargingParams::default()),
            InterventionId::PhotovoltaicStorage => {
                Self::Photovoltaic(PhotovoltaicParams::default())
            }
            InterventionId::HeatPump => Self::HeatPump(HeatPumpParams::default()),
            InterventionId::Biomass => Self::Biomass(BiomassParams::default()),
        }
    }

    /// Decode the JSON object of an intervention into the variant its id expects.
    pub fn from_json(id: InterventionId, value: serde_json::Value) -> Result<Self, EngineError> {
        let invalid = |source: serde_json::Error| EngineError::InvalidParams {
            intervention: id.key().to_string(),
            message: source.to_string(),
        };
        let params = match Self::empty_for(id) {
            Self::Opaque(_) => Self::Opaque(serde_json::from_value(value).map_err(invalid)?),
            Self::Surface(_) => Self::Surface(serde_json::from_value(value).map_err(invalid)?),
            Self::Charging(_) => Self::Charging(serde_json::from_value(value).map_err(invalid)?),
            Self::Photovoltaic(_) => {
                Self::Photovoltaic(serde_json::from_value(value).map_err(invalid)?)
            }
            Self::HeatPump(_) => Self::HeatPump(serde_json::from_value(value).map_err(invalid)?),
            Self::Biomass(_) => Self::Biomass(serde_json::from_value(value).map_err(invalid)?),
        };
        Ok(params)
    }

    /// Climate zone declared in the inputs, if the family carries one.
    pub fn zone(&self) -> Option<ClimateZone> {
        match self {
            Self::Opaque(p) => p.zona,
            Self::Surface(p) => p.zona,
            Self::HeatPump(p) => p.zona,
            Self::Biomass(p) => p.zona,
            Self::Charging(_) | Self::Photovoltaic(_) => None,
        }
    }

    /// Family name used in diagnostics.
    pub fn family_name(&self) -> &'static str {
        match self {
            Self::Opaque(_) => "opache",
            Self::Surface(_) => "superficie",
            Self::Charging(_) => "ricarica",
            Self::Photovoltaic(_) => "fotovoltaico",
            Self::HeatPump(_) => "pompa di calore",
            Self::Biomass(_) => "biomassa",
        }
    }
}
