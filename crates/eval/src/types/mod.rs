//! Domain types for the incentive engine.
//!
//! Inputs (`Context`, `InterventionParams`) and outputs
//! (`PercentageResult`, `EvaluationResult`, `ExplainResult`,
//! `CombinedResult`) are plain values: created per call, never mutated
//! afterwards.

pub mod intervention;
pub mod params;
pub mod results;

pub use intervention::{
    BuildingSubcategory, ClimateZone, Context, InterventionFamily, InterventionId,
    MunicipalityFlags, PremiumId, SubjectType,
};
pub use params::{
    BiomassGenerator, BiomassParams, BiomassRow, ChargerType, ChargingParams, EmissionClass,
    EmissionReduction, HeatPumpParams, HeatPumpRow, InterventionParams, OpaqueElement,
    OpaqueParams, OpaqueRow, PhotovoltaicParams, PvRegistry, SurfaceParams,
};
pub use results::{
    AppliedPremium, CombinedResult, EvaluationResult, ExplainResult, InterventionOutcome,
    PercentageResult, PremiumIncrement, Totals,
};

// ──────────────────────────────────────────────
// Errors
// ──────────────────────────────────────────────

/// Errors surfaced by the engine.
///
/// Business-rule gaps never produce an error: they degrade to zero-valued
/// results with a descriptive `p_desc`. Errors are reserved for misuse at
/// the API boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// No strategy is registered under the requested key.
    #[error("unknown intervention: {key}")]
    UnknownIntervention { key: String },

    /// Intervention inputs could not be decoded.
    #[error("invalid parameters for '{intervention}': {message}")]
    InvalidParams {
        intervention: String,
        message: String,
    },
}
