//! Conto Termico incentive rules engine -- resolves incentive rates,
//! ceilings and payable amounts for energy-efficiency interventions.
//!
//! The engine is pure: every operation is a deterministic function of its
//! inputs, with no I/O and no shared state. Amounts are `rust_decimal`
//! values rounded to cents.
//!
//! Entry points:
//! * [`evaluate`] / [`explain`]: one intervention, with or without the
//!   narrated derivation,
//! * [`calculate_combined_incentives`]: a whole selection,
//! * [`InterventionRegistry`]: the same, addressed by key.

pub mod ceiling;
pub mod combined;
pub mod interventions;
pub mod numeric;
pub mod percentage;
pub mod pump;
pub mod trace;
pub mod types;

pub use ceiling::massimale_soggetto;
pub use combined::calculate_combined_incentives;
pub use interventions::{evaluate, explain, InterventionRegistry};
pub use percentage::determine_percentage;
pub use pump::{detect_pump_flags, PumpFlags};
pub use types::{
    CombinedResult, Context, EngineError, EvaluationResult, ExplainResult, InterventionId,
    InterventionParams, PercentageResult, PremiumId, SubjectType,
};
