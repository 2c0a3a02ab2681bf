//! Explanation tracing.
//!
//! Every intervention strategy is written once, generic over a [`Tracer`].
//! Plain evaluation threads [`NoTrace`] through it; `explain` threads an
//! [`Explanation`] builder, which records the narrated steps and the named
//! intermediates as the arithmetic happens. Both paths execute the same
//! code, so the explained result and the evaluated result cannot diverge.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::types::ExplainResult;

/// Sink for narrated steps and named intermediate values.
pub trait Tracer {
    /// Record one narrated step. The closure only runs when recording.
    fn step<F>(&mut self, describe: F)
    where
        F: FnOnce() -> String;

    /// Record a named intermediate value.
    fn var(&mut self, name: &str, value: Decimal);
}

/// Tracer used by plain evaluation: records nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTrace;

impl Tracer for NoTrace {
    fn step<F>(&mut self, _describe: F)
    where
        F: FnOnce() -> String,
    {
    }

    fn var(&mut self, _name: &str, _value: Decimal) {}
}

/// Builder collecting the derivation of one evaluation.
#[derive(Debug, Clone, Default)]
pub struct Explanation {
    steps: Vec<String>,
    variables: BTreeMap<String, Decimal>,
}

impl Explanation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    pub fn variables(&self) -> &BTreeMap<String, Decimal> {
        &self.variables
    }

    /// Finalize into an [`ExplainResult`] carrying `result`.
    pub fn into_result(self, result: Decimal) -> ExplainResult {
        ExplainResult {
            result,
            variables: self.variables,
            steps: self.steps,
        }
    }
}

impl Tracer for Explanation {
    fn step<F>(&mut self, describe: F)
    where
        F: FnOnce() -> String,
    {
        self.steps.push(describe());
    }

    fn var(&mut self, name: &str, value: Decimal) {
        self.variables.insert(name.to_string(), value);
    }
}
