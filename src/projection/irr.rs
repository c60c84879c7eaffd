//! Internal Rate of Return (IRR) calculation
//!
//! Newton-Raphson on the annual rate, falling back to bisection when the
//! derivative vanishes or an iterate leaves the search bracket. Bisection
//! doubles the upper bound until the net present value changes sign.

use std::env;

use serde::{Deserialize, Serialize};

use crate::error::{CalcError, CalcResult};

/// Root-finder settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// Starting rate for Newton-Raphson (decimal)
    pub initial_guess: f64,
    pub tolerance: f64,
    pub max_iterations: u32,
    /// Search bracket for the rate (decimal); bisection widens the upper
    /// bound when the bracket holds no sign change
    pub lower_bound: f64,
    pub upper_bound: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            initial_guess: 0.10,
            tolerance: 1e-10,
            max_iterations: 1000,
            lower_bound: -0.9999,
            upper_bound: 10.0,
        }
    }
}

impl SolverConfig {
    /// Defaults overridden by `IRR_INITIAL_GUESS`, `IRR_TOLERANCE` and
    /// `IRR_MAX_ITERATIONS` when they are set and parse
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            initial_guess: env_or("IRR_INITIAL_GUESS", defaults.initial_guess),
            tolerance: env_or("IRR_TOLERANCE", defaults.tolerance),
            max_iterations: env_or("IRR_MAX_ITERATIONS", defaults.max_iterations),
            ..defaults
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key).ok().and_then(|s| s.parse().ok()).unwrap_or(default)
}

/// Outcome of solving one cash-flow series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrrResult {
    pub success: bool,
    /// Rate as a percentage; 0 on failure
    pub rate_pct: f64,
    pub message: Option<String>,
}

impl IrrResult {
    pub fn from_cash_flows(cash_flows: &[f64], config: &SolverConfig) -> Self {
        solve_irr_with(cash_flows, config).into()
    }

    /// Rate if the solve succeeded
    pub fn rate(&self) -> Option<f64> {
        self.success.then_some(self.rate_pct)
    }
}

impl From<CalcResult<f64>> for IrrResult {
    fn from(result: CalcResult<f64>) -> Self {
        match result {
            Ok(rate_pct) => Self { success: true, rate_pct, message: None },
            Err(err) => Self { success: false, rate_pct: 0.0, message: Some(err.to_string()) },
        }
    }
}

/// Solve for the annual rate zeroing NPV, returned as a percentage
pub fn solve_irr(cash_flows: &[f64]) -> CalcResult<f64> {
    solve_irr_with(cash_flows, &SolverConfig::default())
}

/// `solve_irr` with explicit solver settings
pub fn solve_irr_with(cash_flows: &[f64], config: &SolverConfig) -> CalcResult<f64> {
    if cash_flows.len() < 2 {
        return Err(CalcError::InsufficientSignal(format!(
            "at least 2 cash flows are required, got {}",
            cash_flows.len()
        )));
    }

    let has_positive = cash_flows.iter().any(|&cf| cf > 0.0);
    let has_negative = cash_flows.iter().any(|&cf| cf < 0.0);
    if !has_positive || !has_negative {
        return Err(CalcError::InsufficientSignal(
            "cash flows need both signs (at least one positive and one negative value)".into(),
        ));
    }

    let rate = newton_raphson(cash_flows, config)
        .or_else(|| bisection(cash_flows, config))
        .filter(|r| r.is_finite())
        .ok_or_else(|| CalcError::NoConvergence("no finite rate zeroes the net present value".into()))?;

    Ok(rate * 100.0)
}

fn newton_raphson(cash_flows: &[f64], config: &SolverConfig) -> Option<f64> {
    let mut rate = config.initial_guess;

    for _ in 0..config.max_iterations {
        let (npv, dnpv) = npv_and_derivative(cash_flows, rate);
        if !npv.is_finite() || !dnpv.is_finite() || dnpv.abs() < 1e-20 {
            return None;
        }

        let new_rate = rate - npv / dnpv;
        if !new_rate.is_finite() {
            return None;
        }

        // An iterate pinned at the bracket edge is not a root
        let clamped = new_rate.clamp(config.lower_bound, config.upper_bound);
        if clamped != new_rate && clamped == rate {
            return None;
        }

        if (clamped - rate).abs() < config.tolerance {
            return Some(clamped);
        }
        rate = clamped;
    }

    None
}

/// Calculate NPV and its derivative with respect to rate
fn npv_and_derivative(cash_flows: &[f64], rate: f64) -> (f64, f64) {
    let mut npv = 0.0;
    let mut dnpv = 0.0;

    for (t, &cf) in cash_flows.iter().enumerate() {
        npv += cf / (1.0 + rate).powi(t as i32);
        if t > 0 {
            dnpv -= (t as f64) * cf / (1.0 + rate).powi(t as i32 + 1);
        }
    }

    (npv, dnpv)
}

/// Upper-bound doublings tried before giving up on a sign change
const MAX_BRACKET_DOUBLINGS: u32 = 60;

fn bisection(cash_flows: &[f64], config: &SolverConfig) -> Option<f64> {
    let mut low = config.lower_bound;
    let mut high = config.upper_bound;
    let mut npv_low = npv_at_rate(cash_flows, low);
    let mut npv_high = npv_at_rate(cash_flows, high);

    // Widen the bracket upward until the sign flips
    let mut doublings = 0;
    while npv_low.is_finite() && npv_high.is_finite() && npv_low * npv_high > 0.0 {
        if doublings == MAX_BRACKET_DOUBLINGS {
            return None;
        }
        low = high;
        npv_low = npv_high;
        high *= 2.0;
        npv_high = npv_at_rate(cash_flows, high);
        doublings += 1;
    }

    if !npv_low.is_finite() || !npv_high.is_finite() {
        return None;
    }

    for _ in 0..config.max_iterations {
        let mid = (low + high) / 2.0;
        let npv_mid = npv_at_rate(cash_flows, mid);

        if npv_mid.abs() < config.tolerance || (high - low) / 2.0 < config.tolerance {
            return Some(mid);
        }

        if npv_mid * npv_low < 0.0 {
            high = mid;
        } else {
            low = mid;
            npv_low = npv_mid;
        }
    }

    None
}

/// NPV at a given annual rate
pub fn npv_at_rate(cash_flows: &[f64], rate: f64) -> f64 {
    cash_flows
        .iter()
        .enumerate()
        .map(|(t, &cf)| cf / (1.0 + rate).powi(t as i32))
        .sum()
}
