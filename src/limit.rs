//! Numerical limits by geometric approach sequences.
//!
//! A limit is estimated from the function values at `x0 ± hᵢ` with offsets
//! `hᵢ = initial_offset · shrink_factorⁱ` (by default `0.1, 0.01, …, 1e-8`). The point `x0` itself
//! is never required, which is what makes removable singularities like `(x² - 4)/(x - 2)` at 2
//! tractable. Limits at infinity use the magnitudes `1/hᵢ` instead.
//!
//! A sequence whose last values overflow to an infinity of one sign diverges to that infinity.
//! Otherwise the tail of the sequence is classified as follows, looking at the last four finite
//! values:
//!
//! - same sign, strictly growing magnitude and differences that do not shrink: signed infinity
//! - successive differences of one sign whose ratio stays below 1, or that are already below the
//!   tolerance: converged. A tail still moving by more than the tolerance is extrapolated with
//!   Aitken's Δ² using the observed ratio, so slow approaches such as `√x` at 0 are handled too
//! - anything else, including persistent oscillation such as `sin(1/x)` at 0: does not exist
//!
//! The tolerance is relative: values are compared within `tolerance · max(1, |a|, |b|)`.
//!
//! Unlike every other evaluator in this crate, limits never fail on a bad probe. A probe where
//! the function fails or is NaN is skipped; with fewer than three usable probes the limit does
//! not exist.

use std::fmt;

use log::{debug, trace};
use strum_macros::{Display, EnumIter, EnumString};

use crate::errors::{ConfigError, EvaluationError};
use crate::function::Evaluate;

/// Minimum number of probes needed to classify a sequence.
pub const MIN_PROBES: usize = 3;

/// Number of trailing values the classification looks at.
const TAIL: usize = 4;

/// How the approach sequence is built and judged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LimitConfig {
    /// First, largest offset from the limit point.
    pub initial_offset: f64,
    /// Ratio between consecutive offsets, strictly between 0 and 1.
    pub shrink_factor: f64,
    /// Number of offsets in the sequence.
    pub probes: usize,
    /// Relative agreement tolerance for convergence, one-sided agreement and continuity.
    pub tolerance: f64,
}

impl Default for LimitConfig {
    fn default() -> Self {
        Self {
            initial_offset: 0.1,
            shrink_factor: 0.1,
            probes: 8,
            tolerance: 1e-6,
        }
    }
}

impl LimitConfig {
    /// Checks every parameter, reporting the first invalid one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.initial_offset.is_finite() && self.initial_offset > 0.0) {
            return Err(ConfigError::InvalidOffset(self.initial_offset));
        }
        if !(self.shrink_factor > 0.0 && self.shrink_factor < 1.0) {
            return Err(ConfigError::InvalidShrinkFactor(self.shrink_factor));
        }
        if self.probes < MIN_PROBES {
            return Err(ConfigError::TooFewProbes {
                min: MIN_PROBES,
                got: self.probes,
            });
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(ConfigError::InvalidTolerance(self.tolerance));
        }
        Ok(())
    }

    fn offsets(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.probes).map(|i| self.initial_offset * self.shrink_factor.powi(i as i32))
    }
}

/// Outcome of a limit estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LimitValue {
    Finite(f64),
    PositiveInfinity,
    NegativeInfinity,
    DoesNotExist,
}

impl LimitValue {
    /// The limit as a float: the finite value or a signed infinity. `None` if it does not exist.
    pub fn value(self) -> Option<f64> {
        match self {
            Self::Finite(value) => Some(value),
            Self::PositiveInfinity => Some(f64::INFINITY),
            Self::NegativeInfinity => Some(f64::NEG_INFINITY),
            Self::DoesNotExist => None,
        }
    }

    /// The limit if it is finite.
    pub fn finite(self) -> Option<f64> {
        match self {
            Self::Finite(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_finite(self) -> bool {
        matches!(self, Self::Finite(_))
    }
}

impl fmt::Display for LimitValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finite(value) => write!(f, "{value}"),
            Self::PositiveInfinity => write!(f, "+∞"),
            Self::NegativeInfinity => write!(f, "-∞"),
            Self::DoesNotExist => write!(f, "does not exist"),
        }
    }
}

/// Direction of a limit at infinity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    Positive,
    Negative,
}

impl Direction {
    /// Parses `"positive"` or `"negative"`.
    pub fn from_name(name: &str) -> Result<Self, ConfigError> {
        name.parse().map_err(|_| ConfigError::UnknownMethod(name.to_string()))
    }
}

/// Side from which a finite point is approached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

/// One point of an approach sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Probe {
    /// Where the function was evaluated.
    pub x: f64,
    /// Distance from the limit point, or `1/|x|` when approaching infinity.
    pub offset: f64,
    /// The function value, `None` if the evaluation failed or was NaN. Overflow is kept as a
    /// signed infinity.
    pub value: Option<f64>,
}

/// Numerical limit estimator for a one-variable function.
#[derive(Debug, Clone)]
pub struct Limit<F> {
    function: F,
    config: LimitConfig,
}

impl<F: Evaluate> Limit<F> {
    /// Limit estimator with the default approach sequence and tolerance `1e-6`.
    pub fn new(function: F) -> Self {
        Self {
            function,
            config: LimitConfig::default(),
        }
    }

    /// Limit estimator with a custom approach sequence.
    ///
    /// # Errors
    /// Returns the first parameter of `config` that is invalid.
    pub fn with_config(function: F, config: LimitConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { function, config })
    }

    /// Limit estimator with the default sequence and agreement tolerance `tolerance`.
    pub fn with_tolerance(function: F, tolerance: f64) -> Result<Self, ConfigError> {
        Self::with_config(
            function,
            LimitConfig {
                tolerance,
                ..LimitConfig::default()
            },
        )
    }

    pub fn config(&self) -> &LimitConfig {
        &self.config
    }

    /// The approach sequence towards `x0` from `side`, largest offset first.
    pub fn probes(&self, x0: f64, side: Side) -> Vec<Probe> {
        let sign = match side {
            Side::Left => -1.0,
            Side::Right => 1.0,
        };
        self.config
            .offsets()
            .map(|offset| self.probe(x0 + sign * offset, offset))
            .collect()
    }

    /// Limit as x approaches `x0` from below.
    pub fn left(&self, x0: f64) -> LimitValue {
        let value = classify(&self.probes(x0, Side::Left), self.config.tolerance);
        debug!("left limit at {x0}: {value}");
        value
    }

    /// Limit as x approaches `x0` from above.
    pub fn right(&self, x0: f64) -> LimitValue {
        let value = classify(&self.probes(x0, Side::Right), self.config.tolerance);
        debug!("right limit at {x0}: {value}");
        value
    }

    /// Two-sided limit at `x0`.
    ///
    /// Finite one-sided limits that agree within the tolerance give their midpoint, or f(x0)
    /// itself if it is finite and agrees with both sides. One-sided infinities of the same sign
    /// give that infinity. Everything else does not exist.
    ///
    /// # Example
    /// ```
    /// # use calculus_kit::prelude::*;
    /// let limit = Limit::new(|x: f64| (x * x - 4.0) / (x - 2.0));
    /// let value = limit.at(2.0).finite().unwrap();
    /// assert!((value - 4.0).abs() < 1e-4);
    /// ```
    pub fn at(&self, x0: f64) -> LimitValue {
        let tolerance = self.config.tolerance;
        match (self.left(x0), self.right(x0)) {
            (LimitValue::Finite(l), LimitValue::Finite(r)) if agree(l, r, tolerance) => {
                match self.function.evaluate(x0) {
                    Ok(fx) if agree(fx, l, tolerance) && agree(fx, r, tolerance) => {
                        LimitValue::Finite(fx)
                    }
                    _ => LimitValue::Finite((l + r) / 2.0),
                }
            }
            (LimitValue::PositiveInfinity, LimitValue::PositiveInfinity) => {
                LimitValue::PositiveInfinity
            }
            (LimitValue::NegativeInfinity, LimitValue::NegativeInfinity) => {
                LimitValue::NegativeInfinity
            }
            _ => LimitValue::DoesNotExist,
        }
    }

    /// Whether both one-sided limits are finite and agree within the tolerance.
    pub fn exists(&self, x0: f64) -> bool {
        self.agreed_limit(x0).is_some()
    }

    /// Whether the limit exists and equals f(x0) within the tolerance.
    ///
    /// A point where f cannot be evaluated is never continuous.
    pub fn is_continuous(&self, x0: f64) -> bool {
        match (self.agreed_limit(x0), self.function.evaluate(x0)) {
            (Some(limit), Ok(fx)) => agree(fx, limit, self.config.tolerance),
            _ => false,
        }
    }

    /// Limit as x grows without bound in `direction`.
    ///
    /// # Example
    /// ```
    /// # use calculus_kit::prelude::*;
    /// let limit = Limit::new(|x: f64| (2.0 * x + 1.0) / x);
    /// let value = limit.as_x_approaches_infinity(Direction::Positive);
    /// assert!((value.finite().unwrap() - 2.0).abs() < 1e-6);
    /// ```
    pub fn as_x_approaches_infinity(&self, direction: Direction) -> LimitValue {
        let sign = match direction {
            Direction::Positive => 1.0,
            Direction::Negative => -1.0,
        };
        let probes: Vec<Probe> = self
            .config
            .offsets()
            .map(|offset| self.probe(sign / offset, offset))
            .collect();
        let value = classify(&probes, self.config.tolerance);
        debug!("limit at {direction} infinity: {value}");
        value
    }

    fn agreed_limit(&self, x0: f64) -> Option<f64> {
        let tolerance = self.config.tolerance;
        match (self.left(x0), self.right(x0)) {
            (LimitValue::Finite(l), LimitValue::Finite(r)) if agree(l, r, tolerance) => {
                Some((l + r) / 2.0)
            }
            _ => None,
        }
    }

    fn probe(&self, x: f64, offset: f64) -> Probe {
        let value = match self.function.evaluate(x) {
            Ok(value) => Some(value),
            Err(EvaluationError::NonFinite { value, .. }) if value.is_infinite() => {
                trace!("limit probe at {x} overflowed to {value}");
                Some(value)
            }
            Err(err) => {
                trace!("skipping limit probe: {err}");
                None
            }
        };
        Probe { x, offset, value }
    }
}

/// Classifies the tail of an approach sequence.
fn classify(probes: &[Probe], tolerance: f64) -> LimitValue {
    let known: Vec<f64> = probes.iter().filter_map(|probe| probe.value).collect();
    if let Some(value) = overflowed(&known) {
        return value;
    }

    let usable: Vec<f64> = known.into_iter().filter(|value| value.is_finite()).collect();
    if usable.len() < MIN_PROBES {
        return LimitValue::DoesNotExist;
    }

    let values = &usable[usable.len().saturating_sub(TAIL)..];
    let differences: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).collect();

    let same_sign = values.iter().all(|&v| v > 0.0) || values.iter().all(|&v| v < 0.0);
    let growing = values.windows(2).all(|w| w[1].abs() > w[0].abs());
    let not_contracting = differences
        .windows(2)
        .all(|w| w[1].abs() >= 0.9 * w[0].abs());
    if same_sign && growing && not_contracting {
        return if values[0] > 0.0 {
            LimitValue::PositiveInfinity
        } else {
            LimitValue::NegativeInfinity
        };
    }

    let slack = scaled_tolerance(tolerance, values);
    let contracting = differences.windows(2).all(|w| {
        w[1].abs() <= slack || (w[0] != 0.0 && (0.0..1.0).contains(&(w[1] / w[0])))
    });
    if !contracting {
        return LimitValue::DoesNotExist;
    }

    let last = values[values.len() - 1];
    let step = differences[differences.len() - 1];
    if step.abs() <= slack {
        return LimitValue::Finite(last);
    }
    // Aitken's Δ²: the remaining steps form a geometric series with the observed ratio.
    let ratio = step / differences[differences.len() - 2];
    LimitValue::Finite(last + step * ratio / (1.0 - ratio))
}

/// A sequence that ends in overflow diverges, provided every value from the first overflow on
/// is the same infinity and the finite value before it has the same sign.
fn overflowed(known: &[f64]) -> Option<LimitValue> {
    let last = *known.last()?;
    if last.is_finite() {
        return None;
    }
    let first = known.iter().position(|value| value.is_infinite())?;
    let consistent = known[first..].iter().all(|&value| value == last)
        && known[..first]
            .last()
            .map_or(true, |value| value.signum() == last.signum());
    Some(match (consistent, last > 0.0) {
        (false, _) => LimitValue::DoesNotExist,
        (true, true) => LimitValue::PositiveInfinity,
        (true, false) => LimitValue::NegativeInfinity,
    })
}

/// `tolerance` scaled by the largest magnitude among `values`, and never below `tolerance`.
fn scaled_tolerance(tolerance: f64, values: &[f64]) -> f64 {
    tolerance * values.iter().fold(1.0_f64, |scale, value| scale.max(value.abs()))
}

fn agree(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() < scaled_tolerance(tolerance, &[a, b])
}
