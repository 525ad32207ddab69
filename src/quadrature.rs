//! Composite quadrature rules shared by every integrating evaluator.
//!
//! [`Integral`](crate::integral::Integral),
//! [`DoubleIntegral`](crate::double_integral::DoubleIntegral) and
//! [`FourierSeries`](crate::fourier::FourierSeries) all integrate through a [`Quadrature`], so
//! the weight patterns below exist exactly once. The rule is resolved from its
//! [`IntegrationMethod`] to a function pointer when the quadrature is built.
//!
//! For `n` subdivisions of width `Δx = (b - a) / n` over nodes `x0 … xn`:
//!
//! - trapezoidal: `Δx · (f(x0)/2 + f(x1) + … + f(xn-1) + f(xn)/2)`, error O(Δx²)
//! - simpson: `Δx/3 · (f(x0) + 4·Σf(odd) + 2·Σf(even interior) + f(xn))`, error O(Δx⁴), `n` even
//! - midpoint: `Δx · Σ f(xi + Δx/2)`, error O(Δx²)
//!
//! Orientation follows the usual convention: `a == b` integrates to exactly zero and `a > b`
//! yields the negated integral from `b` to `a`.

use log::debug;
use strum_macros::{Display, EnumIter, EnumString};

use crate::errors::{ConfigError, EvaluationError};

/// Integrand as seen by a quadrature rule.
pub(crate) type Integrand<'a> = &'a mut dyn FnMut(f64) -> Result<f64, EvaluationError>;

type QuadratureRule = fn(f64, f64, usize, Integrand<'_>) -> Result<f64, EvaluationError>;

/// Composite quadrature rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum IntegrationMethod {
    Trapezoidal,
    #[default]
    Simpson,
    Midpoint,
}

impl IntegrationMethod {
    /// Parses a method name such as `"simpson"`.
    pub fn from_name(name: &str) -> Result<Self, ConfigError> {
        name.parse().map_err(|_| ConfigError::UnknownMethod(name.to_string()))
    }

    /// Order of the global truncation error in the subinterval width.
    pub fn order_of_accuracy(self) -> u32 {
        match self {
            Self::Trapezoidal | Self::Midpoint => 2,
            Self::Simpson => 4,
        }
    }

    fn rule(self) -> QuadratureRule {
        match self {
            Self::Trapezoidal => trapezoidal,
            Self::Simpson => simpson,
            Self::Midpoint => midpoint,
        }
    }
}

/// A quadrature method bound to a subdivision count.
#[derive(Clone, Copy)]
pub struct Quadrature {
    method: IntegrationMethod,
    subdivisions: usize,
    rule: QuadratureRule,
}

impl std::fmt::Debug for Quadrature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Quadrature")
            .field("method", &self.method)
            .field("subdivisions", &self.subdivisions)
            .finish()
    }
}

impl Quadrature {
    /// Creates a quadrature with `subdivisions` subintervals.
    ///
    /// Simpson's rule needs an even count; an odd one is increased by one.
    ///
    /// # Errors
    /// Returns `ConfigError::ZeroSubdivisions` if `subdivisions` is zero.
    pub fn new(method: IntegrationMethod, subdivisions: usize) -> Result<Self, ConfigError> {
        if subdivisions == 0 {
            return Err(ConfigError::ZeroSubdivisions);
        }

        let subdivisions = if method == IntegrationMethod::Simpson && subdivisions % 2 == 1 {
            debug!(
                "simpson needs an even subdivision count, using {} instead of {}",
                subdivisions + 1,
                subdivisions
            );
            subdivisions + 1
        } else {
            subdivisions
        };

        Ok(Self {
            method,
            subdivisions,
            rule: method.rule(),
        })
    }

    /// Quadrature with a known-valid, even subdivision count.
    pub(crate) fn fixed(method: IntegrationMethod, subdivisions: usize) -> Self {
        debug_assert!(subdivisions > 0 && subdivisions % 2 == 0);
        Self {
            method,
            subdivisions,
            rule: method.rule(),
        }
    }

    pub fn method(&self) -> IntegrationMethod {
        self.method
    }

    /// Effective subdivision count, after any Simpson adjustment.
    pub fn subdivisions(&self) -> usize {
        self.subdivisions
    }

    /// Integrates `integrand` from `a` to `b`.
    ///
    /// The first failing sample aborts the integration; no partial sum is returned.
    pub(crate) fn integrate(
        &self,
        a: f64,
        b: f64,
        integrand: Integrand<'_>,
    ) -> Result<f64, EvaluationError> {
        if a == b {
            Ok(0.0)
        } else if a > b {
            Ok(-(self.rule)(b, a, self.subdivisions, integrand)?)
        } else {
            (self.rule)(a, b, self.subdivisions, integrand)
        }
    }
}

fn trapezoidal(a: f64, b: f64, n: usize, f: Integrand<'_>) -> Result<f64, EvaluationError> {
    let dx = (b - a) / n as f64;
    let mut sum = 0.5 * (f(a)? + f(b)?);
    for i in 1..n {
        sum += f(a + i as f64 * dx)?;
    }
    Ok(sum * dx)
}

fn simpson(a: f64, b: f64, n: usize, f: Integrand<'_>) -> Result<f64, EvaluationError> {
    let dx = (b - a) / n as f64;
    let mut sum = f(a)? + f(b)?;
    for i in 1..n {
        let weight = if i % 2 == 1 { 4.0 } else { 2.0 };
        sum += weight * f(a + i as f64 * dx)?;
    }
    Ok(sum * dx / 3.0)
}

fn midpoint(a: f64, b: f64, n: usize, f: Integrand<'_>) -> Result<f64, EvaluationError> {
    let dx = (b - a) / n as f64;
    let mut sum = 0.0;
    for i in 0..n {
        sum += f(a + (i as f64 + 0.5) * dx)?;
    }
    Ok(sum * dx)
}
