//! Double integrals over rectangles by iterated quadrature.
//!
//! The outer integral runs over x; every outer sample is itself a one-dimensional integral over
//! y at that x-slice. Both levels use the same [`Quadrature`], so an `n`-subdivision rule costs
//! about `(n + 1)²` evaluations of f.

use crate::errors::{ConfigError, EvaluationError};
use crate::function::ScalarField;
use crate::quadrature::{IntegrationMethod, Quadrature};

/// Default subdivision count per axis.
pub const DEFAULT_SUBDIVISIONS: usize = 100;

/// Numerical double integral of a function of two variables.
#[derive(Debug, Clone)]
pub struct DoubleIntegral<F> {
    function: F,
    quadrature: Quadrature,
}

impl<F: ScalarField> DoubleIntegral<F> {
    /// Simpson's rule with 100 subdivisions per axis.
    pub fn new(function: F) -> Self {
        Self::with_method(function, IntegrationMethod::Simpson)
    }

    /// `method` with 100 subdivisions per axis.
    pub fn with_method(function: F, method: IntegrationMethod) -> Self {
        Self {
            function,
            quadrature: Quadrature::fixed(method, DEFAULT_SUBDIVISIONS),
        }
    }

    /// `method` with `subdivisions` subintervals per axis.
    ///
    /// # Errors
    /// Returns `ConfigError::ZeroSubdivisions` if `subdivisions` is zero.
    pub fn with_subdivisions(
        function: F,
        method: IntegrationMethod,
        subdivisions: usize,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            function,
            quadrature: Quadrature::new(method, subdivisions)?,
        })
    }

    /// Estimates ∫_{x0}^{x1} ∫_{y0}^{y1} f(x, y) dy dx.
    ///
    /// Each axis follows the one-dimensional orientation rules independently: a degenerate
    /// range on either axis gives zero, and a reversed range flips the sign.
    ///
    /// # Errors
    /// Fails with `DimensionMismatch` if f declares an arity other than two, and with the first
    /// failing sample otherwise.
    ///
    /// # Example
    /// ```
    /// # use calculus_kit::prelude::*;
    /// let volume = DoubleIntegral::new(Bivariate(|x: f64, y: f64| x * y));
    /// assert!((volume.over(0.0, 1.0, 0.0, 1.0).unwrap() - 0.25).abs() < 1e-2);
    /// ```
    pub fn over(&self, x0: f64, x1: f64, y0: f64, y1: f64) -> Result<f64, EvaluationError> {
        if let Some(arity) = self.function.arity().filter(|&arity| arity != 2) {
            return Err(EvaluationError::DimensionMismatch {
                expected: arity,
                got: 2,
            });
        }

        self.quadrature.integrate(x0, x1, &mut |x| {
            self.quadrature
                .integrate(y0, y1, &mut |y| self.function.evaluate_at(&[x, y]))
        })
    }

    pub fn method(&self) -> IntegrationMethod {
        self.quadrature.method()
    }

    pub fn subdivisions(&self) -> usize {
        self.quadrature.subdivisions()
    }
}
